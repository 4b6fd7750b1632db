use std::{env, time::Duration};

use url::Url;

use crate::{
    BACKEND_AUTO_START_ENV, BACKEND_HEALTH_PATH_ENV, BACKEND_POLL_INTERVAL_ENV,
    BACKEND_PROBE_TIMEOUT_MS, BACKEND_TIMEOUT_CEILING_MS, BACKEND_TIMEOUT_ENV,
    DEFAULT_BACKEND_API_PREFIX, DEFAULT_BACKEND_POLL_INTERVAL_MS, DEFAULT_BACKEND_TIMEOUT_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReadinessProbe {
    Tcp,
    Http { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReadinessPolicy {
    pub(crate) timeout: Duration,
    pub(crate) poll_interval: Duration,
    pub(crate) probe_timeout: Duration,
    pub(crate) probe: ReadinessProbe,
}

// Must match the remote urls of the `default` capability.
const LOOPBACK_BACKEND_HOSTS: [&str; 2] = ["127.0.0.1", "localhost"];

pub(crate) fn parse_backend_url(raw: &str) -> Option<String> {
    let mut parsed = Url::parse(raw.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if !parsed
        .host_str()
        .is_some_and(|host| LOOPBACK_BACKEND_HOSTS.contains(&host))
    {
        return None;
    }
    if parsed.path().is_empty() {
        parsed.set_path("/");
    }
    parsed.set_query(None);
    parsed.set_fragment(None);
    Some(parsed.to_string())
}

pub(crate) fn resolve_api_base_url(backend_url: &str, prefix: Option<&str>) -> String {
    let prefix = prefix
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_BACKEND_API_PREFIX);
    format!(
        "{}/{}",
        backend_url.trim_end_matches('/'),
        prefix.trim_matches('/')
    )
}

pub(crate) fn backend_host_port(backend_url: &str) -> Option<(String, u16)> {
    let parsed = Url::parse(backend_url).ok()?;
    let host = parsed.host_str()?.to_string();
    let port = parsed.port_or_known_default()?;
    Some((host, port))
}

pub(crate) fn backend_auto_start_enabled() -> bool {
    parse_auto_start(env::var(BACKEND_AUTO_START_ENV).ok().as_deref())
}

fn parse_auto_start(raw: Option<&str>) -> bool {
    !matches!(
        raw.map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

pub(crate) fn resolve_backend_timeout(raw: Option<&str>) -> Duration {
    let parsed = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_BACKEND_TIMEOUT_MS);
    if parsed == 0 {
        return Duration::from_millis(BACKEND_TIMEOUT_CEILING_MS);
    }
    Duration::from_millis(parsed.min(BACKEND_TIMEOUT_CEILING_MS))
}

fn resolve_poll_interval(raw: Option<&str>) -> Duration {
    let parsed = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_BACKEND_POLL_INTERVAL_MS);
    Duration::from_millis(parsed)
}

fn resolve_probe(raw_health_path: Option<&str>) -> ReadinessProbe {
    match raw_health_path.map(str::trim).filter(|value| !value.is_empty()) {
        Some(path) => ReadinessProbe::Http {
            path: format!("/{}", path.trim_start_matches('/')),
        },
        None => ReadinessProbe::Tcp,
    }
}

pub(crate) fn resolve_readiness_policy() -> ReadinessPolicy {
    ReadinessPolicy {
        timeout: resolve_backend_timeout(env::var(BACKEND_TIMEOUT_ENV).ok().as_deref()),
        poll_interval: resolve_poll_interval(env::var(BACKEND_POLL_INTERVAL_ENV).ok().as_deref()),
        probe_timeout: Duration::from_millis(BACKEND_PROBE_TIMEOUT_MS),
        probe: resolve_probe(env::var(BACKEND_HEALTH_PATH_ENV).ok().as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_BACKEND_URL;

    #[test]
    fn parse_backend_url_adds_trailing_slash_and_drops_query() {
        assert_eq!(
            parse_backend_url("http://localhost:9000?x=1").as_deref(),
            Some("http://localhost:9000/")
        );
        assert_eq!(
            parse_backend_url(DEFAULT_BACKEND_URL).as_deref(),
            Some(DEFAULT_BACKEND_URL)
        );
    }

    #[test]
    fn parse_backend_url_rejects_empty_or_invalid_input() {
        assert_eq!(parse_backend_url("  "), None);
        assert_eq!(parse_backend_url("not a url"), None);
        assert_eq!(parse_backend_url("file:///tmp/index.html"), None);
    }

    #[test]
    fn parse_backend_url_rejects_hosts_outside_the_ipc_capability() {
        assert_eq!(parse_backend_url("http://192.168.0.10:8000/"), None);
        assert_eq!(parse_backend_url("https://assistant.example.com/"), None);
        assert_eq!(
            parse_backend_url("https://127.0.0.1:8443").as_deref(),
            Some("https://127.0.0.1:8443/")
        );
    }

    #[test]
    fn resolve_api_base_url_joins_prefix_without_duplicate_slashes() {
        assert_eq!(
            resolve_api_base_url("http://127.0.0.1:8000/", None),
            "http://127.0.0.1:8000/api/v1"
        );
        assert_eq!(
            resolve_api_base_url("http://127.0.0.1:8000/", Some("/api/v2/")),
            "http://127.0.0.1:8000/api/v2"
        );
    }

    #[test]
    fn backend_host_port_uses_known_default_port() {
        assert_eq!(
            backend_host_port("http://localhost/"),
            Some(("localhost".to_string(), 80))
        );
        assert_eq!(
            backend_host_port("http://127.0.0.1:8000/"),
            Some(("127.0.0.1".to_string(), 8000))
        );
    }

    #[test]
    fn parse_auto_start_only_disables_on_explicit_off_values() {
        assert!(parse_auto_start(None));
        assert!(parse_auto_start(Some("1")));
        assert!(!parse_auto_start(Some("0")));
        assert!(!parse_auto_start(Some(" False ")));
    }

    #[test]
    fn resolve_backend_timeout_uses_ceiling_for_zero_and_caps_large_values() {
        assert_eq!(
            resolve_backend_timeout(None),
            Duration::from_millis(DEFAULT_BACKEND_TIMEOUT_MS)
        );
        assert_eq!(
            resolve_backend_timeout(Some("0")),
            Duration::from_millis(BACKEND_TIMEOUT_CEILING_MS)
        );
        assert_eq!(
            resolve_backend_timeout(Some("999999999")),
            Duration::from_millis(BACKEND_TIMEOUT_CEILING_MS)
        );
        assert_eq!(resolve_backend_timeout(Some("1500")), Duration::from_millis(1500));
    }

    #[test]
    fn resolve_probe_normalizes_health_path() {
        assert_eq!(resolve_probe(None), ReadinessProbe::Tcp);
        assert_eq!(resolve_probe(Some("  ")), ReadinessProbe::Tcp);
        assert_eq!(
            resolve_probe(Some("health")),
            ReadinessProbe::Http {
                path: "/health".to_string()
            }
        );
    }
}
