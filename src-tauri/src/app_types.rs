use std::{
    env,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::{
    backend_config, backend_supervisor::BackendSupervisor, session_store::SessionTokenStore,
    BACKEND_URL_ENV, DEFAULT_BACKEND_URL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
}

#[derive(Debug)]
pub(crate) struct DesktopState {
    pub(crate) backend_url: String,
    pub(crate) api_base_url: String,
    pub(crate) supervisor: Arc<BackendSupervisor>,
    pub(crate) session: Arc<SessionTokenStore>,
    pub(crate) shell_locale: &'static str,
    pub(crate) startup_error: Mutex<Option<String>>,
}

impl DesktopState {
    pub(crate) fn record_startup_error(&self, error: &str) {
        if let Ok(mut guard) = self.startup_error.lock() {
            *guard = Some(error.to_string());
        }
    }
}

impl Default for DesktopState {
    fn default() -> Self {
        let raw_backend_url =
            env::var(BACKEND_URL_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let backend_url = match backend_config::parse_backend_url(&raw_backend_url) {
            Some(backend_url) => backend_url,
            None => {
                crate::append_startup_log(&format!(
                    "{BACKEND_URL_ENV}={raw_backend_url} is not a loopback http(s) URL, using {DEFAULT_BACKEND_URL}"
                ));
                DEFAULT_BACKEND_URL.to_string()
            }
        };
        let api_base_url = backend_config::resolve_api_base_url(
            &backend_url,
            env::var(crate::BACKEND_API_PREFIX_ENV).ok().as_deref(),
        );
        Self {
            backend_url,
            api_base_url,
            supervisor: Arc::new(BackendSupervisor::default()),
            session: Arc::new(SessionTokenStore::default()),
            shell_locale: crate::shell_locale::resolve_shell_locale(crate::DEFAULT_SHELL_LOCALE),
            startup_error: Mutex::new(None),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BackendBridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

#[derive(Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageBootstrapResult {
    pub(crate) replace_url: Option<String>,
    pub(crate) navigate: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginStartResult {
    pub(crate) ok: bool,
    pub(crate) authorization_url: Option<String>,
    pub(crate) reason: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogoutResult {
    pub(crate) confirmed: bool,
    pub(crate) navigate: Option<String>,
}
