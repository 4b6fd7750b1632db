use std::time::Duration;

use serde::Deserialize;

use crate::{oauth_provider::OAuthProvider, AUTH_REQUEST_TIMEOUT_MS};

#[derive(Debug, thiserror::Error)]
pub(crate) enum AuthClientError {
    #[error("authorization request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("authorization request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("authorization response from {url} is not valid JSON: {message}")]
    InvalidBody { url: String, message: String },
    #[error("authorization response from {url} has no authorization_url")]
    MissingAuthorizationUrl { url: String },
}

#[derive(Debug, Deserialize)]
struct AuthorizationUrlResponse {
    authorization_url: Option<String>,
}

pub(crate) trait AuthorizationUrlSource {
    fn authorization_url(&self, provider: OAuthProvider) -> Result<String, AuthClientError>;
}

#[derive(Debug, Clone)]
pub(crate) struct BackendAuthClient {
    api_base_url: String,
    timeout: Duration,
}

impl BackendAuthClient {
    pub(crate) fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(AUTH_REQUEST_TIMEOUT_MS),
        }
    }

    pub(crate) fn login_endpoint(&self, provider: OAuthProvider) -> String {
        format!("{}/auth/{}/login", self.api_base_url, provider.as_str())
    }
}

fn parse_authorization_url(url: &str, body: &str) -> Result<String, AuthClientError> {
    let parsed: AuthorizationUrlResponse =
        serde_json::from_str(body).map_err(|error| AuthClientError::InvalidBody {
            url: url.to_string(),
            message: error.to_string(),
        })?;
    parsed
        .authorization_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AuthClientError::MissingAuthorizationUrl {
            url: url.to_string(),
        })
}

impl AuthorizationUrlSource for BackendAuthClient {
    fn authorization_url(&self, provider: OAuthProvider) -> Result<String, AuthClientError> {
        let url = self.login_endpoint(provider);
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent.get(&url).call().map_err(|error| match error {
            ureq::Error::Status(status, _) => AuthClientError::Status {
                url: url.clone(),
                status,
            },
            ureq::Error::Transport(transport) => AuthClientError::Transport {
                url: url.clone(),
                message: transport.to_string(),
            },
        })?;
        let body = response
            .into_string()
            .map_err(|error| AuthClientError::Transport {
                url: url.clone(),
                message: error.to_string(),
            })?;
        parse_authorization_url(&url, &body)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    use super::*;

    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let base = format!("http://127.0.0.1:{}/api/v1", listener.local_addr().unwrap().port());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept request");
            let mut buffer = [0_u8; 2048];
            let read = stream.read(&mut buffer).unwrap_or(0);
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            String::from_utf8_lossy(&buffer[..read]).to_string()
        });
        (base, handle)
    }

    #[test]
    fn login_endpoint_includes_provider_segment() {
        let client = BackendAuthClient::new("http://127.0.0.1:8000/api/v1/");
        assert_eq!(
            client.login_endpoint(OAuthProvider::Kakao),
            "http://127.0.0.1:8000/api/v1/auth/kakao/login"
        );
    }

    #[test]
    fn parse_authorization_url_rejects_missing_or_blank_value() {
        assert!(matches!(
            parse_authorization_url("u", "{}"),
            Err(AuthClientError::MissingAuthorizationUrl { .. })
        ));
        assert!(matches!(
            parse_authorization_url("u", r#"{"authorization_url": "  "}"#),
            Err(AuthClientError::MissingAuthorizationUrl { .. })
        ));
        assert!(matches!(
            parse_authorization_url("u", "<html>"),
            Err(AuthClientError::InvalidBody { .. })
        ));
    }

    #[test]
    fn authorization_url_fetches_from_backend() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"authorization_url":"https://accounts.google.com/o/oauth2/auth?x=1"}"#,
        );
        let client = BackendAuthClient::new(&base);

        let url = client
            .authorization_url(OAuthProvider::Google)
            .expect("authorization url");
        assert_eq!(url, "https://accounts.google.com/o/oauth2/auth?x=1");

        let request = server.join().expect("server thread");
        assert!(request.starts_with("GET /api/v1/auth/google/login "));
    }

    #[test]
    fn authorization_url_maps_error_status() {
        let (base, server) = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let client = BackendAuthClient::new(&base);

        let error = client
            .authorization_url(OAuthProvider::Naver)
            .expect_err("server error");
        assert!(matches!(error, AuthClientError::Status { status: 500, .. }));
        server.join().expect("server thread");
    }
}
