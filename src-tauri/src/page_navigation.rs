use std::collections::HashMap;

use url::Url;

use crate::{
    auth_client::{AuthClientError, AuthorizationUrlSource},
    oauth_provider::OAuthProvider,
    session_store::{SessionTokenStore, SessionUser},
    LOGIN_PAGE_PATH, LOGOUT_MARKER_PARAM, START_PAGE_PATH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageKind {
    Login,
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NavigationConfig {
    pub(crate) login_path: String,
    pub(crate) start_path: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: LOGIN_PAGE_PATH.to_string(),
            start_path: START_PAGE_PATH.to_string(),
        }
    }
}

impl NavigationConfig {
    pub(crate) fn page_kind(&self, path: &str) -> Option<PageKind> {
        let path = path.trim_end_matches('/');
        if path.is_empty() || path == self.login_path.trim_end_matches('/') {
            return Some(PageKind::Login);
        }
        if path == self.start_path.trim_end_matches('/') {
            return Some(PageKind::Start);
        }
        None
    }

    pub(crate) fn logout_target(&self) -> String {
        format!("{}?{}=true", self.login_path, LOGOUT_MARKER_PARAM)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageAlert {
    OAuthCallbackFailed { reason: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct PageBootstrap {
    pub(crate) alert: Option<PageAlert>,
    pub(crate) replace_url: Option<String>,
    pub(crate) navigate: Option<String>,
}

fn query_params(url: &Url) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in url.query_pairs() {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn scrubbed_location(url: &Url) -> String {
    url.path().to_string()
}

pub(crate) fn bootstrap_page(
    url: &Url,
    store: &SessionTokenStore,
    config: &NavigationConfig,
) -> PageBootstrap {
    let Some(page_kind) = config.page_kind(url.path()) else {
        return PageBootstrap::default();
    };
    let params = query_params(url);
    let mut outcome = PageBootstrap::default();

    if let Some(reason) = params.get("error") {
        outcome.alert = Some(PageAlert::OAuthCallbackFailed {
            reason: reason.clone(),
        });
        outcome.replace_url = Some(scrubbed_location(url));
        return outcome;
    }

    if let (Some(access_token), Some(refresh_token)) = (
        non_empty(&params, "access_token"),
        non_empty(&params, "refresh_token"),
    ) {
        let user = SessionUser {
            email: non_empty(&params, "user").map(str::to_string),
            name: non_empty(&params, "name").map(str::to_string),
        };
        store.set_tokens(access_token, refresh_token, &user);
        outcome.replace_url = Some(scrubbed_location(url));
    }

    if !store.is_logged_in() {
        if page_kind != PageKind::Login {
            outcome.navigate = Some(config.login_path.clone());
        }
    } else if page_kind == PageKind::Login && !params.contains_key(LOGOUT_MARKER_PARAM) {
        outcome.navigate = Some(config.start_path.clone());
    }

    outcome
}

pub(crate) fn begin_provider_login<S>(
    provider: OAuthProvider,
    store: &SessionTokenStore,
    source: &S,
) -> Result<String, AuthClientError>
where
    S: AuthorizationUrlSource + ?Sized,
{
    store.clear();
    source.authorization_url(provider)
}

pub(crate) fn logout(store: &SessionTokenStore, config: &NavigationConfig) -> String {
    store.clear();
    config.logout_target()
}
