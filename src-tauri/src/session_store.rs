use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};

pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
pub(crate) const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub(crate) const USER_KEY: &str = "user";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SessionUser {
    pub(crate) email: Option<String>,
    pub(crate) name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Session {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
    pub(crate) user: Option<SessionUser>,
}

#[derive(Debug, Default)]
pub(crate) struct SessionTokenStore {
    entries: Mutex<BTreeMap<&'static str, String>>,
}

impl SessionTokenStore {
    fn entries(&self) -> MutexGuard<'_, BTreeMap<&'static str, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn set_tokens(&self, access_token: &str, refresh_token: &str, user: &SessionUser) {
        let user_json = serde_json::to_string(user).unwrap_or_else(|_| "{}".to_string());
        let mut entries = self.entries();
        entries.insert(ACCESS_TOKEN_KEY, access_token.to_string());
        entries.insert(REFRESH_TOKEN_KEY, refresh_token.to_string());
        entries.insert(USER_KEY, user_json);
    }

    pub(crate) fn get_tokens(&self) -> Option<Session> {
        let entries = self.entries();
        let access_token = entries.get(ACCESS_TOKEN_KEY)?.clone();
        let refresh_token = entries.get(REFRESH_TOKEN_KEY)?.clone();
        let user = entries
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str::<SessionUser>(raw).ok());
        Some(Session {
            access_token,
            refresh_token,
            user,
        })
    }

    pub(crate) fn clear(&self) {
        let mut entries = self.entries();
        entries.remove(ACCESS_TOKEN_KEY);
        entries.remove(REFRESH_TOKEN_KEY);
        entries.remove(USER_KEY);
    }

    pub(crate) fn is_logged_in(&self) -> bool {
        self.entries()
            .get(ACCESS_TOKEN_KEY)
            .is_some_and(|token| !token.is_empty())
    }
}
