use std::env;

use crate::{oauth_provider::OAuthProvider, DESKTOP_LOCALE_ENV};

#[derive(Debug, Clone, Copy)]
pub struct ShellTexts {
    pub alert_title: &'static str,
    pub oauth_callback_failed: &'static str,
    pub provider_login_failed: &'static str,
    pub start_character_failed: &'static str,
    pub login_window_failed: &'static str,
    pub login_request_failed: &'static str,
    pub logout_confirm_title: &'static str,
    pub logout_confirm: &'static str,
    pub tray_logout: &'static str,
    pub tray_quit: &'static str,
}

impl ShellTexts {
    pub fn provider_login_failed_message(&self, provider: OAuthProvider) -> String {
        self.provider_login_failed
            .replace("{provider}", provider.display_name())
    }
}

pub fn shell_texts_for_locale(locale: &str) -> ShellTexts {
    if locale == "en-US" {
        return ShellTexts {
            alert_title: "Virtual Assistant",
            oauth_callback_failed: "Login was cancelled or failed.",
            provider_login_failed:
                "Something went wrong while signing in with {provider}. Please try again.",
            start_character_failed: "Unable to open the character window.",
            login_window_failed: "Unable to open the login window.",
            login_request_failed: "Unable to start the login. Please try again.",
            logout_confirm_title: "Log out",
            logout_confirm: "Do you really want to log out?",
            tray_logout: "Log out",
            tray_quit: "Quit",
        };
    }

    ShellTexts {
        alert_title: "가상 비서",
        oauth_callback_failed: "로그인이 취소되었거나 오류가 발생했습니다.",
        provider_login_failed: "{provider} 로그인 중 오류가 발생했습니다. 다시 시도해주세요.",
        start_character_failed: "캐릭터 창을 열 수 없습니다.",
        login_window_failed: "로그인 창을 열 수 없습니다.",
        login_request_failed: "로그인을 시작할 수 없습니다. 다시 시도해주세요.",
        logout_confirm_title: "로그아웃",
        logout_confirm: "정말 로그아웃하시겠습니까?",
        tray_logout: "로그아웃",
        tray_quit: "종료",
    }
}

pub fn resolve_shell_locale(default_shell_locale: &'static str) -> &'static str {
    for env_key in [DESKTOP_LOCALE_ENV, "LC_ALL", "LANG"] {
        if let Ok(value) = env::var(env_key) {
            if let Some(locale) = normalize_shell_locale(&value) {
                return locale;
            }
        }
    }

    default_shell_locale
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw == "ko-KR" {
        return Some("ko-KR");
    }
    if raw == "en-US" {
        return Some("en-US");
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("ko") {
        return Some("ko-KR");
    }
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_texts_for_locale_returns_english_copy() {
        let texts = shell_texts_for_locale("en-US");
        assert_eq!(texts.tray_quit, "Quit");
        assert_eq!(texts.login_window_failed, "Unable to open the login window.");
        assert_eq!(
            texts.login_request_failed,
            "Unable to start the login. Please try again."
        );
        assert_eq!(
            texts.provider_login_failed_message(OAuthProvider::Google),
            "Something went wrong while signing in with Google. Please try again."
        );
    }

    #[test]
    fn shell_texts_for_locale_falls_back_to_korean_copy() {
        let texts = shell_texts_for_locale("ko-KR");
        assert_eq!(texts.tray_quit, "종료");
        assert!(!texts.login_request_failed.is_empty());
        assert_eq!(
            texts.provider_login_failed_message(OAuthProvider::Kakao),
            "Kakao 로그인 중 오류가 발생했습니다. 다시 시도해주세요."
        );
    }

    #[test]
    fn normalize_shell_locale_accepts_language_prefixes() {
        assert_eq!(normalize_shell_locale("EN_us.UTF-8"), Some("en-US"));
        assert_eq!(normalize_shell_locale("ko_KR.UTF-8"), Some("ko-KR"));
        assert_eq!(normalize_shell_locale("fr-FR"), None);
        assert_eq!(normalize_shell_locale(""), None);
    }
}
