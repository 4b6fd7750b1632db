use std::sync::Arc;

use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use url::Url;

use crate::{
    append_desktop_log,
    auth_client::BackendAuthClient,
    oauth_provider::OAuthProvider,
    page_navigation::{self, NavigationConfig, PageAlert},
    session_store::Session,
    shell_locale::{self, ShellTexts},
    BackendBridgeResult, DesktopState, LoginStartResult, LogoutResult, PageBootstrapResult,
};

fn show_page_alert(app_handle: &AppHandle, texts: &ShellTexts, message: &str) {
    app_handle
        .dialog()
        .message(message)
        .title(texts.alert_title)
        .kind(MessageDialogKind::Warning)
        .show(|_| {});
}

fn login_failure(reason: String) -> LoginStartResult {
    LoginStartResult {
        ok: false,
        authorization_url: None,
        reason: Some(reason),
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_backend_state(app_handle: AppHandle) -> BackendBridgeResult {
    let state = app_handle.state::<DesktopState>();
    let startup_error = state
        .startup_error
        .lock()
        .ok()
        .and_then(|guard| guard.clone());
    BackendBridgeResult {
        ok: startup_error.is_none(),
        reason: startup_error,
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_page_bootstrap(
    app_handle: AppHandle,
    url: String,
) -> Result<PageBootstrapResult, String> {
    let page_url = Url::parse(url.trim()).map_err(|error| format!("Invalid page URL: {error}"))?;
    let state = app_handle.state::<DesktopState>();
    let outcome =
        page_navigation::bootstrap_page(&page_url, &state.session, &NavigationConfig::default());

    if let Some(PageAlert::OAuthCallbackFailed { reason }) = &outcome.alert {
        append_desktop_log(&format!("oauth callback reported an error: {reason}"));
        let texts = shell_locale::shell_texts_for_locale(state.shell_locale);
        show_page_alert(&app_handle, &texts, texts.oauth_callback_failed);
    }

    Ok(PageBootstrapResult {
        replace_url: outcome.replace_url,
        navigate: outcome.navigate,
    })
}

#[tauri::command]
pub(crate) async fn desktop_bridge_begin_login(
    app_handle: AppHandle,
    provider: String,
) -> LoginStartResult {
    let provider = match provider.parse::<OAuthProvider>() {
        Ok(provider) => provider,
        Err(error) => {
            append_desktop_log(&format!("login rejected: {error}"));
            let state = app_handle.state::<DesktopState>();
            let texts = shell_locale::shell_texts_for_locale(state.shell_locale);
            show_page_alert(&app_handle, &texts, texts.login_request_failed);
            return login_failure(error);
        }
    };

    let (session, api_base_url, texts) = {
        let state = app_handle.state::<DesktopState>();
        (
            Arc::clone(&state.session),
            state.api_base_url.clone(),
            shell_locale::shell_texts_for_locale(state.shell_locale),
        )
    };

    let fetch = tauri::async_runtime::spawn_blocking(move || {
        let client = BackendAuthClient::new(&api_base_url);
        page_navigation::begin_provider_login(provider, &session, &client)
    })
    .await;

    let reason = match fetch {
        Ok(Ok(authorization_url)) => {
            append_desktop_log(&format!("{provider} login redirect resolved"));
            return LoginStartResult {
                ok: true,
                authorization_url: Some(authorization_url),
                reason: None,
            };
        }
        Ok(Err(error)) => error.to_string(),
        Err(error) => format!("login task failed: {error}"),
    };

    append_desktop_log(&format!("{provider} login failed: {reason}"));
    show_page_alert(
        &app_handle,
        &texts,
        &texts.provider_login_failed_message(provider),
    );
    login_failure(reason)
}

#[tauri::command]
pub(crate) async fn desktop_bridge_logout(app_handle: AppHandle) -> LogoutResult {
    let texts = {
        let state = app_handle.state::<DesktopState>();
        shell_locale::shell_texts_for_locale(state.shell_locale)
    };

    let confirmed = app_handle
        .dialog()
        .message(texts.logout_confirm)
        .title(texts.logout_confirm_title)
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::OkCancel)
        .blocking_show();
    if !confirmed {
        return LogoutResult {
            confirmed: false,
            navigate: None,
        };
    }

    let state = app_handle.state::<DesktopState>();
    let navigate = page_navigation::logout(&state.session, &NavigationConfig::default());
    append_desktop_log("page logout confirmed, session cleared");
    LogoutResult {
        confirmed: true,
        navigate: Some(navigate),
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_session(app_handle: AppHandle) -> Option<Session> {
    app_handle.state::<DesktopState>().session.get_tokens()
}
