use crate::shell_locale::ShellTexts;

const BRIDGE_SCRIPT_TEMPLATE: &str = include_str!("desktop_bridge.js");
const SIGNAL_FAILED_PLACEHOLDER: &str = "__VA_SIGNAL_FAILED_MESSAGE__";
const LOGIN_FAILED_PLACEHOLDER: &str = "__VA_LOGIN_FAILED_MESSAGE__";
const DEVTOOLS_ENABLED_PLACEHOLDER: &str = "__VA_DEVTOOLS_ENABLED__";

fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

pub(crate) fn devtools_enabled() -> bool {
    cfg!(any(debug_assertions, feature = "devtools"))
}

pub(crate) fn bridge_script(texts: &ShellTexts) -> String {
    BRIDGE_SCRIPT_TEMPLATE
        .replace(SIGNAL_FAILED_PLACEHOLDER, &js_string(texts.start_character_failed))
        .replace(LOGIN_FAILED_PLACEHOLDER, &js_string(texts.login_request_failed))
        .replace(
            DEVTOOLS_ENABLED_PLACEHOLDER,
            if devtools_enabled() { "true" } else { "false" },
        )
}
