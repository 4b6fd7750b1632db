use serde_json::Value;

pub(crate) const SET_IGNORE_MOUSE_SIGNAL: &str = "va:set-ignore-mouse";
pub(crate) const START_CHARACTER_SIGNAL: &str = "va:start-character";
pub(crate) const LOGOUT_SIGNAL: &str = "va:logout";
pub(crate) const REQUEST_QUIT_SIGNAL: &str = "va:request-quit";
pub(crate) const TOGGLE_DEVTOOLS_SIGNAL: &str = "va:toggle-devtools";

pub(crate) const SIGNAL_NAMES: [&str; 5] = [
    SET_IGNORE_MOUSE_SIGNAL,
    START_CHARACTER_SIGNAL,
    LOGOUT_SIGNAL,
    REQUEST_QUIT_SIGNAL,
    TOGGLE_DEVTOOLS_SIGNAL,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IpcSignal {
    SetIgnoreMouse(bool),
    StartCharacter,
    Logout,
    RequestQuit,
    ToggleDevtools,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum SignalParseError {
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),
    #[error("signal '{name}' has an invalid payload: {payload}")]
    InvalidPayload { name: String, payload: String },
}

impl IpcSignal {
    pub(crate) fn name(self) -> &'static str {
        match self {
            IpcSignal::SetIgnoreMouse(_) => SET_IGNORE_MOUSE_SIGNAL,
            IpcSignal::StartCharacter => START_CHARACTER_SIGNAL,
            IpcSignal::Logout => LOGOUT_SIGNAL,
            IpcSignal::RequestQuit => REQUEST_QUIT_SIGNAL,
            IpcSignal::ToggleDevtools => TOGGLE_DEVTOOLS_SIGNAL,
        }
    }

    pub(crate) fn parse(name: &str, raw_payload: &str) -> Result<Self, SignalParseError> {
        match name {
            SET_IGNORE_MOUSE_SIGNAL => parse_ignore_flag(raw_payload)
                .map(IpcSignal::SetIgnoreMouse)
                .ok_or_else(|| SignalParseError::InvalidPayload {
                    name: name.to_string(),
                    payload: raw_payload.to_string(),
                }),
            START_CHARACTER_SIGNAL => Ok(IpcSignal::StartCharacter),
            LOGOUT_SIGNAL => Ok(IpcSignal::Logout),
            REQUEST_QUIT_SIGNAL => Ok(IpcSignal::RequestQuit),
            TOGGLE_DEVTOOLS_SIGNAL => Ok(IpcSignal::ToggleDevtools),
            other => Err(SignalParseError::UnknownSignal(other.to_string())),
        }
    }
}

fn parse_ignore_flag(raw_payload: &str) -> Option<bool> {
    match serde_json::from_str::<Value>(raw_payload).ok()? {
        Value::Bool(ignore) => Some(ignore),
        Value::Object(map) => map.get("ignore").and_then(Value::as_bool),
        Value::Array(items) => items.first().and_then(Value::as_bool),
        _ => None,
    }
}
