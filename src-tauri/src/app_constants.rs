pub(crate) const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/";
pub(crate) const DEFAULT_BACKEND_API_PREFIX: &str = "/api/v1";
pub(crate) const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 20_000;
pub(crate) const BACKEND_TIMEOUT_CEILING_MS: u64 = 5 * 60 * 1000;
pub(crate) const DEFAULT_BACKEND_POLL_INTERVAL_MS: u64 = 600;
pub(crate) const BACKEND_PROBE_TIMEOUT_MS: u64 = 800;
pub(crate) const BACKEND_EXIT_WATCH_INTERVAL_MS: u64 = 500;
pub(crate) const AUTH_REQUEST_TIMEOUT_MS: u64 = 10_000;

pub(crate) const BACKEND_URL_ENV: &str = "VA_BACKEND_URL";
pub(crate) const BACKEND_CMD_ENV: &str = "VA_BACKEND_CMD";
pub(crate) const BACKEND_CWD_ENV: &str = "VA_BACKEND_CWD";
pub(crate) const BACKEND_AUTO_START_ENV: &str = "VA_BACKEND_AUTO_START";
pub(crate) const BACKEND_TIMEOUT_ENV: &str = "VA_BACKEND_TIMEOUT_MS";
pub(crate) const BACKEND_POLL_INTERVAL_ENV: &str = "VA_BACKEND_POLL_INTERVAL_MS";
pub(crate) const BACKEND_HEALTH_PATH_ENV: &str = "VA_BACKEND_HEALTH_PATH";
pub(crate) const BACKEND_API_PREFIX_ENV: &str = "VA_BACKEND_API_PREFIX";
pub(crate) const DESKTOP_LOCALE_ENV: &str = "VA_DESKTOP_LOCALE";
pub(crate) const DESKTOP_ROOT_ENV: &str = "VA_DESKTOP_ROOT";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DEFAULT_SHELL_LOCALE: &str = "ko-KR";

pub(crate) const LOGIN_WINDOW_LABEL: &str = "login";
pub(crate) const OVERLAY_WINDOW_LABEL: &str = "overlay";
pub(crate) const LOGIN_PAGE_PATH: &str = "/login";
pub(crate) const START_PAGE_PATH: &str = "/start";
pub(crate) const OVERLAY_PAGE_PATH: &str = "/main";
pub(crate) const LOGOUT_MARKER_PARAM: &str = "logout";

pub(crate) const CURSOR_POSITION_EVENT: &str = "va:cursor-position";
pub(crate) const CURSOR_FORWARD_INTERVAL_MS: u64 = 40;

pub(crate) const TRAY_ID: &str = "va-tray";
