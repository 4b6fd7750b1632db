#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod auth_client;
mod backend_config;
mod backend_readiness;
mod backend_supervisor;
mod coordinator_runtime;
mod cursor_forwarding;
mod desktop_bridge;
mod desktop_bridge_commands;
mod ipc_signal;
mod launch_plan;
mod logging;
mod oauth_provider;
mod page_navigation;
mod process_control;
mod runtime_paths;
mod session_store;
mod shell_host;
mod shell_locale;
mod startup_task;
mod tray_actions;
mod tray_menu_handler;
mod tray_setup;
mod window_coordinator;
mod window_spec;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    BackendBridgeResult, DesktopState, LaunchPlan, LoginStartResult, LogoutResult,
    PageBootstrapResult,
};
pub(crate) use logging::{append_desktop_log, append_shutdown_log, append_startup_log};

fn main() {
    app_runtime::run();
}
