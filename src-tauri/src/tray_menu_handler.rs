use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, append_shutdown_log,
    coordinator_runtime::CoordinatorHandle,
    ipc_signal::IpcSignal,
    tray_actions::{self, TrayMenuAction},
    window_coordinator::CoordinatorEvent,
};

fn event_for_action(action: TrayMenuAction) -> CoordinatorEvent {
    match action {
        TrayMenuAction::Logout => CoordinatorEvent::Signal(IpcSignal::Logout),
        TrayMenuAction::Quit => CoordinatorEvent::Signal(IpcSignal::RequestQuit),
    }
}

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    let Some(action) = tray_actions::action_from_menu_id(menu_id) else {
        return;
    };
    let Some(coordinator) = app_handle.try_state::<CoordinatorHandle>() else {
        append_desktop_log(&format!("tray action {action:?} ignored: coordinator not running"));
        return;
    };

    match action {
        TrayMenuAction::Logout => append_desktop_log("tray logout requested"),
        TrayMenuAction::Quit => append_shutdown_log("tray quit requested"),
    }
    coordinator.send(event_for_action(action));
}

pub fn handle_tray_icon_click(app_handle: &AppHandle) {
    if let Some(coordinator) = app_handle.try_state::<CoordinatorHandle>() {
        coordinator.send(CoordinatorEvent::Reopen);
    }
}
