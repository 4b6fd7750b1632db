use tauri::{Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_shutdown_log, append_startup_log,
    coordinator_runtime::{self, CoordinatorHandle},
    startup_task, tray_setup,
    window_coordinator::CoordinatorEvent,
    window_spec::WindowKind,
    DesktopState, DESKTOP_LOG_FILE,
};

fn send_to_coordinator(app_handle: &tauri::AppHandle, event: CoordinatorEvent) {
    match app_handle.try_state::<CoordinatorHandle>() {
        Some(coordinator) => coordinator.send(event),
        None => append_desktop_log(&format!("{event:?} arrived before the coordinator started")),
    }
}

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::logging::resolve_desktop_log_path(
            crate::runtime_paths::default_app_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _argv, _cwd| {
            append_desktop_log("second instance launched, focusing existing shell");
            for window in app_handle.webview_windows().values() {
                let _ = window.set_focus();
            }
            send_to_coordinator(app_handle, CoordinatorEvent::Reopen);
        }))
        .plugin(tauri_plugin_dialog::init())
        .manage(DesktopState::default())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_get_backend_state,
            crate::desktop_bridge_commands::desktop_bridge_page_bootstrap,
            crate::desktop_bridge_commands::desktop_bridge_begin_login,
            crate::desktop_bridge_commands::desktop_bridge_logout,
            crate::desktop_bridge_commands::desktop_bridge_get_session,
        ])
        .on_window_event(|window, event| {
            if let WindowEvent::Destroyed = event {
                if let Some(kind) = WindowKind::from_label(window.label()) {
                    append_desktop_log(&format!("{} window destroyed", kind.label()));
                    send_to_coordinator(window.app_handle(), CoordinatorEvent::WindowDestroyed(kind));
                }
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            {
                let state = app_handle.state::<DesktopState>();
                append_startup_log(&format!(
                    "backend url: {} api base: {} locale: {}",
                    state.backend_url, state.api_base_url, state.shell_locale
                ));
            }

            if let Err(error) = tray_setup::setup_tray(&app_handle) {
                append_startup_log(&format!("failed to initialize tray: {error}"));
            }

            let coordinator = coordinator_runtime::spawn_coordinator(&app_handle, append_desktop_log)?;
            coordinator_runtime::register_ipc_relay(&app_handle, &coordinator);
            app_handle.manage(coordinator.clone());

            startup_task::spawn_startup_task(app_handle, coordinator, append_startup_log);
            Ok(())
        })
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(error) => {
            append_startup_log(&format!("failed to build tauri application: {error}"));
            std::process::exit(1);
        }
    };

    app.run(|app_handle, event| match event {
        RunEvent::ExitRequested { code: None, api, .. } => {
            api.prevent_exit();
            send_to_coordinator(app_handle, CoordinatorEvent::AllWindowsClosed);
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            send_to_coordinator(app_handle, CoordinatorEvent::Reopen);
        }
        RunEvent::Exit => {
            let state = app_handle.state::<DesktopState>();
            if state.supervisor.stop() {
                append_shutdown_log("backend stopped on exit");
            }
            state.session.clear();
            append_shutdown_log("desktop process exiting");
        }
        _ => {}
    });
}
