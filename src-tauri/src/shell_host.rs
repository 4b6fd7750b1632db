use std::sync::Arc;

use tauri::{window::Color, AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    backend_supervisor::BackendSupervisor,
    cursor_forwarding::CursorForwarder,
    desktop_bridge,
    shell_locale::ShellTexts,
    window_coordinator::ShellHost,
    window_spec::{WindowKind, WindowSpec, WorkArea},
};

pub(crate) struct TauriShellHost {
    app_handle: AppHandle,
    supervisor: Arc<BackendSupervisor>,
    texts: ShellTexts,
    cursor_forwarder: Option<CursorForwarder>,
    log: fn(&str),
}

impl TauriShellHost {
    pub(crate) fn new(
        app_handle: AppHandle,
        supervisor: Arc<BackendSupervisor>,
        texts: ShellTexts,
        log: fn(&str),
    ) -> Self {
        Self {
            app_handle,
            supervisor,
            texts,
            cursor_forwarder: None,
            log,
        }
    }

    fn build_window(&self, spec: &WindowSpec) -> Result<(), String> {
        let mut builder = WebviewWindowBuilder::new(
            &self.app_handle,
            spec.kind.label(),
            WebviewUrl::External(spec.url.clone()),
        )
        .title(spec.title)
        .inner_size(spec.width, spec.height)
        .decorations(spec.decorations)
        .transparent(spec.transparent)
        .always_on_top(spec.always_on_top)
        .resizable(spec.resizable)
        .skip_taskbar(spec.skip_taskbar)
        .shadow(spec.shadow)
        .incognito(true)
        .initialization_script(desktop_bridge::bridge_script(&self.texts));

        if spec.transparent {
            builder = builder.background_color(Color(0, 0, 0, 0));
        }
        if let Some((x, y)) = spec.position {
            builder = builder.position(x, y);
        }
        if spec.centered {
            builder = builder.center();
        }

        builder
            .build()
            .map(|_| ())
            .map_err(|error| format!("Failed to create {} window: {error}", spec.kind.label()))
    }
}

impl ShellHost for TauriShellHost {
    fn primary_work_area(&self) -> Option<WorkArea> {
        let monitor = self.app_handle.primary_monitor().ok().flatten()?;
        let area = monitor.work_area();
        let scale = monitor.scale_factor().max(f64::EPSILON);
        Some(WorkArea {
            width: f64::from(area.size.width) / scale,
            height: f64::from(area.size.height) / scale,
        })
    }

    fn open_window(&mut self, spec: &WindowSpec) -> Result<(), String> {
        if let Some(window) = self.app_handle.get_webview_window(spec.kind.label()) {
            window
                .navigate(spec.url.clone())
                .map_err(|error| format!("Failed to navigate {} window: {error}", spec.kind.label()))?;
            let _ = window.show();
            let _ = window.set_focus();
            return Ok(());
        }

        self.build_window(spec)?;
        (self.log)(&format!("opened {} window at {}", spec.kind.label(), spec.url));
        if spec.kind == WindowKind::Overlay {
            self.cursor_forwarder = Some(CursorForwarder::start(self.app_handle.clone(), self.log));
        }
        Ok(())
    }

    fn close_window(&mut self, kind: WindowKind) -> Result<(), String> {
        if kind == WindowKind::Overlay {
            self.cursor_forwarder = None;
        }
        let Some(window) = self.app_handle.get_webview_window(kind.label()) else {
            return Ok(());
        };
        window
            .close()
            .map_err(|error| format!("Failed to close {} window: {error}", kind.label()))
    }

    fn set_click_through(&mut self, ignore: bool) -> Result<(), String> {
        let Some(window) = self.app_handle.get_webview_window(WindowKind::Overlay.label()) else {
            return Ok(());
        };
        window
            .set_ignore_cursor_events(ignore)
            .map_err(|error| format!("Failed to toggle cursor events: {error}"))?;
        if let Some(forwarder) = &self.cursor_forwarder {
            forwarder.set_click_through(ignore);
        }
        Ok(())
    }

    fn clear_browsing_data(&mut self) -> Result<(), String> {
        let mut failures = Vec::new();
        for window in self.app_handle.webview_windows().into_values() {
            if let Err(error) = window.clear_all_browsing_data() {
                failures.push(format!("{}: {error}", window.label()));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.join("; "))
        }
    }

    fn stop_backend(&mut self) {
        if self.supervisor.stop() {
            (self.log)("backend process terminated");
        }
    }

    fn toggle_devtools(&mut self, kind: WindowKind) -> Result<(), String> {
        let Some(window) = self.app_handle.get_webview_window(kind.label()) else {
            return Ok(());
        };

        #[cfg(any(debug_assertions, feature = "devtools"))]
        {
            if window.is_devtools_open() {
                window.close_devtools();
            } else {
                window.open_devtools();
            }
            Ok(())
        }

        #[cfg(not(any(debug_assertions, feature = "devtools")))]
        {
            let _ = window;
            Err("devtools are not available in this build".to_string())
        }
    }

    fn show_alert(&mut self, message: &str) {
        self.app_handle
            .dialog()
            .message(message)
            .title(self.texts.alert_title)
            .kind(MessageDialogKind::Error)
            .show(|_| {});
    }

    fn exit(&mut self, code: i32) {
        self.cursor_forwarder = None;
        self.app_handle.exit(code);
    }
}
