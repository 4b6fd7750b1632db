use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use tauri::{AppHandle, Emitter, Manager};

use crate::{CURSOR_FORWARD_INTERVAL_MS, CURSOR_POSITION_EVENT, OVERLAY_WINDOW_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub(crate) struct CursorPosition {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

/// Converts a physical screen position into logical client coordinates of a window,
/// or `None` when the cursor is outside the window.
pub(crate) fn client_position(
    cursor: (f64, f64),
    window_origin: (f64, f64),
    window_size: (f64, f64),
    scale_factor: f64,
) -> Option<CursorPosition> {
    let local_x = cursor.0 - window_origin.0;
    let local_y = cursor.1 - window_origin.1;
    if local_x < 0.0 || local_y < 0.0 || local_x >= window_size.0 || local_y >= window_size.1 {
        return None;
    }
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    Some(CursorPosition {
        x: local_x / scale,
        y: local_y / scale,
    })
}

#[derive(Debug)]
pub(crate) struct CursorForwarder {
    stop: Arc<AtomicBool>,
    click_through: Arc<AtomicBool>,
}

impl CursorForwarder {
    pub(crate) fn start(app_handle: AppHandle, log: fn(&str)) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let click_through = Arc::new(AtomicBool::new(true));
        let thread_stop = Arc::clone(&stop);
        let thread_click_through = Arc::clone(&click_through);

        let spawn_result = thread::Builder::new()
            .name("va-cursor-forwarder".to_string())
            .spawn(move || {
                let mut last_sent: Option<CursorPosition> = None;
                while !thread_stop.load(Ordering::Acquire) {
                    thread::sleep(Duration::from_millis(CURSOR_FORWARD_INTERVAL_MS));
                    if !thread_click_through.load(Ordering::Acquire) {
                        last_sent = None;
                        continue;
                    }
                    let Some(window) = app_handle.get_webview_window(OVERLAY_WINDOW_LABEL) else {
                        return;
                    };
                    let (Ok(cursor), Ok(origin), Ok(size), Ok(scale)) = (
                        window.cursor_position(),
                        window.inner_position(),
                        window.inner_size(),
                        window.scale_factor(),
                    ) else {
                        continue;
                    };
                    let position = client_position(
                        (cursor.x, cursor.y),
                        (f64::from(origin.x), f64::from(origin.y)),
                        (f64::from(size.width), f64::from(size.height)),
                        scale,
                    );
                    let Some(position) = position else {
                        continue;
                    };
                    if last_sent == Some(position) {
                        continue;
                    }
                    if let Err(error) =
                        app_handle.emit_to(OVERLAY_WINDOW_LABEL, CURSOR_POSITION_EVENT, position)
                    {
                        log(&format!("failed to forward cursor position: {error}"));
                        return;
                    }
                    last_sent = Some(position);
                }
            });
        if let Err(error) = spawn_result {
            log(&format!("failed to start cursor forwarder: {error}"));
        }

        Self {
            stop,
            click_through,
        }
    }

    pub(crate) fn set_click_through(&self, ignore: bool) {
        self.click_through.store(ignore, Ordering::Release);
    }
}

impl Drop for CursorForwarder {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}
