use std::{
    sync::{
        mpsc::{self, Sender},
        Arc,
    },
    thread,
};

use tauri::{AppHandle, Listener, Manager};

use crate::{
    ipc_signal::{IpcSignal, SIGNAL_NAMES},
    shell_host::TauriShellHost,
    shell_locale,
    window_coordinator::{CoordinatorConfig, CoordinatorEvent, LifecycleState, WindowCoordinator},
    DesktopState,
};

#[derive(Debug, Clone)]
pub(crate) struct CoordinatorHandle {
    sender: Sender<CoordinatorEvent>,
    log: fn(&str),
}

impl CoordinatorHandle {
    pub(crate) fn send(&self, event: CoordinatorEvent) {
        if self.sender.send(event).is_err() {
            (self.log)(&format!("coordinator is gone, dropping event {event:?}"));
        }
    }
}

pub(crate) fn quits_when_all_windows_closed() -> bool {
    !cfg!(target_os = "macos")
}

fn run_event_loop<H>(
    mut coordinator: WindowCoordinator<H>,
    events: mpsc::Receiver<CoordinatorEvent>,
    log: fn(&str),
) where
    H: crate::window_coordinator::ShellHost,
{
    for event in events {
        match coordinator.handle(event) {
            Ok(LifecycleState::Terminated) => {
                log(&format!("{event:?} handled, application terminated"));
            }
            Ok(state) => log(&format!("{event:?} handled, state is now {state:?}")),
            Err(error) => log(&format!("coordinator rejected {event:?}: {error}")),
        }
    }
}

pub(crate) fn spawn_coordinator(
    app_handle: &AppHandle,
    log: fn(&str),
) -> Result<CoordinatorHandle, String> {
    let state = app_handle.state::<DesktopState>();
    let texts = shell_locale::shell_texts_for_locale(state.shell_locale);
    let host = TauriShellHost::new(
        app_handle.clone(),
        Arc::clone(&state.supervisor),
        texts,
        log,
    );
    let config = CoordinatorConfig {
        backend_url: state.backend_url.clone(),
        quit_when_all_windows_closed: quits_when_all_windows_closed(),
        texts,
    };
    let coordinator = WindowCoordinator::new(host, config, Arc::clone(&state.session), log);

    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name("va-coordinator".to_string())
        .spawn(move || run_event_loop(coordinator, receiver, log))
        .map_err(|error| format!("Failed to start coordinator thread: {error}"))?;

    Ok(CoordinatorHandle { sender, log })
}

pub(crate) fn register_ipc_relay(app_handle: &AppHandle, handle: &CoordinatorHandle) {
    for name in SIGNAL_NAMES {
        let handle = handle.clone();
        app_handle.listen_any(name, move |event| {
            match IpcSignal::parse(name, event.payload()) {
                Ok(signal) => handle.send(CoordinatorEvent::Signal(signal)),
                Err(error) => (handle.log)(&format!("ignored page signal: {error}")),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        session_store::SessionTokenStore,
        shell_locale::shell_texts_for_locale,
        window_spec::{WindowKind, WindowSpec, WorkArea},
        window_coordinator::ShellHost,
    };

    static OPENED: Mutex<Vec<WindowKind>> = Mutex::new(Vec::new());

    fn quiet(_: &str) {}

    #[derive(Default)]
    struct CountingHost;

    impl ShellHost for CountingHost {
        fn primary_work_area(&self) -> Option<WorkArea> {
            None
        }
        fn open_window(&mut self, spec: &WindowSpec) -> Result<(), String> {
            OPENED.lock().expect("opened lock").push(spec.kind);
            Ok(())
        }
        fn close_window(&mut self, _kind: WindowKind) -> Result<(), String> {
            Ok(())
        }
        fn set_click_through(&mut self, _ignore: bool) -> Result<(), String> {
            Ok(())
        }
        fn clear_browsing_data(&mut self) -> Result<(), String> {
            Ok(())
        }
        fn stop_backend(&mut self) {}
        fn toggle_devtools(&mut self, _kind: WindowKind) -> Result<(), String> {
            Ok(())
        }
        fn show_alert(&mut self, _message: &str) {}
        fn exit(&mut self, _code: i32) {}
    }

    #[test]
    fn event_loop_applies_events_in_arrival_order_until_senders_drop() {
        let coordinator = WindowCoordinator::new(
            CountingHost,
            CoordinatorConfig {
                backend_url: "http://127.0.0.1:8000/".to_string(),
                quit_when_all_windows_closed: true,
                texts: shell_texts_for_locale("en-US"),
            },
            Arc::new(SessionTokenStore::default()),
            quiet,
        );
        let (sender, receiver) = mpsc::channel();
        let handle = CoordinatorHandle { sender, log: quiet };

        handle.send(CoordinatorEvent::Start);
        handle.send(CoordinatorEvent::Signal(IpcSignal::StartCharacter));
        handle.send(CoordinatorEvent::Signal(IpcSignal::Logout));
        drop(handle);

        run_event_loop(coordinator, receiver, quiet);

        assert_eq!(
            *OPENED.lock().expect("opened lock"),
            vec![WindowKind::Login, WindowKind::Overlay, WindowKind::Login]
        );
    }

    #[test]
    fn send_after_coordinator_exit_is_logged_not_panicking() {
        let (sender, receiver) = mpsc::channel();
        drop(receiver);
        let handle = CoordinatorHandle { sender, log: quiet };
        handle.send(CoordinatorEvent::Reopen);
    }
}
