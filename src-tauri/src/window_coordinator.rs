//! `NoWindow -> LoginVisible -> OverlayVisible -> LoginVisible ... -> Terminated`.

use std::{collections::HashSet, sync::Arc};

use crate::{
    ipc_signal::IpcSignal,
    session_store::SessionTokenStore,
    shell_locale::ShellTexts,
    window_spec::{self, WindowKind, WindowSpec, WorkArea},
};

pub(crate) trait ShellHost {
    fn primary_work_area(&self) -> Option<WorkArea>;
    fn open_window(&mut self, spec: &WindowSpec) -> Result<(), String>;
    fn close_window(&mut self, kind: WindowKind) -> Result<(), String>;
    fn set_click_through(&mut self, ignore: bool) -> Result<(), String>;
    fn clear_browsing_data(&mut self) -> Result<(), String>;
    fn stop_backend(&mut self);
    fn toggle_devtools(&mut self, kind: WindowKind) -> Result<(), String>;
    fn show_alert(&mut self, message: &str);
    fn exit(&mut self, code: i32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleState {
    NoWindow,
    LoginVisible,
    OverlayVisible,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoordinatorEvent {
    Start,
    Signal(IpcSignal),
    WindowDestroyed(WindowKind),
    AllWindowsClosed,
    Reopen,
}

impl CoordinatorEvent {
    fn describe(self) -> &'static str {
        match self {
            CoordinatorEvent::Start => "start",
            CoordinatorEvent::Signal(signal) => signal.name(),
            CoordinatorEvent::WindowDestroyed(_) => "window-destroyed",
            CoordinatorEvent::AllWindowsClosed => "all-windows-closed",
            CoordinatorEvent::Reopen => "reopen",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum CoordinatorError {
    #[error("event '{event}' is not valid in state {state:?}")]
    InvalidTransition {
        state: LifecycleState,
        event: &'static str,
    },
    #[error("failed to open {kind:?} window: {reason}")]
    WindowOpen { kind: WindowKind, reason: String },
}

#[derive(Debug, Clone)]
pub(crate) struct CoordinatorConfig {
    pub(crate) backend_url: String,
    pub(crate) quit_when_all_windows_closed: bool,
    pub(crate) texts: ShellTexts,
}

pub(crate) struct WindowCoordinator<H: ShellHost> {
    host: H,
    config: CoordinatorConfig,
    session: Arc<SessionTokenStore>,
    state: LifecycleState,
    open_windows: HashSet<WindowKind>,
    log: fn(&str),
}

impl<H: ShellHost> WindowCoordinator<H> {
    pub(crate) fn new(
        host: H,
        config: CoordinatorConfig,
        session: Arc<SessionTokenStore>,
        log: fn(&str),
    ) -> Self {
        Self {
            host,
            config,
            session,
            state: LifecycleState::NoWindow,
            open_windows: HashSet::new(),
            log,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> LifecycleState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn host(&self) -> &H {
        &self.host
    }

    pub(crate) fn handle(&mut self, event: CoordinatorEvent) -> Result<LifecycleState, CoordinatorError> {
        match event {
            CoordinatorEvent::Start => self.start(event),
            CoordinatorEvent::Reopen => self.reopen(),
            CoordinatorEvent::Signal(IpcSignal::SetIgnoreMouse(ignore)) => {
                self.set_ignore_mouse(ignore);
                Ok(self.state)
            }
            CoordinatorEvent::Signal(IpcSignal::StartCharacter) => self.start_character(event),
            CoordinatorEvent::Signal(IpcSignal::Logout) => self.logout(event),
            CoordinatorEvent::Signal(IpcSignal::RequestQuit) => Ok(self.teardown("quit requested")),
            CoordinatorEvent::Signal(IpcSignal::ToggleDevtools) => {
                self.toggle_devtools();
                Ok(self.state)
            }
            CoordinatorEvent::WindowDestroyed(kind) => Ok(self.window_destroyed(kind)),
            CoordinatorEvent::AllWindowsClosed => {
                self.open_windows.clear();
                Ok(self.all_windows_closed())
            }
        }
    }

    fn invalid(&self, event: CoordinatorEvent) -> CoordinatorError {
        CoordinatorError::InvalidTransition {
            state: self.state,
            event: event.describe(),
        }
    }

    fn start(&mut self, event: CoordinatorEvent) -> Result<LifecycleState, CoordinatorError> {
        if self.state != LifecycleState::NoWindow {
            return Err(self.invalid(event));
        }
        self.open_login(false)?;
        self.state = LifecycleState::LoginVisible;
        Ok(self.state)
    }

    fn reopen(&mut self) -> Result<LifecycleState, CoordinatorError> {
        if self.state == LifecycleState::NoWindow {
            self.open_login(false)?;
            self.state = LifecycleState::LoginVisible;
        }
        Ok(self.state)
    }

    fn set_ignore_mouse(&mut self, ignore: bool) {
        if !self.open_windows.contains(&WindowKind::Overlay) {
            return;
        }
        if let Err(error) = self.host.set_click_through(ignore) {
            (self.log)(&format!("failed to set overlay click-through to {ignore}: {error}"));
        }
    }

    fn start_character(&mut self, event: CoordinatorEvent) -> Result<LifecycleState, CoordinatorError> {
        if self.state != LifecycleState::LoginVisible {
            return Err(self.invalid(event));
        }

        let spec = window_spec::overlay_window_spec(
            &self.config.backend_url,
            self.host.primary_work_area(),
        )
        .and_then(|spec| self.host.open_window(&spec).map(|()| spec));
        let spec = match spec {
            Ok(spec) => spec,
            Err(reason) => {
                self.host.show_alert(self.config.texts.start_character_failed);
                return Err(CoordinatorError::WindowOpen {
                    kind: WindowKind::Overlay,
                    reason,
                });
            }
        };
        self.open_windows.insert(WindowKind::Overlay);
        self.set_ignore_mouse(spec.click_through);

        self.close(WindowKind::Login);
        self.state = LifecycleState::OverlayVisible;
        Ok(self.state)
    }

    fn logout(&mut self, event: CoordinatorEvent) -> Result<LifecycleState, CoordinatorError> {
        if self.state != LifecycleState::OverlayVisible {
            return Err(self.invalid(event));
        }

        if let Err(error) = self.open_login(true) {
            self.host.show_alert(self.config.texts.login_window_failed);
            return Err(error);
        }
        self.session.clear();
        self.close(WindowKind::Overlay);
        self.state = LifecycleState::LoginVisible;
        Ok(self.state)
    }

    fn toggle_devtools(&mut self) {
        let kind = match self.state {
            LifecycleState::OverlayVisible => WindowKind::Overlay,
            LifecycleState::LoginVisible => WindowKind::Login,
            LifecycleState::NoWindow | LifecycleState::Terminated => return,
        };
        if let Err(error) = self.host.toggle_devtools(kind) {
            (self.log)(&format!("failed to toggle {} devtools: {error}", kind.label()));
        }
    }

    fn window_destroyed(&mut self, kind: WindowKind) -> LifecycleState {
        if !self.open_windows.remove(&kind) {
            return self.state;
        }
        if self.open_windows.is_empty() {
            return self.all_windows_closed();
        }

        if self.open_windows.contains(&WindowKind::Overlay) {
            self.state = LifecycleState::OverlayVisible;
        } else if self.open_windows.contains(&WindowKind::Login) {
            self.state = LifecycleState::LoginVisible;
        }
        self.state
    }

    fn all_windows_closed(&mut self) -> LifecycleState {
        if self.state == LifecycleState::Terminated {
            return self.state;
        }
        if self.config.quit_when_all_windows_closed {
            return self.teardown("all windows closed");
        }
        self.state = LifecycleState::NoWindow;
        self.state
    }

    fn teardown(&mut self, reason: &str) -> LifecycleState {
        if self.state == LifecycleState::Terminated {
            return self.state;
        }

        (self.log)(&format!("tearing down desktop shell: {reason}"));
        self.host.stop_backend();
        if let Err(error) = self.host.clear_browsing_data() {
            (self.log)(&format!("failed to clear browsing data: {error}"));
        }
        self.session.clear();
        self.open_windows.clear();
        self.state = LifecycleState::Terminated;
        self.host.exit(0);
        self.state
    }

    fn open_login(&mut self, after_logout: bool) -> Result<(), CoordinatorError> {
        window_spec::login_window_spec(&self.config.backend_url, after_logout)
            .and_then(|spec| self.host.open_window(&spec))
            .map_err(|reason| CoordinatorError::WindowOpen {
                kind: WindowKind::Login,
                reason,
            })?;
        self.open_windows.insert(WindowKind::Login);
        Ok(())
    }

    fn close(&mut self, kind: WindowKind) {
        self.open_windows.remove(&kind);
        if let Err(error) = self.host.close_window(kind) {
            (self.log)(&format!("failed to close {} window: {error}", kind.label()));
        }
    }
}
