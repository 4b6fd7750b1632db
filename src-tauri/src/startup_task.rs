use std::thread;

use tauri::{AppHandle, Manager};

use crate::{
    backend_config, backend_readiness, backend_supervisor::StartOutcome,
    coordinator_runtime::CoordinatorHandle, launch_plan, window_coordinator::CoordinatorEvent,
    DesktopState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartupDecision {
    UseRunningBackend,
    SkipLaunchAutoStartDisabled,
    LaunchBackend,
}

fn decide_startup(backend_reachable: bool, auto_start_enabled: bool) -> StartupDecision {
    if backend_reachable {
        StartupDecision::UseRunningBackend
    } else if !auto_start_enabled {
        StartupDecision::SkipLaunchAutoStartDisabled
    } else {
        StartupDecision::LaunchBackend
    }
}

// Backend failures are recorded but never keep the login window from opening.
pub(crate) fn spawn_startup_task(
    app_handle: AppHandle,
    coordinator: CoordinatorHandle,
    log: fn(&str),
) {
    let spawn_result = thread::Builder::new()
        .name("va-startup".to_string())
        .spawn(move || {
            let state = app_handle.state::<DesktopState>();
            if let Err(error) = prepare_backend(&state, log) {
                log(&format!("backend startup failed: {error}"));
                state.record_startup_error(&error);
            }
            coordinator.send(CoordinatorEvent::Start);
        });

    if let Err(error) = spawn_result {
        log(&format!("failed to spawn startup task thread: {error}"));
    }
}

fn prepare_backend(state: &DesktopState, log: fn(&str)) -> Result<(), String> {
    let policy = backend_config::resolve_readiness_policy();
    let reachable =
        backend_readiness::ping_backend(&state.backend_url, &policy.probe, policy.probe_timeout);

    match decide_startup(reachable, backend_config::backend_auto_start_enabled()) {
        StartupDecision::UseRunningBackend => {
            log(&format!("backend already reachable at {}", state.backend_url));
            return Ok(());
        }
        StartupDecision::SkipLaunchAutoStartDisabled => {
            log("backend auto-start disabled, not launching a backend process");
            return Ok(());
        }
        StartupDecision::LaunchBackend => {}
    }

    let plan = launch_plan::resolve_launch_plan(&state.backend_url)?;
    match state.supervisor.start(&plan, log) {
        Ok(StartOutcome::Spawned { pid }) => log(&format!("backend launched with pid {pid}")),
        Ok(StartOutcome::AlreadyRunning { pid }) => {
            log(&format!("backend process {pid} already running"))
        }
        Err(error) => return Err(format!("launch error: {error}")),
    }

    let waited = backend_readiness::wait_for_backend(&state.backend_url, &policy, || {
        state.supervisor.process_status()
    })
    .map_err(|error| format!("readiness error: {error}"))?;
    log(&format!(
        "backend ready at {} after {}ms",
        state.backend_url,
        waited.as_millis()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decide_startup_prefers_an_already_reachable_backend() {
        assert_eq!(decide_startup(true, true), StartupDecision::UseRunningBackend);
        assert_eq!(decide_startup(true, false), StartupDecision::UseRunningBackend);
    }

    #[test]
    fn decide_startup_respects_disabled_auto_start() {
        assert_eq!(
            decide_startup(false, false),
            StartupDecision::SkipLaunchAutoStartDisabled
        );
    }

    #[test]
    fn decide_startup_launches_when_unreachable_and_enabled() {
        assert_eq!(decide_startup(false, true), StartupDecision::LaunchBackend);
    }
}
