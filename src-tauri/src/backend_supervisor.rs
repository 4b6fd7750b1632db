use std::{
    env, io,
    path::PathBuf,
    process::{Child, Command, ExitStatus, Stdio},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    thread,
    time::Duration,
};

use crate::{
    launch_plan::build_debug_command, process_control, LaunchPlan,
    BACKEND_EXIT_WATCH_INTERVAL_MS,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum LaunchError {
    #[error("backend working directory {0} does not exist")]
    MissingWorkingDirectory(PathBuf),
    #[error("failed to spawn backend process with command {command:?}: {source}")]
    Spawn {
        command: Vec<String>,
        #[source]
        source: io::Error,
    },
    #[error("a backend process was already launched during this run ({0})")]
    AlreadyLaunched(String),
    #[error("backend launch refused: shell is shutting down")]
    ShuttingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartOutcome {
    Spawned { pid: u32 },
    AlreadyRunning { pid: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProcessStatus {
    NotStarted,
    Running { pid: u32 },
    Exited(String),
    Stopped,
}

#[derive(Debug, Default)]
pub(crate) struct BackendSupervisor {
    child: Arc<Mutex<Option<Child>>>,
    last_exit: Arc<Mutex<Option<String>>>,
    launched: AtomicBool,
    stopped: AtomicBool,
}

fn lock_slot<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn describe_exit_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

pub(crate) fn apply_backend_environment(command: &mut Command) {
    command
        .env("PYTHONUNBUFFERED", "1")
        .env(
            "PYTHONUTF8",
            env::var("PYTHONUTF8").unwrap_or_else(|_| "1".to_string()),
        )
        .env(
            "PYTHONIOENCODING",
            env::var("PYTHONIOENCODING").unwrap_or_else(|_| "utf-8".to_string()),
        );
}

impl BackendSupervisor {
    pub(crate) fn start(&self, plan: &LaunchPlan, log: fn(&str)) -> Result<StartOutcome, LaunchError> {
        let mut slot = lock_slot(&self.child);
        if self.stopped.load(Ordering::Acquire) {
            return Err(LaunchError::ShuttingDown);
        }
        if let Some(child) = slot.as_ref() {
            return Ok(StartOutcome::AlreadyRunning { pid: child.id() });
        }
        if self.launched.load(Ordering::Acquire) {
            let previous = lock_slot(&self.last_exit)
                .clone()
                .unwrap_or_else(|| "stopped".to_string());
            return Err(LaunchError::AlreadyLaunched(previous));
        }
        if !plan.cwd.is_dir() {
            return Err(LaunchError::MissingWorkingDirectory(plan.cwd.clone()));
        }

        let mut command = Command::new(&plan.cmd);
        command
            .args(&plan.args)
            .current_dir(&plan.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        apply_backend_environment(&mut command);

        let child = command.spawn().map_err(|source| LaunchError::Spawn {
            command: build_debug_command(plan),
            source,
        })?;
        let pid = child.id();
        *slot = Some(child);
        self.launched.store(true, Ordering::Release);
        drop(slot);

        log(&format!(
            "backend process spawned: pid={pid} command={:?} cwd={}",
            build_debug_command(plan),
            plan.cwd.display()
        ));
        self.spawn_exit_watcher(pid, log);
        Ok(StartOutcome::Spawned { pid })
    }

    fn spawn_exit_watcher(&self, pid: u32, log: fn(&str)) {
        let slot = Arc::clone(&self.child);
        let last_exit = Arc::clone(&self.last_exit);
        let spawn_result = thread::Builder::new()
            .name("va-backend-exit-watcher".to_string())
            .spawn(move || loop {
                thread::sleep(Duration::from_millis(BACKEND_EXIT_WATCH_INTERVAL_MS));
                let mut guard = lock_slot(&slot);
                let Some(child) = guard.as_mut() else {
                    return;
                };
                if child.id() != pid {
                    return;
                }
                match child.try_wait() {
                    Ok(Some(status)) => {
                        let description = describe_exit_status(status);
                        *lock_slot(&last_exit) = Some(description.clone());
                        *guard = None;
                        drop(guard);
                        log(&format!("backend process {pid} exited: {description}"));
                        return;
                    }
                    Ok(None) => {}
                    Err(error) => {
                        log(&format!("failed to poll backend process {pid}: {error}"));
                        return;
                    }
                }
            });
        if let Err(error) = spawn_result {
            log(&format!("failed to start backend exit watcher: {error}"));
        }
    }

    pub(crate) fn process_status(&self) -> ProcessStatus {
        let mut slot = lock_slot(&self.child);
        if let Some(child) = slot.as_mut() {
            let pid = child.id();
            return match child.try_wait() {
                Ok(Some(status)) => {
                    let description = describe_exit_status(status);
                    *slot = None;
                    *lock_slot(&self.last_exit) = Some(description.clone());
                    ProcessStatus::Exited(description)
                }
                Ok(None) | Err(_) => ProcessStatus::Running { pid },
            };
        }
        drop(slot);

        if let Some(description) = lock_slot(&self.last_exit).clone() {
            return ProcessStatus::Exited(description);
        }
        if self.stopped.load(Ordering::Acquire) {
            return ProcessStatus::Stopped;
        }
        ProcessStatus::NotStarted
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        matches!(self.process_status(), ProcessStatus::Running { .. })
    }

    /// Terminates the live child, if any, and refuses every later `start`.
    /// Returns `true` only when a termination was sent.
    pub(crate) fn stop(&self) -> bool {
        self.stopped.store(true, Ordering::Release);
        let child = lock_slot(&self.child).take();
        let Some(mut process) = child else {
            return false;
        };

        if let Ok(Some(status)) = process.try_wait() {
            *lock_slot(&self.last_exit) = Some(describe_exit_status(status));
            return false;
        }
        process_control::stop_child_process(&mut process);
        true
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use super::*;

    fn quiet(_: &str) {}

    fn plan(cmd: &str, args: &[&str], cwd: PathBuf) -> LaunchPlan {
        LaunchPlan {
            cmd: cmd.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            cwd,
        }
    }

    #[test]
    fn stop_without_start_is_a_noop() {
        let supervisor = BackendSupervisor::default();
        assert!(!supervisor.stop());
        assert!(!supervisor.stop());
        assert_eq!(supervisor.process_status(), ProcessStatus::Stopped);
    }

    #[test]
    fn start_after_stop_is_refused() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        assert!(!supervisor.stop());

        let error = supervisor
            .start(&plan("sleep", &["30"], temp.path().to_path_buf()), quiet)
            .expect_err("start after shutdown should fail");
        assert!(matches!(error, LaunchError::ShuttingDown));
        assert!(!supervisor.is_running());
        assert_eq!(supervisor.process_status(), ProcessStatus::Stopped);
    }

    #[test]
    fn stop_twice_signals_the_live_process_only_once() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let outcome = supervisor
            .start(&plan("sleep", &["30"], temp.path().to_path_buf()), quiet)
            .expect("spawn sleep");
        assert!(matches!(outcome, StartOutcome::Spawned { .. }));
        assert!(supervisor.is_running());

        assert!(supervisor.stop());
        assert!(!supervisor.stop());
        assert!(!supervisor.is_running());
        assert_eq!(supervisor.process_status(), ProcessStatus::Stopped);
    }

    #[test]
    fn start_while_running_reuses_the_existing_process() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let launch = plan("sleep", &["30"], temp.path().to_path_buf());

        let StartOutcome::Spawned { pid } = supervisor.start(&launch, quiet).expect("spawn") else {
            panic!("first start should spawn");
        };
        let second = supervisor.start(&launch, quiet).expect("second start");
        assert_eq!(second, StartOutcome::AlreadyRunning { pid });

        supervisor.stop();
    }

    #[test]
    fn exited_process_is_reported_and_never_relaunched() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let launch = plan("sh", &["-c", "exit 3"], temp.path().to_path_buf());
        supervisor.start(&launch, quiet).expect("spawn sh");

        let deadline = Instant::now() + Duration::from_secs(5);
        while supervisor.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }

        assert_eq!(
            supervisor.process_status(),
            ProcessStatus::Exited("exit code 3".to_string())
        );
        assert!(matches!(
            supervisor.start(&launch, quiet),
            Err(LaunchError::AlreadyLaunched(_))
        ));
        assert!(!supervisor.stop());
    }

    #[test]
    fn start_rejects_missing_working_directory() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let missing = temp.path().join("missing");
        let supervisor = BackendSupervisor::default();

        let error = supervisor
            .start(&plan("sleep", &["1"], missing.clone()), quiet)
            .expect_err("missing cwd should fail");
        assert!(matches!(error, LaunchError::MissingWorkingDirectory(path) if path == missing));
    }

    #[test]
    fn start_reports_spawn_failure_for_unknown_command() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();

        let error = supervisor
            .start(
                &plan("va-definitely-not-a-command", &[], temp.path().to_path_buf()),
                quiet,
            )
            .expect_err("unknown command should fail");
        assert!(matches!(error, LaunchError::Spawn { .. }));
        assert_eq!(supervisor.process_status(), ProcessStatus::NotStarted);
    }
}
