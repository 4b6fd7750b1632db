use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{runtime_paths, DESKTOP_LOG_FILE};

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => std::env::temp_dir().join("virtual-assistant").join(file_name),
    }
}

pub(crate) fn format_log_line(scope: &str, message: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{timestamp}] [{scope}] {message}")
}

fn append_line(path: &Path, line: &str) {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{line}");
    }
}

fn append_scoped_log(scope: &str, message: &str) {
    let line = format_log_line(scope, message);
    eprintln!("{line}");
    let path = resolve_desktop_log_path(runtime_paths::default_app_root_dir(), DESKTOP_LOG_FILE);
    append_line(&path, &line);
}

pub(crate) fn append_desktop_log(message: &str) {
    append_scoped_log("desktop", message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_scoped_log("startup", message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_scoped_log("shutdown", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_desktop_log_path_places_file_under_logs_dir() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/tmp/va-root")), "desktop.log");
        assert_eq!(path, PathBuf::from("/tmp/va-root/logs/desktop.log"));
    }

    #[test]
    fn format_log_line_includes_scope_and_message() {
        let line = format_log_line("startup", "backend ready");
        assert!(line.starts_with('['));
        assert!(line.ends_with("[startup] backend ready"));
    }

    #[test]
    fn append_line_creates_missing_parent_directories() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("logs").join("desktop.log");

        append_line(&path, "first");
        append_line(&path, "second");

        let contents = fs::read_to_string(&path).expect("read log file");
        assert_eq!(contents, "first\nsecond\n");
    }
}
