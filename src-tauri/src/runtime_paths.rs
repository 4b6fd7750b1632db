use std::{env, path::PathBuf};

use crate::DESKTOP_ROOT_ENV;

pub(crate) fn default_app_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(DESKTOP_ROOT_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    home::home_dir().map(|home| home.join(".virtual-assistant"))
}

pub(crate) fn workspace_root_dir() -> PathBuf {
    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
    candidate
        .canonicalize()
        .unwrap_or_else(|_| candidate.to_path_buf())
}

pub(crate) fn default_backend_dir() -> PathBuf {
    workspace_root_dir().join("backend")
}
