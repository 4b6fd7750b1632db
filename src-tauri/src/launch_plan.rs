use std::{env, path::PathBuf};

use crate::{backend_config, runtime_paths, LaunchPlan, BACKEND_CMD_ENV, BACKEND_CWD_ENV};

pub(crate) fn resolve_launch_plan(backend_url: &str) -> Result<LaunchPlan, String> {
    let cwd = env::var(BACKEND_CWD_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(runtime_paths::default_backend_dir);

    if let Some(custom_cmd) = env::var(BACKEND_CMD_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        return resolve_custom_launch(&custom_cmd, cwd);
    }

    resolve_default_launch(backend_url, cwd)
}

pub(crate) fn resolve_custom_launch(custom_cmd: &str, cwd: PathBuf) -> Result<LaunchPlan, String> {
    let mut pieces = shlex::split(custom_cmd)
        .ok_or_else(|| format!("Invalid {BACKEND_CMD_ENV}: {custom_cmd}"))?;
    if pieces.is_empty() {
        return Err(format!("{BACKEND_CMD_ENV} is empty."));
    }

    let cmd = pieces.remove(0);
    Ok(LaunchPlan {
        cmd,
        args: pieces,
        cwd,
    })
}

pub(crate) fn resolve_default_launch(backend_url: &str, cwd: PathBuf) -> Result<LaunchPlan, String> {
    let (host, port) = backend_config::backend_host_port(backend_url)
        .ok_or_else(|| format!("Cannot derive backend host/port from {backend_url}"))?;
    let python = if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    };

    Ok(LaunchPlan {
        cmd: python.to_string(),
        args: vec![
            "-m".to_string(),
            "uvicorn".to_string(),
            "app.main:app".to_string(),
            "--host".to_string(),
            host,
            "--port".to_string(),
            port.to_string(),
        ],
        cwd,
    })
}

pub(crate) fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.cmd.clone()];
    parts.extend(plan.args.clone());
    parts
}
