use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::core::state::ShellState;

/// Finds `name` the way the shell would run it, using the shell's own
/// `PATH` and working directory.
pub fn find_executable(name: &str, state: &ShellState) -> Option<PathBuf> {
    let path_var = state.var("PATH").unwrap_or_default();
    resolve(name, OsStr::new(&path_var), state.current_dir())
}

/// Names containing a separator are taken relative to `cwd`; bare names are
/// searched for in each `path_var` entry in order.
pub fn resolve(name: &str, path_var: &OsStr, cwd: &Path) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    if name.contains('/') || (cfg!(windows) && name.contains('\\')) {
        let candidate = cwd.join(name);
        return executable_variant(&candidate);
    }

    env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| if dir.is_absolute() { dir } else { cwd.join(dir) })
        .find_map(|dir| executable_variant(&dir.join(name)))
}

#[cfg(unix)]
fn executable_variant(candidate: &Path) -> Option<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = candidate.metadata().ok()?;
    if metadata.is_file() && metadata.permissions().mode() & 0o111 != 0 {
        Some(candidate.to_path_buf())
    } else {
        None
    }
}

#[cfg(windows)]
fn executable_variant(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() && candidate.extension().is_some() {
        return Some(candidate.to_path_buf());
    }

    let exts = env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    exts.split(';')
        .filter(|ext| !ext.is_empty())
        .map(|ext| {
            let mut name = candidate.as_os_str().to_os_string();
            name.push(ext);
            PathBuf::from(name)
        })
        .find(|path| path.is_file())
}
