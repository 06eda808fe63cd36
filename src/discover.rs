use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use anyhow::Result;

use crate::errors::TinybenchError;

/// Something that can execute a complete benchmark program once.
///
/// `execute` must return only after the run has fully finished.
pub trait Runtime: Sync {
    fn execute(&self, program: &str) -> Result<()>;
}

/// An interpreter process spawned fresh for every run.
#[derive(Debug, Clone)]
pub struct ExternalRuntime {
    pub path: PathBuf,
    pub eval_flag: String,
}

impl ExternalRuntime {
    /// Resolve `name` on the host and build a runtime that passes programs
    /// inline after `eval_flag`.
    pub fn locate(name: &str, eval_flag: &str) -> Result<Self> {
        let path = locate_executable(name)?;
        tracing::debug!(runtime = %path.display(), eval_flag, "resolved runtime");
        Ok(ExternalRuntime {
            path,
            eval_flag: eval_flag.to_string(),
        })
    }

    /// Start one run without waiting for it. Output streams are inherited so
    /// the program prints straight to the console.
    pub fn spawn(&self, program: &str) -> Result<Child> {
        Command::new(&self.path)
            .arg(&self.eval_flag)
            .arg(program)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| {
                TinybenchError::RunSpawn {
                    path: self.path.clone(),
                    source,
                }
                .into()
            })
    }
}

impl Runtime for ExternalRuntime {
    fn execute(&self, program: &str) -> Result<()> {
        let mut child = self.spawn(program)?;
        let status = child.wait().map_err(|source| TinybenchError::RunSpawn {
            path: self.path.clone(),
            source,
        })?;

        if !status.success() {
            tracing::error!(%status, runtime = %self.path.display(), "benchmark run failed");
            return Err(TinybenchError::RunFailed { status }.into());
        }
        Ok(())
    }
}

/// Find an executable by name on `PATH`, or check it directly when `name`
/// already contains a path separator.
pub fn locate_executable(name: &str) -> Result<PathBuf> {
    let not_found = || TinybenchError::RuntimeNotFound {
        name: name.to_string(),
    };

    if name.is_empty() {
        return Err(not_found().into());
    }

    let direct = Path::new(name);
    if direct.components().count() > 1 {
        return if is_executable(direct) {
            Ok(direct.to_path_buf())
        } else {
            Err(not_found().into())
        };
    }

    let search_path = std::env::var_os("PATH").ok_or_else(not_found)?;
    for dir in std::env::split_paths(&search_path) {
        for candidate in candidate_names(name) {
            let path = dir.join(&candidate);
            if is_executable(&path) {
                return Ok(path);
            }
        }
    }

    Err(not_found().into())
}

#[cfg(windows)]
fn candidate_names(name: &str) -> Vec<String> {
    if Path::new(name).extension().is_some() {
        vec![name.to_string()]
    } else {
        vec![name.to_string(), format!("{}.exe", name)]
    }
}

#[cfg(not(windows))]
fn candidate_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match path.metadata() {
        Ok(m) => m.is_file() && m.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
