//! Version-control adapter: the capability set the core consumes (§6), plus
//! the real subprocess-backed implementation.
//!
//! Mirrors the teacher's `GitProvider` trait/injection pattern, but speaks to
//! a local `git` binary via `std::process::Command` the way the original
//! `ostrich.go`'s `GitCommand`/`CommandExecutor` pair did.

use std::path::Path;
use std::process::Command;
use std::sync::{Mutex, MutexGuard};

use crate::error::OstrichError;

/// Process-wide lock over the chdir scope. The working directory is a
/// process-global resource; standalone mode takes this same lock for
/// symmetry with the web intake worker, even though it is uncontended there.
static CHDIR_LOCK: Mutex<()> = Mutex::new(());

/// Capability set consumed by the annotator and driver.
///
/// Every method surfaces subprocess failures as `OstrichError::VcsError`
/// carrying the invoked command line, per §6.
pub trait VcsProvider: Send + Sync {
    fn clone_repo(&self, repository: &str) -> Result<(), OstrichError>;
    fn checkout(&self, branch: &str) -> Result<(), OstrichError>;
    fn pull(&self, branch: &str) -> Result<(), OstrichError>;
    fn fetch(&self) -> Result<(), OstrichError>;
    fn branch(&self) -> Result<Vec<String>, OstrichError>;
    fn show(&self, commit_id: &str) -> Result<Vec<String>, OstrichError>;
    fn commit(&self, message: &str) -> Result<(), OstrichError>;
    fn push(&self, branch: &str) -> Result<(), OstrichError>;
    fn add(&self, path: &str) -> Result<(), OstrichError>;
    fn rm(&self, path: &str) -> Result<(), OstrichError>;
    fn reset(&self, branch: &str) -> Result<(), OstrichError>;
    fn version(&self) -> Result<Vec<String>, OstrichError>;
}

/// Real `git` binary adapter, run in the process's current working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl GitCli {
    fn exec(&self, args: &[&str]) -> Result<Vec<String>, OstrichError> {
        tracing::debug!(command = "git", args = args.join(" "), "ExecCommand");
        let output = Command::new("git")
            .args(args)
            .output()
            .map_err(|e| OstrichError::VcsError {
                command: "git".to_string(),
                args: args.join(" "),
                underlying: e.to_string(),
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        let text = String::from_utf8_lossy(&combined).into_owned();

        if !output.status.success() {
            return Err(OstrichError::VcsError {
                command: "git".to_string(),
                args: args.join(" "),
                underlying: text,
            });
        }

        Ok(text.split('\n').map(|s| s.to_string()).collect())
    }
}

impl VcsProvider for GitCli {
    fn clone_repo(&self, repository: &str) -> Result<(), OstrichError> {
        self.exec(&["clone", repository]).map(|_| ())
    }

    fn checkout(&self, branch: &str) -> Result<(), OstrichError> {
        self.exec(&["checkout", "-b", branch]).map(|_| ())
    }

    fn pull(&self, branch: &str) -> Result<(), OstrichError> {
        self.exec(&["pull", "origin", branch]).map(|_| ())
    }

    fn fetch(&self) -> Result<(), OstrichError> {
        self.exec(&["fetch"]).map(|_| ())
    }

    fn branch(&self) -> Result<Vec<String>, OstrichError> {
        self.exec(&["branch"])
    }

    fn show(&self, commit_id: &str) -> Result<Vec<String>, OstrichError> {
        self.exec(&["show", commit_id])
    }

    fn commit(&self, message: &str) -> Result<(), OstrichError> {
        self.exec(&["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, branch: &str) -> Result<(), OstrichError> {
        self.exec(&["push", "-f", "origin", branch]).map(|_| ())
    }

    fn add(&self, path: &str) -> Result<(), OstrichError> {
        self.exec(&["add", path]).map(|_| ())
    }

    fn rm(&self, path: &str) -> Result<(), OstrichError> {
        self.exec(&["rm", path]).map(|_| ())
    }

    fn reset(&self, branch: &str) -> Result<(), OstrichError> {
        self.exec(&["reset", "--hard", &format!("origin/{branch}")])
            .map(|_| ())
    }

    fn version(&self) -> Result<Vec<String>, OstrichError> {
        self.exec(&["--version"])
    }
}

/// Derive the working-directory name from a clone URL: the last
/// `/`-separated segment, with a trailing `.git` stripped.
pub fn repository_name(repository: &str) -> Result<String, OstrichError> {
    let last = repository
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| OstrichError::Other(format!("invalid repository url {repository}")))?;
    Ok(last.strip_suffix(".git").unwrap_or(last).to_string())
}

/// Whether the current branch (the line starting with `*` in `git branch`
/// output) already ends with `branch` — in which case no checkout is needed.
pub fn current_branch_is(branches: &[String], branch: &str) -> bool {
    branches
        .iter()
        .find(|b| b.starts_with('*'))
        .is_some_and(|b| b.ends_with(branch))
}

/// RAII guard that `chdir`s into `dir` on construction and restores the
/// previous working directory on drop, regardless of the exit path. Holds
/// `CHDIR_LOCK` for its entire lifetime so no other driver invocation can
/// observe or mutate the working directory while this one is active.
pub struct ChdirGuard {
    previous: std::path::PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl ChdirGuard {
    pub fn enter(dir: &Path) -> Result<Self, OstrichError> {
        let lock = CHDIR_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(dir)?;
        Ok(Self {
            previous,
            _lock: lock,
        })
    }
}

impl Drop for ChdirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            tracing::error!(error = %e, "failed to restore working directory");
        }
    }
}
