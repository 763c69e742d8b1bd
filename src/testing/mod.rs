//! Test doubles for the VCS and FS adapters, capturing calls for assertions.
//!
//! Mirrors the teacher's `testing::mock_git::MockGitProvider` shape: a struct
//! pre-seeded with canned responses, recording every call in a `Mutex`-guarded
//! log so tests can assert on both the effects and the call sequence.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::OstrichError;
use crate::fs::FsProvider;
use crate::vcs::VcsProvider;

/// Mock VCS provider. Pre-seed `show_lines`/`branch_lines` for the scenario
/// under test; every mutating call is recorded for assertions.
#[derive(Default)]
pub struct MockVcs {
    pub show_lines: Vec<String>,
    pub branch_lines: Vec<String>,
    pub fail_on: Mutex<Option<String>>,
    /// When true, `clone_repo` creates an empty directory named after the
    /// repository (mirroring what the real `git clone` would do), so driver
    /// tests that chdir into it don't need to stage the directory by hand.
    pub creates_repo_dir: bool,
    calls: Mutex<MockVcsCalls>,
}

#[derive(Default)]
struct MockVcsCalls {
    added: Vec<String>,
    removed: Vec<String>,
    committed: Vec<String>,
    pushed: Vec<String>,
    reset: Vec<String>,
    checked_out: Vec<String>,
    cloned: Vec<String>,
}

impl MockVcs {
    /// Make every call to `method` fail with a `VcsError`.
    pub fn failing_on(method: &str) -> Self {
        let me = Self::default();
        *me.fail_on.lock().unwrap() = Some(method.to_string());
        me
    }

    fn check_fail(&self, method: &str) -> Result<(), OstrichError> {
        if self.fail_on.lock().unwrap().as_deref() == Some(method) {
            return Err(OstrichError::VcsError {
                command: "git".into(),
                args: method.into(),
                underlying: "mock failure".into(),
            });
        }
        Ok(())
    }

    pub fn added(&self) -> Vec<String> {
        self.calls.lock().unwrap().added.clone()
    }
    pub fn removed(&self) -> Vec<String> {
        self.calls.lock().unwrap().removed.clone()
    }
    pub fn committed(&self) -> Vec<String> {
        self.calls.lock().unwrap().committed.clone()
    }
    pub fn pushed(&self) -> Vec<String> {
        self.calls.lock().unwrap().pushed.clone()
    }
    pub fn reset_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().reset.clone()
    }
    pub fn checked_out(&self) -> Vec<String> {
        self.calls.lock().unwrap().checked_out.clone()
    }
    pub fn cloned(&self) -> Vec<String> {
        self.calls.lock().unwrap().cloned.clone()
    }
}

impl VcsProvider for MockVcs {
    fn clone_repo(&self, repository: &str) -> Result<(), OstrichError> {
        self.check_fail("clone")?;
        if self.creates_repo_dir {
            if let Ok(name) = crate::vcs::repository_name(repository) {
                let _ = std::fs::create_dir_all(name);
            }
        }
        self.calls.lock().unwrap().cloned.push(repository.into());
        Ok(())
    }

    fn checkout(&self, branch: &str) -> Result<(), OstrichError> {
        self.check_fail("checkout")?;
        self.calls.lock().unwrap().checked_out.push(branch.into());
        Ok(())
    }

    fn pull(&self, _branch: &str) -> Result<(), OstrichError> {
        self.check_fail("pull")
    }

    fn fetch(&self) -> Result<(), OstrichError> {
        self.check_fail("fetch")
    }

    fn branch(&self) -> Result<Vec<String>, OstrichError> {
        self.check_fail("branch")?;
        Ok(self.branch_lines.clone())
    }

    fn show(&self, _commit_id: &str) -> Result<Vec<String>, OstrichError> {
        self.check_fail("show")?;
        Ok(self.show_lines.clone())
    }

    fn commit(&self, message: &str) -> Result<(), OstrichError> {
        self.check_fail("commit")?;
        self.calls.lock().unwrap().committed.push(message.into());
        Ok(())
    }

    fn push(&self, branch: &str) -> Result<(), OstrichError> {
        self.check_fail("push")?;
        self.calls.lock().unwrap().pushed.push(branch.into());
        Ok(())
    }

    fn add(&self, path: &str) -> Result<(), OstrichError> {
        self.check_fail("add")?;
        self.calls.lock().unwrap().added.push(path.into());
        Ok(())
    }

    fn rm(&self, path: &str) -> Result<(), OstrichError> {
        self.check_fail("rm")?;
        self.calls.lock().unwrap().removed.push(path.into());
        Ok(())
    }

    fn reset(&self, branch: &str) -> Result<(), OstrichError> {
        self.check_fail("reset")?;
        self.calls.lock().unwrap().reset.push(branch.into());
        Ok(())
    }

    fn version(&self) -> Result<Vec<String>, OstrichError> {
        self.check_fail("version")?;
        Ok(vec!["git version 2.40.0".into()])
    }
}

/// Mock filesystem provider, pre-seeded with file contents by path.
#[derive(Default)]
pub struct MockFs {
    pub files: Mutex<HashMap<String, Vec<String>>>,
    reads: Mutex<Vec<String>>,
    removed_paths: Mutex<Vec<String>>,
}

impl MockFs {
    pub fn with_file(self, path: &str, lines: Vec<String>) -> Self {
        self.files.lock().unwrap().insert(path.to_string(), lines);
        self
    }

    pub fn written(&self) -> HashMap<String, Vec<String>> {
        self.files.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed_paths.lock().unwrap().clone()
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl FsProvider for MockFs {
    fn read_all(&self, path: &str) -> Result<Vec<String>, OstrichError> {
        self.reads.lock().unwrap().push(path.to_string());
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| OstrichError::FilesystemError {
                path: path.to_string(),
                underlying: "no such file".to_string(),
            })
    }

    fn write_all(&self, path: &str, contents: &[String]) -> Result<(), OstrichError> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    fn remove_file(&self, path: &str) -> Result<(), OstrichError> {
        self.removed_paths.lock().unwrap().push(path.to_string());
        self.files.lock().unwrap().remove(path);
        Ok(())
    }
}
