//! The workflow driver: the outer state machine that clones the repository,
//! replays a commit onto the annotation branch, and pushes the result.
//!
//! Mirrors `Ostrich.Run` from the original implementation state-for-state;
//! adapted to the trait-based `VcsProvider`/`FsProvider` injection the
//! teacher uses instead of a single concrete `GitCommand`.

use std::path::Path;

use crate::annotate;
use crate::error::OstrichError;
use crate::fs::FsProvider;
use crate::parser;
use crate::vcs::{self, ChdirGuard, VcsProvider};

/// Parameters for one driver run, equivalent to the original CLI's four
/// required standalone-mode flags.
#[derive(Debug, Clone)]
pub struct WorkflowArgs {
    pub repository: String,
    pub from_branch: String,
    pub ostrich_branch: String,
    pub commit_id: String,
}

/// Run the full clone → checkout → annotate → push workflow.
///
/// Any VCS or filesystem failure aborts the pipeline; the error is returned
/// verbatim to the caller, which logs it at `ERROR`.
pub fn run_workflow(
    args: &WorkflowArgs,
    vcs: &dyn VcsProvider,
    fs: &dyn FsProvider,
) -> Result<(), OstrichError> {
    tracing::info!(
        repository = %args.repository,
        from_branch = %args.from_branch,
        ostrich_branch = %args.ostrich_branch,
        commit_id = %args.commit_id,
        "starting ostrich workflow"
    );

    let repo_name = vcs::repository_name(&args.repository)?;

    if Path::new(&repo_name).exists() {
        std::fs::remove_dir_all(&repo_name).map_err(|e| OstrichError::FilesystemError {
            path: repo_name.clone(),
            underlying: e.to_string(),
        })?;
    }
    vcs.clone_repo(&args.repository)?;

    let guard = ChdirGuard::enter(Path::new(&repo_name))?;

    if let Ok(version) = vcs.version() {
        for line in version {
            tracing::debug!(line = %line, "git version");
        }
    }

    let branches = vcs.branch()?;
    if !vcs::current_branch_is(&branches, &args.from_branch) {
        vcs.checkout(&args.from_branch)?;
    }
    vcs.pull(&args.from_branch)?;
    vcs.fetch()?;

    let commit_lines = vcs.show(&args.commit_id)?;
    let commit = parser::parse_commit(&commit_lines)?;

    vcs.checkout(&args.ostrich_branch)?;
    vcs.reset(&args.from_branch)?;

    annotate::annotate_commit(&commit, vcs, fs)?;

    vcs.commit(&commit.message)?;
    vcs.push(&args.ostrich_branch)?;

    drop(guard);
    Ok(())
}
