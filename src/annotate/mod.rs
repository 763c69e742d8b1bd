//! Orchestrates parser → rewriter across every file in a [`Commit`], staging
//! results through the VCS adapter. Mirrors the original `applyCommit`/
//! `applyOstrichFileInfo` dispatch.

use crate::error::OstrichError;
use crate::fs::FsProvider;
use crate::parser::{Commit, FileEdit, FileEditKind};
use crate::rewrite;
use crate::vcs::VcsProvider;

/// Apply every `FileEdit` in `commit`, in order. The first failure
/// short-circuits and is returned unmodified — no partial application.
pub fn annotate_commit(
    commit: &Commit,
    vcs: &dyn VcsProvider,
    fs: &dyn FsProvider,
) -> Result<(), OstrichError> {
    for file_edit in &commit.files {
        apply_file_edit(commit, file_edit, vcs, fs)?;
    }
    Ok(())
}

fn apply_file_edit(
    commit: &Commit,
    file_edit: &FileEdit,
    vcs: &dyn VcsProvider,
    fs: &dyn FsProvider,
) -> Result<(), OstrichError> {
    let prefix = rewrite::comment_prefix(&file_edit.path)?;

    match file_edit.kind {
        FileEditKind::New => {
            let after_lines = &file_edit
                .hunks
                .first()
                .ok_or_else(|| OstrichError::Other("new file has no hunks".to_string()))?
                .after_lines;
            fs.write_all(&file_edit.path, after_lines)?;
            vcs.add(&file_edit.path)?;
        }
        FileEditKind::Modified => {
            let original = fs.read_all(&file_edit.path)?;
            let new_contents = rewrite::rewrite(
                file_edit,
                &original,
                &commit.author,
                commit.date,
                prefix,
            )?;
            fs.write_all(&file_edit.path, &new_contents)?;
            vcs.add(&file_edit.path)?;
        }
        FileEditKind::Deleted => {
            fs.remove_file(&file_edit.path)?;
            vcs.rm(&file_edit.path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{FileEditKind, Hunk, HunkKind};
    use crate::testing::{MockFs, MockVcs};
    use chrono::DateTime;

    fn date() -> chrono::DateTime<chrono::FixedOffset> {
        DateTime::parse_from_rfc3339("2021-03-04T00:00:00+00:00").unwrap()
    }

    #[test]
    fn new_file_is_written_and_staged() {
        let commit = Commit {
            message: "m".into(),
            author: "jane".into(),
            date: date(),
            files: vec![FileEdit {
                path: "./new.go".into(),
                kind: FileEditKind::New,
                hunks: vec![Hunk {
                    ordinal: 1,
                    kind: HunkKind::Add,
                    target_line: 1,
                    remove_lines: vec![],
                    after_lines: vec!["package main".into()],
                }],
            }],
        };
        let vcs = MockVcs::default();
        let fs = MockFs::default();
        annotate_commit(&commit, &vcs, &fs).unwrap();
        assert_eq!(
            fs.written().get("./new.go").unwrap(),
            &vec!["package main".to_string()]
        );
        assert_eq!(vcs.added(), vec!["./new.go".to_string()]);
    }

    #[test]
    fn deleted_file_is_removed_and_staged_without_read() {
        let commit = Commit {
            message: "m".into(),
            author: "jane".into(),
            date: date(),
            files: vec![FileEdit {
                path: "./gone.go".into(),
                kind: FileEditKind::Deleted,
                hunks: vec![],
            }],
        };
        let vcs = MockVcs::default();
        let fs = MockFs::default();
        annotate_commit(&commit, &vcs, &fs).unwrap();
        assert_eq!(fs.removed(), vec!["./gone.go".to_string()]);
        assert_eq!(vcs.removed(), vec!["./gone.go".to_string()]);
        assert!(fs.reads().is_empty());
    }

    #[test]
    fn unsupported_extension_aborts_before_any_vcs_call() {
        let commit = Commit {
            message: "m".into(),
            author: "jane".into(),
            date: date(),
            files: vec![FileEdit {
                path: "./readme.md".into(),
                kind: FileEditKind::Deleted,
                hunks: vec![],
            }],
        };
        let vcs = MockVcs::default();
        let fs = MockFs::default();
        let err = annotate_commit(&commit, &vcs, &fs).unwrap_err();
        assert!(matches!(err, OstrichError::UnsupportedExtension(_)));
        assert!(vcs.removed().is_empty());
    }
}
