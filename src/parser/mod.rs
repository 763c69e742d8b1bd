//! Parses the textual output of `git show <commit>` into a structured [`Commit`].
//!
//! Mirrors the header/file-block/hunk three-level split of the original
//! `ostrich.go` parser, with the target-line arithmetic pinned down per the
//! spec's disambiguation of the Go source's double-counting bug.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::OstrichError;

/// How a file was changed in the commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEditKind {
    New,
    Modified,
    Deleted,
}

/// How a single flushed hunk changes the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkKind {
    Add,
    Modify,
    Delete,
}

/// One contiguous run of `+`/`-` lines flushed between context lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub ordinal: usize,
    pub kind: HunkKind,
    /// 1-based line number in the CURRENT file where the splice begins.
    pub target_line: usize,
    pub remove_lines: Vec<String>,
    pub after_lines: Vec<String>,
}

/// All edits made to a single file within the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    /// Repo-relative path, beginning with `./`.
    pub path: String,
    pub kind: FileEditKind,
    pub hunks: Vec<Hunk>,
}

/// The parsed commit: metadata plus the ordered per-file edits.
#[derive(Debug, Clone)]
pub struct Commit {
    pub message: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub files: Vec<FileEdit>,
}

static HUNK_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@ -(\d+)(?:,\d+)? \+\d+(?:,\d+)? @@").unwrap());

/// Parse the full `git show <commit>` output into a [`Commit`].
pub fn parse_commit(lines: &[String]) -> Result<Commit, OstrichError> {
    if lines.len() < 5 {
        return Err(OstrichError::DiffTooShort(lines.len()));
    }

    let diff_head = lines
        .iter()
        .position(|l| l.starts_with("diff"))
        .ok_or(OstrichError::NoDiffHeader)?;

    let (author, date, message) = parse_header(&lines[..diff_head])?;

    let files = parse_file_blocks(&lines[diff_head..])?;

    Ok(Commit {
        message,
        author,
        date,
        files,
    })
}

fn parse_header(lines: &[String]) -> Result<(String, DateTime<FixedOffset>, String), OstrichError> {
    let mut author = String::new();
    let mut date = None;
    let mut message = String::new();

    for text in lines {
        if text.starts_with("commit ") {
            continue;
        }
        if text.starts_with("Author") {
            let terms: Vec<&str> = text.split(' ').collect();
            if terms.len() < 2 {
                return Err(OstrichError::MalformedHeader(format!(
                    "can not detect author {text}"
                )));
            }
            author = terms[1].to_string();
            continue;
        }
        if text.starts_with("Date:") {
            let terms: Vec<&str> = text.split(' ').collect();
            if terms.len() < 7 {
                return Err(OstrichError::MalformedHeader(format!(
                    "can not detect date {text}"
                )));
            }
            let stripped = text.replacen("Date:", "", 1);
            let trimmed = stripped.trim();
            date = Some(
                DateTime::parse_from_str(trimmed, "%a %b %e %H:%M:%S %Y %z")
                    .map_err(|e| OstrichError::BadDate(format!("{trimmed}: {e}")))?,
            );
            continue;
        }

        // Text is commit message content.
        let buff = text.trim();
        if buff.len() > 1 {
            message.push_str(", ");
            message.push_str(buff);
        }
    }

    if let Some(stripped) = message.strip_prefix(", ") {
        message = stripped.to_string();
    }

    let date = date.unwrap_or_else(|| {
        DateTime::parse_from_str("Thu Jan 1 00:00:00 1970 +0000", "%a %b %e %H:%M:%S %Y %z")
            .expect("fixed fallback format is valid")
    });

    Ok((author, date, message))
}

/// Split the `diff ...` onward region into per-file blocks and parse each.
fn parse_file_blocks(lines: &[String]) -> Result<Vec<FileEdit>, OstrichError> {
    let mut block_starts = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("diff") {
            block_starts.push(i);
        }
    }
    if block_starts.is_empty() {
        return Err(OstrichError::NoDiffHeader);
    }

    let mut files = Vec::new();
    for (idx, &start) in block_starts.iter().enumerate() {
        let end = block_starts.get(idx + 1).copied().unwrap_or(lines.len());
        files.push(parse_file_block(&lines[start..end])?);
    }
    Ok(files)
}

fn parse_file_block(lines: &[String]) -> Result<FileEdit, OstrichError> {
    if lines.len() < 6 {
        return Err(OstrichError::MalformedHeader(format!(
            "invalid file block length {}",
            lines.len()
        )));
    }

    let buff: Vec<&str> = lines[0].split(' ').collect();
    let raw_filename = buff.get(2).copied().unwrap_or("");
    let path = if raw_filename.len() > 1 {
        format!(".{}", &raw_filename[1..])
    } else {
        raw_filename.to_string()
    };

    let kind = if lines[1].starts_with("new file mode") {
        FileEditKind::New
    } else if lines[1].starts_with("deleted file mode") {
        FileEditKind::Deleted
    } else {
        FileEditKind::Modified
    };

    if kind == FileEditKind::Deleted {
        return Ok(FileEdit {
            path,
            kind,
            hunks: Vec::new(),
        });
    }

    let hunks = parse_hunks(lines)?;
    Ok(FileEdit { path, kind, hunks })
}

/// Split a file block into `@@`-delimited hunk regions and parse each into
/// zero or more flushed [`Hunk`]s.
fn parse_hunks(lines: &[String]) -> Result<Vec<Hunk>, OstrichError> {
    let mut hunk_starts = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("@@") {
            hunk_starts.push(i);
        }
    }
    if hunk_starts.is_empty() {
        return Err(OstrichError::NoHunkHeader);
    }

    let mut ordinal = 0usize;
    let mut hunks = Vec::new();
    for (idx, &start) in hunk_starts.iter().enumerate() {
        let end = hunk_starts.get(idx + 1).copied().unwrap_or(lines.len());
        parse_single_hunk_region(&lines[start..end], &mut ordinal, &mut hunks)?;
    }
    Ok(hunks)
}

fn parse_single_hunk_region(
    lines: &[String],
    ordinal: &mut usize,
    out: &mut Vec<Hunk>,
) -> Result<(), OstrichError> {
    let header = &lines[0];
    let caps = HUNK_HEADER_RE
        .captures(header)
        .ok_or_else(|| OstrichError::BadHunkHeader(header.clone()))?;
    let old_start: usize = caps[1]
        .parse()
        .map_err(|_| OstrichError::BadHunkHeader(header.clone()))?;

    let mut source_line = old_start;
    let mut buffer: Vec<&str> = Vec::new();

    let mut flush = |buffer: &mut Vec<&str>, source_line: usize, out: &mut Vec<Hunk>| {
        if buffer.is_empty() {
            return;
        }
        *ordinal += 1;
        out.push(build_hunk(*ordinal, source_line, buffer));
        buffer.clear();
    };

    for text in &lines[1..] {
        if text.is_empty() || text.starts_with(' ') {
            flush(&mut buffer, source_line, out);
            source_line += 1;
            continue;
        }
        if text.starts_with('-') {
            source_line += 1;
            buffer.push(text);
            continue;
        }
        if text.starts_with('+') {
            buffer.push(text);
            continue;
        }
        // Any other non-context line (e.g. "\ No newline at end of file")
        // is neither a context flush trigger nor a +/- entry; ignore it.
    }
    flush(&mut buffer, source_line, out);

    Ok(())
}

fn build_hunk(ordinal: usize, source_line_after_buffer: usize, buffer: &[&str]) -> Hunk {
    let has_plus = buffer.iter().any(|l| l.starts_with('+'));
    let has_minus = buffer.iter().any(|l| l.starts_with('-'));

    let kind = if has_plus && has_minus {
        HunkKind::Modify
    } else if has_plus {
        HunkKind::Add
    } else {
        HunkKind::Delete
    };

    let after_lines: Vec<String> = buffer
        .iter()
        .filter(|l| l.starts_with('+'))
        .map(|l| l[1..].to_string())
        .collect();
    let remove_lines: Vec<String> = buffer
        .iter()
        .filter(|l| l.starts_with('-'))
        .map(|l| l[1..].to_string())
        .collect();

    let leading_minus_count = buffer.iter().take_while(|l| l.starts_with('-')).count();

    let target_line = match kind {
        HunkKind::Add => source_line_after_buffer,
        HunkKind::Modify | HunkKind::Delete => source_line_after_buffer - leading_minus_count,
    };

    Hunk {
        ordinal,
        kind,
        target_line,
        remove_lines,
        after_lines,
    }
}
