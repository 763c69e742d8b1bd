//! Splices marker comments and commented-out removals into file contents,
//! one [`Hunk`](crate::parser::Hunk) at a time, in descending-ordinal order so
//! earlier `target_line`s stay valid as later splices are applied.

use chrono::{DateTime, FixedOffset};

use crate::error::OstrichError;
use crate::parser::{FileEdit, FileEditKind, Hunk, HunkKind};

/// Resolve the line-comment prefix for a file by its extension.
///
/// Case-sensitive, exact match. Any other extension is rejected — this spec
/// does not attempt to understand language syntax beyond this lookup.
pub fn comment_prefix(path: &str) -> Result<&'static str, OstrichError> {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext);
    match ext {
        Some("c") | Some("h") | Some("cpp") | Some("go") => Ok("//"),
        _ => Err(OstrichError::UnsupportedExtension(
            ext.unwrap_or("").to_string(),
        )),
    }
}

/// Build the `"<YYYY/MM/DD> {KIND} <author> {TAG}"` comment template, with
/// `{KIND}`/`{TAG}` left as placeholders for [`marker_pair`].
pub fn comment_template(date: DateTime<FixedOffset>, author: &str) -> String {
    format!("{} {{KIND}} {author} {{TAG}}", date.format("%Y/%m/%d"))
}

/// Produce the `(start, end)` marker lines for one hunk kind, with the
/// per-file comment prefix prepended.
fn marker_pair(template: &str, prefix: &str, kind_tag: &str) -> (String, String) {
    let comment = template.replacen("{KIND}", kind_tag, 1);
    let start = comment.replacen("{TAG}", "START", 1);
    let end = comment.replacen("{TAG}", "END", 1);
    (format!("{prefix} {start}"), format!("{prefix} {end}"))
}

/// Longest leading run of spaces/tabs in `line`.
fn line_indent(line: &str) -> String {
    line.chars()
        .take_while(|&c| c == ' ' || c == '\t')
        .collect()
}

/// Rewrite `original_lines` per `file_edit`, returning the new file contents.
///
/// `New` and `Deleted` file edits are handled by the caller (the annotator):
/// `New` files have no "original" content to rewrite, and `Deleted` files
/// produce no content at all. This function only applies to `Modified`.
pub fn rewrite(
    file_edit: &FileEdit,
    original_lines: &[String],
    author: &str,
    date: DateTime<FixedOffset>,
    prefix: &str,
) -> Result<Vec<String>, OstrichError> {
    debug_assert_eq!(file_edit.kind, FileEditKind::Modified);

    let template = comment_template(date, author);
    let mut hunks: Vec<&Hunk> = file_edit.hunks.iter().collect();
    hunks.sort_by(|a, b| b.ordinal.cmp(&a.ordinal));

    let mut contents = original_lines.to_vec();
    for hunk in hunks {
        contents = apply_hunk(&template, prefix, &contents, hunk)?;
    }
    Ok(contents)
}

fn apply_hunk(
    template: &str,
    prefix: &str,
    contents: &[String],
    hunk: &Hunk,
) -> Result<Vec<String>, OstrichError> {
    match hunk.kind {
        HunkKind::Add => Ok(apply_add(template, prefix, contents, hunk)),
        HunkKind::Modify => Ok(apply_modify(template, prefix, contents, hunk)),
        HunkKind::Delete => Ok(apply_delete(template, prefix, contents, hunk)),
    }
}

fn apply_add(template: &str, prefix: &str, contents: &[String], hunk: &Hunk) -> Vec<String> {
    let (start, end) = marker_pair(template, prefix, "ADD");
    let indent = line_indent(&hunk.after_lines[0]);
    let n = hunk.after_lines.len();

    let head = &contents[..hunk.target_line - 1];
    let tail_from = (hunk.target_line - 1 + n).min(contents.len());
    let tail = &contents[tail_from..];

    let mut result = Vec::with_capacity(contents.len() + n + 2);
    result.extend_from_slice(head);
    result.push(format!("{indent}{start}"));
    result.extend(hunk.after_lines.iter().cloned());
    result.push(format!("{indent}{end}"));
    result.extend_from_slice(tail);
    result
}

fn apply_modify(template: &str, prefix: &str, contents: &[String], hunk: &Hunk) -> Vec<String> {
    let (start, end) = marker_pair(template, prefix, "MOD");
    let indent = line_indent(&hunk.after_lines[0]);
    let n = hunk.after_lines.len();

    let head = &contents[..hunk.target_line - 1];
    let tail_from = (hunk.target_line - 1 + n).min(contents.len());
    let tail = &contents[tail_from..];

    let mut result = Vec::with_capacity(contents.len() + n + hunk.remove_lines.len() + 2);
    result.extend_from_slice(head);
    result.push(format!("{indent}{start}"));
    for row in &hunk.remove_lines {
        let stripped = row.strip_prefix(indent.as_str()).unwrap_or(row);
        result.push(format!("{indent}{prefix} {stripped}"));
    }
    result.extend(hunk.after_lines.iter().cloned());
    result.push(format!("{indent}{end}"));
    result.extend_from_slice(tail);
    result
}

fn apply_delete(template: &str, prefix: &str, contents: &[String], hunk: &Hunk) -> Vec<String> {
    let (start, end) = marker_pair(template, prefix, "DEL");

    let (mut result, tail, indent) = if hunk.target_line >= contents.len() {
        let indent = contents
            .last()
            .map(|l| line_indent(l))
            .unwrap_or_default();
        (contents.to_vec(), Vec::new(), indent)
    } else {
        let indent = line_indent(&hunk.remove_lines[0]);
        let head = contents[..hunk.target_line - 1].to_vec();
        let tail = contents[hunk.target_line - 1..].to_vec();
        (head, tail, indent)
    };

    result.push(format!("{indent}{start}"));
    for row in &hunk.remove_lines {
        let stripped = row.strip_prefix(indent.as_str()).unwrap_or(row);
        result.push(format!("{indent}{prefix} {stripped}"));
    }
    result.push(format!("{indent}{end}"));
    result.extend(tail);
    result
}
