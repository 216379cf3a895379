//! Line-level diff based on the longest common subsequence.
//!
//! The common prefix and suffix are stripped before the LCS table is built so
//! that typical edits (a few lines changed in a large file) only pay for the
//! changed region.

use crate::model::{DiffHunk, DiffLine};

/// Lines of unchanged context around each hunk.
pub const CONTEXT_LINES: usize = 3;

/// Upper bound on LCS table cells; larger regions are reported as one replace.
const MAX_LCS_CELLS: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Equal { old: usize, new: usize },
    Delete { old: usize },
    Insert { new: usize },
}

impl Edit {
    fn is_change(&self) -> bool {
        !matches!(self, Edit::Equal { .. })
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn strip_eol(line: &str) -> String {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
        .to_string()
}

/// Edit script over the whole of `old` and `new`.
fn edit_script(old: &[&str], new: &[&str], max_cells: usize) -> Vec<Edit> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    let mut edits = Vec::with_capacity(old.len().max(new.len()));
    for i in 0..prefix {
        edits.push(Edit::Equal { old: i, new: i });
    }

    let a = &old[prefix..old.len() - suffix];
    let b = &new[prefix..new.len() - suffix];
    middle_edits(a, b, prefix, max_cells, &mut edits);

    for k in 0..suffix {
        edits.push(Edit::Equal {
            old: old.len() - suffix + k,
            new: new.len() - suffix + k,
        });
    }
    edits
}

/// LCS over the middle region; indices are offset by `base` in the output.
fn middle_edits(a: &[&str], b: &[&str], base: usize, max_cells: usize, edits: &mut Vec<Edit>) {
    let (n, m) = (a.len(), b.len());
    let cells = (n + 1).saturating_mul(m + 1);
    if n == 0 || m == 0 || cells > max_cells {
        edits.extend((0..n).map(|i| Edit::Delete { old: base + i }));
        edits.extend((0..m).map(|j| Edit::Insert { new: base + j }));
        return;
    }

    // lcs[i * (m + 1) + j] = LCS length of a[i..] and b[j..]
    let width = m + 1;
    let mut lcs = vec![0u32; cells];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if a[i] == b[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            edits.push(Edit::Equal {
                old: base + i,
                new: base + j,
            });
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            edits.push(Edit::Delete { old: base + i });
            i += 1;
        } else {
            edits.push(Edit::Insert { new: base + j });
            j += 1;
        }
    }
    edits.extend((i..n).map(|i| Edit::Delete { old: base + i }));
    edits.extend((j..m).map(|j| Edit::Insert { new: base + j }));
}

/// Compute unified-style hunks between two texts.
///
/// Returns no hunks when the texts are line-for-line identical.
pub fn diff_lines(old_text: &str, new_text: &str) -> Vec<DiffHunk> {
    diff_lines_capped(old_text, new_text, MAX_LCS_CELLS)
}

fn diff_lines_capped(old_text: &str, new_text: &str, max_cells: usize) -> Vec<DiffHunk> {
    let old = split_lines(old_text);
    let new = split_lines(new_text);
    let edits = edit_script(&old, &new, max_cells);

    let changes: Vec<usize> = edits
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_change())
        .map(|(i, _)| i)
        .collect();
    if changes.is_empty() {
        return Vec::new();
    }

    // Group changes whose separating context would overlap.
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &idx in &changes {
        let start = idx.saturating_sub(CONTEXT_LINES);
        let end = (idx + CONTEXT_LINES + 1).min(edits.len());
        match ranges.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => ranges.push((start, end)),
        }
    }

    // Lines consumed on each side before edit index k.
    let mut old_before = Vec::with_capacity(edits.len() + 1);
    let mut new_before = Vec::with_capacity(edits.len() + 1);
    let (mut o, mut n) = (0usize, 0usize);
    for edit in &edits {
        old_before.push(o);
        new_before.push(n);
        match edit {
            Edit::Equal { .. } => {
                o += 1;
                n += 1;
            }
            Edit::Delete { .. } => o += 1,
            Edit::Insert { .. } => n += 1,
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| {
            let mut lines = Vec::with_capacity(end - start);
            let (mut old_lines, mut new_lines) = (0, 0);
            for edit in &edits[start..end] {
                match *edit {
                    Edit::Equal { old: oi, .. } => {
                        old_lines += 1;
                        new_lines += 1;
                        lines.push(DiffLine::Context(strip_eol(old[oi])));
                    }
                    Edit::Delete { old: oi } => {
                        old_lines += 1;
                        lines.push(DiffLine::Removed(strip_eol(old[oi])));
                    }
                    Edit::Insert { new: ni } => {
                        new_lines += 1;
                        lines.push(DiffLine::Added(strip_eol(new[ni])));
                    }
                }
            }
            let old_start = old_before[start] + usize::from(old_lines > 0);
            let new_start = new_before[start] + usize::from(new_lines > 0);
            DiffHunk {
                old_start,
                old_lines,
                new_start,
                new_lines,
                lines,
            }
        })
        .collect()
}

fn range_header(start: usize, len: usize) -> String {
    if len == 1 {
        start.to_string()
    } else {
        format!("{},{}", start, len)
    }
}

/// Number of lines in `text` and whether the last one lacks a newline.
fn line_shape(text: &str) -> (usize, bool) {
    let count = split_lines(text).len();
    (count, !text.is_empty() && !text.ends_with('\n'))
}

/// Render hunks of `old_text` -> `new_text` as unified diff text with `a/`
/// and `b/` path headers.
pub fn render_unified(path: &str, old_text: &str, new_text: &str, hunks: &[DiffHunk]) -> String {
    const NO_EOL: &str = "\\ No newline at end of file\n";
    let (old_count, old_no_eol) = line_shape(old_text);
    let (new_count, new_no_eol) = line_shape(new_text);

    let mut out = format!("--- a/{}\n+++ b/{}\n", path, path);
    for hunk in hunks {
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            range_header(hunk.old_start, hunk.old_lines),
            range_header(hunk.new_start, hunk.new_lines)
        ));
        // 1-based numbers of the next line on each side
        let mut old_no = hunk.old_start.max(1);
        let mut new_no = hunk.new_start.max(1);
        for line in &hunk.lines {
            let (marker, text, last) = match line {
                DiffLine::Context(t) => {
                    let last = old_no == old_count && old_no_eol;
                    old_no += 1;
                    new_no += 1;
                    (' ', t, last)
                }
                DiffLine::Removed(t) => {
                    let last = old_no == old_count && old_no_eol;
                    old_no += 1;
                    ('-', t, last)
                }
                DiffLine::Added(t) => {
                    let last = new_no == new_count && new_no_eol;
                    new_no += 1;
                    ('+', t, last)
                }
            };
            out.push(marker);
            out.push_str(text);
            out.push('\n');
            if last {
                out.push_str(NO_EOL);
            }
        }
    }
    out
}
