//! Overlay stripping: removes black-rectangle fill idioms from content
//! stream text.
//!
//! Works on newline-normalized, ASCII-dominant stream bodies only. Four
//! patterns are recognized, each replaced by a neutral comment line:
//!
//! - **A** — `0 0 0 rg`, up to 6 intermediate lines, `x y w h re`, then a
//!   fill operator (`f`, `f*`, `B`, `B*`).
//! - **B** — as A, opening with `0 g`.
//! - **C** — `q`, then within 15 lines `0 0 0 rg`, within 15 more `x y m`,
//!   within 15 more `h`, then `f`, then `Q`.
//! - **D** — as C, opening fill `0 g`.
//!
//! Every intermediate line is capped at 200 characters and must not contain
//! `BT`: text blocks are never matched, removed, or crossed. Numbers may be
//! signed with fractional parts; the rect patterns require non-negative
//! width and height literals.
//!
//! The patterns are driven by a line scanner rather than one multiline
//! expression so the `BT` guard and the length caps are enforced exactly;
//! the substitution contract is unchanged.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum fraction of tab/CR/LF/printable-ASCII bytes for a stream body to
/// be eligible for stripping.
pub const ASCII_GATE: f64 = 0.70;
/// Maximum length of an intermediate line inside a pattern.
pub const MAX_INTER_LINE_LEN: usize = 200;
/// Maximum intermediate lines between the fill color and the rectangle in
/// patterns A and B.
pub const RECT_GAP_LINES: usize = 6;
/// Maximum intermediate lines between each stage of patterns C and D.
pub const PATH_GAP_LINES: usize = 15;
/// The comment line substituted for each removed overlay.
pub const REMOVED_COMMENT: &str = "% overlay removed";

const NUM: &str = r"-?(?:\d+(?:\.\d+)?|\.\d+)";
const UNSIGNED_NUM: &str = r"(?:\d+(?:\.\d+)?|\.\d+)";

static RE_RGB_BLACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0(?:\.0+)?\s+0(?:\.0+)?\s+0(?:\.0+)?\s+rg$").unwrap());
static RE_GRAY_BLACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0(?:\.0+)?\s+g$").unwrap());
static RE_RECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{NUM}\\s+{NUM}\\s+{UNSIGNED_NUM}\\s+{UNSIGNED_NUM}\\s+re$")).unwrap()
});
static RE_RECT_FILL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:f\*?|B\*?)$").unwrap());
static RE_MOVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NUM}\\s+{NUM}\\s+m$")).unwrap());

/// Whether a byte buffer is ASCII-dominant per the 70% gate.
///
/// Empty buffers pass trivially (there is nothing to strip either way).
pub fn is_mostly_ascii(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return true;
    }
    let ok = bytes
        .iter()
        .filter(|&&b| b == b'\t' || b == b'\n' || b == b'\r' || (32..=126).contains(&b))
        .count();
    ok as f64 / bytes.len() as f64 >= ASCII_GATE
}

/// Normalize `\r\n` and bare `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove recognized black-rectangle overlay idioms.
///
/// Returns the rewritten text and the number of substitutions. When nothing
/// matches, the text is returned byte-identical with a count of zero.
pub fn strip_common_black_rect_fills(text: &str) -> (String, usize) {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut removed = 0usize;

    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();

        let matched_end = if RE_RGB_BLACK.is_match(trimmed) || RE_GRAY_BLACK.is_match(trimmed) {
            match_rect_fill(&lines, i)
        } else if trimmed == "q" {
            match_path_fill(&lines, i)
        } else {
            None
        };

        match matched_end {
            Some(end) => {
                out.push(REMOVED_COMMENT);
                removed += 1;
                i = end + 1;
            }
            None => {
                out.push(lines[i]);
                i += 1;
            }
        }
    }

    (out.join("\n"), removed)
}

/// A line is an acceptable pattern interior: short and free of `BT`.
fn is_inter_line(line: &str) -> bool {
    line.len() <= MAX_INTER_LINE_LEN && !line.contains("BT")
}

/// Patterns A/B: fill color at `start`, then a rectangle and a fill operator
/// within the gap budget. Returns the index of the final matched line.
fn match_rect_fill(lines: &[&str], start: usize) -> Option<usize> {
    let mut gap = 0;
    let mut j = start + 1;
    while j + 1 < lines.len() && gap <= RECT_GAP_LINES {
        let trimmed = lines[j].trim();
        if RE_RECT.is_match(trimmed) && RE_RECT_FILL.is_match(lines[j + 1].trim()) {
            return Some(j + 1);
        }
        if !is_inter_line(lines[j]) {
            return None;
        }
        gap += 1;
        j += 1;
    }
    None
}

/// Advance from `from` to the first line matching `target`, allowing at most
/// `max_gap` interior lines. Returns the matching index.
fn scan_for(
    lines: &[&str],
    from: usize,
    max_gap: usize,
    target: impl Fn(&str) -> bool,
) -> Option<usize> {
    let mut gap = 0;
    let mut j = from;
    while j < lines.len() && gap <= max_gap {
        if target(lines[j].trim()) {
            return Some(j);
        }
        if !is_inter_line(lines[j]) {
            return None;
        }
        gap += 1;
        j += 1;
    }
    None
}

/// Patterns C/D: `q`, black fill, `m`, `h`, `f`, `Q`. Returns the index of
/// the closing `Q` line.
fn match_path_fill(lines: &[&str], start: usize) -> Option<usize> {
    let fill_idx = scan_for(lines, start + 1, PATH_GAP_LINES, |t| {
        RE_RGB_BLACK.is_match(t) || RE_GRAY_BLACK.is_match(t)
    })?;
    let move_idx = scan_for(lines, fill_idx + 1, PATH_GAP_LINES, |t| RE_MOVE.is_match(t))?;
    let close_idx = scan_for(lines, move_idx + 1, PATH_GAP_LINES, |t| t == "h")?;
    if lines.get(close_idx + 1)?.trim() != "f" {
        return None;
    }
    if lines.get(close_idx + 2)?.trim() != "Q" {
        return None;
    }
    Some(close_idx + 2)
}
