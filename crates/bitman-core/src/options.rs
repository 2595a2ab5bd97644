use std::sync::LazyLock;

use regex::Regex;

/// A single-character label (A-D, a-d, 0-9), a `)`, `.` or `-`, then the option text.
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Da-d0-9][).\-]\s*(.+)$").expect("option pattern compiles")
});

/// Extract labelled answer options from raw selected text.
///
/// Lines are split on `\n`/`\r`, trimmed, and kept only if they look like
/// `A) text`, `b. text` or `3- text`. Everything else (question text,
/// unlabelled lines, `E)` and later labels, multi-digit labels) is dropped.
pub fn extract_options(raw: &str) -> Vec<String> {
    raw.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| OPTION_LINE.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
