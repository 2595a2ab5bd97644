//! Map a free-form model reply back onto one of the extracted options.
//!
//! The rules are heuristic. They favour returning *an* option over being
//! right: a reply starting with the word "a" is read as option A, and the
//! token-prefix rule picks the first option in list order when several share
//! a prefix.

use std::sync::LazyLock;

use regex::Regex;

/// A leading a-d that stands alone as a word (`"b"`, `"c) ..."`, `"d. ..."`).
///
/// The boundary is ASCII: a following non-ASCII letter (`"bé"`) still ends the word.
static LETTER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-d])(?-u:\b)").expect("letter pattern compiles"));

/// Number of leading tokens of an option that must appear in the reply.
const PREFIX_TOKENS: usize = 3;

/// Return the option the reply most likely selects, or `raw` unchanged.
///
/// Only the first line of the reply is inspected. Rules, first match wins:
/// 1. case-insensitive exact match with an option,
/// 2. a leading letter a-d used as an index,
/// 3. the option's first three tokens appearing anywhere in the line.
pub fn normalize_answer(raw: &str, options: &[String]) -> String {
    if options.is_empty() {
        return raw.to_string();
    }

    let lower = raw.to_lowercase();
    let first_line = lower.split(['\n', '\r']).next().unwrap_or_default().trim();

    if let Some(option) = options
        .iter()
        .find(|option| option.to_lowercase() == first_line)
    {
        return option.clone();
    }

    if let Some(option) = letter_choice(first_line, options) {
        return option.clone();
    }

    if let Some(option) = options.iter().find(|option| {
        let prefix = token_prefix(option);
        !prefix.is_empty() && first_line.contains(&prefix)
    }) {
        return option.clone();
    }

    raw.to_string()
}

fn letter_choice<'a>(line: &str, options: &'a [String]) -> Option<&'a String> {
    let letter = LETTER_PREFIX.captures(line)?.get(1)?.as_str().chars().next()?;
    let index = (letter as usize).checked_sub('a' as usize)?;
    options.get(index)
}

fn token_prefix(option: &str) -> String {
    option
        .to_lowercase()
        .split_whitespace()
        .take(PREFIX_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}
