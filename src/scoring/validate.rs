//! Quality gate for raw completions.
//!
//! Advisory only: [`super::extract::parse`] handles anything, validated or not.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MIN_RESPONSE_CHARS;

use super::error::RejectReason;

/// Shortest run of one repeated character that marks a degenerate completion.
pub const MAX_CHARACTER_RUN: usize = 21;

const ERROR_PREAMBLES: [&str; 4] = ["Error", "Failed", "Unable", "Invalid"];

static ALL_ASTERISKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*+$").expect("invalid asterisk regex"));

static SYMBOL_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\w\s]{10,}").expect("invalid symbol run regex"));

static SCORE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:score|Score)[:\s]*[0-9.]+").expect("invalid score regex"));

static SCORE_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)\{.*"score".*\}"#).expect("invalid score object regex"));

/// Checks a completion in a fixed order and reports the first failed rule.
pub fn validate(raw: &str) -> Result<(), RejectReason> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(RejectReason::Empty);
    }

    let len = text.chars().count();
    if len < MIN_RESPONSE_CHARS {
        return Err(RejectReason::TooShort { len });
    }

    if ALL_ASTERISKS_RE.is_match(text) {
        return Err(RejectReason::AllAsterisks);
    }

    if SYMBOL_RUN_RE.is_match(text) {
        return Err(RejectReason::SymbolRun);
    }

    if let Some((ch, run)) = longest_run(text).filter(|(_, run)| *run >= MAX_CHARACTER_RUN) {
        return Err(RejectReason::RepeatedCharacter { ch, run });
    }

    if let Some(word) = ERROR_PREAMBLES.into_iter().find(|w| text.starts_with(w)) {
        return Err(RejectReason::ErrorPreamble { word });
    }

    if !SCORE_TOKEN_RE.is_match(text) && !SCORE_OBJECT_RE.is_match(text) {
        return Err(RejectReason::NoScore);
    }

    Ok(())
}

pub fn is_valid(raw: &str) -> bool {
    validate(raw).is_ok()
}

/// Longest run of one character, ignoring line breaks.
fn longest_run(text: &str) -> Option<(char, usize)> {
    let mut best: Option<(char, usize)> = None;
    let mut current: Option<(char, usize)> = None;

    for ch in text.chars() {
        if ch == '\n' {
            current = None;
            continue;
        }
        current = match current {
            Some((prev, run)) if prev == ch => Some((ch, run + 1)),
            _ => Some((ch, 1)),
        };
        if let Some((c, run)) = current
            && best.is_none_or(|(_, b)| run > b)
        {
            best = Some((c, run));
        }
    }

    best
}
