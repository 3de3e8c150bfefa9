//! Display-text tidying applied after tokens are removed.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static PUNCTUATION_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([.,!?;])\s*").expect("valid punctuation regex"));

static FINAL_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([.,!?;])$").expect("valid final punctuation regex"));

static LEADING_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[\s"'“”]+"#).expect("valid leading quote regex"));

static TRAILING_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\s"'“”]+$"#).expect("valid trailing quote regex"));

static LEADING_STOP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[.,]\s*").expect("valid leading stop regex"));

/// One ordered tidying pass.
pub(crate) fn tidy(text: &str) -> String {
    let text = WHITESPACE_RUN.replace_all(text, " ");
    let text = PUNCTUATION_SPACING.replace_all(&text, "$1 ");
    let text = FINAL_PUNCTUATION.replace(&text, "$1");
    let text = LEADING_QUOTES.replace(&text, "");
    let text = TRAILING_QUOTES.replace(&text, "");
    let text = LEADING_STOP.replace(&text, "");
    text.trim().to_owned()
}
