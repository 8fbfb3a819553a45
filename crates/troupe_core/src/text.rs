//! Small text helpers shared by the parser and the quality gate.

/// Normalize line endings and trim the outer whitespace of a script.
///
/// # Examples
///
/// ```
/// use troupe_core::clean_script_text;
///
/// assert_eq!(clean_script_text("  A: hi\r\nB: yo\r"), "A: hi\nB: yo");
/// ```
pub fn clean_script_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `(...)` asides, e.g. stage business embedded in a spoken line.
pub fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' | '（' => depth += 1,
            ')' | '）' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

/// True if the trimmed text is entirely wrapped in parentheses or brackets.
pub fn is_wrapped_direction(text: &str) -> bool {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => matches!(
            (open, close),
            ('(', ')') | ('[', ']') | ('（', '）') | ('【', '】')
        ),
        _ => false,
    }
}

/// True if the utterance ends with sentence-final punctuation.
pub fn has_terminal_punctuation(text: &str) -> bool {
    text.trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| matches!(c, '.' | '!' | '?' | '…' | '。' | '~' | '"' | '”' | '！' | '？'))
}
