//! Line splitting and date-token cleanup.

/// Split raw input into trimmed, non-empty lines.
///
/// Non-breaking spaces (common in text pasted from word processors) become
/// plain spaces; `\r\n` endings are handled by `str::lines`.
pub fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.replace('\u{00a0}', " "))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Lower-case a date expression and strip punctuation noise.
///
/// Date separators (`-`, `/`, `.`) and dashes used in ranges survive;
/// everything else that is not alphanumeric becomes whitespace, which is then
/// collapsed. Only the date parser consumes this form.
pub fn date_token(s: &str) -> String {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '/' | '.' | '–' | '—') {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('.')
        .to_string()
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn cap_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}
