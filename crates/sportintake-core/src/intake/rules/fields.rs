//! Labeled single-value extraction ("Label: value").
//!
//! Forms are filled in inconsistently: sometimes the value follows the label
//! on the same line, sometimes the label line is left blank and the value sits
//! on the next physical line. Both are handled here.

use regex::Regex;

/// Case-insensitive label matcher anchored at the start of a line.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    regex: Regex,
}

impl LabelPattern {
    /// Build a pattern from regex fragments, one per accepted label spelling.
    ///
    /// A line matches when it starts with one of the labels (optionally after
    /// a bullet) and the label is followed by a colon or by nothing at all.
    pub fn new(labels: &[&str]) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(
            r"(?i)^(?:[-*•·]\s*)?(?:{})\s*(?::\s*(.*?))?\s*$",
            labels.join("|")
        ))?;
        Ok(Self { regex })
    }

    /// The same-line value if `line` is a label line for this pattern.
    ///
    /// Returns `Some("")` for a bare label line.
    pub fn value_on_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .map(|caps| caps.get(1).map(|m| m.as_str().trim()).unwrap_or(""))
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Find the value for `pattern` in `lines`.
///
/// The first matching line with a non-empty same-line value wins. A matching
/// line with a blank value takes the next line instead, unless that line is
/// itself a label line (`is_label_line`), in which case scanning continues.
pub fn extract_value<F>(pattern: &LabelPattern, lines: &[String], is_label_line: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    for (i, line) in lines.iter().enumerate() {
        let Some(value) = pattern.value_on_line(line) else {
            continue;
        };

        if !value.is_empty() {
            return Some(value.to_string());
        }

        if let Some(next) = lines.get(i + 1) {
            if !is_label_line(next) && !pattern.is_match(next) {
                return Some(next.trim().to_string());
            }
        }
    }

    None
}
