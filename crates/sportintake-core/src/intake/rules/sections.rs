//! Multi-line narrative blocks bounded by section headings.

use super::fields::LabelPattern;
use super::normalize::cap_chars;
use super::patterns::BULLET;

/// Capture the block that starts at the first `start` label line.
///
/// Text after the label on the start line is included. The block runs until
/// the first line for which `is_stop` returns true, or to the end of the
/// document. Bullets are unified and the result is capped at `max_chars`.
pub fn extract_section<F>(
    lines: &[String],
    start: &LabelPattern,
    is_stop: F,
    max_chars: usize,
) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let (start_idx, first) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| start.value_on_line(line).map(|v| (i, v)))?;

    let mut block: Vec<&str> = Vec::new();
    if !first.is_empty() {
        block.push(first);
    }

    for line in &lines[start_idx + 1..] {
        if is_stop(line) {
            break;
        }
        block.push(line);
    }

    let text = normalize_bullets(&block.join("\n"));
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(cap_chars(text, max_chars))
}

/// Replace leading `-`, `*`, `–`, `•` bullets with a uniform `• `.
pub fn normalize_bullets(text: &str) -> String {
    text.lines()
        .map(|line| {
            if BULLET.is_match(line) {
                format!("• {}", BULLET.replace(line, "").trim())
            } else {
                line.trim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::rules::normalize::normalize_lines;

    fn heading(labels: &[&str]) -> LabelPattern {
        LabelPattern::new(labels).unwrap()
    }

    #[test]
    fn test_section_between_headings() {
        let lines = normalize_lines(
            "Onderbouwing:\nTim heeft veel energie.\n- Goed in teamverband\n* Houdt van voetbal\nLeerdoelen:\nSamenwerken",
        );
        let start = heading(&["onderbouwing"]);
        let stop = heading(&["leerdoelen"]);

        let section = extract_section(&lines, &start, |l| stop.is_match(l), 2000).unwrap();
        assert_eq!(
            section,
            "Tim heeft veel energie.\n• Goed in teamverband\n• Houdt van voetbal"
        );
    }

    #[test]
    fn test_section_includes_text_on_heading_line() {
        let lines = normalize_lines("Leerdoelen: Op tijd komen\n- Afspraken nakomen");
        let start = heading(&["leerdoelen"]);

        let section = extract_section(&lines, &start, |_| false, 2000).unwrap();
        assert_eq!(section, "Op tijd komen\n• Afspraken nakomen");
    }

    #[test]
    fn test_section_runs_to_end_without_stop() {
        let lines = normalize_lines("Tips:\nRustig benaderen\nDuidelijke regels");
        let section = extract_section(&lines, &heading(&["tips"]), |_| false, 2000).unwrap();
        assert_eq!(section, "Rustig benaderen\nDuidelijke regels");
    }

    #[test]
    fn test_section_is_capped() {
        let body = "a".repeat(50);
        let lines = normalize_lines(&format!("Tips:\n{}", body));
        let section = extract_section(&lines, &heading(&["tips"]), |_| false, 10).unwrap();
        assert_eq!(section.chars().count(), 10);
    }

    #[test]
    fn test_empty_or_missing_section() {
        let lines = normalize_lines("Tips:\nLeerdoelen: iets");
        let stop = heading(&["leerdoelen"]);
        assert_eq!(extract_section(&lines, &heading(&["tips"]), |l| stop.is_match(l), 100), None);
        assert_eq!(extract_section(&lines, &heading(&["motivatie"]), |_| false, 100), None);
    }

    #[test]
    fn test_normalize_bullets() {
        assert_eq!(normalize_bullets("- een\n–  twee\ndrie"), "• een\n• twee\ndrie");
    }
}
