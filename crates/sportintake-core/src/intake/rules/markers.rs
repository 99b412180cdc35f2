//! Marker-based multi-select detection.
//!
//! Option lists on the forms are ticked with an inline `X` next to the option
//! label, or by writing the responsible staff in parentheses after it:
//!
//! ```text
//! Sport (Orlando, Sebastiaan, Tim)  X
//! Muziek
//! Creatief aanbod   X
//! ```
//!
//! Each occurrence of a vocabulary label owns the stretch of its line up to
//! the next vocabulary label, so an `X` is attributed to the nearest option
//! on its left.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::{Activity, ReasonType};

use super::patterns::{BULLET, CHECK_MARKER, NAME_LIST, NAME_SEPARATOR};

lazy_static! {
    static ref ACTIVITY_LABELS: Vec<(Activity, Regex)> = Activity::ALL
        .iter()
        .map(|a| (*a, label_regex(a.label())))
        .collect();

    static ref REASON_LABELS: Vec<(ReasonType, Regex)> = ReasonType::ALL
        .iter()
        .flat_map(|r| r.form_labels().iter().map(move |l| (*r, label_regex(l))))
        .collect();

    static ref FLAG_LABELS: Vec<(bool, Regex)> = vec![
        (true, label_regex("ja")),
        (false, label_regex("nee")),
    ];
}

fn label_regex(label: &str) -> Regex {
    let body = label
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!(r"(?i)\b{}\b", body)).unwrap()
}

/// One option label occurrence and the text it owns.
struct OptionSegment<'a, T> {
    option: T,
    start: usize,
    tail: &'a str,
}

fn option_segments<'a, T: Copy>(labels: &[(T, Regex)], line: &'a str) -> Vec<OptionSegment<'a, T>> {
    let mut hits: Vec<(T, usize, usize)> = labels
        .iter()
        .flat_map(|(option, re)| re.find_iter(line).map(move |m| (*option, m.start(), m.end())))
        .collect();
    hits.sort_by_key(|(_, start, _)| *start);

    hits.iter()
        .enumerate()
        .map(|(i, (option, start, end))| {
            let tail_end = hits
                .get(i + 1)
                .map(|(_, next_start, _)| (*next_start).max(*end))
                .unwrap_or(line.len());
            OptionSegment {
                option: *option,
                start: *start,
                tail: &line[*end..tail_end],
            }
        })
        .collect()
}

/// Names in a parenthesized list directly after an option label.
///
/// Parentheses holding anything other than names ("(2x per week)",
/// "(n.v.t.)") are not treated as a selection.
fn responsible_names(tail: &str) -> Option<Vec<String>> {
    let caps = NAME_LIST.captures(tail)?;
    let names: Vec<String> = NAME_SEPARATOR
        .split(caps[1].trim())
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    let looks_like_name = |n: &String| {
        n.chars().next().is_some_and(|c| c.is_uppercase())
            && !n.chars().any(|c| c.is_ascii_digit())
    };

    if !names.is_empty() && names.iter().all(looks_like_name) {
        Some(names)
    } else {
        None
    }
}

/// Activities selected in a document, with the staff named next to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityMarks {
    /// Selected activities in vocabulary order.
    pub activities: BTreeSet<Activity>,
    /// Responsible persons in document order, de-duplicated.
    pub responsible_persons: Vec<String>,
}

/// Detect selected activities and responsible persons.
pub fn detect_activities(text: &str) -> ActivityMarks {
    let mut marks = ActivityMarks::default();

    for line in text.lines() {
        for segment in option_segments(ACTIVITY_LABELS.as_slice(), line) {
            if CHECK_MARKER.is_match(segment.tail) {
                marks.activities.insert(segment.option);
            }
            if let Some(names) = responsible_names(segment.tail) {
                marks.activities.insert(segment.option);
                for name in names {
                    if !marks.responsible_persons.contains(&name) {
                        marks.responsible_persons.push(name);
                    }
                }
            }
        }
    }

    marks
}

/// Detect the ticked mutation reason, if any.
///
/// When several options are ticked the first in form order wins.
pub fn detect_reason_type(text: &str) -> Option<ReasonType> {
    let mut ticked: Vec<ReasonType> = text
        .lines()
        .flat_map(|line| option_segments(REASON_LABELS.as_slice(), line))
        .filter(|s| CHECK_MARKER.is_match(s.tail))
        .map(|s| s.option)
        .collect();

    ticked.sort_by_key(|r| ReasonType::ALL.iter().position(|x| x == r));
    ticked.into_iter().next()
}

/// Read a yes/no answer written as a two-option checklist (`Ja  Nee X`).
///
/// Returns `None` when the value does not list both options. Otherwise the
/// inner value is the ticked option, or `None` when neither or both carry
/// an `X`.
pub fn detect_flag_choice(value: &str) -> Option<Option<bool>> {
    let segments = option_segments(FLAG_LABELS.as_slice(), value);
    let lists_both = segments.iter().any(|s| s.option) && segments.iter().any(|s| !s.option);
    if !lists_both {
        return None;
    }

    let mut ticked: Vec<bool> = segments
        .iter()
        .filter(|s| CHECK_MARKER.is_match(s.tail))
        .map(|s| s.option)
        .collect();
    ticked.dedup();

    match ticked.as_slice() {
        [answer] => Some(Some(*answer)),
        _ => Some(None),
    }
}

fn is_ticked_option_line<T: Copy>(labels: &[(T, Regex)], line: &str) -> bool {
    let stripped = BULLET.replace(line.trim(), "");
    option_segments(labels, &stripped)
        .first()
        .is_some_and(|s| s.start == 0 && (CHECK_MARKER.is_match(s.tail) || responsible_names(s.tail).is_some()))
}

/// True for checklist lines such as `Sport (Tim) X` or `Muziek  X`.
pub fn is_activity_line(line: &str) -> bool {
    is_ticked_option_line(ACTIVITY_LABELS.as_slice(), line)
}

/// True for checklist lines such as `Medisch X`.
pub fn is_reason_line(line: &str) -> bool {
    is_ticked_option_line(REASON_LABELS.as_slice(), line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_with_name_list() {
        let marks = detect_activities("Sport (Orlando, Sebastiaan, Tim)  X");
        assert_eq!(marks.activities.into_iter().collect::<Vec<_>>(), vec![Activity::Sport]);
        assert_eq!(marks.responsible_persons, vec!["Orlando", "Sebastiaan", "Tim"]);
    }

    #[test]
    fn test_marker_whitespace_does_not_matter() {
        for line in ["Sport X", "Sport\tX", "Sport (Tim)X", "Sport:      X"] {
            let marks = detect_activities(line);
            assert!(marks.activities.contains(&Activity::Sport), "failed for {:?}", line);
        }
    }

    #[test]
    fn test_unmarked_options_are_not_selected() {
        let text = "Sport\nMuziek\nCreatief aanbod";
        assert!(detect_activities(text).activities.is_empty());
    }

    #[test]
    fn test_vocabulary_order_not_document_order() {
        let text = "Koken X\nCreatief   aanbod X\nMuziek (Anna) \nSport X";
        let marks = detect_activities(text);
        let labels: Vec<&str> = marks.activities.iter().map(|a| a.label()).collect();
        assert_eq!(labels, vec!["Sport", "Muziek", "Creatief aanbod", "Koken"]);
        assert_eq!(marks.responsible_persons, vec!["Anna"]);
    }

    #[test]
    fn test_marker_belongs_to_nearest_label() {
        let marks = detect_activities("Sport    Muziek X    Dans");
        assert_eq!(marks.activities.into_iter().collect::<Vec<_>>(), vec![Activity::Muziek]);
    }

    #[test]
    fn test_non_name_parentheses_ignored() {
        let marks = detect_activities("Sport (2x per week)\nMuziek (n.v.t.)");
        assert!(marks.activities.is_empty());
        assert!(marks.responsible_persons.is_empty());
    }

    #[test]
    fn test_label_inside_word_is_ignored() {
        let marks = detect_activities("Sportindicatie X");
        assert!(marks.activities.is_empty());
    }

    #[test]
    fn test_names_deduplicated_across_activities() {
        let marks = detect_activities("Sport (Tim, Anna) X\nDans (Anna en Joost)");
        assert_eq!(marks.responsible_persons, vec!["Tim", "Anna", "Joost"]);
        assert!(marks.activities.contains(&Activity::Dans));
    }

    #[test]
    fn test_reason_type_marker() {
        let text = "Reden type:\nMedisch\nIncident   X\nOntwikkeling";
        assert_eq!(detect_reason_type(text), Some(ReasonType::Incident));
        assert_eq!(detect_reason_type("Medisch\nIncident"), None);
        assert_eq!(detect_reason_type("Overig X"), Some(ReasonType::Other));
    }

    #[test]
    fn test_flag_choice_follows_marker() {
        assert_eq!(detect_flag_choice("Ja X Nee"), Some(Some(true)));
        assert_eq!(detect_flag_choice("Ja  Nee X"), Some(Some(false)));
        assert_eq!(detect_flag_choice("Ja / Nee   X"), Some(Some(false)));
        assert_eq!(detect_flag_choice("Ja / Nee"), Some(None));
        assert_eq!(detect_flag_choice("Ja X  Nee X"), Some(None));
        assert_eq!(detect_flag_choice("Ja, onder begeleiding"), None);
    }

    #[test]
    fn test_option_line_detection() {
        assert!(is_activity_line("- Sport (Tim) X"));
        assert!(is_activity_line("Muziek  X"));
        assert!(!is_activity_line("Sport is goed voor hem."));
        assert!(!is_activity_line("Hij doet aan Sport X"));
        assert!(is_reason_line("Medisch X"));
    }
}
