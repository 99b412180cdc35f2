//! Date parsing for Dutch intake documents.
//!
//! Numeric dates are read day first, following Dutch convention. Every
//! successful parse yields a `NaiveDate`, which serializes as `YYYY-MM-DD`.

use chrono::NaiveDate;

use super::normalize::date_token;
use super::patterns::{DATE_DMY, DATE_DUTCH_LONG, DATE_YMD, RANGE_SEPARATOR};
use super::{ExtractionMatch, FieldExtractor};

/// Century used to expand two-digit years.
const CENTURY_PREFIX: i32 = 2000;

/// Finds every date in a piece of text.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// All dates in document order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lower = text.to_lowercase();
        let mut results: Vec<Self::Output> = Vec::new();

        let overlaps = |results: &[Self::Output], start: usize, end: usize| {
            results.iter().any(|r| match r.position {
                Some((s, e)) => start < e && s < end,
                None => false,
            })
        };

        // DD-MM-YYYY, DD/MM/YY, DD.MM.YYYY
        for caps in DATE_DMY.captures_iter(&lower) {
            let full_match = caps.get(0).unwrap();
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year = expand_year(&caps[3]);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                results.push(
                    ExtractionMatch::new(date, 0.9, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // "14 november 2025", "3 mrt. 2026"
        for caps in DATE_DUTCH_LONG.captures_iter(&lower) {
            let full_match = caps.get(0).unwrap();
            if overlaps(&results, full_match.start(), full_match.end()) {
                continue;
            }

            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = dutch_month_to_number(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                results.push(
                    ExtractionMatch::new(date, 0.95, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // YYYY-MM-DD
        for caps in DATE_YMD.captures_iter(&lower) {
            let full_match = caps.get(0).unwrap();
            // Skip the tail of a compact range like 14-11-2025-16-12-2025
            if overlaps(&results, full_match.start(), full_match.end()) {
                continue;
            }

            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                results.push(
                    ExtractionMatch::new(date, 0.9, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results.sort_by_key(|m| m.position.map(|(s, _)| s).unwrap_or(usize::MAX));
        results
    }
}

/// A from/to pair taken from a single period value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.until.is_none()
    }
}

/// Parse a single date expression.
///
/// Tried in order: numeric day-first, Dutch month name, ISO. Invalid
/// calendar dates (31-02-2025) and unrecognized text yield `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let token = date_token(raw);
    if token.is_empty() {
        return None;
    }

    for caps in DATE_DMY.captures_iter(&token) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(expand_year(&caps[3]), month, day) {
            return Some(date);
        }
    }

    for caps in DATE_DUTCH_LONG.captures_iter(&token) {
        let day: u32 = caps[1].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, dutch_month_to_number(&caps[2]), day) {
            return Some(date);
        }
    }

    for caps in DATE_YMD.captures_iter(&token) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}

/// Parse a period value such as `14-11-2025 - 16-12-2025`.
///
/// The value is split on the range separator first and each side is parsed on
/// its own, so a malformed side only loses that side. Without a separator,
/// the first two dates found are taken in order.
pub fn parse_date_range(raw: &str) -> DateRange {
    let value = raw.trim();
    let parts: Vec<&str> = RANGE_SEPARATOR.splitn(value, 2).collect();

    if let [from, until] = parts.as_slice() {
        return DateRange {
            from: parse_date(from),
            until: parse_date(until),
        };
    }

    let mut dates = DateExtractor::new().extract_all(value).into_iter().map(|m| m.value);
    DateRange {
        from: dates.next(),
        until: dates.next(),
    }
}

/// Parse a value given for a single-date label.
///
/// Forms sometimes put the whole period on the start label
/// (`Geldig vanaf: 14-11-2025 - 16-12-2025`). When the value holds a range
/// both sides are kept; otherwise `until` is `None`.
pub fn parse_date_value(raw: &str) -> DateRange {
    if RANGE_SEPARATOR.is_match(raw.trim()) {
        let range = parse_date_range(raw);
        if range.until.is_some() {
            return range;
        }
    }

    DateRange {
        from: parse_date(raw),
        until: None,
    }
}

fn expand_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() == 2 {
        CENTURY_PREFIX + year
    } else {
        year
    }
}

fn dutch_month_to_number(month: &str) -> u32 {
    match month.trim_end_matches('.') {
        "januari" | "jan" => 1,
        "februari" | "feb" => 2,
        "maart" | "mrt" | "maa" => 3,
        "april" | "apr" => 4,
        "mei" => 5,
        "juni" | "jun" => 6,
        "juli" | "jul" => 7,
        "augustus" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "oktober" | "okt" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_numeric_separators_are_equivalent() {
        assert_eq!(parse_date("14-11-2025"), Some(ymd(2025, 11, 14)));
        assert_eq!(parse_date("14/11/2025"), Some(ymd(2025, 11, 14)));
        assert_eq!(parse_date("14.11.2025"), Some(ymd(2025, 11, 14)));
    }

    #[test]
    fn test_single_digit_day_and_month() {
        assert_eq!(parse_date("3-2-2026"), Some(ymd(2026, 2, 3)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("14-11-25"), Some(ymd(2025, 11, 14)));
        assert_eq!(parse_date("01/02/99"), Some(ymd(2099, 2, 1)));
    }

    #[test]
    fn test_dutch_month_names() {
        assert_eq!(parse_date("14 november 2025"), Some(ymd(2025, 11, 14)));
        assert_eq!(parse_date("Vrijdag 14 November 2025"), Some(ymd(2025, 11, 14)));
        assert_eq!(parse_date("3 mrt. 2026"), Some(ymd(2026, 3, 3)));
        assert_eq!(parse_date("1 sept 2025"), Some(ymd(2025, 9, 1)));
        assert_eq!(parse_date("1 mei 2025"), Some(ymd(2025, 5, 1)));
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_date("2025-11-14"), Some(ymd(2025, 11, 14)));
    }

    #[test]
    fn test_invalid_dates_yield_none() {
        assert_eq!(parse_date("31-02-2025"), None);
        assert_eq!(parse_date("14-13-2025"), None);
        assert_eq!(parse_date("onbekend"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("32 januari 2025"), None);
    }

    #[test]
    fn test_range_with_spaced_hyphen() {
        let range = parse_date_range("14-11-2025 - 16-12-2025");
        assert_eq!(range.from, Some(ymd(2025, 11, 14)));
        assert_eq!(range.until, Some(ymd(2025, 12, 16)));
    }

    #[test]
    fn test_range_with_en_dash_and_words() {
        let range = parse_date_range("14 november 2025 – 16 december 2025");
        assert_eq!(range.from, Some(ymd(2025, 11, 14)));
        assert_eq!(range.until, Some(ymd(2025, 12, 16)));

        let range = parse_date_range("van 1-9-2025 t/m 31-12-2025");
        assert_eq!(range.from, Some(ymd(2025, 9, 1)));
        assert_eq!(range.until, Some(ymd(2025, 12, 31)));
    }

    #[test]
    fn test_range_with_malformed_side() {
        let range = parse_date_range("14-11-2025 - onbekend");
        assert_eq!(range.from, Some(ymd(2025, 11, 14)));
        assert_eq!(range.until, None);

        let range = parse_date_range("?? - 16-12-2025");
        assert_eq!(range.from, None);
        assert_eq!(range.until, Some(ymd(2025, 12, 16)));
    }

    #[test]
    fn test_compact_range_without_spaces() {
        let range = parse_date_range("14-11-2025-16-12-2025");
        assert_eq!(range.from, Some(ymd(2025, 11, 14)));
        assert_eq!(range.until, Some(ymd(2025, 12, 16)));
    }

    #[test]
    fn test_single_value_is_from_only() {
        let range = parse_date_range("14-11-2025");
        assert_eq!(range.from, Some(ymd(2025, 11, 14)));
        assert_eq!(range.until, None);
        assert!(parse_date_range("geen").is_empty());
    }

    #[test]
    fn test_extract_all_in_document_order() {
        let text = "Afgegeven op 2 december 2025, geldig 14-11-2025 tot 2026-01-31";
        let dates: Vec<NaiveDate> = DateExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(
            dates,
            vec![ymd(2025, 12, 2), ymd(2025, 11, 14), ymd(2026, 1, 31)]
        );
    }

    #[test]
    fn test_date_value_keeps_period() {
        assert_eq!(
            parse_date_value("14-11-2025 - 16-12-2025"),
            DateRange { from: Some(ymd(2025, 11, 14)), until: Some(ymd(2025, 12, 16)) }
        );
        assert_eq!(
            parse_date_value("1 december 2025 t/m 15 dec. 2025"),
            DateRange { from: Some(ymd(2025, 12, 1)), until: Some(ymd(2025, 12, 15)) }
        );
    }

    #[test]
    fn test_date_value_single_date() {
        assert_eq!(
            parse_date_value("14-11-2025"),
            DateRange { from: Some(ymd(2025, 11, 14)), until: None }
        );
        assert_eq!(
            parse_date_value("14-11-2025 - onbekend"),
            DateRange { from: Some(ymd(2025, 11, 14)), until: None }
        );
        assert!(parse_date_value("binnenkort").is_empty());
    }
}
