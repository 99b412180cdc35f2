//! Common regex patterns for Dutch intake documents.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric dates, day first: 14-11-2025, 14/11/25, 14.11.2025
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})\b"
    ).unwrap();

    // Dutch month names, applied to a lower-cased date token.
    // Longer alternatives come first so "sept" wins over "sep".
    pub static ref DATE_DUTCH_LONG: Regex = Regex::new(
        r"\b(\d{1,2})\s*(januari|februari|maart|april|mei|juni|juli|augustus|september|oktober|november|december|sept|jan|feb|mrt|maa|apr|jun|jul|aug|sep|okt|nov|dec)\.?\s+(\d{4})\b"
    ).unwrap();

    // From/to separators inside a single period value. A bare hyphen only
    // counts when surrounded by whitespace, since numeric dates use it too.
    pub static ref RANGE_SEPARATOR: Regex = Regex::new(
        r"(?i)\s+[-–—]\s+|\s*[–—]\s*|\s+(?:t/m|tot\s+en\s+met|tot)\s+"
    ).unwrap();

    // Leading bullet glyphs on narrative lines.
    pub static ref BULLET: Regex = Regex::new(
        r"^\s*[-*–•·]\s*"
    ).unwrap();

    // Explicit "not applicable" answers.
    pub static ref NOT_APPLICABLE: Regex = Regex::new(
        r"(?i)^\s*(?:n\.?\s*v\.?\s*t\.?|niet\s+van\s+toepassing|geen)\s*\.?\s*$"
    ).unwrap();

    // Standalone upper-case X checkbox marker.
    pub static ref CHECK_MARKER: Regex = Regex::new(
        r"(?:^|[\s()\[\]:|/])X(?:$|[\s.,;:()\[\]|/])"
    ).unwrap();

    // Parenthesized name list directly after an option label.
    pub static ref NAME_LIST: Regex = Regex::new(
        r"^\s*\(([^)]*)\)"
    ).unwrap();

    pub static ref NAME_SEPARATOR: Regex = Regex::new(
        r"\s*(?:[,;/&]|\s+en\s+)\s*"
    ).unwrap();

    pub static ref YES: Regex = Regex::new(
        r"(?i)^(?:ja|yes|j|x|akkoord|mogelijk|kan)\b"
    ).unwrap();

    pub static ref NO: Regex = Regex::new(
        r"(?i)^(?:nee|no|n|niet|kan\s+niet)\b"
    ).unwrap();
}
