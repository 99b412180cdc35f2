//! Rule-based extractors for Dutch intake documents.

pub mod dates;
pub mod fields;
pub mod markers;
pub mod normalize;
pub mod patterns;
pub mod sections;

pub use dates::{parse_date, parse_date_range, parse_date_value, DateExtractor, DateRange};
pub use fields::LabelPattern;
pub use markers::{detect_activities, detect_flag_choice, detect_reason_type, ActivityMarks};
pub use normalize::{cap_chars, date_token, normalize_lines};
pub use sections::{extract_section, normalize_bullets};

/// Trait for extractors that scan free text.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in the source text.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in the scanned text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
