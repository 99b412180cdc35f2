//! Input guard, required-field validation and the extraction outcome type.

use tracing::{info, warn};

use crate::error::ParseError;
use crate::models::record::{DocumentKind, ParsedRecord};

use super::parser::HeuristicParser;

/// Advisory attached to every record produced by the heuristic path.
pub const FALLBACK_WARNING: &str =
    "Automatisch herkend zonder AI-extractie; controleer de gegevens voor opslaan.";

/// Which path produced a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    /// The remote extractor produced the record.
    Ai(T),
    /// The heuristic parser produced the record; it needs human review.
    Fallback { record: T, warning: String },
}

impl<T> Extraction<T> {
    pub fn record(&self) -> &T {
        match self {
            Extraction::Ai(record) | Extraction::Fallback { record, .. } => record,
        }
    }

    pub fn into_record(self) -> T {
        match self {
            Extraction::Ai(record) | Extraction::Fallback { record, .. } => record,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback { .. })
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Extraction::Ai(_) => None,
            Extraction::Fallback { warning, .. } => Some(warning),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Extraction<U> {
        match self {
            Extraction::Ai(record) => Extraction::Ai(f(record)),
            Extraction::Fallback { record, warning } => Extraction::Fallback {
                record: f(record),
                warning,
            },
        }
    }
}

impl Extraction<ParsedRecord> {
    /// Wrap a heuristic record, copying the warning into the record itself.
    pub fn fallback(mut record: ParsedRecord) -> Self {
        record.set_warning(FALLBACK_WARNING);
        Extraction::Fallback {
            record,
            warning: FALLBACK_WARNING.to_string(),
        }
    }
}

/// Reject inputs too short to be a document.
pub fn check_input_length(text: &str, minimum: usize) -> Result<(), ParseError> {
    let length = text.trim().chars().count();
    if length < minimum {
        warn!("Rejecting input of {} characters (minimum {})", length, minimum);
        return Err(ParseError::ShortInput { length, minimum });
    }
    Ok(())
}

/// Fail when any hard-required field is empty.
pub fn validate(record: &ParsedRecord) -> Result<(), ParseError> {
    let missing = record.missing_required_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        warn!("{} record is missing required fields: {:?}", record.kind(), missing);
        Err(ParseError::MissingRequiredFields(missing))
    }
}

/// Parse without any network access: input guard, heuristic path, validation.
pub fn parse_offline(
    parser: &HeuristicParser,
    kind: DocumentKind,
    text: &str,
) -> Result<Extraction<ParsedRecord>, ParseError> {
    check_input_length(text, parser.limits().min_input_length)?;

    info!("Using heuristic parser for {} document", kind);
    let record = parser.parse(kind, text);
    validate(&record)?;

    Ok(Extraction::fallback(record))
}
