//! Intake document parsing.
//!
//! The heuristic path (`HeuristicParser`) is pure and always available. With
//! the `remote` feature, `IntakeParser` puts a remote AI extractor in front of
//! it and falls back when the extractor cannot deliver.

pub mod confidence;
pub mod layout;
mod parser;
pub mod reply;
pub mod rules;
mod validation;

#[cfg(feature = "remote")]
mod orchestrator;
#[cfg(feature = "remote")]
pub mod remote;

pub use confidence::ConfidenceSignals;
pub use layout::{DocumentLayout, ExtractionMode, FieldKey, FieldSpec};
pub use parser::{normalize_learning_goals, HeuristicParser};
pub use validation::{check_input_length, parse_offline, validate, Extraction, FALLBACK_WARNING};

#[cfg(feature = "remote")]
pub use orchestrator::IntakeParser;
#[cfg(feature = "remote")]
pub use remote::{HttpExtractor, RemoteExtractor};
