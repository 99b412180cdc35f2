//! Core library for Dutch sport intake documents.
//!
//! This crate provides:
//! - Rule-based field, section, marker and date extraction
//! - A table-driven heuristic parser for sport indications and mutations
//! - An AI-first orchestrator with heuristic fallback (`remote` feature)
//! - Caller-owned duplicate submission suppression

pub mod dedup;
pub mod error;
pub mod intake;
pub mod models;

pub use dedup::SubmissionGuard;
pub use error::{IntakeError, ParseError, Result, UpstreamError};
pub use intake::{parse_offline, Extraction, HeuristicParser, FALLBACK_WARNING};
pub use models::config::{DedupConfig, ExtractionConfig, IntakeConfig, RemoteConfig};
pub use models::record::{
    Activity, DocumentKind, ParsedIndication, ParsedMutation, ParsedRecord, ReasonType,
};

#[cfg(feature = "remote")]
pub use intake::{HttpExtractor, IntakeParser, RemoteExtractor};
