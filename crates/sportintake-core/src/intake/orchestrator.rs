//! AI-first parsing with a deterministic fallback.

use std::time::Duration;

use tracing::{info, warn};

use crate::error::{ParseError, UpstreamError};
use crate::models::config::IntakeConfig;
use crate::models::record::{DocumentKind, ParsedRecord};

use super::parser::HeuristicParser;
use super::remote::{HttpExtractor, RemoteExtractor};
use super::reply::interpret_reply;
use super::validation::{check_input_length, validate, Extraction};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Parser that tries a remote extractor first and falls back to heuristics.
///
/// Remote failures of any kind (missing credential, transport, timeout,
/// unusable reply) are logged and never returned to the caller; they only
/// select the fallback path.
pub struct IntakeParser<R> {
    remote: Option<R>,
    heuristic: HeuristicParser,
    timeout: Duration,
}

impl IntakeParser<HttpExtractor> {
    /// Build from configuration. Without a usable remote configuration
    /// every document goes through the heuristic path.
    pub fn from_config(config: &IntakeConfig) -> Self {
        let remote = match HttpExtractor::from_config(&config.remote) {
            Ok(extractor) => {
                info!("Remote extractor enabled (model {})", extractor.model());
                Some(extractor)
            }
            Err(UpstreamError::Disabled) => None,
            Err(e) => {
                warn!("Remote extractor unavailable: {}", e);
                None
            }
        };

        Self::new(remote, HeuristicParser::new(config.extraction.clone()))
            .with_timeout(Duration::from_secs(config.remote.timeout_secs))
    }
}

impl<R: RemoteExtractor> IntakeParser<R> {
    pub fn new(remote: Option<R>, heuristic: HeuristicParser) -> Self {
        Self {
            remote,
            heuristic,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Upper bound for one remote extraction.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn heuristic(&self) -> &HeuristicParser {
        &self.heuristic
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Parse a document, detecting its kind from the heading.
    pub async fn parse_document(&self, text: &str) -> Result<Extraction<ParsedRecord>, ParseError> {
        self.parse(DocumentKind::detect(text), text).await
    }

    /// Parse a document of a known kind.
    pub async fn parse(
        &self,
        kind: DocumentKind,
        text: &str,
    ) -> Result<Extraction<ParsedRecord>, ParseError> {
        check_input_length(text, self.heuristic.limits().min_input_length)?;

        let extraction = match self.try_remote(kind, text).await {
            Ok(record) => {
                info!("Remote extractor produced {} record", kind);
                Extraction::Ai(record)
            }
            Err(UpstreamError::Disabled) => {
                info!("Using heuristic parser for {} document", kind);
                Extraction::fallback(self.heuristic.parse(kind, text))
            }
            Err(e) => {
                warn!("Remote extraction failed, falling back to heuristic parser: {}", e);
                Extraction::fallback(self.heuristic.parse(kind, text))
            }
        };

        validate(extraction.record())?;
        Ok(extraction)
    }

    async fn try_remote(&self, kind: DocumentKind, text: &str) -> Result<ParsedRecord, UpstreamError> {
        let remote = self.remote.as_ref().ok_or(UpstreamError::Disabled)?;

        let reply = tokio::time::timeout(self.timeout, remote.extract(kind, text))
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout.as_secs()))??;

        interpret_reply(kind, &reply, self.heuristic.limits())
    }
}
