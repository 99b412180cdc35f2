//! Duplicate submission suppression.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::intake::rules::normalize_lines;
use crate::models::config::DedupConfig;
use crate::models::record::DocumentKind;

/// Remembers recently submitted documents for a short window.
///
/// Owned by the caller (one per request batch or service instance), never a
/// process-wide global. Expired entries are purged on every check.
#[derive(Debug)]
pub struct SubmissionGuard {
    ttl: Duration,
    seen: Mutex<HashMap<String, Instant>>,
}

impl SubmissionGuard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &DedupConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs))
    }

    /// SHA-256 over the kind and the normalized document lines.
    ///
    /// Differences in blank lines and surrounding whitespace do not change
    /// the signature.
    pub fn signature(kind: DocumentKind, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_str().as_bytes());
        for line in normalize_lines(text) {
            hasher.update(b"\n");
            hasher.update(line.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Record a submission. Returns `false` if the same document was
    /// already submitted within the window.
    pub fn admit(&self, kind: DocumentKind, text: &str) -> bool {
        let signature = Self::signature(kind, text);
        let now = Instant::now();
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());

        seen.retain(|_, at| now.duration_since(*at) < self.ttl);

        if seen.contains_key(&signature) {
            debug!("Duplicate {} submission {}", kind, &signature[..12]);
            return false;
        }

        seen.insert(signature, now);
        true
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SubmissionGuard {
    fn default() -> Self {
        Self::from_config(&DedupConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "Naam: Tim\nSport X";

    #[test]
    fn test_duplicate_within_window() {
        let guard = SubmissionGuard::new(Duration::from_secs(60));
        assert!(guard.admit(DocumentKind::Indication, DOC));
        assert!(!guard.admit(DocumentKind::Indication, DOC));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_whitespace_does_not_change_signature() {
        assert_eq!(
            SubmissionGuard::signature(DocumentKind::Indication, DOC),
            SubmissionGuard::signature(DocumentKind::Indication, "\n  Naam: Tim  \n\n Sport X\n"),
        );
    }

    #[test]
    fn test_kind_is_part_of_signature() {
        let guard = SubmissionGuard::new(Duration::from_secs(60));
        assert!(guard.admit(DocumentKind::Indication, DOC));
        assert!(guard.admit(DocumentKind::Mutation, DOC));
    }

    #[test]
    fn test_expired_entries_are_purged() {
        let guard = SubmissionGuard::new(Duration::ZERO);
        assert!(guard.admit(DocumentKind::Indication, DOC));
        assert!(guard.admit(DocumentKind::Indication, DOC));
    }

    #[test]
    fn test_signature_is_hex_sha256() {
        let signature = SubmissionGuard::signature(DocumentKind::Mutation, DOC);
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
