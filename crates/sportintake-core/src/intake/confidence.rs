//! Evidence-based confidence score for heuristic extraction.
//!
//! The score tells a reviewer how much of the document was recognized. It is
//! a fixed-increment heuristic, not a statistical estimate.

pub const BASELINE: f32 = 0.5;
pub const DATE_FOUND: f32 = 0.2;
pub const LONG_INPUT: f32 = 0.1;
pub const NAME_RECOVERED: f32 = 0.1;
pub const STATUS_RECOVERED: f32 = 0.1;

/// Inputs shorter than this earn no length bonus.
pub const LONG_INPUT_CHARS: usize = 200;

/// Evidence collected while assembling a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfidenceSignals {
    /// A plausible date appears anywhere in the document.
    pub date_found: bool,
    /// Length of the trimmed input in characters.
    pub input_chars: usize,
    /// The youth name came from the document, not the default.
    pub name_recovered: bool,
    /// Activities or the mutation reason type were detected.
    pub status_recovered: bool,
}

impl ConfidenceSignals {
    pub fn estimate(&self) -> f32 {
        let mut confidence = BASELINE;
        if self.date_found {
            confidence += DATE_FOUND;
        }
        if self.input_chars >= LONG_INPUT_CHARS {
            confidence += LONG_INPUT;
        }
        if self.name_recovered {
            confidence += NAME_RECOVERED;
        }
        if self.status_recovered {
            confidence += STATUS_RECOVERED;
        }
        confidence.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_baseline_without_evidence() {
        assert!(close(ConfidenceSignals::default().estimate(), 0.5));
    }

    #[test]
    fn test_increments_add_up() {
        let signals = ConfidenceSignals {
            date_found: true,
            input_chars: 20,
            ..Default::default()
        };
        assert!(close(signals.estimate(), 0.7));

        let all = ConfidenceSignals {
            date_found: true,
            input_chars: 250,
            name_recovered: true,
            status_recovered: true,
        };
        assert!(close(all.estimate(), 1.0));
        assert!(all.estimate() <= 1.0);
    }

    #[test]
    fn test_more_evidence_never_lowers_score() {
        let mut signals = ConfidenceSignals::default();
        let mut last = signals.estimate();

        signals.name_recovered = true;
        assert!(signals.estimate() >= last);
        last = signals.estimate();

        signals.input_chars = LONG_INPUT_CHARS;
        assert!(signals.estimate() >= last);
        last = signals.estimate();

        signals.status_recovered = true;
        assert!(signals.estimate() >= last);
    }
}
