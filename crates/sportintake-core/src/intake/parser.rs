//! Deterministic heuristic parser.
//!
//! Runs the layout table, the marker detectors and the date parser over a
//! document and assembles a complete record. Every required field is filled,
//! either from the document or with its sentinel default.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::record::*;

use super::confidence::ConfidenceSignals;
use super::layout::{DocumentLayout, FieldKey, FieldValues};
use super::rules::patterns::NOT_APPLICABLE as NOT_APPLICABLE_ANSWER;
use super::rules::{detect_activities, detect_reason_type, normalize_lines, DateExtractor, FieldExtractor};

/// Rule-based parser for indication and mutation documents.
#[derive(Debug, Clone, Default)]
pub struct HeuristicParser {
    limits: ExtractionConfig,
    /// Fixed "today"; the local date is used when unset.
    reference_date: Option<NaiveDate>,
}

/// Lines and table values shared by both record kinds.
struct Scan {
    text: String,
    values: FieldValues,
    first_date: Option<NaiveDate>,
    input_chars: usize,
}

impl HeuristicParser {
    pub fn new(limits: ExtractionConfig) -> Self {
        Self {
            limits,
            reference_date: None,
        }
    }

    /// Pin the date used for missing start dates.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn limits(&self) -> &ExtractionConfig {
        &self.limits
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Parse a document of the given kind.
    pub fn parse(&self, kind: DocumentKind, text: &str) -> ParsedRecord {
        match kind {
            DocumentKind::Indication => self.parse_indication(text).into(),
            DocumentKind::Mutation => self.parse_mutation(text).into(),
        }
    }

    fn scan(&self, kind: DocumentKind, text: &str) -> Scan {
        let lines = normalize_lines(text);
        let values = DocumentLayout::for_kind(kind).extract(&lines, &self.limits);
        let text = lines.join("\n");
        let first_date = DateExtractor::new().extract(&text).map(|m| m.value);

        Scan {
            input_chars: text.chars().count(),
            text,
            values,
            first_date,
        }
    }

    pub fn parse_indication(&self, text: &str) -> ParsedIndication {
        info!("Parsing indication from {} characters of text", text.len());

        let scan = self.scan(DocumentKind::Indication, text);
        let values = &scan.values;

        let marks = detect_activities(&scan.text);
        let status_recovered = !marks.activities.is_empty();
        let activities = if status_recovered {
            marks.activities
        } else {
            debug!("no activity selected, defaulting to {}", Activity::Sport);
            BTreeSet::from([Activity::Sport])
        };

        let period = values.range(FieldKey::Period);
        let valid_from = values
            .date(FieldKey::ValidFrom)
            .or(period.from)
            .or(scan.first_date)
            .unwrap_or_else(|| self.reference_date());
        let valid_until = values
            .date(FieldKey::ValidUntil)
            .or(values.range(FieldKey::ValidFrom).until)
            .or(period.until);

        let signals = ConfidenceSignals {
            date_found: scan.first_date.is_some(),
            input_chars: scan.input_chars,
            name_recovered: values.is_found(FieldKey::YouthName),
            status_recovered,
        };
        let confidence = signals.estimate();

        let record = ParsedIndication {
            youth_name: values.text_or_default(FieldKey::YouthName),
            group_name: values.text_or_default(FieldKey::GroupName),
            activities,
            responsible_persons: marks.responsible_persons,
            advice: values.text_or_default(FieldKey::Advice),
            valid_from: Some(valid_from),
            valid_until,
            issued_by: values.text_or_default(FieldKey::IssuedBy),
            feedback_to: values.text_or_default(FieldKey::FeedbackTo),
            can_combine_with_group: values.flag(FieldKey::CombineWithGroup),
            reasoning: values.text_or_default(FieldKey::Reasoning),
            guidance_tips: values.text_or_default(FieldKey::GuidanceTips),
            learning_goals: normalize_learning_goals(&values.text_or_default(FieldKey::LearningGoals)),
            confidence,
            warning: None,
        };

        debug!(
            "Extracted indication for {} with confidence {:.2}",
            record.youth_name, record.confidence
        );

        record
    }

    pub fn parse_mutation(&self, text: &str) -> ParsedMutation {
        info!("Parsing mutation from {} characters of text", text.len());

        let scan = self.scan(DocumentKind::Mutation, text);
        let values = &scan.values;

        let reason = values.text_or_default(FieldKey::Reason);
        let reason_type = detect_reason_type(&scan.text)
            .or_else(|| values.text(FieldKey::MutationType).and_then(ReasonType::infer))
            .or_else(|| values.text(FieldKey::Reason).and_then(ReasonType::infer));
        let status_recovered = reason_type.is_some();

        let period = values.range(FieldKey::Period);
        let start_date = values
            .date(FieldKey::StartDate)
            .or(period.from)
            .or(scan.first_date)
            .unwrap_or_else(|| self.reference_date());
        let end_date = values
            .date(FieldKey::EndDate)
            .or(values.range(FieldKey::StartDate).until)
            .or(period.until);

        let signals = ConfidenceSignals {
            date_found: scan.first_date.is_some(),
            input_chars: scan.input_chars,
            name_recovered: values.is_found(FieldKey::YouthName),
            status_recovered,
        };

        let record = ParsedMutation {
            youth_name: values.text_or_default(FieldKey::YouthName),
            group_name: values.text_or_default(FieldKey::GroupName),
            reason_type: reason_type.unwrap_or_default(),
            reason,
            start_date: Some(start_date),
            end_date,
            context: values.text(FieldKey::Context).map(str::to_string),
            confidence: signals.estimate(),
            warning: None,
        };

        debug!(
            "Extracted {:?} mutation for {} with confidence {:.2}",
            record.reason_type, record.youth_name, record.confidence
        );

        record
    }
}

/// Collapse explicit "not applicable" answers to `N.v.t.`.
pub fn normalize_learning_goals(value: &str) -> String {
    if NOT_APPLICABLE_ANSWER.is_match(value) {
        NOT_APPLICABLE.to_string()
    } else {
        value.trim().to_string()
    }
}
