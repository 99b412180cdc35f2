//! Structured intake records produced by the parsers.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder name used when a document does not identify the youth.
pub const UNKNOWN_YOUTH: &str = "Onbekend";

/// Placeholder advice / reason text.
pub const NO_VALUE: &str = "-";

/// Normalized "not applicable" marker for learning goals.
pub const NOT_APPLICABLE: &str = "N.v.t.";

/// Kind of intake document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Sport indication (which activities a youth is cleared for).
    Indication,
    /// Sport mutation notice (temporary restriction or addition).
    Mutation,
}

impl DocumentKind {
    /// Guess the document kind from its opening lines.
    ///
    /// Mutation notices announce themselves ("Mutatie", "Sportmutatie") in the
    /// heading; everything else is treated as an indication.
    pub fn detect(text: &str) -> Self {
        let head: String = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(5)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if head.contains("mutatie") {
            DocumentKind::Mutation
        } else {
            DocumentKind::Indication
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Indication => "indication",
            DocumentKind::Mutation => "mutation",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supervised activity categories, in vocabulary order.
///
/// The derived `Ord` follows declaration order, so a `BTreeSet<Activity>`
/// always iterates in vocabulary order regardless of document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Activity {
    Sport,
    Muziek,
    #[serde(rename = "Creatief aanbod")]
    CreatiefAanbod,
    Dans,
    Drama,
    Koken,
}

impl Activity {
    /// The full vocabulary in canonical order.
    pub const ALL: [Activity; 6] = [
        Activity::Sport,
        Activity::Muziek,
        Activity::CreatiefAanbod,
        Activity::Dans,
        Activity::Drama,
        Activity::Koken,
    ];

    /// Label as it appears on the intake forms.
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Sport => "Sport",
            Activity::Muziek => "Muziek",
            Activity::CreatiefAanbod => "Creatief aanbod",
            Activity::Dans => "Dans",
            Activity::Drama => "Drama",
            Activity::Koken => "Koken",
        }
    }

    /// Match a free-form label (case and whitespace insensitive).
    pub fn from_label(s: &str) -> Option<Self> {
        let wanted = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        Activity::ALL
            .into_iter()
            .find(|a| a.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a mutation notice was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonType {
    Medical,
    Incident,
    Development,
    #[default]
    Other,
}

impl ReasonType {
    /// Option order on the mutation form.
    pub const ALL: [ReasonType; 4] = [
        ReasonType::Medical,
        ReasonType::Incident,
        ReasonType::Development,
        ReasonType::Other,
    ];

    /// Form labels that select this reason type.
    pub fn form_labels(&self) -> &'static [&'static str] {
        match self {
            ReasonType::Medical => &["Medisch"],
            ReasonType::Incident => &["Incident"],
            ReasonType::Development => &["Ontwikkeling"],
            ReasonType::Other => &["Anders", "Overig"],
        }
    }

    /// Infer the reason type from a free-text value or keyword.
    pub fn infer(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return None;
        }

        const MEDICAL: &[&str] = &["medisch", "medical", "blessure", "ziek", "arts", "fysio", "letsel"];
        const INCIDENT: &[&str] = &["incident", "agressie", "vecht", "ruzie", "conflict", "wegloop"];
        const DEVELOPMENT: &[&str] = &["ontwikkel", "development", "groei", "vooruitgang"];
        const OTHER: &[&str] = &["anders", "overig", "other"];

        let has = |words: &[&str]| words.iter().any(|w| s.contains(w));

        if has(MEDICAL) {
            Some(ReasonType::Medical)
        } else if has(INCIDENT) {
            Some(ReasonType::Incident)
        } else if has(DEVELOPMENT) {
            Some(ReasonType::Development)
        } else if has(OTHER) {
            Some(ReasonType::Other)
        } else {
            None
        }
    }
}

/// Structured sport indication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIndication {
    pub youth_name: String,

    /// Living group (leefgroep).
    #[serde(default, alias = "leefgroep")]
    pub group_name: String,

    /// Selected activities, always in vocabulary order.
    pub activities: BTreeSet<Activity>,

    /// Staff named next to the selected activities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responsible_persons: Vec<String>,

    pub advice: String,

    pub valid_from: Option<NaiveDate>,

    pub valid_until: Option<NaiveDate>,

    #[serde(default)]
    pub issued_by: String,

    #[serde(default)]
    pub feedback_to: String,

    /// `None` when the document does not say.
    pub can_combine_with_group: Option<bool>,

    #[serde(default)]
    pub reasoning: String,

    #[serde(default)]
    pub guidance_tips: String,

    #[serde(default)]
    pub learning_goals: String,

    pub confidence: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Structured sport mutation notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMutation {
    pub youth_name: String,

    #[serde(default, alias = "leefgroep")]
    pub group_name: String,

    pub reason_type: ReasonType,

    pub reason: String,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    pub confidence: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Either kind of parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParsedRecord {
    Indication(ParsedIndication),
    Mutation(ParsedMutation),
}

impl ParsedIndication {
    /// Names of hard-required fields that are empty.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.youth_name.trim().is_empty() {
            missing.push("youthName");
        }
        if self.activities.is_empty() {
            missing.push("activities");
        }
        if self.valid_from.is_none() {
            missing.push("validFrom");
        }
        missing
    }
}

impl ParsedMutation {
    /// Names of hard-required fields that are empty.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.youth_name.trim().is_empty() {
            missing.push("youthName");
        }
        if self.start_date.is_none() {
            missing.push("startDate");
        }
        missing
    }
}

impl ParsedRecord {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ParsedRecord::Indication(_) => DocumentKind::Indication,
            ParsedRecord::Mutation(_) => DocumentKind::Mutation,
        }
    }

    pub fn youth_name(&self) -> &str {
        match self {
            ParsedRecord::Indication(r) => &r.youth_name,
            ParsedRecord::Mutation(r) => &r.youth_name,
        }
    }

    pub fn group_name(&self) -> &str {
        match self {
            ParsedRecord::Indication(r) => &r.group_name,
            ParsedRecord::Mutation(r) => &r.group_name,
        }
    }

    /// Start of validity (indication) or of the mutation.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            ParsedRecord::Indication(r) => r.valid_from,
            ParsedRecord::Mutation(r) => r.start_date,
        }
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            ParsedRecord::Indication(r) => r.valid_until,
            ParsedRecord::Mutation(r) => r.end_date,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            ParsedRecord::Indication(r) => r.confidence,
            ParsedRecord::Mutation(r) => r.confidence,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            ParsedRecord::Indication(r) => r.warning.as_deref(),
            ParsedRecord::Mutation(r) => r.warning.as_deref(),
        }
    }

    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        match self {
            ParsedRecord::Indication(r) => r.missing_required_fields(),
            ParsedRecord::Mutation(r) => r.missing_required_fields(),
        }
    }

    pub(crate) fn set_warning(&mut self, warning: impl Into<String>) {
        let warning = Some(warning.into());
        match self {
            ParsedRecord::Indication(r) => r.warning = warning,
            ParsedRecord::Mutation(r) => r.warning = warning,
        }
    }
}

impl From<ParsedIndication> for ParsedRecord {
    fn from(r: ParsedIndication) -> Self {
        ParsedRecord::Indication(r)
    }
}

impl From<ParsedMutation> for ParsedRecord {
    fn from(r: ParsedMutation) -> Self {
        ParsedRecord::Mutation(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_from_label() {
        assert_eq!(Activity::from_label("sport"), Some(Activity::Sport));
        assert_eq!(Activity::from_label("Creatief   Aanbod"), Some(Activity::CreatiefAanbod));
        assert_eq!(Activity::from_label("Schaken"), None);
    }

    #[test]
    fn test_activity_set_keeps_vocabulary_order() {
        let set: BTreeSet<Activity> = [Activity::Koken, Activity::Sport, Activity::Muziek]
            .into_iter()
            .collect();
        let labels: Vec<&str> = set.iter().map(|a| a.label()).collect();
        assert_eq!(labels, vec!["Sport", "Muziek", "Koken"]);
    }

    #[test]
    fn test_reason_type_inference() {
        assert_eq!(ReasonType::infer("Medisch"), Some(ReasonType::Medical));
        assert_eq!(ReasonType::infer("knieblessure opgelopen"), Some(ReasonType::Medical));
        assert_eq!(ReasonType::infer("Incident op de groep"), Some(ReasonType::Incident));
        assert_eq!(ReasonType::infer("development"), Some(ReasonType::Development));
        assert_eq!(ReasonType::infer("iets onduidelijks"), None);
    }

    #[test]
    fn test_document_kind_detection() {
        assert_eq!(
            DocumentKind::detect("Sportmutatie\nNaam: Tim"),
            DocumentKind::Mutation
        );
        assert_eq!(
            DocumentKind::detect("Sportindicatie\nNaam: Tim"),
            DocumentKind::Indication
        );
    }

    #[test]
    fn test_record_serializes_with_camel_case_and_kind_tag() {
        let record = ParsedRecord::Mutation(ParsedMutation {
            youth_name: "Tim".to_string(),
            group_name: "Nes".to_string(),
            reason_type: ReasonType::Medical,
            reason: "Enkel verstuikt".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 11, 14),
            end_date: None,
            context: None,
            confidence: 0.8,
            warning: None,
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "mutation");
        assert_eq!(json["youthName"], "Tim");
        assert_eq!(json["reasonType"], "medical");
        assert_eq!(json["startDate"], "2025-11-14");
        assert!(json.get("warning").is_none());
    }

    #[test]
    fn test_group_name_accepts_leefgroep_alias() {
        let json = r#"{
            "youthName": "Tim",
            "leefgroep": "Nes",
            "reasonType": "other",
            "reason": "-",
            "startDate": "2025-11-14",
            "endDate": null,
            "confidence": 0.5
        }"#;
        let parsed: ParsedMutation = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.group_name, "Nes");
    }

    #[test]
    fn test_missing_required_fields() {
        let mutation = ParsedMutation {
            youth_name: " ".to_string(),
            group_name: String::new(),
            reason_type: ReasonType::Other,
            reason: NO_VALUE.to_string(),
            start_date: None,
            end_date: None,
            context: None,
            confidence: 0.5,
            warning: None,
        };
        assert_eq!(mutation.missing_required_fields(), vec!["youthName", "startDate"]);
    }
}
