//! Interpretation of remote extractor replies.
//!
//! Replies are untrusted: every value passes through the same date parser,
//! length caps and vocabulary filter as the heuristic path. Missing required
//! values are left empty so validation can reject them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::UpstreamError;
use crate::models::config::ExtractionConfig;
use crate::models::record::*;

use super::layout::parse_flag;
use super::parser::normalize_learning_goals;
use super::rules::{cap_chars, parse_date};

/// Confidence assumed when the reply does not state one.
pub const DEFAULT_AI_CONFIDENCE: f32 = 0.9;

const INDICATION_INSTRUCTION: &str = r#"You convert Dutch sport indication documents from a youth care facility into JSON.
Extract only what is written in the document. Use null for anything that is not present.
Dates must be written as YYYY-MM-DD. Numeric dates in the document are day first.
Activities may only be taken from: "Sport", "Muziek", "Creatief aanbod", "Dans", "Drama", "Koken".
An activity counts as selected when it is marked with an X or followed by names in parentheses.

Reply with a single JSON object and nothing else:
{
  "youthName": "string or null",
  "groupName": "string or null",
  "activities": ["Sport"],
  "responsiblePersons": ["name"],
  "advice": "string or null",
  "validFrom": "YYYY-MM-DD or null",
  "validUntil": "YYYY-MM-DD or null",
  "issuedBy": "string or null",
  "feedbackTo": "string or null",
  "canCombineWithGroup": true,
  "reasoning": "string or null",
  "guidanceTips": "string or null",
  "learningGoals": "string or null",
  "confidence": 0.0
}"#;

const MUTATION_INSTRUCTION: &str = r#"You convert Dutch sport mutation notices from a youth care facility into JSON.
Extract only what is written in the document. Use null for anything that is not present.
Dates must be written as YYYY-MM-DD. Numeric dates in the document are day first.
reasonType is one of "medical", "incident", "development", "other".

Reply with a single JSON object and nothing else:
{
  "youthName": "string or null",
  "groupName": "string or null",
  "reasonType": "medical",
  "reason": "string or null",
  "startDate": "YYYY-MM-DD or null",
  "endDate": "YYYY-MM-DD or null",
  "context": "string or null",
  "confidence": 0.0
}"#;

/// Fixed system instruction for a document kind.
pub fn instruction(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Indication => INDICATION_INSTRUCTION,
        DocumentKind::Mutation => MUTATION_INSTRUCTION,
    }
}

/// Wrap the document text for the user message.
pub fn build_prompt(text: &str) -> String {
    format!("<document>\n{}\n</document>", text.trim())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IndicationReply {
    youth_name: Option<String>,
    #[serde(alias = "leefgroep")]
    group_name: Option<String>,
    activities: Option<Vec<String>>,
    responsible_persons: Option<Vec<String>>,
    advice: Option<String>,
    valid_from: Option<String>,
    valid_until: Option<String>,
    issued_by: Option<String>,
    feedback_to: Option<String>,
    can_combine_with_group: Option<Value>,
    reasoning: Option<String>,
    guidance_tips: Option<String>,
    learning_goals: Option<String>,
    confidence: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MutationReply {
    youth_name: Option<String>,
    #[serde(alias = "leefgroep")]
    group_name: Option<String>,
    reason_type: Option<String>,
    reason: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    context: Option<String>,
    confidence: Option<f32>,
}

/// Take the JSON object out of a reply that may be wrapped in code fences.
fn json_body(reply: &str) -> Result<&str, UpstreamError> {
    let start = reply
        .find('{')
        .ok_or_else(|| UpstreamError::MalformedReply("no JSON object in reply".into()))?;
    let end = reply
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| UpstreamError::MalformedReply("unclosed JSON object".into()))?;
    Ok(&reply[start..=end])
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn text_or(value: Option<String>, default: &str) -> String {
    let value = text(value);
    if value.is_empty() { default.to_string() } else { value }
}

fn capped(value: Option<String>, max_chars: usize) -> String {
    cap_chars(&text(value), max_chars)
}

fn date(value: Option<String>) -> Option<NaiveDate> {
    value.as_deref().and_then(parse_date)
}

fn flag(value: Option<Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(b),
        Value::String(s) => parse_flag(&s),
        _ => None,
    }
}

fn confidence(value: Option<f32>) -> f32 {
    value
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_AI_CONFIDENCE)
        .clamp(0.0, 1.0)
}

/// Turn a remote reply into a record of the requested kind.
pub fn interpret_reply(
    kind: DocumentKind,
    reply: &str,
    limits: &ExtractionConfig,
) -> Result<ParsedRecord, UpstreamError> {
    let body = json_body(reply)?;
    let malformed = |e: serde_json::Error| UpstreamError::MalformedReply(e.to_string());

    let record = match kind {
        DocumentKind::Indication => {
            let raw: IndicationReply = serde_json::from_str(body).map_err(malformed)?;

            let activities: BTreeSet<Activity> = raw
                .activities
                .unwrap_or_default()
                .iter()
                .filter_map(|label| Activity::from_label(label))
                .collect();

            let mut responsible_persons: Vec<String> = Vec::new();
            for name in raw.responsible_persons.unwrap_or_default() {
                let name = name.trim().to_string();
                if !name.is_empty() && !responsible_persons.contains(&name) {
                    responsible_persons.push(name);
                }
            }

            ParsedIndication {
                youth_name: text(raw.youth_name),
                group_name: text(raw.group_name),
                activities,
                responsible_persons,
                advice: text_or(raw.advice, NO_VALUE),
                valid_from: date(raw.valid_from),
                valid_until: date(raw.valid_until),
                issued_by: text(raw.issued_by),
                feedback_to: text(raw.feedback_to),
                can_combine_with_group: flag(raw.can_combine_with_group),
                reasoning: capped(raw.reasoning, limits.reasoning_max_chars),
                guidance_tips: capped(raw.guidance_tips, limits.guidance_max_chars),
                learning_goals: normalize_learning_goals(&capped(
                    raw.learning_goals,
                    limits.learning_goals_max_chars,
                )),
                confidence: confidence(raw.confidence),
                warning: None,
            }
            .into()
        }
        DocumentKind::Mutation => {
            let raw: MutationReply = serde_json::from_str(body).map_err(malformed)?;

            let context = capped(raw.context, limits.context_max_chars);

            ParsedMutation {
                youth_name: text(raw.youth_name),
                group_name: text(raw.group_name),
                reason_type: raw
                    .reason_type
                    .as_deref()
                    .and_then(ReasonType::infer)
                    .unwrap_or_default(),
                reason: cap_chars(&text_or(raw.reason, NO_VALUE), limits.reason_max_chars),
                start_date: date(raw.start_date),
                end_date: date(raw.end_date),
                context: (!context.is_empty()).then_some(context),
                confidence: confidence(raw.confidence),
                warning: None,
            }
            .into()
        }
    };

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn limits() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn test_indication_reply() {
        let reply = r#"```json
        {
          "youthName": " Tim de Vries ",
          "leefgroep": "Nes",
          "activities": ["sport", "Creatief  aanbod", "Voetbal"],
          "responsiblePersons": ["Orlando", "Tim", "Orlando"],
          "advice": null,
          "validFrom": "2025-11-14",
          "validUntil": "16-12-2025",
          "canCombineWithGroup": "nee",
          "learningGoals": "nvt",
          "confidence": 1.7
        }
        ```"#;

        let ParsedRecord::Indication(r) = interpret_reply(DocumentKind::Indication, reply, &limits()).unwrap() else {
            panic!("expected indication");
        };

        assert_eq!(r.youth_name, "Tim de Vries");
        assert_eq!(r.group_name, "Nes");
        assert_eq!(
            r.activities.into_iter().collect::<Vec<_>>(),
            vec![Activity::Sport, Activity::CreatiefAanbod]
        );
        assert_eq!(r.responsible_persons, vec!["Orlando", "Tim"]);
        assert_eq!(r.advice, "-");
        assert_eq!(r.valid_from, NaiveDate::from_ymd_opt(2025, 11, 14));
        assert_eq!(r.valid_until, NaiveDate::from_ymd_opt(2025, 12, 16));
        assert_eq!(r.can_combine_with_group, Some(false));
        assert_eq!(r.learning_goals, "N.v.t.");
        assert_eq!(r.confidence, 1.0);
    }

    #[test]
    fn test_mutation_reply() {
        let reply = r#"{"youthName":"Sara","reasonType":"incident","startDate":"01-12-2025","context":"  "}"#;
        let ParsedRecord::Mutation(m) = interpret_reply(DocumentKind::Mutation, reply, &limits()).unwrap() else {
            panic!("expected mutation");
        };

        assert_eq!(m.reason_type, ReasonType::Incident);
        assert_eq!(m.reason, "-");
        assert_eq!(m.start_date, NaiveDate::from_ymd_opt(2025, 12, 1));
        assert_eq!(m.context, None);
        assert_eq!(m.confidence, DEFAULT_AI_CONFIDENCE);
    }

    #[test]
    fn test_missing_values_stay_empty() {
        let record = interpret_reply(DocumentKind::Indication, "{}", &limits()).unwrap();
        assert_eq!(
            record.missing_required_fields(),
            vec!["youthName", "activities", "validFrom"]
        );
    }

    #[test]
    fn test_reply_fields_are_capped() {
        let reply = format!(r#"{{"youthName":"Sara","reason":"{}"}}"#, "x".repeat(900));
        let ParsedRecord::Mutation(m) = interpret_reply(DocumentKind::Mutation, &reply, &limits()).unwrap() else {
            panic!("expected mutation");
        };
        assert_eq!(m.reason.chars().count(), 500);
    }

    #[test]
    fn test_malformed_replies() {
        for reply in ["Sorry, I cannot help with that.", "{ not json }", "}{"] {
            let err = interpret_reply(DocumentKind::Indication, reply, &limits()).unwrap_err();
            assert!(matches!(err, UpstreamError::MalformedReply(_)), "failed for {:?}", reply);
        }
    }

    #[test]
    fn test_prompt_wraps_document() {
        assert_eq!(build_prompt("  Naam: Tim \n"), "<document>\nNaam: Tim\n</document>");
        assert!(instruction(DocumentKind::Mutation).contains("reasonType"));
    }
}
