//! Record formatting for the parse and batch commands.

use sportintake_core::{ParsedIndication, ParsedMutation, ParsedRecord};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_record(record: &ParsedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn date(d: Option<chrono::NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_default()
}

fn join_activities(r: &ParsedIndication) -> String {
    r.activities
        .iter()
        .map(|a| a.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_csv(record: &ParsedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    match record {
        ParsedRecord::Indication(r) => {
            wtr.write_record([
                "youth_name",
                "group_name",
                "activities",
                "responsible_persons",
                "advice",
                "valid_from",
                "valid_until",
                "issued_by",
                "feedback_to",
                "can_combine_with_group",
                "confidence",
                "warning",
            ])?;
            wtr.write_record([
                r.youth_name.as_str(),
                &r.group_name,
                &join_activities(r),
                &r.responsible_persons.join(", "),
                &r.advice,
                &date(r.valid_from),
                &date(r.valid_until),
                &r.issued_by,
                &r.feedback_to,
                &r.can_combine_with_group.map(|b| b.to_string()).unwrap_or_default(),
                &format!("{:.2}", r.confidence),
                r.warning.as_deref().unwrap_or(""),
            ])?;
        }
        ParsedRecord::Mutation(r) => {
            wtr.write_record([
                "youth_name",
                "group_name",
                "reason_type",
                "reason",
                "start_date",
                "end_date",
                "context",
                "confidence",
                "warning",
            ])?;
            wtr.write_record([
                r.youth_name.as_str(),
                &r.group_name,
                &format!("{:?}", r.reason_type).to_lowercase(),
                &r.reason,
                &date(r.start_date),
                &date(r.end_date),
                r.context.as_deref().unwrap_or(""),
                &format!("{:.2}", r.confidence),
                r.warning.as_deref().unwrap_or(""),
            ])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn push_block(output: &mut String, title: &str, body: &str) {
    if body.is_empty() {
        return;
    }
    output.push_str(&format!("\n{}:\n", title));
    for line in body.lines() {
        output.push_str(&format!("  {}\n", line));
    }
}

fn format_indication(r: &ParsedIndication) -> String {
    let mut output = String::new();

    output.push_str(&format!("Indication: {}\n", r.youth_name));
    output.push_str(&format!("Group: {}\n", r.group_name));
    output.push_str(&format!("Activities: {}\n", join_activities(r)));
    if !r.responsible_persons.is_empty() {
        output.push_str(&format!("Responsible: {}\n", r.responsible_persons.join(", ")));
    }
    output.push_str(&format!("Valid: {} - {}\n", date(r.valid_from), date(r.valid_until)));
    output.push_str(&format!("Advice: {}\n", r.advice));
    if !r.issued_by.is_empty() {
        output.push_str(&format!("Issued by: {}\n", r.issued_by));
    }
    if !r.feedback_to.is_empty() {
        output.push_str(&format!("Feedback to: {}\n", r.feedback_to));
    }
    let combine = match r.can_combine_with_group {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    };
    output.push_str(&format!("Combine with group: {}\n", combine));

    push_block(&mut output, "Reasoning", &r.reasoning);
    push_block(&mut output, "Guidance tips", &r.guidance_tips);
    push_block(&mut output, "Learning goals", &r.learning_goals);

    output
}

fn format_mutation(r: &ParsedMutation) -> String {
    let mut output = String::new();

    output.push_str(&format!("Mutation: {}\n", r.youth_name));
    output.push_str(&format!("Group: {}\n", r.group_name));
    output.push_str(&format!("Reason type: {:?}\n", r.reason_type));
    output.push_str(&format!("Period: {} - {}\n", date(r.start_date), date(r.end_date)));

    push_block(&mut output, "Reason", &r.reason);
    if let Some(context) = &r.context {
        push_block(&mut output, "Context", context);
    }

    output
}

pub fn format_text(record: &ParsedRecord) -> String {
    let mut output = match record {
        ParsedRecord::Indication(r) => format_indication(r),
        ParsedRecord::Mutation(r) => format_mutation(r),
    };

    if let Some(warning) = record.warning() {
        output.push_str(&format!("\nWarning: {}\n", warning));
    }

    output
}
