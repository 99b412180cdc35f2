//! Declarative field tables for the supported document families.
//!
//! Each document kind is described by a list of `FieldSpec` rows: which
//! labels introduce the field, how its value is taken from the text, and what
//! it defaults to. `DocumentLayout::extract` is the single function that
//! consumes a table, so supporting a new form field means adding a row.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::record::{DocumentKind, NO_VALUE, UNKNOWN_YOUTH};

use super::rules::fields::{extract_value, LabelPattern};
use super::rules::markers::{detect_flag_choice, is_activity_line, is_reason_line};
use super::rules::patterns::{NO, NOT_APPLICABLE, YES};
use super::rules::{extract_section, parse_date_range, parse_date_value, DateRange};

/// Logical fields across both document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    YouthName,
    GroupName,
    Advice,
    Period,
    ValidFrom,
    ValidUntil,
    IssuedBy,
    FeedbackTo,
    CombineWithGroup,
    Reasoning,
    GuidanceTips,
    LearningGoals,
    MutationType,
    Reason,
    StartDate,
    EndDate,
    Context,
}

impl FieldKey {
    /// Output field name, as used in records and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKey::YouthName => "youthName",
            FieldKey::GroupName => "groupName",
            FieldKey::Advice => "advice",
            FieldKey::Period => "period",
            FieldKey::ValidFrom => "validFrom",
            FieldKey::ValidUntil => "validUntil",
            FieldKey::IssuedBy => "issuedBy",
            FieldKey::FeedbackTo => "feedbackTo",
            FieldKey::CombineWithGroup => "canCombineWithGroup",
            FieldKey::Reasoning => "reasoning",
            FieldKey::GuidanceTips => "guidanceTips",
            FieldKey::LearningGoals => "learningGoals",
            FieldKey::MutationType => "reasonType",
            FieldKey::Reason => "reason",
            FieldKey::StartDate => "startDate",
            FieldKey::EndDate => "endDate",
            FieldKey::Context => "context",
        }
    }

    fn section_cap(&self, limits: &ExtractionConfig) -> usize {
        match self {
            FieldKey::Reasoning => limits.reasoning_max_chars,
            FieldKey::GuidanceTips => limits.guidance_max_chars,
            FieldKey::LearningGoals => limits.learning_goals_max_chars,
            FieldKey::Reason => limits.reason_max_chars,
            FieldKey::Context => limits.context_max_chars,
            _ => usize::MAX,
        }
    }
}

/// How a field's value is taken from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Same-line value, else next line.
    Line,
    /// Line value parsed as a single date; a full period on the line keeps
    /// its end date too.
    Date,
    /// Line value parsed as a from/to date pair.
    Range,
    /// Line value parsed as yes/no.
    Flag,
    /// Multi-line block up to the next heading, capped.
    Section,
}

/// One row of a layout table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: FieldKey,
    /// Regex fragments, one per accepted label spelling.
    pub labels: &'static [&'static str],
    pub mode: ExtractionMode,
    pub default: Option<&'static str>,
}

const fn field(
    key: FieldKey,
    labels: &'static [&'static str],
    mode: ExtractionMode,
    default: Option<&'static str>,
) -> FieldSpec {
    FieldSpec { key, labels, mode, default }
}

use ExtractionMode::*;

const YOUTH_LABELS: &[&str] = &[
    r"naam(?:\s+(?:jongere|jeugdige|cli[eë]nt|deelnemer))?",
    r"jongere",
    r"jeugdige",
    r"cli[eë]nt",
];

const GROUP_LABELS: &[&str] = &[r"leefgroep", r"groep", r"afdeling"];

pub const INDICATION_FIELDS: &[FieldSpec] = &[
    field(FieldKey::YouthName, YOUTH_LABELS, Line, Some(UNKNOWN_YOUTH)),
    field(FieldKey::GroupName, GROUP_LABELS, Line, Some("")),
    field(FieldKey::Advice, &[r"(?:sport)?advies"], Line, Some(NO_VALUE)),
    field(
        FieldKey::Period,
        &[
            r"geldig(?:heid)?",
            r"periode",
            r"looptijd",
            r"indicatie\s+geldig",
            r"geldig\s+van\s*(?:-|/|t/m|tot)\s*tot",
        ],
        Range,
        None,
    ),
    field(
        FieldKey::ValidFrom,
        &[r"geldig\s+(?:van|vanaf)", r"ingangsdatum", r"startdatum", r"start\s+indicatie"],
        Date,
        None,
    ),
    field(
        FieldKey::ValidUntil,
        &[r"geldig\s+(?:tot|t/m)(?:\s+en\s+met)?", r"einddatum", r"eind\s+indicatie"],
        Date,
        None,
    ),
    field(
        FieldKey::IssuedBy,
        &[r"(?:indicatie\s+)?afgegeven\s+door", r"indicatiesteller", r"opgesteld\s+door"],
        Line,
        Some(""),
    ),
    field(
        FieldKey::FeedbackTo,
        &[r"terugkoppeling(?:\s+(?:naar|aan))?", r"feedback(?:\s+(?:naar|aan))?"],
        Line,
        Some(""),
    ),
    field(
        FieldKey::CombineWithGroup,
        &[
            r"(?:kan\s+)?(?:gecombineerd\s+worden|combineren)\s+met\s+(?:de\s+)?(?:leef)?groep",
            r"combineerbaar\s+met\s+(?:de\s+)?(?:leef)?groep",
            r"samen\s+met\s+(?:de\s+)?(?:leef)?groep",
        ],
        Flag,
        None,
    ),
    field(
        FieldKey::Reasoning,
        &[
            r"onderbouwing(?:\s+indicatie)?",
            r"reden(?:en)?\s+(?:van\s+)?indicatie",
            r"motivatie",
            r"toelichting",
        ],
        Section,
        Some(""),
    ),
    field(
        FieldKey::GuidanceTips,
        &[
            r"begeleidingstips",
            r"tips(?:\s+voor\s+(?:de\s+)?begeleiding)?",
            r"aandachtspunten(?:\s+(?:voor\s+)?begeleiding)?",
        ],
        Section,
        Some(""),
    ),
    field(FieldKey::LearningGoals, &[r"leerdoel(?:en)?"], Section, Some("")),
];

/// Headings that end a section without being fields themselves.
pub const INDICATION_HEADINGS: &[&str] = &[
    r"activiteit(?:en)?",
    r"(?:keuze\s+)?aanbod",
    r"indicatie\s+voor",
    r"datum",
    r"handtekening",
    r"ondertekening",
];

pub const MUTATION_FIELDS: &[FieldSpec] = &[
    field(FieldKey::YouthName, YOUTH_LABELS, Line, Some(UNKNOWN_YOUTH)),
    field(FieldKey::GroupName, GROUP_LABELS, Line, Some("")),
    field(
        FieldKey::MutationType,
        &[r"soort(?:\s+mutatie)?", r"type(?:\s+mutatie)?", r"reden\s+type", r"categorie"],
        Line,
        None,
    ),
    field(
        FieldKey::Reason,
        &[r"reden(?:\s+(?:van\s+(?:de\s+)?)?mutatie)?", r"omschrijving", r"aanleiding"],
        Section,
        Some(NO_VALUE),
    ),
    field(FieldKey::Period, &[r"periode", r"geldig(?:heid)?", r"duur"], Range, None),
    field(
        FieldKey::StartDate,
        &[r"ingangsdatum", r"startdatum", r"(?:geldig\s+)?vanaf", r"datum\s+(?:ingang|start)"],
        Date,
        None,
    ),
    field(
        FieldKey::EndDate,
        &[r"einddatum", r"(?:geldig\s+)?(?:tot|t/m)(?:\s+en\s+met)?", r"datum\s+einde?"],
        Date,
        None,
    ),
    field(
        FieldKey::Context,
        &[r"toelichting", r"context", r"aanvullende\s+informatie", r"opmerking(?:en)?"],
        Section,
        None,
    ),
];

pub const MUTATION_HEADINGS: &[&str] = &[r"datum", r"handtekening", r"ondertekening", r"gemeld\s+door"];

lazy_static! {
    static ref INDICATION_LAYOUT: DocumentLayout = DocumentLayout::compile(
        DocumentKind::Indication,
        INDICATION_FIELDS,
        INDICATION_HEADINGS,
        is_activity_line,
    );

    static ref MUTATION_LAYOUT: DocumentLayout = DocumentLayout::compile(
        DocumentKind::Mutation,
        MUTATION_FIELDS,
        MUTATION_HEADINGS,
        is_reason_line,
    );
}

/// A compiled field table for one document kind.
pub struct DocumentLayout {
    kind: DocumentKind,
    fields: Vec<(FieldSpec, LabelPattern)>,
    headings: LabelPattern,
    is_option_line: fn(&str) -> bool,
}

impl DocumentLayout {
    fn compile(
        kind: DocumentKind,
        specs: &[FieldSpec],
        headings: &[&str],
        is_option_line: fn(&str) -> bool,
    ) -> Self {
        let fields = specs
            .iter()
            .map(|spec| (*spec, LabelPattern::new(spec.labels).unwrap()))
            .collect();

        Self {
            kind,
            fields,
            headings: LabelPattern::new(headings).unwrap(),
            is_option_line,
        }
    }

    /// The built-in layout for a document kind.
    pub fn for_kind(kind: DocumentKind) -> &'static DocumentLayout {
        match kind {
            DocumentKind::Indication => &INDICATION_LAYOUT,
            DocumentKind::Mutation => &MUTATION_LAYOUT,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn specs(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(|(spec, _)| spec)
    }

    /// True if `line` starts another field, a heading, or a ticked option.
    fn is_boundary(&self, line: &str, except: FieldKey) -> bool {
        self.fields
            .iter()
            .any(|(spec, pattern)| spec.key != except && pattern.is_match(line))
            || self.headings.is_match(line)
            || (self.is_option_line)(line)
    }

    /// Run every row of the table over the document lines.
    pub fn extract(&self, lines: &[String], limits: &ExtractionConfig) -> FieldValues {
        let mut values = FieldValues::default();

        for (spec, pattern) in &self.fields {
            if let Some(default) = spec.default {
                values.defaults.insert(spec.key, default);
            }

            let is_boundary = |line: &str| self.is_boundary(line, spec.key);

            let value = match spec.mode {
                Section => extract_section(lines, pattern, is_boundary, spec.key.section_cap(limits))
                    .map(FieldValue::Text),
                Line => extract_value(pattern, lines, is_boundary).map(FieldValue::Text),
                Date => extract_value(pattern, lines, is_boundary)
                    .map(|v| parse_date_value(&v))
                    .filter(|r| r.from.is_some())
                    .map(FieldValue::Range),
                Range => extract_value(pattern, lines, is_boundary)
                    .map(|v| parse_date_range(&v))
                    .filter(|r| !r.is_empty())
                    .map(FieldValue::Range),
                Flag => extract_value(pattern, lines, is_boundary)
                    .and_then(|v| parse_flag(&v))
                    .map(FieldValue::Flag),
            };

            match value {
                Some(FieldValue::Text(ref t)) if t.is_empty() => {
                    debug!(field = spec.key.name(), "label present without value");
                }
                Some(value) => {
                    debug!(field = spec.key.name(), ?value, "field extracted");
                    values.found.insert(spec.key, value);
                }
                None => {
                    debug!(field = spec.key.name(), "field not found");
                }
            }
        }

        values
    }
}

/// Interpret a yes/no answer. Unclear answers yield `None`.
///
/// When both options are listed the `X` decides, not the first word.
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() || NOT_APPLICABLE.is_match(value) {
        return None;
    }
    if let Some(choice) = detect_flag_choice(value) {
        return choice;
    }
    if NO.is_match(value) {
        return Some(false);
    }
    if YES.is_match(value) {
        return Some(true);
    }
    None
}

/// A typed value recovered from the document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Dates from `Date` and `Range` rows.
    Range(DateRange),
    Flag(bool),
}

/// Output of `DocumentLayout::extract`.
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    found: BTreeMap<FieldKey, FieldValue>,
    defaults: BTreeMap<FieldKey, &'static str>,
}

impl FieldValues {
    pub fn is_found(&self, key: FieldKey) -> bool {
        self.found.contains_key(&key)
    }

    pub fn text(&self, key: FieldKey) -> Option<&str> {
        match self.found.get(&key) {
            Some(FieldValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Recovered text, or the table default (empty when none is declared).
    pub fn text_or_default(&self, key: FieldKey) -> String {
        self.text(key)
            .or_else(|| self.defaults.get(&key).copied())
            .unwrap_or_default()
            .to_string()
    }

    /// The date for a `Date` row, or the start of a `Range` row.
    pub fn date(&self, key: FieldKey) -> Option<NaiveDate> {
        self.range(key).from
    }

    pub fn range(&self, key: FieldKey) -> DateRange {
        match self.found.get(&key) {
            Some(FieldValue::Range(r)) => *r,
            _ => DateRange::default(),
        }
    }

    pub fn flag(&self, key: FieldKey) -> Option<bool> {
        match self.found.get(&key) {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::rules::normalize_lines;
    use pretty_assertions::assert_eq;

    fn extract(kind: DocumentKind, text: &str) -> FieldValues {
        DocumentLayout::for_kind(kind).extract(&normalize_lines(text), &ExtractionConfig::default())
    }

    #[test]
    fn test_all_tables_compile() {
        assert_eq!(DocumentLayout::for_kind(DocumentKind::Indication).specs().count(), INDICATION_FIELDS.len());
        assert_eq!(DocumentLayout::for_kind(DocumentKind::Mutation).specs().count(), MUTATION_FIELDS.len());
    }

    #[test]
    fn test_defaults_apply_when_missing() {
        let values = extract(DocumentKind::Indication, "Iets zonder labels");
        assert_eq!(values.text_or_default(FieldKey::YouthName), "Onbekend");
        assert_eq!(values.text_or_default(FieldKey::Advice), "-");
        assert_eq!(values.text_or_default(FieldKey::GroupName), "");
        assert!(!values.is_found(FieldKey::YouthName));
    }

    #[test]
    fn test_line_date_range_and_flag_modes() {
        let text = "Naam jongere: Tim de Vries\n\
                    Leefgroep: Nes\n\
                    Geldig: 14-11-2025 - 16-12-2025\n\
                    Kan gecombineerd worden met groep: Nee";
        let values = extract(DocumentKind::Indication, text);

        assert_eq!(values.text(FieldKey::YouthName), Some("Tim de Vries"));
        assert_eq!(values.text(FieldKey::GroupName), Some("Nes"));
        let range = values.range(FieldKey::Period);
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2025, 11, 14));
        assert_eq!(range.until, NaiveDate::from_ymd_opt(2025, 12, 16));
        assert_eq!(values.flag(FieldKey::CombineWithGroup), Some(false));
    }

    #[test]
    fn test_section_stops_at_checklist_and_next_field() {
        let text = "Onderbouwing:\nVeel energie\nSport (Tim) X\nAdvies: -";
        let values = extract(DocumentKind::Indication, text);
        assert_eq!(values.text(FieldKey::Reasoning), Some("Veel energie"));
    }

    #[test]
    fn test_next_line_label_is_not_taken_as_value() {
        let text = "Leefgroep:\nAdvies: dagelijks bewegen";
        let values = extract(DocumentKind::Indication, text);
        assert_eq!(values.text(FieldKey::GroupName), None);
        assert_eq!(values.text(FieldKey::Advice), Some("dagelijks bewegen"));
    }

    #[test]
    fn test_mutation_table() {
        let text = "Sportmutatie\nNaam: Tim\nReden type: medisch\nReden:\nEnkel verstuikt bij voetbal\nVanaf: 1-12-2025\nTot en met: 15-12-2025";
        let values = extract(DocumentKind::Mutation, text);

        assert_eq!(values.text(FieldKey::MutationType), Some("medisch"));
        assert_eq!(values.text(FieldKey::Reason), Some("Enkel verstuikt bij voetbal"));
        assert_eq!(values.date(FieldKey::StartDate), NaiveDate::from_ymd_opt(2025, 12, 1));
        assert_eq!(values.date(FieldKey::EndDate), NaiveDate::from_ymd_opt(2025, 12, 15));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("Ja"), Some(true));
        assert_eq!(parse_flag("ja, onder begeleiding"), Some(true));
        assert_eq!(parse_flag("Nee"), Some(false));
        assert_eq!(parse_flag("kan niet"), Some(false));
        assert_eq!(parse_flag("n.v.t."), None);
        assert_eq!(parse_flag("misschien"), None);
    }

    #[test]
    fn test_parse_flag_with_marker() {
        assert_eq!(parse_flag("Ja X Nee"), Some(true));
        assert_eq!(parse_flag("Ja  Nee X"), Some(false));
        assert_eq!(parse_flag("Ja / Nee   X"), Some(false));
        assert_eq!(parse_flag("Ja / Nee"), None);
        assert_eq!(parse_flag("X"), Some(true));
    }

    #[test]
    fn test_marked_flag_on_combine_label() {
        let values = extract(
            DocumentKind::Indication,
            "Naam: Tim\nKan gecombineerd worden met groep: Ja  Nee X",
        );
        assert_eq!(values.flag(FieldKey::CombineWithGroup), Some(false));
    }

    #[test]
    fn test_period_on_date_row() {
        let values = extract(DocumentKind::Indication, "Geldig vanaf: 14-11-2025 - 16-12-2025");
        assert_eq!(values.date(FieldKey::ValidFrom), NaiveDate::from_ymd_opt(2025, 11, 14));
        assert_eq!(values.range(FieldKey::ValidFrom).until, NaiveDate::from_ymd_opt(2025, 12, 16));
        assert_eq!(values.date(FieldKey::ValidUntil), None);

        let values = extract(DocumentKind::Mutation, "Startdatum: 1-12-2025 t/m 15-12-2025");
        assert_eq!(values.date(FieldKey::StartDate), NaiveDate::from_ymd_opt(2025, 12, 1));
        assert_eq!(values.range(FieldKey::StartDate).until, NaiveDate::from_ymd_opt(2025, 12, 15));
    }
}
