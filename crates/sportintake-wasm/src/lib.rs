//! WASM bindings for the Dutch sport intake parser.
//!
//! Only the heuristic path is available here; remote extraction needs the
//! native `remote` feature of the core crate.

use chrono::NaiveDate;
use js_sys::Array;
use wasm_bindgen::prelude::*;

use sportintake_core::intake::rules::{parse_date_range, DateExtractor, FieldExtractor};
use sportintake_core::{
    parse_offline, Activity, DocumentKind, ExtractionConfig, HeuristicParser, ReasonType,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn kind_from_str(kind: Option<String>, text: &str) -> Result<DocumentKind, JsValue> {
    match kind.as_deref().map(str::to_lowercase).as_deref() {
        None | Some("") | Some("auto") => Ok(DocumentKind::detect(text)),
        Some("indication") => Ok(DocumentKind::Indication),
        Some("mutation") => Ok(DocumentKind::Mutation),
        Some(other) => Err(JsValue::from_str(&format!("Unknown document kind: {}", other))),
    }
}

/// Parse a pasted document into a record object.
///
/// `kind` is `"indication"`, `"mutation"` or omitted to detect it from the
/// heading. Throws on short input or missing required fields.
#[wasm_bindgen]
pub fn parse_document(text: &str, kind: Option<String>) -> Result<JsValue, JsValue> {
    SportIntake::new().parse(text, kind)
}

/// Parse a sport indication.
#[wasm_bindgen]
pub fn parse_indication(text: &str) -> Result<JsValue, JsValue> {
    parse_document(text, Some("indication".to_string()))
}

/// Parse a sport mutation notice.
#[wasm_bindgen]
pub fn parse_mutation(text: &str) -> Result<JsValue, JsValue> {
    parse_document(text, Some("mutation".to_string()))
}

/// Parse the first date in a string and return it as `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn parse_date(date_str: &str) -> Option<String> {
    DateExtractor::new()
        .extract(date_str)
        .map(|m| m.value.to_string())
}

/// Parse a "from - until" expression into a two-element array of ISO dates
/// (either may be `undefined`).
#[wasm_bindgen]
pub fn parse_period(period: &str) -> Array {
    let range = parse_date_range(period);
    let to_js = |d: Option<NaiveDate>| match d {
        Some(d) => JsValue::from_str(&d.to_string()),
        None => JsValue::UNDEFINED,
    };
    Array::of2(&to_js(range.from), &to_js(range.until))
}

/// Activity labels in vocabulary order.
#[wasm_bindgen]
pub fn activity_labels() -> Array {
    Activity::ALL
        .iter()
        .map(|a| JsValue::from_str(a.label()))
        .collect()
}

/// Infer the mutation reason type from free text.
#[wasm_bindgen]
pub fn infer_reason_type(text: &str) -> String {
    let reason = ReasonType::infer(text).unwrap_or_default();
    serde_json::to_value(reason)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Intake parser class for browser use.
#[wasm_bindgen]
pub struct SportIntake {
    parser: HeuristicParser,
}

#[wasm_bindgen]
impl SportIntake {
    /// Create a parser with the default extraction limits.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: HeuristicParser::default(),
        }
    }

    /// Create a parser from a JSON extraction config.
    #[wasm_bindgen]
    pub fn with_config(config_json: &str) -> Result<SportIntake, JsValue> {
        let limits: ExtractionConfig = serde_json::from_str(config_json).map_err(to_js_error)?;
        Ok(Self {
            parser: HeuristicParser::new(limits),
        })
    }

    /// Pin "today" (ISO date) for documents without any date.
    #[wasm_bindgen]
    pub fn set_reference_date(&mut self, date: &str) -> Result<(), JsValue> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(to_js_error)?;
        self.parser = self.parser.clone().with_reference_date(date);
        Ok(())
    }

    /// Parse a document; see [`parse_document`].
    #[wasm_bindgen]
    pub fn parse(&self, text: &str, kind: Option<String>) -> Result<JsValue, JsValue> {
        let kind = kind_from_str(kind, text)?;
        let extraction = parse_offline(&self.parser, kind, text).map_err(to_js_error)?;

        serde_wasm_bindgen::to_value(extraction.record()).map_err(to_js_error)
    }

    /// Parse a document and return the record as a JSON string.
    #[wasm_bindgen]
    pub fn parse_json(&self, text: &str, kind: Option<String>) -> Result<String, JsValue> {
        let kind = kind_from_str(kind, text)?;
        let extraction = parse_offline(&self.parser, kind, text).map_err(to_js_error)?;

        serde_json::to_string(extraction.record()).map_err(to_js_error)
    }
}

impl Default for SportIntake {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const MUTATION: &str = "Sportmutatie\nNaam: Sara Jansen\nMedisch X\nVanaf: 1 december 2025";

    #[wasm_bindgen_test]
    fn test_parse_date() {
        assert_eq!(parse_date("Geldig vanaf 14-11-2025"), Some("2025-11-14".to_string()));
        assert_eq!(parse_date("geen datum"), None);
    }

    #[wasm_bindgen_test]
    fn test_parse_period() {
        let period = parse_period("14-11-2025 - 16-12-2025");
        assert_eq!(period.get(0).as_string(), Some("2025-11-14".to_string()));
        assert_eq!(period.get(1).as_string(), Some("2025-12-16".to_string()));
    }

    #[wasm_bindgen_test]
    fn test_activity_labels() {
        assert_eq!(activity_labels().length(), 6);
    }

    #[wasm_bindgen_test]
    fn test_infer_reason_type() {
        assert_eq!(infer_reason_type("knieblessure"), "medical");
        assert_eq!(infer_reason_type("onbekend"), "other");
    }

    #[wasm_bindgen_test]
    fn test_parse_json_detects_mutation() {
        let json = SportIntake::new().parse_json(MUTATION, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "mutation");
        assert_eq!(value["youthName"], "Sara Jansen");
        assert_eq!(value["reasonType"], "medical");
        assert_eq!(value["startDate"], "2025-12-01");
    }

    #[wasm_bindgen_test]
    fn test_short_input_throws() {
        assert!(SportIntake::new().parse_json("kort", None).is_err());
        assert!(SportIntake::new().parse_json(MUTATION, Some("memo".into())).is_err());
    }
}
