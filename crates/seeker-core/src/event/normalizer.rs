//! Repair of malformed `data:` lines.
//!
//! The upstream stream does not always emit strict JSON: single-quoted
//! strings, bare keys and trailing commas all show up. Each repair below is a
//! pure text transform. They are applied cumulatively, cheapest first, and the
//! payload is re-parsed after every step so the least aggressive repair that
//! yields valid JSON wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// SSE field prefix carrying event payloads.
pub const DATA_PREFIX: &str = "data:";

static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").expect("bare key pattern is valid")
});

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A named text transform.
pub type Repair = fn(&str) -> String;

/// Ordered repair chain. Each step sees the output of the previous one.
pub const REPAIRS: &[(&str, Repair)] = &[
    ("single_quotes", swap_single_quotes),
    ("bare_keys", quote_bare_keys),
    ("trailing_commas", strip_trailing_commas),
    ("whitespace", collapse_whitespace),
];

/// `'` → `"`.
pub fn swap_single_quotes(input: &str) -> String {
    input.replace('\'', "\"")
}

/// `{key: 1}` → `{"key": 1}`.
pub fn quote_bare_keys(input: &str) -> String {
    BARE_KEY.replace_all(input, r#"${1}"${2}":"#).into_owned()
}

/// `[1, 2,]` → `[1, 2]`, `{"a": 1,}` → `{"a": 1}`.
pub fn strip_trailing_commas(input: &str) -> String {
    TRAILING_COMMA.replace_all(input, "${1}").into_owned()
}

/// Control whitespace becomes a space and runs of whitespace collapse to one.
pub fn collapse_whitespace(input: &str) -> String {
    let flattened = input.replace(['\n', '\r', '\t'], " ");
    WHITESPACE_RUN
        .replace_all(flattened.trim(), " ")
        .into_owned()
}

/// Outcome of normalizing one raw stream line.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedLine {
    /// Not a `data:` line, or a data line without payload. Carries the
    /// original text.
    Passthrough(String),
    /// A data line whose payload parsed, possibly after repair.
    Data {
        line: String,
        value: Value,
        repaired: bool,
    },
    /// A data line no repair could salvage. Carries the original text; the
    /// caller logs and drops it.
    Unparseable(String),
}

impl NormalizedLine {
    /// The line text: reconstructed when repaired, otherwise the original.
    pub fn line(&self) -> &str {
        match self {
            NormalizedLine::Passthrough(line) | NormalizedLine::Unparseable(line) => line,
            NormalizedLine::Data { line, .. } => line,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            NormalizedLine::Data { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Runs the repair chain on a bare payload.
///
/// Returns the text that parsed together with its value, or `None` when every
/// repair failed.
pub fn repair_payload(payload: &str) -> Option<(String, Value)> {
    if let Ok(value) = serde_json::from_str(payload) {
        return Some((payload.to_string(), value));
    }

    let mut candidate = payload.to_string();
    for (name, repair) in REPAIRS {
        candidate = repair(&candidate);
        if let Ok(value) = serde_json::from_str(&candidate) {
            tracing::debug!(repair = *name, "Repaired malformed stream payload");
            return Some((candidate, value));
        }
    }
    None
}

/// Normalizes one raw line from an SSE body.
pub fn normalize_line(line: &str) -> NormalizedLine {
    let Some(rest) = line.trim_start().strip_prefix(DATA_PREFIX) else {
        return NormalizedLine::Passthrough(line.to_string());
    };

    let payload = rest.trim();
    if payload.is_empty() {
        return NormalizedLine::Passthrough(line.to_string());
    }

    match repair_payload(payload) {
        Some((text, value)) if text == payload => NormalizedLine::Data {
            line: line.to_string(),
            value,
            repaired: false,
        },
        Some((text, value)) => NormalizedLine::Data {
            line: format!("{DATA_PREFIX} {text}"),
            value,
            repaired: true,
        },
        None => NormalizedLine::Unparseable(line.to_string()),
    }
}
