// File: ./src/model/record.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// One parsed cell. Numbers and booleans only show up when the parser runs
/// with dynamic typing enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Empty,
}

impl FieldValue {
    /// Converts a raw cell. With `dynamic` set, booleans and plain numerals are
    /// typed and empty cells become `Empty`.
    pub fn from_cell(raw: &str, dynamic: bool) -> Self {
        if !dynamic {
            return FieldValue::Text(raw.to_string());
        }
        if raw.is_empty() {
            return FieldValue::Empty;
        }
        match raw {
            "true" | "TRUE" => return FieldValue::Bool(true),
            "false" | "FALSE" => return FieldValue::Bool(false),
            _ => {}
        }
        if looks_numeric(raw)
            && let Ok(n) = raw.parse::<f64>()
            && n.is_finite()
        {
            return FieldValue::Number(n);
        }
        FieldValue::Text(raw.to_string())
    }

    /// Best-effort stringification. `Empty` has no text.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            FieldValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            FieldValue::Empty => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Mirrors a truthiness check on the cell: empty text and `Empty` are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Empty => true,
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

fn looks_numeric(raw: &str) -> bool {
    let body = raw.strip_prefix('-').unwrap_or(raw);
    !body.is_empty()
        && body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A row as produced by the tabular parser: column name to cell.
pub type RawRow = BTreeMap<String, FieldValue>;

/// Builds a text-only row from pairs.
pub fn raw_row<I, K, V>(pairs: I) -> RawRow
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// One normalized row of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub fields: BTreeMap<String, FieldValue>,
    pub parsed_date: Option<NaiveDateTime>,
    pub tags: Vec<String>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Stringified, non-blank value of `column`.
    pub fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        let value = self.fields.get(column)?;
        if value.is_blank() {
            return None;
        }
        value.as_text()
    }

    /// Exact comparison against the stringified value.
    pub fn field_equals(&self, column: &str, expected: &str) -> bool {
        self.fields
            .get(column)
            .and_then(FieldValue::as_text)
            .is_some_and(|v| v == expected)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
