//! Query strings, JSON bodies and the flags they carry

use bytes::Bytes;
use rentbook_grid::Rows;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::response::ApiError;

/// Decoded query-string pairs, in order
#[derive(Debug, Default, Clone)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Non-empty value for `name`
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Truthiness of a flag parameter; absent means false
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(truthy_text)
    }
}

/// Whether a flag's text turns it on
///
/// Everything but `""`, `"false"` and `"0"` does.
pub fn truthy_text(text: &str) -> bool {
    !matches!(text.trim(), "" | "false" | "0")
}

fn truthy_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => truthy_text(s),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A flag read from a JSON body with the same truthiness as query flags
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flag(pub bool);

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Flag(truthy_value(&value)))
    }
}

/// `POST /add-rent-entry`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBody {
    pub sheet: Option<String>,
    pub values: Option<Value>,
    #[serde(default)]
    pub is_electric_bill: Flag,
    #[serde(default)]
    pub demo_login: Flag,
}

/// `PUT /amount`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountBody {
    pub sheet: Option<String>,
    pub month_year: Option<String>,
    pub values: Option<Value>,
    #[serde(default)]
    pub is_electric_bill: Flag,
    #[serde(default)]
    pub demo_login: Flag,
}

/// `PUT /update-summary`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBody {
    pub flat: Option<String>,
    pub values: Option<Value>,
    #[serde(default)]
    pub demo_login: Flag,
}

/// Parse a JSON request body
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request("Request body is required."));
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// Drop empty strings so required-field checks treat them as missing
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Cell text for a JSON value, the way the grid would show it
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Rows from a `values` field
///
/// Takes an array of rows; a flat array of cells is one row.
pub fn rows_from(values: Value) -> Result<Rows, ApiError> {
    let Value::Array(items) = values else {
        return Err(ApiError::bad_request("values must be an array."));
    };
    if items.iter().all(|item| !item.is_array()) {
        return Ok(vec![items.iter().map(cell_text).collect()]);
    }

    items
        .into_iter()
        .map(|item| match item {
            Value::Array(cells) => Ok(cells.iter().map(cell_text).collect()),
            _ => Err(ApiError::bad_request("values must be an array of rows.")),
        })
        .collect()
}

/// A single row of cells from a `values` field
pub fn row_from(values: Value) -> Result<Vec<String>, ApiError> {
    let mut rows = rows_from(values)?;
    if rows.len() != 1 {
        return Err(ApiError::bad_request("values must hold a single row."));
    }
    Ok(rows.remove(0))
}
