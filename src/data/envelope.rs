//! Helpers for the EIA v2 response envelope.
//!
//! A well-formed page looks like:
//!
//! ```json
//! { "response": { "total": "1234", "data": [ { ... }, ... ] } }
//! ```
//!
//! Nothing about that shape is guaranteed, so callers go through these
//! accessors instead of indexing the document directly.

use std::fmt;

use serde_json::Value;

/// Why a response document could not be read as a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// No top-level `response` object.
    MissingResponse,
    /// `response` has no `data` key.
    MissingData,
    /// `response.data` is present but not an array.
    DataNotArray,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ShapeError::MissingResponse => "'response' key not found in the API response",
            ShapeError::MissingData => "'data' key not found under 'response' in the API response",
            ShapeError::DataNotArray => "'response.data' in the API response is not an array",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ShapeError {}

/// Borrow the record array of a page.
pub fn response_data(document: &Value) -> Result<&[Value], ShapeError> {
    let response = document
        .get("response")
        .filter(|r| r.is_object())
        .ok_or(ShapeError::MissingResponse)?;
    let data = response.get("data").ok_or(ShapeError::MissingData)?;
    data.as_array()
        .map(Vec::as_slice)
        .ok_or(ShapeError::DataNotArray)
}

/// Total number of rows matching the request, as reported by the API.
///
/// EIA sends this as a string; a plain number is accepted as well.
pub fn response_total(document: &Value) -> Option<usize> {
    match document.get("response")?.get("total")? {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Error message the API put in the body, if any.
pub fn api_error(document: &Value) -> Option<&str> {
    match document.get("error")? {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => obj.get("message").and_then(Value::as_str),
        _ => None,
    }
}
