//! Record decoding for funding documents.
//!
//! This module turns a parsed JSON document into typed
//! [`FundingRecord`]s, applying the configured policy to records
//! that do not have the expected shape.

use crate::error::MalformedRecordError;
use crate::models::{FundingRecord, SkippedRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

/// What to do with a record that has the wrong shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    /// Drop the record and keep going (default)
    #[default]
    Skip,
    /// Fail on the first malformed record
    Strict,
}

impl fmt::Display for RecordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordPolicy::Skip => write!(f, "skip"),
            RecordPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Result of decoding a funding document.
#[derive(Debug, Clone, Default)]
pub struct DecodedRecords {
    /// Well-formed records in document order.
    pub records: Vec<FundingRecord>,
    /// Records dropped under [`RecordPolicy::Skip`].
    pub skipped: Vec<SkippedRecord>,
}

impl DecodedRecords {
    /// Total number of elements seen in the source array.
    pub fn total_seen(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Decode a funding document into records.
///
/// The document root must be an array regardless of policy.
pub fn decode_records(
    document: &Value,
    policy: RecordPolicy,
) -> Result<DecodedRecords, MalformedRecordError> {
    let items = document
        .as_array()
        .ok_or(MalformedRecordError::NotAnArray {
            found: json_kind(document),
        })?;

    let mut decoded = DecodedRecords::default();

    for (index, item) in items.iter().enumerate() {
        match decode_record(index, item) {
            Ok(record) => decoded.records.push(record),
            Err(e) if policy == RecordPolicy::Skip => {
                warn!("Skipping malformed record: {}", e);
                decoded.skipped.push(SkippedRecord {
                    index,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Decoded {} records ({} skipped)",
        decoded.records.len(),
        decoded.skipped.len()
    );

    Ok(decoded)
}

/// Decode a single array element.
pub fn decode_record(index: usize, item: &Value) -> Result<FundingRecord, MalformedRecordError> {
    let object = item.as_object().ok_or(MalformedRecordError::NotAnObject {
        index,
        found: json_kind(item),
    })?;

    let year = parse_year(required(object, index, "year")?).ok_or(MalformedRecordError::InvalidField {
        index,
        field: "year",
        expected: "an integer",
    })?;

    let industry = required(object, index, "industry")?
        .as_str()
        .ok_or(MalformedRecordError::InvalidField {
            index,
            field: "industry",
            expected: "a string",
        })?;

    let amount = required(object, index, "amount")?
        .as_f64()
        .ok_or(MalformedRecordError::InvalidField {
            index,
            field: "amount",
            expected: "a number",
        })?;

    Ok(FundingRecord::new(year, industry, amount))
}

fn required<'a>(
    object: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a Value, MalformedRecordError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(MalformedRecordError::MissingField { index, field }),
        Some(value) => Ok(value),
    }
}

/// Accepts integer years, and floats with no fractional part.
fn parse_year(value: &Value) -> Option<i64> {
    if let Some(year) = value.as_i64() {
        return Some(year);
    }

    let year = value.as_f64()?;
    if year.fract() == 0.0 && year >= i64::MIN as f64 && year <= i64::MAX as f64 {
        Some(year as i64)
    } else {
        None
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
