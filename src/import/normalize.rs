//! Per-record normalization of the recipe dump.
//!
//! The batch is folded into accepted rows and skipped records; a bad record
//! never aborts the rest of the batch.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::db::VARCHAR_LIMIT;

/// Why a single record was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` is out of range")]
    OutOfRange { field: &'static str },

    #[error("field `{field}` is longer than 255 characters")]
    TooLong { field: &'static str },

    #[error("field `{field}` contains a NUL character")]
    NulCharacter { field: &'static str },
}

/// A recipe ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub cuisine: Option<String>,
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    pub description: Option<String>,
    pub nutrients: Map<String, Value>,
    pub serves: Option<String>,
}

impl TryFrom<Value> for NewRecipe {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(record) = value else {
            return Err(RecordError::NotAnObject);
        };

        let nutrients = normalize_nutrients(record.get("nutrients"));
        if nutrients.values().any(contains_nul) || nutrients.keys().any(|k| k.contains('\0')) {
            return Err(RecordError::NulCharacter { field: "nutrients" });
        }

        Ok(Self {
            cuisine: text(&record, "cuisine", Some(VARCHAR_LIMIT))?,
            title: text(&record, "title", Some(VARCHAR_LIMIT))?,
            rating: number(&record, "rating")?,
            prep_time: minutes(&record, "prep_time")?,
            cook_time: minutes(&record, "cook_time")?,
            total_time: minutes(&record, "total_time")?,
            description: text(&record, "description", None)?,
            nutrients,
            serves: text(&record, "serves", Some(VARCHAR_LIMIT))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub key: String,
    pub reason: RecordError,
}

/// Outcome of normalizing a whole document.
#[derive(Debug, Default, PartialEq)]
pub struct NormalizedBatch {
    pub records: Vec<NewRecipe>,
    pub skipped: Vec<SkippedRecord>,
}

impl NormalizedBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalizes every value of `document`, keeping file order.
pub fn normalize_batch(document: Map<String, Value>) -> NormalizedBatch {
    document
        .into_iter()
        .fold(NormalizedBatch::default(), |mut batch, (key, value)| {
            match NewRecipe::try_from(value) {
                Ok(recipe) => batch.records.push(recipe),
                Err(reason) => batch.skipped.push(SkippedRecord { key, reason }),
            }
            batch
        })
}

/// Coerces any `nutrients` input into a key-value mapping.
///
/// Missing or null becomes empty, strings are parsed as JSON (falling back to
/// empty when that fails or is not an object), objects pass through and any
/// other type becomes empty.
pub fn normalize_nutrients(value: Option<&Value>) -> Map<String, Value> {
    match value {
        None | Some(Value::Null) => Map::new(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(parsed)) => parsed,
            _ => Map::new(),
        },
        Some(Value::Object(map)) => map.clone(),
        Some(_) => Map::new(),
    }
}

fn text(
    record: &Map<String, Value>,
    field: &'static str,
    max_chars: Option<usize>,
) -> Result<Option<String>, RecordError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.contains('\0') => Err(RecordError::NulCharacter { field }),
        Some(Value::String(s)) => match max_chars {
            Some(max) if s.chars().count() > max => Err(RecordError::TooLong { field }),
            _ => Ok(Some(s.clone())),
        },
        Some(_) => Err(RecordError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

/// Float column; numeric strings such as `"4.5"` are accepted.
fn number(record: &Map<String, Value>, field: &'static str) -> Result<Option<f64>, RecordError> {
    let wrong_type = RecordError::WrongType {
        field,
        expected: "a number",
    };
    let value = match record.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => Some(s.trim().parse::<f64>().map_err(|_| wrong_type)?),
        Some(_) => return Err(wrong_type),
    };
    match value {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(RecordError::OutOfRange { field }),
    }
}

/// Integer minutes column.
///
/// Fractional numbers round half away from zero (`12.5` → 13) and strings
/// must hold a plain integer, matching how the column would coerce them.
fn minutes(record: &Map<String, Value>, field: &'static str) -> Result<Option<i32>, RecordError> {
    let wrong_type = RecordError::WrongType {
        field,
        expected: "a whole number of minutes",
    };
    let out_of_range = RecordError::OutOfRange { field };
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).map(Some).map_err(|_| out_of_range);
            }
            match n.as_f64().map(f64::round) {
                Some(f) if f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) => {
                    Ok(Some(f as i32))
                }
                _ => Err(out_of_range),
            }
        }
        Some(Value::String(s)) => {
            let i = s.trim().parse::<i64>().map_err(|_| wrong_type)?;
            i32::try_from(i).map(Some).map_err(|_| out_of_range)
        }
        Some(_) => Err(wrong_type),
    }
}

fn contains_nul(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains('\0'),
        Value::Array(items) => items.iter().any(contains_nul),
        Value::Object(map) => map
            .iter()
            .any(|(k, v)| k.contains('\0') || contains_nul(v)),
        _ => false,
    }
}
