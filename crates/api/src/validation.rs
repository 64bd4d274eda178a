//! Request body validation.
//!
//! Bodies arrive as untyped JSON and are checked field by field so that a
//! single response can report every offending field at once, e.g.
//!
//! ```json
//! {"email": ["Missing data for required field."], "price": ["Not a valid number."]}
//! ```
//!
//! Models build their validated inputs through a [`FieldReader`]; see
//! `NewUser::from_json` and friends.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

pub const MISSING: &str = "Missing data for required field.";
pub const NULL: &str = "Field may not be null.";
pub const NOT_STRING: &str = "Not a valid string.";
pub const NOT_INTEGER: &str = "Not a valid integer.";
pub const NOT_NUMBER: &str = "Not a valid number.";
pub const NOT_FINITE: &str = "Special numeric values (nan or infinity) are not permitted.";
pub const NOT_DATE: &str = "Not a valid date.";
pub const NOT_EMAIL: &str = "Not a valid email address.";
pub const NEGATIVE: &str = "Must be greater than or equal to 0.";
pub const UNKNOWN_FIELD: &str = "Unknown field.";
pub const INVALID_INPUT: &str = "Invalid input type.";

/// Key used for errors that concern the body as a whole.
pub const SCHEMA_KEY: &str = "_schema";

/// Read-only fields that clients may echo back; ignored on input.
const READ_ONLY: &[&str] = &["id"];

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// An empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A single error against the body as a whole.
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(SCHEMA_KEY, message);
        errors
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of the fields that failed.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

/// Pulls typed fields out of a JSON object, collecting errors as it goes.
///
/// Every accessor returns `None` exactly when it recorded an error, so a
/// caller holding all `Some` values after [`FieldReader::finish`] returned
/// an empty set has a fully valid input.
pub struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    known: &'static [&'static str],
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    /// Start reading `body`, which must be a JSON object whose keys are drawn
    /// from `known` (plus read-only fields such as `id`).
    ///
    /// # Errors
    ///
    /// Returns a `_schema` error when `body` is not an object.
    pub fn new(body: &'a Value, known: &'static [&'static str]) -> Result<Self, ValidationErrors> {
        let object = body
            .as_object()
            .ok_or_else(|| ValidationErrors::schema(INVALID_INPUT))?;
        Ok(Self {
            object,
            known,
            errors: ValidationErrors::new(),
        })
    }

    /// Record an error produced by a caller-side check.
    pub fn reject(&mut self, field: &str, message: &str) {
        self.errors.add(field, message);
    }

    /// A required string no longer than `max_chars`.
    pub fn string(&mut self, field: &str, max_chars: usize) -> Option<String> {
        let value = self.present(field)?;
        let Some(s) = value.as_str() else {
            self.reject(field, NOT_STRING);
            return None;
        };
        if s.chars().count() > max_chars {
            self.reject(field, &format!("Longer than maximum length {max_chars}."));
            return None;
        }
        Some(s.to_owned())
    }

    /// A required 32-bit integer. Integral numbers and numeric strings are
    /// accepted.
    pub fn integer(&mut self, field: &str) -> Option<i32> {
        let value = self.present(field)?;
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(float_to_i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        let result = parsed.and_then(|n| i32::try_from(n).ok());
        if result.is_none() {
            self.reject(field, NOT_INTEGER);
        }
        result
    }

    /// A required finite number. Numeric strings are accepted.
    pub fn number(&mut self, field: &str) -> Option<f64> {
        let value = self.present(field)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n.is_finite() => Some(n),
            Some(_) => {
                self.reject(field, NOT_FINITE);
                None
            }
            None => {
                self.reject(field, NOT_NUMBER);
                None
            }
        }
    }

    /// A required ISO 8601 calendar date (`YYYY-MM-DD`).
    pub fn date(&mut self, field: &str) -> Option<NaiveDate> {
        let value = self.present(field)?;
        let parsed = value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());
        if parsed.is_none() {
            self.reject(field, NOT_DATE);
        }
        parsed
    }

    /// Flag unknown keys and hand back everything recorded.
    #[must_use]
    pub fn finish(mut self) -> ValidationErrors {
        let known = self.known;
        let unknown = self
            .object
            .keys()
            .filter(|key| !known.contains(&key.as_str()) && !READ_ONLY.contains(&key.as_str()));
        for key in unknown {
            self.errors.add(key.clone(), UNKNOWN_FIELD);
        }
        self.errors
    }

    fn present(&mut self, field: &str) -> Option<&'a Value> {
        match self.object.get(field) {
            None => {
                self.reject(field, MISSING);
                None
            }
            Some(Value::Null) => {
                self.reject(field, NULL);
                None
            }
            Some(value) => Some(value),
        }
    }
}

#[allow(clippy::cast_possible_truncation)] // Callers only pass integral values; i64 saturates
const fn float_to_i64(f: f64) -> i64 {
    f as i64
}
