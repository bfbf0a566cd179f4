//! Request body validation
//!
//! Turns an untyped JSON body into a [`PredictionRequest`], collecting one
//! [`FieldError`] per offending field so callers see every problem at once.
//! Nothing here touches the model: a body that fails validation never
//! becomes a feature vector.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::types::{Field, PredictionRequest};

/// Kind of a field-level validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required field absent from the body
    Missing,
    /// Value is not a JSON number
    IntType,
    /// Number has a fractional part
    IntFromFloat,
    /// Below the lower bound
    GreaterThanEqual,
    /// Above the upper bound
    LessThanEqual,
    /// Body is not valid JSON
    JsonInvalid,
    /// Body is valid JSON but not an object
    ModelAttributesType,
}

/// One validation failure, located by path into the request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: FieldErrorKind,
    pub input: Value,
}

impl FieldError {
    fn body(kind: FieldErrorKind, msg: impl Into<String>, input: Value) -> Self {
        Self {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind,
            input,
        }
    }

    fn field(field: Field, kind: FieldErrorKind, msg: impl Into<String>, input: Value) -> Self {
        Self {
            loc: vec!["body".to_string(), field.name().to_string()],
            msg: msg.into(),
            kind,
            input,
        }
    }

    /// Field name this error points at, if any
    pub fn field_name(&self) -> Option<&str> {
        self.loc.get(1).map(String::as_str)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc.join("."), self.msg)
    }
}

/// All validation failures for a single request body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether any error points at the given field
    pub fn mentions(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field_name() == Some(field.name()))
    }

    /// Short machine-friendly reason for metrics labels
    pub fn reason(&self) -> &'static str {
        match self.0.first().map(|e| e.kind) {
            Some(FieldErrorKind::JsonInvalid) => "json_invalid",
            Some(FieldErrorKind::ModelAttributesType) => "not_an_object",
            Some(FieldErrorKind::Missing) => "missing",
            Some(FieldErrorKind::IntType) | Some(FieldErrorKind::IntFromFloat) => "type",
            _ => "range",
        }
    }

    /// Record a range error for `value` if it lies outside the field bounds.
    /// Returns true when the value is accepted.
    pub(crate) fn check_bounds(&mut self, field: Field, value: i64) -> bool {
        let bounds = field.bounds();
        if value < *bounds.start() {
            self.push(FieldError::field(
                field,
                FieldErrorKind::GreaterThanEqual,
                format!("Input should be greater than or equal to {}", bounds.start()),
                Value::from(value),
            ));
            false
        } else if value > *bounds.end() {
            self.push(FieldError::field(
                field,
                FieldErrorKind::LessThanEqual,
                format!("Input should be less than or equal to {}", bounds.end()),
                Value::from(value),
            ));
            false
        } else {
            true
        }
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.0.len();
        write!(
            f,
            "{} validation error{}",
            count,
            if count == 1 { "" } else { "s" }
        )?;
        for error in &self.0 {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl PredictionRequest {
    /// Parse and validate a raw request body
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, ValidationErrors> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            FieldError::body(
                FieldErrorKind::JsonInvalid,
                format!("JSON decode error: {}", e),
                Value::Null,
            )
        })?;
        Self::from_json_value(&value)
    }

    /// Validate an already-decoded JSON body.
    ///
    /// Unknown keys are ignored. Integral floats such as `30.0` are accepted;
    /// strings, booleans and `null` are rejected as the wrong type.
    pub fn from_json_value(body: &Value) -> Result<Self, ValidationErrors> {
        let object = body.as_object().ok_or_else(|| {
            FieldError::body(
                FieldErrorKind::ModelAttributesType,
                "Input should be a valid dictionary or object to extract fields from",
                body.clone(),
            )
        })?;

        let mut errors = ValidationErrors::default();
        let mut values = [0i64; 4];

        for field in Field::ALL {
            let Some(raw) = object.get(field.name()) else {
                errors.push(FieldError::field(
                    field,
                    FieldErrorKind::Missing,
                    "Field required",
                    body.clone(),
                ));
                continue;
            };

            match coerce_integer(raw) {
                Ok(value) => {
                    if errors.check_bounds(field, value) {
                        values[field.index()] = value;
                    }
                }
                Err(kind) => {
                    let msg = match kind {
                        FieldErrorKind::IntFromFloat => {
                            "Input should be a valid integer, got a number with a fractional part"
                        }
                        _ => "Input should be a valid integer",
                    };
                    errors.push(FieldError::field(field, kind, msg, raw.clone()));
                }
            }
        }

        errors.into_result()?;
        Ok(Self::from_checked(values))
    }
}

/// Read a JSON value as an integer, saturating values beyond `i64`
fn coerce_integer(raw: &Value) -> Result<i64, FieldErrorKind> {
    let Value::Number(number) = raw else {
        return Err(FieldErrorKind::IntType);
    };

    if let Some(v) = number.as_i64() {
        return Ok(v);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }

    match number.as_f64() {
        Some(v) if v.is_finite() && v.fract() == 0.0 => {
            // Out-of-range floats saturate, which still fails the bound check
            Ok(v as i64)
        }
        Some(_) => Err(FieldErrorKind::IntFromFloat),
        None => Err(FieldErrorKind::IntType),
    }
}
