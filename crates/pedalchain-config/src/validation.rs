//! Parameter validation against an effect type's schema.
//!
//! [`validate`] is pure: no I/O, deterministic for a given descriptor and
//! input. Unknown keys are rejected before any schema key is examined, so a
//! typo is reported even when other values are also wrong.

use pedalchain_registry::{EffectTypeDescriptor, ParamKind, ParamSpec, ParamValue};
use serde_json::{Map, Value};
use thiserror::Error;

/// A validation failure, always naming one parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// The key is not in the schema.
    #[error("unknown parameter '{name}'")]
    UnknownParameter {
        /// Offending key.
        name: String,
    },

    /// Required with no default and not supplied.
    #[error("missing required parameter '{name}'")]
    MissingRequiredParameter {
        /// Parameter name.
        name: String,
    },

    /// The value cannot be coerced to the declared kind.
    #[error("{name} must be {expected}, got {found}")]
    TypeMismatch {
        /// Parameter name.
        name: String,
        /// Phrase describing the declared kind.
        expected: &'static str,
        /// The supplied value, rendered as JSON.
        found: String,
    },

    /// Numeric value outside the inclusive bounds.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Parameter name.
        name: String,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
        /// Supplied value after coercion.
        value: f64,
    },

    /// Enum or file-reference value not among the allowed values.
    #[error("{name} must be one of {}, got '{value}'", choices(.allowed))]
    InvalidEnumValue {
        /// Parameter name.
        name: String,
        /// Supplied value.
        value: String,
        /// Permitted values.
        allowed: Vec<String>,
    },
}

fn choices(allowed: &[String]) -> String {
    if allowed.is_empty() {
        "the installed options (none available)".to_string()
    } else {
        allowed.join(", ")
    }
}

impl ParamError {
    /// Name of the parameter the error concerns.
    pub fn param(&self) -> &str {
        match self {
            ParamError::UnknownParameter { name }
            | ParamError::MissingRequiredParameter { name }
            | ParamError::TypeMismatch { name, .. }
            | ParamError::OutOfRange { name, .. }
            | ParamError::InvalidEnumValue { name, .. } => name,
        }
    }
}

/// Validated, typed parameters in schema order, defaults filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedParams {
    values: Vec<(String, ParamValue)>,
}

impl ValidatedParams {
    /// Value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Numeric value for `name`.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }

    /// Text value for `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Boolean value for `name`.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Mapping value for `name`.
    pub fn mapping(&self, name: &str) -> Option<&Map<String, Value>> {
        self.get(name).and_then(ParamValue::as_mapping)
    }

    /// Iterates `(name, value)` in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of values present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Checks `supplied` against `descriptor`'s schema.
///
/// JSON `null` counts as not supplied.
pub fn validate(
    descriptor: &EffectTypeDescriptor,
    supplied: &Map<String, Value>,
) -> Result<ValidatedParams, ParamError> {
    if let Some(name) = supplied.keys().find(|k| descriptor.param_spec(k).is_none()) {
        return Err(ParamError::UnknownParameter { name: name.clone() });
    }

    let mut values = Vec::with_capacity(descriptor.params.len());
    for spec in &descriptor.params {
        let value = match supplied.get(&spec.name).filter(|v| !v.is_null()) {
            Some(raw) => coerce(spec, raw)?,
            None => spec.default.clone(),
        };
        match value {
            Some(value) => values.push((spec.name.clone(), value)),
            None if spec.required => {
                return Err(ParamError::MissingRequiredParameter {
                    name: spec.name.clone(),
                });
            }
            None => {}
        }
    }
    Ok(ValidatedParams { values })
}

/// Coerces one supplied value. `Ok(None)` means "treat as absent".
fn coerce(spec: &ParamSpec, raw: &Value) -> Result<Option<ParamValue>, ParamError> {
    let mismatch = || ParamError::TypeMismatch {
        name: spec.name.clone(),
        expected: spec.kind.expectation(),
        found: raw.to_string(),
    };

    let value = match spec.kind {
        ParamKind::Float => {
            let v = to_f64(raw).ok_or_else(mismatch)?;
            check_range(spec, v)?;
            ParamValue::Float(v)
        }
        ParamKind::Int => {
            let v = to_i64(raw).ok_or_else(mismatch)?;
            check_range(spec, v as f64)?;
            ParamValue::Int(v)
        }
        ParamKind::Bool => ParamValue::Bool(to_bool(raw).ok_or_else(mismatch)?),
        ParamKind::Enum => {
            let s = raw.as_str().ok_or_else(mismatch)?;
            check_choice(spec, s)?;
            ParamValue::Text(s.to_string())
        }
        ParamKind::String | ParamKind::FileReference => {
            let s = to_text(raw).ok_or_else(mismatch)?;
            if s.trim().is_empty() {
                if spec.required {
                    return Err(ParamError::MissingRequiredParameter {
                        name: spec.name.clone(),
                    });
                }
                return Ok(None);
            }
            if spec.kind == ParamKind::FileReference {
                check_choice(spec, &s)?;
            }
            ParamValue::Text(s)
        }
        ParamKind::OpaqueMapping => {
            ParamValue::Mapping(raw.as_object().ok_or_else(mismatch)?.clone())
        }
    };
    Ok(Some(value))
}

fn check_range(spec: &ParamSpec, value: f64) -> Result<(), ParamError> {
    let below = spec.min.is_some_and(|min| value < min);
    let above = spec.max.is_some_and(|max| value > max);
    if below || above {
        return Err(ParamError::OutOfRange {
            name: spec.name.clone(),
            min: spec.min.unwrap_or(f64::NEG_INFINITY),
            max: spec.max.unwrap_or(f64::INFINITY),
            value,
        });
    }
    Ok(())
}

fn check_choice(spec: &ParamSpec, value: &str) -> Result<(), ParamError> {
    if spec.allowed_values.iter().any(|a| a == value) {
        Ok(())
    } else {
        Err(ParamError::InvalidEnumValue {
            name: spec.name.clone(),
            value: value.to_string(),
            allowed: spec.allowed_values.clone(),
        })
    }
}

fn to_f64(raw: &Value) -> Option<f64> {
    let v = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn to_i64(raw: &Value) -> Option<i64> {
    if let Value::Number(n) = raw
        && let Some(v) = n.as_i64()
    {
        return Some(v);
    }
    if let Value::String(s) = raw
        && let Ok(v) = s.trim().parse::<i64>()
    {
        return Some(v);
    }
    let v = to_f64(raw)?;
    // Exact integers only; 2^63 itself is out of range.
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn to_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 0.0 => Some(false),
            Some(v) if v == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
