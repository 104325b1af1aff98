//! Parameter schema types.
//!
//! Every effect type declares its parameters as an ordered list of
//! [`ParamSpec`]s. The kind set is closed: validation matches exhaustively on
//! [`ParamKind`], and defaults are typed [`ParamValue`]s rather than raw JSON.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// The closed set of parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Bounded floating-point number.
    Float,
    /// Bounded integer.
    Int,
    /// One of a fixed list of strings.
    Enum,
    /// Free text.
    String,
    /// Boolean flag.
    Bool,
    /// Name of a file from a discovered set.
    FileReference,
    /// Arbitrary JSON object passed through untouched.
    OpaqueMapping,
}

impl ParamKind {
    /// Phrase used in type-mismatch messages ("must be a number").
    pub fn expectation(self) -> &'static str {
        match self {
            ParamKind::Float => "a number",
            ParamKind::Int => "an integer",
            ParamKind::Enum => "one of the listed options",
            ParamKind::String => "a string",
            ParamKind::Bool => "a boolean",
            ParamKind::FileReference => "a file name",
            ParamKind::OpaqueMapping => "an object",
        }
    }

    /// Whether `min`/`max` apply.
    pub fn is_numeric(self) -> bool {
        matches!(self, ParamKind::Float | ParamKind::Int)
    }

    /// Whether `allowed_values` apply.
    pub fn is_choice(self) -> bool {
        matches!(self, ParamKind::Enum | ParamKind::FileReference)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Float => "float",
            ParamKind::Int => "int",
            ParamKind::Enum => "enum",
            ParamKind::String => "string",
            ParamKind::Bool => "bool",
            ParamKind::FileReference => "file_reference",
            ParamKind::OpaqueMapping => "opaque_mapping",
        };
        f.write_str(name)
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Float parameter value.
    Float(f64),
    /// Int parameter value.
    Int(i64),
    /// Bool parameter value.
    Bool(bool),
    /// Enum, string or file-reference value.
    Text(String),
    /// Opaque mapping value.
    Mapping(Map<String, Value>),
}

impl ParamValue {
    /// Numeric view of a float or int value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text view of an enum, string or file-reference value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Bool view.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Mapping view.
    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            ParamValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Whether this value's variant can hold a parameter of `kind`.
    pub fn fits(&self, kind: ParamKind) -> bool {
        matches!(
            (self, kind),
            (ParamValue::Float(_), ParamKind::Float)
                | (ParamValue::Int(_), ParamKind::Int)
                | (ParamValue::Bool(_), ParamKind::Bool)
                | (
                    ParamValue::Text(_),
                    ParamKind::Enum | ParamKind::String | ParamKind::FileReference
                )
                | (ParamValue::Mapping(_), ParamKind::OpaqueMapping)
        )
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Text(v) => write!(f, "'{v}'"),
            ParamValue::Mapping(m) => write!(f, "{}", Value::Object(m.clone())),
        }
    }
}

/// Declaration of one parameter of an effect type.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name as it appears in chain specs.
    pub name: String,
    /// Value kind.
    pub kind: ParamKind,
    /// Inclusive lower bound (numeric kinds only).
    pub min: Option<f64>,
    /// Inclusive upper bound (numeric kinds only).
    pub max: Option<f64>,
    /// Permitted values, in display order (enum and file-reference only).
    pub allowed_values: Vec<String>,
    /// Value used when the parameter is not supplied.
    pub default: Option<ParamValue>,
    /// Whether the parameter must be supplied when there is no default.
    pub required: bool,
    /// Short help text for catalog display.
    pub help: Option<String>,
}

impl ParamSpec {
    fn new(name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            min: None,
            max: None,
            allowed_values: Vec::new(),
            default: None,
            required: false,
            help: None,
        }
    }

    /// A float in `[min, max]`.
    pub fn float(name: &str, min: f64, max: f64, default: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            default: Some(ParamValue::Float(default)),
            ..Self::new(name, ParamKind::Float)
        }
    }

    /// An integer in `[min, max]`.
    pub fn int(name: &str, min: i64, max: i64, default: i64) -> Self {
        Self {
            min: Some(min as f64),
            max: Some(max as f64),
            default: Some(ParamValue::Int(default)),
            ..Self::new(name, ParamKind::Int)
        }
    }

    /// One of `options`.
    pub fn enumeration<S: AsRef<str>>(name: &str, options: &[S], default: &str) -> Self {
        Self {
            allowed_values: options.iter().map(|o| o.as_ref().to_string()).collect(),
            default: Some(ParamValue::Text(default.to_string())),
            ..Self::new(name, ParamKind::Enum)
        }
    }

    /// A boolean flag.
    pub fn boolean(name: &str, default: bool) -> Self {
        Self {
            default: Some(ParamValue::Bool(default)),
            ..Self::new(name, ParamKind::Bool)
        }
    }

    /// Free text with no default.
    pub fn string(name: &str) -> Self {
        Self::new(name, ParamKind::String)
    }

    /// A file chosen from `options`, with no default.
    pub fn file(name: &str, options: Vec<String>) -> Self {
        Self {
            allowed_values: options,
            ..Self::new(name, ParamKind::FileReference)
        }
    }

    /// A JSON object defaulting to `{}`.
    pub fn mapping(name: &str) -> Self {
        Self {
            default: Some(ParamValue::Mapping(Map::new())),
            ..Self::new(name, ParamKind::OpaqueMapping)
        }
    }

    /// Marks the parameter as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches help text.
    #[must_use]
    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    /// Checks that the declared default is a legal value for this spec.
    pub fn check_default(&self) -> Result<(), String> {
        let Some(default) = &self.default else {
            return Ok(());
        };
        if !default.fits(self.kind) {
            return Err(format!("default {default} is not {}", self.kind.expectation()));
        }
        if let Some(v) = default.as_f64()
            && (self.min.is_some_and(|min| v < min) || self.max.is_some_and(|max| v > max))
        {
            return Err(format!("default {v} is outside the declared range"));
        }
        if self.kind.is_choice() {
            let value = default.as_str().unwrap_or_default();
            if !self.allowed_values.iter().any(|a| a == value) {
                return Err(format!("default '{value}' is not an allowed value"));
            }
        }
        Ok(())
    }
}
