//! Untrusted chain documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// One step of a chain as supplied by a caller: an effect identifier and a
/// raw parameter mapping. Position in the containing list is its order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectStepSpec {
    /// Effect type identifier or alias, matched case-insensitively.
    #[serde(rename = "type", alias = "type_id")]
    pub type_id: String,
    /// Parameter values keyed by name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Map<String, Value>,
}

/// An ordered chain of steps. May be empty.
pub type EffectChainSpec = Vec<EffectStepSpec>;

impl EffectStepSpec {
    /// A step with no parameters.
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            params: Map::new(),
        }
    }

    /// Adds one parameter value.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChainDocument {
    Steps(EffectChainSpec),
    Wrapped { effects: EffectChainSpec },
}

/// Parses a chain from JSON.
///
/// Accepts either a bare list of steps or an object with an `effects` list
/// (the shape of a preset file).
pub fn parse_chain(json: &str) -> Result<EffectChainSpec, ConfigError> {
    let document: ChainDocument = serde_json::from_str(json)?;
    Ok(match document {
        ChainDocument::Steps(steps) | ChainDocument::Wrapped { effects: steps } => steps,
    })
}
