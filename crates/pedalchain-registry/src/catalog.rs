//! Immutable catalog snapshot: lookup, listing and the default self-check.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::builtin::{builtin_descriptors, plugin_host_descriptor};
use crate::descriptor::EffectTypeDescriptor;

/// Failure to resolve an effect type identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No descriptor or alias matches.
    #[error("unknown effect type '{0}'")]
    NotFound(String),
    /// The identifier names a family this deployment has switched off.
    #[error("effect '{0}' is not available in this deployment")]
    Disabled(String),
}

impl LookupError {
    /// The identifier that failed to resolve.
    pub fn type_id(&self) -> &str {
        match self {
            LookupError::NotFound(id) | LookupError::Disabled(id) => id,
        }
    }
}

/// A built-in parameter whose declared default is not a legal value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid default for {type_id}.{param}: {reason}")]
pub struct SchemaDefect {
    /// Effect type carrying the defect.
    pub type_id: String,
    /// Parameter name.
    pub param: String,
    /// What is wrong with the default.
    pub reason: String,
}

/// One immutable view of the registry.
///
/// Chain builds take a single snapshot and resolve every step against it.
#[derive(Debug, Clone)]
pub struct Catalog {
    descriptors: Vec<EffectTypeDescriptor>,
    index: HashMap<String, usize>,
    disabled: HashSet<String>,
    impulses: Vec<String>,
}

impl Catalog {
    /// Builds the catalog for the given impulse files and plugin policy.
    pub fn new(impulses: Vec<String>, plugins_enabled: bool) -> Self {
        let mut descriptors = builtin_descriptors(&impulses);
        let mut disabled = HashSet::new();
        let host = plugin_host_descriptor();
        if plugins_enabled {
            descriptors.push(host);
        } else {
            disabled.extend(host.identifiers());
        }

        let mut index = HashMap::new();
        for (i, descriptor) in descriptors.iter().enumerate() {
            for id in descriptor.identifiers() {
                index.insert(id, i);
            }
        }

        Self {
            descriptors,
            index,
            disabled,
            impulses,
        }
    }

    /// Resolves an identifier or alias, ignoring ASCII case and surrounding whitespace.
    pub fn lookup(&self, type_id: &str) -> Result<&EffectTypeDescriptor, LookupError> {
        let key = type_id.trim().to_ascii_lowercase();
        if let Some(&i) = self.index.get(&key) {
            return Ok(&self.descriptors[i]);
        }
        if self.disabled.contains(&key) {
            Err(LookupError::Disabled(type_id.to_string()))
        } else {
            Err(LookupError::NotFound(type_id.to_string()))
        }
    }

    /// Whether `type_id` resolves to an enabled descriptor.
    pub fn contains(&self, type_id: &str) -> bool {
        self.lookup(type_id).is_ok()
    }

    /// Every enabled descriptor in catalog order.
    pub fn list_all(&self) -> &[EffectTypeDescriptor] {
        &self.descriptors
    }

    /// Impulse-response file names discovered when this snapshot was built.
    pub fn impulse_responses(&self) -> &[String] {
        &self.impulses
    }

    /// Serializable catalog keyed by canonical type id, in catalog order.
    pub fn listing(&self) -> Value {
        let mut out = Map::new();
        for descriptor in &self.descriptors {
            out.insert(descriptor.type_id.clone(), descriptor_listing(descriptor));
        }
        Value::Object(out)
    }

    /// Checks every declared default against its own parameter spec.
    pub fn verify_defaults(&self) -> Result<(), SchemaDefect> {
        for descriptor in &self.descriptors {
            for spec in &descriptor.params {
                spec.check_default().map_err(|reason| SchemaDefect {
                    type_id: descriptor.type_id.clone(),
                    param: spec.name.clone(),
                    reason,
                })?;
            }
        }
        Ok(())
    }
}

fn descriptor_listing(descriptor: &EffectTypeDescriptor) -> Value {
    let mut params = Map::new();
    for spec in &descriptor.params {
        let mut entry = Map::new();
        entry.insert("kind".into(), json!(spec.kind));
        entry.insert("default".into(), json!(spec.default));
        if let Some(min) = spec.min {
            entry.insert("min".into(), json!(min));
        }
        if let Some(max) = spec.max {
            entry.insert("max".into(), json!(max));
        }
        if spec.kind.is_choice() {
            entry.insert("allowed_values".into(), json!(spec.allowed_values));
        }
        if spec.required {
            entry.insert("required".into(), Value::Bool(true));
        }
        if let Some(help) = &spec.help {
            entry.insert("help".into(), json!(help));
        }
        params.insert(spec.name.clone(), Value::Object(entry));
    }

    let mut out = Map::new();
    out.insert("name".into(), json!(descriptor.display_name));
    out.insert("description".into(), json!(descriptor.description));
    out.insert("params".into(), Value::Object(params));
    if !descriptor.tags.is_empty() {
        out.insert("tags".into(), json!(descriptor.tags));
    }
    if let Some(notes) = &descriptor.notes {
        out.insert("notes".into(), json!(notes));
    }
    if !descriptor.aliases.is_empty() {
        out.insert("aliases".into(), json!(descriptor.aliases));
    }
    Value::Object(out)
}
