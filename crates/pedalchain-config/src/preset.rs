//! Preset documents and the on-disk preset store.
//!
//! Each preset is one pretty-printed JSON file, `<dir>/<id>.json`:
//!
//! ```json
//! {
//!   "id": "3f0c2b3ac8a94b2f9a8c2f3d4e5f6a7b",
//!   "name": "Telephone",
//!   "description": "Narrow band voice",
//!   "created_at": "2026-03-01T12:00:00Z",
//!   "schema_version": 1,
//!   "effects": [
//!     { "type": "highpass", "params": { "cutoff_frequency_hz": 300 } },
//!     { "type": "gsmfullratecompressor", "params": {} }
//!   ]
//! }
//! ```
//!
//! Parameters are stored as supplied and are not re-validated on load; the
//! chain builder validates them when the preset is run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pedalchain_registry::Catalog;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chain::EffectStepSpec;
use crate::error::ConfigError;
use crate::paths;

/// Version of the persisted document shape written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Upgrades a document from version `n` to `n + 1`, indexed by `n - 1`.
type Migration = fn(&mut Map<String, Value>);

const MIGRATIONS: &[Migration] = &[];

/// A stored preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// 32 lowercase hex characters.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Creation time, UTC.
    pub created_at: DateTime<Utc>,
    /// Document shape version.
    pub schema_version: u32,
    /// Steps, as supplied when saved.
    pub effects: Vec<EffectStepSpec>,
    /// Caller-defined extras.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

/// Listing entry for a stored preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetSummary {
    /// Preset id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Number of steps.
    pub effects_count: usize,
}

impl From<&Preset> for PresetSummary {
    fn from(preset: &Preset) -> Self {
        Self {
            id: preset.id.clone(),
            name: preset.name.clone(),
            description: preset.description.clone(),
            created_at: preset.created_at,
            effects_count: preset.effects.len(),
        }
    }
}

/// Preset store failures.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Name empty or whitespace.
    #[error("preset name is required")]
    MissingName,

    /// A step names an effect type the registry does not offer.
    #[error("step {step}: unknown effect type '{type_id}'")]
    UnknownEffectType {
        /// 1-based step position.
        step: usize,
        /// Identifier as supplied.
        type_id: String,
    },

    /// Not a 32-character lowercase hex id.
    #[error("invalid preset id '{0}'")]
    InvalidId(String),

    /// No preset with this id.
    #[error("preset not found: {0}")]
    NotFound(String),

    /// The stored document is not valid JSON or has the wrong shape.
    #[error("preset {id} is malformed: {source}")]
    Parse {
        /// Preset id.
        id: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The document's version has no migration path.
    #[error("preset {id} has schema version {version}; this build reads 1 to {SCHEMA_VERSION}")]
    UnsupportedSchemaVersion {
        /// Preset id.
        id: String,
        /// Version found in the file.
        version: i64,
    },

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] ConfigError),
}

/// Whether `id` has the shape of a generated preset id.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 32 && id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Brings a raw document up to [`SCHEMA_VERSION`].
///
/// A missing `schema_version` is read as version 1.
pub fn migrate(id: &str, mut document: Value) -> Result<Value, PresetError> {
    let unsupported = |version| PresetError::UnsupportedSchemaVersion {
        id: id.to_string(),
        version,
    };
    let Some(object) = document.as_object_mut() else {
        return Err(PresetError::Parse {
            id: id.to_string(),
            source: serde::de::Error::custom("preset document must be a JSON object"),
        });
    };
    let version = match object.get("schema_version") {
        None => 1,
        Some(v) => v.as_i64().ok_or_else(|| unsupported(-1))?,
    };
    if version < 1 || version > i64::from(SCHEMA_VERSION) {
        return Err(unsupported(version));
    }
    for from in version..i64::from(SCHEMA_VERSION) {
        let step = usize::try_from(from - 1)
            .ok()
            .and_then(|i| MIGRATIONS.get(i))
            .ok_or_else(|| unsupported(version))?;
        step(&mut *object);
        debug!(id, from, "migrated preset document");
    }
    object.insert("schema_version".into(), Value::from(SCHEMA_VERSION));
    Ok(document)
}

/// Directory-backed preset storage.
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: PathBuf,
}

impl PresetStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Checks the name and every step's type against `catalog`, then writes
    /// a new preset atomically.
    pub fn save(
        &self,
        catalog: &Catalog,
        name: &str,
        description: &str,
        effects: Vec<EffectStepSpec>,
        metadata: Map<String, Value>,
    ) -> Result<Preset, PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::MissingName);
        }
        if let Some((i, step)) = effects
            .iter()
            .enumerate()
            .find(|(_, step)| !catalog.contains(&step.type_id))
        {
            return Err(PresetError::UnknownEffectType {
                step: i + 1,
                type_id: step.type_id.clone(),
            });
        }

        let preset = Preset {
            id: new_id(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            schema_version: SCHEMA_VERSION,
            effects,
            metadata,
        };
        let body = serde_json::to_vec_pretty(&preset).map_err(|source| PresetError::Parse {
            id: preset.id.clone(),
            source,
        })?;
        paths::ensure_dir(&self.dir)?;
        publish(&self.file(&preset.id), &body)?;
        info!(id = %preset.id, name = %preset.name, steps = preset.effects.len(), "preset saved");
        Ok(preset)
    }

    /// Reads a full preset document.
    pub fn show(&self, id: &str) -> Result<Preset, PresetError> {
        if !is_valid_id(id) {
            return Err(PresetError::InvalidId(id.to_string()));
        }
        let path = self.file(id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PresetError::NotFound(id.to_string()));
            }
            Err(e) => return Err(ConfigError::read_file(&path, e).into()),
        };
        parse_document(id, &text)
    }

    /// Returns the stored steps unchanged.
    pub fn load(&self, id: &str) -> Result<Vec<EffectStepSpec>, PresetError> {
        Ok(self.show(id)?.effects)
    }

    /// Summaries of every readable preset, newest first.
    pub fn list(&self) -> Result<Vec<PresetSummary>, PresetError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ConfigError::read_file(&self.dir, e).into()),
        };

        let mut summaries = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let parsed = fs::read_to_string(&path)
                .map_err(|e| PresetError::from(ConfigError::read_file(&path, e)))
                .and_then(|text| parse_document(id, &text));
            match parsed {
                Ok(preset) => summaries.push(PresetSummary::from(&preset)),
                Err(err) => warn!(path = %path.display(), %err, "skipping unreadable preset"),
            }
        }
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    /// Removes a preset.
    pub fn delete(&self, id: &str) -> Result<(), PresetError> {
        if !is_valid_id(id) {
            return Err(PresetError::InvalidId(id.to_string()));
        }
        let path = self.file(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(id, "preset deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PresetError::NotFound(id.to_string()))
            }
            Err(e) => Err(ConfigError::write_file(&path, e).into()),
        }
    }
}

fn parse_document(id: &str, text: &str) -> Result<Preset, PresetError> {
    let parse = |source| PresetError::Parse {
        id: id.to_string(),
        source,
    };
    let raw: Value = serde_json::from_str(text).map_err(parse)?;
    let current = migrate(id, raw)?;
    let preset: Preset = serde_json::from_value(current).map_err(parse)?;
    // The file name is the lookup key.
    if preset.id != id {
        return Err(parse(serde::de::Error::custom(format!(
            "document id {} does not match file name",
            preset.id
        ))));
    }
    Ok(preset)
}

fn publish(path: &Path, bytes: &[u8]) -> Result<(), ConfigError> {
    pedalchain_io::write_atomic(path, bytes).map_err(|err| {
        let source = match err {
            pedalchain_io::Error::Io(source) => source,
            other => std::io::Error::other(other),
        };
        ConfigError::write_file(path, source)
    })
}
