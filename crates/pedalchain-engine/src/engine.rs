//! Engine facade: the operations an outer API layer calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pedalchain_config::{EffectStepSpec, Preset, PresetStore, PresetSummary, Settings};
use pedalchain_io::{AudioFormat, write_atomic};
use pedalchain_registry::{Catalog, EffectRegistry, RegistryOptions};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::chain::{ChainBuilder, ConstructedChain};
use crate::error::{ChainBuildError, EngineError, ProcessingError};
use crate::instantiate::Instantiator;
use crate::pipeline;
use crate::plugin::{PluginLoader, PluginPolicy};

/// One independent unit of batch work.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Source audio file.
    pub source: PathBuf,
    /// Output path; its extension is replaced when `target_format` is set.
    pub output: PathBuf,
    /// Steps to apply.
    pub chain: Vec<EffectStepSpec>,
    /// Requested output format name.
    pub target_format: Option<String>,
}

/// Registry, instantiator and preset store behind one handle.
///
/// `Engine` is `Sync`; independent requests may run on separate threads.
pub struct Engine {
    settings: Settings,
    registry: EffectRegistry,
    instantiator: Instantiator,
    presets: PresetStore,
}

impl Engine {
    /// Scans impulses, checks built-in defaults and opens the preset store.
    pub fn new(settings: Settings, loader: Arc<dyn PluginLoader>) -> Result<Self, EngineError> {
        settings.validate()?;
        let registry = EffectRegistry::new(RegistryOptions {
            impulse_dir: settings.impulse_dir.clone(),
            plugins_enabled: settings.plugins.enabled,
            rescan_interval: settings.rescan_interval(),
        });
        registry.snapshot().verify_defaults()?;

        let policy = PluginPolicy {
            plugin_dir: settings.plugin_dir.clone(),
            allow_absolute_paths: settings.plugins.allow_absolute_paths,
            max_init_timeout: settings.max_init_timeout(),
        };
        let instantiator = Instantiator::new(settings.impulse_dir.clone(), policy, loader);
        let presets = PresetStore::new(settings.preset_dir.clone());
        Ok(Self {
            settings,
            registry,
            instantiator,
            presets,
        })
    }

    /// Settings the engine was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.registry.snapshot()
    }

    /// Catalog listing for display.
    pub fn available_effects(&self) -> Value {
        self.registry.snapshot().listing()
    }

    /// Impulse files currently selectable for convolution.
    pub fn impulse_responses(&self) -> Vec<String> {
        self.registry.snapshot().impulse_responses().to_vec()
    }

    /// Rate-limited rescan of the impulse directory.
    pub fn refresh_impulses(&self) -> bool {
        self.registry.refresh_impulses()
    }

    /// Builds a chain against the current snapshot.
    pub fn build_chain(
        &self,
        chain: &[EffectStepSpec],
    ) -> Result<ConstructedChain, ChainBuildError> {
        let catalog = self.registry.snapshot();
        ChainBuilder::new(&catalog, &self.instantiator).build(chain)
    }

    /// Builds `chain` and runs it over in-memory audio.
    pub fn process_bytes(
        &self,
        source: &[u8],
        source_format: Option<AudioFormat>,
        chain: &[EffectStepSpec],
        target_format: Option<&str>,
    ) -> Result<Vec<u8>, EngineError> {
        let target = parse_target(target_format, source_format)?;
        let mut constructed = self.build_chain(chain)?;
        let bytes = pipeline::process(
            source,
            source_format,
            &mut constructed,
            target,
            self.settings.output.bit_depth,
        )?;
        Ok(bytes)
    }

    /// Processes `source` into `output` and returns the path written.
    ///
    /// With a target format the output extension is replaced by the
    /// format's. The output is written to a temporary file in the output
    /// directory and renamed into place only on success.
    pub fn build_and_run(
        &self,
        source: &Path,
        chain: &[EffectStepSpec],
        target_format: Option<&str>,
        output: &Path,
    ) -> Result<PathBuf, EngineError> {
        let target = parse_target(target_format, AudioFormat::from_path(source))?;
        let mut constructed = self.build_chain(chain)?;

        let bytes = std::fs::read(source).map_err(|e| ProcessingError::Io {
            path: source.to_path_buf(),
            source: e.into(),
        })?;
        let rendered = pipeline::process(
            &bytes,
            AudioFormat::from_path(source),
            &mut constructed,
            target,
            self.settings.output.bit_depth,
        )?;

        let output = match target {
            Some(format) => output.with_extension(format.extension()),
            None => output.to_path_buf(),
        };
        write_atomic(&output, &rendered).map_err(|err| ProcessingError::Io {
            path: output.clone(),
            source: err,
        })?;
        info!(
            source = %source.display(),
            output = %output.display(),
            steps = constructed.len(),
            "processed"
        );
        Ok(output)
    }

    /// Runs independent jobs on a bounded set of worker threads.
    ///
    /// Results are returned in job order. `on_done` is called from worker
    /// threads as each job finishes.
    pub fn run_batch<F>(&self, jobs: &[BatchJob], on_done: F) -> Vec<Result<PathBuf, EngineError>>
    where
        F: Fn(usize, &Result<PathBuf, EngineError>) + Sync,
    {
        let workers = self.settings.worker_count().clamp(1, jobs.len().max(1));
        let next = AtomicUsize::new(0);

        let mut finished: Vec<(usize, Result<PathBuf, EngineError>)> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut done = Vec::new();
                        loop {
                            let i = next.fetch_add(1, Ordering::Relaxed);
                            let Some(job) = jobs.get(i) else { break };
                            let result = self.build_and_run(
                                &job.source,
                                &job.chain,
                                job.target_format.as_deref(),
                                &job.output,
                            );
                            if let Err(err) = &result {
                                warn!(source = %job.source.display(), %err, "batch job failed");
                            }
                            on_done(i, &result);
                            done.push((i, result));
                        }
                        done
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(done) => done,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        finished.sort_by_key(|(i, _)| *i);
        finished.into_iter().map(|(_, result)| result).collect()
    }

    /// Saves a chain as a named preset after checking its effect types.
    pub fn save_preset(
        &self,
        name: &str,
        description: &str,
        chain: Vec<EffectStepSpec>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<Preset, EngineError> {
        let catalog = self.registry.snapshot();
        Ok(self
            .presets
            .save(&catalog, name, description, chain, metadata.unwrap_or_default())?)
    }

    /// Stored steps of a preset, not re-validated.
    pub fn load_preset(&self, id: &str) -> Result<Vec<EffectStepSpec>, EngineError> {
        Ok(self.presets.load(id)?)
    }

    /// Full preset document.
    pub fn show_preset(&self, id: &str) -> Result<Preset, EngineError> {
        Ok(self.presets.show(id)?)
    }

    /// Preset summaries, newest first.
    pub fn list_presets(&self) -> Result<Vec<PresetSummary>, EngineError> {
        Ok(self.presets.list()?)
    }

    /// Deletes a preset.
    pub fn delete_preset(&self, id: &str) -> Result<(), EngineError> {
        Ok(self.presets.delete(id)?)
    }
}

/// Resolves the requested output format, rejecting anything that cannot be
/// written before the chain is built or the source decoded.
fn parse_target(
    name: Option<&str>,
    source_format: Option<AudioFormat>,
) -> Result<Option<AudioFormat>, ProcessingError> {
    let Some(name) = name else {
        return match source_format {
            Some(format) if !format.is_encodable() => {
                Err(ProcessingError::unsupported_target(format.extension()))
            }
            _ => Ok(None),
        };
    };
    match AudioFormat::from_name(name) {
        Some(format) if format.is_encodable() => Ok(Some(format)),
        _ => Err(ProcessingError::unsupported_target(name)),
    }
}
