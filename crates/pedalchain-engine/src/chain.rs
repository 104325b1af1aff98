//! Chain building: lookup, validate, instantiate, in order.

use std::fmt;

use pedalchain_config::{EffectStepSpec, validate};
use pedalchain_dsp::AudioBuffer;
use pedalchain_registry::Catalog;
use tracing::{debug, info};

use crate::error::{ChainBuildError, StepError};
use crate::instantiate::{ConstructedEffect, Instantiate};

/// Ordered, fully constructed effects for one request.
pub struct ConstructedChain {
    effects: Vec<ConstructedEffect>,
    spec_len: usize,
}

impl ConstructedChain {
    /// Number of constructed effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether the chain is a no-op.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Number of steps in the request this chain was built from.
    pub fn spec_len(&self) -> usize {
        self.spec_len
    }

    /// Runs every effect over `buffer`, first to last.
    pub fn apply(&mut self, buffer: &mut AudioBuffer) {
        for effect in &mut self.effects {
            effect.process(buffer);
        }
    }
}

impl fmt::Debug for ConstructedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructedChain")
            .field("effects", &self.effects.len())
            .field("spec_len", &self.spec_len)
            .finish()
    }
}

/// Builds chains against one catalog snapshot.
pub struct ChainBuilder<'a, I: Instantiate + ?Sized> {
    catalog: &'a Catalog,
    instantiator: &'a I,
}

impl<'a, I: Instantiate + ?Sized> ChainBuilder<'a, I> {
    /// A builder resolving types in `catalog`.
    pub fn new(catalog: &'a Catalog, instantiator: &'a I) -> Self {
        Self { catalog, instantiator }
    }

    /// Builds the chain, stopping at the first failing step.
    ///
    /// No effect is constructed for any step after the failing one, and
    /// effects already constructed are dropped.
    pub fn build(&self, spec: &[EffectStepSpec]) -> Result<ConstructedChain, ChainBuildError> {
        let mut effects = Vec::with_capacity(spec.len());
        for (i, step) in spec.iter().enumerate() {
            let effect = self.build_step(step).map_err(|source| ChainBuildError {
                step: i + 1,
                type_id: step.type_id.clone(),
                source,
            })?;
            debug!(step = i + 1, type_id = %step.type_id, "constructed effect");
            effects.push(effect);
        }
        info!(steps = effects.len(), "chain built");
        Ok(ConstructedChain {
            effects,
            spec_len: spec.len(),
        })
    }

    fn build_step(&self, step: &EffectStepSpec) -> Result<ConstructedEffect, StepError> {
        let descriptor = self.catalog.lookup(&step.type_id)?;
        let params = validate(descriptor, &step.params)?;
        Ok(self.instantiator.instantiate(descriptor, &params, self.catalog)?)
    }
}
