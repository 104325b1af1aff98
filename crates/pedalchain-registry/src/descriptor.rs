//! Effect type descriptors.

use crate::schema::ParamSpec;

/// Native effect operations, one per DSP processor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NativeEffect {
    Reverb,
    Delay,
    Compressor,
    Limiter,
    Gain,
    Distortion,
    Chorus,
    Phaser,
    Bitcrush,
    Highpass,
    Lowpass,
    LadderFilter,
    HighShelf,
    LowShelf,
    PeakFilter,
    PitchShift,
    Clipping,
    Invert,
    Mp3Compressor,
    Resample,
    NoiseGate,
    GsmFullRateCompressor,
}

/// How an effect type is constructed. The instantiator dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectFamily {
    /// Direct mapping onto a DSP processor.
    Native(NativeEffect),
    /// Kernel loaded from the impulse-response directory.
    Convolution,
    /// Externally hosted plugin binary.
    ExternalPlugin,
}

/// Registry entry for one effect type.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTypeDescriptor {
    /// Canonical lowercase identifier.
    pub type_id: String,
    /// Human-readable name.
    pub display_name: String,
    /// One-line description.
    pub description: String,
    /// Parameters, in declaration order.
    pub params: Vec<ParamSpec>,
    /// Category labels.
    pub tags: Vec<String>,
    /// Alternate identifiers (lowercase).
    pub aliases: Vec<String>,
    /// Deployment or usage notes.
    pub notes: Option<String>,
    /// Construction rule.
    pub family: EffectFamily,
}

impl EffectTypeDescriptor {
    /// Starts a descriptor with no parameters.
    pub fn new(type_id: &str, display_name: &str, description: &str, family: EffectFamily) -> Self {
        Self {
            type_id: type_id.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            params: Vec::new(),
            tags: Vec::new(),
            aliases: Vec::new(),
            notes: None,
            family,
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Sets category tags.
    #[must_use]
    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    /// Sets aliases.
    #[must_use]
    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_ascii_lowercase()).collect();
        self
    }

    /// Sets notes.
    #[must_use]
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Looks up a parameter by exact name.
    pub fn param_spec(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Every identifier that resolves to this descriptor, lowercased.
    pub fn identifiers(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.type_id.to_ascii_lowercase()).chain(self.aliases.iter().cloned())
    }
}
