//! Effect construction from validated parameters.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pedalchain_config::ValidatedParams;
use pedalchain_dsp::effects::{
    Bitcrush, BiquadFilter, Chorus, Clipping, Compressor, Convolution, Delay, Distortion,
    FilterShape, Gain, GsmFullRateCompressor, Invert, LadderFilter, LadderMode, Limiter,
    Mp3Compressor, NoiseGate, Phaser, PitchShift, Resample, Reverb, ReverbSettings,
};
use pedalchain_dsp::{Effect, PerChannel, Processor, Quality};
use pedalchain_registry::{Catalog, EffectFamily, EffectTypeDescriptor, NativeEffect};
use tracing::debug;

use crate::error::InstantiationError;
use crate::plugin::{
    PluginEffect, PluginLoadRequest, PluginLoader, PluginPolicy, apply_overrides, load_with_timeout,
};

/// A runnable effect bound to one parameter set, owned by one chain.
pub type ConstructedEffect = Box<dyn Processor>;

/// Builds one effect from a descriptor and its validated parameters.
///
/// `catalog` is the snapshot the chain is being built against.
pub trait Instantiate {
    /// Constructs a fresh effect instance.
    fn instantiate(
        &self,
        descriptor: &EffectTypeDescriptor,
        params: &ValidatedParams,
        catalog: &Catalog,
    ) -> Result<ConstructedEffect, InstantiationError>;
}

/// The standard instantiator: native effects, convolution from the impulse
/// directory, and hosted plugins through a [`PluginLoader`].
#[derive(Clone)]
pub struct Instantiator {
    impulse_dir: PathBuf,
    plugins: PluginPolicy,
    loader: Arc<dyn PluginLoader>,
}

impl Instantiator {
    /// Creates an instantiator.
    pub fn new(
        impulse_dir: impl Into<PathBuf>,
        plugins: PluginPolicy,
        loader: Arc<dyn PluginLoader>,
    ) -> Self {
        Self {
            impulse_dir: impulse_dir.into(),
            plugins,
            loader,
        }
    }

    fn convolution(
        &self,
        params: &ValidatedParams,
        catalog: &Catalog,
    ) -> Result<ConstructedEffect, InstantiationError> {
        let name = params
            .text("impulse_response")
            .ok_or_else(|| InstantiationError::MissingValue("impulse_response".into()))?;
        let not_found = || InstantiationError::ImpulseResponseNotFound { name: name.to_string() };

        if !catalog.impulse_responses().iter().any(|known| known == name) {
            return Err(not_found());
        }
        let dir = self.impulse_dir.canonicalize().map_err(|_| not_found())?;
        let path = dir.join(name).canonicalize().map_err(|_| not_found())?;
        if !path.starts_with(&dir) {
            return Err(not_found());
        }

        let unreadable = |source| InstantiationError::ImpulseResponseUnreadable {
            name: name.to_string(),
            source,
        };
        let decoded = pedalchain_io::decode_file(&path).map_err(unreadable)?;
        if decoded.buffer.is_empty() {
            return Err(unreadable(pedalchain_io::Error::UnsupportedFormat(
                "impulse response holds no samples".into(),
            )));
        }
        debug!(
            impulse = name,
            frames = decoded.buffer.num_frames(),
            channels = decoded.buffer.num_channels(),
            "loaded impulse response"
        );
        Ok(Box::new(Convolution::new(decoded.buffer, number(params, "mix")?)))
    }

    fn plugin(&self, params: &ValidatedParams) -> Result<ConstructedEffect, InstantiationError> {
        let raw = params
            .text("plugin_path")
            .ok_or_else(|| InstantiationError::MissingValue("plugin_path".into()))?;
        let path = self.plugins.resolve(raw)?;
        let requested = params.number("initialization_timeout").unwrap_or(f64::INFINITY);
        let timeout = self
            .plugins
            .effective_timeout(Duration::try_from_secs_f64(requested).unwrap_or(Duration::MAX));

        let request = PluginLoadRequest {
            path,
            plugin_name: params.text("plugin_name").map(str::to_string),
        };
        let mut plugin = load_with_timeout(Arc::clone(&self.loader), request, timeout)?;
        if let Some(overrides) = params.mapping("parameter_values") {
            apply_overrides(plugin.as_mut(), overrides)?;
        }
        Ok(Box::new(PluginEffect::new(plugin)))
    }
}

impl Instantiate for Instantiator {
    fn instantiate(
        &self,
        descriptor: &EffectTypeDescriptor,
        params: &ValidatedParams,
        catalog: &Catalog,
    ) -> Result<ConstructedEffect, InstantiationError> {
        match descriptor.family {
            EffectFamily::Native(effect) => instantiate_native(effect, params),
            EffectFamily::Convolution => self.convolution(params, catalog),
            EffectFamily::ExternalPlugin => self.plugin(params),
        }
    }
}

fn number(params: &ValidatedParams, name: &str) -> Result<f32, InstantiationError> {
    params
        .number(name)
        .map(|v| v as f32)
        .ok_or_else(|| InstantiationError::MissingValue(name.to_string()))
}

fn quality(params: &ValidatedParams) -> Result<Quality, InstantiationError> {
    params
        .text("quality")
        .and_then(Quality::from_name)
        .ok_or_else(|| InstantiationError::MissingValue("quality".into()))
}

fn per_channel<E: Effect + Clone + Send + 'static>(effect: E) -> ConstructedEffect {
    Box::new(PerChannel::new(effect))
}

/// Maps a native family onto its DSP processor.
pub fn instantiate_native(
    effect: NativeEffect,
    params: &ValidatedParams,
) -> Result<ConstructedEffect, InstantiationError> {
    type Built = Result<ConstructedEffect, InstantiationError>;
    let n = |name: &str| number(params, name);
    let shelf = |build: fn(f32, f32) -> FilterShape| -> Built {
        let shape = build(n("gain_db")?, n("q")?);
        Ok(per_channel(BiquadFilter::new(shape, n("cutoff_frequency_hz")?)))
    };

    let constructed: ConstructedEffect = match effect {
        NativeEffect::Reverb => Box::new(Reverb::new(ReverbSettings {
            room_size: n("room_size")?,
            damping: n("damping")?,
            wet_level: n("wet_level")?,
            dry_level: n("dry_level")?,
            width: n("width")?,
            freeze_mode: n("freeze_mode")?,
        })),
        NativeEffect::Delay => {
            per_channel(Delay::new(n("delay_seconds")?, n("feedback")?, n("mix")?))
        }
        NativeEffect::Compressor => per_channel(Compressor::new(
            n("threshold_db")?,
            n("ratio")?,
            n("attack_ms")?,
            n("release_ms")?,
        )),
        NativeEffect::Limiter => per_channel(Limiter::new(n("threshold_db")?, n("release_ms")?)),
        NativeEffect::Gain => per_channel(Gain::new(n("gain_db")?)),
        NativeEffect::Distortion => per_channel(Distortion::new(n("drive_db")?)),
        NativeEffect::Chorus => per_channel(Chorus::new(
            n("rate_hz")?,
            n("depth")?,
            n("centre_delay_ms")?,
            n("feedback")?,
            n("mix")?,
        )),
        NativeEffect::Phaser => per_channel(Phaser::new(
            n("rate_hz")?,
            n("depth")?,
            n("centre_frequency_hz")?,
            n("feedback")?,
            n("mix")?,
        )),
        NativeEffect::Bitcrush => per_channel(Bitcrush::new(n("bit_depth")?)),
        NativeEffect::Highpass => {
            per_channel(BiquadFilter::new(FilterShape::Highpass, n("cutoff_frequency_hz")?))
        }
        NativeEffect::Lowpass => {
            per_channel(BiquadFilter::new(FilterShape::Lowpass, n("cutoff_frequency_hz")?))
        }
        NativeEffect::LadderFilter => {
            let mode = params
                .text("mode")
                .and_then(LadderMode::from_name)
                .ok_or_else(|| InstantiationError::MissingValue("mode".into()))?;
            per_channel(LadderFilter::new(mode, n("cutoff_hz")?, n("resonance")?, n("drive")?))
        }
        NativeEffect::HighShelf => shelf(|gain_db, q| FilterShape::HighShelf { gain_db, q })?,
        NativeEffect::LowShelf => shelf(|gain_db, q| FilterShape::LowShelf { gain_db, q })?,
        NativeEffect::PeakFilter => shelf(|gain_db, q| FilterShape::Peak { gain_db, q })?,
        NativeEffect::PitchShift => per_channel(PitchShift::new(n("semitones")?)),
        NativeEffect::Clipping => per_channel(Clipping::new(n("threshold_db")?)),
        NativeEffect::Invert => per_channel(Invert),
        NativeEffect::Mp3Compressor => per_channel(Mp3Compressor::new(n("vbr_quality")?)),
        NativeEffect::Resample => {
            Box::new(Resample::new(n("target_sample_rate")?, quality(params)?))
        }
        NativeEffect::NoiseGate => per_channel(NoiseGate::new(
            n("threshold_db")?,
            n("ratio")?,
            n("attack_ms")?,
            n("release_ms")?,
        )),
        NativeEffect::GsmFullRateCompressor => {
            Box::new(GsmFullRateCompressor::new(quality(params)?))
        }
    };
    Ok(constructed)
}
