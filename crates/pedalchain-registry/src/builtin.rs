//! Built-in effect catalog.

use pedalchain_dsp::Quality;
use pedalchain_dsp::effects::LadderMode;

use crate::descriptor::{EffectFamily, EffectTypeDescriptor, NativeEffect};
use crate::schema::ParamSpec;

/// Canonical identifier of the external plugin host.
pub const PLUGIN_HOST_TYPE_ID: &str = "vst3";
/// Canonical identifier of the convolution effect.
pub const CONVOLUTION_TYPE_ID: &str = "convolution";

fn native(
    type_id: &str,
    name: &str,
    description: &str,
    effect: NativeEffect,
) -> EffectTypeDescriptor {
    EffectTypeDescriptor::new(type_id, name, description, EffectFamily::Native(effect))
}

fn cutoff(default: f64) -> ParamSpec {
    ParamSpec::float("cutoff_frequency_hz", 20.0, 20000.0, default).help("Corner frequency in Hz")
}

fn eq_gain() -> ParamSpec {
    ParamSpec::float("gain_db", -60.0, 60.0, 0.0).help("Boost or cut in dB")
}

fn eq_q() -> ParamSpec {
    ParamSpec::float("q", 0.1, 10.0, 0.7071).help("Filter Q")
}

fn mix(default: f64) -> ParamSpec {
    ParamSpec::float("mix", 0.0, 1.0, default).help("Wet/dry balance")
}

fn quality() -> ParamSpec {
    let names: Vec<&str> = Quality::ALL.iter().map(|q| q.name()).collect();
    ParamSpec::enumeration("quality", &names, Quality::WindowedSinc.name())
        .help("Resampling interpolation")
}

/// Native effects plus convolution, whose impulse choices are `impulses`.
pub fn builtin_descriptors(impulses: &[String]) -> Vec<EffectTypeDescriptor> {
    use NativeEffect as N;

    let ladder_modes: Vec<&str> = LadderMode::ALL.iter().map(|m| m.name()).collect();

    vec![
        native("reverb", "Reverb", "Freeverb-style room reverb", N::Reverb)
            .param(ParamSpec::float("room_size", 0.0, 1.0, 0.5).help("Room size"))
            .param(ParamSpec::float("damping", 0.0, 1.0, 0.5).help("High-frequency damping"))
            .param(ParamSpec::float("wet_level", 0.0, 1.0, 0.33).help("Reverberant level"))
            .param(ParamSpec::float("dry_level", 0.0, 1.0, 0.4).help("Direct level"))
            .param(ParamSpec::float("width", 0.0, 1.0, 1.0).help("Stereo width"))
            .param(
                ParamSpec::float("freeze_mode", 0.0, 1.0, 0.0)
                    .help("Sustain the tail at 0.5 and above"),
            )
            .tags(&["space", "ambience"]),
        native("delay", "Delay", "Feedback echo", N::Delay)
            .param(ParamSpec::float("delay_seconds", 0.0, 2.0, 0.5).help("Echo time in seconds"))
            .param(ParamSpec::float("feedback", 0.0, 0.95, 0.0).help("Echo regeneration"))
            .param(mix(0.5))
            .tags(&["time"]),
        native("compressor", "Compressor", "Downward dynamics compressor", N::Compressor)
            .param(ParamSpec::float("threshold_db", -60.0, 0.0, 0.0).help("Threshold in dBFS"))
            .param(ParamSpec::float("ratio", 1.0, 20.0, 1.0).help("Compression ratio"))
            .param(ParamSpec::float("attack_ms", 0.1, 100.0, 1.0).help("Attack time in ms"))
            .param(ParamSpec::float("release_ms", 1.0, 1000.0, 100.0).help("Release time in ms"))
            .tags(&["dynamics"]),
        native("limiter", "Limiter", "Brickwall peak limiter", N::Limiter)
            .param(ParamSpec::float("threshold_db", -60.0, 0.0, -10.0).help("Ceiling in dBFS"))
            .param(ParamSpec::float("release_ms", 1.0, 1000.0, 100.0).help("Release time in ms"))
            .tags(&["dynamics"]),
        native("gain", "Gain", "Static level change", N::Gain)
            .param(ParamSpec::float("gain_db", -60.0, 60.0, 0.0).help("Gain in dB"))
            .tags(&["utility"]),
        native("distortion", "Distortion", "tanh saturation", N::Distortion)
            .param(ParamSpec::float("drive_db", 0.0, 120.0, 25.0).help("Drive in dB"))
            .tags(&["drive"]),
        native("chorus", "Chorus", "Modulated short delay", N::Chorus)
            .param(ParamSpec::float("rate_hz", 0.0, 10.0, 1.0).help("LFO rate"))
            .param(ParamSpec::float("depth", 0.0, 1.0, 0.25).help("Modulation depth"))
            .param(ParamSpec::float("centre_delay_ms", 1.0, 50.0, 7.0).help("Centre delay in ms"))
            .param(ParamSpec::float("feedback", 0.0, 0.95, 0.0).help("Feedback amount"))
            .param(mix(0.5))
            .tags(&["modulation"]),
        native("phaser", "Phaser", "Swept allpass phaser", N::Phaser)
            .param(ParamSpec::float("rate_hz", 0.0, 10.0, 1.0).help("LFO rate"))
            .param(ParamSpec::float("depth", 0.0, 1.0, 0.5).help("Sweep depth"))
            .param(
                ParamSpec::float("centre_frequency_hz", 20.0, 8000.0, 1300.0)
                    .help("Sweep centre in Hz"),
            )
            .param(ParamSpec::float("feedback", 0.0, 0.95, 0.0).help("Feedback amount"))
            .param(mix(0.5))
            .tags(&["modulation"]),
        native("bitcrush", "Bitcrush", "Amplitude requantization", N::Bitcrush)
            .param(ParamSpec::float("bit_depth", 1.0, 32.0, 8.0).help("Resolution in bits"))
            .tags(&["lofi"]),
        native("highpass", "High-pass Filter", "Removes content below the cutoff", N::Highpass)
            .param(cutoff(50.0))
            .tags(&["filter"])
            .aliases(&["highpassfilter"]),
        native("lowpass", "Low-pass Filter", "Removes content above the cutoff", N::Lowpass)
            .param(cutoff(5000.0))
            .tags(&["filter"])
            .aliases(&["lowpassfilter"]),
        native("ladderfilter", "Ladder Filter", "Resonant four-pole ladder", N::LadderFilter)
            .param(
                ParamSpec::enumeration("mode", &ladder_modes, LadderMode::Lpf12.name())
                    .help("Filter response"),
            )
            .param(ParamSpec::float("cutoff_hz", 20.0, 20000.0, 200.0).help("Cutoff in Hz"))
            .param(ParamSpec::float("resonance", 0.0, 1.0, 0.0).help("Resonance"))
            .param(ParamSpec::float("drive", 1.0, 10.0, 1.0).help("Input drive"))
            .tags(&["filter"]),
        native("highshelf", "High Shelf", "Boost or cut above the corner", N::HighShelf)
            .param(cutoff(1000.0))
            .param(eq_gain())
            .param(eq_q())
            .tags(&["filter", "eq"])
            .aliases(&["highshelffilter"]),
        native("lowshelf", "Low Shelf", "Boost or cut below the corner", N::LowShelf)
            .param(cutoff(300.0))
            .param(eq_gain())
            .param(eq_q())
            .tags(&["filter", "eq"])
            .aliases(&["lowshelffilter"]),
        native("peakfilter", "Peak Filter", "Bell boost or cut", N::PeakFilter)
            .param(cutoff(440.0))
            .param(eq_gain())
            .param(eq_q())
            .tags(&["filter", "eq"]),
        native("pitchshift", "Pitch Shift", "Transpose without changing duration", N::PitchShift)
            .param(
                ParamSpec::float("semitones", -24.0, 24.0, 0.0)
                    .help("Transposition in semitones"),
            )
            .tags(&["pitch"]),
        native("clipping", "Clipping", "Hard clipper", N::Clipping)
            .param(ParamSpec::float("threshold_db", -60.0, 0.0, -6.0).help("Clip level in dBFS"))
            .tags(&["drive"]),
        native("invert", "Invert", "Flip polarity", N::Invert).tags(&["utility"]),
        native("mp3compressor", "MP3 Compressor", "MP3 codec character", N::Mp3Compressor)
            .param(ParamSpec::float("vbr_quality", 0.0, 9.9, 2.0).help("0 is best, 9.9 is worst"))
            .tags(&["lofi"])
            .notes("Emulates band-limiting and requantization; no encoder is run."),
        native("resample", "Resample", "Change the sample rate", N::Resample)
            .param(
                ParamSpec::float("target_sample_rate", 4000.0, 192000.0, 8000.0)
                    .help("Output rate in Hz"),
            )
            .param(quality())
            .tags(&["lofi", "utility"])
            .notes("Downstream effects and the output file use the new rate."),
        native("noisegate", "Noise Gate", "Attenuate signal below a threshold", N::NoiseGate)
            .param(
                ParamSpec::float("threshold_db", -100.0, 0.0, -40.0)
                    .help("Gate threshold in dBFS"),
            )
            .param(ParamSpec::float("ratio", 1.0, 20.0, 10.0).help("Expansion ratio"))
            .param(ParamSpec::float("attack_ms", 0.0, 100.0, 1.0).help("Attack time in ms"))
            .param(ParamSpec::float("release_ms", 1.0, 1000.0, 100.0).help("Release time in ms"))
            .tags(&["dynamics"])
            .aliases(&["gate"]),
        native(
            "gsmfullratecompressor",
            "GSM Full Rate",
            "Telephone codec character",
            N::GsmFullRateCompressor,
        )
        .param(quality())
        .tags(&["lofi"])
        .notes("Round trip through 8 kHz with telephone band-limiting."),
        EffectTypeDescriptor::new(
            CONVOLUTION_TYPE_ID,
            "Convolution",
            "Impulse-response convolution",
            EffectFamily::Convolution,
        )
        .param(
            ParamSpec::file("impulse_response", impulses.to_vec())
                .required()
                .help("Impulse response file from the impulses directory"),
        )
        .param(mix(1.0))
        .tags(&["space"])
        .notes("Add impulse responses to the impulses directory to make them selectable."),
    ]
}

/// The external plugin host entry.
pub fn plugin_host_descriptor() -> EffectTypeDescriptor {
    EffectTypeDescriptor::new(
        PLUGIN_HOST_TYPE_ID,
        "VST3 Plugin",
        "Host an external VST3 plugin",
        EffectFamily::ExternalPlugin,
    )
    .param(
        ParamSpec::string("plugin_path")
            .required()
            .help("Plugin bundle, relative to the plugins directory"),
    )
    .param(ParamSpec::string("plugin_name").help("Sub-plugin to load from a multi-plugin bundle"))
    .param(
        ParamSpec::float("initialization_timeout", 1.0, 120.0, 10.0)
            .help("Seconds to wait for the plugin to load"),
    )
    .param(ParamSpec::mapping("parameter_values").help("Plugin parameter overrides by name"))
    .tags(&["external"])
    .aliases(&["vst3plugin", "vst3_plugin"])
    .notes("Requires compatible plugin binaries installed on the host.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identifiers_are_unique() {
        let mut all = builtin_descriptors(&[]);
        all.push(plugin_host_descriptor());
        let mut seen = HashSet::new();
        for descriptor in &all {
            for id in descriptor.identifiers() {
                assert!(seen.insert(id.clone()), "duplicate identifier {id}");
            }
        }
    }

    #[test]
    fn every_default_is_legal() {
        let mut all = builtin_descriptors(&["room.wav".to_string()]);
        all.push(plugin_host_descriptor());
        for descriptor in &all {
            for spec in &descriptor.params {
                assert!(
                    spec.check_default().is_ok(),
                    "{}.{}: {:?}",
                    descriptor.type_id,
                    spec.name,
                    spec.check_default()
                );
            }
        }
    }

    #[test]
    fn convolution_lists_impulses() {
        let impulses = vec!["hall.wav".to_string(), "plate.flac".to_string()];
        let all = builtin_descriptors(&impulses);
        let conv = all.iter().find(|d| d.type_id == CONVOLUTION_TYPE_ID).unwrap();
        let spec = conv.param_spec("impulse_response").unwrap();
        assert_eq!(spec.allowed_values, impulses);
        assert!(spec.required);
        assert!(spec.default.is_none());
    }
}
