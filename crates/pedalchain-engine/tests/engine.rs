//! End-to-end processing through the engine facade.

mod common;

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{Sandbox, read_wav, test_signal, write_wav};
use pedalchain_config::EffectStepSpec;
use pedalchain_engine::{BatchJob, Engine, ErrorKind, UnavailableLoader};
use serde_json::json;

fn engine_with(settings: pedalchain_config::Settings) -> Engine {
    Engine::new(settings, Arc::new(UnavailableLoader)).unwrap()
}

fn source(sandbox: &Sandbox) -> std::path::PathBuf {
    let path = sandbox.path("in.wav");
    write_wav(&path, &test_signal(4096), 2, 44100);
    path
}

#[test]
fn empty_chain_round_trip_is_sample_exact() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let input = source(&sandbox);

    let output = engine
        .build_and_run(&input, &[], None, &sandbox.path("out/copy.wav"))
        .unwrap();

    assert_eq!(output, sandbox.path("out/copy.wav"));
    let (in_spec, in_samples) = read_wav(&input);
    let (out_spec, out_samples) = read_wav(&output);
    assert_eq!(in_spec, out_spec);
    assert_eq!(in_samples, out_samples);
}

#[test]
fn processing_is_deterministic() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let input = fs::read(source(&sandbox)).unwrap();
    let chain = [
        EffectStepSpec::new("chorus").with_param("depth", 0.4),
        EffectStepSpec::new("compressor")
            .with_param("threshold_db", -20)
            .with_param("ratio", 4),
        EffectStepSpec::new("reverb").with_param("room_size", 0.8),
        EffectStepSpec::new("pitchshift").with_param("semitones", 3),
    ];

    let first = engine
        .process_bytes(&input, Some(pedalchain_io::AudioFormat::Wav), &chain, None)
        .unwrap();
    let second = engine
        .process_bytes(&input, Some(pedalchain_io::AudioFormat::Wav), &chain, None)
        .unwrap();
    assert_eq!(first, second);
    assert_ne!(first, input);
}

#[test]
fn target_format_replaces_extension() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let input = source(&sandbox);

    let output = engine
        .build_and_run(&input, &[], Some("WAV"), &sandbox.path("renders/take.dat"))
        .unwrap();
    assert_eq!(output, sandbox.path("renders/take.wav"));
    assert!(output.is_file());
}

#[test]
fn unsupported_target_is_encode_error() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let input = source(&sandbox);

    for target in ["mp3", "aiff"] {
        let err = engine
            .build_and_run(&input, &[], Some(target), &sandbox.path("out.wav"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodeError, "{target}: {err}");
        assert_eq!(err.step(), None);
    }
    assert!(!sandbox.path("out.wav").exists());
}

#[test]
fn flac_source_without_target_is_written_as_flac() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());

    let wav = source(&sandbox);
    let decoded = pedalchain_io::decode_file(&wav).unwrap();
    let flac = pedalchain_io::encode(
        &decoded.buffer,
        pedalchain_io::AudioFormat::Flac,
        pedalchain_io::WavEncoding::PCM16,
    )
    .unwrap();
    let input = sandbox.path("take.flac");
    fs::write(&input, flac).unwrap();

    let output = engine
        .build_and_run(
            &input,
            &[EffectStepSpec::new("gain").with_param("gain_db", -6)],
            None,
            &sandbox.path("out/take_processed.flac"),
        )
        .unwrap();
    assert_eq!(output, sandbox.path("out/take_processed.flac"));

    let rendered = pedalchain_io::decode_file(&output).unwrap();
    assert_eq!(rendered.format, Some(pedalchain_io::AudioFormat::Flac));
    assert_eq!(rendered.bits_per_sample, Some(16));
    assert_eq!(rendered.buffer.num_channels(), 2);
    assert_eq!(rendered.buffer.num_frames(), decoded.buffer.num_frames());
    assert!(rendered.buffer.peak() < decoded.buffer.peak() * 0.6);
}

#[test]
fn unencodable_source_format_fails_before_reading() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());

    // The file does not exist: the format check must come first.
    let err = engine
        .build_and_run(
            &sandbox.path("take.mp3"),
            &[EffectStepSpec::new("gain")],
            None,
            &sandbox.path("out/take.mp3"),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EncodeError, "{err}");
    assert!(err.to_string().contains("supported output: wav, flac"), "{err}");

    let output = engine
        .build_and_run(&source(&sandbox), &[], Some("flac"), &sandbox.path("out/take.mp3"))
        .unwrap();
    assert_eq!(output, sandbox.path("out/take.flac"));
}

#[test]
fn corrupt_source_is_decode_error_and_writes_nothing() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let input = sandbox.path("broken.wav");
    fs::write(&input, b"RIFF\x00\x00\x00\x00WAVEnot really").unwrap();

    let out = sandbox.path("out/broken.wav");
    let err = engine
        .build_and_run(&input, &[EffectStepSpec::new("gain")], None, &out)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeError);
    assert!(!out.exists());
}

#[test]
fn chain_errors_come_before_decoding() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let input = sandbox.path("broken.wav");
    fs::write(&input, b"garbage").unwrap();

    let err = engine
        .build_and_run(
            &input,
            &[EffectStepSpec::new("gain").with_param("bogus_key", 1)],
            None,
            &sandbox.path("x.wav"),
        )
        .unwrap_err();
    let report = serde_json::to_value(err.report()).unwrap();
    assert_eq!(report["kind"], "unknown_parameter");
    assert_eq!(report["step"], 1);
}

#[test]
fn bit_depth_setting_controls_output() {
    let sandbox = Sandbox::new();
    let mut settings = sandbox.settings();
    settings.output.bit_depth = Some(24);
    let engine = engine_with(settings);
    let input = source(&sandbox);

    let output = engine
        .build_and_run(&input, &[], None, &sandbox.path("deep.wav"))
        .unwrap();
    let (spec, samples) = read_wav(&output);
    assert_eq!(spec.bits_per_sample, 24);
    let (_, original) = read_wav(&input);
    let rescaled: Vec<i32> = original.iter().map(|s| s << 8).collect();
    assert_eq!(samples, rescaled);
}

#[test]
fn resample_step_changes_output_rate() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let input = source(&sandbox);

    let chain = [EffectStepSpec::new("resample").with_param("target_sample_rate", 22050)];
    let output = engine
        .build_and_run(&input, &chain, None, &sandbox.path("half.wav"))
        .unwrap();
    let (spec, samples) = read_wav(&output);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.channels, 2);
    assert_eq!(samples.len(), 2 * 2048);
}

#[test]
fn preset_validation_is_deferred_to_build() {
    let sandbox = Sandbox::new();
    fs::create_dir(sandbox.path("plugins/Amp.vst3")).unwrap();

    let mut enabled = sandbox.settings();
    enabled.plugins.enabled = true;
    let saved = engine_with(enabled)
        .save_preset(
            "amp",
            "",
            vec![
                EffectStepSpec::new("gain"),
                EffectStepSpec::new("vst3").with_param("plugin_path", "Amp.vst3"),
            ],
            None,
        )
        .unwrap();

    let disabled = engine_with(sandbox.settings());
    let chain = disabled.load_preset(&saved.id).unwrap();
    assert_eq!(chain.len(), 2);

    let err = disabled.build_chain(&chain).unwrap_err();
    assert_eq!(err.step, 2);
    assert_eq!(err.source.kind(), ErrorKind::UnknownEffectType);
}

#[test]
fn saving_unknown_type_writes_nothing() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let err = engine
        .save_preset("x", "", vec![EffectStepSpec::new("flanger")], None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownEffectType);
    assert_eq!(err.step(), Some(1));
    assert_eq!(fs::read_dir(sandbox.path("presets")).unwrap().count(), 0);
}

#[test]
fn preset_lifecycle() {
    let sandbox = Sandbox::new();
    let engine = engine_with(sandbox.settings());
    let mut metadata = serde_json::Map::new();
    metadata.insert("source".into(), json!("test"));
    let saved = engine
        .save_preset("warm", "tape-ish", vec![EffectStepSpec::new("lowpass")], Some(metadata))
        .unwrap();

    let listed = engine.list_presets().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, saved.id);
    assert_eq!(engine.show_preset(&saved.id).unwrap().metadata["source"], "test");

    engine.delete_preset(&saved.id).unwrap();
    assert_eq!(engine.load_preset(&saved.id).unwrap_err().kind(), ErrorKind::PresetNotFound);
}

#[test]
fn batch_results_keep_job_order() {
    let sandbox = Sandbox::new();
    let mut settings = sandbox.settings();
    settings.workers = Some(3);
    let engine = engine_with(settings);
    let input = source(&sandbox);

    let jobs: Vec<BatchJob> = (0..6)
        .map(|i| BatchJob {
            source: if i == 4 { sandbox.path("missing.wav") } else { input.clone() },
            output: sandbox.path(&format!("batch/{i}.wav")),
            chain: vec![EffectStepSpec::new("gain").with_param("gain_db", -(i as f64))],
            target_format: None,
        })
        .collect();

    let done = AtomicUsize::new(0);
    let results = engine.run_batch(&jobs, |_, _| {
        done.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(done.load(Ordering::SeqCst), 6);
    assert_eq!(results.len(), 6);
    for (i, result) in results.iter().enumerate() {
        if i == 4 {
            assert_eq!(result.as_ref().unwrap_err().kind(), ErrorKind::IoError);
        } else {
            assert_eq!(result.as_ref().unwrap(), &sandbox.path(&format!("batch/{i}.wav")));
        }
    }
}

#[test]
fn impulse_refresh_respects_interval() {
    let sandbox = Sandbox::new();
    let mut settings = sandbox.settings();
    settings.impulse_rescan_interval_secs = 3600;
    let engine = engine_with(settings);

    write_wav(&sandbox.path("impulses/new.wav"), &test_signal(8), 2, 44100);
    assert!(!engine.refresh_impulses());
    assert!(engine.impulse_responses().is_empty());

    let mut settings = sandbox.settings();
    settings.impulse_rescan_interval_secs = 0;
    let engine = engine_with(settings);
    assert_eq!(engine.impulse_responses(), ["new.wav"]);
    assert!(engine.refresh_impulses());
}

#[test]
fn listing_reflects_plugin_flag() {
    let sandbox = Sandbox::new();
    let listing = engine_with(sandbox.settings()).available_effects();
    assert!(listing.get("vst3").is_none());
    assert!(listing.get("reverb").is_some());

    let mut settings = sandbox.settings();
    settings.plugins.enabled = true;
    let listing = engine_with(settings).available_effects();
    assert_eq!(listing["vst3"]["params"]["plugin_path"]["required"], true);
}
