//! Integration tests for the `pedalchain` binary.
//!
//! Each test points the binary at its own settings file through
//! `PEDALCHAIN_CONFIG`, so directories never leak between tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

struct Deployment {
    dir: TempDir,
}

impl Deployment {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["impulses", "plugins", "presets"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
        }
        let settings = format!(
            "impulse_dir = {:?}\nplugin_dir = {:?}\npreset_dir = {:?}\n",
            dir.path().join("impulses").display().to_string(),
            dir.path().join("plugins").display().to_string(),
            dir.path().join("presets").display().to_string(),
        );
        std::fs::write(dir.path().join("pedalchain.toml"), settings).unwrap();
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pedalchain"))
            .args(args)
            .env("PEDALCHAIN_CONFIG", self.path("pedalchain.toml"))
            .env("RUST_LOG", "warn")
            .output()
            .expect("failed to run pedalchain")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_wav(path: &Path, frames: usize) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22_050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        writer.write_sample((((i * 41) % 1600) as i16 - 800) * 10).unwrap();
    }
    writer.finalize().unwrap();
}

fn wav_samples(path: &Path) -> Vec<i32> {
    let mut reader = hound::WavReader::open(path).unwrap();
    reader.samples::<i32>().map(Result::unwrap).collect()
}

// ---------------------------------------------------------------------------
// pedalchain effects
// ---------------------------------------------------------------------------

#[test]
fn effects_lists_catalog() {
    let env = Deployment::new();
    let output = env.run(&["effects"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Available Effects"));
    for id in ["reverb", "gain", "highpass", "convolution", "resample"] {
        assert!(text.contains(id), "listing should contain '{id}'");
    }
}

#[test]
fn effects_json_is_keyed_by_type() {
    let env = Deployment::new();
    let output = env.run(&["effects", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let listing: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let gain = &listing["gain"]["params"]["gain_db"];
    assert_eq!(gain["kind"], "float");
    assert_eq!(gain["min"], -60.0);
    assert_eq!(gain["max"], 60.0);
}

#[test]
fn effect_detail_resolves_alias() {
    let env = Deployment::new();
    let output = env.run(&["effects", "HighPassFilter"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("cutoff_frequency_hz"));
}

#[test]
fn unknown_effect_detail_fails() {
    let env = Deployment::new();
    let output = env.run(&["effects", "wah"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown effect type 'wah'"));
}

// ---------------------------------------------------------------------------
// pedalchain process
// ---------------------------------------------------------------------------

#[test]
fn process_inline_chain_writes_output() {
    let env = Deployment::new();
    let input = env.path("in.wav");
    let output_path = env.path("out.wav");
    write_wav(&input, 2048);

    let output = env.run(&[
        "process",
        input.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "--chain",
        r#"[{"type": "invert"}]"#,
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("out.wav"));

    let original = wav_samples(&input);
    let inverted = wav_samples(&output_path);
    assert_eq!(original.len(), inverted.len());
    for (a, b) in original.iter().zip(&inverted) {
        assert!((a + b).abs() <= 1, "{a} vs {b}");
    }
}

#[test]
fn process_chain_file() {
    let env = Deployment::new();
    let input = env.path("in.wav");
    write_wav(&input, 1024);
    let chain_file = env.path("chain.json");
    std::fs::write(
        &chain_file,
        r#"{"effects": [{"type": "gain", "params": {"gain_db": -6}}]}"#,
    )
    .unwrap();

    let output = env.run(&[
        "process",
        input.to_str().unwrap(),
        "--chain",
        chain_file.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(env.path("in_processed.wav").is_file());
}

#[test]
fn process_reports_kind_and_step() {
    let env = Deployment::new();
    let input = env.path("in.wav");
    write_wav(&input, 256);

    let output = env.run(&[
        "process",
        input.to_str().unwrap(),
        "--chain",
        r#"[{"type": "gain"}, {"type": "chorus", "params": {"depth": 1.5}}]"#,
    ]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error[out_of_range] at step 2"), "{err}");
    assert!(err.contains("depth must be between 0 and 1, got 1.5"), "{err}");
    assert!(!env.path("in_processed.wav").exists());
}

#[test]
fn process_rejects_unencodable_format() {
    let env = Deployment::new();
    let input = env.path("in.wav");
    write_wav(&input, 256);

    let output = env.run(&[
        "process",
        input.to_str().unwrap(),
        "--chain",
        "[]",
        "--format",
        "mp3",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("error[encode_error]"), "{}", stderr(&output));
}

#[test]
fn process_requires_a_chain_source() {
    let env = Deployment::new();
    let input = env.path("in.wav");
    write_wav(&input, 256);

    let output = env.run(&["process", input.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn batch_writes_every_input_to_out_dir() {
    let env = Deployment::new();
    let inputs: Vec<PathBuf> = ["a.wav", "b.wav", "c.wav"]
        .iter()
        .map(|name| {
            let path = env.path(name);
            write_wav(&path, 512);
            path
        })
        .collect();
    let out_dir = env.path("rendered");

    let mut args = vec!["process"];
    args.extend(inputs.iter().map(|p| p.to_str().unwrap()));
    args.extend([
        "--out-dir",
        out_dir.to_str().unwrap(),
        "--chain",
        r#"[{"type": "lowpass"}]"#,
    ]);
    let output = env.run(&args);
    assert!(output.status.success(), "{}", stderr(&output));

    for name in ["a.wav", "b.wav", "c.wav"] {
        assert!(out_dir.join(name).is_file(), "{name} missing");
    }
}

#[test]
fn colliding_out_dir_names_are_rejected() {
    let env = Deployment::new();
    std::fs::create_dir_all(env.path("a")).unwrap();
    std::fs::create_dir_all(env.path("b")).unwrap();
    let a = env.path("a/take.wav");
    let b = env.path("b/take.wav");
    write_wav(&a, 64);
    write_wav(&b, 64);
    let out_dir = env.path("rendered");

    let output = env.run(&[
        "process",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--out-dir",
        out_dir.to_str().unwrap(),
        "--chain",
        r#"[{"type": "gain"}]"#,
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("would both be written to"), "{}", stderr(&output));
    assert!(!out_dir.exists());
}

#[test]
fn batch_with_single_output_is_rejected() {
    let env = Deployment::new();
    let a = env.path("a.wav");
    let b = env.path("b.wav");
    write_wav(&a, 64);
    write_wav(&b, 64);

    let output = env.run(&[
        "process",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "-o",
        env.path("out.wav").to_str().unwrap(),
        "--chain",
        "[]",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--out-dir"));
}

// ---------------------------------------------------------------------------
// pedalchain presets
// ---------------------------------------------------------------------------

#[test]
fn preset_lifecycle() {
    let env = Deployment::new();

    let saved = env.run(&[
        "presets",
        "save",
        "--name",
        "Radio",
        "--description",
        "thin and crunchy",
        "--chain",
        r#"[{"type": "highpass", "params": {"cutoff_frequency_hz": 400}}, {"type": "bitcrush"}]"#,
    ]);
    assert!(saved.status.success(), "{}", stderr(&saved));
    let id = stdout(&saved).trim().to_string();
    assert_eq!(id.len(), 32);

    let listed = env.run(&["presets", "list", "--json"]);
    assert!(listed.status.success());
    let summaries: serde_json::Value = serde_json::from_str(&stdout(&listed)).unwrap();
    assert_eq!(summaries[0]["id"], id.as_str());
    assert_eq!(summaries[0]["name"], "Radio");
    assert_eq!(summaries[0]["effects_count"], 2);

    let shown = env.run(&["presets", "show", &id]);
    assert!(shown.status.success());
    let document: serde_json::Value = serde_json::from_str(&stdout(&shown)).unwrap();
    assert_eq!(document["effects"][0]["type"], "highpass");
    assert_eq!(document["schema_version"], 1);

    let input = env.path("in.wav");
    write_wav(&input, 512);
    let processed = env.run(&["process", input.to_str().unwrap(), "--preset", &id]);
    assert!(processed.status.success(), "{}", stderr(&processed));

    let deleted = env.run(&["presets", "delete", &id]);
    assert!(deleted.status.success());
    let missing = env.run(&["presets", "show", &id]);
    assert!(!missing.status.success());
    assert!(stderr(&missing).contains("error[preset_not_found]"));
}

#[test]
fn preset_save_rejects_unknown_type() {
    let env = Deployment::new();
    let output = env.run(&[
        "presets",
        "save",
        "--name",
        "Broken",
        "--chain",
        r#"[{"type": "gain"}, {"type": "wah"}]"#,
    ]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("error[unknown_effect_type] at step 2"),
        "{}",
        stderr(&output)
    );
}

// ---------------------------------------------------------------------------
// pedalchain impulses
// ---------------------------------------------------------------------------

#[test]
fn impulses_lists_scanned_files() {
    let env = Deployment::new();
    write_wav(&env.path("impulses/hall.wav"), 64);
    std::fs::write(env.path("impulses/readme.txt"), "not audio").unwrap();

    let output = env.run(&["impulses", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let names: Vec<String> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(names, vec!["hall.wav".to_string()]);
}
