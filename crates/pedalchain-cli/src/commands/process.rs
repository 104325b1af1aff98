//! File processing through an effect chain, single or batch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Args};
use indicatif::{ProgressBar, ProgressStyle};
use pedalchain_config::EffectChainSpec;
use pedalchain_engine::{BatchJob, Engine};

use super::common::{read_chain, report};

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["chain", "preset"])))]
pub struct ProcessArgs {
    /// Input audio files
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output file (single input only)
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory to write outputs into, keeping input file names
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Chain as a JSON file or inline JSON
    #[arg(short, long, value_name = "FILE|JSON")]
    chain: Option<String>,

    /// Stored preset id
    #[arg(short, long, value_name = "ID")]
    preset: Option<String>,

    /// Output format (replaces the output extension)
    #[arg(short, long, value_name = "FMT")]
    format: Option<String>,
}

pub fn run(args: ProcessArgs, engine: &Engine) -> anyhow::Result<()> {
    let chain = match (&args.chain, &args.preset) {
        (Some(chain), _) => read_chain(chain)?,
        (None, Some(id)) => engine.load_preset(id)?,
        (None, None) => anyhow::bail!("no chain given; use --chain or --preset"),
    };

    if args.inputs.len() > 1 && args.output.is_some() {
        anyhow::bail!("--output takes a single input; use --out-dir for several");
    }

    let jobs: Vec<BatchJob> = args
        .inputs
        .iter()
        .map(|input| BatchJob {
            source: input.clone(),
            output: output_path(input, args.output.as_deref(), args.out_dir.as_deref()),
            chain: chain.clone(),
            target_format: args.format.clone(),
        })
        .collect();
    ensure_distinct_outputs(&jobs)?;

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    if let [job] = jobs.as_slice() {
        let written = engine.build_and_run(
            &job.source,
            &job.chain,
            job.target_format.as_deref(),
            &job.output,
        )?;
        println!("{}", written.display());
        return Ok(());
    }

    run_batch(engine, &chain, &jobs)
}

fn run_batch(engine: &Engine, chain: &EffectChainSpec, jobs: &[BatchJob]) -> anyhow::Result<()> {
    // Report a bad chain once rather than per file.
    engine.build_chain(chain)?;

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")?
            .progress_chars("##-"),
    );

    let results = engine.run_batch(jobs, |_, _| pb.inc(1));
    pb.finish_and_clear();

    let mut failed = 0usize;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(written) => println!("{}", written.display()),
            Err(err) => {
                failed += 1;
                let err = anyhow::Error::from(err)
                    .context(format!("failed to process {}", job.source.display()));
                report(&err);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", jobs.len());
    }
    Ok(())
}

/// Fails if two jobs would write the same file.
fn ensure_distinct_outputs(jobs: &[BatchJob]) -> anyhow::Result<()> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    for job in jobs {
        // A target format replaces the extension.
        let key = match job.target_format {
            Some(_) => job.output.with_extension(""),
            None => job.output.clone(),
        };
        if let Some(first) = seen.insert(key, &job.source) {
            anyhow::bail!(
                "{} and {} would both be written to {}",
                first.display(),
                job.source.display(),
                job.output.display()
            );
        }
    }
    Ok(())
}

fn output_path(input: &Path, output: Option<&Path>, out_dir: Option<&Path>) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }
    let file_name = input
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output"));
    if let Some(dir) = out_dir {
        return dir.join(file_name);
    }
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_processed.{ext}"),
        None => format!("{stem}_processed"),
    };
    input.with_file_name(name)
}
