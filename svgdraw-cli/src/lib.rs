//! # svgdraw CLI
//!
//! Batch conversion of SVG documents into drawing-instruction JSON.
//!
//! ## Usage
//!
//! ```bash
//! svgdraw --output-dir out/ --optimise drawings/ extra.svg
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `BatchConfig` - Inputs, output folder, optimisation and pool size
//! - `run_batch` - Converts every document on a bounded blocking pool; each
//!   document gets its own processor state and output file

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use svgdraw_core::{optimise, SvgProcessor};
use svgdraw_renderer::InstructionGenerator;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Command-line arguments for svgdraw.
#[derive(Debug, Clone, Parser)]
#[command(name = "svgdraw")]
#[command(about = "Convert SVG documents into drawing-instruction JSON")]
#[command(version)]
pub struct CliArgs {
    /// SVG files, or directories whose `.svg` files are converted
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory the JSON files are written to
    #[arg(long, env = "SVGDRAW_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Flatten single-child groups and merge adjacent paths first
    #[arg(long)]
    pub optimise: bool,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Documents converted at once (default: available parallelism)
    #[arg(long, env = "SVGDRAW_JOBS")]
    pub jobs: Option<usize>,
}

/// Batch conversion configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Files and directories to convert.
    pub inputs: Vec<PathBuf>,
    /// Where `<stem>.json` files are written.
    pub output_dir: PathBuf,
    /// Run the tree optimizer before generating.
    pub optimise: bool,
    /// Indent the JSON output.
    pub pretty: bool,
    /// Worker pool size, at least 1.
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_dir: PathBuf::from("."),
            optimise: false,
            pretty: false,
            jobs: default_jobs(),
        }
    }
}

impl From<CliArgs> for BatchConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            inputs: args.inputs,
            output_dir: args.output_dir,
            optimise: args.optimise,
            pretty: args.pretty,
            jobs: args.jobs.filter(|n| *n > 0).unwrap_or_else(default_jobs),
        }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents written successfully.
    pub converted: usize,
    /// Documents that could not be loaded or written.
    pub failed: usize,
    /// Diagnostic warnings across all converted documents.
    pub warnings: usize,
}

impl BatchReport {
    /// True when no document failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Input file.
    pub source: PathBuf,
    /// Written JSON file.
    pub output: PathBuf,
    /// Warning-level diagnostics recorded while parsing.
    pub warnings: usize,
}

/// Expand `inputs` into the list of files to convert.
///
/// Directories contribute their `.svg` files (not recursively, sorted by
/// name); files are taken as given.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn collect_inputs(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let entries = std::fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?;
            let mut found: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && is_svg(path))
                .collect();
            found.sort();
            tracing::debug!("Found {} SVG files in {}", found.len(), input.display());
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// `<output_dir>/<file stem>.json`.
///
/// # Errors
///
/// Returns an error if `source` has no file name.
pub fn output_path(source: &Path, output_dir: &Path) -> anyhow::Result<PathBuf> {
    let stem = source
        .file_stem()
        .with_context(|| format!("No file name in {}", source.display()))?;
    let mut name = stem.to_os_string();
    name.push(".json");
    Ok(output_dir.join(name))
}

/// Give every source its own output file.
///
/// Sources keep `<stem>.json` where they can. A later source whose stem was
/// already used, for example `b/logo.svg` after `a/logo.svg`, gets the first
/// free `<stem>-<n>.json`. Names that some source maps to naturally are
/// never handed out as suffixed names.
///
/// # Errors
///
/// Returns an error if a source has no file name.
pub fn plan_outputs(sources: &[PathBuf], output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let natural = sources
        .iter()
        .map(|source| output_path(source, output_dir))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let mut claimed: HashSet<PathBuf> = natural.iter().cloned().collect();
    let mut used = HashSet::new();

    let mut outputs = Vec::with_capacity(natural.len());
    for (source, output) in sources.iter().zip(natural) {
        if used.insert(output.clone()) {
            outputs.push(output);
            continue;
        }
        let stem = output.file_stem().unwrap_or_default().to_os_string();
        let mut n = 1;
        let renamed = loop {
            let mut name = stem.clone();
            name.push(format!("-{n}.json"));
            let candidate = output_dir.join(name);
            if claimed.insert(candidate.clone()) {
                break candidate;
            }
            n += 1;
        };
        tracing::warn!(
            "{} shares its output name with an earlier input; writing {}",
            source.display(),
            renamed.display()
        );
        used.insert(renamed.clone());
        outputs.push(renamed);
    }
    Ok(outputs)
}

/// Parse, optionally optimise, and write one document to
/// `<output_dir>/<file stem>.json`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the document cannot be
/// loaded, or the output cannot be written.
pub fn convert_file(source: &Path, config: &BatchConfig) -> anyhow::Result<Conversion> {
    let output = output_path(source, &config.output_dir)?;
    convert_file_to(source, &output, config)
}

/// Parse, optionally optimise, and write one document to `output`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the document cannot be
/// loaded, or the output cannot be written.
pub fn convert_file_to(
    source: &Path,
    output: &Path,
    config: &BatchConfig,
) -> anyhow::Result<Conversion> {
    let _span = tracing::info_span!("convert", path = %source.display()).entered();

    let text = std::fs::read_to_string(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let mut document = SvgProcessor::new()
        .parse_str(&text)
        .with_context(|| format!("Failed to parse {}", source.display()))?;
    if config.optimise {
        optimise(&mut document.scene);
    }

    let generator = InstructionGenerator::default();
    let json = if config.pretty {
        generator.to_json_pretty(&document.scene)?
    } else {
        generator.to_json(&document.scene)?
    };

    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(Conversion {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        warnings: document.warnings().count(),
    })
}

/// Convert every input on a pool of at most `config.jobs` blocking workers.
///
/// Output names are planned with [`plan_outputs`] before any work starts,
/// so no two documents write the same file.
///
/// Ctrl-C stops new documents from being started; documents already being
/// converted finish. A document that fails is logged and counted, and the
/// rest of the batch continues.
///
/// # Errors
///
/// Returns an error if an input directory cannot be read or the output
/// directory cannot be created.
pub async fn run_batch(config: BatchConfig) -> anyhow::Result<BatchReport> {
    let sources = collect_inputs(&config.inputs)?;
    let outputs = plan_outputs(&sources, &config.output_dir)?;
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;
    tracing::info!(
        "Converting {} documents with {} workers",
        sources.len(),
        config.jobs
    );

    let semaphore = Arc::new(Semaphore::new(config.jobs.max(1)));
    let config = Arc::new(config);
    let mut tasks = JoinSet::new();
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    for (source, output) in sources.into_iter().zip(outputs) {
        let permit = tokio::select! {
            biased;
            _ = &mut interrupt => {
                tracing::warn!("Interrupted; waiting for documents in progress");
                break;
            }
            permit = Arc::clone(&semaphore).acquire_owned() => {
                permit.context("Worker pool closed")?
            }
        };
        let config = Arc::clone(&config);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            let result = convert_file_to(&source, &output, &config);
            (source, result)
        });
    }

    let mut report = BatchReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(conversion))) => {
                tracing::info!(
                    "Wrote {} ({} warnings)",
                    conversion.output.display(),
                    conversion.warnings
                );
                report.converted += 1;
                report.warnings += conversion.warnings;
            }
            Ok((source, Err(e))) => {
                tracing::error!("{} could not be loaded: {:#}", source.display(), e);
                report.failed += 1;
            }
            Err(e) => {
                tracing::error!("Conversion task failed: {}", e);
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        "Batch finished: {} converted, {} failed, {} warnings",
        report.converted,
        report.failed,
        report.warnings
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_replaces_extension() {
        let out = output_path(Path::new("art/logo.svg"), Path::new("out")).expect("path");
        assert_eq!(out, PathBuf::from("out/logo.json"));
    }

    #[test]
    fn test_output_path_without_name() {
        assert!(output_path(Path::new("/"), Path::new("out")).is_err());
    }

    #[test]
    fn test_plan_outputs_suffixes_repeated_stems() {
        let sources = [
            PathBuf::from("a/logo.svg"),
            PathBuf::from("b/logo.svg"),
            PathBuf::from("c/logo-1.svg"),
            PathBuf::from("d/logo.SVG"),
            PathBuf::from("a/icon.svg"),
        ];
        let outputs = plan_outputs(&sources, Path::new("out")).expect("plan");
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/logo.json"),
                PathBuf::from("out/logo-2.json"),
                PathBuf::from("out/logo-1.json"),
                PathBuf::from("out/logo-3.json"),
                PathBuf::from("out/icon.json"),
            ]
        );
    }

    #[test]
    fn test_is_svg_ignores_case() {
        assert!(is_svg(Path::new("a.SVG")));
        assert!(is_svg(Path::new("b.svg")));
        assert!(!is_svg(Path::new("c.svgz")));
        assert!(!is_svg(Path::new("svg")));
    }

    #[test]
    fn test_config_from_args() {
        let args = CliArgs::try_parse_from([
            "svgdraw",
            "--output-dir",
            "out",
            "--optimise",
            "--jobs",
            "3",
            "a.svg",
            "dir",
        ])
        .expect("args");
        let config = BatchConfig::from(args);
        assert_eq!(config.inputs, vec![PathBuf::from("a.svg"), PathBuf::from("dir")]);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.optimise);
        assert!(!config.pretty);
        assert_eq!(config.jobs, 3);
    }

    #[test]
    fn test_zero_jobs_falls_back_to_default() {
        let args = CliArgs::try_parse_from(["svgdraw", "--jobs", "0", "a.svg"]).expect("args");
        assert!(BatchConfig::from(args).jobs >= 1);
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(CliArgs::try_parse_from(["svgdraw"]).is_err());
    }
}
