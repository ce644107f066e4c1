use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use refcheck::logging;
use refcheck::prelude::*;

#[derive(Parser)]
#[command(name = "refcheck")]
#[command(version)]
#[command(about = "Checks that every file is named after the SHA-256 of its contents")]
#[command(long_about = "refcheck checks the integrity of content-addressed folders such as \
restic repositories. Each file name is expected to be the lowercase hex SHA-256 of the file. \
Files whose contents hash to their name are intact; otherwise they are corrupted.")]
struct Cli {
    /// Folder to check (repeatable; defaults to the current directory)
    #[arg(short, long = "path")]
    paths: Vec<PathBuf>,

    /// File listing folders to check, one per line (repeatable)
    #[arg(long = "paths-file")]
    paths_files: Vec<PathBuf>,

    /// Regular expression excluding matching files and folders (repeatable)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Number of worker threads per folder
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Print results as JSON
    #[arg(short, long)]
    json: bool,

    /// Named exclusion template (repeatable)
    #[arg(short, long = "template", default_values = ["restic", std::env::consts::OS])]
    templates: Vec<String>,

    /// Also write the rendered results to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run in batch mode (no progress spinner)
    #[arg(long)]
    batch: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose).context("Failed to initialize logging")?;

    // Set up graceful shutdown handler
    let shutdown_requested = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown_requested.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nShutdown requested, stopping...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let folders = collect_folder_paths(&cli.paths, &cli.paths_files)?;

    let templates = TemplateSet::builtin();
    for name in cli.templates.iter().filter(|name| !templates.contains(name)) {
        debug!(template = %name, "unknown template, ignoring");
    }
    let exclude = ExclusionFilter::build(&cli.exclude, &cli.templates, &templates)
        .context("Invalid exclusion rules")?;

    let progress = if cli.batch {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} file(s) checked {msg}")
                .context("Invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let options = Options::new(cli.workers)
        .with_cancel(shutdown_requested)
        .with_progress(progress.clone());
    options.validate().context("Invalid worker count")?;

    let result = process_all(&folders, &exclude, &options);
    progress.finish_and_clear();
    let reports = result.context("Validation failed")?;

    let stdout = io::stdout();
    if cli.json {
        write_json(stdout.lock(), &reports)?;
    } else {
        write_table(stdout.lock(), &reports)?;
    }

    if let Some(output) = &cli.output {
        write_report(output, &reports, cli.json)?;
        eprintln!("Report saved to: {}", output.display());
    }

    Ok(())
}

/// Explicit folders first, then those listed in each paths file.
fn collect_folder_paths(paths: &[PathBuf], paths_files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut folders = paths.to_vec();
    for list in paths_files {
        folders.extend(read_paths_file(list)?);
    }
    if paths.is_empty() && paths_files.is_empty() {
        folders.push(PathBuf::from("."));
    }
    Ok(folders)
}

/// Read folder paths, one per line. Blank lines and `#` comments are skipped.
fn read_paths_file(path: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open paths file {}", path.display()))?;

    let mut folders = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read paths file {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        folders.push(PathBuf::from(line));
    }
    Ok(folders)
}
