use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use layout_core::job::{JobResult, OutputSink, ProgressRecord, ProgressSink};
use layout_core::{CatalogItem, LayoutJob, ValidationJob, solve_layout_job, validate_layout_job};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a layout job: read a job record and a catalog, write the
    /// resulting `Layout` variants as JSON.
    Solve {
        #[arg(long)]
        job: PathBuf,
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate a finalized layout against its room, write a
    /// `ValidationReport` as JSON.
    Validate {
        #[arg(long)]
        job: PathBuf,
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Appends progress records as JSON Lines to stderr, so stdout stays
/// reserved for the final job result.
struct JsonlProgressSink;

impl ProgressSink for JsonlProgressSink {
    fn report(&mut self, record: ProgressRecord) {
        if let Ok(line) = serde_json::to_string(&record) {
            eprintln!("{line}");
        }
    }
}

/// Writes the job result as JSON to a file or stdout.
struct FileOrStdoutSink {
    out: Option<PathBuf>,
}

impl<T: serde::Serialize> OutputSink<T> for FileOrStdoutSink {
    fn publish(&mut self, result: JobResult<T>) {
        let json = serde_json::to_string_pretty(&result).expect("job result serializes to JSON");
        match &self.out {
            Some(path) => {
                if let Ok(mut file) = fs::File::create(path) {
                    let _ = file.write_all(json.as_bytes());
                }
            }
            None => println!("{json}"),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse JSON in {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    match args.command {
        Command::Solve { job, catalog, out } => {
            let job: LayoutJob = read_json(&job)?;
            let catalog: Vec<CatalogItem> = read_json(&catalog)?;

            let mut progress = JsonlProgressSink;
            let result = solve_layout_job(job, catalog, &mut progress);

            let mut sink = FileOrStdoutSink { out };
            sink.publish(result);
        }
        Command::Validate { job, catalog, out } => {
            let job: ValidationJob = read_json(&job)?;
            let catalog: Vec<CatalogItem> = read_json(&catalog)?;

            let mut progress = JsonlProgressSink;
            let result = validate_layout_job(job, catalog, &mut progress);

            let mut sink = FileOrStdoutSink { out };
            sink.publish(result);
        }
    }

    Ok(())
}
