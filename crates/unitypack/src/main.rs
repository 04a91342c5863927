use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use encoding_rs::Encoding;
use tracing_subscriber::EnvFilter;
use unitypack_archive::{EntryOutcome, EntryRecord, ExtractOptions, extract_package};

/// Extract a Unity .unitypackage archive into a directory tree.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// The .unitypackage archive to extract
    package: PathBuf,
    /// Destination directory (current directory if not set)
    output: Option<PathBuf>,
    /// Also extract .meta sidecar files alongside their assets
    #[arg(long)]
    with_meta: bool,
    /// Text encoding of the archive's pathname descriptors
    #[arg(long, default_value = "utf-8")]
    encoding: String,
    /// Suppress per-asset progress lines
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let encoding = Encoding::for_label(cli.encoding.as_bytes())
        .with_context(|| format!("unknown text encoding label '{}'", cli.encoding))?;

    if cli.with_meta && !cli.quiet {
        println!("extract .meta files");
    }

    let mut options = ExtractOptions::default()
        .encoding(encoding)
        .extract_meta(cli.with_meta);
    if let Some(output) = &cli.output {
        options = options.output_root(output.clone());
    }
    if !cli.quiet {
        options = options.on_entry(Arc::new(print_progress));
    }

    let start = Instant::now();
    let report = extract_package(&cli.package, &options)
        .with_context(|| format!("failed to extract '{}'", cli.package.display()))?;

    if !cli.quiet {
        println!(
            "Finished in {:.2}s: {} extracted, {} skipped",
            start.elapsed().as_secs_f64(),
            report.extracted_count(),
            report.skipped_count(),
        );
    }
    Ok(())
}

fn print_progress(record: &EntryRecord) {
    let pathname = record.pathname.as_deref().unwrap_or_default();
    match &record.outcome {
        EntryOutcome::Extracted { meta, .. } => {
            println!("Extracting '{}' as '{pathname}'", record.id);
            if *meta {
                println!("Extracting '{}' .meta as '{pathname}.meta'", record.id);
            }
        }
        EntryOutcome::Directory { meta, .. } => {
            if *meta {
                println!("Extracting '{}' .meta as '{pathname}.meta'", record.id);
            }
        }
        // Unsafe skips are reported through the warning log; incomplete
        // entries have nothing to report against.
        EntryOutcome::SkippedUnsafe { .. } | EntryOutcome::SkippedIncomplete => {}
    }
}
