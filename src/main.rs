use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lwcbench::cli::{Cli, Commands, OutputFormat};
use lwcbench::{correlate, harness, metadata, report, share_split, timing_report};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Interleave each listed vector file in place next to its input.
fn run_split(files: &[PathBuf], bus_width: u32, shares: u32) -> Result<()> {
    let layout = share_split::ShareLayout::new(bus_width, shares)?;
    for file in files {
        let out_path = layout.split_file(file)?;
        eprintln!("Wrote {}", out_path.display());
    }
    Ok(())
}

/// Correlate an existing timing report without running any external tool.
fn run_report(
    timing: &Path,
    metadata_path: &Path,
    rdi_width: Option<u32>,
    name: Option<&str>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let samples = timing_report::TimingReport::from_file(timing)?;
    let records = metadata::from_file(metadata_path)?;
    let rows = correlate::correlate(&records, &samples, rdi_width)?;

    let mut rendered = match format {
        OutputFormat::Table => report::render_table(&rows),
        OutputFormat::Csv => report::to_csv(&rows),
        OutputFormat::Json => report::to_json(&rows, name)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    match args.command {
        Commands::Bench {
            design,
            build,
            kats_dir,
        } => harness::run_bench(&design, &kats_dir, build),
        Commands::Split {
            files,
            bus_width,
            shares,
        } => run_split(&files, bus_width, shares),
        Commands::Report {
            timing,
            metadata,
            rdi_width,
            name,
            format,
            output,
        } => run_report(
            &timing,
            &metadata,
            rdi_width,
            name.as_deref(),
            format,
            output.as_deref(),
        ),
    }
}
