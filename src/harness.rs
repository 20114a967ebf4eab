//! End-to-end benchmark pipeline
//!
//! Drives one design through the full flow: generate benchmark vectors,
//! expand shares for masked ports, run the simulation testbench in timing
//! mode, then correlate the measured cycle counts with the message metadata
//! and write the results out.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use tracing::info;

use crate::correlate;
use crate::design::LwcDesign;
use crate::metadata;
use crate::report;
use crate::sim::{self, TestbenchGenerics};
use crate::timing_report::TimingReport;
use crate::tvgen::{self, VectorMode};

/// Subdirectory of the vector directory holding the timing test set.
const TIMING_TESTS_DIR: &str = "timing_tests";

/// Files a benchmark run reads and writes, all derived from the design name.
#[derive(Debug)]
struct BenchPaths {
    /// Directory the vector generator writes into.
    tv_dir: PathBuf,
    /// `<tv_dir>/timing_tests`: pdi/sdi/do vectors plus the metadata CSV.
    kat_dir: PathBuf,
    /// Timing report the testbench writes, in the working directory.
    timing_report: PathBuf,
    /// Correlated results CSV, in the working directory.
    results: PathBuf,
}

impl BenchPaths {
    fn new(name: &str, kats_dir: &Path, work_dir: &Path) -> Self {
        let tv_dir = kats_dir.join(name);
        let kat_dir = tv_dir.join(TIMING_TESTS_DIR);
        Self {
            timing_report: work_dir.join(format!("{name}_timing.txt")),
            results: work_dir.join(format!("{name}_timing_results.csv")),
            tv_dir,
            kat_dir,
        }
    }

    fn metadata(&self) -> PathBuf {
        self.kat_dir.join("timing_tests.csv")
    }

    fn vector(&self, stem: &str) -> PathBuf {
        self.kat_dir.join(format!("{stem}.txt"))
    }

    fn shared_vector(&self, stem: &str, shares: u32) -> PathBuf {
        self.kat_dir.join(format!("{stem}_shared_{shares}.txt"))
    }
}

/// Run the complete benchmark flow for one design file.
pub fn run_bench(design_path: &Path, kats_dir: &Path, build_libs: bool) -> Result<()> {
    let design = LwcDesign::from_toml(design_path)?;
    let Some(algorithm) = design.lwc.aead_algorithm() else {
        bail!("design {} does not declare an AEAD algorithm", design.name);
    };
    let Some(sim_flow) = &design.sim else {
        bail!("design {} does not configure a [sim] command", design.name);
    };

    let work_dir = env::current_dir().context("failed to resolve working directory")?;
    let paths = BenchPaths::new(&design.name, kats_dir, &work_dir);

    // Vendored reference implementations live next to the design file.
    let cref_dir = design_path
        .parent()
        .map(|dir| dir.join("cref"))
        .filter(|dir| dir.exists());

    if build_libs {
        let mut algorithms = vec![algorithm.to_string()];
        if let Some(hash) = design.lwc.hash_algorithm() {
            algorithms.push(hash.to_string());
        }
        info!(?algorithms, "building reference libraries");
        tvgen::prepare_libs(&algorithms, cref_dir.as_deref())?;
    }

    info!(design = %design.name, dest = %paths.tv_dir.display(), "generating benchmark vectors");
    tvgen::generate_vectors(&design.lwc, &paths.tv_dir, VectorMode::Benchmark, cref_dir.as_deref())?;

    let mut pdi_file = paths.vector("pdi");
    let mut sdi_file = paths.vector("sdi");
    if design.lwc.uses_shares() {
        info!(
            pdi_shares = design.lwc.ports.pdi.num_shares,
            sdi_shares = design.lwc.ports.sdi.num_shares,
            "expanding vectors into shares"
        );
        tvgen::expand_shares(&design.lwc.ports, &pdi_file, &sdi_file)?;
        pdi_file = paths.shared_vector("pdi", design.lwc.ports.pdi.num_shares);
        sdi_file = paths.shared_vector("sdi", design.lwc.ports.sdi.num_shares);
    }

    let generics = TestbenchGenerics {
        pdi: pdi_file,
        sdi: sdi_file,
        do_file: paths.vector("do"),
        timing_report: paths.timing_report.clone(),
    };
    info!(design = %design.name, "running timing simulation");
    sim::run_simulation(sim_flow, &generics)?;
    ensure!(
        paths.timing_report.exists(),
        "simulation finished but produced no timing report at {}",
        paths.timing_report.display()
    );

    let samples = TimingReport::from_file(&paths.timing_report)?;
    let records = metadata::from_file(&paths.metadata())?;
    let rows = correlate::correlate(&records, &samples, design.lwc.rdi_width())?;

    report::write_csv(&rows, &paths.results)?;
    print!("{}", report::render_table(&rows));
    info!(rows = rows.len(), "correlation complete");
    eprintln!("Timing results written to {}", paths.results.display());
    Ok(())
}
