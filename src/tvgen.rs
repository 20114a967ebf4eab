//! Test-vector generator interface
//!
//! Assembles command lines for `cryptotvgen` (reference-library builds and
//! vector generation) and for `gen_shared` (expansion of PDI/SDI vectors
//! into masked shares). Argument construction is pure so it can be checked
//! without the tools installed; the spawn step goes through [`crate::exec`].

use std::path::Path;

use crate::design::{Lwc, Ports};
use crate::exec::run_tool;

const CRYPTOTVGEN: &str = "cryptotvgen";
const GEN_SHARED: &str = "gen_shared";

/// Benchmark sweeps and KAT corpora use the same generator with a
/// different trailing argument group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorMode {
    /// Size-sweep benchmark vectors plus the timing metadata CSV.
    Benchmark,
    /// Combined KAT vectors 1..=33 with random data.
    KatCombined,
}

/// Arguments for building the reference software libraries.
pub fn prepare_libs_args(algorithms: &[String], candidates_dir: Option<&Path>) -> Vec<String> {
    let mut args = vec!["--prepare_libs".to_string()];
    args.extend(algorithms.iter().cloned());
    if let Some(dir) = candidates_dir {
        args.push("--candidates_dir".to_string());
        args.push(dir.display().to_string());
    }
    args
}

/// Arguments for generating test vectors for `lwc` into `dest_dir`.
pub fn vector_args(
    lwc: &Lwc,
    dest_dir: &Path,
    blocks_per_segment: Option<u32>,
    mode: VectorMode,
    candidates_dir: Option<&Path>,
) -> Vec<String> {
    let mut args = vec![
        "--dest".to_string(),
        dest_dir.display().to_string(),
        "--max_ad".to_string(),
        "80".to_string(),
        "--max_d".to_string(),
        "80".to_string(),
        "--max_io_per_line".to_string(),
        "32".to_string(),
        "--verify_lib".to_string(),
    ];
    if let Some(dir) = candidates_dir {
        args.push("--candidates_dir".to_string());
        args.push(dir.display().to_string());
    }
    if let Some(algorithm) = lwc.aead_algorithm() {
        args.push("--aead".to_string());
        args.push(algorithm.to_string());
        if let Some(sequence) = lwc.aead.as_ref().and_then(|aead| aead.input_sequence.as_ref()) {
            args.push("--msg_format".to_string());
            args.extend(sequence.encrypt.iter().cloned());
        }
    }
    if let Some(algorithm) = lwc.hash_algorithm() {
        args.push("--hash".to_string());
        args.push(algorithm.to_string());
    }
    args.extend([
        "--io".to_string(),
        lwc.ports.pdi.bit_width.to_string(),
        lwc.ports.sdi.bit_width.to_string(),
        "--block_size".to_string(),
        lwc.block_size.xt.to_string(),
        "--block_size_ad".to_string(),
        lwc.block_size.ad.to_string(),
        "--block_size_msg_digest".to_string(),
        lwc.block_size.hm.to_string(),
    ]);
    if let Some(blocks) = blocks_per_segment {
        args.push("--max_block_per_sgmt".to_string());
        args.push(blocks.to_string());
    }
    match mode {
        VectorMode::Benchmark => {
            args.push("--gen_benchmark".to_string());
            if lwc.aead.as_ref().is_some_and(|aead| aead.key_reuse) {
                args.push("--with_key_reuse".to_string());
            }
        }
        VectorMode::KatCombined => {
            args.extend(
                ["--gen_test_combined", "1", "33", "0"]
                    .map(String::from),
            );
        }
    }
    args
}

/// Arguments for expanding flat PDI/SDI vectors into per-share files.
/// `--rdi-width` is forwarded whenever the design declares the port, even
/// at width 0.
pub fn gen_shared_args(ports: &Ports, pdi_file: &Path, sdi_file: &Path) -> Vec<String> {
    let mut args = vec![
        "--pdi-file".to_string(),
        pdi_file.display().to_string(),
        "--sdi-file".to_string(),
        sdi_file.display().to_string(),
        "--pdi-width".to_string(),
        ports.pdi.bit_width.to_string(),
        "--sdi-width".to_string(),
        ports.sdi.bit_width.to_string(),
        "--pdi-shares".to_string(),
        ports.pdi.num_shares.to_string(),
        "--sdi-shares".to_string(),
        ports.sdi.num_shares.to_string(),
    ];
    if let Some(rdi) = ports.rdi {
        args.push("--rdi-width".to_string());
        args.push(rdi.bit_width.to_string());
    }
    args
}

/// Build the reference libraries for the given algorithms.
pub fn prepare_libs(algorithms: &[String], candidates_dir: Option<&Path>) -> anyhow::Result<()> {
    run_tool(CRYPTOTVGEN, &prepare_libs_args(algorithms, candidates_dir))
}

/// Generate test vectors.
pub fn generate_vectors(
    lwc: &Lwc,
    dest_dir: &Path,
    mode: VectorMode,
    candidates_dir: Option<&Path>,
) -> anyhow::Result<()> {
    run_tool(CRYPTOTVGEN, &vector_args(lwc, dest_dir, None, mode, candidates_dir))
}

/// Expand PDI/SDI vectors into shares next to the inputs.
pub fn expand_shares(ports: &Ports, pdi_file: &Path, sdi_file: &Path) -> anyhow::Result<()> {
    run_tool(GEN_SHARED, &gen_shared_args(ports, pdi_file, sdi_file))
}
