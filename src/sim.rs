//! Hardware simulation flow
//!
//! The design TOML configures the simulation command (`[sim] command`); the
//! harness appends one `-gNAME=VALUE` argument per testbench generic to
//! point the run at the generated vector files and the timing report it
//! must produce.

use std::path::PathBuf;

use anyhow::bail;

use crate::design::SimFlow;
use crate::exec::run_tool;

/// Testbench mode 4 measures per-message timing instead of checking
/// outputs against expected responses.
pub const TEST_MODE_TIMING: u32 = 4;

/// File paths wired into the testbench generics.
#[derive(Debug, Clone)]
pub struct TestbenchGenerics {
    pub pdi: PathBuf,
    pub sdi: PathBuf,
    pub do_file: PathBuf,
    pub timing_report: PathBuf,
}

/// One `-gNAME=VALUE` argument per generic, in testbench declaration order.
pub fn generic_args(generics: &TestbenchGenerics) -> Vec<String> {
    vec![
        format!("-gG_FNAME_PDI={}", generics.pdi.display()),
        format!("-gG_FNAME_SDI={}", generics.sdi.display()),
        format!("-gG_FNAME_DO={}", generics.do_file.display()),
        format!("-gG_FNAME_TIMING={}", generics.timing_report.display()),
        format!("-gG_TEST_MODE={TEST_MODE_TIMING}"),
    ]
}

/// Run the configured simulation flow in timing-measurement mode.
pub fn run_simulation(flow: &SimFlow, generics: &TestbenchGenerics) -> anyhow::Result<()> {
    let Some((program, base_args)) = flow.command.split_first() else {
        bail!("simulation command is empty");
    };
    let mut args = base_args.to_vec();
    args.extend(generic_args(generics));
    run_tool(program, &args)
}
