// Integration tests for the `bench` subcommand. External tools are replaced
// by shell shims on PATH that produce the files the pipeline expects, so the
// whole flow runs without cryptotvgen or a simulator installed.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SIMPLE_DESIGN: &str = r#"
name = "refcore"

[lwc.aead]
algorithm = "giftcofb128v1"

[lwc.ports.pdi]
[lwc.ports.sdi]

[sim]
command = ["fake-lwc-sim"]
"#;

const MASKED_DESIGN: &str = r#"
name = "domcore"

[lwc.aead]
algorithm = "giftcofb128v1"

[lwc.ports.pdi]
num_shares = 2

[lwc.ports.sdi]
num_shares = 2

[lwc.ports.rdi]
bit_width = 64

[sim]
command = ["fake-lwc-sim"]
"#;

// Fake cryptotvgen: creates the timing_tests KAT set under --dest.
const TVGEN_SHIM: &str = r#"
dest=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--dest" ]; then dest="$arg"; fi
  prev="$arg"
done
mkdir -p "$dest/timing_tests"
cat > "$dest/timing_tests/timing_tests.csv" <<'EOF'
msgId,adBytes,msgBytes,decrypt,hash,newKey,longN+1
1,16,0,False,False,True,False
2,0,16,False,False,False,False
EOF
: > "$dest/timing_tests/pdi.txt"
: > "$dest/timing_tests/sdi.txt"
: > "$dest/timing_tests/do.txt"
"#;

// Fake simulator: writes the timing report named by G_FNAME_TIMING and dumps
// its arguments for inspection.
const SIM_SHIM: &str = r#"
report=""
for arg in "$@"; do
  case "$arg" in
    -gG_FNAME_TIMING=*) report="${arg#-gG_FNAME_TIMING=}" ;;
  esac
done
printf '1, 100\n2, 80\n' > "$report"
printf '%s\n' "$@" > "$(dirname "$report")/sim_args.txt"
"#;

// Fake gen_shared: creates the expanded share files next to the inputs.
const GEN_SHARED_SHIM: &str = r#"
pdi=""
sdi=""
prev=""
for arg in "$@"; do
  case "$prev" in
    --pdi-file) pdi="$arg" ;;
    --sdi-file) sdi="$arg" ;;
  esac
  prev="$arg"
done
: > "$(dirname "$pdi")/pdi_shared_2.txt"
: > "$(dirname "$sdi")/sdi_shared_2.txt"
"#;

fn write_shim(dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn shim_path(dir: &Path) -> String {
    let system_path = std::env::var("PATH").unwrap_or_default();
    format!("{}:{system_path}", dir.display())
}

fn setup(design: &str) -> TempDir {
    let tmp_dir = TempDir::new().unwrap();
    fs::write(tmp_dir.path().join("design.toml"), design).unwrap();
    let shims = tmp_dir.path().join("bin");
    fs::create_dir(&shims).unwrap();
    write_shim(&shims, "cryptotvgen", TVGEN_SHIM);
    write_shim(&shims, "fake-lwc-sim", SIM_SHIM);
    write_shim(&shims, "gen_shared", GEN_SHARED_SHIM);
    tmp_dir
}

fn bench_cmd(tmp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.current_dir(tmp_dir.path())
        .env("PATH", shim_path(&tmp_dir.path().join("bin")))
        .arg("bench")
        .arg("design.toml")
        .arg("--kats-dir")
        .arg("KATs");
    cmd
}

#[test]
fn test_bench_runs_full_pipeline() {
    let tmp_dir = setup(SIMPLE_DESIGN);

    bench_cmd(&tmp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("PT/CT [B]"))
        .stdout(predicate::str::contains("Enc"))
        .stderr(predicate::str::contains("refcore_timing_results.csv"));

    let results =
        fs::read_to_string(tmp_dir.path().join("refcore_timing_results.csv")).unwrap();
    assert!(results.starts_with("Op,ReuseKey,msgBytes,adBytes"));
    assert!(results.contains("Enc,False,0,16,100,0.16,,\n"));
    assert!(results.contains("Enc,True,16,0,80,0.2,,\n"));
}

#[test]
fn test_bench_passes_plain_vectors_to_the_testbench() {
    let tmp_dir = setup(SIMPLE_DESIGN);

    bench_cmd(&tmp_dir).assert().success();

    let sim_args = fs::read_to_string(tmp_dir.path().join("sim_args.txt")).unwrap();
    assert!(sim_args.contains("timing_tests/pdi.txt"));
    assert!(sim_args.contains("timing_tests/sdi.txt"));
    assert!(sim_args.contains("-gG_TEST_MODE=4"));
}

#[test]
fn test_bench_expands_shares_for_masked_ports() {
    let tmp_dir = setup(MASKED_DESIGN);

    bench_cmd(&tmp_dir).assert().success();

    // The testbench must see the expanded share files, not the raw vectors.
    let sim_args = fs::read_to_string(tmp_dir.path().join("sim_args.txt")).unwrap();
    assert!(sim_args.contains("pdi_shared_2.txt"));
    assert!(sim_args.contains("sdi_shared_2.txt"));
}

#[test]
fn test_bench_fails_when_simulation_fails() {
    let tmp_dir = setup(SIMPLE_DESIGN);
    write_shim(&tmp_dir.path().join("bin"), "fake-lwc-sim", "\nexit 3");

    bench_cmd(&tmp_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fake-lwc-sim exited with"));
}

#[test]
fn test_bench_fails_without_timing_report() {
    let tmp_dir = setup(SIMPLE_DESIGN);
    write_shim(&tmp_dir.path().join("bin"), "fake-lwc-sim", "\nexit 0");

    bench_cmd(&tmp_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no timing report"));
}

#[test]
fn test_bench_requires_aead_algorithm() {
    let tmp_dir = setup("name = \"hashonly\"\n[lwc.ports.pdi]\n[lwc.ports.sdi]\n");

    bench_cmd(&tmp_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("AEAD algorithm"));
}
