// Integration tests for the `split` subcommand: share interleaving of
// test-vector files end to end through the CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_vectors(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_split_writes_prefixed_file() {
    let tmp_dir = TempDir::new().unwrap();
    let input = write_vectors(
        &tmp_dir,
        "pdi_shared_2.txt",
        "# pdi.txt generated by cryptotvgen\n\
         INS = 00112233AABBCCDD\n\
         HDR = 52000010\n\
         DAT = DEADBEEF00C0FFEE\n",
    );

    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.arg("split").arg(&input);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("split_pdi_shared_2.txt"));

    // Every odd-position share word is followed by an all-zero spacer.
    let output = fs::read_to_string(tmp_dir.path().join("split_pdi_shared_2.txt")).unwrap();
    assert_eq!(
        output,
        "# pdi.txt generated by cryptotvgen\n\
         INS = 0011223300000000AABBCCDD\n\
         HDR = 5200001000000000\n\
         DAT = DEADBEEF0000000000C0FFEE\n"
    );
}

#[test]
fn test_split_single_share_is_identity() {
    let tmp_dir = TempDir::new().unwrap();
    let content = "INS = 00112233AABBCCDD\nDAT = CAFEF00D\n";
    let input = write_vectors(&tmp_dir, "pdi.txt", content);

    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.arg("split").arg(&input).arg("--shares").arg("1");

    cmd.assert().success();

    let output = fs::read_to_string(tmp_dir.path().join("split_pdi.txt")).unwrap();
    assert_eq!(output, content);
}

#[test]
fn test_split_three_shares_sixteen_bit_bus() {
    let tmp_dir = TempDir::new().unwrap();
    let input = write_vectors(&tmp_dir, "sdi_shared_3.txt", "DAT = 111122223333\n");

    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.arg("split")
        .arg(&input)
        .arg("--bus-width")
        .arg("16")
        .arg("--shares")
        .arg("3");

    cmd.assert().success();

    // Words 1 and 2 of the run get spacers, the third does not.
    let output = fs::read_to_string(tmp_dir.path().join("split_sdi_shared_3.txt")).unwrap();
    assert_eq!(output, "DAT = 11110000222200003333\n");
}

#[test]
fn test_split_multiple_files() {
    let tmp_dir = TempDir::new().unwrap();
    let pdi = write_vectors(&tmp_dir, "pdi.txt", "DAT = AABBCCDD11223344\n");
    let sdi = write_vectors(&tmp_dir, "sdi.txt", "DAT = 5566778899AABBCC\n");

    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.arg("split").arg(&pdi).arg(&sdi);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("split_pdi.txt"))
        .stderr(predicate::str::contains("split_sdi.txt"));

    assert!(tmp_dir.path().join("split_pdi.txt").exists());
    assert!(tmp_dir.path().join("split_sdi.txt").exists());
}

#[test]
fn test_split_passes_unrecognized_lines_through() {
    let tmp_dir = TempDir::new().unwrap();
    let input = write_vectors(
        &tmp_dir,
        "pdi.txt",
        "###############\n# EOF\nSTAT = 0\n\nDAT = 12345678ABCDEF01\n",
    );

    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.arg("split").arg(&input);

    cmd.assert().success();

    let output = fs::read_to_string(tmp_dir.path().join("split_pdi.txt")).unwrap();
    assert_eq!(
        output,
        "###############\n# EOF\nSTAT = 0\n\nDAT = 1234567800000000ABCDEF01\n"
    );
}

#[test]
fn test_split_missing_file_fails() {
    let tmp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.arg("split").arg(tmp_dir.path().join("nope.txt"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_split_rejects_zero_shares() {
    let tmp_dir = TempDir::new().unwrap();
    let input = write_vectors(&tmp_dir, "pdi.txt", "DAT = AABBCCDD\n");

    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.arg("split").arg(&input).arg("--shares").arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("share count"));
}

#[test]
fn test_split_rejects_unaligned_bus_width() {
    let tmp_dir = TempDir::new().unwrap();
    let input = write_vectors(&tmp_dir, "pdi.txt", "DAT = AABBCCDD\n");

    let mut cmd = Command::cargo_bin("lwcbench").unwrap();
    cmd.arg("split").arg(&input).arg("--bus-width").arg("30");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("multiple of 4"));
}
