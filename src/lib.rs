//! Lwcbench - Timing benchmark harness for protected LWC hardware cores
//!
//! This library provides the building blocks for cycle-accurate benchmarking
//! of masked lightweight-cryptography implementations: share interleaving for
//! test-vector files, testbench timing-report parsing, and correlation of
//! measured cycle counts with the generated message metadata.

pub mod cli;
pub mod correlate;
pub mod design;
pub mod exec;
pub mod harness;
pub mod metadata;
pub mod report;
pub mod share_split;
pub mod sim;
pub mod timing_report;
pub mod tvgen;
