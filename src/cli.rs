//! CLI argument parsing for lwcbench

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for correlated timing results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table grouped by operation (default)
    Table,
    /// CSV with one row per measurement
    Csv,
    /// JSON document with rows and a summary
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "lwcbench")]
#[command(version)]
#[command(about = "Timing benchmark harness for protected LWC hardware cores", long_about = None)]
pub struct Cli {
    /// Enable debug tracing to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full benchmark flow: generate vectors, simulate, correlate
    Bench {
        /// Design description TOML
        #[arg(value_name = "DESIGN")]
        design: PathBuf,

        /// Build the reference software libraries before generating vectors
        #[arg(long)]
        build: bool,

        /// Directory test vectors are generated under
        #[arg(long = "kats-dir", value_name = "DIR", default_value = "KATs")]
        kats_dir: PathBuf,
    },

    /// Interleave shared vector files with all-zero spacer words
    Split {
        /// Vector files to transform (each is written to split_<name> beside the input)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Bus width of one share word in bits
        #[arg(long = "bus-width", value_name = "BITS", default_value_t = 32)]
        bus_width: u32,

        /// Number of shares per logical word
        #[arg(long, value_name = "N", default_value_t = 2)]
        shares: u32,
    },

    /// Correlate an existing timing report with its message metadata
    Report {
        /// Timing report written by the testbench
        #[arg(long, value_name = "FILE")]
        timing: PathBuf,

        /// Message metadata CSV emitted by the vector generator
        #[arg(long, value_name = "FILE")]
        metadata: PathBuf,

        /// RDI port width in bits; enables the random-data columns
        #[arg(long = "rdi-width", value_name = "BITS")]
        rdi_width: Option<u32>,

        /// Design name recorded in JSON output
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Write the result to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_bench() {
        let cli = Cli::parse_from(["lwcbench", "bench", "design.toml", "--build"]);
        let Commands::Bench {
            design,
            build,
            kats_dir,
        } = cli.command
        else {
            panic!("expected bench");
        };
        assert_eq!(design, PathBuf::from("design.toml"));
        assert!(build);
        assert_eq!(kats_dir, PathBuf::from("KATs"));
    }

    #[test]
    fn test_cli_bench_custom_kats_dir() {
        let cli = Cli::parse_from(["lwcbench", "bench", "d.toml", "--kats-dir", "/tmp/kats"]);
        let Commands::Bench { kats_dir, build, .. } = cli.command else {
            panic!("expected bench");
        };
        assert_eq!(kats_dir, PathBuf::from("/tmp/kats"));
        assert!(!build);
    }

    #[test]
    fn test_cli_split_defaults() {
        let cli = Cli::parse_from(["lwcbench", "split", "pdi_shared_2.txt"]);
        let Commands::Split {
            files,
            bus_width,
            shares,
        } = cli.command
        else {
            panic!("expected split");
        };
        assert_eq!(files, vec![PathBuf::from("pdi_shared_2.txt")]);
        assert_eq!(bus_width, 32);
        assert_eq!(shares, 2);
    }

    #[test]
    fn test_cli_split_requires_a_file() {
        assert!(Cli::try_parse_from(["lwcbench", "split"]).is_err());
    }

    #[test]
    fn test_cli_split_multiple_files() {
        let cli = Cli::parse_from(["lwcbench", "split", "a.txt", "b.txt", "--shares", "3"]);
        let Commands::Split { files, shares, .. } = cli.command else {
            panic!("expected split");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(shares, 3);
    }

    #[test]
    fn test_cli_report_format_default() {
        let cli = Cli::parse_from(["lwcbench", "report", "--timing", "t.txt", "--metadata", "m.csv"]);
        let Commands::Report {
            format, rdi_width, ..
        } = cli.command
        else {
            panic!("expected report");
        };
        assert!(matches!(format, OutputFormat::Table));
        assert_eq!(rdi_width, None);
    }

    #[test]
    fn test_cli_report_json_with_rdi_width() {
        let cli = Cli::parse_from([
            "lwcbench",
            "report",
            "--timing",
            "t.txt",
            "--metadata",
            "m.csv",
            "--rdi-width",
            "384",
            "--format",
            "json",
        ]);
        let Commands::Report {
            format, rdi_width, ..
        } = cli.command
        else {
            panic!("expected report");
        };
        assert!(matches!(format, OutputFormat::Json));
        assert_eq!(rdi_width, Some(384));
    }

    #[test]
    fn test_cli_debug_flag_after_subcommand() {
        let cli = Cli::parse_from(["lwcbench", "split", "a.txt", "--debug"]);
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_debug_default_false() {
        let cli = Cli::parse_from(["lwcbench", "split", "a.txt"]);
        assert!(!cli.debug);
    }
}
