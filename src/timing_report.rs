//! Cycle-accurate timing report parsing
//!
//! The testbench measures every benchmark message and appends one line per
//! message to the timing report: `msgId, cycles[, randWordsHex]`. Fields are
//! comma-separated with optional surrounding whitespace; `cycles` is decimal
//! and the optional random-word count is hexadecimal. Lines with fewer than
//! two fields (banners, separators, blanks) are skipped, and a repeated
//! msgId overwrites the earlier sample.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;
use thiserror::Error;

/// Errors for timing-report parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportParseError {
    #[error("line {line}: invalid cycle count {field:?} for message {msg_id}")]
    BadCycles {
        line: usize,
        msg_id: String,
        field: String,
    },

    #[error("line {line}: cycle count must be positive for message {msg_id}")]
    ZeroCycles { line: usize, msg_id: String },

    #[error("line {line}: invalid hex random-word count {field:?} for message {msg_id}")]
    BadRandCount {
        line: usize,
        msg_id: String,
        field: String,
    },
}

/// Measurement for one message: total cycles and, when the testbench
/// monitors the RDI port, the number of random words it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    pub cycles: u64,
    pub rand_words: Option<u64>,
}

/// All measurements of one simulation run, keyed by msgId.
#[derive(Debug, Clone, Default)]
pub struct TimingReport {
    samples: HashMap<String, TimingSample>,
}

fn field_sep() -> &'static Regex {
    static SEP: OnceLock<Regex> = OnceLock::new();
    SEP.get_or_init(|| Regex::new(r"\s*,\s*").expect("valid literal pattern"))
}

impl TimingReport {
    /// Parse a report body. Any malformed numeric field aborts the whole
    /// parse, even when the offending msgId is never joined later.
    pub fn parse(text: &str) -> Result<Self, ReportParseError> {
        let mut samples = HashMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let fields: Vec<&str> = field_sep().split(raw.trim()).collect();
            if fields.len() < 2 {
                continue;
            }
            let msg_id = fields[0];
            let cycles: u64 = fields[1].parse().map_err(|_| ReportParseError::BadCycles {
                line,
                msg_id: msg_id.to_string(),
                field: fields[1].to_string(),
            })?;
            if cycles == 0 {
                return Err(ReportParseError::ZeroCycles {
                    line,
                    msg_id: msg_id.to_string(),
                });
            }
            let rand_words = if fields.len() >= 3 {
                let words = u64::from_str_radix(fields[2], 16).map_err(|_| {
                    ReportParseError::BadRandCount {
                        line,
                        msg_id: msg_id.to_string(),
                        field: fields[2].to_string(),
                    }
                })?;
                Some(words)
            } else {
                None
            };
            samples.insert(msg_id.to_string(), TimingSample { cycles, rand_words });
        }
        Ok(Self { samples })
    }

    /// Read and parse a report file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read timing report {}", path.display()))?;
        let report = Self::parse(&text)
            .with_context(|| format!("malformed timing report {}", path.display()))?;
        Ok(report)
    }

    /// Look up the sample for a msgId.
    pub fn get(&self, msg_id: &str) -> Option<&TimingSample> {
        self.samples.get(msg_id)
    }

    /// Number of measured messages.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
