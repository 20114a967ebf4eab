//! Timing correlation and metric synthesis
//!
//! Joins the generator's message metadata with the measured timing report
//! and derives one performance row per message. Messages flagged `longN+1`
//! additionally yield a synthesized delta row against the row emitted right
//! before them, isolating the cost of one extra processing block from fixed
//! per-message overhead. The output comes back in report order: operation,
//! then key reuse, then AD-only / PT-only / mixed, then ascending sizes
//! with `long` delta rows last in their group.

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::metadata::MessageRecord;
use crate::timing_report::{TimingReport, TimingSample};

pub type Result<T> = std::result::Result<T, CorrelateError>;

/// Errors for the metadata/timing join
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelateError {
    #[error("no timing sample for message {msg_id}")]
    MissingSample { msg_id: String },

    #[error("message {msg_id} is flagged longN+1 but has no predecessor row")]
    NoPredecessor { msg_id: String },

    #[error("non-positive cycle delta {delta} between messages {prev_id} and {curr_id}")]
    NonPositiveCycleDelta {
        prev_id: String,
        curr_id: String,
        delta: i64,
    },
}

/// The operation a row measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Op {
    Enc,
    Dec,
    Hash,
}

impl Op {
    fn from_record(record: &MessageRecord) -> Self {
        if record.hash {
            Op::Hash
        } else if record.decrypt {
            Op::Dec
        } else {
            Op::Enc
        }
    }

    /// Report ordering: encrypt before decrypt before hash.
    fn rank(self) -> u8 {
        match self {
            Op::Enc => 0,
            Op::Dec => 1,
            Op::Hash => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Enc => "Enc",
            Op::Dec => "Dec",
            Op::Hash => "Hash",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A size column value. `Long` marks a synthesized per-block row and orders
/// after every numeric value, so delta rows close out their sort group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ByteCount {
    Bytes(u64),
    Long,
}

impl ByteCount {
    pub fn is_long(self) -> bool {
        matches!(self, ByteCount::Long)
    }

    fn is_zero(self) -> bool {
        matches!(self, ByteCount::Bytes(0))
    }
}

impl std::fmt::Display for ByteCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteCount::Bytes(n) => write!(f, "{n}"),
            ByteCount::Long => f.write_str("long"),
        }
    }
}

impl Serialize for ByteCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ByteCount::Bytes(n) => serializer.serialize_u64(*n),
            ByteCount::Long => serializer.serialize_str("long"),
        }
    }
}

/// One row of the timing results report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    pub msg_id: String,
    pub op: Op,
    pub reuse_key: bool,
    pub msg_bytes: ByteCount,
    pub ad_bytes: ByteCount,
    pub cycles: u64,
    pub throughput: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rand_bytes_per_byte: Option<f64>,
    pub synthesized: bool,
}

impl MetricRow {
    /// Grouping within an (op, reuse) block: AD-only rows first, then
    /// PT-only, then mixed. `long` counts as non-zero.
    fn category(&self) -> u8 {
        if self.msg_bytes.is_zero() {
            0
        } else if self.ad_bytes.is_zero() {
            1
        } else {
            2
        }
    }

    fn sort_key(&self) -> (u8, bool, u8, ByteCount, ByteCount) {
        (
            self.op.rank(),
            self.reuse_key,
            self.category(),
            self.msg_bytes,
            self.ad_bytes,
        )
    }

    /// The rendered table draws a rule after rows that are `long` in both
    /// size columns.
    pub fn ends_group(&self) -> bool {
        self.ad_bytes.is_long() && self.msg_bytes.is_long()
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn rdi_bytes(rdi_width: u32, words: u64) -> i64 {
    (u64::from(rdi_width) * words / 8) as i64
}

/// Join records with samples and derive the ordered metric rows.
///
/// Record order must be the generator's emission order: a `longN+1` record
/// is differenced against whatever row landed in the output immediately
/// before it. `rdi_width` is the random-port width in bits; randomness
/// metrics appear only when it is given and the report carries random-word
/// counts.
pub fn correlate(
    records: &[MessageRecord],
    samples: &TimingReport,
    rdi_width: Option<u32>,
) -> Result<Vec<MetricRow>> {
    let mut rows: Vec<MetricRow> = Vec::with_capacity(records.len());
    for record in records {
        let sample = *samples
            .get(&record.msg_id)
            .ok_or_else(|| CorrelateError::MissingSample {
                msg_id: record.msg_id.clone(),
            })?;
        let predecessor = rows.len().checked_sub(1);
        rows.push(derive_row(record, sample, rdi_width));
        if record.long_n1 {
            let prev_idx = predecessor.ok_or_else(|| CorrelateError::NoPredecessor {
                msg_id: record.msg_id.clone(),
            })?;
            let delta = synthesize_delta(&rows[prev_idx], record, sample, samples, rdi_width)?;
            rows.push(delta);
        }
    }
    rows.sort_by_key(MetricRow::sort_key);
    Ok(rows)
}

fn derive_row(record: &MessageRecord, sample: TimingSample, rdi_width: Option<u32>) -> MetricRow {
    let op = Op::from_record(record);
    let reuse_key = !record.new_key && op != Op::Hash;
    let total_bytes = record.ad_bytes + record.msg_bytes;
    let random_bytes = match (rdi_width, sample.rand_words) {
        (Some(width), Some(words)) => Some(rdi_bytes(width, words)),
        _ => None,
    };
    let rand_bytes_per_byte = random_bytes
        .filter(|_| total_bytes > 0)
        .map(|bytes| round3(bytes as f64 / total_bytes as f64));
    MetricRow {
        msg_id: record.msg_id.clone(),
        op,
        reuse_key,
        msg_bytes: ByteCount::Bytes(record.msg_bytes),
        ad_bytes: ByteCount::Bytes(record.ad_bytes),
        cycles: sample.cycles,
        throughput: round3(total_bytes as f64 / sample.cycles as f64),
        random_bytes,
        rand_bytes_per_byte,
        synthesized: false,
    }
}

fn synthesize_delta(
    prev: &MetricRow,
    record: &MessageRecord,
    sample: TimingSample,
    samples: &TimingReport,
    rdi_width: Option<u32>,
) -> Result<MetricRow> {
    let prev_sample = *samples
        .get(&prev.msg_id)
        .ok_or_else(|| CorrelateError::MissingSample {
            msg_id: prev.msg_id.clone(),
        })?;
    let (ByteCount::Bytes(prev_ad), ByteCount::Bytes(prev_msg)) = (prev.ad_bytes, prev.msg_bytes)
    else {
        // a row backed by a timing sample always carries numeric sizes
        return Err(CorrelateError::MissingSample {
            msg_id: prev.msg_id.clone(),
        });
    };
    let byte_delta = (record.ad_bytes + record.msg_bytes) as i64 - (prev_ad + prev_msg) as i64;
    let cycle_delta = sample.cycles as i64 - prev_sample.cycles as i64;
    if cycle_delta <= 0 {
        return Err(CorrelateError::NonPositiveCycleDelta {
            prev_id: prev.msg_id.clone(),
            curr_id: record.msg_id.clone(),
            delta: cycle_delta,
        });
    }
    let random_bytes = match (rdi_width, sample.rand_words, prev_sample.rand_words) {
        (Some(width), Some(curr), Some(prev_words)) => {
            Some(rdi_bytes(width, curr) - rdi_bytes(width, prev_words))
        }
        _ => None,
    };
    let rand_bytes_per_byte = random_bytes
        .filter(|_| byte_delta != 0)
        .map(|bytes| round3(bytes as f64 / byte_delta as f64));
    Ok(MetricRow {
        msg_id: format!("{}:{}", prev.msg_id, record.msg_id),
        op: prev.op,
        reuse_key: prev.reuse_key,
        msg_bytes: long_or_zero(record.msg_bytes),
        ad_bytes: long_or_zero(record.ad_bytes),
        cycles: cycle_delta as u64,
        throughput: round3(byte_delta as f64 / cycle_delta as f64),
        random_bytes,
        rand_bytes_per_byte,
        synthesized: true,
    })
}

fn long_or_zero(bytes: u64) -> ByteCount {
    if bytes == 0 {
        ByteCount::Bytes(0)
    } else {
        ByteCount::Long
    }
}
