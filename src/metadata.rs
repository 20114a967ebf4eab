//! Benchmark message metadata
//!
//! Alongside the timing test vectors the generator writes a small CSV
//! describing every message it emitted: sizes, operation flags, key reuse
//! and the long-message marker. Values never contain quoted commas, so a
//! plain header-indexed split is all the parsing this needs. Boolean
//! columns carry the literals `True`/`False`; anything that is not exactly
//! `True` reads as false.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use thiserror::Error;

/// Errors for metadata parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("metadata is missing a header line")]
    MissingHeader,

    #[error("metadata has no {name:?} column")]
    MissingColumn { name: &'static str },

    #[error("line {line}: row has no {name:?} field")]
    MissingField { line: usize, name: &'static str },

    #[error("line {line}: invalid {name} value {field:?}")]
    BadNumber {
        line: usize,
        name: &'static str,
        field: String,
    },
}

/// One generated message as described by the metadata CSV. Record order is
/// the generator's emission order and is significant for long-message
/// delta synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub msg_id: String,
    pub ad_bytes: u64,
    pub msg_bytes: u64,
    pub decrypt: bool,
    pub hash: bool,
    pub new_key: bool,
    /// `longN+1` column: this message is the longer member of a long pair,
    /// and a per-block row is synthesized from it and its predecessor.
    pub long_n1: bool,
}

const COL_MSG_ID: &str = "msgId";
const COL_AD_BYTES: &str = "adBytes";
const COL_MSG_BYTES: &str = "msgBytes";
const COL_DECRYPT: &str = "decrypt";
const COL_HASH: &str = "hash";
const COL_NEW_KEY: &str = "newKey";
const COL_LONG_N1: &str = "longN+1";

struct Columns(HashMap<String, usize>);

impl Columns {
    fn parse(header: &str) -> Self {
        let map = header
            .split(',')
            .enumerate()
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect();
        Self(map)
    }

    fn require(&self, name: &'static str) -> Result<usize, MetadataError> {
        self.0
            .get(name)
            .copied()
            .ok_or(MetadataError::MissingColumn { name })
    }
}

struct Row<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl Row<'_> {
    fn text(&self, idx: usize, name: &'static str) -> Result<&str, MetadataError> {
        self.fields
            .get(idx)
            .copied()
            .ok_or(MetadataError::MissingField {
                line: self.line,
                name,
            })
    }

    fn number<T: FromStr>(&self, idx: usize, name: &'static str) -> Result<T, MetadataError> {
        let field = self.text(idx, name)?;
        field.parse().map_err(|_| MetadataError::BadNumber {
            line: self.line,
            name,
            field: field.to_string(),
        })
    }

    fn flag(&self, idx: usize, name: &'static str) -> Result<bool, MetadataError> {
        Ok(self.text(idx, name)? == "True")
    }
}

/// Parse the metadata CSV body, preserving row order.
pub fn parse(text: &str) -> Result<Vec<MessageRecord>, MetadataError> {
    let mut lines = text.lines().enumerate();
    let (_, header) = lines.next().ok_or(MetadataError::MissingHeader)?;
    let columns = Columns::parse(header);

    let msg_id = columns.require(COL_MSG_ID)?;
    let ad_bytes = columns.require(COL_AD_BYTES)?;
    let msg_bytes = columns.require(COL_MSG_BYTES)?;
    let decrypt = columns.require(COL_DECRYPT)?;
    let hash = columns.require(COL_HASH)?;
    let new_key = columns.require(COL_NEW_KEY)?;
    let long_n1 = columns.require(COL_LONG_N1)?;

    let mut records = Vec::new();
    for (idx, raw) in lines {
        if raw.trim().is_empty() {
            continue;
        }
        let row = Row {
            line: idx + 1,
            fields: raw.split(',').map(str::trim).collect(),
        };
        records.push(MessageRecord {
            msg_id: row.text(msg_id, COL_MSG_ID)?.to_string(),
            ad_bytes: row.number(ad_bytes, COL_AD_BYTES)?,
            msg_bytes: row.number(msg_bytes, COL_MSG_BYTES)?,
            decrypt: row.flag(decrypt, COL_DECRYPT)?,
            hash: row.flag(hash, COL_HASH)?,
            new_key: row.flag(new_key, COL_NEW_KEY)?,
            long_n1: row.flag(long_n1, COL_LONG_N1)?,
        });
    }
    Ok(records)
}

/// Read and parse a metadata file.
pub fn from_file(path: &Path) -> anyhow::Result<Vec<MessageRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read message metadata {}", path.display()))?;
    let records = parse(&text)
        .with_context(|| format!("malformed message metadata {}", path.display()))?;
    Ok(records)
}
