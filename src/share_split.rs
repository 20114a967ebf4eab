//! Share interleaving for masked PDI/SDI test-vector files
//!
//! A masked core reads each logical bus word as `num_shares` consecutive
//! physical words. Driving those shares back-to-back correlates adjacent bus
//! cycles that belong to the same secret, so the interleaver inserts an
//! all-zero spacer word after every share except the last one of each run.
//! The spacer rule uses the absolute word position over the whole stream,
//! `(pos + 1) % num_shares`, and is NOT reset at record boundaries; a stream
//! whose word count is not a multiple of `num_shares` therefore gets its
//! trailing partial run padded by the same rule, which can leave a spacer
//! after the very last word. That tail behavior is kept as-is for
//! compatibility with existing shared KAT files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// Errors for share-layout construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("bus width must be at least 4 bits, got {0}")]
    BusTooNarrow(u32),

    #[error("bus width must be a multiple of 4 bits, got {0}")]
    BusNotNibbleAligned(u32),

    #[error("share count must be at least 1")]
    NoShares,
}

/// Physical layout of a multi-share input port.
///
/// `bus_width` is the width of one share word in bits; `num_shares` is the
/// number of shares per logical word (masking order + 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareLayout {
    bus_width: u32,
    num_shares: u32,
}

impl ShareLayout {
    /// Create a validated layout.
    pub fn new(bus_width: u32, num_shares: u32) -> Result<Self, LayoutError> {
        if bus_width < 4 {
            return Err(LayoutError::BusTooNarrow(bus_width));
        }
        if bus_width % 4 != 0 {
            return Err(LayoutError::BusNotNibbleAligned(bus_width));
        }
        if num_shares == 0 {
            return Err(LayoutError::NoShares);
        }
        Ok(Self {
            bus_width,
            num_shares,
        })
    }

    /// Width of one bus word in hex digits.
    pub fn word_width(&self) -> usize {
        (self.bus_width / 4) as usize
    }

    /// Number of shares per logical word.
    pub fn num_shares(&self) -> u32 {
        self.num_shares
    }

    /// Rewrite a flat hex word stream into the physical bus layout,
    /// inserting one all-zero spacer word after every word whose absolute
    /// position `pos` satisfies `(pos + 1) % num_shares != 0`.
    ///
    /// The input is chunked into words of [`Self::word_width`] hex digits in
    /// original order; a trailing partial word keeps its shorter length but
    /// still gets a full-width spacer if the position rule asks for one.
    /// Payloads are not validated as hexadecimal; whatever is in the line
    /// flows through the same chunking.
    pub fn interleave(&self, data: &str) -> String {
        let width = self.word_width();
        let shares = self.num_shares as usize;
        let zero_word = "0".repeat(width);
        let chars: Vec<char> = data.chars().collect();

        let mut out = String::with_capacity(data.len() * 2);
        for (pos, word) in chars.chunks(width).enumerate() {
            out.extend(word.iter());
            if (pos + 1) % shares != 0 {
                out.push_str(&zero_word);
            }
        }
        out
    }

    /// Apply [`Self::interleave`] to every recognized line of a test-vector
    /// file body, passing all other lines through unchanged.
    pub fn split_text(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() * 2);
        for piece in input.split_inclusive('\n') {
            let line = piece.strip_suffix('\n').unwrap_or(piece);
            match VectorLine::parse(line) {
                VectorLine::Tagged { key, value } => {
                    out.push_str(key.as_str());
                    out.push_str(" = ");
                    out.push_str(&self.interleave(value));
                    out.push('\n');
                }
                VectorLine::Other(_) => out.push_str(piece),
            }
        }
        out
    }

    /// Transform `path` and write the result next to it as
    /// `split_<file name>`. Returns the output path.
    pub fn split_file(&self, path: &Path) -> Result<PathBuf> {
        let name = path
            .file_name()
            .with_context(|| format!("{} has no file name", path.display()))?;
        let mut out_name = std::ffi::OsString::from("split_");
        out_name.push(name);
        let out_path = path.with_file_name(out_name);

        let input = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        fs::write(&out_path, self.split_text(&input))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        Ok(out_path)
    }
}

/// Segment keys whose payload is bus data and must be interleaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKey {
    Ins,
    Hdr,
    Dat,
}

impl SegmentKey {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "INS" => Some(Self::Ins),
            "HDR" => Some(Self::Hdr),
            "DAT" => Some(Self::Dat),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Ins => "INS",
            Self::Hdr => "HDR",
            Self::Dat => "DAT",
        }
    }
}

/// One line of a test-vector file, parsed into a tagged record before any
/// dispatch happens.
#[derive(Debug, PartialEq, Eq)]
enum VectorLine<'a> {
    /// `KEY = <payload>` with a recognized key.
    Tagged { key: SegmentKey, value: &'a str },
    /// Anything else: comments, status lines, blank lines.
    Other(&'a str),
}

impl<'a> VectorLine<'a> {
    fn parse(line: &'a str) -> Self {
        if let Some((tag, value)) = line.split_once('=') {
            if let Some(key) = SegmentKey::from_tag(tag.trim()) {
                return VectorLine::Tagged {
                    key,
                    value: value.trim(),
                };
            }
        }
        VectorLine::Other(line)
    }
}
