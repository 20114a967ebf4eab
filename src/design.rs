//! LWC design description
//!
//! A design TOML names the core under test and describes the interface the
//! benchmark needs: AEAD/hash algorithms, PDI/SDI/RDI port geometry, the
//! claimed SCA protection, and the simulation command. Design files carry
//! plenty of other sections (RTL source lists, testbench wiring) that this
//! harness never reads; unknown keys are ignored.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const ENCRYPT_SEGMENTS: [&str; 4] = ["npub", "ad", "pt", "tag"];
const DECRYPT_SEGMENTS: [&str; 4] = ["npub", "ad", "ct", "tag"];

fn default_bus_width() -> u32 {
    32
}

fn default_num_shares() -> u32 {
    1
}

fn default_block_bits() -> u32 {
    128
}

fn default_encrypt_sequence() -> Vec<String> {
    ENCRYPT_SEGMENTS.map(String::from).to_vec()
}

fn default_decrypt_sequence() -> Vec<String> {
    DECRYPT_SEGMENTS.map(String::from).to_vec()
}

/// Order in which input segment types are fed to the PDI port.
#[derive(Debug, Clone, Deserialize)]
pub struct InputSequence {
    #[serde(default = "default_encrypt_sequence")]
    pub encrypt: Vec<String>,
    #[serde(default = "default_decrypt_sequence")]
    pub decrypt: Vec<String>,
}

/// AEAD scheme details. Algorithm names follow the SUPERCOP convention
/// (`giftcofb128v1`, `romulusn1v12`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Aead {
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub key_bits: Option<u32>,
    #[serde(default)]
    pub npub_bits: Option<u32>,
    #[serde(default)]
    pub tag_bits: Option<u32>,
    #[serde(default)]
    pub input_sequence: Option<InputSequence>,
    /// Generate key-reuse test pairs during benchmarking.
    #[serde(default)]
    pub key_reuse: bool,
}

/// Hash scheme details. An empty algorithm string means hashing is not
/// supported by the core.
#[derive(Debug, Clone, Deserialize)]
pub struct Hash {
    pub algorithm: String,
    #[serde(default)]
    pub digest_bits: Option<u32>,
}

/// A masked input port (PDI or SDI). The physical port signal is
/// `bit_width x num_shares` bits wide.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MaskedPort {
    /// Width of one data word in bits (`w` / `sw`).
    #[serde(default = "default_bus_width")]
    pub bit_width: u32,
    /// Number of shares on the port (`n` / `sn`).
    #[serde(default = "default_num_shares")]
    pub num_shares: u32,
}

/// The random data input port; width 0 means the port is unused.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RdiPort {
    #[serde(default)]
    pub bit_width: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ports {
    pub pdi: MaskedPort,
    pub sdi: MaskedPort,
    #[serde(default)]
    pub rdi: Option<RdiPort>,
}

/// Claimed side-channel countermeasures. Informational; the harness only
/// reports these, it cannot verify them.
#[derive(Debug, Clone, Deserialize)]
pub struct ScaProtection {
    #[serde(default)]
    pub target: Option<Vec<String>>,
    #[serde(default)]
    pub masking_schemes: Vec<String>,
    /// Claimed protection order; 0 means unprotected.
    pub order: u32,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Block sizes in bits used by the test-vector generator.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BlockSize {
    #[serde(default = "default_block_bits")]
    pub xt: u32,
    #[serde(default = "default_block_bits")]
    pub ad: u32,
    #[serde(default = "default_block_bits")]
    pub hm: u32,
}

impl Default for BlockSize {
    fn default() -> Self {
        Self {
            xt: 128,
            ad: 128,
            hm: 128,
        }
    }
}

/// The `lwc` section of a design file.
#[derive(Debug, Clone, Deserialize)]
pub struct Lwc {
    #[serde(default)]
    pub aead: Option<Aead>,
    #[serde(default)]
    pub hash: Option<Hash>,
    pub ports: Ports,
    #[serde(default)]
    pub sca_protection: Option<ScaProtection>,
    #[serde(default)]
    pub block_size: BlockSize,
}

impl Lwc {
    /// AEAD algorithm name, when one is declared and non-empty.
    pub fn aead_algorithm(&self) -> Option<&str> {
        self.aead
            .as_ref()
            .and_then(|aead| aead.algorithm.as_deref())
            .filter(|algorithm| !algorithm.is_empty())
    }

    /// Hash algorithm name, when hashing is supported.
    pub fn hash_algorithm(&self) -> Option<&str> {
        self.hash
            .as_ref()
            .map(|hash| hash.algorithm.as_str())
            .filter(|algorithm| !algorithm.is_empty())
    }

    /// RDI width in bits, when the port exists and is used.
    pub fn rdi_width(&self) -> Option<u32> {
        self.ports
            .rdi
            .map(|rdi| rdi.bit_width)
            .filter(|width| *width > 0)
    }

    /// Whether either input port carries more than one share, i.e. the
    /// generated vectors need share expansion before simulation.
    pub fn uses_shares(&self) -> bool {
        self.ports.pdi.num_shares > 1 || self.ports.sdi.num_shares > 1
    }

    fn validate(&self) -> Result<(), String> {
        validate_masked_port("pdi", self.ports.pdi)?;
        validate_masked_port("sdi", self.ports.sdi)?;
        if let Some(rdi) = self.ports.rdi {
            if rdi.bit_width > 2048 {
                return Err(format!(
                    "rdi.bit_width must be at most 2048, got {}",
                    rdi.bit_width
                ));
            }
        }
        if let Some(sequence) = self.aead.as_ref().and_then(|aead| aead.input_sequence.as_ref()) {
            validate_sequence("encrypt", &sequence.encrypt, &ENCRYPT_SEGMENTS)?;
            validate_sequence("decrypt", &sequence.decrypt, &DECRYPT_SEGMENTS)?;
        }
        Ok(())
    }
}

fn validate_masked_port(name: &str, port: MaskedPort) -> Result<(), String> {
    if !(8..=32).contains(&port.bit_width) {
        return Err(format!(
            "{name}.bit_width must be in [8, 32], got {}",
            port.bit_width
        ));
    }
    if port.num_shares < 1 {
        return Err(format!(
            "{name}.num_shares must be at least 1, got {}",
            port.num_shares
        ));
    }
    Ok(())
}

fn validate_sequence(kind: &str, sequence: &[String], allowed: &[&str]) -> Result<(), String> {
    for segment in sequence {
        if !allowed.contains(&segment.as_str()) {
            return Err(format!("unknown {kind} input segment {segment:?}"));
        }
    }
    Ok(())
}

/// Simulation flow configuration: the command that runs the testbench.
/// Generics are appended as `-gNAME=VALUE` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct SimFlow {
    pub command: Vec<String>,
}

/// A complete design description as loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct LwcDesign {
    pub name: String,
    pub lwc: Lwc,
    #[serde(default)]
    pub sim: Option<SimFlow>,
}

impl LwcDesign {
    /// Load and validate a design file.
    pub fn from_toml(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read design file {}", path.display()))?;
        let design: Self = toml::from_str(&text)
            .with_context(|| format!("invalid design TOML {}", path.display()))?;
        design
            .validate()
            .map_err(|reason| anyhow!("invalid design {}: {reason}", path.display()))?;
        Ok(design)
    }

    /// Validate the loaded model.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("design name must not be empty".to_string());
        }
        if let Some(sim) = &self.sim {
            if sim.command.is_empty() {
                return Err("sim.command must not be empty".to_string());
            }
        }
        self.lwc.validate()
    }
}
