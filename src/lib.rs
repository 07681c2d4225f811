pub mod bits;
pub mod compressor;
pub mod deflate;
pub mod error;
pub mod huffman;

pub use compressor::Compressor;
pub use deflate::{Matcher, Token};
pub use error::{Error, Result};
pub use huffman::{BlockEncoder, HuffmanCode};

use std::fmt;
use std::str::FromStr;

use deflate::matcher::DEFAULT_MAX_CHAIN;

/// Huffman table strategy for every block of a stream
///
/// - `Fixed`: the static tables from RFC 1951 section 3.2.6 (BTYPE=01)
/// - `Dynamic`: tables built from each block's own symbol counts (BTYPE=10)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    Fixed,
    #[default]
    Dynamic,
}

impl Strategy {
    /// BTYPE value written in each block header
    pub fn btype(&self) -> u8 {
        match self {
            Self::Fixed => 0b01,
            Self::Dynamic => 0b10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Dynamic => "dynamic",
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "dynamic" => Ok(Self::Dynamic),
            _ => Err(Error::InvalidStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for compression
#[derive(Clone, Debug)]
pub struct CompressConfig {
    /// Huffman table strategy
    pub strategy: Strategy,
    /// Maximum uncompressed bytes per block (None or 0 = one block)
    pub block_size: Option<usize>,
    /// Hash chain candidates examined per position (0 = literals only)
    pub max_chain: usize,
}

impl CompressConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy, ..Default::default() }
    }

    /// Block size limit, if blocks are split at all
    pub fn block_limit(&self) -> Option<usize> {
        self.block_size.filter(|&size| size > 0)
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self { strategy: Strategy::Dynamic, block_size: None, max_chain: DEFAULT_MAX_CHAIN }
    }
}

/// Statistics from a compression run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub blocks_written: u64,
    pub literals: u64,
    pub matches: u64,
    /// Input bytes covered by matches
    pub matched_bytes: u64,
}

/// Compress `input` into a raw DEFLATE stream (no zlib or gzip framing).
///
/// Succeeds for every finite input; empty input yields a single empty
/// final block. An error means an internal invariant broke and the encode
/// was abandoned.
pub fn compress(input: &[u8], strategy: Strategy) -> Result<Vec<u8>> {
    Compressor::new(CompressConfig::new(strategy)).compress(input)
}
