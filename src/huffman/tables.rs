use std::sync::OnceLock;

use super::code::HuffmanCode;

/// Fixed Huffman literal/length code lengths (RFC 1951 section 3.2.6)
pub fn fixed_literal_lengths() -> [u8; 288] {
    let mut lengths = [0u8; 288];
    lengths[0..=143].fill(8); // 0-143: 8 bits
    lengths[144..=255].fill(9); // 144-255: 9 bits
    lengths[256..=279].fill(7); // 256-279: 7 bits
    lengths[280..=287].fill(8); // 280-287: 8 bits
    lengths
}

/// Fixed Huffman distance code lengths (all 5 bits)
pub fn fixed_distance_lengths() -> [u8; 30] {
    [5u8; 30]
}

/// The two static code tables used by BTYPE=01 blocks
#[derive(Debug)]
pub struct FixedTables {
    pub literal: HuffmanCode,
    pub distance: HuffmanCode,
}

impl FixedTables {
    pub fn new() -> Self {
        Self {
            literal: HuffmanCode::from_lengths(&fixed_literal_lengths()),
            distance: HuffmanCode::from_lengths(&fixed_distance_lengths()),
        }
    }

    /// Process-wide instance, built on first use
    pub fn get() -> &'static FixedTables {
        static TABLES: OnceLock<FixedTables> = OnceLock::new();
        TABLES.get_or_init(FixedTables::new)
    }
}

impl Default for FixedTables {
    fn default() -> Self {
        Self::new()
    }
}
