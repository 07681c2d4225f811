//! Per-block Huffman tables for BTYPE=10 blocks (RFC 1951 section 3.2.7).

use log::trace;

use super::code::{compute_code_lengths, HuffmanCode};
use crate::bits::BitWriter;
use crate::deflate::tables::{
    CODE_LENGTH_ORDER, END_OF_BLOCK, NUM_CODE_LENGTH_CODES, NUM_DISTANCE_CODES, NUM_LITERAL_CODES,
};
use crate::deflate::tokens::Token;
use crate::error::Result;

/// Maximum code length for literal/length and distance alphabets (RFC 1951)
pub const MAX_CODE_LENGTH: u8 = 15;

/// Maximum code length for the code length alphabet
pub const MAX_CL_CODE_LENGTH: u8 = 7;

/// Frequency counter for dynamic Huffman code generation
#[derive(Clone, Debug)]
pub struct FrequencyCounter {
    /// Frequencies for literal (0-255), EOB (256), and length codes (257-285)
    pub literal_freq: [u32; NUM_LITERAL_CODES],
    /// Frequencies for distance codes (0-29)
    pub distance_freq: [u32; NUM_DISTANCE_CODES],
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self { literal_freq: [0; NUM_LITERAL_CODES], distance_freq: [0; NUM_DISTANCE_CODES] }
    }

    /// Count the symbols of one block, including its end-of-block marker
    pub fn from_tokens(tokens: &[Token]) -> Result<Self> {
        let mut freq = Self::new();
        freq.count_tokens(tokens)?;
        freq.literal_freq[END_OF_BLOCK as usize] += 1;
        Ok(freq)
    }

    /// Count frequencies from tokens
    pub fn count_tokens(&mut self, tokens: &[Token]) -> Result<()> {
        for token in tokens {
            let (sym, dist) = token.to_symbols()?;
            self.literal_freq[sym.code as usize] += 1;
            if let Some(dist) = dist {
                self.distance_freq[dist.code as usize] += 1;
            }
        }
        Ok(())
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry of the run-length coded code length sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeLengthSymbol {
    /// 0-15 = literal length, 16 = repeat previous, 17/18 = repeat zero
    pub symbol: u8,
    /// Repeat count minus the symbol's minimum
    pub extra: u8,
}

impl CodeLengthSymbol {
    fn length(len: u8) -> Self {
        Self { symbol: len, extra: 0 }
    }

    /// Repeat the previous length 3-6 times
    fn repeat_previous(count: usize) -> Self {
        debug_assert!((3..=6).contains(&count));
        Self { symbol: 16, extra: (count - 3) as u8 }
    }

    /// 3-10 zeros, or 11-138 zeros
    fn repeat_zero(count: usize) -> Self {
        debug_assert!((3..=138).contains(&count));
        if count <= 10 {
            Self { symbol: 17, extra: (count - 3) as u8 }
        } else {
            Self { symbol: 18, extra: (count - 11) as u8 }
        }
    }

    pub fn extra_bits(&self) -> u8 {
        match self.symbol {
            16 => 2,
            17 => 3,
            18 => 7,
            _ => 0,
        }
    }
}

/// Run-length encode a code length sequence with symbols 16, 17 and 18
pub fn rle_encode_lengths(lengths: &[u8]) -> Vec<CodeLengthSymbol> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < lengths.len() {
        let len = lengths[i];
        let run = lengths[i..].iter().take_while(|&&l| l == len).count();
        let mut left = run;

        if len == 0 {
            while left >= 3 {
                let count = left.min(138);
                out.push(CodeLengthSymbol::repeat_zero(count));
                left -= count;
            }
        } else {
            out.push(CodeLengthSymbol::length(len));
            left -= 1;
            while left >= 3 {
                let count = left.min(6);
                out.push(CodeLengthSymbol::repeat_previous(count));
                left -= count;
            }
        }
        out.extend(std::iter::repeat(CodeLengthSymbol::length(len)).take(left));

        i += run;
    }

    out
}

/// Everything a dynamic block header transmits
#[derive(Clone, Debug)]
pub struct DynamicTables {
    /// Literal/length code, trimmed to HLIT + 257 symbols
    pub literal: HuffmanCode,
    /// Distance code, trimmed to HDIST + 1 symbols
    pub distance: HuffmanCode,
    /// Code for the 19-symbol code length alphabet
    pub code_length: HuffmanCode,
    /// Run-length coded literal/length + distance code lengths
    pub rle: Vec<CodeLengthSymbol>,
    /// Number of code length code lengths transmitted (HCLEN + 4)
    pub num_cl_codes: usize,
}

impl DynamicTables {
    /// Build the tables for a block with the given symbol frequencies
    pub fn build(freq: &FrequencyCounter) -> Self {
        let mut lit_lengths = compute_code_lengths(&freq.literal_freq, MAX_CODE_LENGTH);
        trim_trailing_zeros(&mut lit_lengths, 257);

        let mut dist_lengths = compute_code_lengths(&freq.distance_freq, MAX_CODE_LENGTH);
        trim_trailing_zeros(&mut dist_lengths, 1);

        let combined: Vec<u8> = lit_lengths.iter().chain(&dist_lengths).copied().collect();
        let rle = rle_encode_lengths(&combined);

        let mut cl_freq = [0u32; NUM_CODE_LENGTH_CODES];
        for entry in &rle {
            cl_freq[entry.symbol as usize] += 1;
        }
        let code_length = HuffmanCode::from_frequencies(&cl_freq, MAX_CL_CODE_LENGTH);

        let num_cl_codes = CODE_LENGTH_ORDER
            .iter()
            .rposition(|&sym| code_length.lengths()[sym] > 0)
            .map_or(4, |last| (last + 1).max(4));

        let tables = Self {
            literal: HuffmanCode::from_lengths(&lit_lengths),
            distance: HuffmanCode::from_lengths(&dist_lengths),
            code_length,
            rle,
            num_cl_codes,
        };

        trace!(
            "dynamic tables: hlit={} hdist={} hclen={} rle={} max_lit={} max_dist={}",
            tables.literal.len(),
            tables.distance.len(),
            tables.num_cl_codes,
            tables.rle.len(),
            tables.literal.max_length(),
            tables.distance.max_length()
        );

        tables
    }

    /// Write HLIT, HDIST, HCLEN, the code length code lengths and the
    /// run-length coded code lengths
    pub fn write_header(&self, writer: &mut BitWriter) -> Result<()> {
        writer.write_bits((self.literal.len() - 257) as u32, 5);
        writer.write_bits((self.distance.len() - 1) as u32, 5);
        writer.write_bits((self.num_cl_codes - 4) as u32, 4);

        for &sym in CODE_LENGTH_ORDER.iter().take(self.num_cl_codes) {
            writer.write_bits(self.code_length.lengths()[sym] as u32, 3);
        }

        for entry in &self.rle {
            self.code_length.write(writer, entry.symbol as usize)?;
            writer.write_bits(entry.extra as u32, entry.extra_bits());
        }

        Ok(())
    }

    /// Size of the header in bits
    pub fn header_bits(&self) -> u64 {
        let rle_bits: u64 = self
            .rle
            .iter()
            .map(|e| {
                self.code_length.lengths()[e.symbol as usize] as u64 + e.extra_bits() as u64
            })
            .sum();
        5 + 5 + 4 + 3 * self.num_cl_codes as u64 + rle_bits
    }
}

fn trim_trailing_zeros(lengths: &mut Vec<u8>, min_len: usize) {
    let used = lengths.iter().rposition(|&l| l > 0).map_or(0, |last| last + 1);
    lengths.truncate(used.max(min_len));
}
