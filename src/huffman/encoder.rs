use log::trace;

use super::code::HuffmanCode;
use super::dynamic::{DynamicTables, FrequencyCounter};
use super::tables::FixedTables;
use crate::bits::BitWriter;
use crate::deflate::tables::END_OF_BLOCK;
use crate::deflate::tokens::{Symbol, Token};
use crate::error::Result;
use crate::Strategy;

/// Writes complete DEFLATE blocks for a fixed strategy
pub struct BlockEncoder {
    strategy: Strategy,
}

impl BlockEncoder {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Emit one block: 3-bit header, table description (dynamic only),
    /// every token, then end-of-block.
    pub fn encode_block(
        &self,
        writer: &mut BitWriter,
        tokens: &[Token],
        is_final: bool,
    ) -> Result<()> {
        writer.write_bit(is_final); // BFINAL
        writer.write_bits(self.strategy.btype() as u32, 2); // BTYPE

        match self.strategy {
            Strategy::Fixed => {
                let fixed = FixedTables::get();
                write_tokens(writer, tokens, &fixed.literal, &fixed.distance)
            }
            Strategy::Dynamic => {
                let freq = FrequencyCounter::from_tokens(tokens)?;
                let tables = DynamicTables::build(&freq);
                let header_start = writer.bit_len();
                tables.write_header(writer)?;
                trace!("dynamic header: {} bits", writer.bit_len() - header_start);
                write_tokens(writer, tokens, &tables.literal, &tables.distance)
            }
        }
    }
}

/// Encode tokens with the given literal/length and distance codes,
/// finishing with the end-of-block symbol
fn write_tokens(
    writer: &mut BitWriter,
    tokens: &[Token],
    lit_codes: &HuffmanCode,
    dist_codes: &HuffmanCode,
) -> Result<()> {
    for token in tokens {
        let (sym, dist) = token.to_symbols()?;
        write_symbol(writer, lit_codes, sym)?;
        if let Some(dist) = dist {
            write_symbol(writer, dist_codes, dist)?;
        }
    }
    write_symbol(writer, lit_codes, Symbol::plain(END_OF_BLOCK))
}

#[inline]
fn write_symbol(writer: &mut BitWriter, codes: &HuffmanCode, sym: Symbol) -> Result<()> {
    codes.write(writer, sym.code as usize)?;
    writer.write_bits(sym.extra_value as u32, sym.extra_bits);
    Ok(())
}
