use super::tables::{distance_symbol, length_symbol, END_OF_BLOCK};
use crate::error::{Error, Result};

/// Represents a single token in the LZ77 stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A literal byte
    Literal(u8),
    /// A back-reference: copy `length` bytes from `distance` bytes back
    Match { length: u16, distance: u16 },
}

impl Token {
    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length as usize,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Token::Match { .. })
    }

    /// Map this token to its literal/length symbol and, for matches, its
    /// distance symbol.
    pub fn to_symbols(&self) -> Result<(Symbol, Option<Symbol>)> {
        match *self {
            Token::Literal(byte) => Ok((Symbol::plain(byte as u16), None)),
            Token::Match { length, distance } => {
                let len = length_symbol(length).ok_or(Error::UnencodableSymbol(*self))?;
                let dist = distance_symbol(distance).ok_or(Error::UnencodableSymbol(*self))?;
                Ok((len, Some(dist)))
            }
        }
    }
}

/// An alphabet index plus the extra bits that pin down the exact value
/// inside the symbol's range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Index into the literal/length (0-285) or distance (0-29) alphabet
    pub code: u16,
    /// Offset from the range base, written LSB-first after the code
    pub extra_value: u16,
    /// Width of `extra_value` in bits
    pub extra_bits: u8,
}

impl Symbol {
    /// A symbol that carries no extra bits
    pub const fn plain(code: u16) -> Self {
        Self { code, extra_value: 0, extra_bits: 0 }
    }

    pub const fn end_of_block() -> Self {
        Self::plain(END_OF_BLOCK)
    }
}
