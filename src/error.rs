use thiserror::Error;

use crate::deflate::tokens::Token;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors (CLI layer only, the encoder itself never touches I/O)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Caller errors
    #[error("Invalid strategy: {0:?} (expected \"fixed\" or \"dynamic\")")]
    InvalidStrategy(String),

    // Encoder invariant violations
    #[error("Unencodable symbol: {0:?} is outside DEFLATE length/distance ranges")]
    UnencodableSymbol(Token),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
