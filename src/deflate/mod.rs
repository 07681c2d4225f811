pub mod matcher;
pub mod tables;
pub mod tokens;

pub use matcher::Matcher;
pub use tokens::{Symbol, Token};
