pub mod code;
pub mod dynamic;
pub mod encoder;
pub mod tables;

pub use code::HuffmanCode;
pub use dynamic::{DynamicTables, FrequencyCounter};
pub use encoder::BlockEncoder;
pub use tables::FixedTables;
