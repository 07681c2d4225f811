#![no_main]

use flate2::read::DeflateDecoder;
use libfuzzer_sys::fuzz_target;
use rawflate::{CompressConfig, Compressor, Strategy};
use std::io::Read;

// First two bytes choose the block size and search depth, the rest is payload
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let block_size = data[0] as usize * 16;
    let max_chain = data[1] as usize;
    let payload = &data[2..];

    for strategy in [Strategy::Fixed, Strategy::Dynamic] {
        let config = CompressConfig { strategy, block_size: Some(block_size), max_chain };
        let mut compressor = Compressor::new(config);
        let compressed = compressor.compress(payload).expect("compression never fails");

        let mut decoder = DeflateDecoder::new(&compressed[..]);
        let mut inflated = Vec::new();
        decoder.read_to_end(&mut inflated).expect("stream must inflate");
        assert_eq!(inflated, payload);
    }
});
