#![no_main]

use flate2::read::DeflateDecoder;
use libfuzzer_sys::fuzz_target;
use rawflate::{compress, Strategy};
use std::io::Read;

fuzz_target!(|data: &[u8]| {
    for strategy in [Strategy::Fixed, Strategy::Dynamic] {
        let compressed = compress(data, strategy).expect("compression never fails");

        let mut decoder = DeflateDecoder::new(&compressed[..]);
        let mut inflated = Vec::new();
        decoder.read_to_end(&mut inflated).expect("stream must inflate");
        assert_eq!(inflated, data, "{} round trip mismatch", strategy);
    }
});
