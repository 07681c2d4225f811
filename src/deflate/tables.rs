//! Format constants from RFC 1951 section 3.2.5 and the reverse lookups
//! used to turn match lengths and distances into alphabet symbols.

use super::tokens::Symbol;

/// Size of the LZ77 sliding window
pub const WINDOW_SIZE: usize = 32768;

/// Shortest back-reference DEFLATE can express
pub const MIN_MATCH: usize = 3;

/// Longest back-reference DEFLATE can express
pub const MAX_MATCH: usize = 258;

/// End-of-block symbol in the literal/length alphabet
pub const END_OF_BLOCK: u16 = 256;

/// Literal/length symbols that may appear in a block (0-285)
pub const NUM_LITERAL_CODES: usize = 286;

/// Distance symbols that may appear in a block (0-29)
pub const NUM_DISTANCE_CODES: usize = 30;

/// Symbols in the code length alphabet (0-18)
pub const NUM_CODE_LENGTH_CODES: usize = 19;

/// Length codes 257-285: base length and extra bits
/// Index by (code - 257)
pub const LENGTH_TABLE: [(u16, u8); 29] = [
    // (base_length, extra_bits)
    (3, 0),   // 257
    (4, 0),   // 258
    (5, 0),   // 259
    (6, 0),   // 260
    (7, 0),   // 261
    (8, 0),   // 262
    (9, 0),   // 263
    (10, 0),  // 264
    (11, 1),  // 265
    (13, 1),  // 266
    (15, 1),  // 267
    (17, 1),  // 268
    (19, 2),  // 269
    (23, 2),  // 270
    (27, 2),  // 271
    (31, 2),  // 272
    (35, 3),  // 273
    (43, 3),  // 274
    (51, 3),  // 275
    (59, 3),  // 276
    (67, 4),  // 277
    (83, 4),  // 278
    (99, 4),  // 279
    (115, 4), // 280
    (131, 5), // 281
    (163, 5), // 282
    (195, 5), // 283
    (227, 5), // 284
    (258, 0), // 285 - special case
];

/// Distance codes 0-29: base distance and extra bits
pub const DISTANCE_TABLE: [(u16, u8); 30] = [
    // (base_distance, extra_bits)
    (1, 0),      // 0
    (2, 0),      // 1
    (3, 0),      // 2
    (4, 0),      // 3
    (5, 1),      // 4
    (7, 1),      // 5
    (9, 2),      // 6
    (13, 2),     // 7
    (17, 3),     // 8
    (25, 3),     // 9
    (33, 4),     // 10
    (49, 4),     // 11
    (65, 5),     // 12
    (97, 5),     // 13
    (129, 6),    // 14
    (193, 6),    // 15
    (257, 7),    // 16
    (385, 7),    // 17
    (513, 8),    // 18
    (769, 8),    // 19
    (1025, 9),   // 20
    (1537, 9),   // 21
    (2049, 10),  // 22
    (3073, 10),  // 23
    (4097, 11),  // 24
    (6145, 11),  // 25
    (8193, 12),  // 26
    (12289, 12), // 27
    (16385, 13), // 28
    (24577, 13), // 29
];

/// Order of code length alphabet for dynamic Huffman blocks
pub const CODE_LENGTH_ORDER: [usize; 19] =
    [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// (length - 3) -> (length code - 257)
static LENGTH_CODE: [u8; 256] = build_length_lookup();

/// (distance - 1) -> distance code. The low half is indexed directly for
/// distances up to 256; above that every code spans a multiple of 128, so
/// the high half is indexed by `256 + ((distance - 1) >> 7)`.
static DISTANCE_CODE: [u8; 512] = build_distance_lookup();

const fn build_length_lookup() -> [u8; 256] {
    let mut lookup = [0u8; 256];
    let mut code = 0;
    while code < 28 {
        let (base, extra) = LENGTH_TABLE[code];
        let mut i = 0;
        while i < (1usize << extra) {
            lookup[base as usize + i - MIN_MATCH] = code as u8;
            i += 1;
        }
        code += 1;
    }
    // 258 has its own zero-extra-bit code even though 284 could reach it
    lookup[MAX_MATCH - MIN_MATCH] = 28;
    lookup
}

const fn build_distance_lookup() -> [u8; 512] {
    let mut lookup = [0u8; 512];
    let mut code = 0;
    while code < NUM_DISTANCE_CODES {
        let (base, extra) = DISTANCE_TABLE[code];
        let mut i = 0;
        while i < (1usize << extra) {
            let d = base as usize - 1 + i;
            if d < 256 {
                lookup[d] = code as u8;
                i += 1;
            } else {
                lookup[256 + (d >> 7)] = code as u8;
                i += 128;
            }
        }
        code += 1;
    }
    lookup
}

/// Map a match length (3-258) to its length symbol (257-285)
pub fn length_symbol(length: u16) -> Option<Symbol> {
    if !(MIN_MATCH as u16..=MAX_MATCH as u16).contains(&length) {
        return None;
    }

    let idx = LENGTH_CODE[(length as usize) - MIN_MATCH] as usize;
    let (base, extra_bits) = LENGTH_TABLE[idx];
    Some(Symbol { code: 257 + idx as u16, extra_value: length - base, extra_bits })
}

/// Map a match distance (1-32768) to its distance symbol (0-29)
pub fn distance_symbol(distance: u16) -> Option<Symbol> {
    if distance == 0 || distance as usize > WINDOW_SIZE {
        return None;
    }

    let d = (distance - 1) as usize;
    let idx = (if d < 256 { DISTANCE_CODE[d] } else { DISTANCE_CODE[256 + (d >> 7)] }) as usize;
    let (base, extra_bits) = DISTANCE_TABLE[idx];
    Some(Symbol { code: idx as u16, extra_value: distance - base, extra_bits })
}
