//! Canonical Huffman codes (RFC 1951 section 3.2.2).
//!
//! Code lengths come from an index-based Huffman tree: nodes live in one
//! `Vec`, leaves first in symbol order, and internal nodes refer to their
//! children by index. Lengths that overflow the format limit are folded
//! back with the usual bit-length count adjustment.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::bits::BitWriter;
use crate::error::{Error, Result};

/// A canonical prefix code over a fixed-size alphabet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanCode {
    /// Code length per symbol (0 = symbol has no code)
    lengths: Vec<u8>,
    /// (code, length) per symbol, code stored MSB-first
    codes: Vec<(u32, u8)>,
}

impl HuffmanCode {
    /// Build the canonical code for the given per-symbol lengths
    pub fn from_lengths(lengths: &[u8]) -> Self {
        Self { lengths: lengths.to_vec(), codes: build_codes_from_lengths(lengths) }
    }

    /// Build a length-limited code for the given symbol frequencies
    pub fn from_frequencies(frequencies: &[u32], max_bits: u8) -> Self {
        Self::from_lengths(&compute_code_lengths(frequencies, max_bits))
    }

    /// `(code, length)` for `symbol`, or `None` if it has no code
    #[inline]
    pub fn code(&self, symbol: usize) -> Option<(u32, u8)> {
        match self.codes.get(symbol) {
            Some(&(code, len)) if len > 0 => Some((code, len)),
            _ => None,
        }
    }

    pub fn lengths(&self) -> &[u8] {
        &self.lengths
    }

    /// Alphabet size
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn max_length(&self) -> u8 {
        self.lengths.iter().copied().max().unwrap_or(0)
    }

    /// Sum of 2^-length over every coded symbol. Exactly 1.0 for a
    /// complete prefix code.
    pub fn kraft_sum(&self) -> f64 {
        self.lengths.iter().filter(|&&l| l > 0).map(|&l| 2f64.powi(-(l as i32))).sum()
    }

    /// Emit the code for `symbol`
    #[inline]
    pub fn write(&self, writer: &mut BitWriter, symbol: usize) -> Result<()> {
        let (code, len) = self
            .code(symbol)
            .ok_or_else(|| Error::Internal(format!("no Huffman code for symbol {}", symbol)))?;
        writer.write_bits_reversed(code, len);
        Ok(())
    }

    /// Total bits needed to code symbols with the given frequencies
    pub fn cost(&self, frequencies: &[u32]) -> u64 {
        frequencies.iter().zip(&self.lengths).map(|(&f, &l)| f as u64 * l as u64).sum()
    }
}

/// Compute Huffman code lengths for `frequencies`, no longer than
/// `max_bits`.
///
/// Symbols with zero frequency get length 0. When fewer than two symbols
/// are used, the lowest unused symbols are promoted so that the result is
/// always a complete code of at least two 1-bit entries; a lone code would
/// leave decoders with an incomplete table.
pub fn compute_code_lengths(frequencies: &[u32], max_bits: u8) -> Vec<u8> {
    let n = frequencies.len();
    let mut lengths = vec![0u8; n];
    if n == 0 {
        return lengths;
    }

    let mut used: Vec<usize> = (0..n).filter(|&s| frequencies[s] > 0).collect();
    if used.len() < 2 {
        for sym in 0..n {
            if used.len() == 2 {
                break;
            }
            if !used.contains(&sym) {
                used.push(sym);
            }
        }
        for &sym in &used {
            lengths[sym] = 1;
        }
        return lengths;
    }

    let depths = tree_depths(frequencies, &used);
    for (&sym, &depth) in used.iter().zip(&depths) {
        lengths[sym] = depth.min(u8::MAX as u32) as u8;
    }

    if depths.iter().any(|&d| d > max_bits as u32) {
        limit_code_lengths(&mut lengths, frequencies, &used, max_bits);
    }

    lengths
}

/// Tree node: leaves have no children
struct Node {
    children: Option<(usize, usize)>,
}

/// Depth of every used symbol's leaf in a Huffman tree, in `used` order
fn tree_depths(frequencies: &[u32], used: &[usize]) -> Vec<u32> {
    let mut nodes: Vec<Node> = Vec::with_capacity(used.len() * 2 - 1);

    // (weight, node index); the index breaks ties so that construction is
    // fully deterministic
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::with_capacity(used.len());
    for &sym in used {
        heap.push(Reverse((frequencies[sym] as u64, nodes.len())));
        nodes.push(Node { children: None });
    }

    while let (Some(Reverse((w1, a))), Some(Reverse((w2, b)))) = (heap.pop(), heap.pop()) {
        heap.push(Reverse((w1 + w2, nodes.len())));
        nodes.push(Node { children: Some((a, b)) });
    }

    // Parents always sit after their children, so one backwards pass from
    // the root assigns every depth.
    let mut depth = vec![0u32; nodes.len()];
    for idx in (0..nodes.len()).rev() {
        if let Some((a, b)) = nodes[idx].children {
            depth[a] = depth[idx] + 1;
            depth[b] = depth[idx] + 1;
        }
    }

    depth.truncate(used.len());
    depth
}

/// Clamp lengths to `max_bits` while keeping the code complete.
///
/// Overlong codes are pulled up to `max_bits`, then leaves are pushed down
/// from the deepest non-full level until the Kraft sum is exactly one
/// again. Finally the adjusted length histogram is handed back out with
/// the shortest lengths going to the most frequent symbols.
fn limit_code_lengths(lengths: &mut [u8], frequencies: &[u32], used: &[usize], max_bits: u8) {
    let max = max_bits as usize;

    let mut bl_count = vec![0u32; max + 1];
    for &sym in used {
        bl_count[(lengths[sym] as usize).min(max)] += 1;
    }

    // Kraft sum scaled by 2^max_bits
    let mut total: u64 = (1..=max).map(|bits| (bl_count[bits] as u64) << (max - bits)).sum();
    let target = 1u64 << max;

    while total > target {
        // Drop one leaf from the deepest level and split a shallower leaf
        // into two, which frees exactly one slot at max_bits.
        bl_count[max] -= 1;
        if let Some(bits) = (1..max).rev().find(|&bits| bl_count[bits] > 0) {
            bl_count[bits] -= 1;
            bl_count[bits + 1] += 2;
        }
        total -= 1;
    }

    let mut by_weight = used.to_vec();
    by_weight.sort_by(|&a, &b| frequencies[b].cmp(&frequencies[a]).then(a.cmp(&b)));

    let mut syms = by_weight.into_iter();
    for (bits, &count) in bl_count.iter().enumerate().skip(1) {
        for sym in syms.by_ref().take(count as usize) {
            lengths[sym] = bits as u8;
        }
    }
}

/// Build canonical Huffman codes from code lengths
fn build_codes_from_lengths(lengths: &[u8]) -> Vec<(u32, u8)> {
    let max_bits = lengths.iter().copied().max().unwrap_or(0) as usize;

    // Count codes of each length
    let mut bl_count = vec![0u32; max_bits + 1];
    for &len in lengths {
        if len > 0 {
            bl_count[len as usize] += 1;
        }
    }

    // First code for each bit length
    let mut next_code = vec![0u32; max_bits + 1];
    let mut code = 0u32;
    for bits in 1..=max_bits {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    // Equal lengths get consecutive codes in symbol order
    let mut codes = vec![(0u32, 0u8); lengths.len()];
    for (sym, &len) in lengths.iter().enumerate() {
        if len > 0 {
            codes[sym] = (next_code[len as usize], len);
            next_code[len as usize] += 1;
        }
    }

    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_prefix_free(code: &HuffmanCode) {
        let entries: Vec<(u32, u8)> = (0..code.len()).filter_map(|s| code.code(s)).collect();
        for (i, &(c1, l1)) in entries.iter().enumerate() {
            for &(c2, l2) in &entries[i + 1..] {
                let (short, long, ls, ll) =
                    if l1 <= l2 { (c1, c2, l1, l2) } else { (c2, c1, l2, l1) };
                assert_ne!(long >> (ll - ls), short, "code {:b} is a prefix of {:b}", short, long);
            }
        }
    }

    #[test]
    fn test_rfc_example() {
        // RFC 1951 section 3.2.2: lengths (3, 3, 3, 3, 3, 2, 4, 4)
        let code = HuffmanCode::from_lengths(&[3, 3, 3, 3, 3, 2, 4, 4]);
        let expected = [
            (0b010, 3),
            (0b011, 3),
            (0b100, 3),
            (0b101, 3),
            (0b110, 3),
            (0b00, 2),
            (0b1110, 4),
            (0b1111, 4),
        ];
        for (sym, &exp) in expected.iter().enumerate() {
            assert_eq!(code.code(sym), Some(exp), "symbol {}", sym);
        }
        assert_eq!(code.kraft_sum(), 1.0);
    }

    #[test]
    fn test_unused_symbols_have_no_code() {
        let code = HuffmanCode::from_lengths(&[2, 0, 1, 2]);
        assert_eq!(code.code(1), None);
        assert_eq!(code.code(4), None);
        assert_eq!(code.code(2), Some((0b0, 1)));
    }

    #[test]
    fn test_equal_frequencies() {
        let lengths = compute_code_lengths(&[1, 1, 1, 1], 15);
        assert_eq!(lengths, vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_skewed_frequencies() {
        let code = HuffmanCode::from_frequencies(&[100, 1, 1, 1], 15);
        assert_eq!(code.code(0).map(|(_, l)| l), Some(1));
        assert!(code.lengths()[1..].iter().all(|&l| l >= 2));
        assert_eq!(code.kraft_sum(), 1.0);
        assert_prefix_free(&code);
    }

    #[test]
    fn test_optimal_cost() {
        // Classic example: optimal total is 224 bits
        let freqs = [45, 13, 12, 16, 9, 5];
        let code = HuffmanCode::from_frequencies(&freqs, 15);
        assert_eq!(code.cost(&freqs), 224);
    }

    #[test]
    fn test_no_symbols_gets_two_codes() {
        let lengths = compute_code_lengths(&[0, 0, 0], 15);
        assert_eq!(lengths, vec![1, 1, 0]);
    }

    #[test]
    fn test_single_symbol_gets_partner() {
        let lengths = compute_code_lengths(&[0, 0, 0, 7], 15);
        assert_eq!(lengths, vec![1, 0, 0, 1]);

        let lengths = compute_code_lengths(&[7, 0, 0], 15);
        assert_eq!(lengths, vec![1, 1, 0]);

        let code = HuffmanCode::from_lengths(&lengths);
        assert_eq!(code.kraft_sum(), 1.0);
    }

    #[test]
    fn test_single_entry_alphabet() {
        assert_eq!(compute_code_lengths(&[5], 15), vec![1]);
        assert!(compute_code_lengths(&[], 15).is_empty());
    }

    #[test]
    fn test_length_limit_fibonacci() {
        // Fibonacci weights produce a maximally deep tree (depth n - 1)
        let mut freqs = vec![1u32, 1];
        while freqs.len() < 30 {
            let n = freqs.len();
            freqs.push(freqs[n - 1] + freqs[n - 2]);
        }

        let unlimited = compute_code_lengths(&freqs, 32);
        assert!(unlimited.iter().copied().max().unwrap() > 15);

        let code = HuffmanCode::from_frequencies(&freqs, 15);
        assert_eq!(code.max_length(), 15);
        assert_eq!(code.kraft_sum(), 1.0);
        assert_prefix_free(&code);
        // Heavier symbols never get longer codes than lighter ones
        for pair in code.lengths().windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_length_limit_seven_bits() {
        let freqs: Vec<u32> = (0..19).map(|i| 1u32 << i.min(18)).collect();
        let code = HuffmanCode::from_frequencies(&freqs, 7);
        assert!(code.max_length() <= 7);
        assert_eq!(code.kraft_sum(), 1.0);
        assert_prefix_free(&code);
    }

    #[test]
    fn test_many_symbols_complete() {
        let freqs: Vec<u32> = (0..286).map(|i| (i * 7919 % 1000) as u32).collect();
        let code = HuffmanCode::from_frequencies(&freqs, 15);
        assert!(code.max_length() <= 15);
        assert_eq!(code.kraft_sum(), 1.0);
        for (sym, &f) in freqs.iter().enumerate() {
            assert_eq!(f > 0, code.code(sym).is_some(), "symbol {}", sym);
        }
        assert_prefix_free(&code);
    }

    #[test]
    fn test_write_missing_symbol_is_an_error() {
        let code = HuffmanCode::from_lengths(&[1, 0, 1]);
        let mut writer = BitWriter::new();
        code.write(&mut writer, 2).unwrap();
        assert!(matches!(code.write(&mut writer, 1), Err(Error::Internal(_))));
        assert_eq!(writer.finish(), vec![0b1]);
    }

    #[test]
    fn test_deterministic() {
        let freqs: Vec<u32> = (0..100).map(|i| (i % 5 + 1) as u32).collect();
        assert_eq!(compute_code_lengths(&freqs, 15), compute_code_lengths(&freqs, 15));
    }
}
