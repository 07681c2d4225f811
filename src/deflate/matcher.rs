//! LZ77 match finder.
//!
//! The whole input is resident, so the sliding window is simply the 32 KiB
//! of input preceding the cursor. Candidate positions are found through
//! hash chains keyed on the next three bytes: `head` holds the most recent
//! position for each hash and `prev` links every position to the previous
//! one with the same hash.
//!
//! Parsing is greedy. Chains are walked from the most recent candidate
//! backwards and a candidate only replaces the current best when it is
//! strictly longer, so among equal-length matches the shortest distance
//! wins. Output depends only on the input and `max_chain`.

use log::debug;

use super::tables::{MAX_MATCH, MIN_MATCH, WINDOW_SIZE};
use super::tokens::Token;

/// Number of hash buckets (power of 2)
const HASH_BITS: u32 = 15;
const HASH_SIZE: usize = 1 << HASH_BITS;

const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Empty chain link
const NIL: usize = usize::MAX;

/// Default number of chain candidates examined per position
pub const DEFAULT_MAX_CHAIN: usize = 4096;

/// Greedy hash-chain LZ77 matcher
pub struct Matcher {
    /// hash -> most recent position with that hash
    head: Vec<usize>,
    /// (position % WINDOW_SIZE) -> previous position with the same hash
    prev: Vec<usize>,
    /// Chain candidates examined per position (0 disables matching)
    max_chain: usize,
}

impl Matcher {
    pub fn new() -> Self {
        Self::with_max_chain(DEFAULT_MAX_CHAIN)
    }

    pub fn with_max_chain(max_chain: usize) -> Self {
        Self { head: vec![NIL; HASH_SIZE], prev: vec![NIL; WINDOW_SIZE], max_chain }
    }

    pub fn max_chain(&self) -> usize {
        self.max_chain
    }

    /// Convert `input` into a token stream covering every byte exactly once.
    ///
    /// Empty input yields no tokens. Every match satisfies
    /// `3 <= length <= 258` and `1 <= distance <= min(32768, position)`.
    pub fn tokenize(&mut self, input: &[u8]) -> Vec<Token> {
        self.head.fill(NIL);

        let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
        let mut matches = 0usize;
        let mut pos = 0;

        while pos < input.len() {
            match self.find_match(input, pos) {
                Some((length, distance)) => {
                    tokens.push(Token::Match { length: length as u16, distance: distance as u16 });
                    for p in pos..pos + length {
                        self.insert(input, p);
                    }
                    pos += length;
                    matches += 1;
                }
                None => {
                    tokens.push(Token::Literal(input[pos]));
                    self.insert(input, pos);
                    pos += 1;
                }
            }
        }

        debug!(
            "matcher: {} bytes -> {} literals, {} matches",
            input.len(),
            tokens.len() - matches,
            matches
        );

        tokens
    }

    /// Longest match for `input[pos..]` among earlier positions, as
    /// `(length, distance)`
    fn find_match(&self, input: &[u8], pos: usize) -> Option<(usize, usize)> {
        if self.max_chain == 0 || pos + MIN_MATCH > input.len() {
            return None;
        }

        let max_len = MAX_MATCH.min(input.len() - pos);
        let target = &input[pos..pos + max_len];

        let mut best_len = MIN_MATCH - 1;
        let mut best_dist = 0;
        let mut candidate = self.head[hash3(input, pos)];
        let mut examined = 0;

        while candidate != NIL && examined < self.max_chain {
            let distance = pos - candidate;
            if distance > WINDOW_SIZE {
                break;
            }

            // The byte just past the current best decides whether this
            // candidate can win at all.
            if input[candidate + best_len] == target[best_len] {
                let len = common_prefix(&input[candidate..candidate + max_len], target);
                if len > best_len {
                    best_len = len;
                    best_dist = distance;
                    if len == max_len {
                        break;
                    }
                }
            }

            let next = self.prev[candidate & WINDOW_MASK];
            if next == NIL || next >= candidate {
                break;
            }
            candidate = next;
            examined += 1;
        }

        (best_len >= MIN_MATCH).then_some((best_len, best_dist))
    }

    /// Link `pos` into the chain for the three bytes starting there
    #[inline]
    fn insert(&mut self, input: &[u8], pos: usize) {
        if pos + MIN_MATCH > input.len() {
            return;
        }
        let h = hash3(input, pos);
        self.prev[pos & WINDOW_MASK] = self.head[h];
        self.head[h] = pos;
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn hash3(input: &[u8], pos: usize) -> usize {
    let v = u32::from(input[pos])
        | u32::from(input[pos + 1]) << 8
        | u32::from(input[pos + 2]) << 16;
    (v.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
}

#[inline]
fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
