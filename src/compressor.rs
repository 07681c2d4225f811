use log::debug;

use crate::bits::BitWriter;
use crate::deflate::{Matcher, Token};
use crate::error::Result;
use crate::huffman::BlockEncoder;
use crate::{CompressConfig, CompressStats};

/// Drives the matcher and block encoder over a whole input buffer
pub struct Compressor {
    config: CompressConfig,
    matcher: Matcher,
    encoder: BlockEncoder,
    stats: CompressStats,
}

impl Compressor {
    pub fn new(config: CompressConfig) -> Self {
        let matcher = Matcher::with_max_chain(config.max_chain);
        let encoder = BlockEncoder::new(config.strategy);
        Self { config, matcher, encoder, stats: CompressStats::default() }
    }

    pub fn config(&self) -> &CompressConfig {
        &self.config
    }

    /// Statistics from the most recent `compress` call
    pub fn stats(&self) -> &CompressStats {
        &self.stats
    }

    /// Compress `input` into a complete raw DEFLATE stream
    pub fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let tokens = self.matcher.tokenize(input);

        let mut stats = CompressStats { input_bytes: input.len() as u64, ..Default::default() };
        for token in &tokens {
            match token {
                Token::Literal(_) => stats.literals += 1,
                Token::Match { length, .. } => {
                    stats.matches += 1;
                    stats.matched_bytes += *length as u64;
                }
            }
        }

        let blocks = split_blocks(&tokens, self.config.block_limit());
        let mut writer = BitWriter::with_capacity(input.len() / 2 + 64);

        for (idx, block) in blocks.iter().enumerate() {
            let is_final = idx + 1 == blocks.len();
            let start = writer.bit_len();

            self.encoder.encode_block(&mut writer, block, is_final)?;

            debug!(
                "block {}: strategy={} tokens={} bytes={} bits={} final={}",
                idx,
                self.config.strategy,
                block.len(),
                block.iter().map(Token::uncompressed_size).sum::<usize>(),
                writer.bit_len() - start,
                is_final
            );
            stats.blocks_written += 1;
        }

        let output = writer.finish();
        stats.output_bytes = output.len() as u64;
        self.stats = stats;

        Ok(output)
    }
}

/// Cut the token stream into blocks of at most `limit` uncompressed bytes.
///
/// Cuts fall on token boundaries and every block holds at least one token,
/// so a single match may overshoot a tiny limit. An empty stream still
/// yields one (empty) block.
fn split_blocks(tokens: &[Token], limit: Option<usize>) -> Vec<&[Token]> {
    let Some(limit) = limit else {
        return vec![tokens];
    };

    let mut blocks = Vec::new();
    let mut start = 0;
    let mut pending = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let size = token.uncompressed_size();
        if pending + size > limit && i > start {
            blocks.push(&tokens[start..i]);
            start = i;
            pending = 0;
        }
        pending += size;
    }
    blocks.push(&tokens[start..]);

    blocks
}
