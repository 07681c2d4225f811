/// Bit-level writer for DEFLATE output
///
/// Packs bits LSB-first into bytes, as RFC 1951 section 3.1.1 requires.
/// Bits accumulate in a 64-bit register and are spilled to the output a
/// whole byte at a time.
pub struct BitWriter {
    /// Completed output bytes
    output: Vec<u8>,
    /// Pending bits, lowest bit is the next one on the wire
    bit_buffer: u64,
    /// Number of valid bits in `bit_buffer` (0-7 between calls)
    bits_pending: u8,
    /// Total bits requested so far, before padding
    bits_written: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(65536)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            bit_buffer: 0,
            bits_pending: 0,
            bits_written: 0,
        }
    }

    /// Write the low `n` bits (0-32) of `value` in LSB-first order
    #[inline]
    pub fn write_bits(&mut self, value: u32, n: u8) {
        debug_assert!(n <= 32);

        if n == 0 {
            return;
        }

        let mask = (1u64 << n) - 1;
        self.bit_buffer |= (value as u64 & mask) << self.bits_pending;
        self.bits_pending += n;
        self.bits_written += n as u64;

        while self.bits_pending >= 8 {
            self.output.push(self.bit_buffer as u8);
            self.bit_buffer >>= 8;
            self.bits_pending -= 8;
        }
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u32, 1);
    }

    /// Write a Huffman code. Codes are defined MSB-first, so the `length`
    /// bits are reversed before packing.
    #[inline]
    pub fn write_bits_reversed(&mut self, code: u32, length: u8) {
        self.write_bits(reverse_bits(code, length), length);
    }

    /// Pad to byte boundary with zero bits
    pub fn align_to_byte(&mut self) {
        if self.bits_pending > 0 {
            self.output.push(self.bit_buffer as u8);
            self.bit_buffer = 0;
            self.bits_pending = 0;
        }
    }

    /// Flush the trailing partial byte (zero padded) and return the output
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.output
    }

    /// Total number of bits written, excluding padding
    pub fn bit_len(&self) -> u64 {
        self.bits_written
    }

    /// Current output length in bytes (including partial byte)
    pub fn len(&self) -> usize {
        self.output.len() + usize::from(self.bits_pending > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.bits_written == 0
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reverse the bottom `n` bits of `value`
#[inline]
pub(crate) fn reverse_bits(value: u32, n: u8) -> u32 {
    if n == 0 {
        return 0;
    }
    value.reverse_bits() >> (32 - n as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b011, 3); // bits 0-2
        writer.write_bits(0b11010, 5); // bits 3-7
        let output = writer.finish();
        assert_eq!(output, vec![0xD3]); // 11010_011 = 0xD3
    }

    #[test]
    fn test_write_cross_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFFF, 12);
        let output = writer.finish();
        assert_eq!(output, vec![0xFF, 0x0F]);
    }

    #[test]
    fn test_write_full_word() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_bits(0xDEAD_BEEF, 32);
        assert_eq!(writer.bit_len(), 33);
        let output = writer.finish();
        // 0xDEADBEEF shifted left by one, low bit set
        assert_eq!(output, vec![0xDF, 0x7D, 0x5B, 0xBD, 0x01]);
    }

    #[test]
    fn test_value_masked_to_width() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFF, 2);
        writer.write_bits(0, 6);
        assert_eq!(writer.finish(), vec![0x03]);
    }

    #[test]
    fn test_bit_len_excludes_padding() {
        let mut writer = BitWriter::new();
        writer.write_bits(1, 1);
        writer.write_bits(1, 2);
        writer.write_bits(0, 7);
        assert_eq!(writer.bit_len(), 10);
        assert_eq!(writer.len(), 2);
        // BFINAL=1, BTYPE=01, seven zero bits: the fixed-table empty block
        assert_eq!(writer.finish(), vec![0x03, 0x00]);
    }

    #[test]
    fn test_write_bits_reversed() {
        let mut writer = BitWriter::new();
        // Code 110 (MSB-first) goes on the wire as 0, 1, 1
        writer.write_bits_reversed(0b110, 3);
        assert_eq!(writer.finish(), vec![0b011]);
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b1, 1), 0b1);
        assert_eq!(reverse_bits(0b10, 2), 0b01);
        assert_eq!(reverse_bits(0b110, 3), 0b011);
        assert_eq!(reverse_bits(0b0011_0000, 8), 0b0000_1100);
        assert_eq!(reverse_bits(0x7FFF, 15), 0x7FFF);
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn test_empty_writer() {
        let writer = BitWriter::new();
        assert!(writer.is_empty());
        assert!(writer.finish().is_empty());
    }
}
