//! Sequential bit cursor over a borrowed byte slice.

use crate::{
    bits::{self, BitOrder, Whence},
    errors::CodecError,
};

/// Reads runs of up to 64 bits from a byte slice.
///
/// Bit offsets inside a byte count from the least significant bit. A read that
/// spans several bytes takes `min(8 - offset, still_needed)` bits from each one
/// and combines the chunks according to the cursor's [`BitOrder`].
///
/// Running out of data is not an error: [`BitCursor::read`] reports how many
/// bits it actually delivered, and `0` once the cursor is at the end.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    len_bits: usize,
    bit_pos: usize,
    bit_order: BitOrder,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8], bit_order: BitOrder) -> Self {
        Self {
            data,
            len_bits: data.len() * 8,
            bit_pos: 0,
            bit_order,
        }
    }

    /// Cursor that stops after `len_bits`, masking trailing padding bits.
    /// `len_bits` may not exceed the bits actually present in `data`.
    pub fn with_len(data: &'a [u8], len_bits: usize, bit_order: BitOrder) -> Result<Self, CodecError> {
        if len_bits > data.len() * 8 {
            return Err(CodecError::ArgumentOutOfRange(
                "length_bits",
                format!("{len_bits} exceeds the {} bits of the buffer", data.len() * 8),
            ));
        }

        Ok(Self {
            data,
            len_bits,
            bit_pos: 0,
            bit_order,
        })
    }

    /// Reads up to `n_bits` (max 64) and advances past them.
    ///
    /// Returns `(value, bits_read)`; `bits_read` is smaller than `n_bits` only
    /// when the end of the stream was reached, and `0` when already at the end.
    pub fn read(&mut self, n_bits: u32) -> Result<(u64, u32), CodecError> {
        let (value, got) = self.peek(n_bits)?;
        self.bit_pos += got as usize;

        Ok((value, got))
    }

    /// Same as [`BitCursor::read`] without moving the cursor.
    pub fn peek(&self, n_bits: u32) -> Result<(u64, u32), CodecError> {
        if n_bits > 64 {
            return Err(CodecError::ArgumentOutOfRange(
                "n_bits",
                format!("cannot read {n_bits} bits into a 64-bit value"),
            ));
        }

        let total = bits::available(self.bit_pos, self.len_bits, n_bits);
        let mut value = 0u64;
        let mut got = 0u32;
        let mut pos = self.bit_pos;

        // pos < len_bits <= data.len() * 8 throughout the loop
        while got < total {
            let offset = (pos % 8) as u32;
            let take = (8 - offset).min(total - got);
            let chunk = (u64::from(self.data[pos / 8]) >> offset) & bits::mask(take);

            value = match self.bit_order {
                BitOrder::BigEndian => (value << take) | chunk,
                BitOrder::LittleEndian => value | (chunk << got),
            };

            got += take;
            pos += take as usize;
        }

        Ok((value, total))
    }

    /// Advances by up to `n_bits`, stopping at the end. Returns the bits skipped.
    pub fn skip(&mut self, n_bits: usize) -> usize {
        let skipped = self.remaining().min(n_bits);
        self.bit_pos += skipped;
        skipped
    }

    /// Moves forward to the next multiple of `bits`, saturating at `usize::MAX`.
    pub fn align_to(&mut self, bits: usize) {
        if bits == 0 {
            return;
        }

        let rem = self.bit_pos % bits;
        if rem != 0 {
            self.bit_pos = self.bit_pos.saturating_add(bits - rem);
        }
    }

    /// Repositions the cursor and returns the new absolute bit position.
    ///
    /// Landing past the end is allowed (reads then report end of stream);
    /// landing before the start is [`CodecError::SeekOutOfRange`].
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<usize, CodecError> {
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.bit_pos,
            Whence::End => self.len_bits,
        };

        let target = base as i128 + i128::from(offset);
        if target < 0 {
            return Err(CodecError::SeekOutOfRange(target));
        }

        self.bit_pos = usize::try_from(target).unwrap_or(usize::MAX);
        Ok(self.bit_pos)
    }

    pub fn rewind(&mut self) {
        self.bit_pos = 0;
    }

    pub fn eof(&self) -> bool {
        self.bit_pos >= self.len_bits
    }

    pub fn position(&self) -> usize {
        self.bit_pos
    }

    pub fn len_bits(&self) -> usize {
        self.len_bits
    }

    pub fn remaining(&self) -> usize {
        self.len_bits.saturating_sub(self.bit_pos)
    }

    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_low_bits_first() {
        let mut cursor = BitCursor::new(&[0x0F], BitOrder::BigEndian);
        assert_eq!(cursor.read(1), Ok((1, 1)));
        assert_eq!(cursor.read(3), Ok((7, 3)));
        assert_eq!(cursor.read(4), Ok((0, 4)));
        assert!(cursor.eof());
    }

    #[test]
    fn test_read_split_byte() {
        for order in [BitOrder::BigEndian, BitOrder::LittleEndian] {
            let mut cursor = BitCursor::new(&[0b01010101], order);
            assert_eq!(cursor.read(2), Ok((1, 2)));
            assert_eq!(cursor.read(6), Ok((21, 6)));
        }
    }

    #[test]
    fn test_read_within_byte_ignores_order() {
        let mut be = BitCursor::new(&[0b00000111], BitOrder::BigEndian);
        let mut le = BitCursor::new(&[0b00000111], BitOrder::LittleEndian);
        assert_eq!(be.read(3), Ok((7, 3)));
        assert_eq!(le.read(3), Ok((7, 3)));
    }

    #[test]
    fn test_read_across_bytes() {
        let data = [0x12, 0x34];
        let mut be = BitCursor::new(&data, BitOrder::BigEndian);
        assert_eq!(be.read(16), Ok((0x1234, 16)));

        let mut le = BitCursor::new(&data, BitOrder::LittleEndian);
        assert_eq!(le.read(16), Ok((0x3412, 16)));
    }

    #[test]
    fn test_read_unaligned_across_bytes() {
        // high nibble of 0xAB, then the low nibble of 0xCD
        let data = [0xAB, 0xCD];
        let mut be = BitCursor::new(&data, BitOrder::BigEndian);
        be.skip(4);
        assert_eq!(be.read(8), Ok((0xAD, 8)));

        let mut le = BitCursor::new(&data, BitOrder::LittleEndian);
        le.skip(4);
        assert_eq!(le.read(8), Ok((0xDA, 8)));
    }

    #[test]
    fn test_read_64_bits() {
        let data = [0xFF; 9];
        let mut cursor = BitCursor::new(&data, BitOrder::BigEndian);
        cursor.skip(3);
        assert_eq!(cursor.read(64), Ok((u64::MAX, 64)));
        assert_eq!(cursor.read(64), Ok((0b11111, 5)));
    }

    #[test]
    fn test_read_short_at_end() {
        let mut cursor = BitCursor::new(&[0xFF], BitOrder::BigEndian);
        assert_eq!(cursor.read(5), Ok((0b11111, 5)));
        assert_eq!(cursor.read(5), Ok((0b111, 3)));
        assert_eq!(cursor.read(5), Ok((0, 0)));
    }

    #[test]
    fn test_zero_bits_distinct_from_end() {
        let mut cursor = BitCursor::new(&[0x00], BitOrder::BigEndian);
        assert_eq!(cursor.read(4), Ok((0, 4)));
        assert_eq!(cursor.read(4), Ok((0, 4)));
        assert_eq!(cursor.read(4), Ok((0, 0)));
    }

    #[test]
    fn test_read_more_than_64() {
        let mut cursor = BitCursor::new(&[0xFF], BitOrder::BigEndian);
        assert!(matches!(
            cursor.read(65),
            Err(CodecError::ArgumentOutOfRange("n_bits", _))
        ));
    }

    #[test]
    fn test_with_len_masks_padding() {
        let mut cursor = BitCursor::with_len(&[0xFF, 0xFF], 12, BitOrder::BigEndian).unwrap();
        assert_eq!(cursor.read(16), Ok((0xFFF, 12)));
        assert!(cursor.eof());
    }

    #[test]
    fn test_with_len_too_long() {
        assert!(BitCursor::with_len(&[0xFF], 9, BitOrder::BigEndian).is_err());
    }

    #[test]
    fn test_peek() {
        let cursor = BitCursor::new(&[0x0F], BitOrder::BigEndian);
        assert_eq!(cursor.peek(4), Ok((0xF, 4)));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_seek() {
        let mut cursor = BitCursor::new(&[0x0F, 0xF0], BitOrder::BigEndian);
        assert_eq!(cursor.seek(12, Whence::Start), Ok(12));
        assert_eq!(cursor.read(4), Ok((0xF, 4)));

        assert_eq!(cursor.seek(-8, Whence::End), Ok(8));
        assert_eq!(cursor.seek(-4, Whence::Current), Ok(4));
        assert_eq!(cursor.read(4), Ok((0, 4)));
    }

    #[test]
    fn test_seek_past_end() {
        let mut cursor = BitCursor::new(&[0xFF], BitOrder::BigEndian);
        assert_eq!(cursor.seek(100, Whence::Start), Ok(100));
        assert!(cursor.eof());
        assert_eq!(cursor.read(8), Ok((0, 0)));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_seek_negative() {
        let mut cursor = BitCursor::new(&[0xFF], BitOrder::BigEndian);
        assert_eq!(
            cursor.seek(-9, Whence::End),
            Err(CodecError::SeekOutOfRange(-1))
        );
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_rewind() {
        let mut cursor = BitCursor::new(&[0x0F], BitOrder::BigEndian);
        cursor.read(8).unwrap();
        cursor.rewind();
        assert_eq!(cursor.read(4), Ok((0xF, 4)));
    }

    #[test]
    fn test_skip_and_align() {
        let mut cursor = BitCursor::new(&[0xFF, 0xFF], BitOrder::BigEndian);
        assert_eq!(cursor.skip(2), 2);

        cursor.align_to(4);
        assert_eq!(cursor.position(), 4);

        cursor.align_to(8);
        assert_eq!(cursor.position(), 8);

        assert_eq!(cursor.skip(20), 8);
        assert!(cursor.eof());
    }

    #[test]
    fn test_align_far_past_end() {
        let mut cursor = BitCursor::new(&[0xFF], BitOrder::BigEndian);
        cursor.seek(i64::MAX, Whence::Start).unwrap();
        cursor.seek(i64::MAX, Whence::Current).unwrap();

        cursor.align_to(usize::MAX / 2 + 1);
        assert_eq!(cursor.position(), usize::MAX);
        assert!(cursor.eof());
        assert_eq!(cursor.read(8), Ok((0, 0)));
    }
}
