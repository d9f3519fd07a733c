//! Append-only bit sink, the inverse of [`crate::bit_reader::BitCursor`].

use crate::{
    bits::{self, BitOrder},
    errors::CodecError,
};

/// Appends runs of up to 64 bits to a growable byte buffer.
///
/// Bits land exactly where a [`crate::bit_reader::BitCursor`] with the same
/// [`BitOrder`] would read them back from.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_pos: usize,
    bit_order: BitOrder,
}

impl BitWriter {
    pub fn new(bit_order: BitOrder) -> Self {
        Self {
            data: Vec::new(),
            bit_pos: 0,
            bit_order,
        }
    }

    /// Appends the low `n_bits` of `value`. Higher bits of `value` are ignored.
    pub fn write(&mut self, value: u64, n_bits: u32) -> Result<(), CodecError> {
        if n_bits > 64 {
            return Err(CodecError::ArgumentOutOfRange(
                "n_bits",
                format!("cannot write {n_bits} bits from a 64-bit value"),
            ));
        }

        let mut written = 0u32;
        while written < n_bits {
            let offset = (self.bit_pos % 8) as u32;
            let take = (8 - offset).min(n_bits - written);
            let chunk = match self.bit_order {
                BitOrder::BigEndian => value >> (n_bits - written - take),
                BitOrder::LittleEndian => value >> written,
            } & bits::mask(take);

            if self.bit_pos / 8 == self.data.len() {
                self.data.push(0);
            }
            self.data[self.bit_pos / 8] |= (chunk << offset) as u8;

            written += take;
            self.bit_pos += take as usize;
        }

        Ok(())
    }

    pub fn len_bits(&self) -> usize {
        self.bit_pos
    }

    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// All written bytes; unused bits of a trailing partial byte are zero.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Written bytes without a trailing partial byte.
    pub fn into_whole_bytes(mut self) -> Vec<u8> {
        self.data.truncate(self.bit_pos / 8);
        self.data
    }
}
