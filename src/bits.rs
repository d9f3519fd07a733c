//! Low-level bit helpers shared by [`crate::bit_reader`] and [`crate::bit_writer`].
//!
//! Within a byte, bit offset 0 is the least significant bit. [`BitOrder`] only
//! decides how the chunks taken from consecutive bytes are combined into one value.

/// How chunks read from consecutive bytes are assembled into one integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitOrder {
    /// Earlier chunks end up in the more significant bits.
    #[default]
    BigEndian,
    /// Earlier chunks end up in the less significant bits.
    LittleEndian,
}

/// Reference point for [`crate::bit_reader::BitCursor::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

/// Mask with the low `n` bits set. `n` may be 64.
#[inline]
pub fn mask(n: u32) -> u64 {
    if n >= 64 { u64::MAX } else { (1u64 << n) - 1 }
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    if bits == 0 || bits >= 64 {
        return value as i64;
    }

    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Number of bits that `n` bits past `pos` would leave inside `len`.
#[inline]
pub(crate) fn available(pos: usize, len: usize, n: u32) -> u32 {
    len.saturating_sub(pos).min(n as usize) as u32
}
