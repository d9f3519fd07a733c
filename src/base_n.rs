//! Truncated binary encoding of bit streams over an arbitrary [`Alphabet`].
//!
//! For an alphabet of `n` symbols let `k = ⌊log₂n⌋` and `u = 2^(k+1) - n`.
//! Each step reads `k` bits as `i`; if `i >= u` one more bit is appended and
//! the symbol index becomes `(i << 1 | bit) - u`. Symbol indices below `u`
//! therefore stand for `k` bits and the rest for `k + 1` bits, which covers
//! the `n` symbols exactly.
//!
//! Bits are taken with [`BIT_ORDER`]. Combined with the least-significant-first
//! numbering of [`BitCursor`], a short final read is just a zero-extended
//! value, so [`decode`] recovers every whole byte that [`encode`] consumed.
//!
//! ```
//! use bytecraft::base_n::{decode, encode};
//!
//! let alphabet = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
//! let token = encode(&[0x5A; 16], alphabet).unwrap();
//! assert_eq!(token.chars().count(), 26);
//! assert_eq!(decode(&token, alphabet).unwrap(), vec![0x5A; 16]);
//! ```

use crate::{
    alphabet::Alphabet,
    bit_reader::BitCursor,
    bit_writer::BitWriter,
    bits::BitOrder,
    errors::CodecError,
};

/// Bit order used by [`encode`], [`encode_with`], [`decode`] and [`decode_with`].
pub const BIT_ORDER: BitOrder = BitOrder::LittleEndian;

/// `(k, u)` for an alphabet of `n >= 2` symbols.
fn params(n: usize) -> (u32, u64) {
    let k = n.ilog2();
    let u = (1u64 << (k + 1)) - n as u64;
    (k, u)
}

/// Inclusive range of symbol counts [`encode`] can produce for `src_bits` bits
/// over an alphabet of `alphabet_len` symbols.
pub fn encoded_len_bounds(src_bits: usize, alphabet_len: usize) -> (usize, usize) {
    let floor = alphabet_len.max(2).ilog2() as usize;
    let ceil = if alphabet_len.is_power_of_two() { floor } else { floor + 1 };
    (src_bits.div_ceil(ceil), src_bits.div_ceil(floor))
}

/// Encodes `data` over the symbols of `alphabet`.
pub fn encode(data: &[u8], alphabet: &str) -> Result<String, CodecError> {
    encode_with(data, &Alphabet::new(alphabet)?)
}

pub fn encode_with(data: &[u8], alphabet: &Alphabet) -> Result<String, CodecError> {
    let mut cursor = BitCursor::new(data, BIT_ORDER);
    encode_bits(&mut cursor, alphabet)
}

/// Encodes everything from the cursor's position to its end.
///
/// The cursor's own [`BitOrder`] is used; [`decode`] inverts the result for
/// cursors using [`BIT_ORDER`].
pub fn encode_bits(cursor: &mut BitCursor<'_>, alphabet: &Alphabet) -> Result<String, CodecError> {
    let (k, u) = params(alphabet.len());
    let (_, max_len) = encoded_len_bounds(cursor.remaining(), alphabet.len());
    let mut out = String::with_capacity(max_len);
    let mut symbols = 0usize;

    while !cursor.eof() {
        let (mut i, _) = cursor.read(k)?;
        if i >= u {
            let (bit, _) = cursor.read(1)?;
            i = ((i << 1) | bit) - u;
        }

        // i < n by construction
        let symbol = alphabet.symbol(i as usize).ok_or_else(|| {
            CodecError::ArgumentOutOfRange("alphabet", format!("no symbol at index {i}"))
        })?;
        out.push(symbol);
        symbols += 1;
    }

    tracing::debug!(symbols, alphabet_len = alphabet.len(), "base-n encoded");

    Ok(out)
}

/// Decodes `text` produced by [`encode`] with the same `alphabet`.
///
/// Bits left over after the last whole byte are dropped.
pub fn decode(text: &str, alphabet: &str) -> Result<Vec<u8>, CodecError> {
    decode_with(text, &Alphabet::new(alphabet)?)
}

pub fn decode_with(text: &str, alphabet: &Alphabet) -> Result<Vec<u8>, CodecError> {
    let mut writer = BitWriter::new(BIT_ORDER);
    decode_into(text, alphabet, &mut writer)?;

    tracing::debug!(bits = writer.len_bits(), alphabet_len = alphabet.len(), "base-n decoded");

    Ok(writer.into_whole_bytes())
}

/// Appends the bits encoded by `text` to `writer`, using the writer's bit order.
///
/// `position` in [`CodecError::InvalidSymbol`] counts characters, not bytes.
pub fn decode_into(text: &str, alphabet: &Alphabet, writer: &mut BitWriter) -> Result<(), CodecError> {
    let (k, u) = params(alphabet.len());

    for (position, symbol) in text.chars().enumerate() {
        let index = alphabet
            .index_of(symbol)
            .ok_or(CodecError::InvalidSymbol(symbol, position))? as u64;

        if index < u {
            writer.write(index, k)?;
        } else {
            let bits = index + u;
            writer.write(bits >> 1, k)?;
            writer.write(bits & 1, 1)?;
        }
    }

    Ok(())
}
