//! Symbol sets for [`crate::base_n`].

use std::{collections::HashMap, str::FromStr};

use crate::errors::CodecError;

const BASE32: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const BASE36: &str = "0123456789abcdefghijklmnopqrstuvwxyz";
const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BASE62: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const HEX: &str = "0123456789abcdef";

/// An ordered set of 2 to 256 distinct symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 256;

    /// Builds an alphabet from the characters of `symbols`, in order.
    pub fn new(symbols: &str) -> Result<Self, CodecError> {
        let symbols: Vec<char> = symbols.chars().collect();

        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&symbols.len()) {
            return Err(CodecError::ArgumentOutOfRange(
                "alphabet",
                format!(
                    "{} symbols, expected {} to {}",
                    symbols.len(),
                    Self::MIN_LEN,
                    Self::MAX_LEN
                ),
            ));
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &symbol) in symbols.iter().enumerate() {
            if index.insert(symbol, i).is_some() {
                return Err(CodecError::ArgumentOutOfRange(
                    "alphabet",
                    format!("duplicate symbol {symbol:?}"),
                ));
            }
        }

        Ok(Self { symbols, index })
    }

    /// RFC 4648 base32 symbols, without padding.
    pub fn base32() -> Self {
        Self::from_valid(BASE32)
    }

    pub fn base36() -> Self {
        Self::from_valid(BASE36)
    }

    /// Bitcoin base58 symbols.
    pub fn base58() -> Self {
        Self::from_valid(BASE58)
    }

    pub fn base62() -> Self {
        Self::from_valid(BASE62)
    }

    pub fn hex() -> Self {
        Self::from_valid(HEX)
    }

    // only for the constants above, which are distinct and in range
    fn from_valid(symbols: &str) -> Self {
        let symbols: Vec<char> = symbols.chars().collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, index }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Never true for a constructed alphabet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl FromStr for Alphabet {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Alphabet {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_ways() {
        let alphabet = Alphabet::new("xyz").unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.symbol(1), Some('y'));
        assert_eq!(alphabet.symbol(3), None);
        assert_eq!(alphabet.index_of('z'), Some(2));
        assert_eq!(alphabet.index_of('a'), None);
    }

    #[test]
    fn test_multibyte_symbols() {
        let alphabet: Alphabet = "αβγδ".parse().unwrap();
        assert_eq!(alphabet.len(), 4);
        assert_eq!(alphabet.index_of('γ'), Some(2));
    }

    #[test]
    fn test_too_small() {
        assert!(matches!(
            Alphabet::new("a"),
            Err(CodecError::ArgumentOutOfRange("alphabet", _))
        ));
        assert!(Alphabet::new("").is_err());
    }

    #[test]
    fn test_too_large() {
        let symbols: String = (0..257u32).filter_map(|i| char::from_u32(0x100 + i)).collect();
        assert!(Alphabet::new(&symbols).is_err());
        assert!(Alphabet::new(&symbols[..symbols.char_indices().nth(256).unwrap().0]).is_ok());
    }

    #[test]
    fn test_duplicate_symbol() {
        assert!(matches!(
            Alphabet::new("abca"),
            Err(CodecError::ArgumentOutOfRange("alphabet", _))
        ));
    }

    #[test]
    fn test_presets_are_valid() {
        for (preset, len) in [
            (Alphabet::base32(), 32),
            (Alphabet::base36(), 36),
            (Alphabet::base58(), 58),
            (Alphabet::base62(), 62),
            (Alphabet::hex(), 16),
        ] {
            let symbols: String = preset.symbols().iter().collect();
            assert_eq!(Alphabet::new(&symbols), Ok(preset));
            assert_eq!(symbols.chars().count(), len);
        }
    }
}
