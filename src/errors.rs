//! Error type shared by the bit cursor, the struct decoder and the base-N codec.

/// Every failure surfaced by this crate. Nothing is retried internally: any
/// error aborts the current call and no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Descriptor text does not match the field grammar.
    #[error("field `{0}`: malformed type descriptor `{1}`")]
    MalformedFieldSpec(String, String),

    /// A `str[name]` length names a field that is unknown or not decoded yet.
    #[error("field `{0}`: length reference `{1}` does not name an earlier field")]
    UnresolvedLengthReference(String, String),

    /// A `str[name]` length names a field whose value is not a non-negative integer.
    #[error("field `{0}`: length reference `{1}` is not a non-negative integer")]
    InvalidLengthReference(String, String),

    /// Two entries of one field map share a name.
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    /// Not enough bytes remain in the buffer to satisfy a field.
    #[error("field `{field}`: requested {requested} bytes, {available} available")]
    BufferUnderrun {
        field: String,
        requested: usize,
        available: usize,
    },

    /// A parameter is outside its accepted range.
    #[error("argument `{0}` out of range: {1}")]
    ArgumentOutOfRange(&'static str, String),

    /// Decode-time character that is not part of the alphabet.
    #[error("symbol {0:?} at position {1} is not in the alphabet")]
    InvalidSymbol(char, usize),

    /// A seek or jump would land before the start of the buffer.
    #[error("seek to negative position {0}")]
    SeekOutOfRange(i128),

    /// [`crate::schema::Schema::pack`] found no value for a declared field.
    #[error("field `{0}` is missing from the record")]
    MissingField(String),

    /// [`crate::schema::Schema::pack`] found a value that does not fit its field.
    #[error("field `{0}`: {1}")]
    ValueMismatch(String, String),
}
