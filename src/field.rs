//! Field descriptors: the textual type grammar of a field map.
//!
//! ```text
//! char | byte | int | uint | float | double
//! [+|-](int16 | uint16 | int32 | uint32 | int64 | uint64)
//! str[<decimal length> | <earlier field name>]
//! @<n> | @+<n> | @-<n>
//! ```

use crate::errors::CodecError;

/// Byte order of a multi-byte numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Byte order of the target the decoder runs on.
    Native,
    /// `+` prefix: network order.
    Big,
    /// `-` prefix.
    Little,
}

/// Length of a `str[...]` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrLen {
    /// `str[12]`
    Fixed(usize),
    /// `str[count]`: the decoded value of an earlier field.
    Field(String),
}

/// Offset change requested by an `@` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    /// `@20`: set the offset.
    Absolute(usize),
    /// `@+4` / `@-8`: move the offset.
    Relative(i64),
}

/// Parsed form of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed byte.
    Char,
    /// Unsigned byte.
    Byte,
    /// Integer of `width` bytes. Bare `int`/`uint` are 4 bytes, native order.
    Int {
        width: usize,
        signed: bool,
        endian: Endian,
    },
    /// 4-byte IEEE 754, native order.
    Float,
    /// 8-byte IEEE 754, native order.
    Double,
    /// Raw bytes.
    Str(StrLen),
    /// Repositions the offset, produces no value.
    Jump(Jump),
}

/// A named field of a field map with its parsed descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Parses `descriptor` for the field `name`.
    pub fn parse(name: &str, descriptor: &str) -> Result<Self, CodecError> {
        let malformed = || CodecError::MalformedFieldSpec(name.to_string(), descriptor.to_string());
        let kind = parse_kind(descriptor).ok_or_else(malformed)?;

        Ok(FieldSpec {
            name: name.to_string(),
            kind,
        })
    }

    /// Bytes consumed by this field, when that does not depend on decoded data.
    pub fn fixed_width(&self) -> Option<usize> {
        self.kind.fixed_width()
    }
}

impl FieldKind {
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldKind::Char | FieldKind::Byte => Some(1),
            FieldKind::Int { width, .. } => Some(*width),
            FieldKind::Float => Some(4),
            FieldKind::Double => Some(8),
            FieldKind::Str(StrLen::Fixed(len)) => Some(*len),
            FieldKind::Str(StrLen::Field(_)) => None,
            FieldKind::Jump(_) => Some(0),
        }
    }
}

fn parse_kind(descriptor: &str) -> Option<FieldKind> {
    if let Some(rest) = descriptor.strip_prefix('@') {
        return parse_jump(rest).map(FieldKind::Jump);
    }

    if let Some(body) = descriptor
        .strip_prefix("str[")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return parse_str_len(body).map(FieldKind::Str);
    }

    let (endian, keyword) = match *descriptor.as_bytes().first()? {
        b'+' => (Some(Endian::Big), &descriptor[1..]),
        b'-' => (Some(Endian::Little), &descriptor[1..]),
        _ => (None, descriptor),
    };

    let sized = |width: usize, signed: bool| FieldKind::Int {
        width,
        signed,
        endian: endian.unwrap_or(Endian::Native),
    };

    let kind = match keyword {
        "int16" => sized(2, true),
        "uint16" => sized(2, false),
        "int32" => sized(4, true),
        "uint32" => sized(4, false),
        "int64" => sized(8, true),
        "uint64" => sized(8, false),
        // no byte order prefix on the platform-style keywords
        _ if endian.is_some() => return None,
        "char" => FieldKind::Char,
        "byte" => FieldKind::Byte,
        "int" => sized(4, true),
        "uint" => sized(4, false),
        "float" => FieldKind::Float,
        "double" => FieldKind::Double,
        _ => return None,
    };

    Some(kind)
}

fn parse_jump(text: &str) -> Option<Jump> {
    let (sign, digits) = match *text.as_bytes().first()? {
        b'+' => (Some(1), &text[1..]),
        b'-' => (Some(-1), &text[1..]),
        _ => (None, text),
    };

    if !is_decimal(digits) {
        return None;
    }

    match sign {
        Some(sign) => digits.parse::<i64>().ok().map(|n| Jump::Relative(sign * n)),
        None => digits.parse::<usize>().ok().map(Jump::Absolute),
    }
}

fn parse_str_len(body: &str) -> Option<StrLen> {
    if body.is_empty() || body.contains(']') {
        return None;
    }

    if is_decimal(body) {
        body.parse().ok().map(StrLen::Fixed)
    } else {
        Some(StrLen::Field(body.to_string()))
    }
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
