//! Schema: compiled field map used to unpack byte buffers into [`Record`]s.

use std::collections::HashMap;

use crate::{
    assembly::{Record, Value},
    bits::{self, sign_extend},
    errors::CodecError,
    field::{Endian, FieldKind, FieldSpec, Jump, StrLen},
};

/// A compiled field map. Use [`Schema::compile`] once, then [`Schema::unpack`]
/// any number of buffers.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Parsed fields in declaration order, jumps included.
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Parses every descriptor of an ordered `(name, descriptor)` sequence.
    ///
    /// Fails on the first malformed descriptor, on a repeated name, and on a
    /// `str[name]` whose `name` is not an earlier value-producing field.
    pub fn compile<I, K, D>(fields: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (K, D)>,
        K: AsRef<str>,
        D: AsRef<str>,
    {
        let mut compiled: Vec<FieldSpec> = Vec::new();
        // name -> whether the field decodes to an integer
        let mut declared: HashMap<String, Option<bool>> = HashMap::new();

        for (name, descriptor) in fields {
            let field = FieldSpec::parse(name.as_ref(), descriptor.as_ref())?;

            if let FieldKind::Str(StrLen::Field(reference)) = &field.kind {
                match declared.get(reference) {
                    Some(Some(true)) => {}
                    Some(Some(false)) => {
                        return Err(CodecError::InvalidLengthReference(
                            field.name.clone(),
                            reference.clone(),
                        ));
                    }
                    Some(None) | None => {
                        return Err(CodecError::UnresolvedLengthReference(
                            field.name.clone(),
                            reference.clone(),
                        ));
                    }
                }
            }

            let integer = match field.kind {
                FieldKind::Jump(_) => None,
                FieldKind::Char | FieldKind::Byte | FieldKind::Int { .. } => Some(true),
                FieldKind::Float | FieldKind::Double | FieldKind::Str(_) => Some(false),
            };
            if declared.insert(field.name.clone(), integer).is_some() {
                return Err(CodecError::DuplicateField(field.name));
            }

            compiled.push(field);
        }

        tracing::debug!(fields = compiled.len(), "compiled struct schema");

        Ok(Self { fields: compiled })
    }

    /// Decodes one record starting at byte `start_offset`.
    ///
    /// Returns the record and the offset just past the last byte consumed (or
    /// wherever a trailing jump left it), ready to be fed back in to decode the
    /// next record of a sequence.
    pub fn unpack(&self, data: &[u8], start_offset: usize) -> Result<(Record, usize), CodecError> {
        let mut record = Record::new();
        let mut offset = start_offset;

        for field in &self.fields {
            let len = match &field.kind {
                FieldKind::Jump(jump) => {
                    offset = jump_from(offset, *jump)?;
                    continue;
                }
                FieldKind::Str(StrLen::Field(reference)) => resolve_len(&record, field, reference)?,
                kind => kind.fixed_width().unwrap_or_default(),
            };

            let bytes = data
                .get(offset..)
                .and_then(|rest| rest.get(..len))
                .ok_or_else(|| CodecError::BufferUnderrun {
                    field: field.name.clone(),
                    requested: len,
                    available: data.len().saturating_sub(offset),
                })?;

            let value = decode_value(&field.kind, bytes);
            tracing::trace!(field = %field.name, offset, len, "decoded field");

            record.insert(field.name.clone(), value);
            offset += len;
        }

        Ok((record, offset))
    }

    /// Decodes `count` records laid out back to back from `start_offset`.
    pub fn unpack_many(
        &self,
        data: &[u8],
        start_offset: usize,
        count: usize,
    ) -> Result<(Vec<Record>, usize), CodecError> {
        let mut records = Vec::with_capacity(count);
        let mut offset = start_offset;

        for _ in 0..count {
            let (record, next) = self.unpack(data, offset)?;
            records.push(record);
            offset = next;
        }

        Ok((records, offset))
    }

    /// Encodes `record` with this schema, starting at byte 0.
    ///
    /// Jumps move the write offset; gaps are zero-filled. Strings shorter than
    /// their length are padded with NULs.
    pub fn pack(&self, record: &Record) -> Result<Vec<u8>, CodecError> {
        let mut out: Vec<u8> = Vec::new();
        let mut offset = 0usize;

        for field in &self.fields {
            if let FieldKind::Jump(jump) = field.kind {
                offset = jump_from(offset, jump)?;
                continue;
            }

            let value = record
                .get(&field.name)
                .ok_or_else(|| CodecError::MissingField(field.name.clone()))?;
            let bytes = encode_value(field, value, record)?;

            let end = offset
                .checked_add(bytes.len())
                .ok_or(CodecError::SeekOutOfRange(offset as i128 + bytes.len() as i128))?;
            if out.len() < end {
                out.try_reserve_exact(end - out.len()).map_err(|err| {
                    CodecError::ArgumentOutOfRange("offset", format!("{end} bytes: {err}"))
                })?;
                out.resize(end, 0);
            }
            out[offset..end].copy_from_slice(&bytes);
            offset = end;
        }

        Ok(out)
    }
}

/// Compiles `fields` and decodes one record from `data` at `start_offset`.
pub fn unpack<I, K, D>(fields: I, data: &[u8], start_offset: usize) -> Result<(Record, usize), CodecError>
where
    I: IntoIterator<Item = (K, D)>,
    K: AsRef<str>,
    D: AsRef<str>,
{
    Schema::compile(fields)?.unpack(data, start_offset)
}

fn jump_from(offset: usize, jump: Jump) -> Result<usize, CodecError> {
    match jump {
        Jump::Absolute(target) => Ok(target),
        Jump::Relative(delta) => {
            let target = offset as i128 + i128::from(delta);
            if target < 0 {
                return Err(CodecError::SeekOutOfRange(target));
            }
            Ok(usize::try_from(target).unwrap_or(usize::MAX))
        }
    }
}

fn resolve_len(record: &Record, field: &FieldSpec, reference: &str) -> Result<usize, CodecError> {
    let value = record.get(reference).ok_or_else(|| {
        CodecError::UnresolvedLengthReference(field.name.clone(), reference.to_string())
    })?;

    value
        .as_len()
        .ok_or_else(|| CodecError::InvalidLengthReference(field.name.clone(), reference.to_string()))
}

fn resolve_endian(endian: Endian) -> Endian {
    match endian {
        Endian::Native if cfg!(target_endian = "big") => Endian::Big,
        Endian::Native => Endian::Little,
        other => other,
    }
}

/// `bytes` holds at most 8 bytes.
fn read_uint(bytes: &[u8], endian: Endian) -> u64 {
    let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    match resolve_endian(endian) {
        Endian::Little => bytes.iter().rev().fold(0, fold),
        _ => bytes.iter().fold(0, fold),
    }
}

fn write_uint(value: u64, width: usize, endian: Endian) -> Vec<u8> {
    let byte = |i: usize| (value >> (8 * i)) as u8;
    match resolve_endian(endian) {
        Endian::Little => (0..width).map(byte).collect(),
        _ => (0..width).rev().map(byte).collect(),
    }
}

/// `bytes` has exactly the width of `kind`.
fn decode_value(kind: &FieldKind, bytes: &[u8]) -> Value {
    match kind {
        FieldKind::Char => Value::I64(i64::from(bytes[0] as i8)),
        FieldKind::Byte => Value::U64(u64::from(bytes[0])),
        FieldKind::Int {
            width,
            signed,
            endian,
        } => {
            let raw = read_uint(bytes, *endian);
            if *signed {
                Value::I64(sign_extend(raw, (*width * 8) as u32))
            } else {
                Value::U64(raw)
            }
        }
        FieldKind::Float => Value::F32(f32::from_bits(read_uint(bytes, Endian::Native) as u32)),
        FieldKind::Double => Value::F64(f64::from_bits(read_uint(bytes, Endian::Native))),
        FieldKind::Str(_) | FieldKind::Jump(_) => Value::Bytes(bytes.to_vec()),
    }
}

fn mismatch(field: &FieldSpec, reason: impl Into<String>) -> CodecError {
    CodecError::ValueMismatch(field.name.clone(), reason.into())
}

fn encode_int(field: &FieldSpec, value: &Value, width: usize, signed: bool) -> Result<u64, CodecError> {
    let bits = (width * 8) as u32;

    if signed {
        let n = value
            .as_i64()
            .ok_or_else(|| mismatch(field, format!("expected a signed integer, got {value:?}")))?;
        let fits = bits >= 64 || (-(1i64 << (bits - 1))..(1i64 << (bits - 1))).contains(&n);
        if !fits {
            return Err(mismatch(field, format!("{n} does not fit in {bits} signed bits")));
        }
        Ok(n as u64 & bits::mask(bits))
    } else {
        let n = value
            .as_u64()
            .ok_or_else(|| mismatch(field, format!("expected an unsigned integer, got {value:?}")))?;
        if n > bits::mask(bits) {
            return Err(mismatch(field, format!("{n} does not fit in {bits} unsigned bits")));
        }
        Ok(n)
    }
}

fn encode_value(field: &FieldSpec, value: &Value, record: &Record) -> Result<Vec<u8>, CodecError> {
    let float = || {
        value
            .as_f64()
            .ok_or_else(|| mismatch(field, format!("expected a float, got {value:?}")))
    };

    let bytes = match &field.kind {
        FieldKind::Char => vec![encode_int(field, value, 1, true)? as u8],
        FieldKind::Byte => vec![encode_int(field, value, 1, false)? as u8],
        FieldKind::Int {
            width,
            signed,
            endian,
        } => write_uint(encode_int(field, value, *width, *signed)?, *width, *endian),
        FieldKind::Float => write_uint(u64::from((float()? as f32).to_bits()), 4, Endian::Native),
        FieldKind::Double => write_uint(float()?.to_bits(), 8, Endian::Native),
        FieldKind::Str(len) => {
            let len = match len {
                StrLen::Fixed(len) => *len,
                StrLen::Field(reference) => resolve_len(record, field, reference)?,
            };
            let raw = value
                .as_bytes()
                .ok_or_else(|| mismatch(field, format!("expected bytes, got {value:?}")))?;
            if raw.len() > len {
                return Err(mismatch(field, format!("{} bytes exceed the length {len}", raw.len())));
            }

            let mut bytes = raw.to_vec();
            bytes.resize(len, 0);
            bytes
        }
        FieldKind::Jump(_) => Vec::new(),
    };

    Ok(bytes)
}
