//! Field-aware writes: tag emission, range validation, and delimited
//! scopes, built on top of the [`crate::encoder::Encoder`].

use crate::encoder::Encoder;
use crate::errors::{Error, Result};
use crate::message::MessageWrite;
use crate::value::Value;
use crate::wire::{FieldType, WireType};

fn validate_uint64(v: u64) -> Result<()> {
    if v < (1u64 << 63) {
        Ok(())
    } else {
        Err(Error::RangeViolation)
    }
}

fn validate_float(v: f32) -> Result<()> {
    if v.abs() < f32::MAX {
        Ok(())
    } else {
        Err(Error::RangeViolation)
    }
}

fn validate_double(v: f64) -> Result<()> {
    if v.abs() < f64::MAX {
        Ok(())
    } else {
        Err(Error::RangeViolation)
    }
}

/// Builds tag-and-payload writes on top of an [`Encoder`]. Every
/// `T(field, value)` method validates `value` against `T`'s declared
/// domain before emitting anything.
#[derive(Debug, Default)]
pub struct Writer {
    encoder: Encoder,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Writer {
            encoder: Encoder::new(),
        }
    }

    /// Consumes the writer, returning the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.encoder.into_bytes()
    }

    /// Borrows the accumulated bytes without consuming the writer.
    pub fn as_bytes(&self) -> &[u8] {
        self.encoder.as_bytes()
    }

    /// Flushes the accumulated bytes to a `std::io::Write` sink.
    pub fn write_to<W: std::io::Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(self.encoder.as_bytes())?;
        Ok(())
    }

    /// Emits a tag (field number and wire type combined) as an unsigned
    /// varint. Fails if `field < 1`.
    pub fn write_tag(&mut self, field: u32, wire_type: WireType) -> Result<()> {
        if field < 1 {
            return Err(Error::InvalidFieldNumber(field as i64));
        }
        let tag = ((field as u64) << 3) | (wire_type as u64);
        self.encoder.unsigned_varint(tag);
        Ok(())
    }

    /// Writes an `int32` (varint, sign-extended to 10 bytes if negative).
    pub fn int32(&mut self, field: u32, v: i32) -> Result<()> {
        self.write_tag(field, WireType::Varint)?;
        self.encoder.varint32(v);
        Ok(())
    }

    /// Writes an `int64` (varint).
    pub fn int64(&mut self, field: u32, v: i64) -> Result<()> {
        self.write_tag(field, WireType::Varint)?;
        self.encoder.varint(v);
        Ok(())
    }

    /// Writes a `uint32` (varint).
    pub fn uint32(&mut self, field: u32, v: u32) -> Result<()> {
        self.write_tag(field, WireType::Varint)?;
        self.encoder.unsigned_varint32(v);
        Ok(())
    }

    /// Writes a `uint64` (varint). Domain is `[0, 2^63)`, not the full
    /// `u64` range — preserved for bit-compatibility with the reference
    /// encoder (see `DESIGN.md`).
    pub fn uint64(&mut self, field: u32, v: u64) -> Result<()> {
        validate_uint64(v)?;
        self.write_tag(field, WireType::Varint)?;
        self.encoder.unsigned_varint(v);
        Ok(())
    }

    /// Writes a `sint32` (zigzag varint).
    pub fn sint32(&mut self, field: u32, v: i32) -> Result<()> {
        self.write_tag(field, WireType::Varint)?;
        self.encoder.zigzag32(v);
        Ok(())
    }

    /// Writes a `sint64` (zigzag varint). `i64`'s native range already
    /// equals the declared domain, so there is nothing to reject here —
    /// unlike the reference encoder, which silently dropped out-of-range
    /// values in a host language without a native 64-bit integer.
    pub fn sint64(&mut self, field: u32, v: i64) -> Result<()> {
        self.write_tag(field, WireType::Varint)?;
        self.encoder.zigzag64(v);
        Ok(())
    }

    /// Writes a `fixed32` (little-endian u32).
    pub fn fixed32(&mut self, field: u32, v: u32) -> Result<()> {
        self.write_tag(field, WireType::Fixed32)?;
        self.encoder.fixed32(v);
        Ok(())
    }

    /// Writes a `fixed64` (little-endian u64).
    pub fn fixed64(&mut self, field: u32, v: u64) -> Result<()> {
        self.write_tag(field, WireType::Fixed64)?;
        self.encoder.fixed64(v);
        Ok(())
    }

    /// Writes a `sfixed32` (little-endian i32).
    pub fn sfixed32(&mut self, field: u32, v: i32) -> Result<()> {
        self.write_tag(field, WireType::Fixed32)?;
        self.encoder.fixed32(v as u32);
        Ok(())
    }

    /// Writes a `sfixed64` (little-endian i64).
    pub fn sfixed64(&mut self, field: u32, v: i64) -> Result<()> {
        self.write_tag(field, WireType::Fixed64)?;
        self.encoder.fixed64(v as u64);
        Ok(())
    }

    /// Writes a `float`. Domain is `abs(v) < FLOAT32_MAX` (strict): `NaN`,
    /// `±Infinity` and exactly `±FLOAT32_MAX` are all out of range. This
    /// mirrors the reference encoder's boundary behavior exactly — see
    /// `DESIGN.md` for why it is kept this strict rather than loosened to
    /// accept the usual IEEE-754 special values.
    pub fn float(&mut self, field: u32, v: f32) -> Result<()> {
        validate_float(v)?;
        self.write_tag(field, WireType::Fixed32)?;
        self.encoder.float(v);
        Ok(())
    }

    /// Writes a `double`. Same strict-inequality domain as `float`.
    pub fn double(&mut self, field: u32, v: f64) -> Result<()> {
        validate_double(v)?;
        self.write_tag(field, WireType::Fixed64)?;
        self.encoder.double(v);
        Ok(())
    }

    /// Writes a `bool` (`0x01`/`0x00`).
    pub fn bool(&mut self, field: u32, v: bool) -> Result<()> {
        self.write_tag(field, WireType::Varint)?;
        self.encoder.bool(v);
        Ok(())
    }

    /// Writes an `enum`, converting it to `i32` first.
    pub fn enum_value(&mut self, field: u32, v: i32) -> Result<()> {
        self.write_tag(field, WireType::Varint)?;
        self.encoder.varint32(v);
        Ok(())
    }

    /// Opens a delimited scope for `field`, runs `body`, then patches the
    /// tag's length varint with the exact number of bytes `body` wrote —
    /// on every exit path, including an error returned by `body`, so the
    /// pairing the format requires holds even under `?`-propagated
    /// failure (the buffer is still considered corrupt by the caller in
    /// that case, but the scope itself never leaks an unpatched length).
    fn delimited<F>(&mut self, field: u32, body: F) -> Result<()>
    where
        F: FnOnce(&mut Writer) -> Result<()>,
    {
        self.write_tag(field, WireType::Delimited)?;
        let bookmark = self.encoder.len();
        let result = body(self);
        let payload_len = (self.encoder.len() - bookmark) as u64;
        self.encoder.splice_varint(bookmark, payload_len);
        result
    }

    /// Writes `bytes`: length-delimited, verbatim.
    pub fn bytes(&mut self, field: u32, raw: &[u8]) -> Result<()> {
        let len = raw.len() as u64;
        if len > (1u64 << 52) {
            return Err(Error::LengthLimit(len));
        }
        self.delimited(field, |w| {
            w.encoder.bytes(raw);
            Ok(())
        })
    }

    /// Writes `string`: length-delimited UTF-8.
    pub fn string(&mut self, field: u32, s: &str) -> Result<()> {
        let len = s.len() as u64;
        if len > (1u64 << 52) {
            return Err(Error::LengthLimit(len));
        }
        self.delimited(field, |w| {
            w.encoder.string(s);
            Ok(())
        })
    }

    /// Writes a nested message, length-delimited, via its `MessageWrite`
    /// implementation.
    pub fn message<M: MessageWrite>(&mut self, field: u32, m: &M) -> Result<()> {
        self.delimited(field, |w| m.write_message(w))
    }

    /// Writes one repeated element per call to `write_one`, each with its
    /// own full `(tag, payload)` — the non-packed repeated-field form.
    pub fn repeated<T, F>(&mut self, field: u32, items: impl IntoIterator<Item = T>, mut write_one: F) -> Result<()>
    where
        F: FnMut(&mut Writer, u32, T) -> Result<()>,
    {
        for item in items {
            write_one(self, field, item)?;
        }
        Ok(())
    }

    fn write_scalar(&mut self, field: u32, v: &Value) -> Result<()> {
        match *v {
            Value::String(ref s) => self.string(field, s),
            Value::Bytes(ref b) => self.bytes(field, b),
            Value::Double(x) => {
                validate_double(x)?;
                self.write_tag(field, WireType::Fixed64)?;
                self.encoder.double(x);
                Ok(())
            }
            Value::Float(x) => {
                validate_float(x)?;
                self.write_tag(field, WireType::Fixed32)?;
                self.encoder.float(x);
                Ok(())
            }
            Value::Int32(x) => {
                self.write_tag(field, WireType::Varint)?;
                self.encoder.varint32(x);
                Ok(())
            }
            Value::Int64(x) => {
                self.write_tag(field, WireType::Varint)?;
                self.encoder.varint(x);
                Ok(())
            }
            Value::Uint32(x) => {
                self.write_tag(field, WireType::Varint)?;
                self.encoder.unsigned_varint32(x);
                Ok(())
            }
            Value::Uint64(x) => {
                validate_uint64(x)?;
                self.write_tag(field, WireType::Varint)?;
                self.encoder.unsigned_varint(x);
                Ok(())
            }
            Value::Sint32(x) => {
                self.write_tag(field, WireType::Varint)?;
                self.encoder.zigzag32(x);
                Ok(())
            }
            Value::Sint64(x) => {
                self.write_tag(field, WireType::Varint)?;
                self.encoder.zigzag64(x);
                Ok(())
            }
            Value::Fixed32(x) => {
                self.write_tag(field, WireType::Fixed32)?;
                self.encoder.fixed32(x);
                Ok(())
            }
            Value::Fixed64(x) => {
                self.write_tag(field, WireType::Fixed64)?;
                self.encoder.fixed64(x);
                Ok(())
            }
            Value::Sfixed32(x) => {
                self.write_tag(field, WireType::Fixed32)?;
                self.encoder.fixed32(x as u32);
                Ok(())
            }
            Value::Sfixed64(x) => {
                self.write_tag(field, WireType::Fixed64)?;
                self.encoder.fixed64(x as u64);
                Ok(())
            }
            Value::Bool(b) => {
                self.write_tag(field, WireType::Varint)?;
                self.encoder.bool(b);
                Ok(())
            }
            Value::Enum(x) => {
                self.write_tag(field, WireType::Varint)?;
                self.encoder.varint32(x);
                Ok(())
            }
        }
    }

    fn write_packed_elem(&mut self, v: &Value) -> Result<()> {
        match *v {
            Value::Double(x) => {
                validate_double(x)?;
                self.encoder.double(x);
            }
            Value::Float(x) => {
                validate_float(x)?;
                self.encoder.float(x);
            }
            Value::Int32(x) => self.encoder.varint32(x),
            Value::Int64(x) => self.encoder.varint(x),
            Value::Uint32(x) => self.encoder.unsigned_varint32(x),
            Value::Uint64(x) => {
                validate_uint64(x)?;
                self.encoder.unsigned_varint(x);
            }
            Value::Sint32(x) => self.encoder.zigzag32(x),
            Value::Sint64(x) => self.encoder.zigzag64(x),
            Value::Fixed32(x) => self.encoder.fixed32(x),
            Value::Fixed64(x) => self.encoder.fixed64(x),
            Value::Sfixed32(x) => self.encoder.fixed32(x as u32),
            Value::Sfixed64(x) => self.encoder.fixed64(x as u64),
            Value::Bool(b) => self.encoder.bool(b),
            Value::Enum(x) => self.encoder.varint32(x),
            Value::String(_) | Value::Bytes(_) => {
                return Err(Error::Map(FieldType::String as u32 as u8));
            }
        }
        Ok(())
    }

    /// Writes a length-delimited, two-field map entry (tag 1 = key, tag 2
    /// = value), dispatched by the runtime-typed [`Value`] each carries.
    pub fn map_entry(&mut self, field: u32, key: &Value, value: &Value) -> Result<()> {
        if !key.field_type().valid_map_key() {
            return Err(Error::Map(key.field_type() as u32 as u8));
        }
        if !value.field_type().valid_map_value() {
            return Err(Error::Map(value.field_type() as u32 as u8));
        }
        self.delimited(field, |w| {
            w.write_scalar(1, key)?;
            w.write_scalar(2, value)
        })
    }

    /// Writes every `(key, value)` pair as its own map entry under `field`.
    pub fn map<'i>(&mut self, field: u32, entries: impl IntoIterator<Item = (&'i Value, &'i Value)>) -> Result<()> {
        for (k, v) in entries {
            self.map_entry(field, k, v)?;
        }
        Ok(())
    }

    /// Writes a map entry whose key and/or value need a generic writer
    /// (e.g. a message-typed value) rather than a runtime-typed [`Value`].
    /// `write_key`/`write_val` are each responsible for writing their own
    /// tag (1 and 2 respectively).
    pub fn map_entry_with<FK, FV>(&mut self, field: u32, mut write_key: FK, mut write_val: FV) -> Result<()>
    where
        FK: FnMut(&mut Writer) -> Result<()>,
        FV: FnMut(&mut Writer) -> Result<()>,
    {
        self.delimited(field, |w| {
            write_key(w)?;
            write_val(w)
        })
    }

    /// Writes a packed-repeated field: a single tag, a length, and the
    /// concatenated element payloads with no per-element tag. Fixed-width
    /// elements compute their total length directly (`count * width`), so
    /// no bookmark is needed; varint/zigzag elements use the bookmark
    /// mechanism since their encoded width is not known up front.
    pub fn write_packed(&mut self, field: u32, elem_type: FieldType, items: &[Value]) -> Result<()> {
        match elem_type.wire_type() {
            WireType::Fixed32 => {
                self.write_tag(field, WireType::Delimited)?;
                self.encoder.unsigned_varint((items.len() * 4) as u64);
                for v in items {
                    self.write_packed_elem(v)?;
                }
                Ok(())
            }
            WireType::Fixed64 => {
                self.write_tag(field, WireType::Delimited)?;
                self.encoder.unsigned_varint((items.len() * 8) as u64);
                for v in items {
                    self.write_packed_elem(v)?;
                }
                Ok(())
            }
            WireType::Varint => self.delimited(field, |w| {
                for v in items {
                    w.write_packed_elem(v)?;
                }
                Ok(())
            }),
            WireType::Delimited => Err(Error::Map(elem_type as u32 as u8)),
        }
    }
}
