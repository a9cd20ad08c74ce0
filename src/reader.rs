//! A cursored view over an immutable input buffer.
//!
//! `Reader` owns the cursor/end bookkeeping described by the format's data
//! model directly as struct fields (rather than re-taking the buffer as a
//! parameter on every call, as the teacher crate's `BytesReader` does) —
//! `current_field`/`current_wire_type` are genuine reader state, not values
//! inferred positionally by generated call sites.

use crate::errors::{Error, Result};
use crate::message::MessageRead;
use crate::value::Value;
use crate::wire::{FieldType, WireType};

/// A cursored, non-owning view over an input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reader<'a> {
    buf: &'a [u8],
    cursor: usize,
    end: usize,
    current_field: u32,
    current_wire_type: Option<WireType>,
    stream_length: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over the entirety of `buf`.
    pub fn from_bytes(buf: &'a [u8]) -> Self {
        Reader {
            buf,
            cursor: 0,
            end: buf.len(),
            current_field: 0,
            current_wire_type: None,
            stream_length: buf.len(),
        }
    }

    /// Bytes remaining between the cursor and `end`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.cursor
    }

    /// True once the cursor has reached `end` (the end of the current
    /// message, which may be short of the whole buffer inside a nested
    /// descent or a streamed message).
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.end
    }

    /// The field number parsed by the most recent successful `next_field`.
    pub fn current_field(&self) -> u32 {
        self.current_field
    }

    /// The wire type parsed by the most recent successful `next_field`,
    /// or set directly ahead of a map-entry key/value read.
    pub fn current_wire_type(&self) -> Option<WireType> {
        self.current_wire_type
    }

    fn read_u8(&mut self) -> Result<u8> {
        if self.cursor >= self.end {
            return Err(Error::UnexpectedEndOfBuffer);
        }
        let b = self.buf[self.cursor];
        self.cursor += 1;
        Ok(b)
    }

    fn expect_wire_type(&self, expected: WireType) -> Result<()> {
        if self.current_wire_type == Some(expected) {
            Ok(())
        } else {
            Err(Error::InvalidWireType)
        }
    }

    /// Advances past the next tag, splitting it into field number and wire
    /// type and storing both. Returns `None` at end-of-stream or
    /// end-of-current-message. Fails on `START_GROUP`/`END_GROUP` or any
    /// other unrecognized wire type — explicitly, not via a short-circuit
    /// comparison that happens to let `END_GROUP` slip through.
    pub fn next_field(&mut self) -> Result<Option<u32>> {
        if self.is_eof() {
            return Ok(None);
        }
        let tag = self.read_raw_varint64()?;
        let (field_number, wire_type) = WireType::from_tag(tag)?;
        self.current_field = field_number;
        self.current_wire_type = Some(wire_type);
        Ok(Some(field_number))
    }

    /// Reads a declared-32-bit-width varint, tolerating up to 5 additional
    /// continuation bytes beyond the usual 5 (a 64-bit varint written for a
    /// field the schema treats as 32-bit). Silently discards bits beyond
    /// bit 31, matching the reference decoder's truncation behavior.
    fn read_raw_varint32(&mut self) -> Result<u32> {
        let mut b = self.read_u8()?;
        if b & 0x80 == 0 {
            return Ok(b as u32);
        }
        let mut r = (b & 0x7f) as u32;

        b = self.read_u8()?;
        r |= ((b & 0x7f) as u32) << 7;
        if b & 0x80 == 0 {
            return Ok(r);
        }

        b = self.read_u8()?;
        r |= ((b & 0x7f) as u32) << 14;
        if b & 0x80 == 0 {
            return Ok(r);
        }

        b = self.read_u8()?;
        r |= ((b & 0x7f) as u32) << 21;
        if b & 0x80 == 0 {
            return Ok(r);
        }

        b = self.read_u8()?;
        r |= ((b & 0xf) as u32) << 28;
        if b & 0x80 == 0 {
            return Ok(r);
        }

        // Tolerance window: up to 5 more continuation bytes, discarded.
        for _ in 0..5 {
            if self.read_u8()? & 0x80 == 0 {
                return Ok(r);
            }
        }
        Err(Error::Varint)
    }

    /// Reads a 64-bit varint strictly: at most 10 bytes, with the 10th
    /// byte's payload restricted to 0 or 1 (the one remaining bit beyond
    /// bit 62). Anything else is an overflow.
    fn read_raw_varint64(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        for i in 0..10u32 {
            let b = self.read_u8()?;
            if i == 9 {
                let payload = b & 0x7f;
                if b & 0x80 != 0 || payload >= 2 {
                    return Err(Error::Varint);
                }
                result |= (payload as u64) << 63;
                return Ok(result);
            }
            result |= ((b & 0x7f) as u64) << (i * 7);
            if b & 0x80 == 0 {
                return Ok(result);
            }
        }
        unreachable!("loop always returns by the 10th byte")
    }

    /// Reads int32 (varint).
    pub fn read_int32(&mut self) -> Result<i32> {
        self.expect_wire_type(WireType::Varint)?;
        Ok(self.read_raw_varint32()? as i32)
    }

    /// Reads int64 (varint).
    pub fn read_int64(&mut self) -> Result<i64> {
        self.expect_wire_type(WireType::Varint)?;
        Ok(self.read_raw_varint64()? as i64)
    }

    /// Reads uint32 (varint).
    pub fn read_uint32(&mut self) -> Result<u32> {
        self.expect_wire_type(WireType::Varint)?;
        self.read_raw_varint32()
    }

    /// Reads uint64 (varint).
    pub fn read_uint64(&mut self) -> Result<u64> {
        self.expect_wire_type(WireType::Varint)?;
        self.read_raw_varint64()
    }

    /// Reads sint32 (zigzag varint).
    pub fn read_sint32(&mut self) -> Result<i32> {
        self.expect_wire_type(WireType::Varint)?;
        let n = self.read_raw_varint32()?;
        Ok(((n >> 1) as i32) ^ -((n & 1) as i32))
    }

    /// Reads sint64 (zigzag varint).
    pub fn read_sint64(&mut self) -> Result<i64> {
        self.expect_wire_type(WireType::Varint)?;
        let n = self.read_raw_varint64()?;
        Ok(((n >> 1) as i64) ^ -((n & 1) as i64))
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        if self.end - self.cursor < N {
            return Err(Error::UnexpectedEndOfBuffer);
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.cursor..self.cursor + N]);
        self.cursor += N;
        Ok(out)
    }

    /// Reads fixed32 (little-endian u32).
    pub fn read_fixed32(&mut self) -> Result<u32> {
        self.expect_wire_type(WireType::Fixed32)?;
        Ok(u32::from_le_bytes(self.read_fixed_bytes()?))
    }

    /// Reads fixed64 (little-endian u64).
    pub fn read_fixed64(&mut self) -> Result<u64> {
        self.expect_wire_type(WireType::Fixed64)?;
        Ok(u64::from_le_bytes(self.read_fixed_bytes()?))
    }

    /// Reads sfixed32 (little-endian i32).
    pub fn read_sfixed32(&mut self) -> Result<i32> {
        self.expect_wire_type(WireType::Fixed32)?;
        Ok(i32::from_le_bytes(self.read_fixed_bytes()?))
    }

    /// Reads sfixed64 (little-endian i64).
    pub fn read_sfixed64(&mut self) -> Result<i64> {
        self.expect_wire_type(WireType::Fixed64)?;
        Ok(i64::from_le_bytes(self.read_fixed_bytes()?))
    }

    /// Reads float (little-endian binary32). Rust's native `f32` already
    /// performs the sign/exponent/mantissa reconstruction the format
    /// describes, so there is no 7-decimal-digit rounding step here — that
    /// step exists only for host languages whose only numeric domain is
    /// binary64.
    pub fn read_float(&mut self) -> Result<f32> {
        self.expect_wire_type(WireType::Fixed32)?;
        Ok(f32::from_le_bytes(self.read_fixed_bytes()?))
    }

    /// Reads double (little-endian binary64).
    pub fn read_double(&mut self) -> Result<f64> {
        self.expect_wire_type(WireType::Fixed64)?;
        Ok(f64::from_le_bytes(self.read_fixed_bytes()?))
    }

    /// Reads bool (varint, nonzero is true).
    pub fn read_bool(&mut self) -> Result<bool> {
        self.expect_wire_type(WireType::Varint)?;
        Ok(self.read_raw_varint32()? != 0)
    }

    /// Reads an enum, encoded as a varint i32.
    pub fn read_enum<E: From<i32>>(&mut self) -> Result<E> {
        self.read_int32().map(E::from)
    }

    fn read_delimited_len(&mut self) -> Result<usize> {
        self.expect_wire_type(WireType::Delimited)?;
        let len = self.read_raw_varint64()?;
        if len > (1u64 << 52) {
            return Err(Error::LengthLimit(len));
        }
        Ok(len as usize)
    }

    /// Reads bytes: a length varint followed by that many raw bytes,
    /// returned as a view into the original input buffer.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_delimited_len()?;
        let start = self.cursor;
        let target = start.checked_add(len).ok_or(Error::UnexpectedEndOfBuffer)?;
        if target > self.end {
            return Err(Error::UnexpectedEndOfBuffer);
        }
        self.cursor = target;
        Ok(&self.buf[start..target])
    }

    /// Reads a string: a length varint followed by that many UTF-8 bytes.
    /// Fails on malformed UTF-8; see [`Reader::read_string_lossy`] for the
    /// resync-tolerant alternative.
    pub fn read_string(&mut self) -> Result<&'a str> {
        let raw = self.read_bytes()?;
        Ok(core::str::from_utf8(raw)?)
    }

    /// Reads a string, resynchronizing past stray continuation bytes
    /// rather than failing on malformed UTF-8.
    pub fn read_string_lossy(&mut self) -> Result<String> {
        let raw = self.read_bytes()?;
        Ok(crate::utf8::decode_lossy(raw))
    }

    /// Reads a nested, length-delimited message. Saves `end`, bounds it to
    /// the declared payload length, invokes the embedded deserializer, then
    /// restores `end` and forces the cursor to the byte immediately past
    /// the declared payload — even if the embedded deserializer consumed
    /// fewer bytes than declared.
    pub fn read_message<M: MessageRead<'a>>(&mut self) -> Result<M> {
        let len = self.read_delimited_len()?;
        let saved_end = self.end;
        let target = self
            .cursor
            .checked_add(len)
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        if target > saved_end {
            return Err(Error::UnexpectedEndOfBuffer);
        }
        self.end = target;
        let result = M::from_reader(self);
        self.cursor = target;
        self.end = saved_end;
        result
    }

    /// Reads a length-delimited, two-field (tag 1 = key, tag 2 = value)
    /// map entry, dispatching key/value reads by the declared `FieldType`
    /// rather than via generic closures (there is no generated message
    /// type to carry that generic dispatch here). `Message`-valued maps are
    /// not representable through this path — see [`Reader::read_map_with`].
    pub fn read_map_entry(&mut self, key_type: FieldType, val_type: FieldType) -> Result<(Value, Value)> {
        if !key_type.valid_map_key() {
            return Err(Error::Map(key_type as u32 as u8));
        }
        if !val_type.valid_map_value() || matches!(val_type, FieldType::Message | FieldType::Group) {
            return Err(Error::Map(val_type as u32 as u8));
        }
        let len = self.read_delimited_len()?;
        let saved_end = self.end;
        let target = self
            .cursor
            .checked_add(len)
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        if target > saved_end {
            return Err(Error::UnexpectedEndOfBuffer);
        }
        self.end = target;

        let mut key = None;
        let mut val = None;
        while !self.is_eof() {
            let tag = self.read_u8()?;
            let wire_type = WireType::try_from(tag & 0x7)?;
            self.current_wire_type = Some(wire_type);
            match tag >> 3 {
                1 => key = Some(self.read_scalar(key_type)?),
                2 => val = Some(self.read_scalar(val_type)?),
                other => return Err(Error::Map(other)),
            }
        }
        self.cursor = target;
        self.end = saved_end;

        Ok((
            key.unwrap_or_else(|| default_value(key_type)),
            val.unwrap_or_else(|| default_value(val_type)),
        ))
    }

    /// Reads a map entry whose key and/or value are generic (e.g. a
    /// message-typed value), via caller-supplied readers. Mirrors
    /// [`Reader::read_message`]'s save/restore-end discipline.
    pub fn read_map_with<K, V, FK, FV>(&mut self, mut read_key: FK, mut read_val: FV) -> Result<(K, V)>
    where
        FK: FnMut(&mut Reader<'a>) -> Result<K>,
        FV: FnMut(&mut Reader<'a>) -> Result<V>,
        K: Default,
        V: Default,
    {
        let len = self.read_delimited_len()?;
        let saved_end = self.end;
        let target = self
            .cursor
            .checked_add(len)
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        if target > saved_end {
            return Err(Error::UnexpectedEndOfBuffer);
        }
        self.end = target;

        let mut key = K::default();
        let mut val = V::default();
        while !self.is_eof() {
            match self.next_field()? {
                Some(1) => key = read_key(self)?,
                Some(2) => val = read_val(self)?,
                Some(_) => self.skip_field()?,
                None => break,
            }
        }
        self.cursor = target;
        self.end = saved_end;
        Ok((key, val))
    }

    fn read_scalar(&mut self, ft: FieldType) -> Result<Value> {
        use FieldType::*;
        Ok(match ft {
            Double => Value::Double(self.read_double()?),
            Float => Value::Float(self.read_float()?),
            Int32 => Value::Int32(self.read_int32()?),
            Int64 => Value::Int64(self.read_int64()?),
            Uint32 => Value::Uint32(self.read_uint32()?),
            Uint64 => Value::Uint64(self.read_uint64()?),
            Sint32 => Value::Sint32(self.read_sint32()?),
            Sint64 => Value::Sint64(self.read_sint64()?),
            Fixed32 => Value::Fixed32(self.read_fixed32()?),
            Fixed64 => Value::Fixed64(self.read_fixed64()?),
            Sfixed32 => Value::Sfixed32(self.read_sfixed32()?),
            Sfixed64 => Value::Sfixed64(self.read_sfixed64()?),
            Bool => Value::Bool(self.read_bool()?),
            String => Value::String(self.read_string()?.to_owned()),
            Bytes => Value::Bytes(self.read_bytes()?.to_owned()),
            Enum => Value::Enum(self.read_int32()?),
            Message | Group => return Err(Error::Map(ft as u32 as u8)),
        })
    }

    /// Reads a packed-repeated field: a single `DELIMITED` payload of
    /// concatenated element payloads with no per-element tag. The element
    /// wire type is set implicitly from `elem_type` before each read.
    pub fn read_packed(&mut self, elem_type: FieldType) -> Result<Vec<Value>> {
        if matches!(
            elem_type,
            FieldType::String | FieldType::Bytes | FieldType::Message | FieldType::Group
        ) {
            return Err(Error::Map(elem_type as u32 as u8));
        }
        let len = self.read_delimited_len()?;
        let saved_end = self.end;
        let target = self
            .cursor
            .checked_add(len)
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        if target > saved_end {
            return Err(Error::UnexpectedEndOfBuffer);
        }
        self.end = target;
        self.current_wire_type = Some(elem_type.wire_type());

        let mut out = Vec::new();
        while self.cursor < self.end {
            out.push(self.read_scalar(elem_type)?);
            self.current_wire_type = Some(elem_type.wire_type());
        }
        self.cursor = target;
        self.end = saved_end;
        Ok(out)
    }

    /// Skips the payload of the current field based on `current_wire_type`.
    pub fn skip_field(&mut self) -> Result<()> {
        match self.current_wire_type {
            Some(WireType::Varint) => {
                self.read_raw_varint64()?;
                Ok(())
            }
            Some(WireType::Fixed64) => self.skip_bytes(8),
            Some(WireType::Fixed32) => self.skip_bytes(4),
            Some(WireType::Delimited) => {
                let len = self.read_delimited_len()?;
                self.skip_bytes(len)
            }
            None => Err(Error::InvalidWireType),
        }
    }

    fn skip_bytes(&mut self, n: usize) -> Result<()> {
        let target = self.cursor.checked_add(n).ok_or(Error::UnexpectedEndOfBuffer)?;
        if target > self.end {
            return Err(Error::UnexpectedEndOfBuffer);
        }
        self.cursor = target;
        Ok(())
    }

    /// Reads this library's 5-byte big-endian streaming envelope: the
    /// payload byte length of the following message. Returns `None` at a
    /// zero-length terminator. Bounds `end` to the end of that message so
    /// the subsequent `next_field` loop stops exactly there instead of
    /// running into whatever follows in the stream.
    pub fn header(&mut self) -> Result<Option<usize>> {
        let bytes = self
            .buf
            .get(self.cursor..self.cursor + 5)
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        let len = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
        self.cursor += 5;
        if len == 0 {
            return Ok(None);
        }
        let len = len as usize;
        let target = self
            .cursor
            .checked_add(len)
            .filter(|&t| t <= self.buf.len())
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        self.stream_length = target;
        self.end = target;
        Ok(Some(len))
    }

    /// Advances the cursor to `end` unconditionally.
    pub fn read_to_end(&mut self) {
        self.cursor = self.end;
    }
}

/// The zero/empty default for a field type, used to fill in a map entry's
/// key or value when the wire omitted it (protobuf map entries never emit
/// a default-valued field).
fn default_value(ft: FieldType) -> Value {
    use FieldType::*;
    match ft {
        Double => Value::Double(0.0),
        Float => Value::Float(0.0),
        Int32 => Value::Int32(0),
        Int64 => Value::Int64(0),
        Uint32 => Value::Uint32(0),
        Uint64 => Value::Uint64(0),
        Sint32 => Value::Sint32(0),
        Sint64 => Value::Sint64(0),
        Fixed32 => Value::Fixed32(0),
        Fixed64 => Value::Fixed64(0),
        Sfixed32 => Value::Sfixed32(0),
        Sfixed64 => Value::Sfixed64(0),
        Bool => Value::Bool(false),
        String => Value::String(String::new()),
        Bytes => Value::Bytes(Vec::new()),
        Enum => Value::Enum(0),
        Message | Group => Value::Bytes(Vec::new()),
    }
}

/// Deserializes a `MessageRead` from a `&[u8]` with no length prefix.
pub fn decode<'a, M: MessageRead<'a>>(bytes: &'a [u8]) -> Result<M> {
    let mut reader = Reader::from_bytes(bytes);
    M::from_reader(&mut reader)
}
