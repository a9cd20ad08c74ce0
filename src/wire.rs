//! Wire types and field types of the protobuf wire format.

use crate::errors::Error;

/// The 3-bit shape tag that precedes every field's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    Delimited = 2,
    Fixed32 = 5,
}

impl WireType {
    /// Splits a tag into `(field_number, wire_type)` and validates the
    /// wire type. Rejects 3 (`START_GROUP`) and 4 (`END_GROUP`) explicitly
    /// rather than via a short-circuiting comparison, since that is the
    /// one part of this check the reference source gets wrong.
    pub fn from_tag(tag: u64) -> Result<(u32, WireType), Error> {
        let wire_type = (tag & 0x7) as u8;
        let field_number = (tag >> 3) as u32;
        let wire_type = WireType::try_from(wire_type)?;
        Ok((field_number, wire_type))
    }
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Error> {
        match v {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::Delimited),
            5 => Ok(WireType::Fixed32),
            3 => Err(Error::Deprecated("start_group")),
            4 => Err(Error::Deprecated("end_group")),
            other => Err(Error::UnknownWireType(other)),
        }
    }
}

/// A logical protobuf declared type, mapping to a wire type and a numeric
/// interpretation. `Group` is retained only so map/packed dispatch can
/// reject it by name; it is never a legal map key, map value, or packed
/// element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FieldType {
    Double = 1,
    Float = 2,
    Int64 = 3,
    Uint64 = 4,
    Int32 = 5,
    Fixed64 = 6,
    Fixed32 = 7,
    Bool = 8,
    String = 9,
    Group = 10,
    Message = 11,
    Bytes = 12,
    Uint32 = 13,
    Enum = 14,
    Sfixed32 = 15,
    Sfixed64 = 16,
    Sint32 = 17,
    Sint64 = 18,
}

impl FieldType {
    /// The wire type a value of this field type is carried on.
    pub fn wire_type(self) -> WireType {
        use FieldType::*;
        match self {
            Double | Fixed64 | Sfixed64 => WireType::Fixed64,
            Float | Fixed32 | Sfixed32 => WireType::Fixed32,
            String | Message | Bytes | Group => WireType::Delimited,
            _ => WireType::Varint,
        }
    }

    /// Whether this type is legal as a map key (any scalar except
    /// `DOUBLE`, `FLOAT`, `BYTES`).
    pub fn valid_map_key(self) -> bool {
        !matches!(
            self,
            FieldType::Double
                | FieldType::Float
                | FieldType::Bytes
                | FieldType::Message
                | FieldType::Group
        )
    }

    /// Whether this type is legal as a map value (any non-map, non-group
    /// type — maps-of-maps are not representable on the wire).
    pub fn valid_map_value(self) -> bool {
        !matches!(self, FieldType::Group)
    }
}

impl TryFrom<u32> for FieldType {
    type Error = Error;

    fn try_from(v: u32) -> Result<Self, Error> {
        use FieldType::*;
        Ok(match v {
            1 => Double,
            2 => Float,
            3 => Int64,
            4 => Uint64,
            5 => Int32,
            6 => Fixed64,
            7 => Fixed32,
            8 => Bool,
            9 => String,
            10 => Group,
            11 => Message,
            12 => Bytes,
            13 => Uint32,
            14 => Enum,
            15 => Sfixed32,
            16 => Sfixed64,
            17 => Sint32,
            18 => Sint64,
            other => return Err(Error::Map(other as u8)),
        })
    }
}
