//! A runtime-typed scalar value, used where a [`crate::wire::FieldType`] is
//! only known at runtime rather than baked into generated code — map keys
//! and values, and packed-repeated elements.

use crate::wire::FieldType;

/// One decoded (or to-be-encoded) scalar, tagged with the [`FieldType`] it
/// was read as. `Message` values are deliberately absent: a message-typed
/// map value or packed element needs a concrete `MessageRead`/`MessageWrite`
/// type, which this runtime-typed enum cannot carry — those go through the
/// generic, closure-based `Reader::read_map_with`/`Writer::map_entry_with`
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    Float(f32),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Sint32(i32),
    Sint64(i64),
    Fixed32(u32),
    Fixed64(u64),
    Sfixed32(i32),
    Sfixed64(i64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Enum(i32),
}

impl Value {
    /// The `FieldType` this value was produced for.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Double(_) => FieldType::Double,
            Value::Float(_) => FieldType::Float,
            Value::Int32(_) => FieldType::Int32,
            Value::Int64(_) => FieldType::Int64,
            Value::Uint32(_) => FieldType::Uint32,
            Value::Uint64(_) => FieldType::Uint64,
            Value::Sint32(_) => FieldType::Sint32,
            Value::Sint64(_) => FieldType::Sint64,
            Value::Fixed32(_) => FieldType::Fixed32,
            Value::Fixed64(_) => FieldType::Fixed64,
            Value::Sfixed32(_) => FieldType::Sfixed32,
            Value::Sfixed64(_) => FieldType::Sfixed64,
            Value::Bool(_) => FieldType::Bool,
            Value::String(_) => FieldType::String,
            Value::Bytes(_) => FieldType::Bytes,
            Value::Enum(_) => FieldType::Enum,
        }
    }
}
