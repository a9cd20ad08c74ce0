//! A byte-level Protocol Buffers wire-format codec: an [`Encoder`], a
//! [`Reader`], a [`Writer`], and the streaming envelope that frames
//! consecutive messages in a server-streamed response.
//!
//! Schema validation, reflection over field tags, unknown-field
//! preservation, canonical map-key ordering, deterministic cross-language
//! output, and the deprecated `GROUP` wire type are all out of scope —
//! `GROUP` is rejected as an error rather than read or written. So is
//! `.proto` schema code generation: this crate is the codec that
//! generated message types would call, not the generator itself.

pub mod encoder;
pub mod errors;
pub mod message;
pub mod reader;
pub mod stream;
pub mod utf8;
pub mod value;
pub mod wire;
pub mod writer;

pub use crate::{
    encoder::Encoder,
    errors::{Error, Result},
    message::{MessageInfo, MessageRead, MessageWrite},
    reader::{decode, Reader},
    stream::encode_header,
    value::Value,
    wire::{FieldType, WireType},
    writer::Writer,
};
