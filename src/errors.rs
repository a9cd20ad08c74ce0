//! Error kinds produced by the encoder, reader and writer.

use std::fmt;
use std::io::Error as IoError;
use std::str::Utf8Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while decoding or encoding a wire-format
/// value. Every variant corresponds to one of the error kinds named by the
/// format contract; there is no partial-retry at this layer, so every
/// variant is fatal for the operation that raised it.
#[derive(Debug)]
pub enum Error {
    /// Wrapped I/O error from a `std::io::Write` sink.
    Io(IoError),
    /// A length-delimited payload was not valid UTF-8.
    Utf8(Utf8Error),
    /// A varint read past its declared width's tolerance window.
    Varint,
    /// A read would advance the cursor past `end`.
    UnexpectedEndOfBuffer,
    /// Tag carried wire type 3 (`START_GROUP`) or 4 (`END_GROUP`), or an
    /// unrecognized value outside 0/1/2/5.
    UnknownWireType(u8),
    /// A typed read was attempted against a `current_wire_type` it does
    /// not match.
    InvalidWireType,
    /// `GROUP` is a deprecated wire representation; rejected unconditionally.
    Deprecated(&'static str),
    /// Map entry, map/packed element carried a field type unsupported for
    /// that position.
    Map(u8),
    /// Writer was called with a field number < 1.
    InvalidFieldNumber(i64),
    /// Writer was called with a value outside the declared range for the
    /// target field type.
    RangeViolation,
    /// A declared string/bytes length exceeded 2^52.
    LengthLimit(u64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Utf8(e) => write!(f, "invalid utf-8: {e}"),
            Error::Varint => write!(f, "varint overflowed its declared width"),
            Error::UnexpectedEndOfBuffer => write!(f, "unexpected end of buffer"),
            Error::UnknownWireType(t) => write!(f, "unknown wire type {t}"),
            Error::InvalidWireType => write!(f, "read did not match the current wire type"),
            Error::Deprecated(what) => write!(f, "deprecated wire type: {what}"),
            Error::Map(t) => write!(f, "invalid map field tag {t}"),
            Error::InvalidFieldNumber(n) => write!(f, "invalid field number {n}"),
            Error::RangeViolation => write!(f, "value outside the declared domain for this type"),
            Error::LengthLimit(n) => write!(f, "length {n} exceeds the 2^52 limit"),
        }
    }
}

impl std::error::Error for Error {}

impl From<IoError> for Error {
    fn from(e: IoError) -> Error {
        Error::Io(e)
    }
}

impl From<Utf8Error> for Error {
    fn from(e: Utf8Error) -> Error {
        Error::Utf8(e)
    }
}
