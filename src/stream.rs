//! This library's own streaming envelope: a 5-byte big-endian length
//! prefix separating consecutive messages in a server-streamed response.
//!
//! This is deliberately NOT gRPC's 5-byte header (1 compressed-flag byte
//! plus a 4-byte length) and NOT protobuf's own length-delimited wire
//! form — it is a full 5-byte big-endian unsigned length, read back by
//! [`crate::reader::Reader::header`].

use crate::errors::{Error, Result};

/// The largest payload length representable in 5 big-endian bytes.
pub const MAX_FRAME_LEN: u64 = (1u64 << 40) - 1;

/// Encodes the 5-byte streaming envelope prefix for a message whose
/// payload is `len` bytes. A `len` of zero is reserved to terminate the
/// stream, so it is accepted here too — callers write it to signal EOF.
pub fn encode_header(len: u64) -> Result<[u8; 5]> {
    if len > MAX_FRAME_LEN {
        return Err(Error::LengthLimit(len));
    }
    let mut out = [0u8; 5];
    out[0] = ((len >> 32) & 0xFF) as u8;
    out[1] = ((len >> 24) & 0xFF) as u8;
    out[2] = ((len >> 16) & 0xFF) as u8;
    out[3] = ((len >> 8) & 0xFF) as u8;
    out[4] = (len & 0xFF) as u8;
    Ok(out)
}
