//! The client-facing contract: generated message types implement these
//! traits and are the only polymorphic surface the codec exposes. Building
//! `.proto`-driven code generation against this contract is out of scope
//! for this crate.

use crate::errors::Result;
use crate::reader::Reader;
use crate::writer::Writer;

/// Serializes `Self` to a [`Writer`].
pub trait MessageWrite: Sized {
    /// Writes `Self`'s fields into `w`, tag-prefixed, in whatever order the
    /// implementation chooses.
    fn write_message(&self, w: &mut Writer) -> Result<()>;

    /// The exact number of bytes `write_message` will emit. Used by
    /// callers that want to pre-size a buffer; the codec itself never
    /// requires this (delimited scopes are patched after the fact).
    fn get_size(&self) -> usize {
        0
    }
}

/// Deserializes `Self` from a [`Reader`].
pub trait MessageRead<'a>: Sized {
    /// Reads fields via `r.next_field()` until it returns `None`,
    /// dispatching on field number, until the reader's local `end` (set by
    /// whichever caller bounded this read — `Reader::read_message`, a
    /// top-level `decode`, or a streaming `header`) is reached.
    fn from_reader(r: &mut Reader<'a>) -> Result<Self>;
}

/// Basic identifying information about a generated message type.
pub trait MessageInfo {
    /// Full message path, in the form `Package.Message`.
    const PATH: &'static str;
}
