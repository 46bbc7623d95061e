//! Binary document envelope.
//!
//! ```text
//! magic "DCDB" | version u32 | content length u32 | xxh3-64 checksum u64 | payload
//! ```
//!
//! The payload is the document header followed by length-prefixed view messages in document
//! order. All integers are little-endian.

pub(crate) mod decode;
pub(crate) mod encode;
mod types;
pub(crate) mod wire;

/// Leading bytes of every encoded document.
pub const DOC_MAGIC: [u8; 4] = *b"DCDB";

/// The single format version this build reads and writes.
pub const SUPPORTED_DOC_VERSION: u32 = 1;

/// Size of the fixed envelope header in bytes.
pub const HEADER_LEN: usize = 20;

/// Deepest view nesting the decoder accepts; roots are at depth one.
pub const MAX_NESTING: usize = 256;
