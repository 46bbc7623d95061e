use std::sync::Arc;

use crate::codec::wire::WireReader;
use crate::codec::{DOC_MAGIC, MAX_NESTING, SUPPORTED_DOC_VERSION};
use crate::document::model::{Document, DocumentHeader, DocumentIndex, NodeData, View};
use crate::document::style::ViewStyle;
use crate::foundation::error::{DesignResult, FormatError};
use crate::foundation::hash::hash_bytes;

/// Fixed envelope preceding the document payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvelopeHeader {
    /// Format version.
    pub version: u32,
    /// Payload length in bytes.
    pub content_length: usize,
    /// xxh3-64 of the payload.
    pub checksum: u64,
}

/// Read and validate only the envelope header.
///
/// Useful to check a cached file's version without decoding it.
pub fn peek_header(bytes: &[u8]) -> DesignResult<EnvelopeHeader> {
    Ok(read_envelope(&mut WireReader::new(bytes))?)
}

/// Decode a complete binary document.
///
/// The envelope is validated before the payload is touched: magic, then version, then payload
/// length and checksum. The id and name indexes are filled while the views are read.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> DesignResult<Document> {
    let doc = decode_document(bytes)
        .inspect_err(|e| tracing::warn!(error = %e, "document decode failed"))?;
    tracing::debug!(views = doc.len(), "decoded document");
    Ok(doc)
}

fn read_envelope(r: &mut WireReader<'_>) -> Result<EnvelopeHeader, FormatError> {
    let mut magic = [0u8; 4];
    magic.copy_from_slice(r.take(4, "magic")?);
    if magic != DOC_MAGIC {
        return Err(FormatError::BadMagic { found: magic });
    }
    let version = r.read_u32("version")?;
    if version != SUPPORTED_DOC_VERSION {
        return Err(FormatError::UnsupportedVersion {
            expected: SUPPORTED_DOC_VERSION,
            found: version,
        });
    }
    Ok(EnvelopeHeader {
        version,
        content_length: r.read_len("content length")?,
        checksum: r.read_u64("checksum")?,
    })
}

fn decode_document(bytes: &[u8]) -> Result<Document, FormatError> {
    let mut r = WireReader::new(bytes);
    let envelope = read_envelope(&mut r)?;
    let payload = r.take(envelope.content_length, "payload")?;
    if r.remaining() != 0 {
        return Err(FormatError::LengthMismatch {
            context: "payload",
            declared: envelope.content_length,
            consumed: envelope.content_length + r.remaining(),
        });
    }
    let found = hash_bytes(payload);
    if found != envelope.checksum {
        return Err(FormatError::ChecksumMismatch {
            expected: envelope.checksum,
            found,
        });
    }

    let mut r = WireReader::new(payload);
    let header: DocumentHeader = r.get()?;
    let count = r.read_len("root count")?;
    let mut index = DocumentIndex::default();
    let mut path = Vec::new();
    let mut roots = Vec::with_capacity(count.min(r.remaining()));
    for i in 0..count {
        path.push(i as u32);
        roots.push(read_view(&mut r, &mut path, &mut index)?);
        path.pop();
    }
    if r.remaining() != 0 {
        return Err(FormatError::LengthMismatch {
            context: "document",
            declared: payload.len(),
            consumed: r.position(),
        });
    }
    Ok(Document::with_index(header, roots, index))
}

fn read_view(
    r: &mut WireReader<'_>,
    path: &mut Vec<u32>,
    index: &mut DocumentIndex,
) -> Result<View, FormatError> {
    if path.len() > MAX_NESTING {
        return Err(FormatError::NestingTooDeep { limit: MAX_NESTING });
    }
    r.message("view", |r| {
        let id: String = r.get()?;
        let name: String = r.get()?;
        index.record(&id, &name, path);
        let style: Arc<ViewStyle> = r.get()?;
        let component = r.get()?;
        let data = read_node_data(r, path, index)?;
        Ok(View {
            id,
            name,
            style,
            data,
            component,
        })
    })
}

fn read_node_data(
    r: &mut WireReader<'_>,
    path: &mut Vec<u32>,
    index: &mut DocumentIndex,
) -> Result<NodeData, FormatError> {
    match r.read_u8("node data")? {
        0 => {
            let shape = r.get()?;
            let count = r.read_len("child count")?;
            let mut children = Vec::with_capacity(count.min(r.remaining()));
            for i in 0..count {
                path.push(i as u32);
                children.push(read_view(r, path, index)?);
                path.pop();
            }
            Ok(NodeData::Container { shape, children })
        }
        1 => Ok(NodeData::Text {
            content: r.get()?,
            res_name: r.get()?,
        }),
        2 => Ok(NodeData::StyledText {
            runs: r.get()?,
            res_name: r.get()?,
        }),
        3 => Ok(NodeData::Shape { shape: r.get()? }),
        tag => Err(FormatError::UnknownTag {
            context: "node data",
            tag,
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/decode.rs"]
mod tests;
