use crate::codec::wire::WireWriter;
use crate::codec::{DOC_MAGIC, SUPPORTED_DOC_VERSION};
use crate::document::model::{Document, NodeData, View};
use crate::foundation::error::{DesignResult, FormatError};
use crate::foundation::hash::hash_bytes;

/// Encode a document into the binary envelope read by [`decode`](super::decode::decode).
///
/// Fails with [`FormatError::LengthOverflow`] when a string, list or message does not fit the
/// format's `u32` length prefixes.
#[tracing::instrument(skip(doc), fields(views = doc.len()))]
pub fn encode(doc: &Document) -> DesignResult<Vec<u8>> {
    let mut w = WireWriter::new();
    w.put(doc.header());
    w.write_len(doc.roots().len());
    for root in doc.roots() {
        write_view(&mut w, root);
    }
    Ok(frame_payload(&w.finish()?)?)
}

/// Prefix a payload with magic, version, length and checksum.
pub(crate) fn frame_payload(payload: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut w = WireWriter::new();
    w.write_raw(&DOC_MAGIC);
    w.write_u32(SUPPORTED_DOC_VERSION);
    w.write_len(payload.len());
    w.write_u64(hash_bytes(payload));
    w.write_raw(payload);
    w.finish()
}

pub(crate) fn write_view(w: &mut WireWriter, view: &View) {
    w.message(|w| {
        w.put(&view.id);
        w.put(&view.name);
        w.put(&view.style);
        w.put(&view.component);
        match &view.data {
            NodeData::Container { shape, children } => {
                w.write_u8(0);
                w.put(shape);
                w.write_len(children.len());
                for child in children {
                    write_view(w, child);
                }
            }
            NodeData::Text { content, res_name } => {
                w.write_u8(1);
                w.put(content);
                w.put(res_name);
            }
            NodeData::StyledText { runs, res_name } => {
                w.write_u8(2);
                w.put(runs);
                w.put(res_name);
            }
            NodeData::Shape { shape } => {
                w.write_u8(3);
                w.put(shape);
            }
        }
    });
}
