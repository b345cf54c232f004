//! The top-level decode loop.

use std::io::Read;

use lumen_core::{Document, Header, HEADER_WORDS};

use crate::config::DecodeConfig;
use crate::cursor::ByteCursor;
use crate::error::LumenError;
use crate::observer::{DecodeEvent, DecodeObserver};
use crate::registry::{read_opaque_body, route, ChunkHeader, DecodeContext, DispatchPolicy, Route};

/// Decodes whole containers with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    /// A decoder with the given settings.
    pub fn new(config: DecodeConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode a complete container.
    pub fn decode(&self, data: &[u8]) -> Result<Document, LumenError> {
        self.decode_observed(data, &mut ())
    }

    /// Decode a complete container, reporting events to `observer`.
    ///
    /// Bytes after the terminator chunk are ignored. Any error discards the
    /// partially built document.
    pub fn decode_observed(
        &self,
        data: &[u8],
        observer: &mut dyn DecodeObserver,
    ) -> Result<Document, LumenError> {
        let mut cursor = ByteCursor::new(data);
        let mut ctx = DecodeContext::new(&self.config, observer);
        let mut doc = Document::new();
        doc.header = read_header(&mut cursor)?;

        loop {
            let header = ChunkHeader::read(&mut cursor)?;
            ctx.emit(DecodeEvent::ChunkStart {
                tag: header.tag,
                offset: header.offset,
                words: header.words,
            });

            match route(header.tag) {
                Route::End => {
                    ctx.emit(DecodeEvent::Terminated {
                        offset: header.offset,
                    });
                    return Ok(doc);
                }
                Route::Invalid => {
                    return Err(LumenError::malformed(header.offset, "chunk id 0"));
                }
                Route::Opaque(kind) => {
                    let block = read_opaque_body(&mut cursor, header)?;
                    ctx.emit(DecodeEvent::OpaqueCaptured {
                        kind,
                        bytes: block.payload().len(),
                    });
                    if doc.set_opaque(kind, block).is_some() {
                        ctx.emit(DecodeEvent::OpaqueReplaced {
                            kind,
                            offset: header.offset,
                        });
                    }
                }
                Route::Section(decoder) => {
                    decoder.decode(&mut cursor, header, &mut ctx)?.apply(&mut doc);
                }
                Route::Unsupported => {
                    DispatchPolicy::Strict.reject(&mut cursor, header, &mut ctx)?;
                }
            }
        }
    }

    /// Read the whole stream, then decode it.
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<Document, LumenError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.decode(&data)
    }
}

fn read_header(cursor: &mut ByteCursor<'_>) -> Result<Header, LumenError> {
    let mut words = [0i32; HEADER_WORDS];
    for word in &mut words {
        *word = cursor.read_i32()?;
    }
    Ok(Header::from_words(words))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{OpaqueKind, TagType};

    fn header_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        for w in 0..HEADER_WORDS as i32 {
            bytes.extend_from_slice(&(w * 100).to_be_bytes());
        }
        bytes
    }

    fn push_chunk(bytes: &mut Vec<u8>, tag: u32, payload: &[u8]) {
        bytes.extend_from_slice(&tag.to_be_bytes());
        bytes.extend_from_slice(&((payload.len() / 4) as u32).to_be_bytes());
        bytes.extend_from_slice(payload);
    }

    #[test]
    fn header_then_end_is_an_empty_document() {
        let mut bytes = header_bytes();
        push_chunk(&mut bytes, TagType::End.raw(), &[]);
        let doc = Decoder::default().decode(&bytes).unwrap();
        assert_eq!(doc.header.magic, 0);
        assert_eq!(doc.header.filesize, 700);
        assert!(doc.opaque.is_empty());
    }

    #[test]
    fn truncated_header_is_a_bounds_violation() {
        let bytes = header_bytes();
        assert!(matches!(
            Decoder::default().decode(&bytes[..40]),
            Err(LumenError::BoundsViolation { offset: 40, .. })
        ));
    }

    #[test]
    fn missing_terminator_is_a_bounds_violation() {
        let bytes = header_bytes();
        assert!(matches!(
            Decoder::default().decode(&bytes),
            Err(LumenError::BoundsViolation { offset: 64, .. })
        ));
    }

    #[test]
    fn duplicate_opaque_keeps_last_and_reports() {
        let mut bytes = header_bytes();
        push_chunk(&mut bytes, 0xF00C, &[1, 1, 1, 1]);
        push_chunk(&mut bytes, 0xF00C, &[2, 2, 2, 2, 2, 2, 2, 2]);
        push_chunk(&mut bytes, TagType::End.raw(), &[]);

        let mut events: Vec<DecodeEvent> = Vec::new();
        let doc = Decoder::default()
            .decode_observed(&bytes, &mut events)
            .unwrap();
        assert_eq!(
            doc.opaque(OpaqueKind::Properties).map(|b| b.payload().to_vec()),
            Some(vec![2; 8])
        );
        assert!(events.contains(&DecodeEvent::OpaqueReplaced {
            kind: OpaqueKind::Properties,
            offset: 76,
        }));
        assert_eq!(events.last(), Some(&DecodeEvent::Terminated { offset: 92 }));
    }

    #[test]
    fn trailing_bytes_after_end_are_ignored() {
        let mut bytes = header_bytes();
        push_chunk(&mut bytes, TagType::End.raw(), &[]);
        bytes.extend_from_slice(&[0xEE; 6]);
        assert!(Decoder::default().decode(&bytes).is_ok());
    }

    #[test]
    fn reader_entry_point() {
        let mut bytes = header_bytes();
        push_chunk(&mut bytes, TagType::End.raw(), &[]);
        let doc = Decoder::default().decode_reader(&bytes[..]).unwrap();
        assert_eq!(doc.header.unknown[0], 100);
    }
}
