//! Sprite timelines.
//!
//! Wire layout after the seven-word sprite header:
//!
//! ```text
//! label_count x { FrameLabel, 3 } symbol_index start_frame unknown
//! (frame_count + keyframe_count) x
//!     { ShowFrame | Keyframe, 2 } id child_count
//!     child_count x { RemoveObject | DoAction | PlaceObject, n } body
//! ```
//!
//! Frame children are dispatched leniently: an unrecognized child is skipped
//! by its declared size and reported to the observer.

use lumen_core::{Action, Deletion, Frame, FrameChild, Label, Placement, Sprite, TagType};

use crate::buffer::ChunkBuffer;
use crate::cursor::ByteCursor;
use crate::error::LumenError;
use crate::registry::{
    expect_header, read_opaque_chunk, ChunkHeader, DecodeContext, DispatchPolicy, Section,
    SectionDecoder,
};

/// Sprite header plus its labels and frames (`0x0027`).
pub struct SpriteDecoder;

impl SectionDecoder for SpriteDecoder {
    fn tag(&self) -> TagType {
        TagType::DefineSprite
    }

    fn decode(
        &self,
        cursor: &mut ByteCursor<'_>,
        header: ChunkHeader,
        ctx: &mut DecodeContext<'_>,
    ) -> Result<Section, LumenError> {
        let id = cursor.read_i32()?;
        let unknown1 = cursor.read_i32()?;
        let unknown2 = cursor.read_i32()?;
        let label_count = cursor.read_count("label")?;
        let frame_count = cursor.read_count("frame")?;
        let keyframe_count = cursor.read_count("keyframe")?;
        let unknown3 = cursor.read_i32()?;
        header.expect_end(cursor)?;

        let mut labels = Vec::with_capacity(cursor.capacity_hint(label_count, 20));
        for _ in 0..label_count {
            let label_header = expect_header(cursor, TagType::FrameLabel)?;
            labels.push(Label {
                symbol_index: cursor.read_i32()?,
                start_frame: cursor.read_i32()?,
                unknown: cursor.read_i32()?,
            });
            label_header.expect_end(cursor)?;
        }

        let mut frames = Vec::with_capacity(cursor.capacity_hint(frame_count, 16));
        let mut keyframes = Vec::with_capacity(cursor.capacity_hint(keyframe_count, 16));
        let total = frame_count.saturating_add(keyframe_count);
        for _ in 0..total {
            let container = ChunkHeader::read(cursor)?;
            let frame = decode_frame(cursor, container, ctx)?;
            if container.tag == TagType::Keyframe.raw() {
                keyframes.push(frame);
            } else {
                frames.push(frame);
            }
        }

        Ok(Section::Sprite(Sprite {
            id,
            unknown1,
            unknown2,
            unknown3,
            labels,
            frames,
            keyframes,
        }))
    }
}

/// Decode a frame body: id, child count, then the children.
///
/// `container` is the already-read frame header. Known children must fill
/// their declared size exactly; unknown ones are skipped by it.
pub fn decode_frame(
    cursor: &mut ByteCursor<'_>,
    container: ChunkHeader,
    ctx: &mut DecodeContext<'_>,
) -> Result<Frame, LumenError> {
    let mut frame = Frame::new(cursor.read_i32()?);
    let child_count = cursor.read_count("frame child")?;
    container.expect_end(cursor)?;
    for _ in 0..child_count {
        let header = ChunkHeader::read(cursor)?;
        let child = match header.tag_type() {
            Some(TagType::RemoveObject) => FrameChild::Deletion(Deletion {
                unknown1: cursor.read_i32()?,
                clip_object_id: cursor.read_i16()?,
                unknown2: cursor.read_i16()?,
            }),
            Some(TagType::DoAction) => FrameChild::Action(Action {
                action_id: cursor.read_i32()?,
                unknown1: cursor.read_i32()?,
            }),
            Some(TagType::PlaceObject) => FrameChild::Placement(decode_placement(cursor, header)?),
            _ => {
                DispatchPolicy::Lenient.reject(cursor, header, ctx)?;
                continue;
            }
        };
        if !matches!(child, FrameChild::Placement(_)) {
            header.expect_end(cursor)?;
        }
        frame.push(child);
    }
    Ok(frame)
}

fn decode_placement(
    cursor: &mut ByteCursor<'_>,
    header: ChunkHeader,
) -> Result<Placement, LumenError> {
    let mut placement = Placement {
        object_id: cursor.read_i32()?,
        placement_id: cursor.read_i32()?,
        unknown1: cursor.read_i32()?,
        name_symbol: cursor.read_i32()?,
        unknown2: cursor.read_i16()?,
        unknown3: cursor.read_i16()?,
        clip_object_id: cursor.read_i16()?,
        unknown4: cursor.read_i16()?,
        transform_flags: cursor.read_i16()?,
        transform_index: cursor.read_i16()?,
        position_flags: cursor.read_u16()?,
        position_index: cursor.read_i16()?,
        color_mult_index: cursor.read_i32()?,
        color_add_index: cursor.read_i32()?,
        color_matrix: None,
        extra: None,
    };
    let has_color_matrix = read_presence_flag(cursor)?;
    let has_extra = read_presence_flag(cursor)?;
    header.expect_end(cursor)?;
    if has_color_matrix {
        placement.color_matrix = Some(read_opaque_chunk(cursor)?);
    }
    if has_extra {
        placement.extra = Some(read_opaque_chunk(cursor)?);
    }
    Ok(placement)
}

/// Read a 0/1 flag. The reference tool read anything other than 1 as
/// absent; this decoder rejects such values as corrupt instead.
fn read_presence_flag(cursor: &mut ByteCursor<'_>) -> Result<bool, LumenError> {
    let offset = cursor.position();
    match cursor.read_i32()? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(LumenError::malformed(
            offset,
            format!("presence flag must be 0 or 1, found {other}"),
        )),
    }
}

/// Write a sprite chunk followed by its labels and frames.
pub fn encode_sprite(out: &mut ChunkBuffer, sprite: &Sprite) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(28);
    body.write_i32(sprite.id);
    body.write_i32(sprite.unknown1);
    body.write_i32(sprite.unknown2);
    body.write_count(sprite.labels.len(), "label")?;
    body.write_count(sprite.frames.len(), "frame")?;
    body.write_count(sprite.keyframes.len(), "keyframe")?;
    body.write_i32(sprite.unknown3);
    out.write_chunk(TagType::DefineSprite, &body)?;

    for label in &sprite.labels {
        let mut body = ChunkBuffer::with_capacity(12);
        body.write_i32(label.symbol_index);
        body.write_i32(label.start_frame);
        body.write_i32(label.unknown);
        out.write_chunk(TagType::FrameLabel, &body)?;
    }
    for frame in &sprite.frames {
        encode_frame(out, TagType::ShowFrame, frame)?;
    }
    for frame in &sprite.keyframes {
        encode_frame(out, TagType::Keyframe, frame)?;
    }
    Ok(())
}

/// Write a frame container. Its declared size covers only the id and the
/// child count; children follow as their own chunks, in stored order.
pub fn encode_frame(out: &mut ChunkBuffer, marker: TagType, frame: &Frame) -> Result<(), LumenError> {
    out.write_header(marker.raw(), 2)?;
    out.write_i32(frame.id);
    out.write_count(frame.children.len(), "frame child")?;
    for child in &frame.children {
        match child {
            FrameChild::Deletion(d) => {
                let mut body = ChunkBuffer::with_capacity(8);
                body.write_i32(d.unknown1);
                body.write_i16(d.clip_object_id);
                body.write_i16(d.unknown2);
                out.write_chunk(TagType::RemoveObject, &body)?;
            }
            FrameChild::Action(a) => {
                let mut body = ChunkBuffer::with_capacity(8);
                body.write_i32(a.action_id);
                body.write_i32(a.unknown1);
                out.write_chunk(TagType::DoAction, &body)?;
            }
            FrameChild::Placement(p) => encode_placement(out, p)?,
        }
    }
    Ok(())
}

fn encode_placement(out: &mut ChunkBuffer, p: &Placement) -> Result<(), LumenError> {
    let mut body = ChunkBuffer::with_capacity(48);
    body.write_i32(p.object_id);
    body.write_i32(p.placement_id);
    body.write_i32(p.unknown1);
    body.write_i32(p.name_symbol);
    body.write_i16(p.unknown2);
    body.write_i16(p.unknown3);
    body.write_i16(p.clip_object_id);
    body.write_i16(p.unknown4);
    body.write_i16(p.transform_flags);
    body.write_i16(p.transform_index);
    body.write_u16(p.position_flags);
    body.write_i16(p.position_index);
    body.write_i32(p.color_mult_index);
    body.write_i32(p.color_add_index);
    body.write_i32(i32::from(p.color_matrix.is_some()));
    body.write_i32(i32::from(p.extra.is_some()));
    out.write_chunk(TagType::PlaceObject, &body)?;

    for block in [&p.color_matrix, &p.extra].into_iter().flatten() {
        out.write_opaque(block)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeConfig;
    use crate::observer::DecodeEvent;
    use lumen_core::OpaqueBlock;

    fn decode_sprite_bytes(
        bytes: &[u8],
        events: &mut Vec<DecodeEvent>,
    ) -> Result<(Sprite, usize), LumenError> {
        let mut cursor = ByteCursor::new(bytes);
        let header = ChunkHeader::read(&mut cursor)?;
        let config = DecodeConfig::default();
        let mut ctx = DecodeContext::new(&config, events);
        match SpriteDecoder.decode(&mut cursor, header, &mut ctx)? {
            Section::Sprite(sprite) => Ok((sprite, cursor.position())),
            other => panic!("expected sprite, got {other:?}"),
        }
    }

    fn placement(object_id: i32) -> Placement {
        Placement {
            object_id,
            placement_id: 1,
            name_symbol: -1,
            transform_index: 3,
            position_flags: 0x8000,
            position_index: -1,
            color_mult_index: -1,
            color_add_index: -1,
            ..Default::default()
        }
    }

    fn interleaved_frame() -> Frame {
        let mut frame = Frame::new(5);
        frame.push(FrameChild::Placement(placement(1)));
        frame.push(FrameChild::Deletion(Deletion {
            unknown1: 0,
            clip_object_id: 2,
            unknown2: 0,
        }));
        frame.push(FrameChild::Action(Action {
            action_id: 7,
            unknown1: 0,
        }));
        frame
    }

    fn sample_sprite() -> Sprite {
        Sprite {
            id: 12,
            unknown1: 1,
            unknown2: 2,
            unknown3: 3,
            labels: vec![Label {
                symbol_index: 4,
                start_frame: 0,
                unknown: 0,
            }],
            frames: vec![interleaved_frame(), Frame::new(6)],
            keyframes: vec![interleaved_frame()],
        }
    }

    #[test]
    fn sprite_survives_with_child_order() {
        let sprite = sample_sprite();
        let mut out = ChunkBuffer::new();
        encode_sprite(&mut out, &sprite).unwrap();
        assert_eq!(&out.as_bytes()[4..8], &7u32.to_be_bytes());

        let mut events = Vec::new();
        let (decoded, end) = decode_sprite_bytes(out.as_bytes(), &mut events).unwrap();
        assert_eq!(end, out.len());
        assert_eq!(decoded, sprite);
        assert!(events.is_empty());
    }

    #[test]
    fn label_is_a_full_chunk() {
        let sprite = Sprite {
            labels: vec![Label {
                symbol_index: 9,
                start_frame: 2,
                unknown: 0,
            }],
            ..Default::default()
        };
        let mut out = ChunkBuffer::new();
        encode_sprite(&mut out, &sprite).unwrap();
        let label = &out.as_bytes()[36..];
        assert_eq!(&label[..8], &[0, 0, 0, 0x2B, 0, 0, 0, 3]);
        assert_eq!(&label[8..12], &9i32.to_be_bytes());
    }

    #[test]
    fn keyframe_marker_selects_list() {
        let sprite = Sprite {
            frames: vec![Frame::new(1)],
            keyframes: vec![Frame::new(2), Frame::new(3)],
            ..Default::default()
        };
        let mut out = ChunkBuffer::new();
        encode_sprite(&mut out, &sprite).unwrap();
        // First container follows the 36-byte sprite chunk.
        assert_eq!(&out.as_bytes()[36..44], &[0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(&out.as_bytes()[52..56], &0xF105u32.to_be_bytes());

        let (decoded, _) = decode_sprite_bytes(out.as_bytes(), &mut Vec::new()).unwrap();
        assert_eq!(decoded.frames.len(), 1);
        assert_eq!(
            decoded.keyframes.iter().map(|f| f.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn attached_blocks_follow_the_placement() {
        let mut p = placement(3);
        p.color_matrix = Some(OpaqueBlock::new(TagType::ColorMatrix.raw(), vec![0xAB; 80]).unwrap());
        p.extra = Some(OpaqueBlock::new(0xF014, vec![0xCD; 4]).unwrap());
        let mut frame = Frame::new(0);
        frame.push(FrameChild::Placement(p.clone()));
        let sprite = Sprite {
            frames: vec![frame],
            ..Default::default()
        };

        let mut out = ChunkBuffer::new();
        encode_sprite(&mut out, &sprite).unwrap();
        let (decoded, end) = decode_sprite_bytes(out.as_bytes(), &mut Vec::new()).unwrap();
        assert_eq!(end, out.len());
        let got: Vec<&Placement> = decoded.frames[0].placements().collect();
        assert_eq!(got, vec![&p]);
        assert_eq!(got[0].extra.as_ref().map(OpaqueBlock::tag), Some(0xF014));
    }

    #[test]
    fn bad_presence_flag_is_malformed() {
        let mut frame = Frame::new(0);
        frame.push(FrameChild::Placement(placement(3)));
        let sprite = Sprite {
            frames: vec![frame],
            ..Default::default()
        };
        let mut out = ChunkBuffer::new();
        encode_sprite(&mut out, &sprite).unwrap();
        let mut bytes = out.into_bytes();
        // sprite 36 + container 16 + placement header 8 + 40 bytes of fields
        let flag = 36 + 16 + 8 + 40;
        bytes[flag + 3] = 2;
        assert!(matches!(
            decode_sprite_bytes(&bytes, &mut Vec::new()),
            Err(LumenError::MalformedContainer { offset, .. }) if offset == flag
        ));
    }

    #[test]
    fn unknown_child_is_skipped_and_reported() {
        let mut out = ChunkBuffer::new();
        encode_sprite(
            &mut out,
            &Sprite {
                frames: vec![Frame::new(0)],
                ..Default::default()
            },
        )
        .unwrap();
        let mut bytes = out.into_bytes();
        // Bump child_count to 2 and append an unknown child then an action.
        bytes[51] = 2;
        let mut tail = ChunkBuffer::new();
        tail.write_raw_chunk(0x0099, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut action = ChunkBuffer::new();
        action.write_i32(42);
        action.write_i32(0);
        tail.write_chunk(TagType::DoAction, &action).unwrap();
        bytes.extend_from_slice(tail.as_bytes());

        let mut events = Vec::new();
        let (decoded, end) = decode_sprite_bytes(&bytes, &mut events).unwrap();
        assert_eq!(end, bytes.len());
        assert_eq!(decoded.frames[0].children.len(), 1);
        assert_eq!(decoded.frames[0].actions().next().map(|a| a.action_id), Some(42));
        assert_eq!(
            events,
            vec![DecodeEvent::ChildSkipped {
                tag: 0x99,
                offset: 52,
                words: 2
            }]
        );
    }

    fn one_action_sprite() -> Vec<u8> {
        let mut frame = Frame::new(0);
        frame.push(FrameChild::Action(Action {
            action_id: 1,
            unknown1: 0,
        }));
        let mut out = ChunkBuffer::new();
        encode_sprite(
            &mut out,
            &Sprite {
                frames: vec![frame],
                ..Default::default()
            },
        )
        .unwrap();
        out.into_bytes()
    }

    #[test]
    fn child_size_must_match_its_body() {
        let mut bytes = one_action_sprite();
        // sprite 36 + container 16; the action header's word count.
        bytes[59] = 1;
        assert!(matches!(
            decode_sprite_bytes(&bytes, &mut Vec::new()),
            Err(LumenError::MalformedContainer { offset: 52, .. })
        ));
    }

    #[test]
    fn container_and_sprite_sizes_are_checked() {
        let mut bytes = one_action_sprite();
        bytes[43] = 3;
        assert!(matches!(
            decode_sprite_bytes(&bytes, &mut Vec::new()),
            Err(LumenError::MalformedContainer { offset: 36, .. })
        ));

        let mut bytes = one_action_sprite();
        bytes[7] = 8;
        assert!(matches!(
            decode_sprite_bytes(&bytes, &mut Vec::new()),
            Err(LumenError::MalformedContainer { offset: 0, .. })
        ));
    }

    #[test]
    fn wrong_label_tag_is_malformed() {
        let sprite = Sprite {
            labels: vec![Label::default()],
            ..Default::default()
        };
        let mut out = ChunkBuffer::new();
        encode_sprite(&mut out, &sprite).unwrap();
        let mut bytes = out.into_bytes();
        bytes[39] = 0x2C;
        assert!(matches!(
            decode_sprite_bytes(&bytes, &mut Vec::new()),
            Err(LumenError::MalformedContainer { offset: 36, .. })
        ));
    }
}
