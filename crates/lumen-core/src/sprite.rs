//! Sprite timelines: labels, frames, and the child records inside frames.

use smallvec::SmallVec;

use crate::opaque::OpaqueBlock;

/// A named entry point into a sprite timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Label {
    /// Symbol index of the label name.
    pub symbol_index: i32,
    /// First frame covered by the label.
    pub start_frame: i32,
    /// Unidentified field, preserved verbatim.
    pub unknown: i32,
}

/// Adds or updates a displayed child object.
///
/// The two trailing blocks are attached only when their presence flag is set
/// on the wire; their contents are not modeled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placement {
    /// Character id of the placed object.
    pub object_id: i32,
    /// Placement id (display depth slot).
    pub placement_id: i32,
    /// Unidentified.
    pub unknown1: i32,
    /// Symbol index of the instance name.
    pub name_symbol: i32,
    /// Unidentified.
    pub unknown2: i16,
    /// Unidentified.
    pub unknown3: i16,
    /// Object id within the enclosing clip.
    pub clip_object_id: i16,
    /// Unidentified.
    pub unknown4: i16,
    /// Transform flags.
    pub transform_flags: i16,
    /// Index into the document's transforms.
    pub transform_index: i16,
    /// Position flags.
    pub position_flags: u16,
    /// Index into the document's positions.
    pub position_index: i16,
    /// Index into the document's colors (multiplicative term).
    pub color_mult_index: i32,
    /// Index into the document's colors (additive term).
    pub color_add_index: i32,
    /// Optional color matrix chunk.
    pub color_matrix: Option<OpaqueBlock>,
    /// Optional unidentified trailing chunk.
    pub extra: Option<OpaqueBlock>,
}

/// Removes a displayed child object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deletion {
    /// Unidentified.
    pub unknown1: i32,
    /// Object id within the enclosing clip.
    pub clip_object_id: i16,
    /// Unidentified.
    pub unknown2: i16,
}

/// Triggers a script action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Action {
    /// Script action id.
    pub action_id: i32,
    /// Unidentified.
    pub unknown1: i32,
}

/// One child record of a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameChild {
    /// Object removal.
    Deletion(Deletion),
    /// Script trigger.
    Action(Action),
    /// Object placement.
    Placement(Placement),
}

/// Child storage for a frame. Most frames carry one or two records.
pub type FrameChildren = SmallVec<[FrameChild; 2]>;

/// A point on a sprite timeline.
///
/// Children are kept in wire order; the partitioned accessors are views.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Frame id.
    pub id: i32,
    /// Child records in original order.
    pub children: FrameChildren,
}

impl Frame {
    /// An empty frame.
    pub fn new(id: i32) -> Self {
        Self {
            id,
            children: FrameChildren::new(),
        }
    }

    /// Append a child record.
    pub fn push(&mut self, child: FrameChild) {
        self.children.push(child);
    }

    /// Deletions, in order.
    pub fn deletions(&self) -> impl Iterator<Item = &Deletion> + '_ {
        self.children.iter().filter_map(|child| match child {
            FrameChild::Deletion(d) => Some(d),
            _ => None,
        })
    }

    /// Actions, in order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> + '_ {
        self.children.iter().filter_map(|child| match child {
            FrameChild::Action(a) => Some(a),
            _ => None,
        })
    }

    /// Placements, in order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> + '_ {
        self.children.iter().filter_map(|child| match child {
            FrameChild::Placement(p) => Some(p),
            _ => None,
        })
    }
}

/// A movie-clip-like sprite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sprite {
    /// Character id.
    pub id: i32,
    /// Unidentified.
    pub unknown1: i32,
    /// Unidentified.
    pub unknown2: i32,
    /// Unidentified.
    pub unknown3: i32,
    /// Timeline labels.
    pub labels: Vec<Label>,
    /// Regular frames, in order.
    pub frames: Vec<Frame>,
    /// Keyframes, in order.
    pub keyframes: Vec<Frame>,
}

impl Sprite {
    /// Frames plus keyframes.
    pub fn total_frames(&self) -> usize {
        self.frames.len() + self.keyframes.len()
    }
}
