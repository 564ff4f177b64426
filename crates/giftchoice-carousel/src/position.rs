use serde::{Deserialize, Serialize};

/// How many times the base sequence is laid out
pub const LOOP_COPIES: usize = 3;

/// Offsets below this many copy widths count as near the left edge
const LEFT_EDGE_COPIES: f64 = 0.5;
/// Offsets above this many copy widths count as near the right edge
const RIGHT_EDGE_COPIES: f64 = 2.5;

/// Measured layout of a carousel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub item_width: f64,
    pub viewport_width: f64,
    pub base_len: usize,
}

impl Geometry {
    pub fn new(item_width: f64, viewport_width: f64, base_len: usize) -> Self {
        Self {
            item_width,
            viewport_width,
            base_len,
        }
    }

    /// A carousel with no items or no measured width cannot be positioned
    pub fn is_measurable(&self) -> bool {
        self.item_width.is_finite() && self.item_width > 0.0 && self.base_len > 0
    }

    /// Width of one copy of the base sequence
    pub fn copy_width(&self) -> f64 {
        self.item_width * self.base_len as f64
    }

    /// Offset at which the middle copy starts
    pub fn middle_offset(&self) -> f64 {
        self.copy_width()
    }

    pub fn loop_len(&self) -> usize {
        self.base_len * LOOP_COPIES
    }
}

/// Where the scroll offset sits relative to the loop edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
    Settled,
    NearLeftEdge,
    NearRightEdge,
}

/// Result of evaluating one scroll offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Slot under the viewport centre, in loop coordinates (may be negative on overscroll)
    pub raw_index: i64,
    /// Index into the base sequence
    pub active_index: usize,
    /// Offset to apply; differs from the input only after a teleport
    pub corrected_offset: f64,
    pub state: EdgeState,
}

impl SyncOutcome {
    pub fn teleported(&self) -> bool {
        self.state != EdgeState::Settled
    }
}

/// Map a raw scroll offset to the active item and the corrected offset.
///
/// Returns `None` when the geometry is not measurable or the offset is not finite.
pub fn sync_position(geometry: &Geometry, offset: f64) -> Option<SyncOutcome> {
    if !geometry.is_measurable() || !offset.is_finite() {
        return None;
    }

    let center = offset + geometry.viewport_width / 2.0;
    // Slot whose span contains the centre; a centre on a boundary belongs to the right-hand slot
    let raw_index = (center / geometry.item_width).floor() as i64;
    let active_index = raw_index.rem_euclid(geometry.base_len as i64) as usize;

    let copy = geometry.copy_width();
    let (state, corrected_offset) = if offset < copy * LEFT_EDGE_COPIES {
        (EdgeState::NearLeftEdge, offset + copy)
    } else if offset > copy * RIGHT_EDGE_COPIES {
        (EdgeState::NearRightEdge, offset - copy)
    } else {
        (EdgeState::Settled, offset)
    };

    Some(SyncOutcome {
        raw_index,
        active_index,
        corrected_offset,
        state,
    })
}
