use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::position::{sync_position, Geometry, LOOP_COPIES};

/// Changes the view must apply after a scroll evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollUpdate {
    /// New active base index, if it changed
    pub active_index: Option<usize>,
    /// Offset to jump to silently, if a teleport happened
    pub teleport_to: Option<f64>,
}

impl ScrollUpdate {
    pub fn is_empty(&self) -> bool {
        self.active_index.is_none() && self.teleport_to.is_none()
    }
}

/// Looped carousel over a base sequence of items
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    item_width: f64,
    viewport_width: f64,
    offset: f64,
    active_index: usize,
    viewed: HashSet<String>,
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            item_width: 0.0,
            viewport_width: 0.0,
            offset: 0.0,
            active_index: 0,
            viewed: HashSet::new(),
        }
    }

    /// Replace the base sequence; position resets like a fresh mount
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.offset = 0.0;
        self.active_index = 0;
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.item_width, self.viewport_width, self.items.len())
    }

    /// Record measured widths. Non-positive item widths are ignored so a
    /// transient zero measurement does not discard the last good one.
    pub fn measure(&mut self, item_width: f64, viewport_width: f64) {
        if item_width.is_finite() && item_width > 0.0 {
            self.item_width = item_width;
        }
        if viewport_width.is_finite() && viewport_width >= 0.0 {
            self.viewport_width = viewport_width;
        }
    }

    /// Jump to the start of the middle copy. Returns the offset to scroll to,
    /// or `None` while the carousel is empty or unmeasured.
    pub fn mount(&mut self) -> Option<f64> {
        let geometry = self.geometry();
        if !geometry.is_measurable() {
            return None;
        }
        self.offset = geometry.middle_offset();
        self.active_index = 0;
        Some(self.offset)
    }

    /// Evaluate a scroll offset reported by the view
    pub fn on_scroll(&mut self, offset: f64) -> ScrollUpdate {
        let Some(outcome) = sync_position(&self.geometry(), offset) else {
            return ScrollUpdate::default();
        };

        let mut update = ScrollUpdate::default();
        if outcome.active_index != self.active_index {
            self.active_index = outcome.active_index;
            update.active_index = Some(outcome.active_index);
        }
        if outcome.teleported() {
            trace!(
                from = offset,
                to = outcome.corrected_offset,
                state = ?outcome.state,
                "Carousel teleport"
            );
            update.teleport_to = Some(outcome.corrected_offset);
        }
        self.offset = outcome.corrected_offset;
        update
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> Option<&T> {
        self.items.get(self.active_index)
    }

    pub fn base_len(&self) -> usize {
        self.items.len()
    }

    pub fn loop_len(&self) -> usize {
        self.items.len() * LOOP_COPIES
    }

    /// Base index shown in a loop slot
    pub fn base_index(&self, slot: usize) -> Option<usize> {
        (!self.items.is_empty()).then(|| slot % self.items.len())
    }

    /// The three copies of the base sequence, with their loop slot
    pub fn loop_items(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.items
            .iter()
            .cycle()
            .take(self.loop_len())
            .enumerate()
    }

    /// Whether a slot should load and play its media: the active item and
    /// its neighbours, or everything when there are at most two items.
    pub fn is_live(&self, slot: usize) -> bool {
        let Some(index) = self.base_index(slot) else {
            return false;
        };
        let len = self.items.len();
        len <= 2
            || index == self.active_index
            || index == (self.active_index + 1) % len
            || index == (self.active_index + len - 1) % len
    }

    /// Record that an item started playing. Returns `true` only the first
    /// time for a given id, when the view should report it upstream.
    pub fn mark_viewed(&mut self, id: impl Into<String>) -> bool {
        self.viewed.insert(id.into())
    }
}
