//! Infinite-loop carousel.
//!
//! The base sequence is laid out three times. Whenever the scroll offset
//! drifts into the outer copies it is shifted by one copy width back towards
//! the middle; because the shift is a whole number of copies the item under
//! the viewport centre never changes.

pub mod carousel;
pub mod frame;
pub mod position;

pub use carousel::{Carousel, ScrollUpdate};
pub use frame::FrameCoalescer;
pub use position::{sync_position, EdgeState, Geometry, SyncOutcome, LOOP_COPIES};
