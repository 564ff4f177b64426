use crate::carousel::{Carousel, ScrollUpdate};

/// Collapses bursts of scroll events into one evaluation per display frame.
///
/// Each scroll event schedules its offset, replacing whatever was pending.
/// On the next frame the latest offset is evaluated once.
#[derive(Debug, Default, Clone)]
pub struct FrameCoalescer {
    pending: Option<f64>,
    dropped: u64,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an offset for the next frame; returns `true` if it replaced a pending one
    pub fn schedule(&mut self, offset: f64) -> bool {
        let replaced = self.pending.replace(offset).is_some();
        if replaced {
            self.dropped += 1;
        }
        replaced
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Scroll events superseded before their frame ran
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Discard pending work, e.g. when the view is torn down
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Run the pending evaluation, if any, against the carousel
    pub fn on_frame<T>(&mut self, carousel: &mut Carousel<T>) -> Option<ScrollUpdate> {
        self.pending.take().map(|offset| carousel.on_scroll(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_evaluation_per_frame() {
        let mut carousel = Carousel::new(vec![1, 2, 3]);
        carousel.measure(100.0, 100.0);
        carousel.mount();

        let mut frames = FrameCoalescer::new();
        assert!(!frames.schedule(310.0));
        assert!(frames.schedule(350.0));
        assert!(frames.schedule(400.0));
        assert_eq!(frames.dropped(), 2);

        let update = frames.on_frame(&mut carousel).unwrap();
        assert_eq!(update.active_index, Some(1));
        assert_eq!(carousel.offset(), 400.0);

        assert!(frames.on_frame(&mut carousel).is_none());
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut carousel = Carousel::new(vec!["a"]);
        carousel.measure(50.0, 50.0);

        let mut frames = FrameCoalescer::new();
        frames.schedule(75.0);
        frames.cancel();

        assert!(!frames.is_pending());
        assert!(frames.on_frame(&mut carousel).is_none());
    }
}
