//! Point buffering between display frames.

use super::point::NormalizedPoint;

/// Something that can run a callback at the next display refresh.
///
/// The browser implementation wraps `requestAnimationFrame`; tests count the
/// requests and call `InkEngine::on_frame` themselves.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Unbounded FIFO of points awaiting rasterization.
#[derive(Debug, Default)]
pub struct InputQueue {
    points: Vec<NormalizedPoint>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = NormalizedPoint>,
    {
        self.points.extend(points);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Remove every buffered point, oldest first.
    pub fn take_all(&mut self) -> Vec<NormalizedPoint> {
        std::mem::take(&mut self.points)
    }
}

/// Pending-drain bookkeeping: at most one frame request is outstanding.
#[derive(Debug, Default)]
pub struct DrainScheduler {
    pending: bool,
}

impl DrainScheduler {
    /// Ask for a drain on the next frame. Returns false when one is already pending.
    pub fn request_drain(&mut self, frames: &mut dyn FrameScheduler) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        frames.request_frame();
        true
    }

    /// Called at the top of a frame, before rasterizing, so input arriving
    /// during the drain schedules a fresh one.
    pub fn begin_drain(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingFrames(usize);

    impl FrameScheduler for CountingFrames {
        fn request_frame(&mut self) {
            self.0 += 1;
        }
    }

    fn pt(x: f64) -> NormalizedPoint {
        NormalizedPoint {
            x,
            y: 0.0,
            pressure: 1.0,
            tilt: None,
            time: 0,
            source_x: x,
            source_y: 0.0,
        }
    }

    #[test]
    fn take_all_preserves_order_and_empties() {
        let mut q = InputQueue::new();
        q.enqueue([pt(1.0), pt(2.0)]);
        q.enqueue([pt(3.0)]);
        let xs: Vec<f64> = q.take_all().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert!(q.is_empty());
    }

    #[test]
    fn only_one_drain_outstanding() {
        let mut frames = CountingFrames::default();
        let mut drains = DrainScheduler::default();
        assert!(drains.request_drain(&mut frames));
        assert!(!drains.request_drain(&mut frames));
        assert!(!drains.request_drain(&mut frames));
        assert_eq!(frames.0, 1);

        drains.begin_drain();
        assert!(!drains.is_pending());
        assert!(drains.request_drain(&mut frames));
        assert_eq!(frames.0, 2);
    }
}
