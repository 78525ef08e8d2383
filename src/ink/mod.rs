//! Pressure and tilt aware ink pipeline.
//!
//! Device events are normalized into [`NormalizedPoint`]s and buffered in an
//! [`InputQueue`]. At most one drain is requested per display frame; when the
//! frame fires, [`InkEngine::on_frame`] hands the whole queue to the
//! [`Rasterizer`], which stamps interpolated circles / ellipses onto an
//! [`InkSurface`].
//!
//! Nothing in here touches the DOM. The browser side implements
//! [`InkSurface`] over a canvas and [`FrameScheduler`] over
//! `requestAnimationFrame`; tests use recording doubles instead.

pub mod capability;
pub mod history;
pub mod point;
pub mod queue;
pub mod raster;

use log::debug;

pub use capability::InputCapabilities;
pub use history::{UNDO_LIMIT, UndoHistory};
pub use point::{NormalizedPoint, PointerKind, RawSample, SurfaceGeometry, Tilt, normalize};
pub use queue::{DrainScheduler, FrameScheduler, InputQueue};
pub use raster::{BrushConfig, Rasterizer, Stamp, StampShape};

/// Pixel target for ink stamps.
pub trait InkSurface {
    /// Full-surface copy used for undo.
    type Snapshot;

    /// False until the surface has been allocated with non-zero size.
    fn is_ready(&self) -> bool;

    /// Set fill color and global opacity before a batch of stamps.
    fn begin_stamps(&mut self, _color: &str, _opacity: f64) {}

    fn stamp(&mut self, stamp: &Stamp);

    fn end_stamps(&mut self) {}

    /// `None` when the pixels cannot be read back.
    fn snapshot(&self) -> Option<Self::Snapshot>;

    fn restore(&mut self, snapshot: Self::Snapshot);

    fn clear(&mut self);
}

/// Stroke lifecycle, queue, drain scheduling and undo for one ink surface.
#[derive(Debug)]
pub struct InkEngine<T> {
    brush: BrushConfig,
    geometry: SurfaceGeometry,
    queue: InputQueue,
    drains: DrainScheduler,
    raster: Rasterizer,
    history: UndoHistory<T>,
    previous: Option<NormalizedPoint>,
    drawing: bool,
}

impl<T> InkEngine<T> {
    /// `brush` is given in CSS pixels and scaled by the geometry's pixel ratio.
    pub fn new(brush: BrushConfig, geometry: SurfaceGeometry) -> Self {
        Self {
            raster: Rasterizer::new(brush.scaled(geometry.pixel_ratio)),
            brush,
            geometry,
            queue: InputQueue::new(),
            drains: DrainScheduler::default(),
            history: UndoHistory::default(),
            previous: None,
            drawing: false,
        }
    }

    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    /// Scaled brush currently used for stamping.
    pub fn brush(&self) -> &BrushConfig {
        self.raster.brush()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn is_drain_pending(&self) -> bool {
        self.drains.is_pending()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// The surface may move without changing size (scrolling, layout shifts).
    pub fn set_origin(&mut self, origin_x: f64, origin_y: f64) {
        self.geometry.origin_x = origin_x;
        self.geometry.origin_y = origin_y;
    }

    pub fn set_ink_color(&mut self, color: &str) {
        self.brush.color = color.to_string();
        self.raster.set_brush(self.brush.scaled(self.geometry.pixel_ratio));
    }

    /// First contact: snapshot for undo, then queue the initial point.
    pub fn begin_stroke<S>(&mut self, sample: &RawSample, surface: &S, frames: &mut dyn FrameScheduler)
    where
        S: InkSurface<Snapshot = T> + ?Sized,
    {
        self.reset_stroke();
        if surface.is_ready() {
            match surface.snapshot() {
                Some(snap) => self.history.push(snap),
                None => debug!("ink surface snapshot unavailable; stroke not undoable"),
            }
        }
        self.drawing = true;
        self.push_sample(sample);
        self.drains.request_drain(frames);
    }

    /// Queue samples for the stroke in progress. Returns how many were queued.
    pub fn extend_stroke(&mut self, samples: &[RawSample], frames: &mut dyn FrameScheduler) -> usize {
        if !self.drawing || samples.is_empty() {
            return 0;
        }
        for sample in samples {
            self.push_sample(sample);
        }
        self.drains.request_drain(frames);
        samples.len()
    }

    /// Release: rasterize whatever is still buffered, then reset the stroke.
    pub fn end_stroke<S>(&mut self, surface: &mut S) -> usize
    where
        S: InkSurface<Snapshot = T> + ?Sized,
    {
        if !self.drawing {
            return 0;
        }
        let stamped = if surface.is_ready() {
            self.raster.drain(&mut self.queue, surface)
        } else {
            0
        };
        self.reset_stroke();
        stamped
    }

    /// Abort the stroke; buffered points are discarded.
    pub fn cancel_stroke(&mut self) {
        if self.drawing {
            debug!("stroke cancelled with {} queued points", self.queue.len());
        }
        self.reset_stroke();
    }

    /// Frame callback. Returns the number of stamps drawn.
    ///
    /// An unready surface leaves the queue untouched for the next frame.
    pub fn on_frame<S>(&mut self, surface: &mut S) -> usize
    where
        S: InkSurface<Snapshot = T> + ?Sized,
    {
        self.drains.begin_drain();
        if !surface.is_ready() || self.queue.is_empty() {
            return 0;
        }
        self.raster.drain(&mut self.queue, surface)
    }

    /// Wipe the ink. The previous pixels stay undoable.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: InkSurface<Snapshot = T> + ?Sized,
    {
        self.reset_stroke();
        if let Some(snap) = surface.snapshot() {
            self.history.push(snap);
        }
        surface.clear();
    }

    /// Restore the surface as it was before the latest stroke or clear.
    pub fn undo<S>(&mut self, surface: &mut S) -> bool
    where
        S: InkSurface<Snapshot = T> + ?Sized,
    {
        self.reset_stroke();
        match self.history.pop() {
            Some(snap) => {
                surface.restore(snap);
                true
            }
            None => false,
        }
    }

    /// Surfaces were reallocated: in-flight ink and old-size snapshots are gone.
    pub fn resize(&mut self, geometry: SurfaceGeometry) {
        self.reset_stroke();
        self.history.clear();
        self.geometry = geometry;
        self.raster.set_brush(self.brush.scaled(geometry.pixel_ratio));
    }

    /// Forget everything tied to the current character.
    pub fn reset(&mut self) {
        self.reset_stroke();
        self.history.clear();
    }

    fn push_sample(&mut self, sample: &RawSample) {
        let p = normalize(sample, self.previous.as_ref(), &self.geometry);
        self.previous = Some(p);
        self.queue.enqueue([p]);
    }

    fn reset_stroke(&mut self) {
        self.queue.clear();
        self.raster.reset_cursor();
        self.drains.reset();
        self.previous = None;
        self.drawing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Frames(usize);

    impl FrameScheduler for Frames {
        fn request_frame(&mut self) {
            self.0 += 1;
        }
    }

    /// Records stamps; snapshots copy the stamp list.
    struct Recorder {
        ready: bool,
        stamps: Vec<Stamp>,
        batches: usize,
    }

    impl Recorder {
        fn ready() -> Self {
            Self {
                ready: true,
                stamps: Vec::new(),
                batches: 0,
            }
        }
    }

    impl InkSurface for Recorder {
        type Snapshot = Vec<Stamp>;

        fn is_ready(&self) -> bool {
            self.ready
        }
        fn begin_stamps(&mut self, _color: &str, _opacity: f64) {
            self.batches += 1;
        }
        fn stamp(&mut self, stamp: &Stamp) {
            self.stamps.push(*stamp);
        }
        fn snapshot(&self) -> Option<Vec<Stamp>> {
            Some(self.stamps.clone())
        }
        fn restore(&mut self, snapshot: Vec<Stamp>) {
            self.stamps = snapshot;
        }
        fn clear(&mut self) {
            self.stamps.clear();
        }
    }

    fn engine() -> InkEngine<Vec<Stamp>> {
        let brush = BrushConfig {
            spacing: 2.0,
            ..BrushConfig::default()
        };
        InkEngine::new(brush, SurfaceGeometry::default())
    }

    fn pen(x: f64, t: f64) -> RawSample {
        RawSample::new(x, 0.0, t, PointerKind::Pen).with_pressure(1.0)
    }

    #[test]
    fn burst_of_moves_schedules_one_drain() {
        let mut e = engine();
        let mut frames = Frames::default();
        let mut s = Recorder::ready();
        e.begin_stroke(&pen(0.0, 0.0), &s, &mut frames);
        e.extend_stroke(&[pen(2.0, 1.0)], &mut frames);
        e.extend_stroke(&[pen(4.0, 2.0), pen(6.0, 3.0)], &mut frames);
        assert_eq!(frames.0, 1);
        assert_eq!(e.queued(), 4);

        assert_eq!(e.on_frame(&mut s), 4);
        assert_eq!(e.queued(), 0);
        assert_eq!(s.batches, 1);

        e.extend_stroke(&[pen(8.0, 4.0)], &mut frames);
        assert_eq!(frames.0, 2);
    }

    #[test]
    fn unready_surface_keeps_queue() {
        let mut e = engine();
        let mut frames = Frames::default();
        let mut s = Recorder::ready();
        s.ready = false;
        e.begin_stroke(&pen(0.0, 0.0), &s, &mut frames);
        e.extend_stroke(&[pen(4.0, 1.0)], &mut frames);
        assert_eq!(e.on_frame(&mut s), 0);
        assert_eq!(e.queued(), 2);
        assert!(!e.is_drain_pending());

        s.ready = true;
        e.extend_stroke(&[pen(6.0, 2.0)], &mut frames);
        assert_eq!(frames.0, 2);
        // 1 initial + 2 for (0->4) + 1 for (4->6)
        assert_eq!(e.on_frame(&mut s), 4);
    }

    #[test]
    fn moves_without_contact_are_ignored() {
        let mut e = engine();
        let mut frames = Frames::default();
        assert_eq!(e.extend_stroke(&[pen(1.0, 0.0)], &mut frames), 0);
        assert_eq!(frames.0, 0);
    }

    #[test]
    fn release_flushes_and_resets() {
        let mut e = engine();
        let mut frames = Frames::default();
        let mut s = Recorder::ready();
        e.begin_stroke(&pen(0.0, 0.0), &s, &mut frames);
        e.extend_stroke(&[pen(10.0, 5.0)], &mut frames);
        assert_eq!(e.end_stroke(&mut s), 6);
        assert!(!e.is_drawing());
        assert!(!e.is_drain_pending());
        assert_eq!(e.queued(), 0);
        assert_eq!(e.on_frame(&mut s), 0);
    }

    #[test]
    fn cancel_discards_buffered_points() {
        let mut e = engine();
        let mut frames = Frames::default();
        let mut s = Recorder::ready();
        e.begin_stroke(&pen(0.0, 0.0), &s, &mut frames);
        e.extend_stroke(&[pen(10.0, 5.0)], &mut frames);
        e.cancel_stroke();
        assert_eq!(e.queued(), 0);
        assert_eq!(e.on_frame(&mut s), 0);
        assert!(s.stamps.is_empty());
    }

    #[test]
    fn undo_restores_pre_stroke_pixels() {
        let mut e = engine();
        let mut frames = Frames::default();
        let mut s = Recorder::ready();
        e.begin_stroke(&pen(0.0, 0.0), &s, &mut frames);
        e.extend_stroke(&[pen(4.0, 5.0)], &mut frames);
        e.end_stroke(&mut s);
        let after_first = s.stamps.len();

        e.begin_stroke(&pen(20.0, 10.0), &s, &mut frames);
        e.end_stroke(&mut s);
        assert!(s.stamps.len() > after_first);

        assert!(e.undo(&mut s));
        assert_eq!(s.stamps.len(), after_first);
        assert!(e.undo(&mut s));
        assert!(s.stamps.is_empty());
        assert!(!e.undo(&mut s));
    }

    #[test]
    fn clear_is_undoable() {
        let mut e = engine();
        let mut frames = Frames::default();
        let mut s = Recorder::ready();
        e.begin_stroke(&pen(0.0, 0.0), &s, &mut frames);
        e.end_stroke(&mut s);
        e.clear(&mut s);
        assert!(s.stamps.is_empty());
        assert!(e.undo(&mut s));
        assert_eq!(s.stamps.len(), 1);
    }

    #[test]
    fn resize_drops_history_and_rescales_brush() {
        let mut e = engine();
        let mut frames = Frames::default();
        let mut s = Recorder::ready();
        e.begin_stroke(&pen(0.0, 0.0), &s, &mut frames);
        e.end_stroke(&mut s);
        assert_eq!(e.undo_depth(), 1);

        e.resize(SurfaceGeometry {
            pixel_ratio: 2.0,
            ..SurfaceGeometry::default()
        });
        assert_eq!(e.undo_depth(), 0);
        assert_eq!(e.brush().spacing, 4.0);
    }

    #[test]
    fn velocity_inference_spans_frames() {
        let mut e = engine();
        let mut frames = Frames::default();
        let mut s = Recorder::ready();
        let touch = |x: f64, t: f64| RawSample::new(x, 0.0, t, PointerKind::Touch);
        e.begin_stroke(&touch(0.0, 0.0), &s, &mut frames);
        e.on_frame(&mut s);
        e.extend_stroke(&[touch(32.0, 16.0)], &mut frames);
        e.on_frame(&mut s);
        let thin = e.brush().radius(point::MIN_INFERRED_PRESSURE);
        assert_eq!(
            s.stamps.last().map(|st| st.shape),
            Some(StampShape::Circle { radius: thin })
        );
    }
}
