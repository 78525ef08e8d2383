//! Stamp-based stroke rasterization.
//!
//! Every queued point is connected to the previous one with evenly spaced
//! stamps, so line density does not depend on how often the device samples.

use std::f64::consts::FRAC_PI_2;

use super::InkSurface;
use super::point::{NormalizedPoint, Tilt, pixel_ratio_or_default};
use super::queue::InputQueue;

/// Points closer than this to the cursor produce no stamp.
const MIN_SEGMENT: f64 = 1e-3;
/// Guards against a zero spacing turning one segment into endless stamps.
const MIN_SPACING: f64 = 0.05;
const MIN_ELLIPTICITY: f64 = 0.05;

/// Brush parameters in CSS pixels; see [`BrushConfig::scaled`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrushConfig {
    /// Distance between interpolated stamps.
    pub spacing: f64,
    /// Stamp radius at zero pressure.
    pub min_size: f64,
    /// Stamp radius at full pressure.
    pub max_size: f64,
    /// Minor / major ratio of a fully tilted stamp, in `(0, 1]`.
    pub ellipticity: f64,
    pub opacity: f64,
    pub color: String,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            spacing: 1.5,
            min_size: 1.2,
            max_size: 7.0,
            ellipticity: 0.45,
            opacity: 0.9,
            color: LIGHT_INK.to_string(),
        }
    }
}

pub const LIGHT_INK: &str = "#111111";
pub const DARK_INK: &str = "#f5f5f5";

impl BrushConfig {
    /// Convert to device pixels.
    pub fn scaled(&self, pixel_ratio: f64) -> Self {
        let k = pixel_ratio_or_default(Some(pixel_ratio));
        Self {
            spacing: self.spacing * k,
            min_size: self.min_size * k,
            max_size: self.max_size * k,
            ..self.clone()
        }
    }

    pub fn radius(&self, pressure: f64) -> f64 {
        let t = pressure.clamp(0.0, 1.0);
        self.min_size + (self.max_size - self.min_size) * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StampShape {
    Circle { radius: f64 },
    /// Semi-axes in pixels, rotated by `rotation` radians around the center.
    Ellipse { major: f64, minor: f64, rotation: f64 },
}

/// One filled mark at an interpolated position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stamp {
    pub x: f64,
    pub y: f64,
    pub shape: StampShape,
}

pub fn stamp_shape(pressure: f64, tilt: Option<Tilt>, brush: &BrushConfig) -> StampShape {
    let r = brush.radius(pressure);
    match tilt {
        Some(Tilt { altitude, azimuth }) => {
            let e = brush.ellipticity.clamp(MIN_ELLIPTICITY, 1.0);
            let lean = (1.0 - altitude / FRAC_PI_2).clamp(0.0, 1.0);
            if lean == 0.0 {
                return StampShape::Circle { radius: r };
            }
            // minor axis narrows with lean so an upright pen stays round
            StampShape::Ellipse {
                major: r * (1.0 + lean * (1.0 / e - 1.0)),
                minor: r * (1.0 - lean * (1.0 - e)),
                rotation: azimuth,
            }
        }
        None => StampShape::Circle { radius: r },
    }
}

/// Turns drained points into stamps, remembering the last point of the stroke.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    brush: BrushConfig,
    last: Option<NormalizedPoint>,
}

impl Rasterizer {
    pub fn new(brush: BrushConfig) -> Self {
        Self { brush, last: None }
    }

    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }

    pub fn set_brush(&mut self, brush: BrushConfig) {
        self.brush = brush;
    }

    pub fn cursor(&self) -> Option<&NormalizedPoint> {
        self.last.as_ref()
    }

    pub fn reset_cursor(&mut self) {
        self.last = None;
    }

    /// Consume every queued point in order. Returns the number of stamps drawn.
    pub fn drain<S>(&mut self, queue: &mut InputQueue, surface: &mut S) -> usize
    where
        S: InkSurface + ?Sized,
    {
        let points = queue.take_all();
        if points.is_empty() {
            return 0;
        }
        surface.begin_stamps(&self.brush.color, self.brush.opacity);
        let mut stamped = 0;
        for p in points {
            stamped += self.advance(p, &mut |s| surface.stamp(&s));
        }
        surface.end_stamps();
        stamped
    }

    /// Move the cursor to `p`, emitting the stamps in between.
    pub fn advance(&mut self, p: NormalizedPoint, emit: &mut dyn FnMut(Stamp)) -> usize {
        let shape = stamp_shape(p.pressure, p.tilt, &self.brush);
        let Some(last) = self.last else {
            emit(Stamp {
                x: p.x,
                y: p.y,
                shape,
            });
            self.last = Some(p);
            return 1;
        };

        let (dx, dy) = (p.x - last.x, p.y - last.y);
        let dist = dx.hypot(dy);
        if dist < MIN_SEGMENT {
            return 0;
        }
        let steps = segment_steps(dist, self.brush.spacing);
        let n = steps as f64;
        for i in 1..=steps {
            let k = i as f64;
            emit(Stamp {
                x: last.x + dx * k / n,
                y: last.y + dy * k / n,
                shape,
            });
        }
        self.last = Some(p);
        steps
    }
}

/// Number of stamps covering a segment of length `dist`.
pub fn segment_steps(dist: f64, spacing: f64) -> usize {
    ((dist / spacing.max(MIN_SPACING)).floor() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64, pressure: f64) -> NormalizedPoint {
        NormalizedPoint {
            x,
            y,
            pressure,
            tilt: None,
            time: 0,
            source_x: x,
            source_y: y,
        }
    }

    fn brush(spacing: f64) -> BrushConfig {
        BrushConfig {
            spacing,
            min_size: 1.0,
            max_size: 5.0,
            ..BrushConfig::default()
        }
    }

    fn collect(r: &mut Rasterizer, p: NormalizedPoint) -> Vec<Stamp> {
        let mut out = Vec::new();
        r.advance(p, &mut |s| out.push(s));
        out
    }

    #[test]
    fn first_point_stamps_in_place() {
        let mut r = Rasterizer::new(brush(2.0));
        let stamps = collect(&mut r, pt(3.0, 4.0, 1.0));
        assert_eq!(stamps.len(), 1);
        assert_eq!((stamps[0].x, stamps[0].y), (3.0, 4.0));
    }

    #[test]
    fn segment_is_backfilled_at_spacing() {
        let mut r = Rasterizer::new(brush(2.0));
        collect(&mut r, pt(0.0, 0.0, 1.0));
        let stamps = collect(&mut r, pt(10.0, 0.0, 1.0));
        let xs: Vec<f64> = stamps.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![2.0, 4.0, 6.0, 8.0, 10.0]);
        for s in &stamps {
            assert_eq!(s.shape, StampShape::Circle { radius: 5.0 });
        }
    }

    #[test]
    fn short_segment_emits_single_stamp() {
        let mut r = Rasterizer::new(brush(2.0));
        collect(&mut r, pt(0.0, 0.0, 1.0));
        assert_eq!(collect(&mut r, pt(1.5, 0.0, 1.0)).len(), 1);
    }

    #[test]
    fn negligible_segment_is_skipped_and_cursor_kept() {
        let mut r = Rasterizer::new(brush(2.0));
        collect(&mut r, pt(1.0, 1.0, 1.0));
        assert!(collect(&mut r, pt(1.0, 1.0 + 1e-6, 1.0)).is_empty());
        assert_eq!(r.cursor().map(|c| c.y), Some(1.0));
    }

    #[test]
    fn step_count_matches_floor_of_distance() {
        for (d, s, want) in [(0.5, 2.0, 1), (2.0, 2.0, 1), (7.9, 2.0, 3), (100.0, 3.0, 33)] {
            assert_eq!(segment_steps(d, s), want, "d={d} s={s}");
        }
    }

    #[test]
    fn radius_interpolates_pressure() {
        let b = brush(1.0);
        assert_eq!(b.radius(0.0), 1.0);
        assert_eq!(b.radius(0.5), 3.0);
        assert_eq!(b.radius(2.0), 5.0);
    }

    #[test]
    fn flat_stylus_fully_elongates() {
        let b = brush(1.0);
        let tilt = Tilt {
            altitude: 0.0,
            azimuth: 0.3,
        };
        match stamp_shape(1.0, Some(tilt), &b) {
            StampShape::Ellipse {
                major,
                minor,
                rotation,
            } => {
                assert!((major - 5.0 / b.ellipticity).abs() < 1e-9);
                assert!((minor - 5.0 * b.ellipticity).abs() < 1e-9);
                assert_eq!(rotation, 0.3);
            }
            other => panic!("expected ellipse, got {other:?}"),
        }
    }

    #[test]
    fn upright_stylus_stamps_a_circle() {
        let b = brush(1.0);
        let tilt = Tilt {
            altitude: FRAC_PI_2,
            azimuth: 0.7,
        };
        assert_eq!(
            stamp_shape(1.0, Some(tilt), &b),
            StampShape::Circle { radius: 5.0 }
        );
    }

    #[test]
    fn half_tilt_sits_between_circle_and_full_ellipse() {
        let b = brush(1.0);
        let tilt = Tilt {
            altitude: FRAC_PI_2 / 2.0,
            azimuth: 0.0,
        };
        match stamp_shape(1.0, Some(tilt), &b) {
            StampShape::Ellipse { major, minor, .. } => {
                assert!(major > 5.0 && major < 5.0 / b.ellipticity);
                assert!(minor < 5.0 && minor > 5.0 * b.ellipticity);
            }
            other => panic!("expected ellipse, got {other:?}"),
        }
    }

    #[test]
    fn scaling_only_touches_lengths() {
        let b = BrushConfig::default().scaled(2.0);
        let base = BrushConfig::default();
        assert_eq!(b.spacing, base.spacing * 2.0);
        assert_eq!(b.max_size, base.max_size * 2.0);
        assert_eq!(b.opacity, base.opacity);
        assert_eq!(BrushConfig::default().scaled(f64::NAN), base);
    }
}
