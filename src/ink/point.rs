//! Raw pointer samples and their conversion into canvas-space ink points.
//!
//! Pressure is always resolved here: true analog pressure first, then the
//! legacy force value, then an estimate from pointer velocity, and finally a
//! fixed default for the very first contact.

/// Pressure for the first point of a stroke when the device reports none.
pub const DEFAULT_PRESSURE: f64 = 0.6;
/// Lower bound for velocity-inferred pressure (keeps fast strokes visible).
pub const MIN_INFERRED_PRESSURE: f64 = 0.08;
/// Upper bound for velocity-inferred pressure.
pub const MAX_INFERRED_PRESSURE: f64 = 0.95;
/// Velocity (client px per ms) that maps to the thinnest inferred line.
const VELOCITY_SCALE: f64 = 2.0;

/// Input device class reported with each pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Map a DOM `pointerType` string. Unknown types behave like a mouse.
    pub fn from_pointer_type(kind: &str) -> Self {
        match kind {
            "pen" => PointerKind::Pen,
            "touch" => PointerKind::Touch,
            _ => PointerKind::Mouse,
        }
    }

    /// Browsers report a constant 0.5 for a pressed mouse button, which is
    /// not an analog reading.
    pub fn reports_pressure(self) -> bool {
        !matches!(self, PointerKind::Mouse)
    }
}

/// Stylus orientation in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    /// 0 = parallel to the surface, π/2 = perpendicular.
    pub altitude: f64,
    pub azimuth: f64,
}

/// One device-reported input sample.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RawSample {
    pub client_x: f64,
    pub client_y: f64,
    pub pressure: Option<f64>,
    pub force: Option<f64>,
    pub altitude: Option<f64>,
    pub azimuth: Option<f64>,
    pub time_ms: f64,
    pub kind: PointerKind,
}

impl RawSample {
    pub fn new(client_x: f64, client_y: f64, time_ms: f64, kind: PointerKind) -> Self {
        Self {
            client_x,
            client_y,
            time_ms,
            kind,
            ..Self::default()
        }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn with_force(mut self, force: f64) -> Self {
        self.force = Some(force);
        self
    }

    pub fn with_tilt(mut self, altitude: f64, azimuth: f64) -> Self {
        self.altitude = Some(altitude);
        self.azimuth = Some(azimuth);
        self
    }
}

/// Placement of the ink surface on screen and its physical pixel density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_ratio: f64,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            pixel_ratio: 1.0,
        }
    }
}

/// Device pixel ratio as reported, or 1 when it is missing, non-finite or not positive.
/// Ratios below 1 (zoomed-out pages) are kept.
pub fn pixel_ratio_or_default(ratio: Option<f64>) -> f64 {
    ratio.filter(|r| r.is_finite() && *r > 0.0).unwrap_or(1.0)
}

impl SurfaceGeometry {
    pub fn to_surface(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (
            (client_x - self.origin_x) * self.pixel_ratio,
            (client_y - self.origin_y) * self.pixel_ratio,
        )
    }
}

/// A sample translated into surface pixels with pressure resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
    /// Always within `[0, 1]`.
    pub pressure: f64,
    pub tilt: Option<Tilt>,
    pub time: i64,
    /// Raw client coordinates, kept for velocity estimation.
    pub source_x: f64,
    pub source_y: f64,
}

pub fn normalize(
    sample: &RawSample,
    previous: Option<&NormalizedPoint>,
    geometry: &SurfaceGeometry,
) -> NormalizedPoint {
    let (x, y) = geometry.to_surface(sample.client_x, sample.client_y);
    let time = sample.time_ms.floor() as i64;
    NormalizedPoint {
        x,
        y,
        pressure: resolve_pressure(sample, time, previous),
        tilt: tilt_of(sample),
        time,
        source_x: sample.client_x,
        source_y: sample.client_y,
    }
}

fn resolve_pressure(sample: &RawSample, time: i64, previous: Option<&NormalizedPoint>) -> f64 {
    let analog = sample
        .pressure
        .filter(|p| sample.kind.reports_pressure() && p.is_finite() && *p > 0.0);
    if let Some(p) = analog {
        return p.min(1.0);
    }
    if let Some(f) = sample.force.filter(|f| f.is_finite() && *f != 0.0) {
        return f.clamp(0.0, 1.0);
    }
    match previous {
        Some(prev) => {
            let distance = (sample.client_x - prev.source_x).hypot(sample.client_y - prev.source_y);
            let elapsed = (time - prev.time).max(1) as f64;
            pressure_from_velocity(distance / elapsed)
        }
        None => DEFAULT_PRESSURE,
    }
}

/// Slower motion reads as a firmer press.
pub fn pressure_from_velocity(velocity: f64) -> f64 {
    (1.0 - (velocity / VELOCITY_SCALE).min(MAX_INFERRED_PRESSURE))
        .clamp(MIN_INFERRED_PRESSURE, MAX_INFERRED_PRESSURE)
}

fn tilt_of(sample: &RawSample) -> Option<Tilt> {
    match (sample.altitude, sample.azimuth) {
        (Some(altitude), Some(azimuth)) if altitude.is_finite() && azimuth.is_finite() => {
            Some(Tilt { altitude, azimuth })
        }
        _ => None,
    }
}
