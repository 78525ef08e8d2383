//! Reference glyph rendering: a bold offscreen mask and the visible
//! background (practice grid plus an optional faint outline hint).
//!
//! Both layers share the ink surface's device-pixel coordinate space.

/// Fraction of the square side kept empty on each edge.
const PADDING_RATIO: f64 = 0.08;
const GLYPH_FAMILY: &str = "'Noto Serif SC', 'SimSun', serif";

/// Centered square the glyph is drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskLayout {
    pub side: f64,
    pub left: f64,
    pub top: f64,
    pub padding: f64,
    pub font_px: f64,
}

impl MaskLayout {
    /// Largest centered square in a `width` x `height` device-pixel surface.
    pub fn compute(width: f64, height: f64) -> Self {
        let side = width.min(height).max(0.0);
        let padding = (side * PADDING_RATIO).round();
        Self {
            side,
            left: ((width - side) / 2.0).floor(),
            top: ((height - side) / 2.0).floor(),
            padding,
            font_px: (side - 2.0 * padding).max(0.0).floor(),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.side / 2.0, self.top + self.side / 2.0)
    }

    /// CSS font shorthand for the glyph.
    pub fn font(&self, bold: bool) -> String {
        let weight = if bold { "bold " } else { "" };
        format!("{}{}px {}", weight, self.font_px, GLYPH_FAMILY)
    }
}

/// Drawing operations the mask and background layers need.
pub trait GlyphSurface {
    fn clear(&mut self);
    fn fill_glyph(&mut self, glyph: &str, layout: &MaskLayout, color: &str);
    fn stroke_glyph(&mut self, glyph: &str, layout: &MaskLayout, color: &str, width: f64);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64);
}

/// Palette for the visible background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundStyle {
    pub grid: &'static str,
    pub hint: &'static str,
}

impl BackgroundStyle {
    pub fn for_theme(dark: bool) -> Self {
        if dark {
            Self {
                grid: "rgba(255,255,255,0.12)",
                hint: "rgba(255,255,255,0.28)",
            }
        } else {
            Self {
                grid: "rgba(0,0,0,0.10)",
                hint: "rgba(0,0,0,0.22)",
            }
        }
    }
}

/// Solid bold glyph used as the comparison reference.
pub fn render_mask(glyph: &str, layout: &MaskLayout, mask: &mut dyn GlyphSurface) {
    mask.clear();
    if layout.font_px <= 0.0 {
        return;
    }
    mask.fill_glyph(glyph, layout, "#000000");
}

/// Practice grid (田字格 with diagonals) and, with `hint`, a faint outline.
pub fn render_background(
    glyph: &str,
    hint: bool,
    style: BackgroundStyle,
    layout: &MaskLayout,
    bg: &mut dyn GlyphSurface,
    pixel_ratio: f64,
) {
    bg.clear();
    if layout.side <= 0.0 {
        return;
    }
    let (l, t, s) = (layout.left, layout.top, layout.side);
    let (cx, cy) = layout.center();
    let w = pixel_ratio.max(1.0);
    // frame
    bg.line((l, t), (l + s, t), style.grid, w);
    bg.line((l + s, t), (l + s, t + s), style.grid, w);
    bg.line((l + s, t + s), (l, t + s), style.grid, w);
    bg.line((l, t + s), (l, t), style.grid, w);
    // cross and diagonals
    bg.line((cx, t), (cx, t + s), style.grid, w);
    bg.line((l, cy), (l + s, cy), style.grid, w);
    bg.line((l, t), (l + s, t + s), style.grid, w);
    bg.line((l + s, t), (l, t + s), style.grid, w);

    if hint && layout.font_px > 0.0 {
        bg.stroke_glyph(glyph, layout, style.hint, w);
    }
}
