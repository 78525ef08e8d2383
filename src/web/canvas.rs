//! `<canvas>` backed implementations of the ink and glyph surfaces.

use std::f64::consts::TAU;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

use crate::error::InkError;
use crate::ink::{InkSurface, Stamp, StampShape};
use crate::mask::{GlyphSurface, MaskLayout};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Positioning CSS; size is appended on every resize.
    base_style: &'static str,
}

impl CanvasSurface {
    pub fn create(doc: &Document, id: &str, base_style: &'static str) -> Result<Self, InkError> {
        let canvas: HtmlCanvasElement = match doc.get_element_by_id(id) {
            Some(el) => el.dyn_into().map_err(|_| InkError::MissingElement(id.to_string()))?,
            None => {
                let c: HtmlCanvasElement = doc
                    .create_element("canvas")?
                    .dyn_into()
                    .map_err(|_| InkError::ContextUnavailable)?;
                c.set_id(id);
                c
            }
        };
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(InkError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| InkError::ContextUnavailable)?;
        canvas.set_attribute("style", base_style).ok();
        Ok(Self {
            canvas,
            ctx,
            base_style,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Reallocate the backing store at physical resolution. Clears all pixels.
    pub fn resize(&self, css_width: f64, css_height: f64, pixel_ratio: f64) {
        self.canvas.set_width((css_width * pixel_ratio).round().max(0.0) as u32);
        self.canvas.set_height((css_height * pixel_ratio).round().max(0.0) as u32);
        let style = format!(
            "{} width:{}px; height:{}px;",
            self.base_style, css_width, css_height
        );
        self.canvas.set_attribute("style", &style).ok();
    }

    fn prepare_text(&self, layout: &MaskLayout, bold: bool) {
        self.ctx.set_font(&layout.font(bold));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
    }
}

impl InkSurface for CanvasSurface {
    type Snapshot = ImageData;

    fn is_ready(&self) -> bool {
        self.canvas.width() > 0 && self.canvas.height() > 0
    }

    fn begin_stamps(&mut self, color: &str, opacity: f64) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_global_alpha(opacity);
    }

    fn stamp(&mut self, stamp: &Stamp) {
        self.ctx.begin_path();
        let drawn = match stamp.shape {
            StampShape::Circle { radius } => self.ctx.arc(stamp.x, stamp.y, radius, 0.0, TAU),
            StampShape::Ellipse {
                major,
                minor,
                rotation,
            } => self
                .ctx
                .ellipse(stamp.x, stamp.y, major, minor, rotation, 0.0, TAU),
        };
        if drawn.is_ok() {
            self.ctx.fill();
        }
    }

    fn end_stamps(&mut self) {
        self.ctx.set_global_alpha(1.0);
    }

    fn snapshot(&self) -> Option<ImageData> {
        if !self.is_ready() {
            return None;
        }
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        match self.ctx.get_image_data(0.0, 0.0, w, h) {
            Ok(data) => Some(data),
            Err(e) => {
                debug!("get_image_data failed: {}", InkError::from(e));
                None
            }
        }
    }

    fn restore(&mut self, snapshot: ImageData) {
        // stale snapshots from a previous size are dropped on resize
        if snapshot.width() != self.canvas.width() || snapshot.height() != self.canvas.height() {
            return;
        }
        self.ctx.put_image_data(&snapshot, 0.0, 0.0).ok();
    }

    fn clear(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }
}

impl GlyphSurface for CanvasSurface {
    fn clear(&mut self) {
        InkSurface::clear(self);
    }

    fn fill_glyph(&mut self, glyph: &str, layout: &MaskLayout, color: &str) {
        let (cx, cy) = layout.center();
        self.prepare_text(layout, true);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(glyph, cx, cy).ok();
    }

    fn stroke_glyph(&mut self, glyph: &str, layout: &MaskLayout, color: &str, width: f64) {
        let (cx, cy) = layout.center();
        self.prepare_text(layout, false);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke_text(glyph, cx, cy).ok();
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }
}
