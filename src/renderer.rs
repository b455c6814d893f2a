// Drawing surface the particle field renders onto, and its canvas 2d implementation.

use crate::color::Color;
use crate::error::{Error, Result};
use std::f64::consts::PI;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

// The three operations a frame needs. Failures are swallowed by implementors:
// the background is decorative and a lost stroke must never stop the loop.
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color);
    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], line_width: f64, color: Color);
}

pub struct CanvasSurface {
    pub context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    // Grabs the 2d context from a canvas on the DOM
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let context = canvas
            .get_context("2d")?
            .ok_or(Error::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::NoContext)?;
        Ok(CanvasSurface { context })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        self.context
            .set_fill_style(&JsValue::from_str(&color.to_css()));
        self.context.begin_path();
        if let Err(e) = self.context.arc(x, y, radius, 0.0, PI * 2.0) {
            log::trace!("arc at ({}, {}) rejected: {:?}", x, y, e);
            return;
        }
        self.context.fill();
    }

    #[allow(deprecated)]
    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], line_width: f64, color: Color) {
        self.context.begin_path();
        self.context
            .set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.context.set_line_width(line_width);
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context.stroke();
    }
}
