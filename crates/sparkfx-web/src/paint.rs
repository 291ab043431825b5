#![forbid(unsafe_code)]

//! Replays engine draw commands onto a 2D canvas context.
//!
//! Canvas state setters cross the JS boundary and stroke styles need a string,
//! so [`Painter`] only touches `strokeStyle`/`lineWidth`/`lineCap` when they
//! change. Reallocating the canvas buffer resets that state; call
//! [`Painter::invalidate`] afterwards.

use sparkfx_core::{DrawCommand, Point, StrokeColor};

/// The subset of `CanvasRenderingContext2D` the effect needs.
pub trait Canvas2d {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_stroke_style(&mut self, css: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_round_line_cap(&mut self);
    /// `beginPath`, `moveTo(from)`, `lineTo(to)`, `stroke`.
    fn stroke_line(&mut self, from: Point, to: Point);
}

/// Caches context state across frames.
#[derive(Debug, Default)]
pub struct Painter {
    stroke: Option<StrokeColor>,
    line_width: Option<f64>,
    round_caps: bool,
}

impl Painter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget cached context state.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// Execute `commands` in order.
    pub fn paint(&mut self, canvas: &mut impl Canvas2d, commands: &[DrawCommand]) {
        for command in commands {
            match command {
                DrawCommand::Clear { width, height } => {
                    canvas.clear_rect(0.0, 0.0, f64::from(*width), f64::from(*height));
                }
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    if !self.round_caps {
                        canvas.set_round_line_cap();
                        self.round_caps = true;
                    }
                    if self.stroke.as_ref() != Some(color) {
                        canvas.set_stroke_style(&color.to_css());
                        self.stroke = Some(color.clone());
                    }
                    if self.line_width != Some(*width) {
                        canvas.set_line_width(*width);
                        self.line_width = Some(*width);
                    }
                    canvas.stroke_line(*from, *to);
                }
            }
        }
    }
}
