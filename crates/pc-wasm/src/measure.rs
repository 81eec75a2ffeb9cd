//! Text measurement backed by a Canvas2D context.

use pc_core::{ApproxMeasure, FontSpec, TextMeasure};
use web_sys::CanvasRenderingContext2d;

/// Measures with the browser's font engine, so wrapped text heights match
/// what the host paints.
pub struct CanvasMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasMeasure {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for CanvasMeasure {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32 {
        self.ctx.set_font(&font.css());
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width() as f32,
            Err(_) => {
                log::warn!("measureText failed; using approximate width");
                ApproxMeasure.measure_width(text, font)
            }
        }
    }
}
