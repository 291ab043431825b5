#![forbid(unsafe_code)]

//! Drawing surface sizing.
//!
//! The surface tracks two sizes: the CSS box the canvas occupies and the
//! backing buffer in device pixels. The buffer is `round(css * ratio)` on each
//! axis, where `ratio` is the device pixel ratio floored to an integer (at
//! least 1).
//!
//! Reallocating a canvas buffer clears it and resets its transform, so
//! [`Surface::resize`] only asks for a reallocation when the buffer size
//! actually changes. A ratio change that lands on the same buffer size (say
//! 100 CSS px at 1x becoming 50 CSS px at 2x) only rescales the transform.
//!
//! Observer-driven resizes arrive in bursts. [`Surface::queue_resize`] keeps
//! only the latest request and [`Surface::apply_pending`] applies it once, at
//! the start of the next frame.

/// Integer device pixel ratio: `floor(dpr)`, at least 1. Non-finite input is 1.
#[inline]
pub fn device_ratio(device_pixel_ratio: f64) -> u32 {
    if !device_pixel_ratio.is_finite() || device_pixel_ratio < 1.0 {
        return 1;
    }
    device_pixel_ratio.floor().min(f64::from(u32::MAX)) as u32
}

/// Buffer extent for a CSS extent at an integer ratio, at least 1.
#[inline]
pub fn buffer_extent(css: f64, ratio: u32) -> u32 {
    let scaled = (sanitize_css(css) * f64::from(ratio)).round();
    scaled.clamp(1.0, f64::from(u32::MAX)) as u32
}

#[inline]
fn sanitize_css(css: f64) -> f64 {
    if css.is_finite() && css > 0.0 { css } else { 0.0 }
}

/// Instruction to reallocate the backing buffer.
///
/// The host sets the canvas `width`/`height` and then resets the 2D context
/// transform to `scale(scale, scale)` so drawing stays in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferResize {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

/// Result of applying a size measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceUpdate {
    /// CSS width to mirror into the canvas style.
    pub css_width: f64,
    /// CSS height to mirror into the canvas style.
    pub css_height: f64,
    /// Present only when the buffer must be reallocated.
    pub buffer: Option<BufferResize>,
    /// New transform scale when the ratio changed but the buffer size did
    /// not. Never set together with `buffer`.
    pub rescale: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeRequest {
    css_width: f64,
    css_height: f64,
    device_pixel_ratio: f64,
}

/// Size state for one canvas.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    css_width: f64,
    css_height: f64,
    ratio: u32,
    buffer_width: u32,
    buffer_height: u32,
    generation: u64,
    pending: Option<ResizeRequest>,
}

impl Surface {
    /// A surface that has never been measured. Its buffer is 0x0, so the
    /// first [`resize`](Self::resize) always reallocates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn css_size(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    /// Backing buffer size in device pixels.
    #[inline]
    pub fn buffer_size(&self) -> (u32, u32) {
        (self.buffer_width, self.buffer_height)
    }

    /// Integer device pixel ratio in effect (0 before the first resize).
    #[inline]
    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    /// Number of buffer reallocations so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a measurement immediately.
    pub fn resize(
        &mut self,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
    ) -> SurfaceUpdate {
        let css_width = sanitize_css(css_width);
        let css_height = sanitize_css(css_height);
        let ratio = device_ratio(device_pixel_ratio);
        let width = buffer_extent(css_width, ratio);
        let height = buffer_extent(css_height, ratio);

        self.css_width = css_width;
        self.css_height = css_height;

        let ratio_changed = ratio != self.ratio;
        self.ratio = ratio;

        let size_changed = width != self.buffer_width || height != self.buffer_height;
        let buffer = if size_changed {
            self.buffer_width = width;
            self.buffer_height = height;
            self.generation += 1;
            tracing::debug!(
                width,
                height,
                ratio,
                generation = self.generation,
                "reallocated spark surface buffer"
            );
            Some(BufferResize {
                width,
                height,
                scale: ratio,
            })
        } else {
            None
        };
        let rescale = (ratio_changed && !size_changed).then_some(ratio);
        if rescale.is_some() {
            tracing::debug!(ratio, "rescaled spark surface transform");
        }

        SurfaceUpdate {
            css_width,
            css_height,
            buffer,
            rescale,
        }
    }

    /// Record a measurement to apply on the next frame. Later requests
    /// replace earlier ones.
    pub fn queue_resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) {
        self.pending = Some(ResizeRequest {
            css_width,
            css_height,
            device_pixel_ratio,
        });
    }

    /// Apply the queued measurement, if any.
    pub fn apply_pending(&mut self) -> Option<SurfaceUpdate> {
        let req = self.pending.take()?;
        Some(self.resize(req.css_width, req.css_height, req.device_pixel_ratio))
    }
}
