#![forbid(unsafe_code)]

//! The click-spark engine.
//!
//! [`ClickSpark`] bundles config, spark store, surface and jitter source. The
//! host forwards three kinds of events into it and replays what comes out:
//!
//! | Host event                         | Call                          |
//! |------------------------------------|-------------------------------|
//! | `pointerdown`                      | [`ClickSpark::pointer_down`]  |
//! | window `resize`/`orientationchange`| [`ClickSpark::resize`]        |
//! | `ResizeObserver` notification      | [`ClickSpark::queue_resize`]  |
//! | animation frame                    | [`ClickSpark::frame`]         |

use std::time::Duration;

use crate::config::{ConfigError, SparkConfig};
use crate::geometry::{Point, SurfaceBounds};
use crate::jitter::{JitterSource, XorshiftJitter};
use crate::render::{DrawCommand, FrameStats, render_frame};
use crate::spark::{Spark, SparkStore};
use crate::surface::{Surface, SurfaceUpdate};

/// What a frame produced besides draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutcome {
    /// A queued resize applied at the start of this frame. The host must
    /// apply it before replaying the draw commands.
    pub resize: Option<SurfaceUpdate>,
    pub stats: FrameStats,
}

/// Click-spark effect state.
#[derive(Debug, Clone)]
pub struct ClickSpark<J = XorshiftJitter> {
    config: SparkConfig,
    store: SparkStore,
    surface: Surface,
    jitter: J,
}

impl ClickSpark<XorshiftJitter> {
    /// Engine with a xorshift jitter source seeded from `config.seed`
    /// (or [`XorshiftJitter::DEFAULT_SEED`]).
    pub fn new(config: SparkConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or(XorshiftJitter::DEFAULT_SEED);
        Self::with_jitter(config, XorshiftJitter::new(seed))
    }
}

impl<J: JitterSource> ClickSpark<J> {
    pub fn with_jitter(config: SparkConfig, jitter: J) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            store: SparkStore::new(),
            surface: Surface::new(),
            jitter,
        })
    }

    #[inline]
    pub fn config(&self) -> &SparkConfig {
        &self.config
    }

    /// Replace the config. Live sparks keep their origin, angle and spawn
    /// time and are drawn with the new settings from the next frame on.
    pub fn set_config(&mut self, config: SparkConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    #[inline]
    pub fn sparks(&self) -> &[Spark] {
        self.store.as_slice()
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Spawn a burst for a press at client coordinates. Returns the number
    /// of sparks added.
    pub fn pointer_down(
        &mut self,
        client_x: f64,
        client_y: f64,
        bounds: SurfaceBounds,
        now: Duration,
    ) -> usize {
        self.spawn_at(bounds.to_local(client_x, client_y), now)
    }

    /// Spawn a burst at a surface-local point.
    pub fn spawn_at(&mut self, origin: Point, now: Duration) -> usize {
        let count = self.config.effective_count();
        self.store.spawn_ring(origin, count, now, &mut self.jitter)
    }

    /// Apply a size measurement now.
    pub fn resize(
        &mut self,
        css_width: f64,
        css_height: f64,
        device_pixel_ratio: f64,
    ) -> SurfaceUpdate {
        self.surface
            .resize(css_width, css_height, device_pixel_ratio)
    }

    /// Apply a size measurement at the start of the next frame.
    pub fn queue_resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) {
        self.surface
            .queue_resize(css_width, css_height, device_pixel_ratio);
    }

    /// Run one frame at `now`, appending draw commands to `out`.
    pub fn frame(&mut self, now: Duration, out: &mut Vec<DrawCommand>) -> FrameOutcome {
        let resize = self.surface.apply_pending();
        let stats = render_frame(&mut self.store, &self.surface, &self.config, now, out);
        FrameOutcome { resize, stats }
    }

    /// Drop every spark without drawing.
    pub fn clear(&mut self) {
        self.store.clear();
    }
}
