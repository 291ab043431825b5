#![forbid(unsafe_code)]

//! Per-frame spark rendering.
//!
//! A frame is a pure function of the store, the surface and the config at a
//! given time: it produces a [`DrawCommand`] list and evicts expired sparks.
//! The host replays the commands onto its 2D context in order.
//!
//! For a spark of age `elapsed` with lifetime `duration`:
//!
//! ```text
//! p        = elapsed / duration            (dropped when p >= 1)
//! eased    = easing(p)
//! dist     = eased * radius * extra_scale  (near end, from origin)
//! line_len = size * (1 - eased)
//! ```

use std::time::Duration;

use crate::color::StrokeColor;
use crate::config::SparkConfig;
use crate::easing::Easing;
use crate::geometry::Point;
use crate::spark::{Spark, SparkStore};
use crate::surface::Surface;

/// One canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole backing buffer (device pixels).
    Clear { width: u32, height: u32 },
    /// Stroke a round-capped segment in CSS pixels.
    Line {
        from: Point,
        to: Point,
        color: StrokeColor,
        width: f64,
    },
}

/// Where a live spark is in its flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkPose {
    /// Linear progress in `[0, 1)`.
    pub progress: f64,
    /// Progress after easing.
    pub eased: f64,
    /// Distance of the segment's near end from the origin.
    pub dist: f64,
    /// Segment length.
    pub line_len: f64,
}

impl SparkPose {
    /// Pose at `elapsed`, or `None` once the lifetime is used up.
    pub fn at(
        elapsed: Duration,
        duration: Duration,
        easing: Easing,
        radius: f64,
        size: f64,
        extra_scale: f64,
    ) -> Option<Self> {
        if elapsed >= duration {
            return None;
        }
        let progress = elapsed.as_nanos() as f64 / duration.as_nanos() as f64;
        let eased = easing.apply(progress);
        Some(Self {
            progress,
            eased,
            dist: eased * radius * extra_scale,
            line_len: size * (1.0 - eased),
        })
    }

    /// Pose of `spark` at `now` under `config`.
    pub fn of(spark: &Spark, now: Duration, config: &SparkConfig) -> Option<Self> {
        Self::at(
            spark.elapsed(now),
            config.effective_duration(),
            config.easing,
            config.radius,
            config.size,
            config.extra_scale,
        )
    }

    /// Segment endpoints for a spark at `origin` heading along `angle`.
    pub fn segment(&self, origin: Point, angle: f64) -> (Point, Point) {
        (
            origin.along(angle, self.dist),
            origin.along(angle, self.dist + self.line_len),
        )
    }
}

/// Counters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub drawn: usize,
    pub evicted: usize,
}

/// Render one frame at `now` into `out` and evict expired sparks.
///
/// `out` is appended to, not cleared, so callers can reuse one buffer.
pub fn render_frame(
    store: &mut SparkStore,
    surface: &Surface,
    config: &SparkConfig,
    now: Duration,
    out: &mut Vec<DrawCommand>,
) -> FrameStats {
    let (width, height) = surface.buffer_size();
    out.push(DrawCommand::Clear { width, height });

    let mut drawn = 0;
    for spark in store.iter() {
        let Some(pose) = SparkPose::of(spark, now, config) else {
            continue;
        };
        let (from, to) = pose.segment(spark.origin(), spark.angle());
        out.push(DrawCommand::Line {
            from,
            to,
            color: config.color.clone(),
            width: config.line_width,
        });
        drawn += 1;
    }

    let evicted = store.retain_live(now, config.effective_duration());
    FrameStats { drawn, evicted }
}
