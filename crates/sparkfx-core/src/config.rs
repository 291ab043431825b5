#![forbid(unsafe_code)]

//! Effect configuration.
//!
//! [`SparkConfig`] deserializes from the host's options object using the same
//! prop names a page would pass to the component (`sparkColor`, `sparkSize`,
//! `sparkRadius`, `sparkCount`, `duration`, `easing`, `extraScale`). Missing
//! keys take their defaults; `duration` is in milliseconds.
//!
//! ```
//! use sparkfx_core::{Easing, SparkConfig};
//!
//! let config = SparkConfig::from_json_str(r##"{"sparkColor":"#f80","easing":"linear"}"##).unwrap();
//! assert_eq!(config.easing, Easing::Linear);
//! assert_eq!(config.count, 8);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::StrokeColor;
use crate::easing::Easing;

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A geometric option is NaN, infinite or negative.
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidNumber { field: &'static str, value: f64 },
    /// The options object could not be decoded.
    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything that shapes a burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SparkConfig {
    /// Stroke color. Unrecognized CSS strings are passed to the canvas as is.
    #[serde(rename = "sparkColor")]
    pub color: StrokeColor,
    /// Segment length at spawn, in CSS pixels. Shrinks to zero over the lifetime.
    #[serde(rename = "sparkSize")]
    pub size: f64,
    /// Distance the near end travels by the end of the lifetime, before `extra_scale`.
    #[serde(rename = "sparkRadius")]
    pub radius: f64,
    /// Sparks per press. Anything below 1 spawns one.
    #[serde(rename = "sparkCount")]
    pub count: i32,
    /// Spark lifetime.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    pub easing: Easing,
    /// Multiplier on travel distance.
    pub extra_scale: f64,
    /// Stroke width in CSS pixels.
    pub line_width: f64,
    /// Jitter seed. `None` lets the embedder pick one.
    pub seed: Option<u64>,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            color: StrokeColor::default(),
            size: 10.0,
            radius: 15.0,
            count: 8,
            duration: Duration::from_millis(400),
            easing: Easing::EaseOut,
            extra_scale: 1.0,
            line_width: 2.0,
            seed: None,
        }
    }
}

impl SparkConfig {
    /// Decode host options and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the numeric options.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("sparkSize", self.size),
            ("sparkRadius", self.radius),
            ("extraScale", self.extra_scale),
            ("lineWidth", self.line_width),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidNumber { field, value });
            }
        }
        Ok(())
    }

    /// Sparks spawned per press: the configured count, at least one.
    #[inline]
    pub fn effective_count(&self) -> usize {
        self.count.max(1) as usize
    }

    /// Lifetime used for progress math. Zero becomes one nanosecond so
    /// progress stays finite.
    #[inline]
    pub fn effective_duration(&self) -> Duration {
        if self.duration.is_zero() {
            Duration::from_nanos(1)
        } else {
            self.duration
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<StrokeColor>) -> Self {
        self.color = color.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_extra_scale(mut self, extra_scale: f64) -> Self {
        self.extra_scale = extra_scale;
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// `Duration` as (fractional) milliseconds, the unit hosts use.
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::clock::{from_host_millis, to_host_millis};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_host_millis(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(deserializer)?;
        if !ms.is_finite() || ms < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "duration must be a finite, non-negative number of milliseconds (got {ms})"
            )));
        }
        Ok(from_host_millis(ms))
    }
}
