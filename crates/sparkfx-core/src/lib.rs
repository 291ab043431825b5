#![forbid(unsafe_code)]

//! Core: the click-spark particle engine.
//!
//! A pointer press spawns a ring of short-lived line segments that fly outward
//! from the press point and shrink to nothing. This crate owns everything that
//! does not need a browser:
//!
//! - **Host-driven time**: every operation takes the current monotonic time as
//!   a [`Duration`](std::time::Duration) supplied by the embedder.
//! - **Draw commands, not drawing**: [`ClickSpark::frame`] appends
//!   [`DrawCommand`]s that a frontend replays onto a 2D canvas.
//! - **No threads, no blocking**: suitable for `wasm32-unknown-unknown`.
//!
//! ```
//! use std::time::Duration;
//! use sparkfx_core::{ClickSpark, DrawCommand, SparkConfig, SurfaceBounds};
//!
//! let mut spark = ClickSpark::new(SparkConfig::default()).unwrap();
//! spark.resize(200.0, 100.0, 2.0);
//! spark.pointer_down(60.0, 40.0, SurfaceBounds::new(10.0, 10.0), Duration::ZERO);
//!
//! let mut commands = Vec::new();
//! spark.frame(Duration::from_millis(16), &mut commands);
//! assert!(matches!(commands[0], DrawCommand::Clear { width: 400, height: 200 }));
//! assert_eq!(commands.len(), 1 + 8);
//! ```

pub mod clock;
pub mod color;
pub mod config;
pub mod easing;
pub mod effect;
pub mod geometry;
pub mod jitter;
pub mod lifecycle;
pub mod render;
pub mod spark;
pub mod surface;

pub use color::{Rgba, StrokeColor};
pub use config::{ConfigError, SparkConfig};
pub use easing::Easing;
pub use effect::{ClickSpark, FrameOutcome};
pub use geometry::{Point, SurfaceBounds};
pub use jitter::{JitterSource, NoJitter, XorshiftJitter};
pub use lifecycle::{FrameHandle, FrameHost, HostError, Lifecycle, LifecycleError, LifecycleState};
pub use render::DrawCommand;
pub use spark::{Spark, SparkStore};
pub use surface::{BufferResize, Surface, SurfaceUpdate};
