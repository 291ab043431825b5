#![forbid(unsafe_code)]

//! WASM frontend for sparkfx.
//!
//! Binds a [`sparkfx_core::ClickSpark`] engine to the browser:
//! - a container element whose `pointerdown` spawns bursts,
//! - a `<canvas>` overlay sized to the container (device-pixel-ratio aware),
//! - `requestAnimationFrame` for the render loop,
//! - `ResizeObserver` plus window `resize`/`orientationchange` for sizing.
//!
//! From JS:
//!
//! ```text
//! const fx = new ClickSparkWeb(container, canvas, { sparkColor: "#ff0", sparkCount: 10 });
//! fx.start();
//! // ... on unmount
//! fx.stop();
//! ```
//!
//! [`paint`] is target-independent so it can be tested natively; the
//! `wasm-bindgen` surface only exists on `wasm32`.

pub mod paint;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::ClickSparkWeb;
