#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use sparkfx_core::clock::from_host_millis;
use sparkfx_core::{
    ClickSpark, DrawCommand, FrameHandle, FrameHost, HostError, Lifecycle, Point, SparkConfig,
    SurfaceBounds, SurfaceUpdate,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, PointerEvent, ResizeObserver, Window,
};

use crate::paint::{Canvas2d, Painter};

/// Window events that re-measure immediately.
const WINDOW_RESIZE_EVENTS: [&str; 2] = ["resize", "orientationchange"];

fn to_js(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn host_error(err: JsValue) -> HostError {
    HostError(format!("{err:?}"))
}

/// Pointer events report fractional client coordinates, but web-sys exposes
/// `clientX`/`clientY` as `i32`. Read the double off the event object and
/// fall back to the integer getter.
fn client_coord(event: &PointerEvent, key: &str, truncated: i32) -> f64 {
    js_sys::Reflect::get(event.as_ref(), &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(truncated))
}

struct ContextCanvas<'a>(&'a CanvasRenderingContext2d);

impl Canvas2d for ContextCanvas<'_> {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.0.clear_rect(x, y, width, height);
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.0.set_stroke_style_str(css);
    }

    fn set_line_width(&mut self, width: f64) {
        self.0.set_line_width(width);
    }

    fn set_round_line_cap(&mut self) {
        self.0.set_line_cap("round");
    }

    fn stroke_line(&mut self, from: Point, to: Point) {
        self.0.begin_path();
        self.0.move_to(from.x, from.y);
        self.0.line_to(to.x, to.y);
        self.0.stroke();
    }
}

/// Engine plus the DOM handles it measures and draws into.
struct Scene {
    engine: ClickSpark,
    lifecycle: Lifecycle,
    window: Window,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    // Missing 2D context: the loop still runs, nothing is drawn.
    context: Option<CanvasRenderingContext2d>,
    painter: Painter,
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn now(&self) -> Duration {
        from_host_millis(self.window.performance().map_or(0.0, |p| p.now()))
    }

    fn measure(&self) -> (f64, f64, f64) {
        let rect = self.container.get_bounding_client_rect();
        (rect.width(), rect.height(), self.window.device_pixel_ratio())
    }

    fn resize_now(&mut self) {
        let (width, height, dpr) = self.measure();
        let update = self.engine.resize(width, height, dpr);
        self.apply_surface(update);
    }

    fn queue_resize(&mut self) {
        let (width, height, dpr) = self.measure();
        self.engine.queue_resize(width, height, dpr);
    }

    fn apply_surface(&mut self, update: SurfaceUpdate) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", update.css_width));
        let _ = style.set_property("height", &format!("{}px", update.css_height));

        let scale = match (update.buffer, update.rescale) {
            (Some(buffer), _) => {
                // Assigning width/height clears the canvas and resets its state.
                self.canvas.set_width(buffer.width);
                self.canvas.set_height(buffer.height);
                self.painter.invalidate();
                buffer.scale
            }
            (None, Some(ratio)) => ratio,
            (None, None) => return,
        };
        if let Some(context) = &self.context {
            let scale = f64::from(scale);
            let _ = context.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0);
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) {
        let rect = self.canvas.get_bounding_client_rect();
        let now = self.now();
        let client_x = client_coord(event, "clientX", event.client_x());
        let client_y = client_coord(event, "clientY", event.client_y());
        self.engine.pointer_down(
            client_x,
            client_y,
            SurfaceBounds::new(rect.left(), rect.top()),
            now,
        );
    }

    fn render(&mut self, timestamp_ms: f64) {
        self.commands.clear();
        let outcome = self
            .engine
            .frame(from_host_millis(timestamp_ms), &mut self.commands);
        if let Some(update) = outcome.resize {
            self.apply_surface(update);
        }
        if let Some(context) = &self.context {
            self.painter
                .paint(&mut ContextCanvas(context), &self.commands);
        }
    }
}

/// Browser side of [`FrameHost`]: animation frames, the resize observer and
/// event listeners.
///
/// The callbacks hold `Rc`s back into the scene and this host, so they form a
/// cycle that [`BrowserHost::release`] breaks.
struct BrowserHost {
    window: Window,
    container: HtmlElement,
    on_frame: Option<Closure<dyn FnMut(f64)>>,
    on_observed_resize: Option<Closure<dyn FnMut()>>,
    on_window_resize: Option<Closure<dyn FnMut()>>,
    on_pointer_down: Option<Closure<dyn FnMut(PointerEvent)>>,
    observer: Option<ResizeObserver>,
}

impl BrowserHost {
    fn release(&mut self) {
        self.on_frame = None;
        self.on_observed_resize = None;
        self.on_window_resize = None;
        self.on_pointer_down = None;
    }
}

impl FrameHost for BrowserHost {
    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        let callback = self
            .on_frame
            .as_ref()
            .ok_or_else(|| HostError("frame callback released".into()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(host_error)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }

    fn attach_observers(&mut self) -> Result<(), HostError> {
        if let Some(callback) = &self.on_observed_resize {
            let observer =
                ResizeObserver::new(callback.as_ref().unchecked_ref()).map_err(host_error)?;
            observer.observe(&self.container);
            self.observer = Some(observer);
        }
        if let Some(callback) = &self.on_window_resize {
            for event in WINDOW_RESIZE_EVENTS {
                self.window
                    .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
                    .map_err(host_error)?;
            }
        }
        if let Some(callback) = &self.on_pointer_down {
            self.container
                .add_event_listener_with_callback("pointerdown", callback.as_ref().unchecked_ref())
                .map_err(host_error)?;
        }
        Ok(())
    }

    fn detach_observers(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        // Removing a listener that was never added is a no-op in the DOM.
        if let Some(callback) = &self.on_window_resize {
            for event in WINDOW_RESIZE_EVENTS {
                let _ = self
                    .window
                    .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
            }
        }
        if let Some(callback) = &self.on_pointer_down {
            let _ = self.container.remove_event_listener_with_callback(
                "pointerdown",
                callback.as_ref().unchecked_ref(),
            );
        }
    }
}

fn parse_options(options: Option<JsValue>) -> Result<SparkConfig, JsValue> {
    let Some(options) = options.filter(|v| !v.is_undefined() && !v.is_null()) else {
        return Ok(SparkConfig::default());
    };
    let json: String = js_sys::JSON::stringify(&options)?.into();
    SparkConfig::from_json_str(&json).map_err(to_js)
}

/// Click-spark overlay bound to a container and canvas.
#[wasm_bindgen]
pub struct ClickSparkWeb {
    scene: Rc<RefCell<Scene>>,
    host: Rc<RefCell<BrowserHost>>,
}

#[wasm_bindgen]
impl ClickSparkWeb {
    /// Bind to `container` (receives presses, defines the size) and `canvas`
    /// (the overlay drawn into). `options` uses the component prop names,
    /// e.g. `{ sparkColor: "#fff", sparkCount: 8, duration: 400 }`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        options: Option<JsValue>,
    ) -> Result<ClickSparkWeb, JsValue> {
        let window = web_sys::window().ok_or_else(|| to_js("no global window"))?;
        let mut config = parse_options(options)?;
        if config.seed.is_none() {
            // 2^53: every integer below is exact in an f64.
            config.seed = Some((js_sys::Math::random() * 9_007_199_254_740_992.0) as u64);
        }
        let engine = ClickSpark::new(config).map_err(to_js)?;
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        if context.is_none() {
            tracing::warn!("canvas has no 2d context; sparks will not be drawn");
        }

        let scene = Rc::new(RefCell::new(Scene {
            engine,
            lifecycle: Lifecycle::new(),
            window: window.clone(),
            container: container.clone(),
            canvas,
            context,
            painter: Painter::new(),
            commands: Vec::new(),
        }));
        let host = Rc::new(RefCell::new(BrowserHost {
            window,
            container,
            on_frame: None,
            on_observed_resize: None,
            on_window_resize: None,
            on_pointer_down: None,
            observer: None,
        }));

        let on_frame = {
            let scene = Rc::clone(&scene);
            let host = Rc::clone(&host);
            Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
                let mut scene = scene.borrow_mut();
                let fired = scene.lifecycle.frame_fired(&mut *host.borrow_mut());
                match fired {
                    Ok(true) => scene.render(timestamp),
                    Ok(false) => {}
                    Err(err) => tracing::warn!(%err, "spark render loop could not reschedule"),
                }
            })
        };
        let on_observed_resize = {
            let scene = Rc::clone(&scene);
            Closure::<dyn FnMut()>::new(move || scene.borrow_mut().queue_resize())
        };
        let on_window_resize = {
            let scene = Rc::clone(&scene);
            Closure::<dyn FnMut()>::new(move || scene.borrow_mut().resize_now())
        };
        let on_pointer_down = {
            let scene = Rc::clone(&scene);
            Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
                scene.borrow_mut().pointer_down(&event);
            })
        };

        {
            let mut host = host.borrow_mut();
            host.on_frame = Some(on_frame);
            host.on_observed_resize = Some(on_observed_resize);
            host.on_window_resize = Some(on_window_resize);
            host.on_pointer_down = Some(on_pointer_down);
        }

        Ok(Self { scene, host })
    }

    /// Measure the container, attach observers and start the render loop.
    pub fn start(&self) -> Result<(), JsValue> {
        let mut scene = self.scene.borrow_mut();
        scene.resize_now();
        scene
            .lifecycle
            .start(&mut *self.host.borrow_mut())
            .map_err(to_js)
    }

    /// Cancel the pending frame and detach observers. Call exactly once.
    pub fn stop(&self) -> Result<(), JsValue> {
        let mut scene = self.scene.borrow_mut();
        let mut host = self.host.borrow_mut();
        scene.lifecycle.stop(&mut *host).map_err(to_js)?;
        host.release();
        Ok(())
    }

    /// Replace the options. Sparks already in flight keep going.
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&self, options: JsValue) -> Result<(), JsValue> {
        let mut scene = self.scene.borrow_mut();
        let mut config = parse_options(Some(options))?;
        config.seed = scene.engine.config().seed;
        scene.engine.set_config(config).map_err(to_js)
    }

    /// Sparks currently in flight.
    #[wasm_bindgen(js_name = sparkCount)]
    pub fn spark_count(&self) -> u32 {
        u32::try_from(self.scene.borrow().engine.sparks().len()).unwrap_or(u32::MAX)
    }
}

impl Drop for ClickSparkWeb {
    fn drop(&mut self) {
        let (Ok(mut scene), Ok(mut host)) = (self.scene.try_borrow_mut(), self.host.try_borrow_mut())
        else {
            return;
        };
        if scene.lifecycle.is_running() {
            let _ = scene.lifecycle.stop(&mut *host);
        }
        host.release();
    }
}
