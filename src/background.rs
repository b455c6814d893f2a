// Browser binding for the particle background: owns the canvas, the window
// listeners and the self-re-requesting animation-frame closure.

use crate::config::FieldConfig;
use crate::error::{Error, Result};
use crate::renderer::CanvasSurface;
use crate::simulator::{FrameScheduler, ParticleSimulator};
use crate::Timer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

// requestAnimationFrame against a callback slot that unmount empties
#[derive(Clone)]
struct AnimationFrames {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) -> Result<i32> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref().ok_or(Error::Detached)?;
        Ok(self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())?)
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame({}) failed: {:?}", handle, e);
        }
    }
}

struct Mounted {
    window: Window,
    frames: AnimationFrames,
    on_resize: Closure<dyn FnMut()>,
    on_pointer_move: Closure<dyn FnMut(MouseEvent)>,
}

#[wasm_bindgen]
pub struct ParticleBackground {
    simulator: Rc<RefCell<ParticleSimulator>>,
    canvas_opacity: f64,
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl ParticleBackground {
    #[wasm_bindgen(constructor)]
    pub fn new() -> std::result::Result<ParticleBackground, JsValue> {
        Ok(Self::with_config(FieldConfig::default())?)
    }

    // Sizes and styles the canvas, seeds the field, attaches the window
    // listeners and starts the frame loop. Mounting twice does nothing.
    pub fn mount(&mut self, canvas: HtmlCanvasElement) -> std::result::Result<(), JsValue> {
        Ok(self.try_mount(canvas)?)
    }

    // Cancels the pending frame and detaches every listener. Idempotent.
    pub fn unmount(&mut self) {
        let mounted = match self.mounted.take() {
            Some(mounted) => mounted,
            None => return,
        };
        let mut frames = mounted.frames.clone();
        self.simulator.borrow_mut().stop(&mut frames);

        detach_listeners(
            &mounted.window,
            &mounted.on_resize,
            &mounted.on_pointer_move,
        );
        release_frame_callback(&mounted.frames);
    }

    // Flat [x, y, vx, vy] per particle
    pub fn snapshot(&self) -> Vec<f64> {
        self.simulator
            .borrow()
            .field()
            .particles()
            .iter()
            .flat_map(|p| vec![p.pos[0], p.pos[1], p.vel[0], p.vel[1]])
            .collect()
    }

    pub fn is_running(&self) -> bool {
        self.simulator.borrow().is_running()
    }

    pub fn particle_count(&self) -> usize {
        self.simulator.borrow().field().len()
    }

    pub fn fps(&self) -> Option<u32> {
        self.simulator.borrow().fps()
    }
}

impl ParticleBackground {
    pub fn with_config(config: FieldConfig) -> Result<Self> {
        let canvas_opacity = config.canvas_opacity;
        Ok(ParticleBackground {
            simulator: Rc::new(RefCell::new(ParticleSimulator::new(config)?)),
            canvas_opacity,
            mounted: None,
        })
    }

    fn try_mount(&mut self, canvas: HtmlCanvasElement) -> Result<()> {
        if self.mounted.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let (width, height) = viewport_size(&window)?;
        resize_canvas(&canvas, width, height);
        style_canvas(&canvas, self.canvas_opacity)?;

        let surface = match CanvasSurface::new(&canvas) {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::warn!("particle background will not draw: {}", e);
                None
            }
        };

        let frames = AnimationFrames {
            window: window.clone(),
            callback: Rc::new(RefCell::new(None)),
        };
        {
            let simulator = self.simulator.clone();
            let mut frames_for_loop = frames.clone();
            let mut surface = surface;
            let on_frame = Closure::wrap(Box::new(move |now: f64| {
                let _timer = Timer::start("ParticleBackground::frame");
                simulator
                    .borrow_mut()
                    .on_frame(now, surface.as_mut(), &mut frames_for_loop);
            }) as Box<dyn FnMut(f64)>);
            *frames.callback.borrow_mut() = Some(on_frame);
        }

        let on_resize = {
            let simulator = self.simulator.clone();
            let window = window.clone();
            let canvas = canvas.clone();
            Closure::wrap(Box::new(move || match viewport_size(&window) {
                Ok((width, height)) => {
                    resize_canvas(&canvas, width, height);
                    simulator.borrow_mut().on_resize(width, height);
                }
                Err(e) => log::warn!("ignoring resize: {}", e),
            }) as Box<dyn FnMut()>)
        };

        // The canvas ignores pointer events, so track the pointer on the
        // window and translate into canvas coordinates.
        let on_pointer_move = {
            let simulator = self.simulator.clone();
            let canvas = canvas.clone();
            Closure::wrap(Box::new(move |event: MouseEvent| {
                let rect = canvas.get_bounding_client_rect();
                let x = event.client_x() as f64 - rect.left();
                let y = event.client_y() as f64 - rect.top();
                simulator.borrow_mut().on_pointer_move(x, y);
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        let mut scheduler = frames.clone();
        let started = self
            .simulator
            .borrow_mut()
            .start_with(width, height, &mut scheduler, || {
                attach_listeners(&window, &on_resize, &on_pointer_move)
            });
        if let Err(e) = started {
            release_frame_callback(&frames);
            return Err(e);
        }

        self.mounted = Some(Mounted {
            window,
            frames,
            on_resize,
            on_pointer_move,
        });
        Ok(())
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.unmount();
    }
}

// Both listeners or neither
fn attach_listeners(
    window: &Window,
    on_resize: &Closure<dyn FnMut()>,
    on_pointer_move: &Closure<dyn FnMut(MouseEvent)>,
) -> Result<()> {
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    if let Err(e) = window
        .add_event_listener_with_callback("mousemove", on_pointer_move.as_ref().unchecked_ref())
    {
        detach_listeners(window, on_resize, on_pointer_move);
        return Err(e.into());
    }
    Ok(())
}

// Removing a listener that was never added is a no-op in the DOM
fn detach_listeners(
    window: &Window,
    on_resize: &Closure<dyn FnMut()>,
    on_pointer_move: &Closure<dyn FnMut(MouseEvent)>,
) {
    if let Err(e) =
        window.remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
    {
        log::warn!("failed to detach resize listener: {:?}", e);
    }
    if let Err(e) = window
        .remove_event_listener_with_callback("mousemove", on_pointer_move.as_ref().unchecked_ref())
    {
        log::warn!("failed to detach mousemove listener: {:?}", e);
    }
}

// The frame closure holds a handle to its own slot; emptying the slot breaks
// that cycle so the closure is freed.
fn release_frame_callback(frames: &AnimationFrames) {
    let callback = frames.callback.borrow_mut().take();
    drop(callback);
}

fn viewport_size(window: &Window) -> Result<(f64, f64)> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

fn resize_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64) {
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
}

// Full viewport, behind everything, never intercepting the pointer
fn style_canvas(canvas: &HtmlCanvasElement, opacity: f64) -> Result<()> {
    let style = canvas.style();
    style.set_property("position", "fixed")?;
    style.set_property("top", "0")?;
    style.set_property("left", "0")?;
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;
    style.set_property("pointer-events", "none")?;
    style.set_property("z-index", "0")?;
    style.set_property("opacity", &opacity.to_string())?;
    Ok(())
}
