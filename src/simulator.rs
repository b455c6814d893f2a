// Lifecycle of the particle background, independent of the browser.
//
// The simulator is either `Stopped` (before mount, after unmount) or
// `Running`. While running, every animation frame re-requests the next one,
// so cancelling the single pending request is enough to end the loop.

use crate::config::FieldConfig;
use crate::error::Result;
use crate::field::ParticleField;
use crate::frame_meter::FrameMeter;
use crate::renderer::Surface;
use crate::throttle::FrameThrottle;

// Something that can schedule the next animation frame.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<i32>;
    fn cancel_frame(&mut self, handle: i32);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

pub struct ParticleSimulator {
    field: ParticleField,
    throttle: FrameThrottle,
    meter: FrameMeter,
    state: RunState,
    pending_frame: Option<i32>,
}

impl ParticleSimulator {
    pub fn new(config: FieldConfig) -> Result<Self> {
        Ok(Self::with_field(ParticleField::new(config)?))
    }

    pub fn with_field(field: ParticleField) -> Self {
        let throttle = FrameThrottle::new(field.config().frame_interval_ms);
        ParticleSimulator {
            field,
            throttle,
            meter: FrameMeter::new(),
            state: RunState::Stopped,
            pending_frame: None,
        }
    }

    // Stopped -> Running: seeds the field and requests the first frame.
    // Starting an already running simulator does nothing.
    pub fn start<F: FrameScheduler>(&mut self, width: f64, height: f64, frames: &mut F) -> Result<()> {
        if self.state == RunState::Running {
            return Ok(());
        }
        self.field.init(width, height);
        self.throttle.reset();
        self.meter.reset();
        self.pending_frame = Some(frames.request_frame()?);
        self.state = RunState::Running;
        log::info!("particle background started with {} particles", self.field.len());
        Ok(())
    }

    // start, then run `attach` (listener wiring). If attaching fails the
    // simulator is stopped again so no frame is left pending.
    pub fn start_with<F, A>(&mut self, width: f64, height: f64, frames: &mut F, attach: A) -> Result<()>
    where
        F: FrameScheduler,
        A: FnOnce() -> Result<()>,
    {
        self.start(width, height, frames)?;
        if let Err(e) = attach() {
            self.stop(frames);
            return Err(e);
        }
        Ok(())
    }

    // Animation-frame callback. Returns whether the frame did any work:
    // frames inside the throttle interval, or with no surface yet, only
    // re-request the next frame.
    pub fn on_frame<S: Surface, F: FrameScheduler>(
        &mut self,
        now_ms: f64,
        surface: Option<&mut S>,
        frames: &mut F,
    ) -> bool {
        self.pending_frame = None;
        if self.state == RunState::Stopped {
            return false;
        }
        let executed = match surface {
            Some(surface) if self.throttle.ready(now_ms) => {
                self.field.frame(surface);
                if let Some(fps) = self.meter.record(now_ms) {
                    log::debug!("particle background at {} fps", fps);
                }
                true
            }
            _ => false,
        };
        match frames.request_frame() {
            Ok(handle) => self.pending_frame = Some(handle),
            Err(e) => log::warn!("particle background loop ended: {}", e),
        }
        executed
    }

    // Pushes nearby particles away from the pointer. Ignored while stopped.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> usize {
        if self.state == RunState::Stopped {
            return 0;
        }
        self.field.repel(x, y)
    }

    // Reseeds the whole field for the new surface size. Ignored while stopped.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        if self.state == RunState::Stopped {
            return;
        }
        self.field.init(width, height);
    }

    // Running -> Stopped. Idempotent.
    pub fn stop<F: FrameScheduler>(&mut self, frames: &mut F) {
        if let Some(handle) = self.pending_frame.take() {
            frames.cancel_frame(handle);
        }
        if self.state == RunState::Running {
            log::info!("particle background stopped");
        }
        self.state = RunState::Stopped;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn pending_frame(&self) -> Option<i32> {
        self.pending_frame
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn fps(&self) -> Option<u32> {
        self.meter.fps()
    }
}
