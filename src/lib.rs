mod utils;

pub mod background;
pub mod color;
pub mod config;
pub mod cursor;
pub mod error;
pub mod field;
pub mod frame_meter;
pub mod logger;
pub mod particle;
pub mod renderer;
pub mod simulator;
pub mod throttle;
pub mod tilt;

use wasm_bindgen::prelude::*;
use web_sys::console;

pub use background::ParticleBackground;
pub use config::FieldConfig;
pub use cursor::{CursorFollower, CursorVariant};
pub use error::{Error, Result};
pub use field::{Edge, ParticleField};
pub use simulator::{FrameScheduler, ParticleSimulator, RunState};
pub use tilt::TiltCard;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    logger::init(if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
}

// console.time/timeEnd around a scope, only while trace logging is on
pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn start(name: &'a str) -> Option<Timer<'a>> {
        if log::log_enabled!(log::Level::Trace) {
            console::time_with_label(name);
            Some(Timer { name })
        } else {
            None
        }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}
