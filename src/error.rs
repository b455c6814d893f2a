// Error types for the particle background and tilt card bindings.

use thiserror::Error;
use wasm_bindgen::JsValue;

// Errors surfaced to the host page. The simulation itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    // A configuration value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // There is no global `window` (e.g. running in a worker)
    #[error("No global window available")]
    NoWindow,

    // The canvas refused to hand out a 2d rendering context
    #[error("Canvas has no 2d rendering context")]
    NoContext,

    // The frame callback was already released by `unmount`
    #[error("Animation frame callback is detached")]
    Detached,

    // A call into the browser threw
    #[error("JavaScript error: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => Error::Js(message),
            None => Error::Js(format!("{:?}", value)),
        }
    }
}

impl From<Error> for JsValue {
    fn from(error: Error) -> Self {
        js_sys::Error::new(&error.to_string()).into()
    }
}
