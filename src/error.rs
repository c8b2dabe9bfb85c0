//! Client error type
//!
//! Only bootstrap and decode paths produce errors. The render and input
//! paths log and carry on instead of returning them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Inbound frame was not valid JSON or not an event envelope
    #[error("malformed server message: {0}")]
    Decode(#[from] serde_json::Error),

    /// Frame arrived in a format the client does not read
    #[error("unsupported frame: {0}")]
    UnsupportedFrame(&'static str),

    /// A required page element is missing
    #[error("missing element #{0}")]
    MissingElement(String),

    /// Browser API call failed
    #[error("host error: {0}")]
    Host(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ClientError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ClientError::Host(format!("{:?}", value))
    }
}
