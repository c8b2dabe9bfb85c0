//! Player input
//!
//! Converts key hold/release edges into discrete, rate-limited intents.

pub mod encoder;
pub mod repeat;

pub use encoder::{IntentEncoder, KeyAction, KeyBindings, KeyResponse};
pub use repeat::{IntervalTimer, ManualTimer, RepeatWhile};
