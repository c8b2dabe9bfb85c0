//! Brick Pong client - browser front end for a server-authoritative arcade game
//!
//! Core modules:
//! - `protocol`: Wire messages exchanged with the game server
//! - `view`: Snapshot rendering and identity-keyed entity reconciliation
//! - `input`: Key hold/release to rate-limited paddle intents
//! - `session`: Wires inbound snapshots and outbound intents together
//! - `platform`: Browser bindings (DOM surface, WebSocket, timers)
//! - `settings`: Client configuration

pub mod error;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod view;

pub use error::ClientError;
pub use session::{IntentSink, Session};
pub use settings::Settings;

/// Client configuration constants
pub mod consts {
    /// Nominal server tick interval in milliseconds (authority loop rate, ~60 Hz)
    pub const TICK_INTERVAL_MS: f32 = 16.0;
    /// Paddle move repeat period while a direction key is held
    pub const REPEAT_PERIOD_MS: u32 = 50;

    /// Ball radius used to centre ball elements on their wire coordinate
    pub const BALL_RADIUS: f32 = 10.0;

    /// Inter-arrival gaps above this are pauses, not cadence samples
    pub const MAX_CADENCE_GAP_MS: f64 = 250.0;
    /// Smoothing factor for the measured cadence (0-1, higher = more reactive)
    pub const CADENCE_SMOOTHING: f32 = 0.2;
}
