//! Platform abstraction layer
//!
//! Browser implementations of the client's host capabilities:
//! - DOM elements behind the view `Surface`
//! - WebSocket channel for frames and intents
//! - `setInterval` timers for key repeat

pub mod dom;
pub mod socket;
pub mod timer;

pub use dom::DomSurface;
pub use socket::WebSocketChannel;
pub use timer::WindowInterval;
