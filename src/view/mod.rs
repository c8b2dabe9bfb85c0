//! Presentation of server snapshots
//!
//! Nothing in here knows about the DOM. Everything goes through the
//! [`Surface`] capability so the whole module runs headless:
//! - No physics or game rules, the server owns those
//! - No snapshot reordering, arrival order is authoritative
//! - Each snapshot fully replaces the previous one

pub mod cadence;
pub mod reconcile;
pub mod render;
pub mod surface;

pub use cadence::CadenceEstimator;
pub use reconcile::{ReconcileReport, Registry};
pub use render::{SnapshotRenderer, StatusMessage, transition_for};
pub use surface::{Attributes, ElementKind, MemoryElement, MemorySurface, Surface, SurfaceOp, Transition};
