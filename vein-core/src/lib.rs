//! Leaf venation by space colonization.
//!
//! Main components:
//! - [`boundary`] — Bézier leaf outline approximated by a polygon, with
//!   point containment.
//! - [`attractor`] — attractor ("auxin") sampling and removal.
//! - [`network`] — vein nodes, nearest-node assignment and growth.
//! - [`assignment`] — per-pass mapping between nodes and attractors.
//! - [`simulation`] — owned simulation state and the discrete step.
//! - [`config`] — runtime settings and the default leaf geometry.
//! - [`error`] — error type shared by all fallible operations.
//! - [`types`] — shared ids and the rectangle type.

pub mod assignment;
pub mod attractor;
pub mod boundary;
pub mod config;
pub mod error;
pub mod network;
pub mod simulation;
pub mod types;

pub use config::{LeafShape, Settings};
pub use error::SimulationError;
pub use simulation::{SimulationState, StepReport};
