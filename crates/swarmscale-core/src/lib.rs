//! swarmscale-core — delayed replica scaling for orchestrated services.
//!
//! A run performs exactly one bounded state transition against a control
//! plane:
//!
//! ```text
//! START ─▶ DELAYED ─▶ LOOKED_UP ─▶ SCALED
//!                         │
//!                         └──────▶ NOT_FOUND
//! ```
//!
//! Any unrecovered control-plane error ends the run as `FAILED`. The target
//! replica count is `max(current + delta, 0)` and the update is issued even
//! when it equals the current count.
//!
//! The control plane and the delay are both injected (`ControlPlane`,
//! `DelayGate`) so the controller can run against test doubles without
//! network access or wall-clock waiting.

pub mod config;
pub mod control_plane;
pub mod controller;
pub mod delay;
pub mod error;
pub mod replicas;
pub mod types;

pub use config::{SwarmscaleConfig, parse_duration};
pub use control_plane::{BoxFuture, ControlPlane};
pub use controller::ScaleController;
pub use delay::{DelayGate, DelayOutcome, SleepDelay};
pub use error::{ConfigError, ControlPlaneError, ControlPlaneResult, ScaleError};
pub use replicas::compute_target;
pub use types::*;
