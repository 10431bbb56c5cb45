//! Loadout Engine Layer
//!
//! Pure decision logic, deterministic, no I/O.
//! Takes a loadout and an account snapshot → returns the actions to execute.
//!
//! Resolution order within a plan:
//!
//! 1. de-exotic swaps
//! 2. transfers onto the active character
//! 3. equips
//! 4. socket plugs

#![warn(clippy::all)]

pub mod classifier;
pub mod context;
pub mod de_exotic;
pub mod engine;
pub mod equip;
pub mod error;
pub mod shaper;
pub mod socket;
pub mod transfer;

pub use classifier::classify;
pub use engine::{Engine, ExportOptions, Plan};
pub use error::{EngineError, EngineResult};
pub use shaper::shape_account;
