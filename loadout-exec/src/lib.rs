//! Loadout Execution Layer
//!
//! Runs resolved plans against the remote account.
//!
//! # Architecture
//!
//! ```text
//! ManifestPort → ManifestCache → DefinitionCatalog → Engine → Plan
//!                                                             ↓
//!                                   InventoryPort ← Executor ←
//! ```
//!
//! # Components
//!
//! - **Ports**: Traits for the remote inventory mutations and manifest lookups
//! - **ManifestCache**: Memoized definition prefetch for one run
//! - **Executor**: Applies planned actions in order, reporting each outcome
//! - **Stub**: Simulated account and manifest for tests and offline runs
//!
//! # Example
//!
//! ```rust,ignore
//! use loadout_exec::{Executor, StubInventory};
//! use std::sync::Arc;
//!
//! let inventory = Arc::new(StubInventory::new(snapshot));
//! let executor = Executor::new(inventory);
//!
//! let report = executor.run(&plan, false).await;
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod executor;
pub mod manifest;
pub mod ports;
pub mod stub;

// Re-exports for convenience
pub use error::{ExecError, ExecResult};
pub use executor::{ActionOutcome, ActionStatus, ApplyReport, Executor, SkipReason};
pub use manifest::ManifestCache;
pub use ports::{InventoryPort, ManifestPort};
pub use stub::{StubCall, StubInventory, StubManifest};
