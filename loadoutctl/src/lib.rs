//! Loadout CLI Library
//!
//! Command-line front end for the loadout engine.
//!
//! # Architecture
//!
//! ```text
//! CLI → LoadoutManager → Engine → Executor → InventoryPort
//!            ↑                                     ↑
//!   LoadoutSource, ManifestFile          StubInventory (offline)
//! ```
//!
//! # Components
//!
//! - **LoadoutManager**: plan / apply / export workflows
//! - **Source**: Loadout text from a file or a paste service
//! - **Files**: JSON adapters for the inventory feed and the manifest
//! - **Config**: Environment-based configuration

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod files;
pub mod manager;
pub mod source;

// Re-exports for convenience
pub use config::{Config, Environment, LogFormat, DEFAULT_EDITOR, DEFAULT_LOADOUT_NAME};
pub use error::{CtlError, CtlResult};
pub use files::{load_inventory, ManifestFile};
pub use manager::{LoadoutManager, Resolution};
pub use source::{edit_text, raw_paste_url, LoadoutSource};
