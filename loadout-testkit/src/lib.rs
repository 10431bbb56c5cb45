//! Test helpers for loadout tests.
//!
//! Provides fixture builders for account snapshots, definition catalogs
//! and raw inventory feeds shared by every crate's tests.

mod helpers;

pub use helpers::{
    armor, catalog_for, character, definition_for, exotic_armor, exotic_weapon, item, plug_definition,
    raw_inventory_from, subclass, weapon, SnapshotBuilder, FIXTURE_SOCKET_LAYOUT,
};
