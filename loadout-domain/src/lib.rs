//! Loadout Domain Layer
//!
//! Pure domain types with zero I/O dependencies.
//! Contains identifiers, item classification, the account snapshot,
//! loadouts, plan actions and the loadout text codec.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod catalog;
pub mod codec;
pub mod entities;
pub mod inventory;
pub mod loadout;
pub mod snapshot;
pub mod value_objects;

// Re-export commonly used types
pub use catalog::{DefinitionCatalog, ItemCatalog};
pub use codec::ParseError;
pub use entities::{
    bucket_hashes, ClassifiedItem, ItemBucket, ItemDefinition, ItemType, EXOTIC_TIER_TYPE,
};
pub use inventory::{RawCharacter, RawInventory, RawItem, RawSocket};
pub use loadout::{LoadoutAction, LoadoutSpec, PlannedAction, SocketAssignment};
pub use snapshot::{AccountSnapshot, CharacterInventory, Container, PlugState};
pub use value_objects::{CharacterId, DomainError, InstanceId, ItemHash, ItemRef};
