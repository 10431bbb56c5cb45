//! Resolution error types.
//!
//! Every variant is fatal: it aborts resolution before any mutation runs.

use loadout_domain::{CharacterId, ItemBucket, ItemHash, ItemRef};
use thiserror::Error;

/// Errors that can occur while resolving a loadout into a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Active character is not in the snapshot
    #[error("Unknown character: {0}")]
    UnknownCharacter(CharacterId),

    /// Referenced item is nowhere on the account
    #[error("Item not found on account: {0}")]
    ItemNotFound(ItemRef),

    /// Item is equipped on a character the engine may not unequip
    #[error("Item {item} is equipped on character {character} and cannot be moved")]
    EquippedElsewhere {
        /// The blocked item
        item: ItemRef,
        /// Character that has it equipped
        character: CharacterId,
    },

    /// No non-exotic item can free the target exotic's slot
    #[error("No non-exotic {bucket} replacement available for exotic {item}")]
    NoExoticReplacement {
        /// Target exotic
        item: ItemRef,
        /// Slot that needed a replacement
        bucket: ItemBucket,
    },

    /// Manifest has no definition for a hash the plan needs
    #[error("Missing item definition: {0}")]
    MissingDefinition(ItemHash),

    /// Socket index beyond the item's customizable sockets
    #[error("Socket index {index} out of range for {item} ({available} customizable sockets)")]
    SocketOutOfRange {
        /// Item addressed
        item: ItemRef,
        /// Requested category-relative index
        index: u32,
        /// Number of customizable sockets
        available: usize,
    },

    /// Socket assignment for an item outside `equip ∪ extra`
    #[error("Socket assignment for {0} which the loadout does not list")]
    OrphanSocket(ItemRef),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
