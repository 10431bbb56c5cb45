//! Point-in-time view of an account's items.
//!
//! Built once per run by the account state shaper and read by every
//! resolver. Nothing in the engine mutates it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::ClassifiedItem;
use crate::value_objects::{CharacterId, InstanceId, ItemHash, ItemRef};

/// Plugs per instance, indexed by absolute socket position.
///
/// `None` marks an empty socket.
pub type PlugState = HashMap<InstanceId, Vec<Option<ItemHash>>>;

// =============================================================================
// Character Inventory
// =============================================================================

/// Items held by one character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInventory {
    /// Owning character
    pub character_id: CharacterId,
    /// Items in equipped slots
    pub equipped: Vec<ClassifiedItem>,
    /// Items carried but not equipped
    pub unequipped: Vec<ClassifiedItem>,
}

impl CharacterInventory {
    /// Create an empty inventory
    pub fn new(character_id: CharacterId) -> Self {
        Self {
            character_id,
            equipped: Vec::new(),
            unequipped: Vec::new(),
        }
    }

    /// Whether the item is equipped here
    pub fn has_equipped(&self, item: &ItemRef) -> bool {
        self.equipped.iter().any(|c| c.item.same_item(item))
    }

    /// Whether the item is anywhere on this character
    pub fn holds(&self, item: &ItemRef) -> bool {
        self.has_equipped(item) || self.unequipped.iter().any(|c| c.item.same_item(item))
    }
}

// =============================================================================
// Location
// =============================================================================

/// Container an item currently sits in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Container {
    /// Equipped on a character
    Equipped(CharacterId),
    /// Carried, unequipped, by a character
    Unequipped(CharacterId),
    /// Account-wide vault
    Vault,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equipped(id) => write!(f, "equipped on {}", id),
            Self::Unequipped(id) => write!(f, "unequipped on {}", id),
            Self::Vault => write!(f, "vault"),
        }
    }
}

// =============================================================================
// Account Snapshot
// =============================================================================

/// Every item on the account, plus per-instance plug state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Characters in feed order
    pub characters: Vec<CharacterInventory>,
    /// Vault contents in feed order
    pub vault: Vec<ClassifiedItem>,
    /// Inserted plugs per instance
    #[serde(default)]
    pub plug_state: PlugState,
}

impl AccountSnapshot {
    /// Find a character by id
    pub fn character(&self, id: &CharacterId) -> Option<&CharacterInventory> {
        self.characters.iter().find(|c| &c.character_id == id)
    }

    /// Locate an item, searching characters (equipped, then unequipped)
    /// in feed order and finally the vault.
    pub fn locate(&self, item: &ItemRef) -> Option<(ClassifiedItem, Container)> {
        for character in &self.characters {
            if let Some(found) = character.equipped.iter().find(|c| c.item.same_item(item)) {
                return Some((found.clone(), Container::Equipped(character.character_id.clone())));
            }
            if let Some(found) = character.unequipped.iter().find(|c| c.item.same_item(item)) {
                return Some((
                    found.clone(),
                    Container::Unequipped(character.character_id.clone()),
                ));
            }
        }

        self.vault
            .iter()
            .find(|c| c.item.same_item(item))
            .map(|found| (found.clone(), Container::Vault))
    }

    /// Plug inserted at an absolute socket position, if any
    pub fn plug_at(&self, instance: &InstanceId, socket_index: u32) -> Option<ItemHash> {
        self.plug_state
            .get(instance)
            .and_then(|plugs| plugs.get(socket_index as usize).copied().flatten())
    }

    /// Characters other than `id`, in feed order
    pub fn other_characters<'a>(
        &'a self,
        id: &'a CharacterId,
    ) -> impl Iterator<Item = &'a CharacterInventory> + 'a {
        self.characters.iter().filter(move |c| &c.character_id != id)
    }
}

// =============================================================================
// Tests
// =============================================================================
