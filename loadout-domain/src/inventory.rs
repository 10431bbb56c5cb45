//! Raw account item feed.
//!
//! This is the unclassified shape the remote profile endpoint hands back.
//! The account state shaper turns it into an [`AccountSnapshot`].
//!
//! [`AccountSnapshot`]: crate::snapshot::AccountSnapshot

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::value_objects::{CharacterId, ItemHash, ItemRef};

/// One item as it appears in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    /// Definition hash
    pub item_hash: ItemHash,
    /// Instance id (absent for non-instanced items)
    #[serde(default)]
    pub item_instance_id: Option<String>,
}

impl RawItem {
    /// Reference form of this item
    pub fn item_ref(&self) -> ItemRef {
        ItemRef::new(self.item_hash, self.item_instance_id.clone().unwrap_or_default())
    }
}

/// One character's items as they appear in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCharacter {
    /// Character id
    pub character_id: CharacterId,
    /// Equipped items
    #[serde(default)]
    pub equipped: Vec<RawItem>,
    /// Carried, unequipped items
    #[serde(default)]
    pub inventory: Vec<RawItem>,
}

/// One socket on an instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSocket {
    /// Inserted plug (absent for an empty socket)
    #[serde(default)]
    pub plug_hash: Option<ItemHash>,
}

/// The whole feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInventory {
    /// Characters in account order
    #[serde(default)]
    pub characters: Vec<RawCharacter>,
    /// Vault contents
    #[serde(default)]
    pub vault: Vec<RawItem>,
    /// Socket lists keyed by instance id, in absolute socket order
    #[serde(default)]
    pub sockets: HashMap<String, Vec<RawSocket>>,
}

impl RawInventory {
    /// Every definition hash the feed mentions (items and plugs)
    pub fn referenced_hashes(&self) -> BTreeSet<ItemHash> {
        let items = self
            .characters
            .iter()
            .flat_map(|c| c.equipped.iter().chain(c.inventory.iter()))
            .chain(self.vault.iter())
            .map(|i| i.item_hash);

        let plugs = self
            .sockets
            .values()
            .flat_map(|sockets| sockets.iter().filter_map(|s| s.plug_hash));

        items.chain(plugs).collect()
    }
}
