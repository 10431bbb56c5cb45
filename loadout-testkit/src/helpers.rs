//! Fixture builders for snapshots, catalogs and raw feeds.

use loadout_domain::{
    AccountSnapshot, CharacterId, CharacterInventory, ClassifiedItem, DefinitionCatalog,
    InstanceId, ItemBucket, ItemDefinition, ItemHash, ItemRef, RawCharacter,
    RawInventory, RawItem, RawSocket, EXOTIC_TIER_TYPE,
};

/// Default customizable socket layout given to fixture definitions.
///
/// Relative index `n` maps to absolute position `FIXTURE_SOCKET_LAYOUT[n]`.
pub const FIXTURE_SOCKET_LAYOUT: [u32; 4] = [0, 2, 3, 6];

/// Parse a character id, panicking on blank input (tests only).
pub fn character(id: &str) -> CharacterId {
    CharacterId::new(id).expect("fixture character id must be non-empty")
}

/// Build a classified item directly.
pub fn item(hash: u32, instance: &str, bucket: ItemBucket, is_exotic: bool) -> ClassifiedItem {
    ClassifiedItem {
        item: ItemRef::new(hash, instance),
        item_type: bucket.item_type(),
        bucket,
        is_exotic,
    }
}

/// Legendary weapon in `bucket`.
pub fn weapon(hash: u32, instance: &str, bucket: ItemBucket) -> ClassifiedItem {
    item(hash, instance, bucket, false)
}

/// Exotic weapon in `bucket`.
pub fn exotic_weapon(hash: u32, instance: &str, bucket: ItemBucket) -> ClassifiedItem {
    item(hash, instance, bucket, true)
}

/// Legendary armor piece in `bucket`.
pub fn armor(hash: u32, instance: &str, bucket: ItemBucket) -> ClassifiedItem {
    item(hash, instance, bucket, false)
}

/// Exotic armor piece in `bucket`.
pub fn exotic_armor(hash: u32, instance: &str, bucket: ItemBucket) -> ClassifiedItem {
    item(hash, instance, bucket, true)
}

/// Subclass item.
pub fn subclass(hash: u32, instance: &str) -> ClassifiedItem {
    item(hash, instance, ItemBucket::Subclass, false)
}

/// Definition matching a classified item, with the fixture socket layout.
pub fn definition_for(classified: &ClassifiedItem) -> ItemDefinition {
    ItemDefinition {
        item_hash: classified.item.item_hash,
        display_name: format!("Item {}", classified.item.item_hash),
        bucket_hash: classified.bucket.bucket_hash().unwrap_or(0),
        tier_type: if classified.is_exotic { EXOTIC_TIER_TYPE } else { 5 },
        socket_indexes: FIXTURE_SOCKET_LAYOUT.to_vec(),
    }
}

/// Definition for a plug hash (plugs have no bucket or sockets).
pub fn plug_definition(hash: u32, name: &str) -> ItemDefinition {
    ItemDefinition {
        item_hash: ItemHash::new(hash),
        display_name: name.to_string(),
        bucket_hash: 0,
        tier_type: 0,
        socket_indexes: Vec::new(),
    }
}

/// Catalog holding a definition for every item in the snapshot.
pub fn catalog_for(snapshot: &AccountSnapshot) -> DefinitionCatalog {
    snapshot
        .characters
        .iter()
        .flat_map(|c| c.equipped.iter().chain(c.unequipped.iter()))
        .chain(snapshot.vault.iter())
        .map(definition_for)
        .collect()
}

/// Raw feed that shapes back into `snapshot` when paired with
/// [`catalog_for`].
pub fn raw_inventory_from(snapshot: &AccountSnapshot) -> RawInventory {
    let raw = |c: &ClassifiedItem| RawItem {
        item_hash: c.item.item_hash,
        item_instance_id: if c.item.instance_id.is_empty() {
            None
        } else {
            Some(c.item.instance_id.to_string())
        },
    };

    RawInventory {
        characters: snapshot
            .characters
            .iter()
            .map(|c| RawCharacter {
                character_id: c.character_id.clone(),
                equipped: c.equipped.iter().map(raw).collect(),
                inventory: c.unequipped.iter().map(raw).collect(),
            })
            .collect(),
        vault: snapshot.vault.iter().map(raw).collect(),
        sockets: snapshot
            .plug_state
            .iter()
            .map(|(instance, plugs)| {
                let sockets = plugs.iter().map(|p| RawSocket { plug_hash: *p }).collect();
                (instance.to_string(), sockets)
            })
            .collect(),
    }
}

/// Fluent builder for [`AccountSnapshot`] fixtures.
///
/// Characters are created on first mention and keep mention order.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: AccountSnapshot,
}

impl SnapshotBuilder {
    /// Start an empty account.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a character exists.
    pub fn character(mut self, id: &str) -> Self {
        self.inventory(id);
        self
    }

    /// Put an item in a character's equipped slots.
    pub fn equipped(mut self, id: &str, item: ClassifiedItem) -> Self {
        self.inventory(id).equipped.push(item);
        self
    }

    /// Put an item in a character's unequipped inventory.
    pub fn unequipped(mut self, id: &str, item: ClassifiedItem) -> Self {
        self.inventory(id).unequipped.push(item);
        self
    }

    /// Put an item in the vault.
    pub fn vault(mut self, item: ClassifiedItem) -> Self {
        self.snapshot.vault.push(item);
        self
    }

    /// Set the plugs of an instance by absolute socket position.
    pub fn plugs(mut self, instance: &str, plugs: &[Option<u32>]) -> Self {
        let plugs = plugs.iter().map(|p| p.map(ItemHash::new)).collect();
        self.snapshot.plug_state.insert(InstanceId::new(instance), plugs);
        self
    }

    /// Finish.
    pub fn build(self) -> AccountSnapshot {
        self.snapshot
    }

    fn inventory(&mut self, id: &str) -> &mut CharacterInventory {
        let id = character(id);
        let position = match self.snapshot.characters.iter().position(|c| c.character_id == id) {
            Some(position) => position,
            None => {
                self.snapshot.characters.push(CharacterInventory::new(id));
                self.snapshot.characters.len() - 1
            },
        };
        &mut self.snapshot.characters[position]
    }
}
