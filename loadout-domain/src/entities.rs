//! Item entities for the loadout domain
//!
//! Definitions come from the metadata oracle; classified items are the
//! immutable view every resolver works with.

use crate::value_objects::{ItemHash, ItemRef};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Well-known identifiers
// =============================================================================

/// Bucket hashes published by the game's item manifest.
pub mod bucket_hashes {
    /// Kinetic weapon slot
    pub const KINETIC: u32 = 1_498_876_634;
    /// Energy weapon slot
    pub const ENERGY: u32 = 2_465_295_065;
    /// Power weapon slot
    pub const POWER: u32 = 953_998_645;
    /// Helmet slot
    pub const HELMET: u32 = 3_448_274_439;
    /// Gauntlets slot
    pub const GAUNTLETS: u32 = 3_551_918_588;
    /// Chest armor slot
    pub const CHEST: u32 = 14_239_492;
    /// Leg armor slot
    pub const LEGS: u32 = 20_886_954;
    /// Class item slot
    pub const CLASS_ITEM: u32 = 1_585_787_867;
    /// Subclass slot
    pub const SUBCLASS: u32 = 3_284_755_031;
}

/// Tier type value that marks an exotic definition.
pub const EXOTIC_TIER_TYPE: u32 = 6;

// =============================================================================
// ItemType / ItemBucket
// =============================================================================

/// Coarse item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Subclass configuration
    Subclass,
    /// Any weapon
    Weapon,
    /// Any armor piece
    Armor,
    /// Everything else
    Other,
}

/// Equipment slot an item occupies when equipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemBucket {
    /// Kinetic weapon
    Kinetic,
    /// Energy weapon
    Energy,
    /// Power weapon
    Power,
    /// Helmet
    Helmet,
    /// Gauntlets
    Gauntlets,
    /// Chest armor
    Chest,
    /// Leg armor
    Legs,
    /// Class item
    ClassItem,
    /// Subclass
    Subclass,
    /// Not an equipment slot the engine manages
    Other,
}

impl ItemBucket {
    /// Map a manifest bucket hash to the fixed enumeration
    pub fn from_bucket_hash(hash: u32) -> Self {
        match hash {
            bucket_hashes::KINETIC => Self::Kinetic,
            bucket_hashes::ENERGY => Self::Energy,
            bucket_hashes::POWER => Self::Power,
            bucket_hashes::HELMET => Self::Helmet,
            bucket_hashes::GAUNTLETS => Self::Gauntlets,
            bucket_hashes::CHEST => Self::Chest,
            bucket_hashes::LEGS => Self::Legs,
            bucket_hashes::CLASS_ITEM => Self::ClassItem,
            bucket_hashes::SUBCLASS => Self::Subclass,
            _ => Self::Other,
        }
    }

    /// Manifest bucket hash for this slot (`None` for `Other`)
    pub fn bucket_hash(&self) -> Option<u32> {
        match self {
            Self::Kinetic => Some(bucket_hashes::KINETIC),
            Self::Energy => Some(bucket_hashes::ENERGY),
            Self::Power => Some(bucket_hashes::POWER),
            Self::Helmet => Some(bucket_hashes::HELMET),
            Self::Gauntlets => Some(bucket_hashes::GAUNTLETS),
            Self::Chest => Some(bucket_hashes::CHEST),
            Self::Legs => Some(bucket_hashes::LEGS),
            Self::ClassItem => Some(bucket_hashes::CLASS_ITEM),
            Self::Subclass => Some(bucket_hashes::SUBCLASS),
            Self::Other => None,
        }
    }

    /// Item category implied by the slot
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Kinetic | Self::Energy | Self::Power => ItemType::Weapon,
            Self::Helmet | Self::Gauntlets | Self::Chest | Self::Legs | Self::ClassItem => {
                ItemType::Armor
            },
            Self::Subclass => ItemType::Subclass,
            Self::Other => ItemType::Other,
        }
    }
}

impl fmt::Display for ItemBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Kinetic => "kinetic",
            Self::Energy => "energy",
            Self::Power => "power",
            Self::Helmet => "helmet",
            Self::Gauntlets => "gauntlets",
            Self::Chest => "chest",
            Self::Legs => "legs",
            Self::ClassItem => "class item",
            Self::Subclass => "subclass",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// ItemDefinition
// =============================================================================

/// Read-only metadata for one item hash, as served by the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Definition hash
    pub item_hash: ItemHash,
    /// Human readable name
    pub display_name: String,
    /// Manifest bucket hash
    pub bucket_hash: u32,
    /// Manifest tier type (6 = exotic)
    #[serde(default)]
    pub tier_type: u32,
    /// Absolute socket positions of the customizable sockets, in display order.
    ///
    /// The loadout format addresses sockets by position in this list.
    #[serde(default)]
    pub socket_indexes: Vec<u32>,
}

impl ItemDefinition {
    /// Whether the definition is exotic tier
    pub fn is_exotic(&self) -> bool {
        self.tier_type == EXOTIC_TIER_TYPE
    }

    /// Slot the definition occupies
    pub fn bucket(&self) -> ItemBucket {
        ItemBucket::from_bucket_hash(self.bucket_hash)
    }

    /// Absolute socket position for a category-relative index
    pub fn absolute_socket_index(&self, relative: u32) -> Option<u32> {
        self.socket_indexes.get(relative as usize).copied()
    }
}

// =============================================================================
// ClassifiedItem
// =============================================================================

/// An item reference plus the classification derived from its definition.
///
/// Built once by the classifier; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    /// Which item
    pub item: ItemRef,
    /// Coarse category
    pub item_type: ItemType,
    /// Slot it equips into
    pub bucket: ItemBucket,
    /// Exotic tier flag
    pub is_exotic: bool,
}

impl ClassifiedItem {
    /// Classify from a definition
    pub fn from_definition(item: ItemRef, definition: &ItemDefinition) -> Self {
        let bucket = definition.bucket();
        Self {
            item,
            item_type: bucket.item_type(),
            bucket,
            is_exotic: definition.is_exotic(),
        }
    }

    /// Classification used when the manifest has no definition
    pub fn unclassified(item: ItemRef) -> Self {
        Self {
            item,
            item_type: ItemType::Other,
            bucket: ItemBucket::Other,
            is_exotic: false,
        }
    }

    /// Whether both items compete for the same equipment slot
    pub fn shares_slot_with(&self, other: &ClassifiedItem) -> bool {
        self.item_type == other.item_type && self.bucket == other.bucket
    }

    /// Whether this item is subject to the one-exotic rule
    pub fn is_constrained_exotic(&self) -> bool {
        self.is_exotic && matches!(self.item_type, ItemType::Weapon | ItemType::Armor)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(bucket_hash: u32, tier_type: u32) -> ItemDefinition {
        ItemDefinition {
            item_hash: ItemHash::new(300),
            display_name: "Test Item".to_string(),
            bucket_hash,
            tier_type,
            socket_indexes: vec![2, 5, 7],
        }
    }

    #[test]
    fn test_bucket_mapping_round_trips() {
        for bucket in [
            ItemBucket::Kinetic,
            ItemBucket::Energy,
            ItemBucket::Power,
            ItemBucket::Helmet,
            ItemBucket::Gauntlets,
            ItemBucket::Chest,
            ItemBucket::Legs,
            ItemBucket::ClassItem,
            ItemBucket::Subclass,
        ] {
            let hash = bucket.bucket_hash().unwrap();
            assert_eq!(ItemBucket::from_bucket_hash(hash), bucket);
        }
        assert_eq!(ItemBucket::from_bucket_hash(1), ItemBucket::Other);
    }

    #[test]
    fn test_bucket_item_type() {
        assert_eq!(ItemBucket::Power.item_type(), ItemType::Weapon);
        assert_eq!(ItemBucket::ClassItem.item_type(), ItemType::Armor);
        assert_eq!(ItemBucket::Subclass.item_type(), ItemType::Subclass);
        assert_eq!(ItemBucket::Other.item_type(), ItemType::Other);
    }

    #[test]
    fn test_classify_exotic_weapon() {
        let item = ClassifiedItem::from_definition(
            ItemRef::new(300, "ghi"),
            &definition(bucket_hashes::ENERGY, EXOTIC_TIER_TYPE),
        );

        assert_eq!(item.item_type, ItemType::Weapon);
        assert_eq!(item.bucket, ItemBucket::Energy);
        assert!(item.is_exotic);
        assert!(item.is_constrained_exotic());
    }

    #[test]
    fn test_exotic_subclass_is_not_constrained() {
        let item = ClassifiedItem::from_definition(
            ItemRef::new(1, "sub"),
            &definition(bucket_hashes::SUBCLASS, EXOTIC_TIER_TYPE),
        );
        assert!(!item.is_constrained_exotic());
    }

    #[test]
    fn test_absolute_socket_index() {
        let def = definition(bucket_hashes::HELMET, 5);
        assert_eq!(def.absolute_socket_index(0), Some(2));
        assert_eq!(def.absolute_socket_index(2), Some(7));
        assert_eq!(def.absolute_socket_index(3), None);
    }

    #[test]
    fn test_definition_deserializes_with_defaults() {
        let json = r#"{"item_hash": 42, "display_name": "Ghost", "bucket_hash": 1}"#;
        let def: ItemDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.tier_type, 0);
        assert!(def.socket_indexes.is_empty());
        assert_eq!(def.bucket(), ItemBucket::Other);
    }
}
