//! Account state shaper.
//!
//! Turns the raw item feed into the classified [`AccountSnapshot`] the
//! resolvers read: per-character equipped/unequipped lists, the vault,
//! and plug state per instance.

use loadout_domain::{
    AccountSnapshot, CharacterInventory, ClassifiedItem, InstanceId, ItemCatalog, ItemHash,
    PlugState, RawInventory, RawItem,
};
use tracing::debug;

use crate::classifier::classify;

/// Shape a raw feed. Feed order is preserved everywhere.
pub fn shape_account(raw: &RawInventory, catalog: &dyn ItemCatalog) -> AccountSnapshot {
    let characters = raw
        .characters
        .iter()
        .map(|c| CharacterInventory {
            character_id: c.character_id.clone(),
            equipped: classify_all(&c.equipped, catalog),
            unequipped: classify_all(&c.inventory, catalog),
        })
        .collect();

    let plug_state: PlugState = raw
        .sockets
        .iter()
        .filter(|(instance, _)| !instance.trim().is_empty())
        .map(|(instance, sockets)| {
            let plugs: Vec<Option<ItemHash>> =
                sockets.iter().map(|s| s.plug_hash.filter(|p| !p.is_zero())).collect();
            (InstanceId::new(instance.as_str()), plugs)
        })
        .collect();

    let snapshot = AccountSnapshot {
        characters,
        vault: classify_all(&raw.vault, catalog),
        plug_state,
    };

    debug!(
        characters = snapshot.characters.len(),
        vault = snapshot.vault.len(),
        socketed = snapshot.plug_state.len(),
        "Account snapshot shaped"
    );

    snapshot
}

fn classify_all(items: &[RawItem], catalog: &dyn ItemCatalog) -> Vec<ClassifiedItem> {
    items.iter().map(|i| classify(i.item_ref(), catalog)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_domain::{ItemBucket, RawCharacter, RawSocket};
    use loadout_testkit::{
        catalog_for, character, exotic_weapon, raw_inventory_from, subclass, weapon,
        SnapshotBuilder,
    };
    use std::collections::HashMap;

    #[test]
    fn test_shape_round_trips_fixture() {
        let expected = SnapshotBuilder::new()
            .equipped("C1", weapon(100, "abc", ItemBucket::Kinetic))
            .equipped("C1", subclass(10, "sub"))
            .unequipped("C1", exotic_weapon(300, "ghi", ItemBucket::Energy))
            .unequipped("C2", weapon(200, "def", ItemBucket::Kinetic))
            .vault(weapon(400, "vlt", ItemBucket::Power))
            .plugs("abc", &[Some(7), None, Some(9)])
            .build();

        let shaped = shape_account(&raw_inventory_from(&expected), &catalog_for(&expected));

        assert_eq!(shaped, expected);
    }

    #[test]
    fn test_shape_drops_blank_instances_and_zero_plugs() {
        let mut sockets = HashMap::new();
        sockets.insert(
            "abc".to_string(),
            vec![
                RawSocket { plug_hash: Some(ItemHash::new(0)) },
                RawSocket { plug_hash: Some(ItemHash::new(5)) },
            ],
        );
        sockets.insert(" ".to_string(), vec![RawSocket::default()]);

        let raw = RawInventory {
            characters: vec![RawCharacter {
                character_id: character("C1"),
                equipped: Vec::new(),
                inventory: Vec::new(),
            }],
            vault: Vec::new(),
            sockets,
        };

        let shaped = shape_account(&raw, &loadout_domain::DefinitionCatalog::new());

        assert_eq!(shaped.plug_state.len(), 1);
        let abc = InstanceId::new("abc");
        assert_eq!(shaped.plug_at(&abc, 0), None);
        assert_eq!(shaped.plug_at(&abc, 1), Some(ItemHash::new(5)));
    }
}
