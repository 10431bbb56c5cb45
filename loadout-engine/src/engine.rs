//! Engine facade: snapshot in, plan out.

use std::fmt;

use loadout_domain::{
    codec, AccountSnapshot, CharacterId, ClassifiedItem, DefinitionCatalog, ItemCatalog,
    ItemType, LoadoutSpec, PlannedAction, RawInventory, SocketAssignment,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::context::{Placed, ResolveContext};
use crate::de_exotic::resolve_de_exotic;
use crate::equip::resolve_equips;
use crate::error::{EngineError, EngineResult};
use crate::shaper::shape_account;
use crate::socket::resolve_sockets;
use crate::transfer::resolve_transfers;

// =============================================================================
// Plan
// =============================================================================

/// Ordered actions that bring one character in line with a loadout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Loadout name
    pub loadout: String,
    /// Active character
    pub character: CharacterId,
    /// De-exotic swaps, transfers, equips, then sockets
    pub actions: Vec<PlannedAction>,
}

impl Plan {
    /// Whether every action is already satisfied
    pub fn is_satisfied(&self) -> bool {
        self.actions.iter().all(|a| a.skip)
    }

    /// Actions that still have to run
    pub fn pending(&self) -> impl Iterator<Item = &PlannedAction> {
        self.actions.iter().filter(|a| !a.skip)
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the plan has no actions
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plan '{}' for {}", self.loadout, self.character)?;
        for (i, action) in self.actions.iter().enumerate() {
            writeln!(f, "  {:>2}. {}", i + 1, action)?;
        }
        Ok(())
    }
}

/// What [`Engine::export`] captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Name written on the `LOADOUT` line
    pub name: String,
    /// Also list unequipped weapons and armor as `EXTRA`
    pub include_unequipped: bool,
}

// =============================================================================
// Engine
// =============================================================================

/// Loadout resolution engine.
///
/// Holds the definitions for one run. Every method is synchronous and pure.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    catalog: DefinitionCatalog,
}

impl Engine {
    /// Create an engine over prefetched definitions
    pub fn new(catalog: DefinitionCatalog) -> Self {
        Self { catalog }
    }

    /// Definitions in use
    pub fn catalog(&self) -> &DefinitionCatalog {
        &self.catalog
    }

    /// Classify a raw feed into a snapshot
    pub fn shape(&self, raw: &RawInventory) -> AccountSnapshot {
        shape_account(raw, &self.catalog)
    }

    /// Resolve a loadout against a snapshot.
    ///
    /// # Errors
    /// Any [`EngineError`]; nothing has been mutated when one is returned.
    pub fn resolve(
        &self,
        spec: &LoadoutSpec,
        snapshot: &AccountSnapshot,
        character: &CharacterId,
    ) -> EngineResult<Plan> {
        let ctx = ResolveContext::new(snapshot, character, &self.catalog)?;
        let mut placed = Placed::new();

        let mut actions = resolve_de_exotic(&ctx, spec, &mut placed)?;
        actions.extend(resolve_transfers(&ctx, spec, &mut placed)?);
        actions.extend(resolve_equips(&ctx, spec)?);
        actions.extend(resolve_sockets(&ctx, spec)?);

        let plan = Plan {
            loadout: spec.name.clone(),
            character: character.clone(),
            actions,
        };

        info!(
            loadout = %plan.loadout,
            character = %character,
            actions = plan.len(),
            pending = plan.pending().count(),
            "Loadout resolved"
        );

        Ok(plan)
    }

    /// Capture a character's current gear as a loadout.
    ///
    /// Equipped subclass, weapons and armor become `EQUIP` lines, with every
    /// inserted plug as a `SOCKET` assignment.
    ///
    /// # Errors
    /// `EngineError::UnknownCharacter` if the character is not in the snapshot.
    pub fn export(
        &self,
        snapshot: &AccountSnapshot,
        character: &CharacterId,
        options: &ExportOptions,
    ) -> EngineResult<LoadoutSpec> {
        let inventory = snapshot
            .character(character)
            .ok_or_else(|| EngineError::UnknownCharacter(character.clone()))?;

        let mut spec = LoadoutSpec::new(options.name.clone());
        spec.equip = inventory
            .equipped
            .iter()
            .filter(|c| c.item_type != ItemType::Other)
            .map(|c| c.item.clone())
            .collect();

        if options.include_unequipped {
            spec.extra = inventory
                .unequipped
                .iter()
                .filter(|c| matches!(c.item_type, ItemType::Weapon | ItemType::Armor))
                .map(|c| c.item.clone())
                .collect();
        }

        let sockets: Vec<SocketAssignment> = inventory
            .equipped
            .iter()
            .chain(inventory.unequipped.iter())
            .filter(|c| spec.lists(&c.item))
            .flat_map(|c| self.current_plugs(snapshot, c))
            .collect();
        spec.sockets = sockets;

        debug!(
            character = %character,
            equip = spec.equip.len(),
            extra = spec.extra.len(),
            sockets = spec.sockets.len(),
            "Loadout exported"
        );

        Ok(spec)
    }

    /// Render a loadout as text, naming items from the catalog
    pub fn render(&self, spec: &LoadoutSpec) -> String {
        codec::serialize(spec, &self.catalog)
    }

    fn current_plugs(
        &self,
        snapshot: &AccountSnapshot,
        classified: &ClassifiedItem,
    ) -> Vec<SocketAssignment> {
        let Some(definition) = self.catalog.definition(classified.item.item_hash) else {
            return Vec::new();
        };

        (0u32..)
            .zip(definition.socket_indexes.iter())
            .filter_map(|(relative, absolute)| {
                snapshot
                    .plug_at(&classified.item.instance_id, *absolute)
                    .map(|plug_hash| SocketAssignment {
                        item: classified.item.clone(),
                        socket_index: relative,
                        plug_hash,
                    })
            })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_domain::{ItemBucket, ItemHash, ItemRef, LoadoutAction};
    use loadout_testkit::{
        armor, catalog_for, character, exotic_weapon, plug_definition, subclass, weapon,
        SnapshotBuilder,
    };

    fn c1() -> CharacterId {
        character("C1")
    }

    #[test]
    fn test_scenario_a_equipped_item_plans_skip() {
        let snapshot = SnapshotBuilder::new()
            .equipped("C1", weapon(100, "abc", ItemBucket::Kinetic))
            .build();
        let engine = Engine::new(catalog_for(&snapshot));
        let spec = codec::parse("EQUIP // 100:abc // Gun", "A").unwrap();

        let plan = engine.resolve(&spec, &snapshot, &c1()).unwrap();

        assert_eq!(
            plan.actions,
            vec![PlannedAction::satisfied(LoadoutAction::Equip {
                character: c1(),
                item: ItemRef::new(100, "abc"),
            })]
        );
        assert!(plan.is_satisfied());
    }

    #[test]
    fn test_scenario_b_transfer_then_equip() {
        let snapshot = SnapshotBuilder::new()
            .character("C1")
            .unequipped("C2", weapon(200, "def", ItemBucket::Kinetic))
            .build();
        let engine = Engine::new(catalog_for(&snapshot));
        let spec = codec::parse("EQUIP // 200:def", "B").unwrap();

        let plan = engine.resolve(&spec, &snapshot, &c1()).unwrap();

        let rendered: Vec<String> = plan.actions.iter().map(|a| a.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["Deposit(C2, 200:def)", "Withdraw(C1, 200:def)", "Equip(C1, 200:def)"]
        );
    }

    #[test]
    fn test_scenario_c_replacement_equipped_before_exotic() {
        let snapshot = SnapshotBuilder::new()
            .equipped("C1", exotic_weapon(310, "old", ItemBucket::Energy))
            .unequipped("C1", weapon(301, "jkl", ItemBucket::Energy))
            .unequipped("C2", exotic_weapon(300, "ghi", ItemBucket::Energy))
            .build();
        let engine = Engine::new(catalog_for(&snapshot));
        let spec = codec::parse("EQUIP // 300:ghi\nEXTRA // 301:jkl", "C").unwrap();

        let plan = engine.resolve(&spec, &snapshot, &c1()).unwrap();

        let rendered: Vec<String> = plan.actions.iter().map(|a| a.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "Equip(C1, 301:jkl)",
                "Deposit(C2, 300:ghi)",
                "Withdraw(C1, 300:ghi)",
                "Equip(C1, 300:ghi)",
            ]
        );
    }

    #[test]
    fn test_scenario_e_socket_already_inserted() {
        let snapshot = SnapshotBuilder::new()
            .equipped("C1", weapon(100, "abc", ItemBucket::Kinetic))
            .plugs("abc", &[Some(11), None, Some(12)])
            .build();
        let engine = Engine::new(catalog_for(&snapshot));
        let spec = codec::parse(
            "LOADOUT // E\nEQUIP // 100:abc\nSOCKET // 100:abc::index:1::plug:12 // Scope",
            "x",
        )
        .unwrap();

        let plan = engine.resolve(&spec, &snapshot, &c1()).unwrap();

        assert_eq!(plan.len(), 2);
        assert!(plan.is_satisfied());
        assert_eq!(
            plan.actions[1].action,
            LoadoutAction::Socket {
                character: c1(),
                item: ItemRef::new(100, "abc"),
                socket_index: 2,
                plug_hash: ItemHash::new(12),
            }
        );
    }

    #[test]
    fn test_plan_serializes_with_tagged_actions() -> anyhow::Result<()> {
        let snapshot = SnapshotBuilder::new()
            .character("C1")
            .vault(weapon(400, "vlt", ItemBucket::Power))
            .build();
        let engine = Engine::new(catalog_for(&snapshot));
        let spec = codec::parse("EQUIP // 400:vlt", "json")?;

        let plan = engine.resolve(&spec, &snapshot, &c1())?;
        let json = serde_json::to_value(&plan)?;

        assert_eq!(json["character"], "C1");
        assert_eq!(json["actions"][0]["action"]["type"], "withdraw");
        assert_eq!(json["actions"][1]["action"]["type"], "equip");
        assert_eq!(json["actions"][1]["skip"], false);
        Ok(())
    }

    #[test]
    fn test_fatal_error_yields_no_plan() {
        let snapshot = SnapshotBuilder::new()
            .character("C1")
            .equipped("C2", weapon(200, "def", ItemBucket::Kinetic))
            .build();
        let engine = Engine::new(catalog_for(&snapshot));
        let spec = codec::parse("EQUIP // 200:def", "x").unwrap();

        let result = engine.resolve(&spec, &snapshot, &c1());

        assert!(matches!(result, Err(EngineError::EquippedElsewhere { .. })));
    }

    #[test]
    fn test_export_resolves_to_satisfied_plan() {
        let snapshot = SnapshotBuilder::new()
            .equipped("C1", subclass(10, "sub"))
            .equipped("C1", weapon(100, "abc", ItemBucket::Kinetic))
            .equipped("C1", armor(500, "hlm", ItemBucket::Helmet))
            .unequipped("C1", weapon(101, "abd", ItemBucket::Energy))
            .plugs("abc", &[Some(11), None, Some(12)])
            .build();
        let mut catalog = catalog_for(&snapshot);
        catalog.insert(plug_definition(11, "Barrel"));
        catalog.insert(plug_definition(12, "Scope"));
        let engine = Engine::new(catalog);
        let options = ExportOptions {
            name: "Current".to_string(),
            include_unequipped: true,
        };

        let exported = engine.export(&snapshot, &c1(), &options).unwrap();
        assert_eq!(exported.equip.len(), 3);
        assert_eq!(exported.extra, vec![ItemRef::new(101, "abd")]);
        assert_eq!(exported.sockets.len(), 2);

        let text = engine.render(&exported);
        assert!(text.contains("SOCKET // 100:abc::index:1::plug:12 // Scope"));

        let reparsed = codec::parse(&text, "fallback").unwrap();
        assert!(reparsed.same_targets(&exported));

        let plan = engine.resolve(&reparsed, &snapshot, &c1()).unwrap();
        assert!(plan.is_satisfied());
    }

    #[test]
    fn test_export_without_unequipped() {
        let snapshot = SnapshotBuilder::new()
            .equipped("C1", weapon(100, "abc", ItemBucket::Kinetic))
            .unequipped("C1", weapon(101, "abd", ItemBucket::Energy))
            .build();
        let engine = Engine::new(catalog_for(&snapshot));
        let options = ExportOptions {
            name: "Equipped".to_string(),
            include_unequipped: false,
        };

        let exported = engine.export(&snapshot, &c1(), &options).unwrap();

        assert_eq!(exported.name, "Equipped");
        assert_eq!(exported.equip, vec![ItemRef::new(100, "abc")]);
        assert!(exported.extra.is_empty());
    }

    #[test]
    fn test_export_unknown_character() {
        let engine = Engine::default();
        let options = ExportOptions {
            name: "x".to_string(),
            include_unequipped: false,
        };

        let err = engine.export(&AccountSnapshot::default(), &c1(), &options).unwrap_err();

        assert_eq!(err, EngineError::UnknownCharacter(c1()));
    }
}
