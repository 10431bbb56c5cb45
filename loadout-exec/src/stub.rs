//! Stub implementations for testing and offline rehearsal.
//!
//! These implementations simulate the remote account and the manifest
//! without making real API calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use loadout_domain::{
    AccountSnapshot, CharacterId, CharacterInventory, ClassifiedItem, InstanceId, ItemBucket,
    ItemDefinition, ItemHash, ItemRef,
};

use crate::error::ExecError;
use crate::ports::{InventoryPort, ManifestPort};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Check-and-reset a failure flag.
fn take_flag(flag: &RwLock<bool>) -> bool {
    std::mem::take(&mut *write(flag))
}

// =============================================================================
// Stub Inventory
// =============================================================================

/// A call received by [`StubInventory`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubCall {
    /// `deposit_to_vault`
    Deposit {
        /// Character
        character: CharacterId,
        /// Item
        item: ItemRef,
    },
    /// `withdraw_from_vault`
    Withdraw {
        /// Character
        character: CharacterId,
        /// Item
        item: ItemRef,
    },
    /// `equip`
    Equip {
        /// Character
        character: CharacterId,
        /// Instance
        instance: InstanceId,
    },
    /// `insert_plug`
    InsertPlug {
        /// Character
        character: CharacterId,
        /// Instance
        instance: InstanceId,
        /// Absolute socket position
        socket_index: u32,
        /// Plug
        plug_hash: ItemHash,
    },
}

/// Simulated account.
///
/// Seeded from a snapshot and mutated by every successful call, enforcing
/// the same preconditions the game does:
/// - deposits take an unequipped item from the named character
/// - withdrawals take an item from the vault
/// - equips need the item on the character; the slot's previous item drops
///   into unequipped inventory
/// - at most one equipped exotic weapon and one exotic armor piece
pub struct StubInventory {
    /// Current account state
    state: RwLock<AccountSnapshot>,
    /// Calls received, including failed ones
    calls: RwLock<Vec<StubCall>>,
    /// Whether to simulate a transport failure on the next call
    fail_next: RwLock<bool>,
}

impl StubInventory {
    /// Create a simulated account from a snapshot.
    pub fn new(snapshot: AccountSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
            calls: RwLock::new(Vec::new()),
            fail_next: RwLock::new(false),
        }
    }

    /// Current state of the simulated account.
    pub fn snapshot(&self) -> AccountSnapshot {
        read(&self.state).clone()
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<StubCall> {
        read(&self.calls).clone()
    }

    /// Configure the next call to fail.
    pub fn set_fail_next(&self, fail: bool) {
        *write(&self.fail_next) = fail;
    }

    fn record(&self, call: StubCall) -> Result<(), ExecError> {
        write(&self.calls).push(call);
        if take_flag(&self.fail_next) {
            return Err(ExecError::Transport("Simulated transport failure".to_string()));
        }
        Ok(())
    }
}

fn character_mut<'a>(
    state: &'a mut AccountSnapshot,
    id: &CharacterId,
) -> Result<&'a mut CharacterInventory, ExecError> {
    state
        .characters
        .iter_mut()
        .find(|c| &c.character_id == id)
        .ok_or_else(|| ExecError::Rejected(format!("Unknown character {}", id)))
}

fn take(items: &mut Vec<ClassifiedItem>, item: &ItemRef) -> Option<ClassifiedItem> {
    let position = items.iter().position(|c| c.item.same_item(item))?;
    Some(items.remove(position))
}

#[async_trait]
impl InventoryPort for StubInventory {
    async fn deposit_to_vault(
        &self,
        character: &CharacterId,
        item: &ItemRef,
    ) -> Result<(), ExecError> {
        self.record(StubCall::Deposit {
            character: character.clone(),
            item: item.clone(),
        })?;

        let mut state = write(&self.state);
        let inventory = character_mut(&mut state, character)?;
        let moved = take(&mut inventory.unequipped, item).ok_or_else(|| {
            ExecError::Rejected(format!("{} is not unequipped on {}", item, character))
        })?;
        state.vault.push(moved);

        tracing::debug!(%character, %item, "Stub: deposited");
        Ok(())
    }

    async fn withdraw_from_vault(
        &self,
        character: &CharacterId,
        item: &ItemRef,
    ) -> Result<(), ExecError> {
        self.record(StubCall::Withdraw {
            character: character.clone(),
            item: item.clone(),
        })?;

        let mut state = write(&self.state);
        character_mut(&mut state, character)?;
        let moved = take(&mut state.vault, item)
            .ok_or_else(|| ExecError::Rejected(format!("{} is not in the vault", item)))?;
        character_mut(&mut state, character)?.unequipped.push(moved);

        tracing::debug!(%character, %item, "Stub: withdrawn");
        Ok(())
    }

    async fn equip(&self, character: &CharacterId, instance: &InstanceId) -> Result<(), ExecError> {
        self.record(StubCall::Equip {
            character: character.clone(),
            instance: instance.clone(),
        })?;

        let mut state = write(&self.state);
        let inventory = character_mut(&mut state, character)?;

        if instance.is_empty() {
            return Err(ExecError::Rejected("Cannot equip an item without an instance".to_string()));
        }
        if inventory.equipped.iter().any(|c| &c.item.instance_id == instance) {
            return Ok(());
        }

        let position = inventory
            .unequipped
            .iter()
            .position(|c| &c.item.instance_id == instance)
            .ok_or_else(|| {
                ExecError::Rejected(format!("Instance {} is not on {}", instance, character))
            })?;
        let incoming = &inventory.unequipped[position];

        if incoming.is_constrained_exotic() {
            let conflict = inventory.equipped.iter().find(|c| {
                c.is_constrained_exotic()
                    && c.item_type == incoming.item_type
                    && c.bucket != incoming.bucket
            });
            if let Some(conflict) = conflict {
                return Err(ExecError::Rejected(format!(
                    "Exotic {} already equipped in {}",
                    conflict.item, conflict.bucket
                )));
            }
        }

        let incoming = inventory.unequipped.remove(position);
        if incoming.bucket != ItemBucket::Other {
            if let Some(p) = inventory.equipped.iter().position(|c| c.bucket == incoming.bucket) {
                let displaced = inventory.equipped.remove(p);
                inventory.unequipped.push(displaced);
            }
        }
        inventory.equipped.push(incoming);

        tracing::debug!(%character, %instance, "Stub: equipped");
        Ok(())
    }

    async fn insert_plug(
        &self,
        character: &CharacterId,
        instance: &InstanceId,
        socket_index: u32,
        plug_hash: ItemHash,
    ) -> Result<(), ExecError> {
        self.record(StubCall::InsertPlug {
            character: character.clone(),
            instance: instance.clone(),
            socket_index,
            plug_hash,
        })?;

        let mut state = write(&self.state);
        let inventory = character_mut(&mut state, character)?;
        let held = inventory
            .equipped
            .iter()
            .chain(inventory.unequipped.iter())
            .any(|c| &c.item.instance_id == instance);
        if instance.is_empty() || !held {
            return Err(ExecError::Rejected(format!(
                "Instance {} is not on {}",
                instance, character
            )));
        }

        let plugs = state.plug_state.entry(instance.clone()).or_default();
        let position = socket_index as usize;
        if plugs.len() <= position {
            plugs.resize(position + 1, None);
        }
        plugs[position] = Some(plug_hash);

        tracing::debug!(%character, %instance, socket_index, plug = %plug_hash, "Stub: plug inserted");
        Ok(())
    }
}

// =============================================================================
// Stub Manifest
// =============================================================================

/// Stub manifest serving fixed definitions.
pub struct StubManifest {
    /// Definitions by hash
    definitions: RwLock<HashMap<ItemHash, ItemDefinition>>,
    /// Number of lookups served
    lookups: RwLock<usize>,
    /// Whether to simulate a failure on the next lookup
    fail_next: RwLock<bool>,
}

impl StubManifest {
    /// Create a manifest over the given definitions.
    pub fn new(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        Self {
            definitions: RwLock::new(
                definitions.into_iter().map(|d| (d.item_hash, d)).collect(),
            ),
            lookups: RwLock::new(0),
            fail_next: RwLock::new(false),
        }
    }

    /// Add or replace a definition.
    pub fn insert(&self, definition: ItemDefinition) {
        write(&self.definitions).insert(definition.item_hash, definition);
    }

    /// Number of lookups served so far.
    pub fn lookups(&self) -> usize {
        *read(&self.lookups)
    }

    /// Configure the next lookup to fail.
    pub fn set_fail_next(&self, fail: bool) {
        *write(&self.fail_next) = fail;
    }
}

#[async_trait]
impl ManifestPort for StubManifest {
    async fn get_item_definition(
        &self,
        item_hash: ItemHash,
    ) -> Result<Option<ItemDefinition>, ExecError> {
        *write(&self.lookups) += 1;
        if take_flag(&self.fail_next) {
            return Err(ExecError::Manifest("Simulated manifest failure".to_string()));
        }
        Ok(read(&self.definitions).get(&item_hash).cloned())
    }
}

// =============================================================================
// Tests
// =============================================================================
