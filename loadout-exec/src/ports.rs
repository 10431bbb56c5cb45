//! Execution layer port definitions.
//!
//! Ports define the interfaces for the remote account and the item manifest.
//! Adapters implement these ports for a specific transport (stub, files, HTTP).

use async_trait::async_trait;

use loadout_domain::{CharacterId, InstanceId, ItemDefinition, ItemHash, ItemRef};

use crate::error::ExecError;

// =============================================================================
// Inventory Port
// =============================================================================

/// Port for the four remote inventory mutations.
///
/// Implementations:
/// - `StubInventory` - In-memory simulated account
#[async_trait]
pub trait InventoryPort: Send + Sync {
    /// Move an unequipped item from a character into the vault.
    async fn deposit_to_vault(&self, character: &CharacterId, item: &ItemRef)
        -> Result<(), ExecError>;

    /// Move an item from the vault onto a character.
    async fn withdraw_from_vault(
        &self,
        character: &CharacterId,
        item: &ItemRef,
    ) -> Result<(), ExecError>;

    /// Equip an item the character carries.
    ///
    /// The item previously in that slot drops into the character's
    /// unequipped inventory.
    async fn equip(&self, character: &CharacterId, instance: &InstanceId) -> Result<(), ExecError>;

    /// Insert a plug at an absolute socket position.
    async fn insert_plug(
        &self,
        character: &CharacterId,
        instance: &InstanceId,
        socket_index: u32,
        plug_hash: ItemHash,
    ) -> Result<(), ExecError>;
}

// =============================================================================
// Manifest Port
// =============================================================================

/// Port for item definition lookups.
///
/// Implementations:
/// - `StubManifest` - Fixed in-memory definitions
/// - `ManifestFile` (loadoutctl) - Definitions read from a JSON file
#[async_trait]
pub trait ManifestPort: Send + Sync {
    /// Fetch one definition.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the manifest has no entry for the hash.
    async fn get_item_definition(&self, item_hash: ItemHash)
        -> Result<Option<ItemDefinition>, ExecError>;
}
