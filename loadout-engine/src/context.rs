//! Shared inputs for one resolution pass.

use loadout_domain::{
    AccountSnapshot, CharacterId, CharacterInventory, ClassifiedItem, Container, ItemCatalog,
    ItemRef, LoadoutAction,
};

use crate::error::{EngineError, EngineResult};

/// Read-only view every resolver works against.
pub struct ResolveContext<'a> {
    /// Point-in-time account state
    pub snapshot: &'a AccountSnapshot,
    /// Character the loadout is applied to
    pub character: &'a CharacterId,
    /// That character's items
    pub active: &'a CharacterInventory,
    /// Item definitions
    pub catalog: &'a dyn ItemCatalog,
}

impl<'a> ResolveContext<'a> {
    /// Bind a snapshot to the active character.
    ///
    /// # Errors
    /// `EngineError::UnknownCharacter` if the character is not in the snapshot.
    pub fn new(
        snapshot: &'a AccountSnapshot,
        character: &'a CharacterId,
        catalog: &'a dyn ItemCatalog,
    ) -> EngineResult<Self> {
        let active = snapshot
            .character(character)
            .ok_or_else(|| EngineError::UnknownCharacter(character.clone()))?;

        Ok(Self {
            snapshot,
            character,
            active,
            catalog,
        })
    }

    /// Locate an item or fail naming it.
    pub fn locate(&self, item: &ItemRef) -> EngineResult<(ClassifiedItem, Container)> {
        self.snapshot
            .locate(item)
            .ok_or_else(|| EngineError::ItemNotFound(item.clone()))
    }

    /// Equip action on the active character
    pub fn equip(&self, item: &ItemRef) -> LoadoutAction {
        LoadoutAction::Equip {
            character: self.character.clone(),
            item: item.clone(),
        }
    }

    /// Withdraw action onto the active character
    pub fn withdraw(&self, item: &ItemRef) -> LoadoutAction {
        LoadoutAction::Withdraw {
            character: self.character.clone(),
            item: item.clone(),
        }
    }
}

/// Items the plan has already brought onto the active character.
///
/// Keeps the transfer and de-exotic resolvers from emitting the same
/// moves twice.
#[derive(Debug, Default)]
pub struct Placed {
    items: Vec<ItemRef>,
}

impl Placed {
    /// Nothing placed yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the plan already moved this item
    pub fn contains(&self, item: &ItemRef) -> bool {
        self.items.iter().any(|placed| placed.same_item(item))
    }

    /// Record a placement
    pub fn mark(&mut self, item: &ItemRef) {
        if !self.contains(item) {
            self.items.push(item.clone());
        }
    }
}
