//! Loadouts and the actions that apply them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{CharacterId, ItemHash, ItemRef};

// =============================================================================
// Loadout Spec
// =============================================================================

/// One plug assignment: insert `plug_hash` into the item's
/// category-relative socket `socket_index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketAssignment {
    /// Item receiving the plug
    pub item: ItemRef,
    /// Category-relative socket index
    pub socket_index: u32,
    /// Plug to insert (never zero)
    pub plug_hash: ItemHash,
}

/// A named target configuration for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutSpec {
    /// Loadout name
    pub name: String,
    /// Items to equip (subclass plus at most one per weapon/armor bucket)
    pub equip: Vec<ItemRef>,
    /// Reserve items, only used as de-exotic substitutes
    pub extra: Vec<ItemRef>,
    /// Plug assignments for items in `equip` or `extra`
    pub sockets: Vec<SocketAssignment>,
}

impl LoadoutSpec {
    /// Create an empty loadout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            equip: Vec::new(),
            extra: Vec::new(),
            sockets: Vec::new(),
        }
    }

    /// Equip items followed by extra items
    pub fn targets(&self) -> impl Iterator<Item = &ItemRef> {
        self.equip.iter().chain(self.extra.iter())
    }

    /// Whether the item is listed in `equip` or `extra`
    pub fn lists(&self, item: &ItemRef) -> bool {
        self.targets().any(|t| t.same_item(item))
    }

    /// Socket assignments for one item, in document order
    pub fn sockets_for<'a>(
        &'a self,
        item: &'a ItemRef,
    ) -> impl Iterator<Item = &'a SocketAssignment> + 'a {
        self.sockets.iter().filter(move |s| s.item.same_item(item))
    }

    /// Every definition hash the loadout mentions (items and plugs)
    pub fn referenced_hashes(&self) -> BTreeSet<ItemHash> {
        self.targets()
            .map(|i| i.item_hash)
            .chain(self.sockets.iter().map(|s| s.plug_hash))
            .collect()
    }

    /// Semantic equality: same equip set, extra set and socket assignments,
    /// regardless of name and ordering.
    pub fn same_targets(&self, other: &LoadoutSpec) -> bool {
        fn set<T: Ord>(items: impl Iterator<Item = T>) -> BTreeSet<T> {
            items.collect()
        }
        let key = |i: &ItemRef| (i.item_hash, i.instance_id.clone());
        let socket_key =
            |s: &SocketAssignment| (key(&s.item), s.socket_index, s.plug_hash);

        set(self.equip.iter().map(key)) == set(other.equip.iter().map(key))
            && set(self.extra.iter().map(key)) == set(other.extra.iter().map(key))
            && set(self.sockets.iter().map(socket_key)) == set(other.sockets.iter().map(socket_key))
    }
}

// =============================================================================
// Loadout Action
// =============================================================================

/// One remote operation in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadoutAction {
    /// Move an unequipped item from a character into the vault
    Deposit {
        /// Character giving up the item
        character: CharacterId,
        /// Item moved
        item: ItemRef,
    },

    /// Move an item from the vault onto a character
    Withdraw {
        /// Character receiving the item
        character: CharacterId,
        /// Item moved
        item: ItemRef,
    },

    /// Equip an item the character carries
    Equip {
        /// Character equipping
        character: CharacterId,
        /// Item equipped
        item: ItemRef,
    },

    /// Insert a plug into an absolute socket position
    Socket {
        /// Character holding the item
        character: CharacterId,
        /// Item receiving the plug
        item: ItemRef,
        /// Absolute socket position
        socket_index: u32,
        /// Plug inserted
        plug_hash: ItemHash,
    },
}

impl LoadoutAction {
    /// Character the action runs against
    pub fn character(&self) -> &CharacterId {
        match self {
            Self::Deposit { character, .. }
            | Self::Withdraw { character, .. }
            | Self::Equip { character, .. }
            | Self::Socket { character, .. } => character,
        }
    }

    /// Item the action touches
    pub fn item(&self) -> &ItemRef {
        match self {
            Self::Deposit { item, .. }
            | Self::Withdraw { item, .. }
            | Self::Equip { item, .. }
            | Self::Socket { item, .. } => item,
        }
    }

    /// Action type name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::Equip { .. } => "equip",
            Self::Socket { .. } => "socket",
        }
    }
}

impl fmt::Display for LoadoutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit { character, item } => write!(f, "Deposit({}, {})", character, item),
            Self::Withdraw { character, item } => write!(f, "Withdraw({}, {})", character, item),
            Self::Equip { character, item } => write!(f, "Equip({}, {})", character, item),
            Self::Socket {
                character,
                item,
                socket_index,
                plug_hash,
            } => write!(f, "Socket({}, {}, #{}, {})", character, item, socket_index, plug_hash),
        }
    }
}

/// An action plus whether the account already satisfies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    /// The operation
    pub action: LoadoutAction,
    /// Already satisfied; the executor must not call the remote
    pub skip: bool,
}

impl PlannedAction {
    /// An action that still has to run
    pub fn pending(action: LoadoutAction) -> Self {
        Self { action, skip: false }
    }

    /// An action the account already satisfies
    pub fn satisfied(action: LoadoutAction) -> Self {
        Self { action, skip: true }
    }
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skip {
            write!(f, "{} [skip]", self.action)
        } else {
            write!(f, "{}", self.action)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
