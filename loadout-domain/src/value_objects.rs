//! Value Objects for the loadout domain
//!
//! Immutable identifiers shared by every layer.
//! Validated constructors enforce invariants; lenient constructors exist
//! only where the loadout text format demands them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Character identifiers must be non-empty
    #[error("Invalid character id: {0}")]
    InvalidCharacterId(String),
}

// =============================================================================
// ItemHash
// =============================================================================

/// Shared type identifier of an item definition (also used for plugs).
///
/// Zero never names a real definition; the text codec uses it as the
/// fallback for malformed numeric fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemHash(u32);

impl ItemHash {
    /// Wrap a raw hash value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw hash value
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Whether this is the zero placeholder hash
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse leniently: anything that is not a `u32` becomes zero
    pub fn parse_lenient(raw: &str) -> Self {
        Self(raw.trim().parse().unwrap_or(0))
    }
}

impl From<u32> for ItemHash {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// InstanceId
// =============================================================================

/// Identifier of one physical item.
///
/// # Invariants
/// - Unique per physical item
/// - Empty for non-instanced items (consumables, currencies)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Create an instance id (whitespace is trimmed)
    pub fn new(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self(value.trim().to_string())
    }

    /// The empty id carried by non-instanced items
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Get the id as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the item is non-instanced
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CharacterId
// =============================================================================

/// Identifier of one character on the account
///
/// # Invariants
/// - Must be non-empty
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterId(String);

impl CharacterId {
    /// Create a character id with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidCharacterId` if the id is blank
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value: String = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidCharacterId("Character id must be non-empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the id as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CharacterId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CharacterId> for String {
    fn from(value: CharacterId) -> Self {
        value.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ItemRef
// =============================================================================

/// Reference to an item: its type hash plus its instance id.
///
/// Displayed (and written in loadout text) as `<hash>:<instance>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    /// Shared type identifier
    pub item_hash: ItemHash,
    /// Physical item identifier (empty for non-instanced items)
    pub instance_id: InstanceId,
}

impl ItemRef {
    /// Create an item reference
    pub fn new(item_hash: impl Into<ItemHash>, instance_id: impl Into<String>) -> Self {
        Self {
            item_hash: item_hash.into(),
            instance_id: InstanceId::new(instance_id),
        }
    }

    /// Parse `<hash>:<instance>` leniently.
    ///
    /// A malformed hash becomes zero and a missing instance becomes empty;
    /// this never fails.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once(':') {
            Some((hash, instance)) => Self {
                item_hash: ItemHash::parse_lenient(hash),
                instance_id: InstanceId::new(instance),
            },
            None => Self {
                item_hash: ItemHash::parse_lenient(raw),
                instance_id: InstanceId::none(),
            },
        }
    }

    /// Whether `other` names the same physical item.
    ///
    /// Instanced items match on hash and instance; non-instanced items
    /// match on hash alone.
    pub fn same_item(&self, other: &ItemRef) -> bool {
        if self.item_hash != other.item_hash {
            return false;
        }
        self.instance_id.is_empty() || self.instance_id == other.instance_id
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_hash, self.instance_id)
    }
}

// =============================================================================
// Tests
// =============================================================================
