//! Item definition catalog.
//!
//! The engine never talks to the manifest directly; it reads definitions
//! through [`ItemCatalog`]. The execution layer fills a
//! [`DefinitionCatalog`] up front so resolution stays synchronous.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::ItemDefinition;
use crate::value_objects::ItemHash;

/// Read-only access to item definitions
pub trait ItemCatalog {
    /// Look up a definition by hash
    fn definition(&self, item_hash: ItemHash) -> Option<&ItemDefinition>;

    /// Display name for a hash, falling back to the hash itself
    fn display_name(&self, item_hash: ItemHash) -> String {
        self.definition(item_hash)
            .map(|d| d.display_name.clone())
            .unwrap_or_else(|| item_hash.to_string())
    }
}

/// In-memory catalog keyed by item hash
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ItemDefinition>", into = "Vec<ItemDefinition>")]
pub struct DefinitionCatalog {
    definitions: HashMap<ItemHash, ItemDefinition>,
}

impl DefinitionCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a definition
    pub fn insert(&mut self, definition: ItemDefinition) {
        self.definitions.insert(definition.item_hash, definition);
    }

    /// Whether a hash is present
    pub fn contains(&self, item_hash: ItemHash) -> bool {
        self.definitions.contains_key(&item_hash)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ItemCatalog for DefinitionCatalog {
    fn definition(&self, item_hash: ItemHash) -> Option<&ItemDefinition> {
        self.definitions.get(&item_hash)
    }
}

impl From<Vec<ItemDefinition>> for DefinitionCatalog {
    fn from(definitions: Vec<ItemDefinition>) -> Self {
        definitions.into_iter().collect()
    }
}

impl From<DefinitionCatalog> for Vec<ItemDefinition> {
    fn from(catalog: DefinitionCatalog) -> Self {
        let mut definitions: Vec<_> = catalog.definitions.into_values().collect();
        definitions.sort_by_key(|d| d.item_hash);
        definitions
    }
}

impl FromIterator<ItemDefinition> for DefinitionCatalog {
    fn from_iter<T: IntoIterator<Item = ItemDefinition>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ghost() -> ItemDefinition {
        ItemDefinition {
            item_hash: ItemHash::new(42),
            display_name: "Ghost Shell".to_string(),
            bucket_hash: 0,
            tier_type: 0,
            socket_indexes: Vec::new(),
        }
    }

    #[test]
    fn test_lookup_and_display_name() {
        let catalog: DefinitionCatalog = vec![ghost()].into();

        assert!(catalog.contains(ItemHash::new(42)));
        assert_eq!(catalog.display_name(ItemHash::new(42)), "Ghost Shell");
        assert_eq!(catalog.display_name(ItemHash::new(7)), "7");
    }

    #[test]
    fn test_catalog_json_is_a_definition_list() {
        let json = r#"[{"item_hash": 42, "display_name": "Ghost Shell", "bucket_hash": 0}]"#;
        let catalog: DefinitionCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 1);

        let back = serde_json::to_value(&catalog).unwrap();
        assert_eq!(back[0]["display_name"], "Ghost Shell");
    }
}
