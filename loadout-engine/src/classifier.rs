//! Item classifier.
//!
//! Derives `{type, bucket, exotic}` from the item's definition.

use loadout_domain::{ClassifiedItem, ItemCatalog, ItemRef};
use tracing::debug;

/// Classify one item.
///
/// Items the catalog does not know classify as `Other` / non-exotic so
/// that unrelated inventory (consumables, mods) never blocks shaping.
pub fn classify(item: ItemRef, catalog: &dyn ItemCatalog) -> ClassifiedItem {
    match catalog.definition(item.item_hash) {
        Some(definition) => ClassifiedItem::from_definition(item, definition),
        None => {
            debug!(item = %item, "No definition, classifying as other");
            ClassifiedItem::unclassified(item)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_domain::{DefinitionCatalog, ItemBucket, ItemType};
    use loadout_testkit::{definition_for, exotic_armor};

    #[test]
    fn test_classify_from_definition() {
        let helmet = exotic_armor(500, "hlm", ItemBucket::Helmet);
        let catalog: DefinitionCatalog = vec![definition_for(&helmet)].into();

        let classified = classify(ItemRef::new(500, "hlm"), &catalog);

        assert_eq!(classified, helmet);
        assert_eq!(classified.item_type, ItemType::Armor);
        assert!(classified.is_exotic);
    }

    #[test]
    fn test_classify_unknown_hash() {
        let catalog = DefinitionCatalog::new();

        let classified = classify(ItemRef::new(1, "x"), &catalog);

        assert_eq!(classified.item_type, ItemType::Other);
        assert_eq!(classified.bucket, ItemBucket::Other);
        assert!(!classified.is_exotic);
    }
}
