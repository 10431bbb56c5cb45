//! Definition prefetch.
//!
//! Resolution is synchronous, so every definition a run needs is fetched up
//! front through the [`ManifestPort`] and handed to the engine as a
//! [`DefinitionCatalog`]. Lookups are memoized for the lifetime of the cache,
//! misses included.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use loadout_domain::{DefinitionCatalog, ItemDefinition, ItemHash};

use crate::error::ExecResult;
use crate::ports::ManifestPort;

/// Memoizing front for a manifest port.
pub struct ManifestCache<M: ManifestPort> {
    /// Underlying manifest
    manifest: Arc<M>,
    /// Answers seen so far, `None` for hashes the manifest does not know
    memo: HashMap<ItemHash, Option<ItemDefinition>>,
}

impl<M: ManifestPort> ManifestCache<M> {
    /// Create an empty cache.
    pub fn new(manifest: Arc<M>) -> Self {
        Self {
            manifest,
            memo: HashMap::new(),
        }
    }

    /// Look up one definition, hitting the manifest at most once per hash.
    pub async fn definition(&mut self, item_hash: ItemHash) -> ExecResult<Option<ItemDefinition>> {
        if let Some(known) = self.memo.get(&item_hash) {
            return Ok(known.clone());
        }

        let fetched = self.manifest.get_item_definition(item_hash).await?;
        if fetched.is_none() {
            debug!(%item_hash, "Manifest has no definition");
        }
        self.memo.insert(item_hash, fetched.clone());
        Ok(fetched)
    }

    /// Fetch every hash, one lookup at a time, into a catalog.
    ///
    /// Unknown hashes are left out; the engine classifies them as `Other`.
    ///
    /// # Errors
    /// The first manifest failure aborts the prefetch.
    pub async fn prefetch(
        &mut self,
        hashes: impl IntoIterator<Item = ItemHash>,
    ) -> ExecResult<DefinitionCatalog> {
        let mut catalog = DefinitionCatalog::new();
        let mut requested = 0usize;

        for item_hash in hashes {
            requested += 1;
            if let Some(definition) = self.definition(item_hash).await? {
                catalog.insert(definition);
            }
        }

        info!(requested, resolved = catalog.len(), "Definitions prefetched");
        Ok(catalog)
    }
}
