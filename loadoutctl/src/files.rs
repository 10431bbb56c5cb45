//! JSON file adapters for the inventory feed and the manifest.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::info;

use loadout_domain::{ItemDefinition, ItemHash, RawInventory};
use loadout_exec::{ExecError, ManifestPort};

use crate::error::{CtlError, CtlResult};

async fn read_json<T: DeserializeOwned>(path: &Path) -> CtlResult<T> {
    let text = tokio::fs::read_to_string(path).await.map_err(|source| CtlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CtlError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the raw inventory feed.
pub async fn load_inventory(path: &Path) -> CtlResult<RawInventory> {
    let raw: RawInventory = read_json(path).await?;
    info!(
        path = %path.display(),
        characters = raw.characters.len(),
        vault = raw.vault.len(),
        "Inventory feed loaded"
    );
    Ok(raw)
}

/// Manifest backed by a JSON array of item definitions.
#[derive(Debug, Default)]
pub struct ManifestFile {
    definitions: HashMap<ItemHash, ItemDefinition>,
}

impl ManifestFile {
    /// Read the definitions file.
    pub async fn load(path: &Path) -> CtlResult<Self> {
        let definitions: Vec<ItemDefinition> = read_json(path).await?;
        info!(path = %path.display(), definitions = definitions.len(), "Manifest loaded");
        Ok(Self::from_definitions(definitions))
    }

    /// Build from definitions already in memory.
    pub fn from_definitions(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        Self {
            definitions: definitions.into_iter().map(|d| (d.item_hash, d)).collect(),
        }
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the file held no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[async_trait]
impl ManifestPort for ManifestFile {
    async fn get_item_definition(
        &self,
        item_hash: ItemHash,
    ) -> Result<Option<ItemDefinition>, ExecError> {
        Ok(self.definitions.get(&item_hash).cloned())
    }
}
