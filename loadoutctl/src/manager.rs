//! Loadout Manager: wires sources, manifest, engine and executor together.
//!
//! # Architecture
//!
//! ```text
//! LoadoutSource → parse → ManifestCache (prefetch) → Engine::resolve → Plan
//!                                                                      ↓
//!                             ApplyReport ← Executor ← StubInventory ←
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use loadout_domain::{codec, AccountSnapshot, LoadoutSpec, RawInventory};
use loadout_engine::{Engine, ExportOptions, Plan};
use loadout_exec::{ApplyReport, Executor, ManifestCache, ManifestPort, StubInventory};

use crate::config::Config;
use crate::error::CtlResult;

/// A resolved loadout together with the state it was resolved against.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Engine holding the run's definitions
    pub engine: Engine,
    /// Shaped account state
    pub snapshot: AccountSnapshot,
    /// Parsed loadout
    pub spec: LoadoutSpec,
    /// Resolved plan
    pub plan: Plan,
}

/// Runs the plan / apply / export workflows for one character.
pub struct LoadoutManager<M: ManifestPort> {
    /// Configuration
    config: Config,
    /// Item definitions
    manifest: Arc<M>,
}

impl<M: ManifestPort> LoadoutManager<M> {
    /// Create a new manager.
    pub fn new(config: Config, manifest: Arc<M>) -> Self {
        Self { config, manifest }
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse loadout text and resolve it against the feed.
    pub async fn plan(&self, raw: &RawInventory, text: &str) -> CtlResult<Resolution> {
        let character = self.config.require_character()?;
        let spec = codec::parse(text, &self.config.default_name)?;

        let engine = self.engine_for(raw, Some(&spec)).await?;
        let snapshot = engine.shape(raw);
        let plan = engine.resolve(&spec, &snapshot, character)?;

        Ok(Resolution {
            engine,
            snapshot,
            spec,
            plan,
        })
    }

    /// Resolve and execute a loadout.
    ///
    /// Execution runs against a simulated account seeded from the feed. After
    /// the run the loadout is resolved again against the resulting state to
    /// confirm it was fully absorbed.
    pub async fn apply(
        &self,
        raw: &RawInventory,
        text: &str,
        dry_run: bool,
    ) -> CtlResult<ApplyReport> {
        let resolution = self.plan(raw, text).await?;
        let inventory = Arc::new(StubInventory::new(resolution.snapshot.clone()));
        let executor = Executor::new(inventory.clone());

        let report = executor.run(&resolution.plan, dry_run).await;

        if !dry_run {
            verify_applied(&resolution, &inventory.snapshot());
        }

        Ok(report)
    }

    /// Serialize the character's current gear as loadout text.
    pub async fn export(
        &self,
        raw: &RawInventory,
        name: Option<String>,
        include_unequipped: bool,
    ) -> CtlResult<String> {
        let character = self.config.require_character()?;
        let engine = self.engine_for(raw, None).await?;
        let snapshot = engine.shape(raw);

        let options = ExportOptions {
            name: name.unwrap_or_else(|| self.config.default_name.clone()),
            include_unequipped,
        };
        let spec = engine.export(&snapshot, character, &options)?;
        Ok(engine.render(&spec))
    }

    async fn engine_for(
        &self,
        raw: &RawInventory,
        spec: Option<&LoadoutSpec>,
    ) -> CtlResult<Engine> {
        let mut hashes = raw.referenced_hashes();
        if let Some(spec) = spec {
            hashes.extend(spec.referenced_hashes());
        }

        let catalog = ManifestCache::new(self.manifest.clone()).prefetch(hashes).await?;
        Ok(Engine::new(catalog))
    }
}

/// Re-resolve a loadout against the post-run state.
///
/// Returns whether every action is now satisfied. Failures are logged and
/// never discard the run's report.
fn verify_applied(resolution: &Resolution, after: &AccountSnapshot) -> bool {
    let character = &resolution.plan.character;
    match resolution.engine.resolve(&resolution.spec, after, character) {
        Ok(replan) if replan.is_satisfied() => {
            info!(loadout = %replan.loadout, "Loadout fully applied");
            true
        },
        Ok(replan) => {
            warn!(
                loadout = %replan.loadout,
                pending = replan.pending().count(),
                "Loadout not fully applied, re-run apply to retry"
            );
            false
        },
        Err(e) => {
            warn!(loadout = %resolution.spec.name, error = %e, "Could not verify applied loadout");
            false
        },
    }
}
