//! Executor: runs a resolved plan against the inventory port.
//!
//! The Executor is the bridge between the pure Engine (plans) and the
//! impure remote account (I/O).
//!
//! # Flow
//!
//! ```text
//! Plan → Executor → InventoryPort → ActionOutcome per action → ApplyReport
//! ```
//!
//! Actions run strictly in order, one at a time. A failed action is recorded
//! and the run moves on; nothing is retried.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use loadout_domain::{CharacterId, LoadoutAction, PlannedAction};
use loadout_engine::Plan;

use crate::error::ExecResult;
use crate::ports::InventoryPort;

// =============================================================================
// Outcomes
// =============================================================================

/// Why an action made no remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The account already matched
    AlreadySatisfied,
    /// Preview run
    DryRun,
}

/// What happened to one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ActionStatus {
    /// Remote call succeeded
    Applied,
    /// No remote call was made
    Skipped(SkipReason),
    /// Remote call failed with this error text
    Failed(String),
}

/// Result of one planned action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The action as planned
    pub action: LoadoutAction,
    /// Outcome
    pub status: ActionStatus,
    /// When the executor finished with the action
    pub completed_at: DateTime<Utc>,
}

impl ActionOutcome {
    /// Whether the remote call failed
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ActionStatus::Failed(_))
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ActionStatus::Applied => write!(f, "ok      {}", self.action),
            ActionStatus::Skipped(SkipReason::AlreadySatisfied) => {
                write!(f, "skip    {}", self.action)
            },
            ActionStatus::Skipped(SkipReason::DryRun) => write!(f, "dry-run {}", self.action),
            ActionStatus::Failed(error) => write!(f, "FAILED  {}: {}", self.action, error),
        }
    }
}

/// Summary of one `apply` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Time-ordered run id
    pub run_id: Uuid,
    /// Loadout applied
    pub loadout: String,
    /// Active character
    pub character: CharacterId,
    /// Preview mode
    pub dry_run: bool,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end
    pub finished_at: DateTime<Utc>,
    /// One outcome per planned action, in plan order
    pub outcomes: Vec<ActionOutcome>,
}

impl ApplyReport {
    /// Actions whose remote call succeeded
    pub fn applied(&self) -> usize {
        self.count(|s| matches!(s, ActionStatus::Applied))
    }

    /// Actions that made no remote call
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ActionStatus::Skipped(_)))
    }

    /// Actions whose remote call failed
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ActionStatus::Failed(_)))
    }

    /// Whether no action failed
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&ActionStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Run {} '{}' for {}{}",
            self.run_id,
            self.loadout,
            self.character,
            if self.dry_run { " (dry run)" } else { "" }
        )?;
        for outcome in &self.outcomes {
            writeln!(f, "  {}", outcome)?;
        }
        write!(
            f,
            "applied={} skipped={} failed={}",
            self.applied(),
            self.skipped(),
            self.failed()
        )
    }
}

// =============================================================================
// Executor
// =============================================================================

/// Executes planned actions against an inventory port.
pub struct Executor<I: InventoryPort> {
    /// Remote account
    inventory: Arc<I>,
}

impl<I: InventoryPort> Executor<I> {
    /// Create a new executor.
    pub fn new(inventory: Arc<I>) -> Self {
        Self { inventory }
    }

    /// Run a whole plan and summarise it.
    pub async fn run(&self, plan: &Plan, dry_run: bool) -> ApplyReport {
        let run_id = Uuid::now_v7();
        let started_at = Utc::now();

        info!(
            %run_id,
            loadout = %plan.loadout,
            character = %plan.character,
            actions = plan.len(),
            dry_run,
            "Applying plan"
        );

        let outcomes = self.apply(&plan.actions, dry_run).await;

        let report = ApplyReport {
            run_id,
            loadout: plan.loadout.clone(),
            character: plan.character.clone(),
            dry_run,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        info!(
            %run_id,
            applied = report.applied(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Plan applied"
        );

        report
    }

    /// Apply actions in order.
    ///
    /// Skip-marked actions and every action of a dry run make no remote
    /// call. A failed call does not stop the run.
    pub async fn apply(&self, actions: &[PlannedAction], dry_run: bool) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::with_capacity(actions.len());

        for planned in actions {
            let status = if planned.skip {
                debug!(action = %planned.action, "Already satisfied, skipping");
                ActionStatus::Skipped(SkipReason::AlreadySatisfied)
            } else if dry_run {
                debug!(action = %planned.action, "Dry run, skipping");
                ActionStatus::Skipped(SkipReason::DryRun)
            } else {
                match self.dispatch(&planned.action).await {
                    Ok(()) => {
                        debug!(action = %planned.action, "Action applied");
                        ActionStatus::Applied
                    },
                    Err(e) => {
                        warn!(action = %planned.action, error = %e, "Action failed");
                        ActionStatus::Failed(e.to_string())
                    },
                }
            };

            outcomes.push(ActionOutcome {
                action: planned.action.clone(),
                status,
                completed_at: Utc::now(),
            });
        }

        outcomes
    }

    async fn dispatch(&self, action: &LoadoutAction) -> ExecResult<()> {
        match action {
            LoadoutAction::Deposit { character, item } => {
                self.inventory.deposit_to_vault(character, item).await
            },
            LoadoutAction::Withdraw { character, item } => {
                self.inventory.withdraw_from_vault(character, item).await
            },
            LoadoutAction::Equip { character, item } => {
                self.inventory.equip(character, &item.instance_id).await
            },
            LoadoutAction::Socket {
                character,
                item,
                socket_index,
                plug_hash,
            } => {
                self.inventory
                    .insert_plug(character, &item.instance_id, *socket_index, *plug_hash)
                    .await
            },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{StubCall, StubInventory};
    use loadout_domain::{ItemBucket, ItemRef};
    use loadout_testkit::{character, weapon, SnapshotBuilder};

    fn setup() -> (Arc<StubInventory>, Executor<StubInventory>) {
        let snapshot = SnapshotBuilder::new()
            .equipped("C1", weapon(100, "abc", ItemBucket::Kinetic))
            .vault(weapon(400, "vlt", ItemBucket::Power))
            .vault(weapon(401, "vl2", ItemBucket::Energy))
            .build();
        let inventory = Arc::new(StubInventory::new(snapshot));
        let executor = Executor::new(inventory.clone());
        (inventory, executor)
    }

    fn withdraw(hash: u32, instance: &str) -> LoadoutAction {
        LoadoutAction::Withdraw {
            character: character("C1"),
            item: ItemRef::new(hash, instance),
        }
    }

    fn equip(hash: u32, instance: &str) -> LoadoutAction {
        LoadoutAction::Equip {
            character: character("C1"),
            item: ItemRef::new(hash, instance),
        }
    }

    #[tokio::test]
    async fn test_skip_makes_no_remote_call() {
        let (inventory, executor) = setup();

        let outcomes = executor.apply(&[PlannedAction::satisfied(equip(100, "abc"))], false).await;

        assert_eq!(outcomes[0].status, ActionStatus::Skipped(SkipReason::AlreadySatisfied));
        assert!(inventory.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_remote_call() {
        let (inventory, executor) = setup();
        let actions = vec![
            PlannedAction::pending(withdraw(400, "vlt")),
            PlannedAction::pending(equip(400, "vlt")),
        ];

        let outcomes = executor.apply(&actions, true).await;

        assert!(outcomes.iter().all(|o| o.status == ActionStatus::Skipped(SkipReason::DryRun)));
        assert!(inventory.calls().is_empty());
    }

    #[tokio::test]
    async fn test_actions_dispatch_in_order() {
        let (inventory, executor) = setup();
        let actions = vec![
            PlannedAction::pending(withdraw(400, "vlt")),
            PlannedAction::pending(equip(400, "vlt")),
        ];

        let outcomes = executor.apply(&actions, false).await;

        assert!(outcomes.iter().all(|o| o.status == ActionStatus::Applied));
        let calls = inventory.calls();
        assert!(matches!(calls[0], StubCall::Withdraw { .. }));
        assert!(matches!(calls[1], StubCall::Equip { .. }));
    }

    #[tokio::test]
    async fn test_failure_does_not_halt_run() {
        let (inventory, executor) = setup();
        inventory.set_fail_next(true);
        let actions = vec![
            PlannedAction::pending(withdraw(400, "vlt")),
            PlannedAction::pending(withdraw(401, "vl2")),
        ];

        let outcomes = executor.apply(&actions, false).await;

        assert!(outcomes[0].is_failed());
        assert_eq!(outcomes[1].status, ActionStatus::Applied);
        assert_eq!(inventory.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_precondition_failure_is_reported() {
        let (_inventory, executor) = setup();

        // not in the vault
        let outcomes = executor.apply(&[PlannedAction::pending(withdraw(9, "nope"))], false).await;

        match &outcomes[0].status {
            ActionStatus::Failed(error) => assert!(error.contains("9:nope")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_report_serializes_outcomes() -> anyhow::Result<()> {
        let (_inventory, executor) = setup();
        let plan = Plan {
            loadout: "Json".to_string(),
            character: character("C1"),
            actions: vec![PlannedAction::pending(withdraw(400, "vlt"))],
        };

        let report = executor.run(&plan, true).await;
        let json = serde_json::to_value(&report)?;

        assert_eq!(json["dry_run"], true);
        assert_eq!(json["outcomes"][0]["status"]["kind"], "skipped");
        assert_eq!(json["outcomes"][0]["status"]["detail"], "dry_run");
        assert_eq!(json["outcomes"][0]["action"]["type"], "withdraw");
        assert_eq!(report.run_id.get_version_num(), 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_report_counters() {
        let (_inventory, executor) = setup();
        let plan = Plan {
            loadout: "Report".to_string(),
            character: character("C1"),
            actions: vec![
                PlannedAction::satisfied(equip(100, "abc")),
                PlannedAction::pending(withdraw(400, "vlt")),
                PlannedAction::pending(withdraw(9, "nope")),
            ],
        };

        let report = executor.run(&plan, false).await;

        assert_eq!(report.loadout, "Report");
        assert_eq!(report.applied(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert!(report.started_at <= report.finished_at);
        assert!(report.to_string().contains("applied=1 skipped=1 failed=1"));
    }
}
