//! Transfer resolver.
//!
//! Brings every `equip ∪ extra` item onto the active character:
//!
//! ```text
//! on active character        → nothing
//! vault                      → Withdraw
//! unequipped on other char   → Deposit (other → vault), Withdraw (vault → active)
//! equipped on other char     → EquippedElsewhere (fatal)
//! nowhere                    → ItemNotFound (fatal)
//! ```

use loadout_domain::{Container, ItemRef, LoadoutAction, LoadoutSpec, PlannedAction};
use tracing::debug;

use crate::context::{Placed, ResolveContext};
use crate::error::{EngineError, EngineResult};

/// Moves for every target item, in `equip` then `extra` order.
pub fn resolve_transfers(
    ctx: &ResolveContext<'_>,
    spec: &LoadoutSpec,
    placed: &mut Placed,
) -> EngineResult<Vec<PlannedAction>> {
    let mut actions = Vec::new();
    for target in spec.targets() {
        actions.extend(transfer_to_active(ctx, target, placed)?);
    }
    Ok(actions)
}

/// Moves that bring one item onto the active character.
///
/// Items the plan already placed yield no actions.
pub fn transfer_to_active(
    ctx: &ResolveContext<'_>,
    target: &ItemRef,
    placed: &mut Placed,
) -> EngineResult<Vec<PlannedAction>> {
    if placed.contains(target) {
        return Ok(Vec::new());
    }

    let (located, container) = ctx.locate(target)?;
    let item = located.item;

    let actions = match container {
        Container::Equipped(owner) | Container::Unequipped(owner) if &owner == ctx.character => {
            Vec::new()
        },
        Container::Vault => vec![PlannedAction::pending(ctx.withdraw(&item))],
        Container::Unequipped(owner) => vec![
            PlannedAction::pending(LoadoutAction::Deposit {
                character: owner,
                item: item.clone(),
            }),
            PlannedAction::pending(ctx.withdraw(&item)),
        ],
        Container::Equipped(owner) => {
            return Err(EngineError::EquippedElsewhere {
                item,
                character: owner,
            });
        },
    };

    debug!(item = %item, moves = actions.len(), "Transfer resolved");
    placed.mark(&item);
    Ok(actions)
}

// =============================================================================
// Tests
// =============================================================================
