//! De-exotic resolver.
//!
//! The game allows one equipped exotic per category. Before a target exotic
//! the active character does not own is brought over, a non-exotic item of
//! the same type and bucket is equipped in its place. A non-exotic already
//! equipped in that slot satisfies the swap as it is. Otherwise candidates
//! are tried in order:
//!
//! 1. an `extra` item (transferred first if it is not on the character)
//! 2. a vault item
//! 3. an item unequipped on another character, in snapshot order
//! 4. an item unequipped on the active character
//!
//! No candidate is a fatal [`EngineError::NoExoticReplacement`].

use loadout_domain::{ClassifiedItem, ItemRef, LoadoutAction, LoadoutSpec, PlannedAction};
use tracing::debug;

use crate::context::{Placed, ResolveContext};
use crate::error::{EngineError, EngineResult};
use crate::transfer::transfer_to_active;

/// Replacement equips for every exotic target the character does not own.
pub fn resolve_de_exotic(
    ctx: &ResolveContext<'_>,
    spec: &LoadoutSpec,
    placed: &mut Placed,
) -> EngineResult<Vec<PlannedAction>> {
    let mut seen: Vec<ItemRef> = Vec::new();
    let mut actions = Vec::new();

    for target in &spec.equip {
        let (target, _) = ctx.locate(target)?;
        if seen.iter().any(|s| s.same_item(&target.item)) {
            continue;
        }
        seen.push(target.item.clone());

        if !target.is_constrained_exotic() || ctx.active.holds(&target.item) {
            continue;
        }
        actions.extend(replace_exotic(ctx, spec, &target, placed)?);
    }

    Ok(actions)
}

fn is_replacement(candidate: &ClassifiedItem, target: &ClassifiedItem) -> bool {
    !candidate.is_exotic
        && candidate.shares_slot_with(target)
        && !candidate.item.same_item(&target.item)
}

fn is_unclaimed(candidate: &ClassifiedItem, target: &ClassifiedItem, placed: &Placed) -> bool {
    is_replacement(candidate, target) && !placed.contains(&candidate.item)
}

fn replace_exotic(
    ctx: &ResolveContext<'_>,
    spec: &LoadoutSpec,
    target: &ClassifiedItem,
    placed: &mut Placed,
) -> EngineResult<Vec<PlannedAction>> {
    // slot already holds a non-exotic
    if let Some(current) = ctx.active.equipped.iter().find(|c| is_replacement(c, target)) {
        debug!(exotic = %target.item, replacement = %current.item, "Slot already non-exotic");
        return Ok(vec![PlannedAction::satisfied(ctx.equip(&current.item))]);
    }

    // (1) extra items
    for extra in &spec.extra {
        let Some((candidate, _)) = ctx.snapshot.locate(extra) else {
            continue;
        };
        if !is_replacement(&candidate, target) {
            continue;
        }
        let mut actions = transfer_to_active(ctx, &candidate.item, placed)?;
        actions.push(equip_replacement(ctx, &candidate));
        debug!(exotic = %target.item, replacement = %candidate.item, "Replacing from extra");
        return Ok(actions);
    }

    // (2) vault
    if let Some(candidate) = ctx.snapshot.vault.iter().find(|c| is_unclaimed(c, target, placed)) {
        placed.mark(&candidate.item);
        debug!(exotic = %target.item, replacement = %candidate.item, "Replacing from vault");
        return Ok(vec![
            PlannedAction::pending(ctx.withdraw(&candidate.item)),
            equip_replacement(ctx, candidate),
        ]);
    }

    // (3) other characters' unequipped items
    for other in ctx.snapshot.other_characters(ctx.character) {
        let found = other.unequipped.iter().find(|c| is_unclaimed(c, target, placed));
        if let Some(candidate) = found {
            placed.mark(&candidate.item);
            debug!(
                exotic = %target.item,
                replacement = %candidate.item,
                from = %other.character_id,
                "Replacing from another character"
            );
            return Ok(vec![
                PlannedAction::pending(LoadoutAction::Deposit {
                    character: other.character_id.clone(),
                    item: candidate.item.clone(),
                }),
                PlannedAction::pending(ctx.withdraw(&candidate.item)),
                equip_replacement(ctx, candidate),
            ]);
        }
    }

    // (4) the active character's own unequipped items
    let own = ctx.active.unequipped.iter().find(|c| is_unclaimed(c, target, placed));
    if let Some(candidate) = own {
        placed.mark(&candidate.item);
        debug!(exotic = %target.item, replacement = %candidate.item, "Replacing from inventory");
        return Ok(vec![PlannedAction::pending(ctx.equip(&candidate.item))]);
    }

    Err(EngineError::NoExoticReplacement {
        item: target.item.clone(),
        bucket: target.bucket,
    })
}

fn equip_replacement(ctx: &ResolveContext<'_>, candidate: &ClassifiedItem) -> PlannedAction {
    let action = ctx.equip(&candidate.item);
    if ctx.active.has_equipped(&candidate.item) {
        PlannedAction::satisfied(action)
    } else {
        PlannedAction::pending(action)
    }
}
