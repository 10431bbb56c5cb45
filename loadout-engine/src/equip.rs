//! Equip resolver.

use loadout_domain::{ItemRef, LoadoutSpec, PlannedAction};
use tracing::debug;

use crate::context::ResolveContext;
use crate::error::EngineResult;

/// One `Equip` per `equip` target, marked skip when the active character
/// already has the item equipped.
pub fn resolve_equips(
    ctx: &ResolveContext<'_>,
    spec: &LoadoutSpec,
) -> EngineResult<Vec<PlannedAction>> {
    let mut seen: Vec<ItemRef> = Vec::new();
    let mut actions = Vec::new();

    for target in &spec.equip {
        let (located, _) = ctx.locate(target)?;
        let item = located.item;
        if seen.iter().any(|s| s.same_item(&item)) {
            continue;
        }

        let action = ctx.equip(&item);
        if ctx.active.has_equipped(&item) {
            debug!(item = %item, "Already equipped");
            actions.push(PlannedAction::satisfied(action));
        } else {
            actions.push(PlannedAction::pending(action));
        }
        seen.push(item);
    }

    Ok(actions)
}
