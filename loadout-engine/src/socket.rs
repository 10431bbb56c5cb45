//! Socket resolver.
//!
//! Loadout documents address sockets by category-relative index. The item's
//! definition maps that to the absolute position the plug state and the
//! remote `insert_plug` call use.

use loadout_domain::{LoadoutAction, LoadoutSpec, PlannedAction, SocketAssignment};
use tracing::debug;

use crate::context::ResolveContext;
use crate::error::{EngineError, EngineResult};

/// One `Socket` per assignment, in document order.
pub fn resolve_sockets(
    ctx: &ResolveContext<'_>,
    spec: &LoadoutSpec,
) -> EngineResult<Vec<PlannedAction>> {
    spec.sockets.iter().map(|assignment| resolve_socket(ctx, spec, assignment)).collect()
}

fn resolve_socket(
    ctx: &ResolveContext<'_>,
    spec: &LoadoutSpec,
    assignment: &SocketAssignment,
) -> EngineResult<PlannedAction> {
    if !spec.lists(&assignment.item) {
        return Err(EngineError::OrphanSocket(assignment.item.clone()));
    }

    let (located, _) = ctx.locate(&assignment.item)?;
    let item = located.item;

    let definition = ctx
        .catalog
        .definition(item.item_hash)
        .ok_or(EngineError::MissingDefinition(item.item_hash))?;

    let socket_index = definition
        .absolute_socket_index(assignment.socket_index)
        .ok_or_else(|| EngineError::SocketOutOfRange {
            item: item.clone(),
            index: assignment.socket_index,
            available: definition.socket_indexes.len(),
        })?;

    let current = ctx.snapshot.plug_at(&item.instance_id, socket_index);
    let satisfied = current == Some(assignment.plug_hash);
    debug!(
        item = %item,
        relative = assignment.socket_index,
        absolute = socket_index,
        plug = %assignment.plug_hash,
        satisfied,
        "Socket resolved"
    );

    let action = LoadoutAction::Socket {
        character: ctx.character.clone(),
        item,
        socket_index,
        plug_hash: assignment.plug_hash,
    };

    Ok(if satisfied {
        PlannedAction::satisfied(action)
    } else {
        PlannedAction::pending(action)
    })
}
