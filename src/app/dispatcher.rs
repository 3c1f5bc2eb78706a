//! Dispatcher: reagiert auf `OperationApplied` je Domäne.
//!
//! Jeder Handler merkt Szenen-Operationen vor, nimmt die betroffenen IDs in
//! die Arbeitseinheit auf, stößt die Kaskade an und setzt den History-Titel.
//! Ob der Titel zählt, entscheidet die Arbeitseinheit anhand der Tiefe.

mod control_point;
mod junction;
mod object;
mod road;

use super::context::MapEditingContext;
use super::events::{Domain, OperationApplied};
use crate::core::EntityKey;
use crate::scene::SceneOp;

/// Leitet ein Ereignis an den Handler seiner Domäne weiter.
pub(crate) fn dispatch(ctx: &mut MapEditingContext, event: OperationApplied) {
    match event.domain {
        Domain::Road => road::on_operation(ctx, event),
        Domain::Junction => junction::on_operation(ctx, event),
        Domain::Object => object::on_operation(ctx, event),
        Domain::ControlPoint => control_point::on_operation(ctx, event),
    }
}

/// Undo/Redo: jeder Schlüssel wird entfernt und, falls vorhanden, neu erzeugt.
fn replace_keys(ctx: &mut MapEditingContext, keys: &[EntityKey]) {
    for key in keys {
        ctx.queue_scene(*key, SceneOp::Replace);
    }
}

/// Vermerkt eine Szenen-Operation und nimmt den Schlüssel in die Diff-IDs auf.
fn mark(ctx: &mut MapEditingContext, key: EntityKey, op: Option<SceneOp>) {
    if let Some(op) = op {
        ctx.queue_scene(key, op);
    }
    ctx.touch(key);
}
