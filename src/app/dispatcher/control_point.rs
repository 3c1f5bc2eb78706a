//! Reaktionen auf Kontrollpunkt-Operationen.

use super::{mark, replace_keys};
use crate::app::context::MapEditingContext;
use crate::app::events::{Operation, OperationApplied};
use crate::core::EntityKey;
use crate::scene::SceneOp;

pub(super) fn on_operation(ctx: &mut MapEditingContext, event: OperationApplied) {
    match event.operation {
        Operation::UpdateControlPoints { set_id } => {
            mark(ctx, EntityKey::ControlPoints(set_id), Some(SceneOp::Replace));
            ctx.request_save("Kontrollpunkte bearbeiten");
        }
        Operation::RemoveControlPoints { set_id } => {
            mark(ctx, EntityKey::ControlPoints(set_id), Some(SceneOp::Dispose));
            ctx.request_save("Kontrollpunkte entfernen");
        }
        Operation::ApplyState { keys } => replace_keys(ctx, &keys),
        Operation::ApplyMapFileState => {
            let ids = ctx.map().control_points.id_list();
            for id in ids {
                ctx.queue_scene(EntityKey::ControlPoints(id), SceneOp::Create);
            }
        }
        other => log::warn!(
            "Kontrollpunkt-Dispatcher: unerwartete Operation {}",
            other.name()
        ),
    }
}
