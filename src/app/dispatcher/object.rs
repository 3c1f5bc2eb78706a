//! Reaktionen auf Objekt-Operationen.

use super::{mark, replace_keys};
use crate::app::cascade;
use crate::app::context::MapEditingContext;
use crate::app::events::{Operation, OperationApplied, OperationResult, Removed, Reposition};
use crate::core::{EntityKey, ObjectId, ObjectKind};
use crate::scene::SceneOp;

pub(super) fn on_operation(ctx: &mut MapEditingContext, event: OperationApplied) {
    match event.operation {
        Operation::AddObject { object_id } => {
            mark(ctx, EntityKey::Object(object_id), Some(SceneOp::Create));
            ctx.request_save("Objekt hinzufügen");
        }
        Operation::MoveObject { object_id, mode } => {
            let op = match mode {
                Reposition::Move => SceneOp::MOVE,
                Reposition::Recreate => SceneOp::Replace,
            };
            mark(ctx, EntityKey::Object(object_id), Some(op));
            if is_pole(ctx, object_id) {
                cascade::after_pole_changed(ctx, object_id);
            }
            ctx.request_save("Objekt verschieben");
        }
        Operation::RotateObject { object_id } => {
            mark(ctx, EntityKey::Object(object_id), Some(SceneOp::ROTATE));
            if is_pole(ctx, object_id) {
                cascade::after_pole_changed(ctx, object_id);
            }
            ctx.request_save("Objekt drehen");
        }
        Operation::ResizeObject { object_id } => {
            mark(ctx, EntityKey::Object(object_id), Some(SceneOp::RESIZE));
            ctx.request_save("Objektgröße ändern");
        }
        Operation::RemoveObject { object_id } => {
            mark(ctx, EntityKey::Object(object_id), Some(SceneOp::Dispose));
            if let OperationResult::Removed(Removed::Object(object)) = &event.result {
                if object.kind == ObjectKind::Pole {
                    cascade::after_pole_removed(ctx, object.id);
                }
            }
            ctx.request_save("Objekt entfernen");
        }
        Operation::ApplyState { keys } => replace_keys(ctx, &keys),
        Operation::ApplyMapFileState => {
            let ids = ctx.map().objects.id_list();
            for id in ids {
                ctx.queue_scene(EntityKey::Object(id), SceneOp::Create);
            }
        }
        other => log::warn!("Objekt-Dispatcher: unerwartete Operation {}", other.name()),
    }
}

fn is_pole(ctx: &MapEditingContext, object_id: ObjectId) -> bool {
    ctx.cache()
        .object(object_id)
        .is_some_and(|o| o.kind == ObjectKind::Pole)
}
