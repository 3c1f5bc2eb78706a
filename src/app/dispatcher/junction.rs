//! Reaktionen auf Kreuzungs-Operationen.

use super::{mark, replace_keys};
use crate::app::cascade;
use crate::app::context::MapEditingContext;
use crate::app::events::{Operation, OperationApplied, OperationResult, Removed};
use crate::core::EntityKey;
use crate::scene::SceneOp;

pub(super) fn on_operation(ctx: &mut MapEditingContext, event: OperationApplied) {
    match event.operation {
        Operation::ConnectLinkRoads {
            junction_id,
            created,
        } => {
            let op = if created {
                SceneOp::Create
            } else {
                SceneOp::Replace
            };
            mark(ctx, EntityKey::Junction(junction_id), Some(op));
            touch_linked_roads(ctx, junction_id);
            ctx.request_save("Kreuzung verbinden");
        }
        Operation::DisconnectLinkRoad {
            junction_id,
            road_id,
        } => {
            mark(ctx, EntityKey::Junction(junction_id), Some(SceneOp::Replace));
            ctx.touch(EntityKey::Road(road_id));
            cascade::after_link_road_detached(ctx, junction_id, road_id);
            ctx.request_save("Kreuzungsanschluss trennen");
        }
        Operation::UpdateJunction { junction_id } => {
            mark(ctx, EntityKey::Junction(junction_id), Some(SceneOp::Replace));
            ctx.request_save("Kreuzung aktualisieren");
        }
        Operation::RemoveJunction { junction_id } => {
            mark(ctx, EntityKey::Junction(junction_id), Some(SceneOp::Dispose));
            if let OperationResult::Removed(Removed::Junction(junction)) = &event.result {
                for road_id in junction.distinct_road_ids() {
                    ctx.touch(EntityKey::Road(road_id));
                }
                cascade::after_junction_removed(ctx, junction);
            }
            ctx.request_save("Kreuzung entfernen");
        }
        Operation::AddLaneLink { junction_id, .. } => {
            mark(ctx, EntityKey::Junction(junction_id), Some(SceneOp::Replace));
            ctx.request_save("Fahrstreifen-Verknüpfung hinzufügen");
        }
        Operation::RemoveLaneLink { junction_id, .. } => {
            mark(ctx, EntityKey::Junction(junction_id), Some(SceneOp::Replace));
            ctx.request_save("Fahrstreifen-Verknüpfung entfernen");
        }
        Operation::ApplyState { keys } => replace_keys(ctx, &keys),
        Operation::ApplyMapFileState => {
            let ids = ctx.map().junctions.id_list();
            for id in ids {
                ctx.queue_scene(EntityKey::Junction(id), SceneOp::Create);
            }
        }
        other => log::warn!("Kreuzungs-Dispatcher: unerwartete Operation {}", other.name()),
    }
}

/// Straßen einer Kreuzung ändern ihre `link_junction`-Liste mit.
fn touch_linked_roads(ctx: &mut MapEditingContext, junction_id: crate::core::JunctionId) {
    let roads = ctx
        .cache()
        .junction(junction_id)
        .map(|j| j.distinct_road_ids())
        .unwrap_or_default();
    for road_id in roads {
        ctx.touch(EntityKey::Road(road_id));
    }
}
