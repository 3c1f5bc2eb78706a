//! Reaktionen auf Straßen-Operationen.

use super::{mark, replace_keys};
use crate::app::cascade::{self, LaneChange};
use crate::app::context::MapEditingContext;
use crate::app::events::{LaneAttr, Operation, OperationApplied, OperationResult, Removed};
use crate::core::EntityKey;
use crate::scene::SceneOp;

pub(super) fn on_operation(ctx: &mut MapEditingContext, event: OperationApplied) {
    match event.operation {
        Operation::CreateRoad { road_id } => {
            mark(ctx, EntityKey::Road(road_id), Some(SceneOp::Create));
            ctx.request_save("Straße erstellen");
        }
        Operation::RemoveRoad { road_id } => {
            mark(ctx, EntityKey::Road(road_id), Some(SceneOp::Dispose));
            if let OperationResult::Removed(Removed::Road(road)) = &event.result {
                cascade::after_road_removed(ctx, road);
            }
            ctx.request_save("Straße entfernen");
        }
        Operation::AddLane {
            road_id,
            section_id,
            lane_id,
        } => {
            mark(ctx, EntityKey::Road(road_id), Some(SceneOp::Replace));
            cascade::on_lane_change(ctx, road_id, section_id, LaneChange::Added(lane_id));
            ctx.request_save("Fahrstreifen hinzufügen");
        }
        Operation::RemoveLane {
            road_id,
            section_id,
            lane_id,
        } => {
            mark(ctx, EntityKey::Road(road_id), Some(SceneOp::Replace));
            cascade::on_lane_change(ctx, road_id, section_id, LaneChange::Removed(lane_id));
            ctx.request_save("Fahrstreifen entfernen");
        }
        Operation::UpdateLaneWidth {
            road_id,
            section_id,
            lane_id,
        } => {
            mark(ctx, EntityKey::Road(road_id), Some(SceneOp::Replace));
            cascade::on_lane_change(
                ctx,
                road_id,
                section_id,
                LaneChange::WidthChanged(lane_id),
            );
            ctx.request_save("Fahrstreifenbreite ändern");
        }
        Operation::UpdateLaneAttr { road_id, attr } => {
            // Nur die Fahrstreifen-Art ist sichtbar
            let op = (attr == LaneAttr::LaneType).then_some(SceneOp::Replace);
            mark(ctx, EntityKey::Road(road_id), op);
            ctx.request_save("Fahrstreifen-Eigenschaft ändern");
        }
        Operation::UpdateLaneBoundary { road_id } => {
            mark(ctx, EntityKey::Road(road_id), Some(SceneOp::Replace));
            ctx.request_save("Fahrbahnmarkierung ändern");
        }
        Operation::UpdateRoadGeometry { road_id } => {
            mark(ctx, EntityKey::Road(road_id), Some(SceneOp::Replace));
            cascade::on_road_geometry_changed(ctx, road_id);
            ctx.request_save("Straßenverlauf ändern");
        }
        Operation::UpdateTunnel { road_id } => {
            mark(ctx, EntityKey::Road(road_id), Some(SceneOp::Replace));
            ctx.request_save("Tunnel bearbeiten");
        }
        Operation::ApplyState { keys } => replace_keys(ctx, &keys),
        Operation::ApplyMapFileState => {
            let ids = ctx.map().roads.id_list();
            for id in ids {
                ctx.queue_scene(EntityKey::Road(id), SceneOp::Create);
            }
        }
        other => log::warn!("Straßen-Dispatcher: unerwartete Operation {}", other.name()),
    }
}
