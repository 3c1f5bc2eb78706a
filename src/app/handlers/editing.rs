//! Handler für Straßen-, Fahrstreifen-, Kreuzungs- und Objekt-Editing.

use crate::app::context::MapEditingContext;
use crate::app::events::EditCommand;
use crate::app::use_cases;
use crate::shared::EditError;

/// Führt einen Editier-Command als eine Aktion aus.
///
/// Jeder Aufruf erzeugt höchstens einen History-Record.
pub fn apply(ctx: &mut MapEditingContext, command: EditCommand) -> Result<(), EditError> {
    use use_cases::{control_point, junction, lane, object, road};

    match command {
        // === Kontrollpunkte & Straßen ===
        EditCommand::AddControlPoint { set_id, point } => {
            let id = control_point::add_control_point(ctx, set_id, point)?;
            // Folgepunkte gehen an denselben Satz
            ctx.update_interaction(|i| i.selection.control_point_set = Some(id));
        }
        EditCommand::MoveControlPoint {
            set_id,
            index,
            point,
        } => control_point::move_control_point(ctx, set_id, index, point)?,
        EditCommand::RemoveControlPoint { set_id, index } => {
            control_point::remove_control_point(ctx, set_id, index)?
        }
        EditCommand::MoveRoad { road_id, delta } => control_point::move_road(ctx, road_id, delta)?,
        EditCommand::CreateCircleRoad {
            center,
            radius,
            start_angle,
            end_angle,
        } => {
            let road_id = road::create_circle_road(ctx, center, radius, start_angle, end_angle)?;
            log::info!("Kreisstraße {} angelegt", road_id);
        }
        EditCommand::UpdateCircleRadius { road_id, radius } => {
            road::update_circle_radius(ctx, road_id, radius)?
        }
        EditCommand::UpdateTunnel { road_id, tunnel } => road::update_tunnel(ctx, road_id, tunnel)?,
        EditCommand::RemoveRoad { road_id } => road::remove_road(ctx, road_id)?,

        // === Fahrstreifen ===
        EditCommand::AddLane {
            road_id,
            section_id,
            lane_id,
        } => {
            lane::add_lane(ctx, road_id, section_id, lane_id)?;
        }
        EditCommand::RemoveLane {
            road_id,
            section_id,
            lane_id,
        } => lane::remove_lane(ctx, road_id, section_id, lane_id)?,
        EditCommand::UpdateLaneWidth {
            road_id,
            section_id,
            lane_id,
            width,
        } => {
            let applied = lane::update_lane_width(ctx, road_id, section_id, lane_id, width)?;
            if (applied - width).abs() > f32::EPSILON {
                ctx.status_message = Some(format!("Breite auf {:.2} m begrenzt", applied));
            }
        }
        EditCommand::UpdateLaneAttr {
            road_id,
            section_id,
            lane_id,
            value,
        } => lane::update_lane_attr(ctx, road_id, section_id, lane_id, value)?,
        EditCommand::UpdateLaneBoundary {
            road_id,
            section_id,
            lane_id,
            boundary,
        } => lane::update_lane_boundary(ctx, road_id, section_id, lane_id, boundary)?,

        // === Kreuzungen ===
        EditCommand::ConnectLinkRoads { junction_id, links } => {
            junction::connect_link_roads(ctx, junction_id, links)?;
        }
        EditCommand::DisconnectLinkRoad {
            junction_id,
            road_id,
        } => junction::disconnect_link_road(ctx, junction_id, road_id)?,
        EditCommand::RemoveJunction { junction_id } => {
            junction::remove_junction(ctx, junction_id)?
        }
        EditCommand::AddLaneLink {
            junction_id,
            from,
            to,
        } => {
            junction::add_lane_link(ctx, junction_id, from, to)?;
        }
        EditCommand::RemoveLaneLink {
            junction_id,
            link_id,
        } => junction::remove_lane_link(ctx, junction_id, link_id)?,

        // === Objekte ===
        EditCommand::AddRoadObject {
            kind,
            name,
            road_id,
            s,
            t,
        } => {
            object::add_road_object(ctx, kind, &name, road_id, s, t)?;
        }
        EditCommand::AddRoadSign {
            road_id,
            section_id,
            name,
            s,
            lane_id,
        } => {
            object::add_road_sign(ctx, road_id, section_id, &name, s, lane_id)?;
        }
        EditCommand::AddPoleFixture {
            pole_id,
            kind,
            name,
            height,
            offset,
        } => {
            object::add_pole_fixture(ctx, pole_id, kind, &name, height, offset)?;
        }
        EditCommand::AddJunctionObject {
            junction_id,
            kind,
            name,
            position,
        } => {
            object::add_junction_object(ctx, junction_id, kind, &name, position)?;
        }
        EditCommand::AddGuideLine {
            junction_id,
            from_road,
            to_road,
        } => {
            object::add_guide_line(ctx, junction_id, from_road, to_road)?;
        }
        EditCommand::MoveObject { object_id, s, t } => object::move_object(ctx, object_id, s, t)?,
        EditCommand::MoveObjectTo {
            object_id,
            position,
        } => object::move_object_to(ctx, object_id, position)?,
        EditCommand::MoveOnPole {
            object_id,
            height,
            offset,
        } => object::move_on_pole(ctx, object_id, height, offset)?,
        EditCommand::RotateObject { object_id, yaw } => {
            object::rotate_object(ctx, object_id, yaw)?
        }
        EditCommand::ResizeObject { object_id, size } => {
            object::resize_object(ctx, object_id, size)?
        }
        EditCommand::RemoveObject { object_id } => object::remove_object(ctx, object_id)?,

        other => log::warn!("Kein Editier-Command: {}", other.name()),
    }
    Ok(())
}
