//! Use-Cases: Straßen anlegen, Verlauf ändern, Kreisstraßen, Tunnel, Entfernen.

use crate::app::context::MapEditingContext;
use crate::app::events::{Domain, Operation, OperationApplied, Removed};
use crate::core::curve::arc_control_points;
use crate::core::{
    CircleParams, ControlPointSet, ControlPointSetId, Road, RoadId, RoadType, TunnelRange,
};
use crate::shared::EditError;
use glam::Vec3;

/// Materialisiert die Straße eines Kontrollpunkt-Satzes.
///
/// Hat der Satz bereits eine Straße, wird deren ID zurückgegeben.
pub fn create_road_from_control_points(
    ctx: &mut MapEditingContext,
    set_id: ControlPointSetId,
) -> Result<RoadId, EditError> {
    ctx.run_unit(|ctx| {
        let set = ctx
            .map()
            .control_points
            .get(set_id)
            .ok_or(EditError::ControlPointSetNotFound(set_id))?;
        if let Some(road_id) = set.road_id.filter(|id| ctx.map().roads.contains(*id)) {
            return Ok(road_id);
        }
        if set.is_orphan() {
            return Err(EditError::ControlPointOutOfRange {
                set: set_id,
                index: set.points.len(),
            });
        }
        let points = set.points.clone();
        let road_id = ctx.ids().road();
        let road = Road::new(road_id, Some(set_id), points, ctx.options.lane_template());
        log::info!("Straße {} erstellt (Länge {:.1} m)", road_id, road.length);
        ctx.map_mut().roads.create(road);
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::CreateRoad { road_id },
        ));

        ctx.map_mut()
            .control_points
            .update(set_id, |set| set.road_id = Some(road_id));
        ctx.emit(OperationApplied::new(
            Domain::ControlPoint,
            Operation::UpdateControlPoints { set_id },
        ));
        Ok(road_id)
    })
}

/// Übernimmt einen neuen Verlauf der Referenzlinie.
pub(crate) fn update_road_key_path(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    points: Vec<Vec3>,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let updated = ctx.map_mut().roads.update(road_id, |road| {
            road.key_path_control_points = points;
            road.refresh_geometry();
        });
        if !updated {
            return Err(EditError::RoadNotFound(road_id));
        }
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::UpdateRoadGeometry { road_id },
        ));
        Ok(())
    })
}

/// Legt eine Kreisstraße (Bogen um `center`) samt Kontrollpunkten an.
pub fn create_circle_road(
    ctx: &mut MapEditingContext,
    center: Vec3,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
) -> Result<RoadId, EditError> {
    ctx.run_unit(|ctx| {
        ctx.request_save("Kreisstraße erstellen");
        let circle = CircleParams {
            center,
            radius: radius.max(1.0),
            start_angle,
            end_angle,
        };
        let points = circle_points(ctx, &circle);
        let set_id = ctx.ids().control_point_set();
        let road_id = ctx.ids().road();

        let mut road = Road::new(
            road_id,
            Some(set_id),
            points.clone(),
            ctx.options.lane_template(),
        );
        road.is_circle_road = true;
        road.circle = Some(circle);
        ctx.map_mut().roads.create(road);
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::CreateRoad { road_id },
        ));

        let mut set = ControlPointSet::new(set_id, points);
        set.road_id = Some(road_id);
        ctx.map_mut().control_points.create(set);
        ctx.emit(OperationApplied::new(
            Domain::ControlPoint,
            Operation::UpdateControlPoints { set_id },
        ));
        log::info!("Kreisstraße {} mit Radius {:.1} m erstellt", road_id, circle.radius);
        Ok(road_id)
    })
}

fn circle_points(ctx: &MapEditingContext, circle: &CircleParams) -> Vec<Vec3> {
    arc_control_points(
        circle.center,
        circle.radius,
        circle.start_angle,
        circle.end_angle,
        ctx.options.circle_segments,
    )
}

/// Ändert den Radius einer Kreisstraße; Kontrollpunkte und Verlauf folgen.
pub fn update_circle_radius(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    radius: f32,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let road = ctx
            .cache()
            .road(road_id)
            .ok_or(EditError::RoadNotFound(road_id))?;
        let Some(mut circle) = road.circle.filter(|_| road.is_circle_road) else {
            return Err(EditError::NotACircleRoad(road_id));
        };
        let set_id = road.control_point_set;
        circle.radius = radius.max(1.0);
        let points = circle_points(ctx, &circle);

        ctx.request_save("Kreisradius ändern");
        if let Some(set_id) = set_id {
            let points = points.clone();
            if ctx
                .map_mut()
                .control_points
                .update(set_id, |set| set.points = points)
            {
                ctx.emit(OperationApplied::new(
                    Domain::ControlPoint,
                    Operation::UpdateControlPoints { set_id },
                ));
            }
        }
        ctx.map_mut()
            .roads
            .update(road_id, |road| road.circle = Some(circle));
        update_road_key_path(ctx, road_id, points)
    })
}

/// Setzt oder entfernt den Tunnelbereich einer Straße.
pub fn update_tunnel(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    tunnel: Option<TunnelRange>,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let updated = ctx.map_mut().roads.update(road_id, |road| {
            road.road_type = if tunnel.is_some() {
                RoadType::Tunnel
            } else {
                RoadType::Default
            };
            road.tunnel = tunnel;
            road.refresh_geometry();
        });
        if !updated {
            return Err(EditError::RoadNotFound(road_id));
        }
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::UpdateTunnel { road_id },
        ));
        Ok(())
    })
}

/// Entfernt eine Straße samt Kontrollpunkten.
///
/// Objekte auf der Straße, zu kleine Kreuzungen und Leitlinien räumt die
/// Kaskade im selben Schritt ab.
pub fn remove_road(ctx: &mut MapEditingContext, road_id: RoadId) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        ctx.request_save("Straße entfernen");
        let set_id = remove_road_only(ctx, road_id)?;
        if let Some(set_id) = set_id {
            if let Some(set) = ctx.map_mut().control_points.remove(set_id) {
                ctx.emit(OperationApplied::removed(
                    Domain::ControlPoint,
                    Operation::RemoveControlPoints { set_id },
                    Removed::ControlPoints(Box::new(set)),
                ));
            }
        }
        Ok(())
    })
}

/// Entfernt nur die Straße; liefert den zugehörigen Kontrollpunkt-Satz.
pub(crate) fn remove_road_only(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
) -> Result<Option<ControlPointSetId>, EditError> {
    ctx.run_unit(|ctx| {
        let road = ctx
            .map_mut()
            .roads
            .remove(road_id)
            .ok_or(EditError::RoadNotFound(road_id))?;
        let set_id = road.control_point_set;
        log::info!("Straße {} entfernt", road_id);
        ctx.emit(OperationApplied::removed(
            Domain::Road,
            Operation::RemoveRoad { road_id },
            Removed::Road(Box::new(road)),
        ));
        Ok(set_id)
    })
}
