//! Use-Cases: Kontrollpunkte setzen, verschieben und entfernen.
//!
//! Ab zwei Punkten existiert die Straße des Satzes; jede Änderung der Punkte
//! wird als neuer Verlauf an die Straße weitergegeben.

use super::road::{create_road_from_control_points, remove_road_only, update_road_key_path};
use crate::app::context::MapEditingContext;
use crate::app::events::{Domain, Operation, OperationApplied, Removed};
use crate::core::control_point::MIN_POINTS_FOR_ROAD;
use crate::core::{ControlPointSet, ControlPointSetId, RoadId};
use crate::shared::EditError;
use glam::Vec3;

fn set_or_err(
    ctx: &MapEditingContext,
    set_id: ControlPointSetId,
) -> Result<ControlPointSet, EditError> {
    ctx.map()
        .control_points
        .get(set_id)
        .cloned()
        .ok_or(EditError::ControlPointSetNotFound(set_id))
}

/// Übernimmt geänderte Punkte und gibt sie an die Straße weiter.
///
/// Ohne Straße wird sie ab zwei Punkten angelegt.
fn store_points(ctx: &mut MapEditingContext, set: ControlPointSet) -> Result<(), EditError> {
    let set_id = set.id;
    let road_id = set.road_id.filter(|id| ctx.map().roads.contains(*id));
    let points = set.points.clone();
    let orphan = set.is_orphan();
    ctx.map_mut().control_points.create(set);
    ctx.emit(OperationApplied::new(
        Domain::ControlPoint,
        Operation::UpdateControlPoints { set_id },
    ));
    match road_id {
        Some(road_id) => update_road_key_path(ctx, road_id, points),
        None if !orphan => create_road_from_control_points(ctx, set_id).map(|_| ()),
        None => Ok(()),
    }
}

/// Hängt einen Punkt an. Ohne Satz wird ein neuer (verwaister) Satz angelegt.
///
/// Mit dem zweiten Punkt entsteht die Straße.
pub fn add_control_point(
    ctx: &mut MapEditingContext,
    set_id: Option<ControlPointSetId>,
    point: Vec3,
) -> Result<ControlPointSetId, EditError> {
    ctx.run_unit(|ctx| {
        let mut set = match set_id {
            Some(id) => set_or_err(ctx, id)?,
            None => ControlPointSet::new(ctx.ids().control_point_set(), Vec::new()),
        };
        set.points.push(point);
        if set.points.len() == MIN_POINTS_FOR_ROAD && set.road_id.is_none() {
            ctx.request_save("Straße erstellen");
        }
        let id = set.id;
        store_points(ctx, set)?;
        Ok(id)
    })
}

/// Verschiebt einen einzelnen Punkt.
pub fn move_control_point(
    ctx: &mut MapEditingContext,
    set_id: ControlPointSetId,
    index: usize,
    point: Vec3,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut set = set_or_err(ctx, set_id)?;
        let slot = set
            .points
            .get_mut(index)
            .ok_or(EditError::ControlPointOutOfRange { set: set_id, index })?;
        *slot = point;
        store_points(ctx, set)
    })
}

/// Verschiebt eine ganze Straße über ihre Kontrollpunkte.
pub fn move_road(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    delta: Vec3,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let set_id = ctx
            .cache()
            .road(road_id)
            .ok_or(EditError::RoadNotFound(road_id))?
            .control_point_set
            .ok_or(EditError::RoadNotFound(road_id))?;
        let mut set = set_or_err(ctx, set_id)?;
        set.translate(delta);
        ctx.request_save("Straße verschieben");
        store_points(ctx, set)?;
        ctx.map_mut().roads.update(road_id, |road| {
            if let Some(circle) = road.circle.as_mut() {
                circle.center += delta;
            }
        });
        Ok(())
    })
}

/// Entfernt einen Punkt.
///
/// Unter zwei Punkten wird die Straße entfernt, ohne Punkte auch der Satz.
pub fn remove_control_point(
    ctx: &mut MapEditingContext,
    set_id: ControlPointSetId,
    index: usize,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut set = set_or_err(ctx, set_id)?;
        if index >= set.points.len() {
            return Err(EditError::ControlPointOutOfRange { set: set_id, index });
        }
        set.points.remove(index);

        if set.is_orphan() {
            if let Some(road_id) = set.road_id.take() {
                ctx.request_save("Straße entfernen");
                if ctx.map().roads.contains(road_id) {
                    remove_road_only(ctx, road_id)?;
                }
            }
        }

        if set.points.is_empty() {
            let removed = ctx.map_mut().control_points.remove(set_id);
            if let Some(removed) = removed {
                ctx.emit(OperationApplied::removed(
                    Domain::ControlPoint,
                    Operation::RemoveControlPoints { set_id },
                    Removed::ControlPoints(Box::new(removed)),
                ));
            }
            return Ok(());
        }
        store_points(ctx, set)
    })
}
