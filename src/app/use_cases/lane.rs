//! Use-Cases: Fahrstreifen hinzufügen, entfernen und bearbeiten.
//!
//! Geändert wird immer nur die adressierte Section.

use crate::app::context::MapEditingContext;
use crate::app::events::{Domain, LaneAttr, Operation, OperationApplied};
use crate::core::road::LaneEditRejection;
use crate::core::{BoundaryMark, LaneType, Road, RoadId};
use crate::shared::EditError;

/// Neuer Wert eines Fahrstreifen-Attributs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaneAttrValue {
    /// Höchstgeschwindigkeit in km/h
    SpeedLimit(f32),
    Friction(f32),
    SOffset(f32),
    LaneType(LaneType),
}

impl LaneAttrValue {
    fn attr(self) -> LaneAttr {
        match self {
            Self::SpeedLimit(_) => LaneAttr::SpeedLimit,
            Self::Friction(_) => LaneAttr::Friction,
            Self::SOffset(_) => LaneAttr::SOffset,
            Self::LaneType(_) => LaneAttr::LaneType,
        }
    }
}

fn road_clone(ctx: &MapEditingContext, road_id: RoadId) -> Result<Road, EditError> {
    ctx.cache()
        .road(road_id)
        .cloned()
        .ok_or(EditError::RoadNotFound(road_id))
}

fn lane_not_found(road: RoadId, section: u32, lane: i32) -> EditError {
    EditError::LaneNotFound {
        road,
        section,
        lane,
    }
}

/// Fügt außen neben `lane_id` einen Fahrstreifen hinzu.
///
/// Gibt die ID des neuen Fahrstreifens zurück.
pub fn add_lane(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    section_id: u32,
    lane_id: i32,
) -> Result<i32, EditError> {
    ctx.run_unit(|ctx| {
        let mut road = road_clone(ctx, road_id)?;
        let new_id = road
            .add_lane(section_id, lane_id)
            .ok_or_else(|| lane_not_found(road_id, section_id, lane_id))?;
        ctx.map_mut().roads.create(road);
        log::info!("Fahrstreifen {} in {} hinzugefügt", new_id, road_id);
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::AddLane {
                road_id,
                section_id,
                lane_id: new_id,
            },
        ));
        Ok(new_id)
    })
}

/// Entfernt einen Fahrstreifen. Der letzte Fahrstreifen einer Richtung bleibt.
pub fn remove_lane(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    section_id: u32,
    lane_id: i32,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut road = road_clone(ctx, road_id)?;
        road.remove_lane(section_id, lane_id)
            .map_err(|rejection| match rejection {
                LaneEditRejection::LaneNotFound => lane_not_found(road_id, section_id, lane_id),
                LaneEditRejection::LastLaneInDirection => {
                    EditError::LastLaneInDirection { road: road_id }
                }
            })?;
        ctx.map_mut().roads.create(road);
        log::info!("Fahrstreifen {} aus {} entfernt", lane_id, road_id);
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::RemoveLane {
                road_id,
                section_id,
                lane_id,
            },
        ));
        Ok(())
    })
}

/// Setzt die Breite eines Fahrstreifens (begrenzt auf die konfigurierten Grenzen).
///
/// Gibt die tatsächlich gesetzte Breite zurück.
pub fn update_lane_width(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    section_id: u32,
    lane_id: i32,
    width: f32,
) -> Result<f32, EditError> {
    ctx.run_unit(|ctx| {
        let (min, max) = (ctx.options.min_lane_width, ctx.options.max_lane_width);
        let mut road = road_clone(ctx, road_id)?;
        let applied = road
            .update_lane_width(section_id, lane_id, width, min, max)
            .ok_or_else(|| lane_not_found(road_id, section_id, lane_id))?;
        ctx.map_mut().roads.create(road);
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::UpdateLaneWidth {
                road_id,
                section_id,
                lane_id,
            },
        ));
        Ok(applied)
    })
}

/// Ändert ein Attribut ohne Einfluss auf die Geometrie.
pub fn update_lane_attr(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    section_id: u32,
    lane_id: i32,
    value: LaneAttrValue,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut road = road_clone(ctx, road_id)?;
        let lane = road
            .lane_mut(section_id, lane_id)
            .ok_or_else(|| lane_not_found(road_id, section_id, lane_id))?;
        match value {
            LaneAttrValue::SpeedLimit(v) => lane.speed_limit = v.max(0.0),
            LaneAttrValue::Friction(v) => lane.friction = v.clamp(0.0, 1.0),
            LaneAttrValue::SOffset(v) => lane.s_offset = v.max(0.0),
            LaneAttrValue::LaneType(t) => {
                lane.lane_type = t;
                lane.friction = t.default_friction();
            }
        }
        ctx.map_mut().roads.create(road);
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::UpdateLaneAttr {
                road_id,
                attr: value.attr(),
            },
        ));
        Ok(())
    })
}

/// Setzt die Randmarkierung eines Fahrstreifens.
pub fn update_lane_boundary(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    section_id: u32,
    lane_id: i32,
    boundary: BoundaryMark,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut road = road_clone(ctx, road_id)?;
        road.lane_mut(section_id, lane_id)
            .ok_or_else(|| lane_not_found(road_id, section_id, lane_id))?
            .boundary = boundary;
        ctx.map_mut().roads.create(road);
        ctx.emit(OperationApplied::new(
            Domain::Road,
            Operation::UpdateLaneBoundary { road_id },
        ));
        Ok(())
    })
}
