//! Use-Cases: Objekte platzieren, verschieben, drehen, skalieren und entfernen.
//!
//! Die `pub(crate)`-Varianten am Ende werden von der Kaskade aufgerufen und
//! laufen als verschachtelte Aktionen.

use crate::app::context::MapEditingContext;
use crate::app::events::{Domain, Operation, OperationApplied, Removed, Reposition};
use crate::core::{
    Dimensions, JunctionId, LaneDirection, MapData, MapObject, ObjectId, ObjectKind, Placement,
    PolePlacement, Road, RoadId, RoadPlacement, INTERSECTION_GUIDE_LINE,
};
use crate::shared::EditError;
use glam::{Quat, Vec3};

/// Startgröße querender Markierungen (Breite folgt der Fahrbahn).
const CROSSING_MARKING_SIZE: Dimensions = Dimensions {
    width: 3.5,
    length: 0.5,
    height: 0.02,
};

/// Montagepunkt am Mast.
fn pole_mount_position(pole: &MapObject, height: f32, offset: f32) -> Vec3 {
    pole.position + Vec3::Y * height + Quat::from_rotation_y(pole.yaw) * Vec3::X * offset
}

/// Schwerpunkt der Kreuzungsfläche.
fn junction_center(map: &MapData, junction_id: JunctionId) -> Option<Vec3> {
    let boundary = map.junctions.get(junction_id)?.boundary.as_ref()?;
    if boundary.is_empty() {
        return None;
    }
    Some(boundary.iter().copied().sum::<Vec3>() / boundary.len() as f32)
}

/// Passt (s, t), Breite und Weltposition an die aktuelle Straße an.
///
/// Querende Markierungen überspannen die ganze Richtung, fahrstreifengebundene
/// Schilder sitzen in der Fahrstreifenmitte.
fn fit_to_road(road: &Road, obj: &mut MapObject) {
    let crossing = obj.is_crossing_marking();
    let lane_bound = obj.bound_lane().is_some();
    let fallback_size = obj.size.or(obj.basic_size).unwrap_or(CROSSING_MARKING_SIZE);
    let Some(placement) = obj.road_placement_mut() else {
        return;
    };
    placement.s = placement.s.clamp(0.0, road.length);
    if crossing {
        let direction = placement
            .lane_id
            .and_then(LaneDirection::of_lane)
            .unwrap_or(LaneDirection::Forward);
        let width = road.direction_width(placement.section_id, direction);
        placement.t = direction.sign() as f32 * width / 2.0;
        let (s, t) = (placement.s, placement.t);
        obj.size = Some(Dimensions {
            width,
            ..fallback_size
        });
        obj.position = road.world_position(s, t);
        return;
    }
    if lane_bound {
        if let Some(t) = placement
            .lane_id
            .and_then(|lane| road.lane_center_t(placement.section_id, lane))
        {
            placement.t = t;
        }
    }
    let (s, t) = (placement.s, placement.t);
    obj.position = road.world_position(s, t);
}

fn object_or_err(ctx: &MapEditingContext, id: ObjectId) -> Result<MapObject, EditError> {
    ctx.cache()
        .object(id)
        .cloned()
        .ok_or(EditError::ObjectNotFound(id))
}

fn road_or_err(ctx: &MapEditingContext, id: RoadId) -> Result<&Road, EditError> {
    ctx.cache().road(id).ok_or(EditError::RoadNotFound(id))
}

/// Legt ein fertig aufgebautes Objekt an und meldet es.
fn insert(ctx: &mut MapEditingContext, obj: MapObject) -> ObjectId {
    let id = ctx.map_mut().objects.create(obj);
    ctx.emit(OperationApplied::new(
        Domain::Object,
        Operation::AddObject { object_id: id },
    ));
    id
}

/// Übernimmt ein geändertes Objekt und meldet die Neupositionierung.
fn store_moved(ctx: &mut MapEditingContext, obj: MapObject, mode: Reposition) {
    let object_id = ctx.map_mut().objects.create(obj);
    ctx.emit(OperationApplied::new(
        Domain::Object,
        Operation::MoveObject { object_id, mode },
    ));
}

// === Platzieren ===

/// Platziert einen Mast in (s, t).
pub fn add_pole(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    name: &str,
    s: f32,
    t: f32,
) -> Result<ObjectId, EditError> {
    add_road_object(ctx, ObjectKind::Pole, name, road_id, s, t)
}

/// Platziert ein freies Objekt (Mast, Parkfläche, Modell, Sonstiges) in (s, t).
pub fn add_road_object(
    ctx: &mut MapEditingContext,
    kind: ObjectKind,
    name: &str,
    road_id: RoadId,
    s: f32,
    t: f32,
) -> Result<ObjectId, EditError> {
    if kind.is_pole_fixture() || kind == ObjectKind::RoadSign {
        return Err(EditError::UnsupportedObjectKind(kind));
    }
    ctx.run_unit(|ctx| {
        let road = road_or_err(ctx, road_id)?;
        let section_id = road.section_at(s).map(|sec| sec.id).unwrap_or(0);
        let mut obj = MapObject::new(
            ObjectId(0),
            kind,
            name,
            Placement::Road(RoadPlacement {
                road_id,
                section_id,
                lane_id: None,
                s,
                t,
            }),
        );
        fit_to_road(road, &mut obj);
        obj.id = ctx.ids().object();
        let id = insert(ctx, obj);
        log::info!("{:?} {} auf {} platziert", kind, id, road_id);
        Ok(id)
    })
}

/// Platziert ein Schild oder eine Fahrbahnmarkierung.
///
/// Mit `lane_id` sitzt es in der Fahrstreifenmitte und folgt künftigen
/// Fahrstreifen-Änderungen.
pub fn add_road_sign(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    section_id: u32,
    name: &str,
    s: f32,
    lane_id: Option<i32>,
) -> Result<ObjectId, EditError> {
    ctx.run_unit(|ctx| {
        let road = road_or_err(ctx, road_id)?;
        let lane_missing = match lane_id {
            Some(lane) => road.lane(section_id, lane).is_none(),
            None => road.section(section_id).is_none(),
        };
        if lane_missing {
            return Err(EditError::LaneNotFound {
                road: road_id,
                section: section_id,
                lane: lane_id.unwrap_or(0),
            });
        }
        let mut obj = MapObject::new(
            ObjectId(0),
            ObjectKind::RoadSign,
            name,
            Placement::Road(RoadPlacement {
                road_id,
                section_id,
                lane_id,
                s,
                t: 0.0,
            }),
        );
        fit_to_road(road, &mut obj);
        obj.id = ctx.ids().object();
        let id = insert(ctx, obj);
        log::info!("Schild '{}' ({}) auf {} platziert", name, id, road_id);
        Ok(id)
    })
}

/// Befestigt Signaltafel, Ampel oder Sensor an einem Mast.
pub fn add_pole_fixture(
    ctx: &mut MapEditingContext,
    pole_id: ObjectId,
    kind: ObjectKind,
    name: &str,
    height: f32,
    offset: f32,
) -> Result<ObjectId, EditError> {
    if !kind.is_pole_fixture() {
        return Err(EditError::UnsupportedObjectKind(kind));
    }
    ctx.run_unit(|ctx| {
        let pole = object_or_err(ctx, pole_id)?;
        if pole.kind != ObjectKind::Pole {
            return Err(EditError::PoleRequired(pole_id));
        }
        let mut obj = MapObject::new(
            ctx.ids().object(),
            kind,
            name,
            Placement::Pole(PolePlacement {
                pole_id,
                height,
                offset,
            }),
        );
        obj.yaw = pole.yaw;
        obj.position = pole_mount_position(&pole, height, offset);
        Ok(insert(ctx, obj))
    })
}

/// Platziert ein Objekt frei innerhalb einer Kreuzung.
pub fn add_junction_object(
    ctx: &mut MapEditingContext,
    junction_id: JunctionId,
    kind: ObjectKind,
    name: &str,
    position: Vec3,
) -> Result<ObjectId, EditError> {
    if kind.is_pole_fixture() {
        return Err(EditError::UnsupportedObjectKind(kind));
    }
    ctx.run_unit(|ctx| {
        if ctx.cache().junction(junction_id).is_none() {
            return Err(EditError::JunctionNotFound(junction_id));
        }
        let mut obj = MapObject::new(
            ctx.ids().object(),
            kind,
            name,
            Placement::Junction { junction_id },
        );
        obj.position = position;
        Ok(insert(ctx, obj))
    })
}

/// Legt eine Leitlinie zwischen zwei Straßen einer Kreuzung an.
pub fn add_guide_line(
    ctx: &mut MapEditingContext,
    junction_id: JunctionId,
    from_road: RoadId,
    to_road: RoadId,
) -> Result<ObjectId, EditError> {
    ctx.run_unit(|ctx| {
        let junction = ctx
            .cache()
            .junction(junction_id)
            .ok_or(EditError::JunctionNotFound(junction_id))?;
        if from_road == to_road || !junction.links_road(from_road) || !junction.links_road(to_road)
        {
            return Err(EditError::IllegalJunctionConnection(format!(
                "Leitlinie {} → {} gehört nicht zu {}",
                from_road, to_road, junction_id
            )));
        }
        let mut obj = MapObject::new(
            ctx.ids().object(),
            ObjectKind::Other,
            INTERSECTION_GUIDE_LINE,
            Placement::GuideLine {
                junction_id,
                from_road,
                to_road,
            },
        );
        obj.position = junction_center(ctx.map(), junction_id).unwrap_or(Vec3::ZERO);
        Ok(insert(ctx, obj))
    })
}

// === Bearbeiten ===

/// Verschiebt ein Objekt auf seiner Straße nach (s, t).
///
/// Fahrstreifengebundene Schilder und querende Markierungen behalten ihren
/// lateralen Versatz.
pub fn move_object(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
    s: f32,
    t: f32,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut obj = object_or_err(ctx, object_id)?;
        let Some(placement) = obj.road_placement_mut() else {
            return Err(EditError::UnsupportedObjectOperation(object_id));
        };
        placement.s = s;
        placement.t = t;
        let road_id = placement.road_id;
        let road = road_or_err(ctx, road_id)?;
        if let Some(section) = road.section_at(s) {
            if obj.bound_lane().is_none() && !obj.is_crossing_marking() {
                if let Some(p) = obj.road_placement_mut() {
                    p.section_id = section.id;
                }
            }
        }
        fit_to_road(road, &mut obj);
        store_moved(ctx, obj, Reposition::Move);
        Ok(())
    })
}

/// Verschiebt ein Kreuzungsobjekt an eine freie Position.
pub fn move_object_to(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
    position: Vec3,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut obj = object_or_err(ctx, object_id)?;
        if !matches!(obj.placement, Placement::Junction { .. }) {
            return Err(EditError::UnsupportedObjectOperation(object_id));
        }
        obj.position = position;
        store_moved(ctx, obj, Reposition::Move);
        Ok(())
    })
}

/// Ändert Montagehöhe und Auskragung einer Befestigung.
pub fn move_on_pole(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
    height: f32,
    offset: f32,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut obj = object_or_err(ctx, object_id)?;
        let Placement::Pole(mut placement) = obj.placement else {
            return Err(EditError::UnsupportedObjectOperation(object_id));
        };
        let pole = object_or_err(ctx, placement.pole_id)?;
        placement.height = height;
        placement.offset = offset;
        obj.placement = Placement::Pole(placement);
        obj.position = pole_mount_position(&pole, height, offset);
        store_moved(ctx, obj, Reposition::Move);
        Ok(())
    })
}

/// Dreht ein Objekt um die Hochachse.
pub fn rotate_object(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
    yaw: f32,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        if !ctx.map_mut().objects.update(object_id, |o| o.yaw = yaw) {
            return Err(EditError::ObjectNotFound(object_id));
        }
        ctx.emit(OperationApplied::new(
            Domain::Object,
            Operation::RotateObject { object_id },
        ));
        Ok(())
    })
}

/// Setzt die Größe eines Objekts.
pub fn resize_object(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
    size: Dimensions,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let obj = object_or_err(ctx, object_id)?;
        if obj.is_crossing_marking() {
            // Breite folgt der Fahrbahn
            return Err(EditError::UnsupportedObjectOperation(object_id));
        }
        let size = Dimensions {
            width: size.width.max(0.01),
            length: size.length.max(0.01),
            height: size.height.max(0.01),
        };
        ctx.map_mut().objects.update(object_id, |o| o.size = Some(size));
        ctx.emit(OperationApplied::new(
            Domain::Object,
            Operation::ResizeObject { object_id },
        ));
        Ok(())
    })
}

/// Entfernt ein Objekt. Befestigungen eines Masts werden mit entfernt.
pub fn remove_object(ctx: &mut MapEditingContext, object_id: ObjectId) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let removed = ctx
            .map_mut()
            .objects
            .remove(object_id)
            .ok_or(EditError::ObjectNotFound(object_id))?;
        log::debug!("Objekt {} ({:?}) entfernt", object_id, removed.kind);
        ctx.emit(OperationApplied::removed(
            Domain::Object,
            Operation::RemoveObject { object_id },
            Removed::Object(Box::new(removed)),
        ));
        Ok(())
    })
}

// === Kaskade ===

/// Bindet ein Schild an einen anderen Fahrstreifen (oder berechnet nur den
/// Versatz neu) und positioniert es in dessen Mitte.
pub(crate) fn reposition_on_lane(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
    lane_id: Option<i32>,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut obj = object_or_err(ctx, object_id)?;
        let placement = obj
            .road_placement_mut()
            .ok_or(EditError::UnsupportedObjectOperation(object_id))?;
        if let Some(lane) = lane_id {
            placement.lane_id = Some(lane);
        }
        let road_id = placement.road_id;
        let road = road_or_err(ctx, road_id)?;
        fit_to_road(road, &mut obj);
        store_moved(ctx, obj, Reposition::Move);
        Ok(())
    })
}

/// Baut ein von der Straßen- oder Kreuzungsgeometrie abhängiges Objekt neu auf.
pub(crate) fn recreate_object(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut obj = object_or_err(ctx, object_id)?;
        match obj.placement {
            Placement::Road(p) => {
                let road = road_or_err(ctx, p.road_id)?;
                fit_to_road(road, &mut obj);
            }
            Placement::GuideLine { junction_id, .. } => {
                if let Some(center) = junction_center(ctx.map(), junction_id) {
                    obj.position = center;
                }
            }
            _ => return Err(EditError::UnsupportedObjectOperation(object_id)),
        }
        store_moved(ctx, obj, Reposition::Recreate);
        Ok(())
    })
}

/// Projiziert ein Objekt auf die geänderte Referenzlinie seiner Straße.
pub(crate) fn reproject_object(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut obj = object_or_err(ctx, object_id)?;
        let road_id = obj
            .road_id()
            .ok_or(EditError::UnsupportedObjectOperation(object_id))?;
        let road = road_or_err(ctx, road_id)?;
        fit_to_road(road, &mut obj);
        store_moved(ctx, obj, Reposition::Move);
        Ok(())
    })
}

/// Setzt eine Befestigung auf den aktuellen Montagepunkt ihres Masts.
pub(crate) fn follow_pole(
    ctx: &mut MapEditingContext,
    object_id: ObjectId,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let mut obj = object_or_err(ctx, object_id)?;
        let Placement::Pole(placement) = obj.placement else {
            return Err(EditError::UnsupportedObjectOperation(object_id));
        };
        let pole = object_or_err(ctx, placement.pole_id)?;
        obj.yaw = pole.yaw;
        obj.position = pole_mount_position(&pole, placement.height, placement.offset);
        store_moved(ctx, obj, Reposition::Move);
        Ok(())
    })
}
