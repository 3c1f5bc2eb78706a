//! Kaskade: hält abhängige Entitäten nach einer Mutation konsistent.
//!
//! Alle Schritte laufen als verschachtelte Aktionen in der Arbeitseinheit
//! der auslösenden Operation und landen so im selben History-Record. Bereits
//! entfernte IDs werden stillschweigend übersprungen.

use super::context::MapEditingContext;
use super::use_cases::{junction, object};
use crate::core::{
    Junction, JunctionId, LaneDirection, ObjectId, ObjectKind, Placement, Road, RoadId,
};
use crate::shared::EditError;

/// Art der Fahrstreifen-Änderung, auf die Objekte reagieren.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneChange {
    /// Neuer Fahrstreifen mit dieser ID
    Added(i32),
    /// Fahrstreifen mit dieser ID entfernt
    Removed(i32),
    /// Breite dieses Fahrstreifens geändert
    WidthChanged(i32),
}

impl LaneChange {
    fn lane_id(self) -> i32 {
        match self {
            Self::Added(id) | Self::Removed(id) | Self::WidthChanged(id) => id,
        }
    }
}

/// Geplanter Schritt für ein Objekt auf der geänderten Straße.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LanePlan {
    Remove(ObjectId),
    Rebind(ObjectId, i32),
    RecomputeOffset(ObjectId),
    Recreate(ObjectId),
}

/// Fahrstreifen-Anzahl oder -Breite einer Section geändert.
pub(crate) fn on_lane_change(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    section_id: u32,
    change: LaneChange,
) {
    reposition_lane_objects(ctx, road_id, section_id, change);
    refresh_linked_junctions(ctx, &[road_id]);
    refresh_guide_lines(ctx, &[road_id]);
}

/// Referenzlinie einer Straße geändert.
pub(crate) fn on_road_geometry_changed(ctx: &mut MapEditingContext, road_id: RoadId) {
    reproject_objects_on_road(ctx, road_id);
    refresh_linked_junctions(ctx, &[road_id]);
    refresh_guide_lines(ctx, &[road_id]);
}

/// Markierungen einer Section an die neue Fahrstreifen-Aufteilung anpassen.
///
/// Erst wird aus dem unveränderten Objektbestand ein Plan erstellt, dann
/// werden die Schritte über die Objekt-Aktionen ausgeführt.
fn reposition_lane_objects(
    ctx: &mut MapEditingContext,
    road_id: RoadId,
    section_id: u32,
    change: LaneChange,
) {
    let target = change.lane_id();
    let Some(direction) = LaneDirection::of_lane(target) else {
        return;
    };

    let cache = ctx.cache();
    let mut plan = Vec::new();
    for id in cache.objects_on_road(road_id) {
        let Some(obj) = cache.object(id) else {
            continue;
        };
        if obj.kind != ObjectKind::RoadSign {
            continue;
        }
        let Some(placement) = obj.road_placement() else {
            continue;
        };
        if placement.section_id != section_id {
            continue;
        }
        if obj.is_crossing_marking() {
            plan.push(LanePlan::Recreate(id));
            continue;
        }
        let Some(lane) = placement.lane_id else {
            continue;
        };
        // Nur Fahrstreifen derselben Richtung ab der geänderten Position
        if LaneDirection::of_lane(lane) != Some(direction) || lane.abs() < target.abs() {
            continue;
        }
        let step = match change {
            LaneChange::Removed(_) if lane == target => LanePlan::Remove(id),
            LaneChange::Removed(_) => LanePlan::Rebind(id, lane - direction.sign()),
            LaneChange::Added(_) => LanePlan::Rebind(id, lane + direction.sign()),
            LaneChange::WidthChanged(_) => LanePlan::RecomputeOffset(id),
        };
        plan.push(step);
    }

    if !plan.is_empty() {
        log::debug!(
            "Kaskade {}: {} Objekte nach {:?} anpassen",
            road_id,
            plan.len(),
            change
        );
    }
    for step in plan {
        let result = match step {
            LanePlan::Remove(id) => object::remove_object(ctx, id),
            LanePlan::Rebind(id, lane) => object::reposition_on_lane(ctx, id, Some(lane)),
            LanePlan::RecomputeOffset(id) => object::reposition_on_lane(ctx, id, None),
            LanePlan::Recreate(id) => object::recreate_object(ctx, id),
        };
        skip_failed(result);
    }
}

/// Objekte einer Straße auf die neue Referenzlinie projizieren.
fn reproject_objects_on_road(ctx: &mut MapEditingContext, road_id: RoadId) {
    let cache = ctx.cache();
    let (markings, others): (Vec<ObjectId>, Vec<ObjectId>) = cache
        .objects_on_road(road_id)
        .into_iter()
        .partition(|id| cache.object(*id).is_some_and(|o| o.is_crossing_marking()));
    for id in others {
        skip_failed(object::reproject_object(ctx, id));
    }
    for id in markings {
        skip_failed(object::recreate_object(ctx, id));
    }
}

/// Kreuzungen der Straßen neu ableiten oder entfernen.
pub(crate) fn refresh_linked_junctions(ctx: &mut MapEditingContext, road_ids: &[RoadId]) {
    let junction_ids = ctx.cache().junctions_of_roads(road_ids);
    for junction_id in junction_ids {
        refresh_junction(ctx, junction_id);
    }
}

/// Entfernt eine Kreuzung mit weniger als zwei Straßen, sonst Neuableitung.
fn refresh_junction(ctx: &mut MapEditingContext, junction_id: JunctionId) {
    let cache = ctx.cache();
    let Some(junction) = cache.junction(junction_id) else {
        return;
    };
    let remaining = junction
        .distinct_road_ids()
        .into_iter()
        .filter(|id| cache.road(*id).is_some())
        .count();
    let result = if remaining < 2 {
        junction::remove_junction(ctx, junction_id)
    } else {
        junction::update_junction(ctx, junction_id)
    };
    skip_failed(result);
}

/// Leitlinien der Straßen neu aufbauen oder entfernen.
pub(crate) fn refresh_guide_lines(ctx: &mut MapEditingContext, road_ids: &[RoadId]) {
    let cache = ctx.cache();
    let mut plan = Vec::new();
    for id in cache.guide_lines_for_roads(road_ids) {
        let Some(Placement::GuideLine {
            junction_id,
            from_road,
            to_road,
        }) = cache.object(id).map(|o| o.placement)
        else {
            continue;
        };
        let intact = cache.junction(junction_id).is_some_and(|j| {
            j.links_road(from_road) && j.links_road(to_road)
        }) && cache.road(from_road).is_some()
            && cache.road(to_road).is_some();
        plan.push((id, intact));
    }
    for (id, intact) in plan {
        let result = if intact {
            object::recreate_object(ctx, id)
        } else {
            object::remove_object(ctx, id)
        };
        skip_failed(result);
    }
}

/// Straße entfernt: Objekte, Kreuzungsanschlüsse und Leitlinien aufräumen.
pub(crate) fn after_road_removed(ctx: &mut MapEditingContext, road: &Road) {
    let objects = ctx.cache().objects_on_road(road.id);
    for id in objects {
        skip_failed(object::remove_object(ctx, id));
    }
    for junction_id in road.link_junction.clone() {
        if ctx.cache().junction(junction_id).is_none() {
            continue;
        }
        skip_failed(junction::disconnect_link_road(ctx, junction_id, road.id));
    }
    refresh_guide_lines(ctx, &[road.id]);
}

/// Straßenanschluss gelöst: zu kleine Kreuzungen entfernen.
pub(crate) fn after_link_road_detached(
    ctx: &mut MapEditingContext,
    junction_id: JunctionId,
    road_id: RoadId,
) {
    let valid = ctx
        .cache()
        .junction(junction_id)
        .map(Junction::is_structurally_valid);
    if valid == Some(false) {
        skip_failed(junction::remove_junction(ctx, junction_id));
    }
    refresh_guide_lines(ctx, &[road_id]);
}

/// Kreuzung entfernt: daran gebundene Objekte entfernen.
pub(crate) fn after_junction_removed(ctx: &mut MapEditingContext, junction: &Junction) {
    let objects = ctx.cache().objects_in_junction(junction.id);
    for id in objects {
        skip_failed(object::remove_object(ctx, id));
    }
}

/// Mast bewegt oder gedreht: Befestigungen folgen.
pub(crate) fn after_pole_changed(ctx: &mut MapEditingContext, pole_id: ObjectId) {
    let fixtures = ctx.cache().objects_on_pole(pole_id);
    for id in fixtures {
        skip_failed(object::follow_pole(ctx, id));
    }
}

/// Mast entfernt: Befestigungen werden mit entfernt.
pub(crate) fn after_pole_removed(ctx: &mut MapEditingContext, pole_id: ObjectId) {
    let fixtures = ctx.cache().objects_on_pole(pole_id);
    for id in fixtures {
        skip_failed(object::remove_object(ctx, id));
    }
}

/// Fehlgeschlagene Kaskadenschritte werden protokolliert, nicht propagiert.
fn skip_failed<T>(result: Result<T, EditError>) {
    if let Err(e) = result {
        log::debug!("Kaskade: Schritt übersprungen ({})", e);
    }
}
