//! Use-Cases: Kreuzungen verbinden, trennen, entfernen und LaneLinks pflegen.

use crate::app::context::MapEditingContext;
use crate::app::events::{Domain, Operation, OperationApplied, Removed};
use crate::core::{Junction, JunctionId, LaneEndpoint, LaneLink, LaneLinkId, LinkRoad, RoadId};
use crate::shared::EditError;

fn junction_or_err(ctx: &MapEditingContext, id: JunctionId) -> Result<&Junction, EditError> {
    ctx.cache().junction(id).ok_or(EditError::JunctionNotFound(id))
}

/// Schließt Straßenenden an eine (neue oder bestehende) Kreuzung an.
///
/// Abgelehnt wird, wenn eine Straße fehlt, ein Straßenende bereits an einer
/// anderen Kreuzung hängt oder danach weniger als zwei Straßen beteiligt sind.
pub fn connect_link_roads(
    ctx: &mut MapEditingContext,
    junction_id: Option<JunctionId>,
    links: Vec<LinkRoad>,
) -> Result<JunctionId, EditError> {
    ctx.run_unit(|ctx| {
        let cache = ctx.cache();
        let mut junction = match junction_id {
            Some(id) => junction_or_err(ctx, id)?.clone(),
            None => Junction::new(JunctionId(0)),
        };
        for link in &links {
            if cache.road(link.road_id).is_none() {
                return Err(EditError::RoadNotFound(link.road_id));
            }
            let taken = ctx
                .map()
                .junctions
                .iter()
                .find(|j| Some(j.id) != junction_id && j.links_end(*link));
            if let Some(other) = taken {
                return Err(EditError::IllegalJunctionConnection(format!(
                    "{} ({:?}) ist bereits an {} angeschlossen",
                    link.road_id, link.end, other.id
                )));
            }
            if !junction.links_end(*link) {
                junction.link_roads.push(*link);
            }
        }
        if !junction.is_structurally_valid() {
            return Err(EditError::IllegalJunctionConnection(
                "eine Kreuzung braucht mindestens zwei verschiedene Straßen".into(),
            ));
        }

        let created = junction_id.is_none();
        if created {
            junction.id = ctx.ids().junction();
        }
        let id = junction.id;
        let road_ids = junction.distinct_road_ids();
        ctx.map_mut().junctions.create(junction);
        for road_id in &road_ids {
            ctx.map_mut()
                .roads
                .update(*road_id, |road| road.link_to_junction(id));
        }
        ctx.rederive_junction(id);
        log::info!("Kreuzung {} verbindet {} Straßen", id, road_ids.len());
        ctx.emit(OperationApplied::new(
            Domain::Junction,
            Operation::ConnectLinkRoads {
                junction_id: id,
                created,
            },
        ));
        Ok(id)
    })
}

/// Löst alle Anschlüsse einer Straße von der Kreuzung.
///
/// Bleibt danach weniger als zwei Straßen übrig, entfernt die Kaskade die
/// Kreuzung im selben Schritt.
pub fn disconnect_link_road(
    ctx: &mut MapEditingContext,
    junction_id: JunctionId,
    road_id: RoadId,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        if !junction_or_err(ctx, junction_id)?.links_road(road_id) {
            return Err(EditError::IllegalJunctionConnection(format!(
                "{} ist nicht an {} angeschlossen",
                road_id, junction_id
            )));
        }
        let map = ctx.map_mut();
        map.junctions.update(junction_id, |j| {
            j.detach_road(road_id);
        });
        map.roads.update(road_id, |road| {
            road.unlink_junction(junction_id);
        });
        ctx.rederive_junction(junction_id);
        ctx.emit(OperationApplied::new(
            Domain::Junction,
            Operation::DisconnectLinkRoad {
                junction_id,
                road_id,
            },
        ));
        Ok(())
    })
}

/// Leitet Geometrie und Verknüpfungen nach einer Straßenänderung neu ab.
pub(crate) fn update_junction(
    ctx: &mut MapEditingContext,
    junction_id: JunctionId,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        if !ctx.rederive_junction(junction_id) {
            return Err(EditError::JunctionNotFound(junction_id));
        }
        ctx.emit(OperationApplied::new(
            Domain::Junction,
            Operation::UpdateJunction { junction_id },
        ));
        Ok(())
    })
}

/// Entfernt eine Kreuzung samt aller nur an sie gebundenen Objekte.
pub fn remove_junction(
    ctx: &mut MapEditingContext,
    junction_id: JunctionId,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let map = ctx.map_mut();
        let removed = map
            .junctions
            .remove(junction_id)
            .ok_or(EditError::JunctionNotFound(junction_id))?;
        for road_id in removed.distinct_road_ids() {
            map.roads.update(road_id, |road| {
                road.unlink_junction(junction_id);
            });
        }
        log::info!("Kreuzung {} entfernt", junction_id);
        ctx.emit(OperationApplied::removed(
            Domain::Junction,
            Operation::RemoveJunction { junction_id },
            Removed::Junction(Box::new(removed)),
        ));
        Ok(())
    })
}

/// Fügt eine Fahrstreifen-Verknüpfung hinzu.
pub fn add_lane_link(
    ctx: &mut MapEditingContext,
    junction_id: JunctionId,
    from: LaneEndpoint,
    to: LaneEndpoint,
) -> Result<LaneLinkId, EditError> {
    ctx.run_unit(|ctx| {
        let junction = junction_or_err(ctx, junction_id)?;
        let mut link = LaneLink {
            id: LaneLinkId(0),
            from,
            to,
        };
        if !junction.lane_link_is_valid(&link, &ctx.map().roads) {
            return Err(EditError::InvalidLaneLink {
                junction: junction_id,
                reason: "Fahrstreifen passen nicht zu den Straßenenden der Kreuzung",
            });
        }
        if junction.has_lane_link(&from, &to) {
            return Err(EditError::InvalidLaneLink {
                junction: junction_id,
                reason: "Verknüpfung existiert bereits",
            });
        }
        link.id = ctx.ids().lane_link();
        let link_id = link.id;
        ctx.map_mut()
            .junctions
            .update(junction_id, |j| j.lane_links.push(link));
        ctx.emit(OperationApplied::new(
            Domain::Junction,
            Operation::AddLaneLink {
                junction_id,
                link_id,
            },
        ));
        Ok(link_id)
    })
}

/// Entfernt eine Fahrstreifen-Verknüpfung.
pub fn remove_lane_link(
    ctx: &mut MapEditingContext,
    junction_id: JunctionId,
    link_id: LaneLinkId,
) -> Result<(), EditError> {
    ctx.run_unit(|ctx| {
        let junction = junction_or_err(ctx, junction_id)?;
        if !junction.lane_links.iter().any(|l| l.id == link_id) {
            return Err(EditError::InvalidLaneLink {
                junction: junction_id,
                reason: "Verknüpfung existiert nicht",
            });
        }
        ctx.map_mut()
            .junctions
            .update(junction_id, |j| j.lane_links.retain(|l| l.id != link_id));
        ctx.emit(OperationApplied::new(
            Domain::Junction,
            Operation::RemoveLaneLink {
                junction_id,
                link_id,
            },
        ));
        Ok(())
    })
}
