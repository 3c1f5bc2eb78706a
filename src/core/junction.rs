//! Kreuzungen: angeschlossene Straßenenden und Fahrstreifen-Verknüpfungen.
//!
//! Eine Kreuzung ist nur mit mindestens zwei verschiedenen angeschlossenen
//! Straßen gültig. Geometrie und Standard-Verknüpfungen werden aus den
//! Straßenenden abgeleitet und nach jeder Straßenänderung neu berechnet.

use super::curve::lateral_normal;
use super::ids::{IdGenerator, JunctionId, LaneLinkId, RoadId};
use super::road::{LaneDirection, Road, RoadEnd};
use super::store::{Entity, EntityStore};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Angeschlossenes Straßenende.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRoad {
    pub road_id: RoadId,
    pub end: RoadEnd,
}

impl LinkRoad {
    pub fn new(road_id: RoadId, end: RoadEnd) -> Self {
        Self { road_id, end }
    }
}

/// Ein Ende einer Fahrstreifen-Verknüpfung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneEndpoint {
    pub road_id: RoadId,
    pub section_id: u32,
    pub lane_id: i32,
    pub end: RoadEnd,
    pub direction: LaneDirection,
}

impl LaneEndpoint {
    /// Endpunkt mit aus der Fahrstreifen-ID abgeleiteter Richtung.
    pub fn new(road_id: RoadId, section_id: u32, lane_id: i32, end: RoadEnd) -> Option<Self> {
        Some(Self {
            road_id,
            section_id,
            lane_id,
            end,
            direction: LaneDirection::of_lane(lane_id)?,
        })
    }

    /// `true`, wenn der Fahrstreifen an diesem Ende in die Kreuzung hineinführt.
    pub fn is_incoming(&self) -> bool {
        is_incoming(self.direction, self.end)
    }

    fn same_lane(&self, other: &LaneEndpoint) -> bool {
        self.road_id == other.road_id
            && self.section_id == other.section_id
            && self.lane_id == other.lane_id
            && self.end == other.end
    }
}

fn is_incoming(direction: LaneDirection, end: RoadEnd) -> bool {
    matches!(
        (direction, end),
        (LaneDirection::Forward, RoadEnd::End) | (LaneDirection::Reverse, RoadEnd::Start)
    )
}

/// Verknüpfung eines einfahrenden mit einem ausfahrenden Fahrstreifen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneLink {
    pub id: LaneLinkId,
    pub from: LaneEndpoint,
    pub to: LaneEndpoint,
}

/// Kreuzung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Junction {
    pub id: JunctionId,
    pub link_roads: Vec<LinkRoad>,
    pub lane_links: Vec<LaneLink>,
    /// Abgeleitete Randpunkte; `None` bei weniger als zwei Straßen
    pub boundary: Option<Vec<Vec3>>,
}

impl Entity for Junction {
    type Id = JunctionId;

    fn id(&self) -> JunctionId {
        self.id
    }
}

impl Junction {
    /// Leere Kreuzung.
    pub fn new(id: JunctionId) -> Self {
        Self {
            id,
            link_roads: Vec::new(),
            lane_links: Vec::new(),
            boundary: None,
        }
    }

    /// Verschiedene angeschlossene Straßen in Anschlussreihenfolge.
    pub fn distinct_road_ids(&self) -> Vec<RoadId> {
        let mut ids: Vec<RoadId> = Vec::with_capacity(self.link_roads.len());
        for link in &self.link_roads {
            if !ids.contains(&link.road_id) {
                ids.push(link.road_id);
            }
        }
        ids
    }

    /// Mindestens zwei verschiedene Straßen angeschlossen.
    pub fn is_structurally_valid(&self) -> bool {
        self.distinct_road_ids().len() >= 2
    }

    /// Prüft, ob die Straße angeschlossen ist.
    pub fn links_road(&self, road_id: RoadId) -> bool {
        self.link_roads.iter().any(|l| l.road_id == road_id)
    }

    /// Prüft, ob das Straßenende angeschlossen ist.
    pub fn links_end(&self, link: LinkRoad) -> bool {
        self.link_roads.contains(&link)
    }

    /// Entfernt alle Anschlüsse einer Straße samt ihrer Verknüpfungen.
    pub fn detach_road(&mut self, road_id: RoadId) -> bool {
        let before = self.link_roads.len();
        self.link_roads.retain(|l| l.road_id != road_id);
        self.lane_links
            .retain(|l| l.from.road_id != road_id && l.to.road_id != road_id);
        before != self.link_roads.len()
    }

    /// Prüft eine Verknüpfung gegen die aktuellen Straßen.
    pub fn lane_link_is_valid(&self, link: &LaneLink, roads: &EntityStore<Road>) -> bool {
        endpoint_is_valid(self, &link.from, true, roads)
            && endpoint_is_valid(self, &link.to, false, roads)
    }

    /// `true`, wenn dieselbe Verknüpfung bereits existiert.
    pub fn has_lane_link(&self, from: &LaneEndpoint, to: &LaneEndpoint) -> bool {
        self.lane_links
            .iter()
            .any(|l| l.from.same_lane(from) && l.to.same_lane(to))
    }

    /// Leitet Verknüpfungen und Geometrie aus den Straßenenden neu ab.
    ///
    /// Gültige Verknüpfungen bleiben mit ihrer ID erhalten. Für Paare von
    /// Straßenenden ohne jede Verknüpfung werden Standard-Verknüpfungen
    /// (innerster auf innersten Fahrstreifen usw.) erzeugt.
    pub fn rederive(&mut self, roads: &EntityStore<Road>, ids: &mut IdGenerator) {
        self.link_roads.retain(|l| roads.contains(l.road_id));
        let current = std::mem::take(&mut self.lane_links);
        self.lane_links = current
            .into_iter()
            .filter(|l| self.lane_link_is_valid(l, roads))
            .collect();

        if !self.is_structurally_valid() {
            self.boundary = None;
            return;
        }

        let ends = self.link_roads.clone();
        for from_end in &ends {
            for to_end in &ends {
                if from_end == to_end {
                    continue;
                }
                let already_linked = self.lane_links.iter().any(|l| {
                    l.from.road_id == from_end.road_id
                        && l.from.end == from_end.end
                        && l.to.road_id == to_end.road_id
                        && l.to.end == to_end.end
                });
                if already_linked {
                    continue;
                }
                let incoming = end_lanes(roads, *from_end, true);
                let outgoing = end_lanes(roads, *to_end, false);
                for (from, to) in incoming.into_iter().zip(outgoing) {
                    self.lane_links.push(LaneLink {
                        id: ids.lane_link(),
                        from,
                        to,
                    });
                }
            }
        }

        self.boundary = Some(boundary_points(&ends, roads));
    }
}

fn endpoint_is_valid(
    junction: &Junction,
    endpoint: &LaneEndpoint,
    incoming: bool,
    roads: &EntityStore<Road>,
) -> bool {
    if endpoint.is_incoming() != incoming {
        return false;
    }
    if !junction.links_end(LinkRoad::new(endpoint.road_id, endpoint.end)) {
        return false;
    }
    roads
        .get(endpoint.road_id)
        .and_then(|road| road.end_section(endpoint.end))
        .is_some_and(|section| {
            section.id == endpoint.section_id && section.lane(endpoint.lane_id).is_some()
        })
}

/// Ein- bzw. ausfahrende Fahrstreifen eines Straßenendes, von innen nach außen.
fn end_lanes(roads: &EntityStore<Road>, link: LinkRoad, incoming: bool) -> Vec<LaneEndpoint> {
    let Some(section) = roads
        .get(link.road_id)
        .and_then(|road| road.end_section(link.end))
    else {
        return Vec::new();
    };
    [LaneDirection::Forward, LaneDirection::Reverse]
        .into_iter()
        .filter(|dir| is_incoming(*dir, link.end) == incoming)
        .flat_map(|dir| section.lanes_in(dir))
        .filter_map(|lane| LaneEndpoint::new(link.road_id, section.id, lane.id, link.end))
        .collect()
}

/// Randpunkte der Kreuzungsfläche: beide Fahrbahnkanten jedes Straßenendes.
fn boundary_points(ends: &[LinkRoad], roads: &EntityStore<Road>) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(ends.len() * 2);
    for link in ends {
        let Some(road) = roads.get(link.road_id) else {
            continue;
        };
        let Some(section) = road.end_section(link.end) else {
            continue;
        };
        let (center, tangent) = road.end_pose(link.end);
        let left = lateral_normal(tangent);
        points.push(center + left * section.direction_width(LaneDirection::Reverse));
        points.push(center - left * section.direction_width(LaneDirection::Forward));
    }
    points
}
