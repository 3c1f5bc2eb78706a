//! Entity-Cache: ID-basierter Lesezugriff über alle Collections.
//!
//! Der Cache ist eine geliehene Sicht auf [`MapData`] und damit nie
//! veraltet. Kaskade und History lösen hierüber IDs aus Records auf, ohne die
//! API der besitzenden Collection zu kennen.

use super::control_point::ControlPointSet;
use super::ids::{ControlPointSetId, JunctionId, ObjectId, RoadId};
use super::junction::Junction;
use super::map_data::MapData;
use super::object::{MapObject, Placement};
use super::road::Road;
use serde::{Deserialize, Serialize};

/// Schlüssel einer beliebigen Entität.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKey {
    Road(RoadId),
    Junction(JunctionId),
    Object(ObjectId),
    ControlPoints(ControlPointSetId),
}

/// Geliehene Referenz auf eine Entität.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Road(&'a Road),
    Junction(&'a Junction),
    Object(&'a MapObject),
    ControlPoints(&'a ControlPointSet),
}

impl EntityRef<'_> {
    /// Schlüssel der referenzierten Entität.
    pub fn key(&self) -> EntityKey {
        match self {
            Self::Road(r) => EntityKey::Road(r.id),
            Self::Junction(j) => EntityKey::Junction(j.id),
            Self::Object(o) => EntityKey::Object(o.id),
            Self::ControlPoints(c) => EntityKey::ControlPoints(c.id),
        }
    }
}

/// Lesende Sicht auf alle Entitäten.
#[derive(Clone, Copy)]
pub struct EntityCache<'a> {
    map: &'a MapData,
}

impl<'a> EntityCache<'a> {
    pub fn new(map: &'a MapData) -> Self {
        Self { map }
    }

    /// Löst einen beliebigen Schlüssel auf.
    pub fn get(&self, key: EntityKey) -> Option<EntityRef<'a>> {
        match key {
            EntityKey::Road(id) => self.road(id).map(EntityRef::Road),
            EntityKey::Junction(id) => self.junction(id).map(EntityRef::Junction),
            EntityKey::Object(id) => self.object(id).map(EntityRef::Object),
            EntityKey::ControlPoints(id) => {
                self.map.control_points.get(id).map(EntityRef::ControlPoints)
            }
        }
    }

    /// Prüft, ob der Schlüssel auflösbar ist.
    pub fn contains(&self, key: EntityKey) -> bool {
        self.get(key).is_some()
    }

    pub fn road(&self, id: RoadId) -> Option<&'a Road> {
        self.map.roads.get(id)
    }

    pub fn junction(&self, id: JunctionId) -> Option<&'a Junction> {
        self.map.junctions.get(id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&'a MapObject> {
        self.map.objects.get(id)
    }

    /// Objekte mit (s, t)-Bezug auf die Straße.
    pub fn objects_on_road(&self, road_id: RoadId) -> Vec<ObjectId> {
        self.map
            .objects
            .iter()
            .filter(|o| o.road_id() == Some(road_id))
            .map(|o| o.id)
            .collect()
    }

    /// An einem Mast befestigte Objekte.
    pub fn objects_on_pole(&self, pole_id: ObjectId) -> Vec<ObjectId> {
        self.map
            .objects
            .iter()
            .filter(|o| o.parent_pole_id() == Some(pole_id))
            .map(|o| o.id)
            .collect()
    }

    /// Nur an die Kreuzung gebundene Objekte (inkl. Leitlinien).
    pub fn objects_in_junction(&self, junction_id: JunctionId) -> Vec<ObjectId> {
        self.map
            .objects
            .iter()
            .filter(|o| o.junction_id() == Some(junction_id))
            .map(|o| o.id)
            .collect()
    }

    /// Leitlinien, die eine der Straßen referenzieren.
    pub fn guide_lines_for_roads(&self, road_ids: &[RoadId]) -> Vec<ObjectId> {
        self.map
            .objects
            .iter()
            .filter(|o| match o.placement {
                Placement::GuideLine {
                    from_road, to_road, ..
                } => road_ids.contains(&from_road) || road_ids.contains(&to_road),
                _ => false,
            })
            .map(|o| o.id)
            .collect()
    }

    /// Vereinigung der `link_junction`-IDs aller Straßen, dedupliziert.
    pub fn junctions_of_roads(&self, road_ids: &[RoadId]) -> Vec<JunctionId> {
        let mut result = Vec::new();
        for road in road_ids.iter().filter_map(|id| self.road(*id)) {
            for junction_id in &road.link_junction {
                if !result.contains(junction_id) {
                    result.push(*junction_id);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::{ObjectKind, PolePlacement, RoadPlacement};
    use crate::core::road::LaneTemplate;
    use glam::Vec3;

    fn sample_map() -> MapData {
        let mut map = MapData::new();
        let template = LaneTemplate {
            forward_lanes: 1,
            reverse_lanes: 1,
            lane_width: 3.5,
        };
        let mut road = Road::new(RoadId(1), None, vec![Vec3::ZERO, Vec3::X * 10.0], template);
        road.link_junction = vec![JunctionId(5), JunctionId(6)];
        map.roads.create(road);
        let mut other = Road::new(RoadId(2), None, vec![Vec3::ZERO, Vec3::Z * 10.0], template);
        other.link_junction = vec![JunctionId(6)];
        map.roads.create(other);

        map.objects.create(MapObject::new(
            ObjectId(10),
            ObjectKind::Pole,
            "Pole",
            Placement::Road(RoadPlacement {
                road_id: RoadId(1),
                section_id: 0,
                lane_id: None,
                s: 2.0,
                t: 4.0,
            }),
        ));
        map.objects.create(MapObject::new(
            ObjectId(11),
            ObjectKind::TrafficLight,
            "Light",
            Placement::Pole(PolePlacement {
                pole_id: ObjectId(10),
                height: 5.0,
                offset: 1.0,
            }),
        ));
        map.objects.create(MapObject::new(
            ObjectId(12),
            ObjectKind::RoadSign,
            crate::core::object::INTERSECTION_GUIDE_LINE,
            Placement::GuideLine {
                junction_id: JunctionId(6),
                from_road: RoadId(1),
                to_road: RoadId(2),
            },
        ));
        map
    }

    #[test]
    fn junctions_of_roads_ist_dedupliziert() {
        let map = sample_map();
        let cache = map.cache();
        assert_eq!(
            cache.junctions_of_roads(&[RoadId(1), RoadId(2), RoadId(99)]),
            vec![JunctionId(5), JunctionId(6)]
        );
    }

    #[test]
    fn beziehungen_werden_aufgeloest() {
        let map = sample_map();
        let cache = map.cache();
        assert_eq!(cache.objects_on_road(RoadId(1)), vec![ObjectId(10)]);
        assert_eq!(cache.objects_on_pole(ObjectId(10)), vec![ObjectId(11)]);
        assert_eq!(cache.objects_in_junction(JunctionId(6)), vec![ObjectId(12)]);
        assert_eq!(cache.guide_lines_for_roads(&[RoadId(2)]), vec![ObjectId(12)]);
    }

    #[test]
    fn unbekannte_schluessel_sind_kein_fehler() {
        let map = sample_map();
        let cache = map.cache();
        assert!(cache.get(EntityKey::Junction(JunctionId(5))).is_none());
        assert_eq!(
            cache.get(EntityKey::Road(RoadId(2))).map(|r| r.key()),
            Some(EntityKey::Road(RoadId(2)))
        );
        assert_eq!(map.max_id(), 12);
    }
}
