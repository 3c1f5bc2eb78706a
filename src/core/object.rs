//! Objekte am Straßenrand: Masten, Schilder, Ampeln, Sensoren, Parkflächen, Modelle.

use super::ids::{JunctionId, ObjectId, RoadId};
use super::road::LaneDirection;
use super::store::Entity;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Modellname der Kreuzungs-Leitlinie.
pub const INTERSECTION_GUIDE_LINE: &str = "Intersection_Guide_Line";

/// Fahrbahnmarkierungen, die quer über die ganze Richtung laufen.
pub const CROSSING_MARKINGS: [&str; 3] = [
    "Stop_Line",
    "Crosswalk_Line",
    "Crosswalk_with_Left_and_Right_Side",
];

/// Hauptart eines Objekts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Pole,
    RoadSign,
    SignalBoard,
    TrafficLight,
    Sensor,
    Other,
    ParkingSpace,
    CustomModel,
}

impl ObjectKind {
    /// Arten, die an einem Mast befestigt werden.
    pub fn is_pole_fixture(self) -> bool {
        matches!(self, Self::SignalBoard | Self::TrafficLight | Self::Sensor)
    }

    /// Arten, deren Darstellung ein externes Asset lädt (asynchron).
    pub fn needs_asset(self) -> bool {
        matches!(
            self,
            Self::RoadSign
                | Self::SignalBoard
                | Self::TrafficLight
                | Self::Sensor
                | Self::Other
                | Self::CustomModel
        )
    }
}

/// Lage auf einer Straße in (s, t).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadPlacement {
    pub road_id: RoadId,
    pub section_id: u32,
    /// Gebundener Fahrstreifen (nur Fahrbahnmarkierungen)
    pub lane_id: Option<i32>,
    pub s: f32,
    pub t: f32,
}

/// Lage relativ zu einem Mast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolePlacement {
    pub pole_id: ObjectId,
    /// Montagehöhe am Mast
    pub height: f32,
    /// Auskragung vom Mast
    pub offset: f32,
}

/// Positionsbezug eines Objekts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Placement {
    /// Auf einer Straße in (s, t)
    Road(RoadPlacement),
    /// Am Mast befestigt
    Pole(PolePlacement),
    /// Frei in einer Kreuzung
    Junction { junction_id: JunctionId },
    /// Leitlinie zwischen zwei Straßen einer Kreuzung
    GuideLine {
        junction_id: JunctionId,
        from_road: RoadId,
        to_road: RoadId,
    },
}

/// Abmessungen eines Objekts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub length: f32,
    pub height: f32,
}

/// Objekt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Modell- bzw. Konfigurationsname
    pub name: String,
    pub placement: Placement,
    /// Drehung um die Hochachse in Radiant
    pub yaw: f32,
    /// Abgeleitete Weltposition
    pub position: Vec3,
    /// Aktuelle Größe, sobald die Darstellung einmal erzeugt wurde
    pub size: Option<Dimensions>,
    /// Originalgröße des Modells
    pub basic_size: Option<Dimensions>,
}

impl Entity for MapObject {
    type Id = ObjectId;

    fn id(&self) -> ObjectId {
        self.id
    }
}

impl MapObject {
    pub fn new(id: ObjectId, kind: ObjectKind, name: impl Into<String>, placement: Placement) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            placement,
            yaw: 0.0,
            position: Vec3::ZERO,
            size: None,
            basic_size: None,
        }
    }

    /// Straßenbezug, falls in (s, t) platziert.
    pub fn road_placement(&self) -> Option<&RoadPlacement> {
        match &self.placement {
            Placement::Road(p) => Some(p),
            _ => None,
        }
    }

    /// Mutabler Straßenbezug.
    pub fn road_placement_mut(&mut self) -> Option<&mut RoadPlacement> {
        match &mut self.placement {
            Placement::Road(p) => Some(p),
            _ => None,
        }
    }

    /// Mast, an dem das Objekt befestigt ist.
    pub fn parent_pole_id(&self) -> Option<ObjectId> {
        match self.placement {
            Placement::Pole(p) => Some(p.pole_id),
            _ => None,
        }
    }

    /// Straße, auf die sich das Objekt bezieht.
    pub fn road_id(&self) -> Option<RoadId> {
        self.road_placement().map(|p| p.road_id)
    }

    /// Kreuzung, an die das Objekt gebunden ist.
    pub fn junction_id(&self) -> Option<JunctionId> {
        match self.placement {
            Placement::Junction { junction_id } | Placement::GuideLine { junction_id, .. } => {
                Some(junction_id)
            }
            _ => None,
        }
    }

    /// Querende Markierung (Haltelinie, Zebrastreifen).
    pub fn is_crossing_marking(&self) -> bool {
        self.kind == ObjectKind::RoadSign && CROSSING_MARKINGS.contains(&self.name.as_str())
    }

    /// Fahrstreifengebundene Markierung.
    pub fn bound_lane(&self) -> Option<(u32, i32)> {
        if self.kind != ObjectKind::RoadSign {
            return None;
        }
        let placement = self.road_placement()?;
        Some((placement.section_id, placement.lane_id?))
    }

    /// Richtung des gebundenen Fahrstreifens.
    pub fn lane_direction(&self) -> Option<LaneDirection> {
        self.bound_lane()
            .and_then(|(_, lane)| LaneDirection::of_lane(lane))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(name: &str, lane: Option<i32>) -> MapObject {
        MapObject::new(
            ObjectId(1),
            ObjectKind::RoadSign,
            name,
            Placement::Road(RoadPlacement {
                road_id: RoadId(2),
                section_id: 0,
                lane_id: lane,
                s: 10.0,
                t: -1.75,
            }),
        )
    }

    #[test]
    fn querende_markierungen_werden_erkannt() {
        assert!(sign("Stop_Line", Some(-1)).is_crossing_marking());
        assert!(!sign("Straight_Arrow", Some(-1)).is_crossing_marking());
    }

    #[test]
    fn fahrstreifenbindung_nur_fuer_schilder_mit_lane() {
        assert_eq!(sign("Straight_Arrow", Some(-2)).bound_lane(), Some((0, -2)));
        assert_eq!(sign("Straight_Arrow", None).bound_lane(), None);
        assert_eq!(
            sign("Straight_Arrow", Some(2)).lane_direction(),
            Some(LaneDirection::Reverse)
        );
    }

    #[test]
    fn befestigungen_und_assets() {
        assert!(ObjectKind::TrafficLight.is_pole_fixture());
        assert!(!ObjectKind::Pole.is_pole_fixture());
        assert!(!ObjectKind::ParkingSpace.needs_asset());
        assert!(ObjectKind::CustomModel.needs_asset());
    }

    #[test]
    fn placement_serialisiert_mit_tag() {
        let obj = sign("Stop_Line", Some(-1));
        let json = serde_json::to_value(&obj).expect("serialisierbar");
        assert_eq!(json["placement"]["kind"], "road");
        assert_eq!(json["kind"], "roadSign");
    }
}
