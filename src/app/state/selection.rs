use crate::core::{ControlPointSetId, EntityKey, JunctionId, MapData, ObjectId, RoadId};
use serde::{Deserialize, Serialize};

/// Selektierter Fahrstreifen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneSelection {
    pub road_id: RoadId,
    pub section_id: u32,
    pub lane_id: i32,
}

/// Auswahlbezogener Zustand; reist mit jedem Undo-Schritt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub road: Option<RoadId>,
    pub lane: Option<LaneSelection>,
    pub junction: Option<JunctionId>,
    /// Selektierte Objekte in Auswahlreihenfolge
    pub objects: Vec<ObjectId>,
    pub control_point_set: Option<ControlPointSetId>,
}

impl SelectionState {
    /// Erstellt einen leeren Selektionszustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hebt jede Auswahl auf.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Entfernt Verweise auf nicht mehr existierende Entitäten.
    pub fn prune(&mut self, map: &MapData) {
        let cache = map.cache();
        if self.road.is_some_and(|id| cache.road(id).is_none()) {
            self.road = None;
        }
        if self
            .lane
            .is_some_and(|l| cache.road(l.road_id).and_then(|r| r.lane(l.section_id, l.lane_id)).is_none())
        {
            self.lane = None;
        }
        if self.junction.is_some_and(|id| cache.junction(id).is_none()) {
            self.junction = None;
        }
        self.objects.retain(|id| cache.object(*id).is_some());
        if self
            .control_point_set
            .is_some_and(|id| !cache.contains(EntityKey::ControlPoints(id)))
        {
            self.control_point_set = None;
        }
    }

    /// Szenen-Schlüssel aller selektierten Entitäten.
    pub fn keys(&self) -> Vec<EntityKey> {
        let mut keys = Vec::new();
        if let Some(id) = self.road {
            keys.push(EntityKey::Road(id));
        }
        if let Some(id) = self.junction {
            keys.push(EntityKey::Junction(id));
        }
        keys.extend(self.objects.iter().map(|id| EntityKey::Object(*id)));
        if let Some(id) = self.control_point_set {
            keys.push(EntityKey::ControlPoints(id));
        }
        keys
    }

    /// `true`, wenn nichts selektiert ist.
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty() && self.lane.is_none()
    }
}
