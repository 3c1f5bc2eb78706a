//! `OperationApplied`: Ereignis nach jeder festgeschriebenen Store-Mutation.

use crate::core::{
    ControlPointSet, ControlPointSetId, EntityKey, Junction, JunctionId, LaneLinkId, MapObject,
    ObjectId, Road, RoadId,
};

/// Domäne, deren Store mutiert wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Road,
    Junction,
    Object,
    ControlPoint,
}

/// Welches Fahrstreifen-Attribut geändert wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneAttr {
    SpeedLimit,
    Friction,
    SOffset,
    /// Fahrstreifen-Art (ändert die Darstellung)
    LaneType,
}

/// Art der Neupositionierung eines Objekts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reposition {
    /// Nur Transformation übernehmen
    Move,
    /// Darstellung neu aufbauen (Geometrie hängt von der Straße ab)
    Recreate,
}

/// Ausgeführte Operation samt Argumenten.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    // === Straßen ===
    CreateRoad { road_id: RoadId },
    RemoveRoad { road_id: RoadId },
    AddLane { road_id: RoadId, section_id: u32, lane_id: i32 },
    RemoveLane { road_id: RoadId, section_id: u32, lane_id: i32 },
    UpdateLaneWidth { road_id: RoadId, section_id: u32, lane_id: i32 },
    UpdateLaneAttr { road_id: RoadId, attr: LaneAttr },
    UpdateLaneBoundary { road_id: RoadId },
    /// Referenzlinie geändert (Kontrollpunkte, Kreisradius)
    UpdateRoadGeometry { road_id: RoadId },
    UpdateTunnel { road_id: RoadId },

    // === Kreuzungen ===
    ConnectLinkRoads { junction_id: JunctionId, created: bool },
    DisconnectLinkRoad { junction_id: JunctionId, road_id: RoadId },
    /// Neuableitung als Teil einer Kaskade
    UpdateJunction { junction_id: JunctionId },
    RemoveJunction { junction_id: JunctionId },
    AddLaneLink { junction_id: JunctionId, link_id: LaneLinkId },
    RemoveLaneLink { junction_id: JunctionId, link_id: LaneLinkId },

    // === Objekte ===
    AddObject { object_id: ObjectId },
    MoveObject { object_id: ObjectId, mode: Reposition },
    RotateObject { object_id: ObjectId },
    ResizeObject { object_id: ObjectId },
    RemoveObject { object_id: ObjectId },

    // === Kontrollpunkte ===
    UpdateControlPoints { set_id: ControlPointSetId },
    RemoveControlPoints { set_id: ControlPointSetId },

    // === Wiederherstellung ===
    /// Undo/Redo: Collection aus Snapshot übernommen
    ApplyState { keys: Vec<EntityKey> },
    /// Karte geladen: alle Entitäten neu aufbauen
    ApplyMapFileState,
}

impl Operation {
    /// Kurzname für Logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoad { .. } => "createRoad",
            Self::RemoveRoad { .. } => "removeRoad",
            Self::AddLane { .. } => "addLane",
            Self::RemoveLane { .. } => "removeLane",
            Self::UpdateLaneWidth { .. } => "updateLaneWidth",
            Self::UpdateLaneAttr { .. } => "updateLaneAttr",
            Self::UpdateLaneBoundary { .. } => "updateLaneBoundary",
            Self::UpdateRoadGeometry { .. } => "updateRoadGeometry",
            Self::UpdateTunnel { .. } => "updateTunnel",
            Self::ConnectLinkRoads { .. } => "connectLinkRoads",
            Self::DisconnectLinkRoad { .. } => "disconnectLinkRoad",
            Self::UpdateJunction { .. } => "updateJunction",
            Self::RemoveJunction { .. } => "removeJunction",
            Self::AddLaneLink { .. } => "addLaneLink",
            Self::RemoveLaneLink { .. } => "removeLaneLink",
            Self::AddObject { .. } => "addObject",
            Self::MoveObject { .. } => "moveObject",
            Self::RotateObject { .. } => "rotateObject",
            Self::ResizeObject { .. } => "resizeObject",
            Self::RemoveObject { .. } => "removeObject",
            Self::UpdateControlPoints { .. } => "updateControlPoints",
            Self::RemoveControlPoints { .. } => "removeControlPoints",
            Self::ApplyState { .. } => "applyState",
            Self::ApplyMapFileState => "applyMapFileState",
        }
    }
}

/// Entfernte Entität als Ergebnis einer Operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Removed {
    Road(Box<Road>),
    Junction(Box<Junction>),
    Object(Box<MapObject>),
    ControlPoints(Box<ControlPointSet>),
}

/// Ergebnis einer Operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OperationResult {
    #[default]
    Applied,
    Removed(Removed),
}

/// Ereignis nach einer erfolgreichen Mutation.
///
/// Abgelehnte Aktionen erzeugen kein Ereignis.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationApplied {
    pub domain: Domain,
    pub operation: Operation,
    pub result: OperationResult,
}

impl OperationApplied {
    /// Ereignis ohne besonderes Ergebnis.
    pub fn new(domain: Domain, operation: Operation) -> Self {
        Self {
            domain,
            operation,
            result: OperationResult::Applied,
        }
    }

    /// Ereignis mit entfernter Entität.
    pub fn removed(domain: Domain, operation: Operation, removed: Removed) -> Self {
        Self {
            domain,
            operation,
            result: OperationResult::Removed(removed),
        }
    }
}
