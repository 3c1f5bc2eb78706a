use crate::app::state::{EditorPlugin, SelectionState};
use crate::app::use_cases::lane::LaneAttrValue;
use crate::core::{
    BoundaryMark, ControlPointSetId, Dimensions, JunctionId, LaneEndpoint, LaneLinkId, LinkRoad,
    ObjectId, ObjectKind, RoadId, TunnelRange,
};
use glam::Vec3;
use std::path::PathBuf;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    // === Kontrollpunkte & Straßen ===
    /// Punkt anhängen; ohne Satz entsteht ein neuer
    AddControlPoint {
        set_id: Option<ControlPointSetId>,
        point: Vec3,
    },
    MoveControlPoint {
        set_id: ControlPointSetId,
        index: usize,
        point: Vec3,
    },
    RemoveControlPoint {
        set_id: ControlPointSetId,
        index: usize,
    },
    /// Ganze Straße verschieben
    MoveRoad { road_id: RoadId, delta: Vec3 },
    CreateCircleRoad {
        center: Vec3,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    UpdateCircleRadius { road_id: RoadId, radius: f32 },
    /// Tunnelbereich setzen (`None` entfernt den Tunnel)
    UpdateTunnel {
        road_id: RoadId,
        tunnel: Option<TunnelRange>,
    },
    RemoveRoad { road_id: RoadId },

    // === Fahrstreifen ===
    AddLane {
        road_id: RoadId,
        section_id: u32,
        lane_id: i32,
    },
    RemoveLane {
        road_id: RoadId,
        section_id: u32,
        lane_id: i32,
    },
    UpdateLaneWidth {
        road_id: RoadId,
        section_id: u32,
        lane_id: i32,
        width: f32,
    },
    UpdateLaneAttr {
        road_id: RoadId,
        section_id: u32,
        lane_id: i32,
        value: LaneAttrValue,
    },
    UpdateLaneBoundary {
        road_id: RoadId,
        section_id: u32,
        lane_id: i32,
        boundary: BoundaryMark,
    },

    // === Kreuzungen ===
    /// Straßenenden verbinden; ohne ID entsteht eine neue Kreuzung
    ConnectLinkRoads {
        junction_id: Option<JunctionId>,
        links: Vec<LinkRoad>,
    },
    DisconnectLinkRoad {
        junction_id: JunctionId,
        road_id: RoadId,
    },
    RemoveJunction { junction_id: JunctionId },
    AddLaneLink {
        junction_id: JunctionId,
        from: LaneEndpoint,
        to: LaneEndpoint,
    },
    RemoveLaneLink {
        junction_id: JunctionId,
        link_id: LaneLinkId,
    },

    // === Objekte ===
    /// Mast, Parkfläche, Modell o.ä. in (s, t) platzieren
    AddRoadObject {
        kind: ObjectKind,
        name: String,
        road_id: RoadId,
        s: f32,
        t: f32,
    },
    AddRoadSign {
        road_id: RoadId,
        section_id: u32,
        name: String,
        s: f32,
        lane_id: Option<i32>,
    },
    AddPoleFixture {
        pole_id: ObjectId,
        kind: ObjectKind,
        name: String,
        height: f32,
        offset: f32,
    },
    AddJunctionObject {
        junction_id: JunctionId,
        kind: ObjectKind,
        name: String,
        position: Vec3,
    },
    AddGuideLine {
        junction_id: JunctionId,
        from_road: RoadId,
        to_road: RoadId,
    },
    MoveObject { object_id: ObjectId, s: f32, t: f32 },
    MoveObjectTo { object_id: ObjectId, position: Vec3 },
    MoveOnPole {
        object_id: ObjectId,
        height: f32,
        offset: f32,
    },
    RotateObject { object_id: ObjectId, yaw: f32 },
    ResizeObject { object_id: ObjectId, size: Dimensions },
    RemoveObject { object_id: ObjectId },

    // === Interaktion ===
    Select { selection: SelectionState },
    ClearSelection,
    SetPlugin { plugin: EditorPlugin },
    FocusCamera { position: Option<Vec3> },

    // === Historie ===
    Undo,
    Redo,

    // === Datei ===
    NewMap,
    LoadMap { path: PathBuf },
    SaveMap { path: PathBuf },
}

impl EditCommand {
    /// Kurzname für Logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddControlPoint { .. } => "addControlPoint",
            Self::MoveControlPoint { .. } => "moveControlPoint",
            Self::RemoveControlPoint { .. } => "removeControlPoint",
            Self::MoveRoad { .. } => "moveRoad",
            Self::CreateCircleRoad { .. } => "createCircleRoad",
            Self::UpdateCircleRadius { .. } => "updateCircleRadius",
            Self::UpdateTunnel { .. } => "updateTunnel",
            Self::RemoveRoad { .. } => "removeRoad",
            Self::AddLane { .. } => "addLane",
            Self::RemoveLane { .. } => "removeLane",
            Self::UpdateLaneWidth { .. } => "updateLaneWidth",
            Self::UpdateLaneAttr { .. } => "updateLaneAttr",
            Self::UpdateLaneBoundary { .. } => "updateLaneBoundary",
            Self::ConnectLinkRoads { .. } => "connectLinkRoads",
            Self::DisconnectLinkRoad { .. } => "disconnectLinkRoad",
            Self::RemoveJunction { .. } => "removeJunction",
            Self::AddLaneLink { .. } => "addLaneLink",
            Self::RemoveLaneLink { .. } => "removeLaneLink",
            Self::AddRoadObject { .. } => "addRoadObject",
            Self::AddRoadSign { .. } => "addRoadSign",
            Self::AddPoleFixture { .. } => "addPoleFixture",
            Self::AddJunctionObject { .. } => "addJunctionObject",
            Self::AddGuideLine { .. } => "addGuideLine",
            Self::MoveObject { .. } => "moveObject",
            Self::MoveObjectTo { .. } => "moveObjectTo",
            Self::MoveOnPole { .. } => "moveOnPole",
            Self::RotateObject { .. } => "rotateObject",
            Self::ResizeObject { .. } => "resizeObject",
            Self::RemoveObject { .. } => "removeObject",
            Self::Select { .. } => "select",
            Self::ClearSelection => "clearSelection",
            Self::SetPlugin { .. } => "setPlugin",
            Self::FocusCamera { .. } => "focusCamera",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::NewMap => "newMap",
            Self::LoadMap { .. } => "loadMap",
            Self::SaveMap { .. } => "saveMap",
        }
    }
}
