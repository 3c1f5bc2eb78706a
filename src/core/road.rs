//! Straßen mit Sections, Fahrstreifen und Referenzlinie.
//!
//! Fahrstreifen-IDs folgen der üblichen Konvention: negative IDs fahren in
//! Kurvenrichtung (vorwärts), positive IDs entgegen (rückwärts). Betragsmäßig
//! kleinere IDs liegen näher an der Referenzlinie.

use super::curve::{CatmullRomLine, ReferenceLine};
use super::ids::{ControlPointSetId, JunctionId, RoadId};
use super::store::Entity;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Anzahl der Abtastpunkte pro Kontrollpunkt-Segment der Referenzlinie.
pub const CURVE_SAMPLES_PER_SEGMENT: usize = 20;

/// Fahrtrichtung eines Fahrstreifens relativ zur Referenzlinie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaneDirection {
    /// In Kurvenrichtung (negative Fahrstreifen-IDs)
    Forward,
    /// Entgegen der Kurvenrichtung (positive Fahrstreifen-IDs)
    Reverse,
}

impl LaneDirection {
    /// Richtung einer Fahrstreifen-ID. `None` für die Mittellinie (0).
    pub fn of_lane(lane_id: i32) -> Option<Self> {
        match lane_id {
            id if id < 0 => Some(Self::Forward),
            id if id > 0 => Some(Self::Reverse),
            _ => None,
        }
    }

    /// Vorzeichen der Fahrstreifen-IDs in dieser Richtung.
    pub fn sign(self) -> i32 {
        match self {
            Self::Forward => -1,
            Self::Reverse => 1,
        }
    }
}

/// Nutzungsart eines Fahrstreifens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaneType {
    #[default]
    Driving,
    Shoulder,
    Border,
    Sidewalk,
    Biking,
    Parking,
    Median,
}

impl LaneType {
    /// Standard-Reibwert je Fahrstreifen-Art.
    pub fn default_friction(self) -> f32 {
        match self {
            Self::Driving | Self::Parking => 1.0,
            Self::Biking | Self::Sidewalk => 0.8,
            Self::Shoulder | Self::Border | Self::Median => 0.6,
        }
    }
}

/// Markierung der äußeren Begrenzung eines Fahrstreifens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundaryMark {
    #[default]
    SingleDashWhite,
    SingleSolidWhite,
    SingleSolidYellow,
    DoubleSolidYellow,
    None,
}

/// Einzelner Fahrstreifen einer Section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    /// Vorzeichenbehaftete ID (siehe Modul-Doku)
    pub id: i32,
    /// Breite in Metern
    pub width: f32,
    pub lane_type: LaneType,
    /// Markierung der äußeren Begrenzung
    pub boundary: BoundaryMark,
    /// Geschwindigkeitsbegrenzung in km/h
    pub speed_limit: f32,
    pub friction: f32,
    pub s_offset: f32,
}

impl Lane {
    /// Standard-Fahrstreifen mit gegebener ID und Breite.
    pub fn new(id: i32, width: f32) -> Self {
        Self {
            id,
            width,
            lane_type: LaneType::Driving,
            boundary: BoundaryMark::default(),
            speed_limit: 50.0,
            friction: LaneType::Driving.default_friction(),
            s_offset: 0.0,
        }
    }

    /// Richtung des Fahrstreifens.
    pub fn direction(&self) -> Option<LaneDirection> {
        LaneDirection::of_lane(self.id)
    }
}

/// Längsabschnitt einer Straße mit eigener Fahrstreifen-Aufteilung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: u32,
    /// Beginn als Anteil der Straßenlänge
    pub p_start: f32,
    /// Ende als Anteil der Straßenlänge
    pub p_end: f32,
    pub lanes: Vec<Lane>,
}

impl Section {
    /// Fahrstreifen per ID.
    pub fn lane(&self, lane_id: i32) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.id == lane_id)
    }

    fn lane_mut(&mut self, lane_id: i32) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|l| l.id == lane_id)
    }

    /// Fahrstreifen einer Richtung, von innen nach außen sortiert.
    pub fn lanes_in(&self, direction: LaneDirection) -> Vec<&Lane> {
        let mut lanes: Vec<&Lane> = self
            .lanes
            .iter()
            .filter(|l| l.direction() == Some(direction))
            .collect();
        lanes.sort_by_key(|l| l.id.abs());
        lanes
    }

    /// Summe der Fahrstreifenbreiten einer Richtung.
    pub fn direction_width(&self, direction: LaneDirection) -> f32 {
        self.lanes_in(direction).iter().map(|l| l.width).sum()
    }

    /// Lateraler Abstand der Fahrstreifenmitte zur Referenzlinie.
    ///
    /// Vorwärts-Fahrstreifen liegen rechts (negatives t), Rückwärts-Fahrstreifen links.
    pub fn lane_center_t(&self, lane_id: i32) -> Option<f32> {
        let direction = LaneDirection::of_lane(lane_id)?;
        let target = self.lane(lane_id)?;
        let inner: f32 = self
            .lanes_in(direction)
            .iter()
            .filter(|l| l.id.abs() < lane_id.abs())
            .map(|l| l.width)
            .sum();
        Some(direction.sign() as f32 * (inner + target.width / 2.0))
    }

    fn sort_lanes(&mut self) {
        // Vorwärts von innen nach außen, danach rückwärts von innen nach außen
        self.lanes.sort_by_key(|l| (l.id > 0, l.id.abs()));
    }
}

/// Straßenart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoadType {
    #[default]
    Default,
    Tunnel,
}

/// Tunnelbereich entlang der Straße.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TunnelRange {
    /// Beginn (Bogenlänge)
    pub s: f32,
    pub length: f32,
}

/// Parameter einer Kreis-Straße.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleParams {
    pub center: Vec3,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

/// Ende einer Straße.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoadEnd {
    Start,
    End,
}

impl RoadEnd {
    /// Kurvenparameter des Endes.
    pub fn u(self) -> f32 {
        match self {
            Self::Start => 0.0,
            Self::End => 1.0,
        }
    }
}

/// Vorlage für neu erzeugte Straßen.
#[derive(Debug, Clone, Copy)]
pub struct LaneTemplate {
    pub forward_lanes: u32,
    pub reverse_lanes: u32,
    pub lane_width: f32,
}

/// Straße: Referenzlinie plus Fahrstreifen-Sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Road {
    pub id: RoadId,
    /// Kontrollpunkt-Satz, aus dem die Referenzlinie entsteht
    pub control_point_set: Option<ControlPointSetId>,
    pub key_path_control_points: Vec<Vec3>,
    pub sections: Vec<Section>,
    /// Kreuzungen, an die die Straße angeschlossen ist
    pub link_junction: Vec<JunctionId>,
    pub road_type: RoadType,
    pub tunnel: Option<TunnelRange>,
    pub is_circle_road: bool,
    pub circle: Option<CircleParams>,
    /// Abgeleitete Länge der Referenzlinie
    pub length: f32,
}

impl Entity for Road {
    type Id = RoadId;

    fn id(&self) -> RoadId {
        self.id
    }
}

impl Road {
    /// Erstellt eine Straße mit einer Section über die volle Länge.
    pub fn new(
        id: RoadId,
        control_point_set: Option<ControlPointSetId>,
        key_path: Vec<Vec3>,
        template: LaneTemplate,
    ) -> Self {
        let forward = (1..=template.forward_lanes as i32).map(|i| Lane::new(-i, template.lane_width));
        let reverse = (1..=template.reverse_lanes as i32).map(|i| Lane::new(i, template.lane_width));
        let mut road = Self {
            id,
            control_point_set,
            key_path_control_points: key_path,
            sections: vec![Section {
                id: 0,
                p_start: 0.0,
                p_end: 1.0,
                lanes: forward.chain(reverse).collect(),
            }],
            link_junction: Vec::new(),
            road_type: RoadType::Default,
            tunnel: None,
            is_circle_road: false,
            circle: None,
            length: 0.0,
        };
        road.refresh_geometry();
        road
    }

    /// Baut die Referenzlinie aus den Kontrollpunkten.
    pub fn reference_line(&self) -> CatmullRomLine {
        CatmullRomLine::new(&self.key_path_control_points, CURVE_SAMPLES_PER_SEGMENT)
    }

    /// Berechnet die abgeleitete Länge neu und passt den Tunnelbereich an.
    pub fn refresh_geometry(&mut self) {
        self.length = self.reference_line().length();
        if let Some(tunnel) = self.tunnel.as_mut() {
            tunnel.s = tunnel.s.clamp(0.0, self.length);
            tunnel.length = tunnel.length.clamp(0.0, self.length - tunnel.s);
        }
    }

    /// Section per ID.
    pub fn section(&self, section_id: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    fn section_mut(&mut self, section_id: u32) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    /// Fahrstreifen per Section- und Fahrstreifen-ID.
    pub fn lane(&self, section_id: u32, lane_id: i32) -> Option<&Lane> {
        self.section(section_id)?.lane(lane_id)
    }

    /// Mutable Referenz auf einen Fahrstreifen.
    pub fn lane_mut(&mut self, section_id: u32, lane_id: i32) -> Option<&mut Lane> {
        self.section_mut(section_id)?.lane_mut(lane_id)
    }

    /// Section am Ende der Straße (für Kreuzungsanschlüsse).
    pub fn end_section(&self, end: RoadEnd) -> Option<&Section> {
        match end {
            RoadEnd::Start => self.sections.first(),
            RoadEnd::End => self.sections.last(),
        }
    }

    /// Section, die die Bogenlänge `s` enthält.
    pub fn section_at(&self, s: f32) -> Option<&Section> {
        let p = if self.length > f32::EPSILON {
            (s / self.length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.sections
            .iter()
            .find(|sec| p >= sec.p_start && p <= sec.p_end)
            .or_else(|| self.sections.last())
    }

    /// Fügt außen neben `lane_id` einen Fahrstreifen mit dessen Attributen ein.
    ///
    /// Alle weiter außen liegenden Fahrstreifen rücken um eine ID nach außen.
    /// Gibt die ID des neuen Fahrstreifens zurück.
    pub fn add_lane(&mut self, section_id: u32, lane_id: i32) -> Option<i32> {
        let direction = LaneDirection::of_lane(lane_id)?;
        let section = self.section_mut(section_id)?;
        let mut new_lane = section.lane(lane_id)?.clone();
        let new_id = lane_id + direction.sign();
        for lane in section.lanes.iter_mut() {
            if lane.direction() == Some(direction) && lane.id.abs() > lane_id.abs() {
                lane.id += direction.sign();
            }
        }
        new_lane.id = new_id;
        new_lane.friction = new_lane.lane_type.default_friction();
        new_lane.s_offset = 0.0;
        section.lanes.push(new_lane);
        section.sort_lanes();
        Some(new_id)
    }

    /// Entfernt einen Fahrstreifen; äußere Fahrstreifen rücken nach innen.
    pub fn remove_lane(&mut self, section_id: u32, lane_id: i32) -> Result<Lane, LaneEditRejection> {
        let direction = LaneDirection::of_lane(lane_id).ok_or(LaneEditRejection::LaneNotFound)?;
        let section = self
            .section_mut(section_id)
            .ok_or(LaneEditRejection::LaneNotFound)?;
        let index = section
            .lanes
            .iter()
            .position(|l| l.id == lane_id)
            .ok_or(LaneEditRejection::LaneNotFound)?;
        if section.lanes_in(direction).len() <= 1 {
            return Err(LaneEditRejection::LastLaneInDirection);
        }
        let removed = section.lanes.remove(index);
        for lane in section.lanes.iter_mut() {
            if lane.direction() == Some(direction) && lane.id.abs() > lane_id.abs() {
                lane.id -= direction.sign();
            }
        }
        section.sort_lanes();
        Ok(removed)
    }

    /// Setzt die Fahrstreifenbreite, begrenzt auf `[min, max]`.
    ///
    /// Gibt die tatsächlich gesetzte Breite zurück.
    pub fn update_lane_width(
        &mut self,
        section_id: u32,
        lane_id: i32,
        width: f32,
        min: f32,
        max: f32,
    ) -> Option<f32> {
        let lane = self.lane_mut(section_id, lane_id)?;
        lane.width = width.clamp(min, max);
        Some(lane.width)
    }

    /// Lateraler Offset der Fahrstreifenmitte (siehe [`Section::lane_center_t`]).
    pub fn lane_center_t(&self, section_id: u32, lane_id: i32) -> Option<f32> {
        self.section(section_id)?.lane_center_t(lane_id)
    }

    /// Gesamtbreite einer Richtung in einer Section.
    pub fn direction_width(&self, section_id: u32, direction: LaneDirection) -> f32 {
        self.section(section_id)
            .map(|s| s.direction_width(direction))
            .unwrap_or(0.0)
    }

    /// Weltposition zu (s, t).
    pub fn world_position(&self, s: f32, t: f32) -> Vec3 {
        self.reference_line().position_at_st(s, t)
    }

    /// Punkt und Tangente am Straßenende.
    pub fn end_pose(&self, end: RoadEnd) -> (Vec3, Vec3) {
        let line = self.reference_line();
        (line.point_at(end.u()), line.tangent_at(end.u()))
    }

    /// Entfernt die Kreuzungs-Referenz. `true`, wenn sie vorhanden war.
    pub fn unlink_junction(&mut self, junction_id: JunctionId) -> bool {
        let before = self.link_junction.len();
        self.link_junction.retain(|id| *id != junction_id);
        before != self.link_junction.len()
    }

    /// Fügt eine Kreuzungs-Referenz hinzu (ohne Duplikate).
    pub fn link_to_junction(&mut self, junction_id: JunctionId) {
        if !self.link_junction.contains(&junction_id) {
            self.link_junction.push(junction_id);
        }
    }
}

/// Grund, warum eine Fahrstreifen-Änderung abgelehnt wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneEditRejection {
    LaneNotFound,
    LastLaneInDirection,
}
