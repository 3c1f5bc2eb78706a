//! Kontrollpunkt-Sätze, aus denen Straßen entstehen.

use super::ids::{ControlPointSetId, RoadId};
use super::store::Entity;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Mindestanzahl an Punkten, ab der eine Straße existiert.
pub const MIN_POINTS_FOR_ROAD: usize = 2;

/// Geordnete Referenzpunkte einer Straße.
///
/// Mit weniger als zwei Punkten ist der Satz verwaist (noch keine Straße).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPointSet {
    pub id: ControlPointSetId,
    pub points: Vec<Vec3>,
    /// Materialisierte Straße
    pub road_id: Option<RoadId>,
}

impl Entity for ControlPointSet {
    type Id = ControlPointSetId;

    fn id(&self) -> ControlPointSetId {
        self.id
    }
}

impl ControlPointSet {
    pub fn new(id: ControlPointSetId, points: Vec<Vec3>) -> Self {
        Self {
            id,
            points,
            road_id: None,
        }
    }

    /// Verwaist: zu wenige Punkte für eine Straße.
    pub fn is_orphan(&self) -> bool {
        self.points.len() < MIN_POINTS_FOR_ROAD
    }

    /// Verschiebt alle Punkte um `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        for p in self.points.iter_mut() {
            *p += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zwei_punkte_sind_nicht_verwaist() {
        let mut set = ControlPointSet::new(ControlPointSetId(1), vec![Vec3::ZERO]);
        assert!(set.is_orphan());
        set.points.push(Vec3::X);
        assert!(!set.is_orphan());
    }

    #[test]
    fn translate_verschiebt_alle_punkte() {
        let mut set = ControlPointSet::new(ControlPointSetId(1), vec![Vec3::ZERO, Vec3::X]);
        set.translate(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(set.points, vec![Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 2.0)]);
    }
}
