//! Gesamter Entitätsbestand einer Karte.

use super::cache::EntityCache;
use super::control_point::ControlPointSet;
use super::junction::Junction;
use super::object::MapObject;
use super::road::Road;
use super::store::EntityStore;
use serde::{Deserialize, Serialize};

/// Alle Collections einer Karte.
///
/// Nur die Aktionen der jeweiligen Domäne mutieren ihre Collection; gelesen
/// wird übergreifend über [`EntityCache`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub roads: EntityStore<Road>,
    pub junctions: EntityStore<Junction>,
    pub objects: EntityStore<MapObject>,
    pub control_points: EntityStore<ControlPointSet>,
}

impl MapData {
    /// Leere Karte.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lesender Zugriff über alle Collections.
    pub fn cache(&self) -> EntityCache<'_> {
        EntityCache::new(self)
    }

    /// Leert alle Collections in einem Schritt.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Größte vergebene ID über alle Collections.
    pub fn max_id(&self) -> u64 {
        let roads = self.roads.ids().map(|id| id.raw());
        let junctions = self.junctions.ids().map(|id| id.raw());
        let objects = self.objects.ids().map(|id| id.raw());
        let sets = self.control_points.ids().map(|id| id.raw());
        let links = self
            .junctions
            .iter()
            .flat_map(|j| j.lane_links.iter().map(|l| l.id.raw()));
        roads
            .chain(junctions)
            .chain(objects)
            .chain(sets)
            .chain(links)
            .max()
            .unwrap_or(0)
    }

    /// Anzahl aller Entitäten (ohne Kontrollpunkte).
    pub fn entity_count(&self) -> usize {
        self.roads.len() + self.junctions.len() + self.objects.len()
    }
}
