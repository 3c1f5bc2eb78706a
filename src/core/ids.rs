//! Typisierte IDs für alle Entitäten und der zentrale ID-Generator.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Rohwert der ID.
            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// ID einer Straße.
    RoadId,
    "road#"
);
entity_id!(
    /// ID einer Kreuzung.
    JunctionId,
    "junction#"
);
entity_id!(
    /// ID eines Objekts (Mast, Schild, Ampel, ...).
    ObjectId,
    "object#"
);
entity_id!(
    /// ID eines Kontrollpunkt-Satzes.
    ControlPointSetId,
    "cp#"
);
entity_id!(
    /// ID einer Fahrstreifen-Verknüpfung innerhalb einer Kreuzung.
    LaneLinkId,
    "lanelink#"
);

/// Erzeugt sitzungsweit eindeutige IDs für neue Entitäten.
///
/// Alle Entitätsarten teilen sich einen Zähler, damit eine ID nie doppelt
/// vergeben wird, auch nicht über Domänen hinweg.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Erstellt einen Generator, der bei 1 beginnt.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next.max(1);
        self.next = id + 1;
        id
    }

    /// Nächste Straßen-ID.
    pub fn road(&mut self) -> RoadId {
        RoadId(self.bump())
    }

    /// Nächste Kreuzungs-ID.
    pub fn junction(&mut self) -> JunctionId {
        JunctionId(self.bump())
    }

    /// Nächste Objekt-ID.
    pub fn object(&mut self) -> ObjectId {
        ObjectId(self.bump())
    }

    /// Nächste Kontrollpunkt-Satz-ID.
    pub fn control_point_set(&mut self) -> ControlPointSetId {
        ControlPointSetId(self.bump())
    }

    /// Nächste LaneLink-ID.
    pub fn lane_link(&mut self) -> LaneLinkId {
        LaneLinkId(self.bump())
    }

    /// Stellt sicher, dass künftige IDs größer als `seen` sind.
    ///
    /// Wird nach dem Laden einer Karte mit der größten vorhandenen ID aufgerufen.
    pub fn observe(&mut self, seen: u64) {
        if seen >= self.next {
            self.next = seen + 1;
        }
    }

    /// Setzt den Zähler für eine leere Karte zurück.
    pub fn reset(&mut self) {
        self.next = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_sind_domaenenuebergreifend_eindeutig() {
        let mut ids = IdGenerator::new();
        let road = ids.road();
        let junction = ids.junction();
        let object = ids.object();
        assert_eq!(road.raw(), 1);
        assert_eq!(junction.raw(), 2);
        assert_eq!(object.raw(), 3);
    }

    #[test]
    fn observe_springt_hinter_geladene_ids() {
        let mut ids = IdGenerator::new();
        ids.observe(41);
        assert_eq!(ids.road(), RoadId(42));
        // Kleinere IDs verändern den Zähler nicht
        ids.observe(5);
        assert_eq!(ids.object(), ObjectId(43));
    }

    #[test]
    fn display_enthaelt_praefix() {
        assert_eq!(RoadId(7).to_string(), "road#7");
        assert_eq!(LaneLinkId(3).to_string(), "lanelink#3");
    }
}
