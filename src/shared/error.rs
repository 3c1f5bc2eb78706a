//! Fehlertypen der Editier-Engine.

use crate::core::{ControlPointSetId, JunctionId, ObjectId, ObjectKind, RoadId};

/// Abgelehnte Editier-Aktion. Der Zustand bleibt in diesem Fall unverändert.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// Straße nicht im Store
    #[error("Straße {0} existiert nicht")]
    RoadNotFound(RoadId),

    /// Kreuzung nicht im Store
    #[error("Kreuzung {0} existiert nicht")]
    JunctionNotFound(JunctionId),

    /// Objekt nicht im Store
    #[error("Objekt {0} existiert nicht")]
    ObjectNotFound(ObjectId),

    /// Kontrollpunkt-Satz nicht vorhanden
    #[error("Kontrollpunkt-Satz {0} existiert nicht")]
    ControlPointSetNotFound(ControlPointSetId),

    /// Index außerhalb der Kontrollpunkt-Liste
    #[error("Kontrollpunkt {index} existiert nicht in {set}")]
    ControlPointOutOfRange {
        /// Betroffener Satz
        set: ControlPointSetId,
        /// Angefragter Index
        index: usize,
    },

    /// Section oder Fahrstreifen nicht gefunden
    #[error("Fahrstreifen {lane} in Section {section} von {road} existiert nicht")]
    LaneNotFound {
        /// Straße
        road: RoadId,
        /// Section-ID
        section: u32,
        /// Fahrstreifen-ID
        lane: i32,
    },

    /// Operation nur für Kreisstraßen
    #[error("Straße {0} ist keine Kreisstraße")]
    NotACircleRoad(RoadId),

    /// Der letzte Fahrstreifen einer Richtung darf nicht entfernt werden
    #[error("Letzter Fahrstreifen der Richtung in {road} kann nicht entfernt werden")]
    LastLaneInDirection {
        /// Straße
        road: RoadId,
    },

    /// Ungültige Fahrstreifen-Verknüpfung in einer Kreuzung
    #[error("Ungültige LaneLink in {junction}: {reason}")]
    InvalidLaneLink {
        /// Kreuzung
        junction: JunctionId,
        /// Grund der Ablehnung
        reason: &'static str,
    },

    /// Unzulässige Kreuzungs-Verbindung
    #[error("Unzulässige Kreuzungs-Verbindung: {0}")]
    IllegalJunctionConnection(String),

    /// Befestigung ohne gültigen Mast
    #[error("Objekt {0} ist kein Mast")]
    PoleRequired(ObjectId),

    /// Objektart passt nicht zur Operation
    #[error("Operation für Objekt {0} nicht zulässig")]
    UnsupportedObjectOperation(ObjectId),

    /// Objektart kann so nicht platziert werden
    #[error("Objektart {0:?} kann hier nicht platziert werden")]
    UnsupportedObjectKind(ObjectKind),
}

/// Abgelehntes Undo/Redo.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    /// Kein früherer Eintrag vorhanden
    #[error("Nichts zum Rückgängigmachen")]
    NothingToUndo,

    /// Kein späterer Eintrag vorhanden
    #[error("Nichts zum Wiederherstellen")]
    NothingToRedo,

    /// Ziel-Eintrag wurde wegen Speicherlimit verworfen
    #[error("Eintrag \"{title}\" überschreitet das Speicherlimit und kann nicht wiederhergestellt werden")]
    StorageLimitExceeded {
        /// Titel des verworfenen Eintrags
        title: String,
    },

    /// Undo/Redo während einer offenen Arbeitseinheit
    #[error("Undo/Redo während laufender Operation nicht möglich")]
    UnitOfWorkOpen,
}
