use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::SelectionState;

/// Aktives Editier-Plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorPlugin {
    /// Straßen über Kontrollpunkte zeichnen
    #[default]
    EditRoad,
    /// Fahrstreifen-Anzahl und -Breite bearbeiten
    EditLane,
    /// Kreuzungen verbinden und LaneLinks bearbeiten
    EditJunction,
    /// Objekte platzieren
    EditObject,
    /// Tunnel-Bereiche bearbeiten
    EditTunnel,
    /// Kreis-Straßen anlegen
    EditCircleRoad,
}

/// Interaktionszustand, der in jedem History-Snapshot mitgespeichert wird.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    pub selection: SelectionState,
    pub plugin: EditorPlugin,
    /// Kamera-Fokuspunkt
    pub camera_focus: Option<Vec3>,
}
