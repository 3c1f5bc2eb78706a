use crate::app::state::InteractionState;
use crate::core::MapData;
use serde::Serialize;

/// Vollständiger Zustand zum Zeitpunkt eines Records.
///
/// Liegt hinter einem `Arc` im Record; Wiederherstellen ist ein Klon der
/// typisierten Daten, der Diff läuft auf der JSON-Form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(flatten)]
    pub map: MapData,
    pub interaction: InteractionState,
}

impl Snapshot {
    /// Erfasst den aktuellen Zustand.
    pub fn capture(map: &MapData, interaction: &InteractionState) -> Self {
        Self {
            map: map.clone(),
            interaction: interaction.clone(),
        }
    }

    /// Serialisierte Form für den strukturellen Diff.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
