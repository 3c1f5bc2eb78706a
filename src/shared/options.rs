//! Zentrale Konfiguration der Editier-Engine.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::LaneTemplate;
use serde::{Deserialize, Serialize};

// ── History ─────────────────────────────────────────────────────────

/// Maximale Anzahl an History-Einträgen mit vollständigem Snapshot.
pub const HISTORY_LIMIT: usize = 40;

// ── Fahrstreifen ────────────────────────────────────────────────────

/// Standard-Fahrstreifenbreite in Metern.
pub const DEFAULT_LANE_WIDTH: f32 = 3.5;
/// Minimale Fahrstreifenbreite in Metern.
pub const MIN_LANE_WIDTH: f32 = 0.4;
/// Maximale Fahrstreifenbreite in Metern.
pub const MAX_LANE_WIDTH: f32 = 99.0;
/// Fahrstreifen in Kurvenrichtung bei neuen Straßen.
pub const DEFAULT_FORWARD_LANES: u32 = 2;
/// Fahrstreifen entgegen der Kurvenrichtung bei neuen Straßen.
pub const DEFAULT_REVERSE_LANES: u32 = 2;

// ── Kreis-Straßen ───────────────────────────────────────────────────

/// Kontrollpunkte pro vollem Kreisumlauf.
pub const CIRCLE_SEGMENTS: usize = 16;

// ── Protokoll ───────────────────────────────────────────────────────

/// Maximale Einträge im Operations-Log.
pub const OPERATION_LOG_LIMIT: usize = 1000;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `hadmap_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    // ── History ─────────────────────────────────────────────────
    /// Anzahl der Einträge, deren Snapshot erhalten bleibt
    pub history_limit: usize,

    // ── Fahrstreifen ────────────────────────────────────────────
    /// Breite neuer Fahrstreifen
    pub default_lane_width: f32,
    /// Untergrenze für Breitenänderungen
    pub min_lane_width: f32,
    /// Obergrenze für Breitenänderungen
    pub max_lane_width: f32,
    /// Vorwärts-Fahrstreifen neuer Straßen
    pub default_forward_lanes: u32,
    /// Rückwärts-Fahrstreifen neuer Straßen
    pub default_reverse_lanes: u32,

    // ── Sonstiges ───────────────────────────────────────────────
    /// Kontrollpunkte pro Kreisumlauf
    pub circle_segments: usize,
    /// Kapazität des Operations-Logs
    pub operation_log_limit: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            default_lane_width: DEFAULT_LANE_WIDTH,
            min_lane_width: MIN_LANE_WIDTH,
            max_lane_width: MAX_LANE_WIDTH,
            default_forward_lanes: DEFAULT_FORWARD_LANES,
            default_reverse_lanes: DEFAULT_REVERSE_LANES,
            circle_segments: CIRCLE_SEGMENTS,
            operation_log_limit: OPERATION_LOG_LIMIT,
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Fallback auf Default bei Fehler.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("hadmap_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("hadmap_editor.toml")
    }

    /// Fahrstreifen-Vorlage für neue Straßen.
    pub fn lane_template(&self) -> LaneTemplate {
        LaneTemplate {
            forward_lanes: self.default_forward_lanes.max(1),
            reverse_lanes: self.default_reverse_lanes,
            lane_width: self.default_lane_width,
        }
    }

    /// Begrenzt eine Breite auf den erlaubten Bereich.
    pub fn clamp_lane_width(&self, width: f32) -> f32 {
        width.clamp(self.min_lane_width, self.max_lane_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teilweise_toml_faellt_auf_defaults_zurueck() {
        let opts: EditorOptions = toml::from_str("history_limit = 10\n").expect("gültiges TOML");
        assert_eq!(opts.history_limit, 10);
        assert_eq!(opts.default_lane_width, DEFAULT_LANE_WIDTH);
    }

    #[test]
    fn roundtrip_ueber_datei() {
        let dir = std::env::temp_dir().join(format!("hadmap_opts_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Temp-Verzeichnis");
        let path = dir.join("opts.toml");
        let opts = EditorOptions {
            max_lane_width: 12.0,
            ..EditorOptions::default()
        };
        opts.save_to_file(&path).expect("speichern sollte funktionieren");
        assert_eq!(EditorOptions::load_from_file(&path), opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn fehlende_datei_liefert_defaults() {
        let opts = EditorOptions::load_from_file(std::path::Path::new("/nonexistent/x.toml"));
        assert_eq!(opts, EditorOptions::default());
    }

    #[test]
    fn breite_wird_begrenzt() {
        let opts = EditorOptions::default();
        assert_eq!(opts.clamp_lane_width(0.0), MIN_LANE_WIDTH);
        assert_eq!(opts.clamp_lane_width(3.0), 3.0);
    }
}
