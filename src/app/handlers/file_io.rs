//! Handler für Datei-Operationen (Neu, Öffnen, Speichern).

use crate::app::context::MapEditingContext;
use crate::app::use_cases;
use std::path::Path;

/// Beginnt eine leere Karte.
pub fn new_map(ctx: &mut MapEditingContext) {
    use_cases::file_io::new_map(ctx);
}

/// Lädt eine Karte aus dem übergebenen Pfad.
pub fn load(ctx: &mut MapEditingContext, path: &Path) -> anyhow::Result<()> {
    use_cases::file_io::load_map_file(ctx, path)
}

/// Speichert die Karte unter dem übergebenen Pfad.
pub fn save(ctx: &mut MapEditingContext, path: &Path) -> anyhow::Result<()> {
    use_cases::file_io::save_map_file(ctx, path)
}
