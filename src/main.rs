//! HD-Map Editor Engine (Headless).
//!
//! Lädt Optionen und optional eine Kartendatei, baut den Editier-Kontext
//! gegen die protokollierende Szene auf und gibt eine Zusammenfassung aus.

use hadmap_editor::app::use_cases::file_io;
use hadmap_editor::{EditorOptions, MapEditingContext};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("hadmap-editor v{} startet...", env!("CARGO_PKG_VERSION"));

    // Optionen aus TOML laden (oder Standardwerte)
    let config_path = EditorOptions::config_path();
    let options = EditorOptions::load_from_file(&config_path);

    let (mut ctx, ledger) = MapEditingContext::headless(options);

    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        file_io::load_map_file(&mut ctx, &path)?;
    }

    let map = ctx.map();
    log::info!(
        "Karte: {} Straßen, {} Kreuzungen, {} Objekte, {} Kontrollpunkt-Sätze",
        map.roads.len(),
        map.junctions.len(),
        map.objects.len(),
        map.control_points.len()
    );
    log::info!(
        "Historie: {} Records, {} Szenen-Knoten",
        ctx.history().len(),
        ledger.live_count()
    );

    if let Err(e) = ctx.options.save_to_file(&config_path) {
        log::warn!("Optionen konnten nicht gespeichert werden: {}", e);
    }
    Ok(())
}
