//! Handler für Selektion, Plugin-Wechsel und Kamera-Fokus.
//!
//! Änderungen am Interaktionszustand erzeugen keinen eigenen Record; sie
//! reisen mit dem nächsten Snapshot.

use crate::app::context::MapEditingContext;
use crate::app::state::{EditorPlugin, SelectionState};
use glam::Vec3;

/// Übernimmt eine neue Selektion.
pub fn select(ctx: &mut MapEditingContext, selection: SelectionState) {
    ctx.update_interaction(|interaction| interaction.selection = selection);
}

/// Hebt die Selektion auf.
pub fn clear(ctx: &mut MapEditingContext) {
    ctx.update_interaction(|interaction| interaction.selection.clear());
}

/// Wechselt das aktive Plugin; die Selektion bleibt nur innerhalb eines Plugins.
pub fn set_plugin(ctx: &mut MapEditingContext, plugin: EditorPlugin) {
    if ctx.interaction.plugin == plugin {
        return;
    }
    log::info!("Plugin gewechselt: {:?}", plugin);
    ctx.update_interaction(|interaction| {
        interaction.plugin = plugin;
        interaction.selection.clear();
    });
}

/// Setzt den Kamera-Fokus.
pub fn focus_camera(ctx: &mut MapEditingContext, position: Option<Vec3>) {
    ctx.update_interaction(|interaction| interaction.camera_focus = position);
}
