//! Handler für Undo/Redo-Operationen.

use crate::app::context::MapEditingContext;
use crate::shared::HistoryError;

/// Titel des aktuell angezeigten Records.
fn displayed_title(ctx: &MapEditingContext) -> Option<String> {
    let position = ctx.history().position()?;
    ctx.history()
        .records()
        .get(position)
        .map(|record| record.title.clone())
}

/// Führt einen Undo-Schritt aus.
pub fn undo(ctx: &mut MapEditingContext) -> Result<(), HistoryError> {
    let title = displayed_title(ctx);
    ctx.undo()?;
    ctx.status_message = title.map(|title| format!("Rückgängig: {}", title));
    Ok(())
}

/// Führt einen Redo-Schritt aus.
pub fn redo(ctx: &mut MapEditingContext) -> Result<(), HistoryError> {
    ctx.redo()?;
    ctx.status_message = displayed_title(ctx).map(|title| format!("Wiederholt: {}", title));
    Ok(())
}
