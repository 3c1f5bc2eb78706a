//! Editor Controller für zentrale Command-Verarbeitung.

use super::context::MapEditingContext;
use super::events::EditCommand;
use crate::shared::{EditError, HistoryError};

/// Abgelehnter Command; wird gemeldet statt die Command-Folge abzubrechen.
#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Orchestriert Commands und Use-Cases auf dem Editier-Kontext.
#[derive(Default)]
pub struct EditorController;

impl EditorController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Führt mutierende Commands auf dem Kontext aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    ///
    /// Abgelehnte Aktionen landen als Warnung in Log und Statuszeile;
    /// nur Datei-Fehler werden als `Err` weitergereicht.
    pub fn handle_command(
        &mut self,
        ctx: &mut MapEditingContext,
        command: EditCommand,
    ) -> anyhow::Result<()> {
        use super::handlers;

        let name = command.name();
        log::debug!("Command: {}", name);

        let outcome: Result<(), Rejection> = match command {
            // === Historie ===
            EditCommand::Undo => handlers::history::undo(ctx).map_err(Rejection::from),
            EditCommand::Redo => handlers::history::redo(ctx).map_err(Rejection::from),

            // === Datei-I/O ===
            EditCommand::NewMap => {
                handlers::file_io::new_map(ctx);
                Ok(())
            }
            EditCommand::LoadMap { path } => {
                handlers::file_io::load(ctx, &path)?;
                Ok(())
            }
            EditCommand::SaveMap { path } => {
                handlers::file_io::save(ctx, &path)?;
                Ok(())
            }

            // === Interaktion ===
            EditCommand::Select { selection } => {
                handlers::selection::select(ctx, selection);
                Ok(())
            }
            EditCommand::ClearSelection => {
                handlers::selection::clear(ctx);
                Ok(())
            }
            EditCommand::SetPlugin { plugin } => {
                handlers::selection::set_plugin(ctx, plugin);
                Ok(())
            }
            EditCommand::FocusCamera { position } => {
                handlers::selection::focus_camera(ctx, position);
                Ok(())
            }

            // === Editing ===
            edit => handlers::editing::apply(ctx, edit).map_err(Rejection::from),
        };

        if let Err(rejection) = outcome {
            log::warn!("{} abgelehnt: {}", name, rejection);
            ctx.status_message = Some(rejection.to_string());
        }
        Ok(())
    }

    /// Führt mehrere Commands nacheinander aus; bricht nur bei Datei-Fehlern ab.
    pub fn handle_commands(
        &mut self,
        ctx: &mut MapEditingContext,
        commands: impl IntoIterator<Item = EditCommand>,
    ) -> anyhow::Result<()> {
        for command in commands {
            self.handle_command(ctx, command)?;
        }
        Ok(())
    }
}
