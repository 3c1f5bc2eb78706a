//! Application-Layer: Kontext, Controller, Events, Historie und Use-Cases.

pub(crate) mod cascade;
pub mod context;
pub mod controller;
mod dispatcher;
pub mod events;
pub mod handlers;
pub mod history;
pub mod operation_log;
/// Interaktionszustand
///
/// Selektion, aktives Plugin und Kamera-Fokus; reist mit jedem Snapshot.
pub mod state;
pub mod unit_of_work;
pub mod use_cases;

pub use context::MapEditingContext;
pub use controller::EditorController;
pub use events::{Domain, EditCommand, Operation, OperationApplied};
pub use history::{HistoryEngine, HistoryRecord, Snapshot};
pub use operation_log::{OperationEntry, OperationLog};
pub use state::{EditorPlugin, InteractionState, LaneSelection, SelectionState};
pub use unit_of_work::ChangeSet;
pub use use_cases::file_io::MapFile;
