//! Interaktionszustand: Selektion, aktives Plugin, Kamera-Fokus.

mod editor;
mod selection;

pub use editor::{EditorPlugin, InteractionState};
pub use selection::{LaneSelection, SelectionState};
