//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Optionen und Fehlertypen, die von `app` und `scene` gleichermaßen
//! genutzt werden.

mod error;
pub mod options;

pub use error::{EditError, HistoryError};
pub use options::EditorOptions;
pub use options::{HISTORY_LIMIT, MAX_LANE_WIDTH, MIN_LANE_WIDTH};
