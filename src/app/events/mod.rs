//! `OperationApplied`-Ereignisse und `EditCommand`-Enum für den Command-Datenfluss.

mod command;
mod operation;

pub use command::EditCommand;
pub use operation::{
    Domain, LaneAttr, Operation, OperationApplied, OperationResult, Removed, Reposition,
};
