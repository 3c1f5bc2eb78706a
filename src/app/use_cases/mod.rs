//! Use-Cases der Application-Layer-Orchestrierung.
//!
//! Jede öffentliche Funktion ist eine Aktion: sie prüft zuerst, mutiert dann
//! ihre Collection und meldet das Ergebnis als `OperationApplied`.

pub mod control_point;
pub mod file_io;
pub mod junction;
pub mod lane;
pub mod object;
pub mod road;
