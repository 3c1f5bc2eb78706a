//! HD-Map Editor Engine.
//! Kaskadierende Konsistenz und versionierte Historie für Straßennetz-Karten,
//! als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod scene;
pub mod shared;

pub use app::{
    EditCommand, EditorController, EditorPlugin, HistoryEngine, MapEditingContext, MapFile,
    SelectionState,
};
pub use core::{
    ControlPointSet, Junction, JunctionId, LinkRoad, MapData, MapObject, ObjectId, ObjectKind,
    Road, RoadEnd, RoadId,
};
pub use scene::{SceneLedger, SceneSynchronizer};
pub use shared::{EditError, EditorOptions, HistoryError};
