//! Core-Domänentypen: Straßen, Kreuzungen, Objekte, Kontrollpunkte und Stores.

pub mod cache;
pub mod control_point;
pub mod curve;
pub mod ids;
pub mod junction;
pub mod map_data;
pub mod object;
/// Straßen-Datenmodell
///
/// - Road: Referenzlinie, Sections, Kreuzungs-Referenzen
/// - Section/Lane: Fahrstreifen-Aufteilung mit vorzeichenbehafteten IDs
pub mod road;
pub mod store;

pub use cache::{EntityCache, EntityKey, EntityRef};
pub use control_point::ControlPointSet;
pub use curve::{CatmullRomLine, ReferenceLine};
pub use ids::{ControlPointSetId, IdGenerator, JunctionId, LaneLinkId, ObjectId, RoadId};
pub use junction::{Junction, LaneEndpoint, LaneLink, LinkRoad};
pub use map_data::MapData;
pub use object::{
    Dimensions, MapObject, ObjectKind, Placement, PolePlacement, RoadPlacement, CROSSING_MARKINGS,
    INTERSECTION_GUIDE_LINE,
};
pub use road::{
    BoundaryMark, CircleParams, Lane, LaneDirection, LaneTemplate, LaneType, Road, RoadEnd,
    RoadType, Section, TunnelRange,
};
pub use store::{Entity, EntityStore};
