//! Gemeinsame Aufbauten für die Integrationstests.

#![allow(dead_code)]

use glam::Vec3;
use hadmap_editor::app::use_cases::{control_point, junction};
use hadmap_editor::{
    EditorOptions, JunctionId, LinkRoad, MapEditingContext, RoadEnd, RoadId, SceneLedger,
};

/// Kontext mit Standard-Optionen und protokollierender Szene.
pub fn headless() -> (MapEditingContext, SceneLedger) {
    MapEditingContext::headless(EditorOptions::default())
}

/// Legt eine gerade Straße über zwei Kontrollpunkte an.
pub fn straight_road(ctx: &mut MapEditingContext, from: Vec3, to: Vec3) -> RoadId {
    let set = control_point::add_control_point(ctx, None, from)
        .expect("Erster Kontrollpunkt sollte funktionieren");
    control_point::add_control_point(ctx, Some(set), to)
        .expect("Zweiter Kontrollpunkt sollte funktionieren");
    ctx.map()
        .control_points
        .get(set)
        .and_then(|set| set.road_id)
        .expect("Straße sollte mit dem zweiten Punkt entstehen")
}

/// Zwei Straßen A → B, deren Enden an einer Kreuzung hängen.
pub fn two_road_junction(ctx: &mut MapEditingContext) -> (RoadId, RoadId, JunctionId) {
    let a = straight_road(ctx, Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0));
    let b = straight_road(ctx, Vec3::new(60.0, 0.0, 0.0), Vec3::new(110.0, 0.0, 0.0));
    let j = junction::connect_link_roads(
        ctx,
        None,
        vec![LinkRoad::new(a, RoadEnd::End), LinkRoad::new(b, RoadEnd::Start)],
    )
    .expect("Kreuzung sollte verbunden werden");
    (a, b, j)
}
