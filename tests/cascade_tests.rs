//! Integrationstests für die Kaskade:
//! - Kreuzungen werden pro Aktion höchstens einmal neu aufgebaut
//! - Schilder folgen Fahrstreifen-Änderungen
//! - Entfernen von Straßen, Kreuzungen und Masten räumt Abhängige ab

mod common;

use approx::assert_relative_eq;
use common::{headless, straight_road, two_road_junction};
use glam::Vec3;
use hadmap_editor::app::use_cases::{control_point, junction, lane, object, road};
use hadmap_editor::core::EntityKey;
use hadmap_editor::{EditError, LinkRoad, ObjectKind, RoadEnd};

#[test]
fn test_fahrstreifen_hinzufuegen_baut_kreuzung_genau_einmal_neu() {
    let (mut ctx, ledger) = headless();
    let (a, b, j) = two_road_junction(&mut ctx);
    let records_before = ctx.history().len();
    ledger.clear_events();

    let new_lane = lane::add_lane(&mut ctx, a, 0, -1).expect("Fahrstreifen sollte entstehen");

    assert_eq!(new_lane, -2);
    assert_eq!(ledger.create_count(EntityKey::Junction(j)), 1);
    assert_eq!(ledger.create_count(EntityKey::Road(a)), 1);
    assert_eq!(ledger.create_count(EntityKey::Road(b)), 0);
    assert_eq!(ctx.history().len(), records_before + 1);
    let record = ctx.history().records().last().expect("Record sollte existieren");
    assert_eq!(record.title, "Fahrstreifen hinzufügen");
    assert!(record.changes.junction_ids.contains(&j));
}

#[test]
fn test_schild_folgt_fahrstreifen_und_undo_stellt_position_her() {
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));
    let sign = object::add_road_sign(&mut ctx, a, 0, "Speed_Limit_50", 10.0, Some(-2))
        .expect("Schild sollte platziert werden");
    let original = *ctx
        .cache()
        .object(sign)
        .and_then(|o| o.road_placement())
        .expect("Schild sollte auf der Straße liegen");
    assert_relative_eq!(original.t, -5.25);

    lane::add_lane(&mut ctx, a, 0, -1).expect("Hinzufügen sollte funktionieren");
    let shifted = *ctx
        .cache()
        .object(sign)
        .and_then(|o| o.road_placement())
        .expect("Schild sollte noch existieren");
    assert_eq!(shifted.lane_id, Some(-3));
    assert_relative_eq!(shifted.t, -8.75);

    lane::remove_lane(&mut ctx, a, 0, -1).expect("Entfernen sollte funktionieren");
    let back = *ctx
        .cache()
        .object(sign)
        .and_then(|o| o.road_placement())
        .expect("Schild sollte noch existieren");
    assert_eq!(back.lane_id, Some(-2));
    assert_relative_eq!(back.t, original.t);

    ctx.undo().expect("Undo sollte funktionieren");
    let after_first_undo = ctx
        .cache()
        .object(sign)
        .and_then(|o| o.road_placement().copied())
        .expect("Schild sollte existieren");
    assert_eq!(after_first_undo, shifted);

    ctx.undo().expect("Undo sollte funktionieren");
    let restored = ctx
        .cache()
        .object(sign)
        .and_then(|o| o.road_placement().copied())
        .expect("Schild sollte existieren");
    assert_eq!(restored, original);
}

#[test]
fn test_schild_auf_entferntem_fahrstreifen_wird_entfernt() {
    let (mut ctx, ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));
    let sign = object::add_road_sign(&mut ctx, a, 0, "Yield", 20.0, Some(2))
        .expect("Schild sollte platziert werden");
    let original = ctx
        .cache()
        .object(sign)
        .cloned()
        .expect("Schild sollte existieren");

    lane::remove_lane(&mut ctx, a, 0, 2).expect("Entfernen sollte funktionieren");

    assert!(ctx.cache().object(sign).is_none());
    assert!(!ledger.is_live(EntityKey::Object(sign)));
    let record = ctx.history().records().last().expect("Record sollte existieren");
    assert_eq!(record.title, "Fahrstreifen entfernen");
    assert!(record.changes.object_ids.contains(&sign));

    ctx.undo().expect("Undo sollte funktionieren");

    assert!(ctx.cache().road(a).and_then(|r| r.lane(0, 2)).is_some());
    assert_eq!(ctx.cache().object(sign), Some(&original));
    assert!(ledger.is_live(EntityKey::Object(sign)));
}

#[test]
fn test_querende_markierung_ueberspannt_die_richtung() {
    let (mut ctx, ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));
    let line = object::add_road_sign(&mut ctx, a, 0, "Stop_Line", 5.0, Some(-1))
        .expect("Haltelinie sollte platziert werden");
    let obj = ctx.cache().object(line).expect("Haltelinie sollte existieren");
    assert_relative_eq!(obj.size.map(|s| s.width).unwrap_or(0.0), 7.0);
    assert_relative_eq!(obj.road_placement().map(|p| p.t).unwrap_or(0.0), -3.5);

    ledger.clear_events();
    lane::add_lane(&mut ctx, a, 0, -1).expect("Hinzufügen sollte funktionieren");

    let obj = ctx.cache().object(line).expect("Haltelinie sollte existieren");
    let placement = obj.road_placement().expect("Haltelinie liegt auf der Straße");
    assert_eq!(placement.lane_id, Some(-1));
    assert_relative_eq!(placement.t, -5.25);
    assert_relative_eq!(obj.size.map(|s| s.width).unwrap_or(0.0), 10.5);
    assert_eq!(ledger.create_count(EntityKey::Object(line)), 1);
}

#[test]
fn test_fahrstreifenbreite_verschiebt_aeussere_schilder() {
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));
    let inner = object::add_road_sign(&mut ctx, a, 0, "Arrow", 30.0, Some(1))
        .expect("Schild sollte platziert werden");
    let outer = object::add_road_sign(&mut ctx, a, 0, "Arrow", 30.0, Some(2))
        .expect("Schild sollte platziert werden");

    let applied =
        lane::update_lane_width(&mut ctx, a, 0, 1, 5.0).expect("Breite sollte gesetzt werden");
    assert_relative_eq!(applied, 5.0);

    let t_of = |id| {
        ctx.cache()
            .object(id)
            .and_then(|o| o.road_placement())
            .map(|p| p.t)
            .expect("Schild sollte existieren")
    };
    assert_relative_eq!(t_of(inner), 2.5);
    assert_relative_eq!(t_of(outer), 6.75);
}

#[test]
fn test_verlauf_aendern_projiziert_objekte_auf_neue_laenge() {
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0));
    let set = ctx
        .cache()
        .road(a)
        .and_then(|r| r.control_point_set)
        .expect("Straße sollte Kontrollpunkte haben");
    let pole = object::add_pole(&mut ctx, a, "Pole_Default", 45.0, 8.0)
        .expect("Mast sollte platziert werden");

    control_point::move_control_point(&mut ctx, set, 1, Vec3::new(30.0, 0.0, 0.0))
        .expect("Punkt sollte verschoben werden");

    let road_length = ctx.cache().road(a).map(|r| r.length).unwrap_or(0.0);
    let placement = *ctx
        .cache()
        .object(pole)
        .and_then(|o| o.road_placement())
        .expect("Mast sollte existieren");
    assert!(road_length < 31.0);
    assert!(placement.s <= road_length);
    assert_eq!(
        ctx.history().records().last().map(|r| r.title.as_str()),
        Some("Kontrollpunkte bearbeiten")
    );
}

#[test]
fn test_strasse_entfernen_entfernt_kreuzung_und_undo_stellt_sie_her() {
    let (mut ctx, ledger) = headless();
    let (a, b, j) = two_road_junction(&mut ctx);
    let lane_links = ctx
        .cache()
        .junction(j)
        .map(|junction| junction.lane_links.clone())
        .expect("Kreuzung sollte existieren");
    assert!(!lane_links.is_empty());
    let records_before = ctx.history().len();

    road::remove_road(&mut ctx, b).expect("Straße sollte entfernt werden");

    assert!(ctx.cache().road(b).is_none());
    assert!(ctx.cache().junction(j).is_none());
    assert!(ctx
        .cache()
        .road(a)
        .is_some_and(|road| road.link_junction.is_empty()));
    assert!(!ledger.is_live(EntityKey::Junction(j)));
    assert_eq!(ctx.history().len(), records_before + 1);
    let record = ctx.history().records().last().expect("Record sollte existieren");
    assert_eq!(record.title, "Straße entfernen");
    assert!(record.changes.road_ids.contains(&a));
    assert!(record.changes.road_ids.contains(&b));
    assert!(record.changes.junction_ids.contains(&j));

    ctx.undo().expect("Undo sollte funktionieren");

    let restored = ctx.cache().junction(j).expect("Kreuzung sollte zurück sein");
    assert_eq!(restored.lane_links, lane_links);
    assert!(ctx.cache().road(b).is_some());
    assert!(ctx
        .cache()
        .road(a)
        .is_some_and(|road| road.link_junction == vec![j]));
    assert!(ledger.is_live(EntityKey::Junction(j)));
    assert!(ledger.is_live(EntityKey::Road(b)));
}

#[test]
fn test_anschluss_trennen_behaelt_kreuzung_mit_zwei_strassen() {
    let (mut ctx, _ledger) = headless();
    let (a, b, j) = two_road_junction(&mut ctx);
    let c = straight_road(
        &mut ctx,
        Vec3::new(55.0, 0.0, 5.0),
        Vec3::new(55.0, 0.0, 60.0),
    );
    junction::connect_link_roads(&mut ctx, Some(j), vec![LinkRoad::new(c, RoadEnd::Start)])
        .expect("Dritte Straße sollte angeschlossen werden");
    let guide = object::add_guide_line(&mut ctx, j, a, c).expect("Leitlinie sollte entstehen");
    let kept = object::add_guide_line(&mut ctx, j, a, b).expect("Leitlinie sollte entstehen");

    junction::disconnect_link_road(&mut ctx, j, c).expect("Trennen sollte funktionieren");

    let remaining = ctx.cache().junction(j).expect("Kreuzung sollte bleiben");
    assert_eq!(remaining.distinct_road_ids(), vec![a, b]);
    assert!(remaining
        .lane_links
        .iter()
        .all(|l| l.from.road_id != c && l.to.road_id != c));
    assert!(ctx.cache().object(guide).is_none());
    assert!(ctx.cache().object(kept).is_some());
    assert!(ctx
        .cache()
        .road(c)
        .is_some_and(|road| road.link_junction.is_empty()));
}

#[test]
fn test_belegtes_strassenende_wird_abgelehnt() {
    let (mut ctx, ledger) = headless();
    let (a, _b, _j) = two_road_junction(&mut ctx);
    let c = straight_road(&mut ctx, Vec3::new(0.0, 0.0, 30.0), Vec3::new(40.0, 0.0, 30.0));
    let records_before = ctx.history().len();
    ledger.clear_events();

    let result = junction::connect_link_roads(
        &mut ctx,
        None,
        vec![LinkRoad::new(a, RoadEnd::End), LinkRoad::new(c, RoadEnd::End)],
    );

    assert!(matches!(result, Err(EditError::IllegalJunctionConnection(_))));
    assert_eq!(ctx.map().junctions.len(), 1);
    assert_eq!(ctx.history().len(), records_before);
    assert!(ledger.events().is_empty());
}

#[test]
fn test_letzter_fahrstreifen_einer_richtung_bleibt() {
    let (mut ctx, ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(40.0, 0.0, 0.0));
    lane::remove_lane(&mut ctx, a, 0, -2).expect("Äußerer Fahrstreifen sollte gehen");
    let records_before = ctx.history().len();
    ledger.clear_events();

    let result = lane::remove_lane(&mut ctx, a, 0, -1);

    assert!(matches!(result, Err(EditError::LastLaneInDirection { .. })));
    assert!(ctx.cache().road(a).and_then(|r| r.lane(0, -1)).is_some());
    assert_eq!(ctx.history().len(), records_before);
    assert!(ledger.events().is_empty());
}

#[test]
fn test_mast_entfernen_entfernt_befestigungen_im_selben_record() {
    let (mut ctx, ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(60.0, 0.0, 0.0));
    let pole = object::add_pole(&mut ctx, a, "Pole_Default", 20.0, 9.0)
        .expect("Mast sollte platziert werden");
    let light = object::add_pole_fixture(&mut ctx, pole, ObjectKind::TrafficLight, "Light_3", 5.0, 1.5)
        .expect("Ampel sollte befestigt werden");
    let records_before = ctx.history().len();

    object::remove_object(&mut ctx, pole).expect("Mast sollte entfernt werden");

    assert!(ctx.cache().object(pole).is_none());
    assert!(ctx.cache().object(light).is_none());
    assert!(!ledger.is_live(EntityKey::Object(light)));
    assert_eq!(ctx.history().len(), records_before + 1);

    ctx.undo().expect("Undo sollte funktionieren");
    assert!(ctx.cache().object(pole).is_some());
    assert!(ctx.cache().object(light).is_some());
    assert!(ledger.is_live(EntityKey::Object(light)));
}

#[test]
fn test_mast_verschieben_nimmt_befestigungen_mit() {
    let (mut ctx, ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(60.0, 0.0, 0.0));
    let pole = object::add_pole(&mut ctx, a, "Pole_Default", 20.0, 9.0)
        .expect("Mast sollte platziert werden");
    let board = object::add_pole_fixture(&mut ctx, pole, ObjectKind::SignalBoard, "Board", 4.0, 0.0)
        .expect("Tafel sollte befestigt werden");
    let before = ctx.cache().object(board).map(|o| o.position).unwrap_or_default();

    object::move_object(&mut ctx, pole, 30.0, 9.0).expect("Mast sollte verschoben werden");

    let after = ctx.cache().object(board).map(|o| o.position).unwrap_or_default();
    assert_relative_eq!(after.x - before.x, 10.0, epsilon = 0.1);
    let record = ctx.history().records().last().expect("Record sollte existieren");
    assert_eq!(record.title, "Objekt verschieben");
    assert!(record.changes.object_ids.contains(&board));
}

#[test]
fn test_kreuzung_entfernen_entfernt_kreuzungsobjekte() {
    let (mut ctx, _ledger) = headless();
    let (a, b, j) = two_road_junction(&mut ctx);
    let island = object::add_junction_object(
        &mut ctx,
        j,
        ObjectKind::CustomModel,
        "Traffic_Island",
        Vec3::new(55.0, 0.0, 0.0),
    )
    .expect("Objekt sollte platziert werden");
    let guide = object::add_guide_line(&mut ctx, j, a, b).expect("Leitlinie sollte entstehen");

    junction::remove_junction(&mut ctx, j).expect("Kreuzung sollte entfernt werden");

    assert!(ctx.cache().object(island).is_none());
    assert!(ctx.cache().object(guide).is_none());
    assert!(ctx.cache().road(a).is_some_and(|r| r.link_junction.is_empty()));
    assert!(ctx.cache().road(b).is_some_and(|r| r.link_junction.is_empty()));
}
