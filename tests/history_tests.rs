//! Integrationstests für die Historie:
//! - genau ein Record pro Aktion, Basis-Record pro Sitzung
//! - Undo/Redo-Rundreise und Verwerfen des Redo-Zweigs
//! - Kapazitätsgrenze und Interaktionszustand im Snapshot

mod common;

use common::{headless, straight_road, two_road_junction};
use glam::Vec3;
use hadmap_editor::app::context::NEW_MAP_TITLE;
use hadmap_editor::app::use_cases::{lane, object};
use hadmap_editor::core::{BoundaryMark, Dimensions};
use hadmap_editor::ObjectKind;
use hadmap_editor::{EditorOptions, HistoryError, MapEditingContext};

#[test]
fn test_neue_sitzung_beginnt_mit_basis_record() {
    let (ctx, _ledger) = headless();

    assert_eq!(ctx.history().len(), 1);
    let baseline = &ctx.history().records()[0];
    assert_eq!(baseline.title, NEW_MAP_TITLE);
    assert!(!baseline.is_diff_eligible);
    assert!(!ctx.enable_undo());
    assert!(!ctx.enable_redo());
    assert_eq!(ctx.history().diff_records().count(), 0);
}

#[test]
fn test_undo_redo_rundreise_stellt_zustaende_her() {
    let (mut ctx, _ledger) = headless();
    let (a, _b, _j) = two_road_junction(&mut ctx);
    lane::add_lane(&mut ctx, a, 0, 1).expect("Hinzufügen sollte funktionieren");
    object::add_road_sign(&mut ctx, a, 0, "Stop", 12.0, Some(-1))
        .expect("Schild sollte platziert werden");
    let final_state = ctx.map().clone();
    let steps = ctx.history().len() - 1;

    let mut undone = 0;
    while ctx.enable_undo() {
        ctx.undo().expect("Undo sollte funktionieren");
        undone += 1;
    }
    assert_eq!(undone, steps);
    assert!(ctx.map().roads.is_empty());
    assert!(ctx.map().junctions.is_empty());
    assert!(ctx.map().control_points.is_empty());

    while ctx.enable_redo() {
        ctx.redo().expect("Redo sollte funktionieren");
    }
    assert_eq!(ctx.map(), &final_state);
    assert!(!ctx.history().during_revert());
}

#[test]
fn test_undo_und_redo_sind_zueinander_invers() {
    let (mut ctx, ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(80.0, 0.0, 0.0));
    let before = ctx.map().clone();
    lane::update_lane_width(&mut ctx, a, 0, -1, 4.25).expect("Breite sollte gesetzt werden");
    let after = ctx.map().clone();
    let records = ctx.history().len();

    ctx.undo().expect("Undo sollte funktionieren");
    assert_eq!(ctx.map(), &before);
    ctx.redo().expect("Redo sollte funktionieren");
    assert_eq!(ctx.map(), &after);

    // Undo/Redo schreiben keine eigenen Records
    assert_eq!(ctx.history().len(), records);
    assert!(ledger.render_count() > 0);
}

#[test]
fn test_neue_aktion_verwirft_redo_zweig() {
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(80.0, 0.0, 0.0));
    lane::add_lane(&mut ctx, a, 0, -1).expect("Hinzufügen sollte funktionieren");
    lane::add_lane(&mut ctx, a, 0, 1).expect("Hinzufügen sollte funktionieren");
    let len = ctx.history().len();

    ctx.undo().expect("Undo sollte funktionieren");
    ctx.undo().expect("Undo sollte funktionieren");
    assert!(ctx.history().during_revert());
    assert_eq!(ctx.history().records_on_display().len(), len - 2);

    lane::update_lane_boundary(
        &mut ctx,
        a,
        0,
        -1,
        BoundaryMark::DoubleSolidYellow,
    )
    .expect("Markierung sollte gesetzt werden");

    assert!(!ctx.enable_redo());
    assert!(!ctx.history().during_revert());
    assert_eq!(ctx.history().len(), len - 1);
    assert_eq!(
        ctx.history().records().last().map(|r| r.title.as_str()),
        Some("Fahrbahnmarkierung ändern")
    );
}

#[test]
fn test_kapazitaetsgrenze_begrenzt_undo_schritte() {
    let options = EditorOptions {
        history_limit: 40,
        ..EditorOptions::default()
    };
    let (mut ctx, _ledger) = MapEditingContext::headless(options);
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(80.0, 0.0, 0.0));
    let pole = object::add_pole(&mut ctx, a, "Pole_Default", 10.0, 8.0)
        .expect("Mast sollte platziert werden");
    for step in 0..45 {
        object::rotate_object(&mut ctx, pole, step as f32 * 0.1)
            .expect("Drehen sollte funktionieren");
    }

    let mut undone = 0;
    let error = loop {
        match ctx.undo() {
            Ok(()) => undone += 1,
            Err(e) => break e,
        }
    };

    assert_eq!(undone, 39);
    assert!(matches!(error, HistoryError::StorageLimitExceeded { .. }));
    assert!(!ctx.enable_undo());
    assert!(ctx.history().records()[0].payload.is_none());
    assert!(ctx.history().records()[0].exceeds_storage_limit);
}

#[test]
fn test_undo_in_offener_einheit_wird_abgelehnt() {
    let (mut ctx, _ledger) = headless();
    straight_road(&mut ctx, Vec3::ZERO, Vec3::new(30.0, 0.0, 0.0));

    let result = ctx.run_unit(|ctx| ctx.undo());

    assert!(matches!(result, Err(HistoryError::UnitOfWorkOpen)));
    assert!(ctx.enable_undo());
}

#[test]
fn test_ohne_vorgaenger_nichts_rueckgaengig_zu_machen() {
    let (mut ctx, _ledger) = headless();

    assert!(matches!(ctx.undo(), Err(HistoryError::NothingToUndo)));
    assert!(matches!(ctx.redo(), Err(HistoryError::NothingToRedo)));
}

#[test]
fn test_interaktionszustand_reist_mit_dem_snapshot() {
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(80.0, 0.0, 0.0));
    ctx.update_interaction(|i| i.selection.road = Some(a));
    lane::add_lane(&mut ctx, a, 0, -1).expect("Hinzufügen sollte funktionieren");

    ctx.update_interaction(|i| i.selection.clear());
    lane::add_lane(&mut ctx, a, 0, 1).expect("Hinzufügen sollte funktionieren");
    assert_eq!(ctx.interaction.selection.road, None);

    ctx.undo().expect("Undo sollte funktionieren");

    assert_eq!(ctx.interaction.selection.road, Some(a));
}

#[test]
fn test_entfernte_entitaet_verschwindet_aus_der_selektion() {
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(80.0, 0.0, 0.0));
    let sign = object::add_road_sign(&mut ctx, a, 0, "Stop", 5.0, None)
        .expect("Schild sollte platziert werden");
    ctx.update_interaction(|i| i.selection.objects.push(sign));

    object::remove_object(&mut ctx, sign).expect("Entfernen sollte funktionieren");

    assert!(ctx.interaction.selection.objects.is_empty());
}

#[test]
fn test_redo_behaelt_wiederhergestellte_befestigungsgroesse() {
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(80.0, 0.0, 0.0));
    let pole = object::add_pole(&mut ctx, a, "Pole_Default", 10.0, 8.0)
        .expect("Mast sollte platziert werden");
    let light =
        object::add_pole_fixture(&mut ctx, pole, ObjectKind::TrafficLight, "Light_3", 5.0, 1.5)
            .expect("Ampel sollte befestigt werden");
    let resized = Dimensions {
        width: 3.0,
        length: 3.0,
        height: 3.0,
    };
    object::resize_object(&mut ctx, light, resized).expect("Größe sollte gesetzt werden");
    let after_resize = ctx.map().clone();

    ctx.undo().expect("Undo sollte funktionieren");
    ctx.redo().expect("Redo sollte funktionieren");

    assert_eq!(
        ctx.cache().object(light).and_then(|o| o.size),
        Some(resized)
    );
    assert_eq!(ctx.map(), &after_resize);
}
