//! Integrationstests für den Command-Fluss über den `EditorController`.

mod common;

use common::{headless, straight_road};
use glam::Vec3;
use hadmap_editor::app::events::Domain;
use hadmap_editor::app::use_cases::file_io::LOADED_MAP_TITLE;
use hadmap_editor::app::use_cases::lane::LaneAttrValue;
use hadmap_editor::core::{EntityKey, LaneType};
use hadmap_editor::{
    EditCommand, EditorController, EditorPlugin, LinkRoad, ObjectKind, RoadEnd, SelectionState,
};
use std::path::PathBuf;

fn temp_map_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hadmap_editor_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_kontrollpunkte_per_command_erzeugen_eine_strasse() {
    let mut controller = EditorController::new();
    let (mut ctx, ledger) = headless();

    controller
        .handle_command(
            &mut ctx,
            EditCommand::AddControlPoint {
                set_id: None,
                point: Vec3::ZERO,
            },
        )
        .expect("AddControlPoint sollte ohne Fehler durchlaufen");
    let set_id = ctx
        .interaction
        .selection
        .control_point_set
        .expect("Neuer Satz sollte selektiert sein");
    controller
        .handle_command(
            &mut ctx,
            EditCommand::AddControlPoint {
                set_id: Some(set_id),
                point: Vec3::new(40.0, 0.0, 0.0),
            },
        )
        .expect("AddControlPoint sollte ohne Fehler durchlaufen");

    assert_eq!(ctx.map().roads.len(), 1);
    let road = ctx.map().roads.iter().next().expect("Straße sollte existieren");
    assert_eq!(road.control_point_set, Some(set_id));
    assert!(ledger.is_live(EntityKey::Road(road.id)));
    assert_eq!(
        ctx.history().records().last().map(|r| r.title.as_str()),
        Some("Straße erstellen")
    );
}

#[test]
fn test_abgelehnter_command_setzt_statusmeldung() {
    let mut controller = EditorController::new();
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(40.0, 0.0, 0.0));
    let records = ctx.history().len();

    controller
        .handle_command(
            &mut ctx,
            EditCommand::RemoveLane {
                road_id: a,
                section_id: 0,
                lane_id: -7,
            },
        )
        .expect("Abgelehnte Aktionen sollten kein Err liefern");

    assert!(ctx.status_message.is_some());
    assert_eq!(ctx.history().len(), records);
}

#[test]
fn test_undo_ohne_vorgaenger_wird_gemeldet() {
    let mut controller = EditorController::new();
    let (mut ctx, _ledger) = headless();

    controller
        .handle_command(&mut ctx, EditCommand::Undo)
        .expect("Undo sollte ohne Fehler durchlaufen");

    assert!(ctx.status_message.is_some());
}

#[test]
fn test_command_folge_mit_undo_und_redo() {
    let mut controller = EditorController::new();
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0));
    let b = straight_road(&mut ctx, Vec3::new(60.0, 0.0, 0.0), Vec3::new(100.0, 0.0, 0.0));

    controller
        .handle_commands(
            &mut ctx,
            [
                EditCommand::ConnectLinkRoads {
                    junction_id: None,
                    links: vec![LinkRoad::new(a, RoadEnd::End), LinkRoad::new(b, RoadEnd::Start)],
                },
                EditCommand::UpdateLaneAttr {
                    road_id: a,
                    section_id: 0,
                    lane_id: -1,
                    value: LaneAttrValue::LaneType(LaneType::Shoulder),
                },
                EditCommand::AddRoadObject {
                    kind: ObjectKind::Pole,
                    name: "Pole_Default".into(),
                    road_id: b,
                    s: 5.0,
                    t: 8.0,
                },
                EditCommand::Undo,
            ],
        )
        .expect("Command-Folge sollte durchlaufen");

    assert_eq!(ctx.map().junctions.len(), 1);
    assert!(ctx.map().objects.is_empty());
    assert_eq!(
        ctx.cache().road(a).and_then(|r| r.lane(0, -1)).map(|l| l.lane_type),
        Some(LaneType::Shoulder)
    );
    assert!(ctx
        .status_message
        .as_deref()
        .is_some_and(|msg| msg.contains("Objekt hinzufügen")));

    controller
        .handle_command(&mut ctx, EditCommand::Redo)
        .expect("Redo sollte durchlaufen");
    assert_eq!(ctx.map().objects.len(), 1);
}

#[test]
fn test_verschachtelte_operationen_laufen_im_log_mit_tiefe() {
    let mut controller = EditorController::new();
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0));
    let b = straight_road(&mut ctx, Vec3::new(60.0, 0.0, 0.0), Vec3::new(100.0, 0.0, 0.0));
    controller
        .handle_command(
            &mut ctx,
            EditCommand::ConnectLinkRoads {
                junction_id: None,
                links: vec![LinkRoad::new(a, RoadEnd::End), LinkRoad::new(b, RoadEnd::Start)],
            },
        )
        .expect("Verbinden sollte durchlaufen");

    controller
        .handle_command(
            &mut ctx,
            EditCommand::AddLane {
                road_id: a,
                section_id: 0,
                lane_id: 1,
            },
        )
        .expect("AddLane sollte durchlaufen");

    let last_junction_entry = ctx
        .operation_log()
        .entries_for(Domain::Junction)
        .last()
        .expect("Kreuzung sollte protokolliert sein");
    assert_eq!(last_junction_entry.operation.name(), "updateJunction");
    assert!(last_junction_entry.depth > 1);
}

#[test]
fn test_plugin_wechsel_hebt_selektion_auf() {
    let mut controller = EditorController::new();
    let (mut ctx, _ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0));
    let records = ctx.history().len();

    controller
        .handle_command(
            &mut ctx,
            EditCommand::Select {
                selection: SelectionState {
                    road: Some(a),
                    ..SelectionState::default()
                },
            },
        )
        .expect("Select sollte durchlaufen");
    assert_eq!(ctx.interaction.selection.road, Some(a));

    controller
        .handle_command(
            &mut ctx,
            EditCommand::SetPlugin {
                plugin: EditorPlugin::EditJunction,
            },
        )
        .expect("SetPlugin sollte durchlaufen");

    assert!(ctx.interaction.selection.is_empty());
    assert_eq!(ctx.interaction.plugin, EditorPlugin::EditJunction);
    assert_eq!(ctx.history().len(), records);
}

#[test]
fn test_karte_speichern_und_laden() {
    let mut controller = EditorController::new();
    let (mut ctx, ledger) = headless();
    let a = straight_road(&mut ctx, Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0));
    controller
        .handle_command(
            &mut ctx,
            EditCommand::AddRoadSign {
                road_id: a,
                section_id: 0,
                name: "Stop".into(),
                s: 10.0,
                lane_id: Some(-1),
            },
        )
        .expect("Schild sollte platziert werden");
    let saved = ctx.map().clone();
    let path = temp_map_path("rundreise");

    controller
        .handle_command(&mut ctx, EditCommand::SaveMap { path: path.clone() })
        .expect("Speichern sollte funktionieren");
    controller
        .handle_command(&mut ctx, EditCommand::NewMap)
        .expect("Neue Karte sollte funktionieren");
    assert!(ctx.map().roads.is_empty());
    assert_eq!(ledger.live_count(), 0);

    controller
        .handle_command(&mut ctx, EditCommand::LoadMap { path: path.clone() })
        .expect("Laden sollte funktionieren");
    let _ = std::fs::remove_file(&path);

    assert_eq!(ctx.map(), &saved);
    assert_eq!(ctx.history().len(), 1);
    assert_eq!(ctx.history().records()[0].title, LOADED_MAP_TITLE);
    assert!(!ctx.enable_undo());
    assert!(ledger.is_live(EntityKey::Road(a)));
}

#[test]
fn test_fehlende_kartendatei_liefert_fehler() {
    let mut controller = EditorController::new();
    let (mut ctx, _ledger) = headless();

    let result = controller.handle_command(
        &mut ctx,
        EditCommand::LoadMap {
            path: temp_map_path("gibt_es_nicht"),
        },
    );

    assert!(result.is_err());
    assert_eq!(ctx.history().len(), 1);
}
