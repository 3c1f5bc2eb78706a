//! Use-Case-Funktionen für Dateiaktionen.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert.

use crate::app::context::{MapEditingContext, NEW_MAP_TITLE};
use crate::app::events::{Domain, Operation, OperationApplied};
use crate::core::{ControlPointSet, ControlPointSetId, Junction, MapData, MapObject, Placement, Road};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Aktuelle Version des Kartenformats.
pub const MAP_FILE_VERSION: u32 = 1;

/// Titel des Basis-Records nach dem Laden.
pub const LOADED_MAP_TITLE: &str = "Karte geladen";

/// Serialisierte Karte (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFile {
    pub version: u32,
    #[serde(default)]
    pub roads: Vec<Road>,
    #[serde(default)]
    pub junctions: Vec<Junction>,
    #[serde(default)]
    pub objects: Vec<MapObject>,
    #[serde(default)]
    pub control_points: Vec<ControlPointSet>,
}

impl MapFile {
    /// Liest eine Karte aus JSON.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let file: Self = serde_json::from_str(json)?;
        if file.version > MAP_FILE_VERSION {
            anyhow::bail!(
                "Kartenformat {} wird nicht unterstützt (höchstens {})",
                file.version,
                MAP_FILE_VERSION
            );
        }
        Ok(file)
    }

    /// Schreibt die Karte als formatiertes JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn into_map_data(self) -> MapData {
        let mut map = MapData::new();
        map.roads.replace_all(self.roads);
        map.junctions.replace_all(self.junctions);
        map.objects.replace_all(self.objects);
        map.control_points.replace_all(self.control_points);
        map
    }
}

/// Exportiert den aktuellen Stand.
pub fn export_map_file(ctx: &MapEditingContext) -> MapFile {
    let map = ctx.map();
    MapFile {
        version: MAP_FILE_VERSION,
        roads: map.roads.iter().cloned().collect(),
        junctions: map.junctions.iter().cloned().collect(),
        objects: map.objects.iter().cloned().collect(),
        control_points: map.control_points.iter().cloned().collect(),
    }
}

/// Beginnt eine leere Karte mit frischer Historie.
pub fn new_map(ctx: &mut MapEditingContext) {
    ctx.reset_session();
    // Entfernte Szenen-Knoten festschreiben
    let _ = ctx.run_unit(|_| Ok::<(), std::convert::Infallible>(()));
    ctx.save_baseline(NEW_MAP_TITLE);
    ctx.status_message = None;
    log::info!("Neue Karte begonnen");
}

/// Ersetzt die Karte durch den Inhalt einer Kartendatei.
///
/// Verwaiste Referenzen werden beim Übernehmen bereinigt. Die Historie
/// beginnt mit einem Basis-Record des geladenen Stands.
pub fn apply_map_file_state(ctx: &mut MapEditingContext, file: MapFile) {
    ctx.reset_session();
    let mut map = file.into_map_data();
    let pruned = prune_dangling_references(&mut map);
    if pruned > 0 {
        log::warn!("{} verwaiste Referenzen beim Laden entfernt", pruned);
    }
    ensure_control_point_sets(&mut map);
    ctx.ids().observe(map.max_id());
    *ctx.map_mut() = map;

    let _ = ctx.run_unit(|ctx| {
        for domain in [
            Domain::Road,
            Domain::Junction,
            Domain::Object,
            Domain::ControlPoint,
        ] {
            ctx.emit(OperationApplied::new(domain, Operation::ApplyMapFileState));
        }
        Ok::<(), std::convert::Infallible>(())
    });
    ctx.save_baseline(LOADED_MAP_TITLE);

    let map = ctx.map();
    log::info!(
        "Karte übernommen: {} Straßen, {} Kreuzungen, {} Objekte",
        map.roads.len(),
        map.junctions.len(),
        map.objects.len()
    );
}

/// Lädt eine Kartendatei von der Festplatte.
pub fn load_map_file(ctx: &mut MapEditingContext, path: &Path) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(path)?;
    let file = MapFile::from_json(&json)?;
    apply_map_file_state(ctx, file);
    ctx.status_message = Some(format!("Geladen: {}", path.display()));
    Ok(())
}

/// Speichert die aktuelle Karte als JSON.
pub fn save_map_file(ctx: &mut MapEditingContext, path: &Path) -> anyhow::Result<()> {
    let json = export_map_file(ctx).to_json()?;
    std::fs::write(path, json)?;
    log::info!("Karte gespeichert: {}", path.display());
    ctx.status_message = Some(format!("Gespeichert: {}", path.display()));
    Ok(())
}

/// Entfernt Verweise auf nicht vorhandene Entitäten; liefert deren Anzahl.
fn prune_dangling_references(map: &mut MapData) -> usize {
    let mut pruned = 0;

    let roads = &map.roads;
    for junction in map.junctions.iter_mut() {
        let before = junction.link_roads.len() + junction.lane_links.len();
        junction.link_roads.retain(|link| roads.contains(link.road_id));
        let snapshot = junction.clone();
        junction
            .lane_links
            .retain(|link| snapshot.lane_link_is_valid(link, roads));
        pruned += before - junction.link_roads.len() - junction.lane_links.len();
    }
    let degenerate: Vec<_> = map
        .junctions
        .iter()
        .filter(|j| !j.is_structurally_valid())
        .map(|j| j.id)
        .collect();
    for id in &degenerate {
        map.junctions.remove(*id);
    }
    pruned += degenerate.len();

    let junction_ids = map.junctions.id_list();
    for road in map.roads.iter_mut() {
        let before = road.link_junction.len();
        road.link_junction.retain(|id| junction_ids.contains(id));
        pruned += before - road.link_junction.len();
    }

    // Befestigungen entfernter Masten fallen erst im nächsten Durchlauf auf
    loop {
        let orphaned: Vec<_> = map
            .objects
            .iter()
            .filter(|obj| match obj.placement {
                Placement::Road(p) => !map.roads.contains(p.road_id),
                Placement::Pole(p) => !map.objects.contains(p.pole_id),
                Placement::Junction { junction_id } => !map.junctions.contains(junction_id),
                Placement::GuideLine {
                    junction_id,
                    from_road,
                    to_road,
                } => {
                    !map.junctions.contains(junction_id)
                        || !map.roads.contains(from_road)
                        || !map.roads.contains(to_road)
                }
            })
            .map(|obj| obj.id)
            .collect();
        if orphaned.is_empty() {
            break;
        }
        for id in &orphaned {
            map.objects.remove(*id);
        }
        pruned += orphaned.len();
    }

    let roads = &map.roads;
    for set in map.control_points.iter_mut() {
        if set.road_id.is_some_and(|id| !roads.contains(id)) {
            set.road_id = None;
            pruned += 1;
        }
    }
    pruned
}

/// Legt für Straßen ohne Kontrollpunkte einen Satz aus ihrem Verlauf an.
fn ensure_control_point_sets(map: &mut MapData) {
    let missing: Vec<_> = map
        .roads
        .iter()
        .filter(|road| {
            road.control_point_set
                .is_none_or(|set_id| !map.control_points.contains(set_id))
        })
        .map(|road| (road.id, road.key_path_control_points.clone()))
        .collect();
    let mut next = map.max_id();
    for (road_id, points) in missing {
        next += 1;
        let mut set = ControlPointSet::new(ControlPointSetId(next), points);
        set.road_id = Some(road_id);
        let set_id = map.control_points.create(set);
        map.roads
            .update(road_id, |road| road.control_point_set = Some(set_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JunctionId, ObjectId, ObjectKind, PolePlacement, RoadId, RoadPlacement};
    use crate::shared::EditorOptions;
    use glam::Vec3;

    fn sample_road(id: u64) -> Road {
        Road::new(
            RoadId(id),
            None,
            vec![Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0)],
            EditorOptions::default().lane_template(),
        )
    }

    #[test]
    fn test_geladene_karte_bereinigt_verwaiste_referenzen() {
        let (mut ctx, _ledger) = MapEditingContext::headless(EditorOptions::default());
        let mut road = sample_road(3);
        road.link_junction.push(JunctionId(99));
        let sign = MapObject::new(
            ObjectId(7),
            ObjectKind::RoadSign,
            "Stop",
            Placement::Road(RoadPlacement {
                road_id: RoadId(42),
                section_id: 0,
                lane_id: None,
                s: 1.0,
                t: 0.0,
            }),
        );
        let file = MapFile {
            version: MAP_FILE_VERSION,
            roads: vec![road],
            junctions: Vec::new(),
            objects: vec![sign],
            control_points: Vec::new(),
        };

        apply_map_file_state(&mut ctx, file);

        let road = ctx.cache().road(RoadId(3)).expect("Straße sollte geladen sein");
        assert!(road.link_junction.is_empty());
        assert!(ctx.map().objects.is_empty());
        let set_id = road
            .control_point_set
            .expect("Kontrollpunkt-Satz sollte angelegt sein");
        assert_eq!(
            ctx.map().control_points.get(set_id).and_then(|s| s.road_id),
            Some(RoadId(3))
        );
        assert_eq!(ctx.history().len(), 1);
        assert_eq!(ctx.history().records()[0].title, LOADED_MAP_TITLE);
    }

    #[test]
    fn test_befestigung_eines_verwaisten_masts_wird_mit_entfernt() {
        let (mut ctx, _ledger) = MapEditingContext::headless(EditorOptions::default());
        let pole = MapObject::new(
            ObjectId(5),
            ObjectKind::Pole,
            "Pole_Default",
            Placement::Road(RoadPlacement {
                road_id: RoadId(42),
                section_id: 0,
                lane_id: None,
                s: 3.0,
                t: 8.0,
            }),
        );
        let light = MapObject::new(
            ObjectId(6),
            ObjectKind::TrafficLight,
            "Light_3",
            Placement::Pole(PolePlacement {
                pole_id: ObjectId(5),
                height: 5.0,
                offset: 1.5,
            }),
        );
        let file = MapFile {
            version: MAP_FILE_VERSION,
            roads: vec![sample_road(1)],
            junctions: Vec::new(),
            objects: vec![pole, light],
            control_points: Vec::new(),
        };

        apply_map_file_state(&mut ctx, file);

        assert!(ctx.map().objects.is_empty());
        assert!(export_map_file(&ctx).objects.is_empty());
    }

    #[test]
    fn test_neue_ids_liegen_hinter_der_geladenen_karte() {
        let (mut ctx, _ledger) = MapEditingContext::headless(EditorOptions::default());
        let mut set = ControlPointSet::new(
            ControlPointSetId(10),
            vec![Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0)],
        );
        set.road_id = Some(RoadId(12));
        let mut road = sample_road(12);
        road.control_point_set = Some(ControlPointSetId(10));
        let file = MapFile {
            version: MAP_FILE_VERSION,
            roads: vec![road],
            junctions: Vec::new(),
            objects: Vec::new(),
            control_points: vec![set],
        };
        apply_map_file_state(&mut ctx, file);

        assert!(ctx.ids().road().raw() > 12);
    }

    #[test]
    fn test_json_rundreise_erhaelt_die_karte() {
        let (mut ctx, _ledger) = MapEditingContext::headless(EditorOptions::default());
        let file = MapFile {
            version: MAP_FILE_VERSION,
            roads: vec![sample_road(1)],
            junctions: Vec::new(),
            objects: Vec::new(),
            control_points: Vec::new(),
        };
        apply_map_file_state(&mut ctx, file);
        let exported = export_map_file(&ctx);

        let json = exported.to_json().expect("Export sollte funktionieren");
        let parsed = MapFile::from_json(&json).expect("Import sollte funktionieren");

        assert_eq!(parsed, exported);
    }

    #[test]
    fn test_neuere_formatversion_wird_abgelehnt() {
        let json = r#"{ "version": 99 }"#;
        assert!(MapFile::from_json(json).is_err());
    }
}
