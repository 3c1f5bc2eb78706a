//! Deduplizierte Warteschlange für Szenen-Operationen einer Arbeitseinheit.
//!
//! Mehrfache Anforderungen für denselben Knoten werden zusammengeführt, damit
//! jede Entität pro Arbeitseinheit höchstens einmal neu aufgebaut wird.

use super::{SceneCreate, SceneKey, SceneNodeMeta, SceneSynchronizer};
use crate::core::MapData;
use futures_util::future::join_all;
use indexmap::IndexMap;

/// Angeforderte Szenen-Änderung für einen Knoten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOp {
    /// Knoten neu anlegen
    Create,
    /// Knoten entfernen und neu anlegen
    Replace,
    /// Transformation übernehmen, ohne neu aufzubauen
    Update {
        moved: bool,
        rotated: bool,
        resized: bool,
    },
    /// Knoten entfernen
    Dispose,
}

impl SceneOp {
    /// Nur Position.
    pub const MOVE: SceneOp = SceneOp::Update {
        moved: true,
        rotated: false,
        resized: false,
    };
    /// Nur Drehung.
    pub const ROTATE: SceneOp = SceneOp::Update {
        moved: false,
        rotated: true,
        resized: false,
    };
    /// Nur Größe.
    pub const RESIZE: SceneOp = SceneOp::Update {
        moved: false,
        rotated: false,
        resized: true,
    };

    /// Führt eine bestehende mit einer neuen Anforderung zusammen.
    fn merge(self, next: SceneOp) -> SceneOp {
        use SceneOp::*;
        match (self, next) {
            (_, Dispose) => Dispose,
            (Dispose, Create | Replace) => Replace,
            (Dispose, Update { .. }) => Dispose,
            (Create, _) => Create,
            (Replace, _) => Replace,
            (Update { .. }, Create) => Create,
            (Update { .. }, Replace) => Replace,
            (
                Update {
                    moved: m1,
                    rotated: r1,
                    resized: s1,
                },
                Update {
                    moved: m2,
                    rotated: r2,
                    resized: s2,
                },
            ) => Update {
                moved: m1 || m2,
                rotated: r1 || r2,
                resized: s1 || s2,
            },
        }
    }
}

/// Ergebnis eines Flushs.
#[derive(Debug, Default)]
pub struct FlushReport {
    /// Erfolgreich erzeugte Knoten (sofort oder nach Asset-Ladevorgang)
    pub created: Vec<SceneNodeMeta>,
    /// Knoten, deren Erzeugung fehlgeschlagen ist
    pub failed: Vec<SceneKey>,
    /// Anzahl entfernter Knoten
    pub disposed: usize,
}

/// Gesammelte Szenen-Operationen.
#[derive(Debug, Default)]
pub struct SceneQueue {
    ops: IndexMap<SceneKey, SceneOp>,
}

impl SceneQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fordert eine Operation an (mit Zusammenführung).
    pub fn push(&mut self, key: SceneKey, op: SceneOp) {
        let merged = match self.ops.get(&key) {
            Some(existing) => existing.merge(op),
            None => op,
        };
        self.ops.insert(key, merged);
    }

    /// Angeforderte Operation für einen Knoten.
    pub fn pending(&self, key: SceneKey) -> Option<SceneOp> {
        self.ops.get(&key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Verwirft alle Anforderungen.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Spielt alle Anforderungen gegen die Szene ab.
    ///
    /// Asynchrone Erzeugungen werden gesammelt und gemeinsam abgewartet;
    /// einzelne Fehlschläge werden protokolliert und übersprungen.
    pub fn flush(&mut self, scene: &mut dyn SceneSynchronizer, map: &MapData) -> FlushReport {
        let mut report = FlushReport::default();
        let mut pending = Vec::new();
        let cache = map.cache();

        for (key, op) in self.ops.drain(..) {
            match op {
                SceneOp::Dispose => {
                    scene.dispose(key);
                    report.disposed += 1;
                }
                SceneOp::Create | SceneOp::Replace => {
                    if op == SceneOp::Replace {
                        scene.dispose(key);
                        report.disposed += 1;
                    }
                    // Inzwischen entfernte Entitäten werden übersprungen
                    let Some(entity) = cache.get(key) else {
                        continue;
                    };
                    match scene.create(entity) {
                        SceneCreate::Ready(meta) => report.created.push(meta),
                        SceneCreate::Pending(future) => pending.push((key, future)),
                    }
                }
                SceneOp::Update {
                    moved,
                    rotated,
                    resized,
                } => {
                    let Some(entity) = cache.get(key) else {
                        continue;
                    };
                    if moved {
                        scene.move_node(entity);
                    }
                    if rotated {
                        scene.rotate_node(entity);
                    }
                    if resized {
                        scene.resize_node(entity);
                    }
                }
            }
        }

        if !pending.is_empty() {
            let (keys, futures): (Vec<_>, Vec<_>) = pending.into_iter().unzip();
            let results = pollster::block_on(join_all(futures));
            for (key, result) in keys.into_iter().zip(results) {
                match result {
                    Ok(meta) => report.created.push(meta),
                    Err(e) => {
                        log::warn!("Szenen-Knoten {:?} konnte nicht erzeugt werden: {}", key, e);
                        report.failed.push(key);
                    }
                }
            }
        }

        report
    }
}
