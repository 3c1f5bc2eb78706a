//! Arbeitseinheit: bündelt eine Benutzeraktion samt Kaskade zu einem Record.
//!
//! Die äußerste Aktion öffnet die Einheit, verschachtelte Aufrufe aus einer
//! Kaskade treten ihr nur bei. Nur der Dispatcher auf Tiefe 1 darf einen
//! History-Titel setzen; beim Verlassen der äußersten Ebene wird genau ein
//! Record geschrieben.

use crate::core::{ControlPointSetId, EntityKey, JunctionId, ObjectId, RoadId};
use serde::{Deserialize, Serialize};

/// Von einem Record betroffene IDs je Collection ("Diff-IDs").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub road_ids: Vec<RoadId>,
    pub junction_ids: Vec<JunctionId>,
    pub object_ids: Vec<ObjectId>,
    pub control_point_ids: Vec<ControlPointSetId>,
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}

impl ChangeSet {
    /// Nimmt einen Schlüssel auf (ohne Duplikate).
    pub fn touch(&mut self, key: EntityKey) {
        match key {
            EntityKey::Road(id) => push_unique(&mut self.road_ids, id),
            EntityKey::Junction(id) => push_unique(&mut self.junction_ids, id),
            EntityKey::Object(id) => push_unique(&mut self.object_ids, id),
            EntityKey::ControlPoints(id) => push_unique(&mut self.control_point_ids, id),
        }
    }

    /// Alle Schlüssel in Collection-Reihenfolge.
    pub fn keys(&self) -> Vec<EntityKey> {
        self.road_ids
            .iter()
            .map(|id| EntityKey::Road(*id))
            .chain(self.junction_ids.iter().map(|id| EntityKey::Junction(*id)))
            .chain(self.object_ids.iter().map(|id| EntityKey::Object(*id)))
            .chain(
                self.control_point_ids
                    .iter()
                    .map(|id| EntityKey::ControlPoints(*id)),
            )
            .collect()
    }

    /// Vereinigt zwei ChangeSets.
    pub fn merge(&mut self, other: &ChangeSet) {
        for key in other.keys() {
            self.touch(key);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.road_ids.is_empty()
            && self.junction_ids.is_empty()
            && self.object_ids.is_empty()
            && self.control_point_ids.is_empty()
    }
}

/// Wer im aktuellen Dispatch für Render-Trigger und History zuständig ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchScope {
    /// Äußerste, vom Benutzer ausgelöste Operation
    Owner,
    /// Verschachtelter Aufruf aus einer Kaskade ("pure update")
    Nested,
}

impl DispatchScope {
    pub fn is_owner(self) -> bool {
        self == Self::Owner
    }
}

/// Laufende Arbeitseinheit.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    depth: u32,
    title: Option<String>,
    diff_eligible: bool,
    changes: ChangeSet,
    restores_snapshot: bool,
}

/// Abgeschlossene Arbeitseinheit, bereit zum Festschreiben.
#[derive(Debug, Default)]
pub struct CompletedUnit {
    /// Titel des History-Records; `None` = kein Record
    pub title: Option<String>,
    pub diff_eligible: bool,
    pub changes: ChangeSet,
    /// Undo/Redo: Zustand stammt vollständig aus einem Snapshot
    pub restores_snapshot: bool,
}

impl UnitOfWork {
    /// Betritt die Einheit; die erste Ebene öffnet sie.
    pub fn enter(&mut self) {
        self.depth += 1;
    }

    /// Verlässt eine Ebene. Liefert die abgeschlossene Einheit, wenn es die äußerste war.
    pub fn leave(&mut self) -> Option<CompletedUnit> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            return None;
        }
        let completed = CompletedUnit {
            title: self.title.take(),
            diff_eligible: self.diff_eligible,
            changes: std::mem::take(&mut self.changes),
            restores_snapshot: std::mem::take(&mut self.restores_snapshot),
        };
        self.diff_eligible = false;
        Some(completed)
    }

    /// Aktuelle Verschachtelungstiefe.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// `true`, solange eine Einheit offen ist.
    pub fn is_open(&self) -> bool {
        self.depth > 0
    }

    /// Zuständigkeit für den aktuellen Dispatch.
    pub fn scope(&self) -> DispatchScope {
        if self.depth <= 1 {
            DispatchScope::Owner
        } else {
            DispatchScope::Nested
        }
    }

    /// Nimmt eine betroffene Entität auf.
    pub fn touch(&mut self, key: EntityKey) {
        self.changes.touch(key);
    }

    /// Fordert einen History-Record an. Nur der erste Owner-Titel zählt.
    pub fn request_save(&mut self, scope: DispatchScope, title: impl Into<String>) {
        if scope.is_owner() && self.title.is_none() {
            self.title = Some(title.into());
            self.diff_eligible = true;
        }
    }

    /// Markiert die Einheit als Wiederherstellung aus einem Snapshot.
    pub fn mark_restore(&mut self) {
        self.restores_snapshot = true;
    }
}
