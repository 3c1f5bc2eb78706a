//! Versionierte Bearbeitungshistorie mit vollständigen Snapshots.
//!
//! Lineare Liste von Records mit `current_index` (letzter gespeicherter
//! Record) und `last_index` (Position während einer Undo-Exkursion). Ältere
//! Records jenseits der Kapazität verlieren ihren Snapshot und werden zur
//! harten Undo-Grenze.

mod diff;
mod snapshot;

pub use diff::{changed_ids, changed_sections, SnapshotDiffer, StructuralDiff};
pub use snapshot::Snapshot;

use super::unit_of_work::ChangeSet;
use crate::shared::HistoryError;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Ein gespeicherter Bearbeitungsschritt.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: u64,
    pub title: String,
    /// Millisekunden seit UNIX-Epoch
    pub timestamp_ms: u64,
    /// Vollständiger Zustand; `None` nach Verdrängung
    pub payload: Option<Arc<Snapshot>>,
    /// `false` für Basis-Records (Karte geladen/neu)
    pub is_diff_eligible: bool,
    /// Von diesem Record betroffene IDs
    pub changes: ChangeSet,
    pub exceeds_storage_limit: bool,
}

/// Zielzustand eines Undo/Redo-Schritts.
#[derive(Debug, Clone)]
pub struct HistoryTransition {
    /// Wiederherzustellender Snapshot
    pub target: Arc<Snapshot>,
    /// IDs, deren Szenen-Knoten neu aufgebaut werden
    pub diff_ids: ChangeSet,
    /// Titel des rückgängig gemachten bzw. wiederholten Records
    pub title: String,
}

/// Undo/Redo-Verwaltung.
#[derive(Debug)]
pub struct HistoryEngine {
    records: Vec<HistoryRecord>,
    current_index: Option<usize>,
    last_index: Option<usize>,
    limit: usize,
    next_id: u64,
}

impl Default for HistoryEngine {
    fn default() -> Self {
        Self::new(crate::shared::HISTORY_LIMIT)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl HistoryEngine {
    /// Erstellt eine leere Historie mit maximal `limit` Snapshots.
    pub fn new(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            current_index: None,
            last_index: None,
            limit: limit.max(1),
            next_id: 1,
        }
    }

    /// Schreibt einen Record.
    ///
    /// Während einer Undo-Exkursion wird der Redo-Zweig vorher verworfen.
    pub fn save(
        &mut self,
        title: impl Into<String>,
        changes: ChangeSet,
        snapshot: Snapshot,
        diff_eligible: bool,
    ) {
        if let Some(last) = self.last_index.take() {
            self.records.truncate(last + 1);
            self.current_index = Some(last);
        }

        let title = title.into();
        log::debug!("History: speichere '{}'", title);
        self.records.push(HistoryRecord {
            id: self.next_id,
            title,
            timestamp_ms: now_ms(),
            payload: Some(Arc::new(snapshot)),
            is_diff_eligible: diff_eligible,
            changes,
            exceeds_storage_limit: false,
        });
        self.next_id += 1;
        self.current_index = Some(self.current_index.map_or(0, |i| i + 1));

        if self.records.len() > self.limit {
            let diff = self.records.len() - self.limit;
            let evicted = &mut self.records[diff - 1];
            if evicted.payload.take().is_some() {
                log::debug!("History: Snapshot von '{}' verdrängt", evicted.title);
            }
            evicted.exceeds_storage_limit = true;
        }
    }

    /// `true` während einer Undo-Exkursion.
    pub fn during_revert(&self) -> bool {
        self.last_index.is_some()
    }

    /// Aktuell angezeigte Position.
    pub fn position(&self) -> Option<usize> {
        self.last_index.or(self.current_index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    fn check_undo(&self) -> Result<usize, HistoryError> {
        let position = self.position().ok_or(HistoryError::NothingToUndo)?;
        if position == 0 {
            return Err(HistoryError::NothingToUndo);
        }
        let target = &self.records[position - 1];
        if target.payload.is_none() {
            return Err(HistoryError::StorageLimitExceeded {
                title: self.records[position].title.clone(),
            });
        }
        Ok(position - 1)
    }

    /// Prüft ob Undo möglich ist.
    pub fn enable_undo(&self) -> bool {
        self.check_undo().is_ok()
    }

    /// Prüft ob Redo möglich ist.
    pub fn enable_redo(&self) -> bool {
        match (self.last_index, self.current_index) {
            (Some(last), Some(current)) => last < current,
            _ => false,
        }
    }

    /// Tritt einen Schritt zurück.
    ///
    /// Die Diff-IDs stammen aus dem Record, der rückgängig gemacht wird.
    pub fn undo(&mut self) -> Result<HistoryTransition, HistoryError> {
        let target = self.check_undo()?;
        let undone = &self.records[target + 1];
        let payload = self.records[target]
            .payload
            .clone()
            .ok_or(HistoryError::NothingToUndo)?;
        let transition = HistoryTransition {
            target: payload,
            diff_ids: undone.changes.clone(),
            title: undone.title.clone(),
        };
        self.last_index = Some(target);
        Ok(transition)
    }

    /// Geht einen Schritt vorwärts.
    pub fn redo(&mut self) -> Result<HistoryTransition, HistoryError> {
        if !self.enable_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        let (Some(last), Some(current)) = (self.last_index, self.current_index) else {
            return Err(HistoryError::NothingToRedo);
        };
        let next = last + 1;
        let record = &self.records[next];
        let payload = record.payload.clone().ok_or(HistoryError::NothingToRedo)?;
        let transition = HistoryTransition {
            target: payload,
            diff_ids: record.changes.clone(),
            title: record.title.clone(),
        };
        self.last_index = if next == current { None } else { Some(next) };
        Ok(transition)
    }

    /// Alle Records (inklusive Redo-Zweig).
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Records bis zur angezeigten Position.
    pub fn records_on_display(&self) -> &[HistoryRecord] {
        match self.position() {
            Some(pos) => &self.records[..=pos],
            None => &[],
        }
    }

    /// Nur diff-fähige Records (ohne Basis-Records).
    pub fn diff_records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().filter(|r| r.is_diff_eligible)
    }

    /// Snapshot an der angezeigten Position.
    pub fn current_snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.position()
            .and_then(|pos| self.records[pos].payload.as_ref())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Verwirft alle Records.
    pub fn clear(&mut self) {
        self.records.clear();
        self.current_index = None;
        self.last_index = None;
    }
}
