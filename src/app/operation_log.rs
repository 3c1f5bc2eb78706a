//! Begrenztes Protokoll aller `OperationApplied`-Ereignisse.

use super::events::{Domain, Operation};

/// Protokolleintrag einer ausgeführten Operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationEntry {
    pub domain: Domain,
    pub operation: Operation,
    /// Verschachtelungstiefe der Arbeitseinheit (1 = vom Benutzer ausgelöst)
    pub depth: u32,
}

/// Speichert ausgeführte Operationen in Reihenfolge.
#[derive(Debug)]
pub struct OperationLog {
    entries: Vec<OperationEntry>,
    max_entries: usize,
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new(crate::shared::options::OPERATION_LOG_LIMIT)
    }
}

impl OperationLog {
    /// Erstellt ein leeres Log mit gegebener Kapazität.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(2),
        }
    }

    /// Fügt einen Eintrag hinzu.
    /// Bei voller Kapazität wird die ältere Hälfte verworfen.
    pub fn record(&mut self, entry: OperationEntry) {
        if self.entries.len() >= self.max_entries {
            self.entries.drain(..self.max_entries / 2);
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[OperationEntry] {
        &self.entries
    }

    /// Einträge einer Domäne.
    pub fn entries_for(&self, domain: Domain) -> impl Iterator<Item = &OperationEntry> {
        self.entries.iter().filter(move |e| e.domain == domain)
    }

    /// Leert das Log.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ObjectId;

    fn entry(id: u64) -> OperationEntry {
        OperationEntry {
            domain: Domain::Object,
            operation: Operation::RotateObject {
                object_id: ObjectId(id),
            },
            depth: 1,
        }
    }

    #[test]
    fn volle_kapazitaet_verwirft_aeltere_haelfte() {
        let mut log = OperationLog::new(4);
        for id in 0..5 {
            log.record(entry(id));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries()[0], entry(2));
    }
}
