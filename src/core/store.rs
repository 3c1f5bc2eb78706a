//! Generischer, ID-basierter Entitäts-Store.
//!
//! Jede Collection (Straßen, Kreuzungen, Objekte, Kontrollpunkte) liegt in
//! einem `EntityStore`. Die Iterationsreihenfolge entspricht immer der
//! Einfügereihenfolge, damit Export und Snapshots deterministisch bleiben.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Gemeinsame Schnittstelle aller speicherbaren Entitäten.
pub trait Entity: Clone {
    /// Typisierte ID der Entität.
    type Id: Copy + Eq + Hash + Ord + std::fmt::Debug;

    /// Liefert die ID der Entität.
    fn id(&self) -> Self::Id;
}

/// Normalisierter Store mit geordneter ID-Liste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(
        serialize = "T: Serialize, T::Id: Serialize",
        deserialize = "T: Deserialize<'de>, T::Id: Deserialize<'de>"
    )
)]
pub struct EntityStore<T: Entity> {
    elements: IndexMap<T::Id, T>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            elements: IndexMap::new(),
        }
    }
}

impl<T: Entity> EntityStore<T> {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt eine Entität ein und gibt ihre ID zurück.
    ///
    /// Existiert die ID bereits, wird der Eintrag an Ort und Stelle ersetzt.
    pub fn create(&mut self, entity: T) -> T::Id {
        let id = entity.id();
        self.elements.insert(id, entity);
        id
    }

    /// Liefert die Entität zur ID.
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.elements.get(&id)
    }

    /// Mutable Referenz auf die Entität.
    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.elements.get_mut(&id)
    }

    /// Wendet einen Patch auf die Entität an. `false` bei unbekannter ID.
    pub fn update(&mut self, id: T::Id, patch: impl FnOnce(&mut T)) -> bool {
        match self.elements.get_mut(&id) {
            Some(entity) => {
                patch(entity);
                true
            }
            None => false,
        }
    }

    /// Entfernt die Entität unter Beibehaltung der Reihenfolge der übrigen.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        self.elements.shift_remove(&id)
    }

    /// Prüft, ob die ID existiert.
    pub fn contains(&self, id: T::Id) -> bool {
        self.elements.contains_key(&id)
    }

    /// Geordnete ID-Liste (Einfügereihenfolge).
    pub fn ids(&self) -> impl Iterator<Item = T::Id> + '_ {
        self.elements.keys().copied()
    }

    /// Geordnete ID-Liste als Vec.
    pub fn id_list(&self) -> Vec<T::Id> {
        self.ids().collect()
    }

    /// Alle Entitäten in Einfügereihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.values()
    }

    /// Mutable Iteration in Einfügereihenfolge.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.elements.values_mut()
    }

    /// Anzahl der Entitäten.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true`, wenn der Store leer ist.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Leert den Store.
    pub fn reset(&mut self) {
        self.elements.clear();
    }

    /// Ersetzt den Inhalt vollständig in der Reihenfolge von `entities`.
    pub fn replace_all(&mut self, entities: impl IntoIterator<Item = T>) {
        self.elements = entities.into_iter().map(|e| (e.id(), e)).collect();
    }
}
