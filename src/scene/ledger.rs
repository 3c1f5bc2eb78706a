//! Headless Szene: protokolliert alle Knoten-Operationen.
//!
//! Wird von der Binary und den Tests genutzt. Der Zustand liegt hinter einem
//! `Rc<RefCell<_>>`, damit ein Klon des Handles nach der Übergabe an den
//! Kontext weiterhin ausgewertet werden kann.

use super::{SceneCreate, SceneKey, SceneNodeMeta, SceneSynchronizer};
use crate::core::{Dimensions, EntityRef};
use futures_util::FutureExt;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Standardgröße für Assets ohne eigenen Katalogeintrag.
const FALLBACK_ASSET: Dimensions = Dimensions {
    width: 1.0,
    length: 0.2,
    height: 1.0,
};

/// Protokollierte Szenen-Operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Created(SceneKey),
    Moved(SceneKey),
    Rotated(SceneKey),
    Resized(SceneKey),
    Disposed(SceneKey),
    Highlighted(Vec<SceneKey>),
    Rendered,
}

#[derive(Debug, Default)]
struct LedgerState {
    live: HashSet<SceneKey>,
    events: Vec<SceneEvent>,
    assets: HashMap<String, Dimensions>,
    broken_assets: HashSet<String>,
}

/// Headless-Implementierung von [`SceneSynchronizer`].
#[derive(Debug, Clone, Default)]
pub struct SceneLedger {
    state: Rc<RefCell<LedgerState>>,
}

impl SceneLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hinterlegt die Modellgröße eines Assets.
    pub fn register_asset(&self, name: impl Into<String>, dimensions: Dimensions) {
        self.state.borrow_mut().assets.insert(name.into(), dimensions);
    }

    /// Markiert ein Asset als nicht ladbar.
    pub fn break_asset(&self, name: impl Into<String>) {
        self.state.borrow_mut().broken_assets.insert(name.into());
    }

    /// Alle bisher protokollierten Operationen.
    pub fn events(&self) -> Vec<SceneEvent> {
        self.state.borrow().events.clone()
    }

    /// Leert das Protokoll (lebende Knoten bleiben erhalten).
    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Anzahl der Erzeugungen eines Knotens seit dem letzten `clear_events`.
    pub fn create_count(&self, key: SceneKey) -> usize {
        self.count(|e| *e == SceneEvent::Created(key))
    }

    /// Anzahl der Entfernungen eines Knotens seit dem letzten `clear_events`.
    pub fn dispose_count(&self, key: SceneKey) -> usize {
        self.count(|e| *e == SceneEvent::Disposed(key))
    }

    /// Anzahl der Render-Aufrufe.
    pub fn render_count(&self) -> usize {
        self.count(|e| *e == SceneEvent::Rendered)
    }

    fn count(&self, pred: impl Fn(&SceneEvent) -> bool) -> usize {
        self.state.borrow().events.iter().filter(|e| pred(e)).count()
    }

    /// `true`, wenn der Knoten aktuell existiert.
    pub fn is_live(&self, key: SceneKey) -> bool {
        self.state.borrow().live.contains(&key)
    }

    /// Anzahl aktuell existierender Knoten.
    pub fn live_count(&self) -> usize {
        self.state.borrow().live.len()
    }

    fn push(&self, event: SceneEvent) {
        self.state.borrow_mut().events.push(event);
    }
}

impl SceneSynchronizer for SceneLedger {
    fn create(&mut self, entity: EntityRef<'_>) -> SceneCreate {
        let key = entity.key();
        let asset = match entity {
            EntityRef::Object(obj) if obj.kind.needs_asset() => Some(obj.name.clone()),
            _ => None,
        };

        let Some(name) = asset else {
            let mut state = self.state.borrow_mut();
            state.live.insert(key);
            state.events.push(SceneEvent::Created(key));
            return SceneCreate::Ready(SceneNodeMeta {
                key,
                dimensions: None,
            });
        };

        // Asset-Objekte werden erst beim Abwarten des Batches erzeugt
        let shared = Rc::clone(&self.state);
        SceneCreate::Pending(
            async move {
                let mut state = shared.borrow_mut();
                if state.broken_assets.contains(&name) {
                    anyhow::bail!("Asset '{}' konnte nicht geladen werden", name);
                }
                let dimensions = state.assets.get(&name).copied().unwrap_or(FALLBACK_ASSET);
                state.live.insert(key);
                state.events.push(SceneEvent::Created(key));
                Ok(SceneNodeMeta {
                    key,
                    dimensions: Some(dimensions),
                })
            }
            .boxed_local(),
        )
    }

    fn move_node(&mut self, entity: EntityRef<'_>) {
        self.push(SceneEvent::Moved(entity.key()));
    }

    fn rotate_node(&mut self, entity: EntityRef<'_>) {
        self.push(SceneEvent::Rotated(entity.key()));
    }

    fn resize_node(&mut self, entity: EntityRef<'_>) {
        self.push(SceneEvent::Resized(entity.key()));
    }

    fn dispose(&mut self, key: SceneKey) {
        let mut state = self.state.borrow_mut();
        state.live.remove(&key);
        state.events.push(SceneEvent::Disposed(key));
    }

    fn highlight(&mut self, keys: &[SceneKey]) {
        self.push(SceneEvent::Highlighted(keys.to_vec()));
    }

    fn render(&mut self) {
        self.push(SceneEvent::Rendered);
    }
}
