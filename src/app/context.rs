//! Editier-Kontext: besitzt alle Collections, die Historie und die Szene.
//!
//! Jede Aktion läuft in [`MapEditingContext::run_unit`]. Mutationen melden
//! sich über [`MapEditingContext::emit`]; der Dispatcher reagiert synchron
//! (Szene vormerken, Kaskade, History-Titel). Beim Verlassen der äußersten
//! Ebene werden Szene, Selektion und genau ein History-Record festgeschrieben.

use super::dispatcher;
use super::events::{Domain, Operation, OperationApplied};
use super::history::{
    changed_ids, changed_sections, HistoryEngine, HistoryTransition, Snapshot, SnapshotDiffer,
    StructuralDiff,
};
use super::operation_log::{OperationEntry, OperationLog};
use super::state::InteractionState;
use super::unit_of_work::{CompletedUnit, DispatchScope, UnitOfWork};
use crate::core::{
    ControlPointSetId, EntityCache, EntityKey, IdGenerator, JunctionId, MapData, ObjectId, RoadId,
};
use crate::scene::{SceneKey, SceneLedger, SceneNodeMeta, SceneOp, SceneQueue, SceneSynchronizer};
use crate::shared::{EditorOptions, HistoryError};

/// Titel des Basis-Records einer leeren Karte.
pub const NEW_MAP_TITLE: &str = "Neue Karte";

/// Kontext einer Editier-Sitzung.
pub struct MapEditingContext {
    map: MapData,
    /// Selektion, aktives Plugin, Kamera-Fokus (reist mit jedem Undo-Schritt)
    pub interaction: InteractionState,
    pub options: EditorOptions,
    /// Letzte Meldung für die Statuszeile
    pub status_message: Option<String>,
    history: HistoryEngine,
    ids: IdGenerator,
    log: OperationLog,
    unit: UnitOfWork,
    scene: Box<dyn SceneSynchronizer>,
    scene_queue: SceneQueue,
    differ: Box<dyn SnapshotDiffer>,
    render_timestamp: u64,
}

impl MapEditingContext {
    /// Erstellt einen Kontext mit leerer Karte und Basis-Record.
    pub fn new(options: EditorOptions, scene: Box<dyn SceneSynchronizer>) -> Self {
        let mut ctx = Self {
            map: MapData::new(),
            interaction: InteractionState::default(),
            history: HistoryEngine::new(options.history_limit),
            log: OperationLog::new(options.operation_log_limit),
            options,
            status_message: None,
            ids: IdGenerator::new(),
            unit: UnitOfWork::default(),
            scene,
            scene_queue: SceneQueue::new(),
            differ: Box::new(StructuralDiff),
            render_timestamp: 0,
        };
        ctx.save_baseline(NEW_MAP_TITLE);
        ctx
    }

    /// Kontext mit protokollierender Headless-Szene.
    pub fn headless(options: EditorOptions) -> (Self, SceneLedger) {
        let ledger = SceneLedger::new();
        let ctx = Self::new(options, Box::new(ledger.clone()));
        (ctx, ledger)
    }

    /// Tauscht den Diff-Algorithmus aus.
    pub fn with_differ(mut self, differ: Box<dyn SnapshotDiffer>) -> Self {
        self.differ = differ;
        self
    }

    pub fn map(&self) -> &MapData {
        &self.map
    }

    pub(crate) fn map_mut(&mut self) -> &mut MapData {
        &mut self.map
    }

    /// Lesender Zugriff über alle Collections.
    pub fn cache(&self) -> EntityCache<'_> {
        self.map.cache()
    }

    pub fn history(&self) -> &HistoryEngine {
        &self.history
    }

    pub fn operation_log(&self) -> &OperationLog {
        &self.log
    }

    /// Zähler, der bei jedem abschließenden Rendern erhöht wird.
    pub fn render_timestamp(&self) -> u64 {
        self.render_timestamp
    }

    pub(crate) fn ids(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Zuständigkeit des aktuellen Dispatches.
    pub(crate) fn scope(&self) -> DispatchScope {
        self.unit.scope()
    }

    /// Merkt eine Szenen-Operation für das Festschreiben vor.
    pub(crate) fn queue_scene(&mut self, key: SceneKey, op: SceneOp) {
        self.scene_queue.push(key, op);
    }

    /// Nimmt eine Entität in die Diff-IDs der laufenden Einheit auf.
    pub(crate) fn touch(&mut self, key: EntityKey) {
        self.unit.touch(key);
    }

    /// Setzt den History-Titel, sofern der aktuelle Dispatch zuständig ist.
    pub(crate) fn request_save(&mut self, title: &str) {
        let scope = self.unit.scope();
        self.unit.request_save(scope, title);
    }

    /// Leitet eine Kreuzung aus den aktuellen Straßen neu ab.
    pub(crate) fn rederive_junction(&mut self, junction_id: JunctionId) -> bool {
        let Self { map, ids, .. } = self;
        match map.junctions.get_mut(junction_id) {
            Some(junction) => {
                junction.rederive(&map.roads, ids);
                true
            }
            None => false,
        }
    }

    /// Ändert Selektion, Plugin oder Kamera-Fokus ohne History-Record.
    ///
    /// Die Selektion wird gegen die Karte bereinigt und neu hervorgehoben.
    pub fn update_interaction(&mut self, patch: impl FnOnce(&mut InteractionState)) {
        patch(&mut self.interaction);
        self.interaction.selection.prune(&self.map);
        let keys = self.interaction.selection.keys();
        self.scene.highlight(&keys);
        self.render_timestamp += 1;
        self.scene.render();
    }

    // === Arbeitseinheit ===

    /// Führt `f` als (Teil einer) Arbeitseinheit aus.
    ///
    /// Auf der äußersten Ebene wird danach festgeschrieben; ein History-Record
    /// entsteht nur bei Erfolg.
    pub fn run_unit<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        self.unit.enter();
        let result = f(self);
        if let Some(completed) = self.unit.leave() {
            self.commit(completed, result.is_ok());
        }
        result
    }

    /// Meldet eine ausgeführte Mutation an Log und Dispatcher.
    pub(crate) fn emit(&mut self, event: OperationApplied) {
        if !self.unit.is_open() {
            let _ = self.run_unit(|ctx| {
                ctx.emit(event);
                Ok::<(), std::convert::Infallible>(())
            });
            return;
        }
        log::debug!(
            "{:?}: {} (Tiefe {})",
            event.domain,
            event.operation.name(),
            self.unit.depth()
        );
        self.log.record(OperationEntry {
            domain: event.domain,
            operation: event.operation.clone(),
            depth: self.unit.depth(),
        });
        dispatcher::dispatch(self, event);
    }

    fn commit(&mut self, completed: CompletedUnit, succeeded: bool) {
        let report = self.scene_queue.flush(self.scene.as_mut(), &self.map);
        // Snapshots enthalten bereits die übernommenen Modellgrößen
        if !completed.restores_snapshot {
            self.sync_created_sizes(&report.created);
        }
        self.interaction.selection.prune(&self.map);

        let touched =
            !report.created.is_empty() || report.disposed > 0 || !completed.changes.is_empty();
        if touched {
            let keys = self.interaction.selection.keys();
            self.scene.highlight(&keys);
            self.render_timestamp += 1;
            self.scene.render();
        }

        if !succeeded {
            return;
        }
        if let Some(title) = completed.title {
            let snapshot = Snapshot::capture(&self.map, &self.interaction);
            self.history
                .save(title, completed.changes, snapshot, completed.diff_eligible);
        }
    }

    /// Übernimmt die tatsächlichen Modellgrößen frisch erzeugter Objekte.
    fn sync_created_sizes(&mut self, created: &[SceneNodeMeta]) {
        for meta in created {
            let (EntityKey::Object(id), Some(dimensions)) = (meta.key, meta.dimensions) else {
                continue;
            };
            self.map.objects.update(id, |obj| {
                // Befestigungen übernehmen immer die Modellgröße
                if obj.kind.is_pole_fixture() || obj.size.is_none() {
                    obj.size = Some(dimensions);
                }
                if obj.basic_size.is_none() {
                    obj.basic_size = Some(dimensions);
                }
            });
        }
    }

    /// Schreibt einen nicht diff-fähigen Basis-Record.
    pub(crate) fn save_baseline(&mut self, title: &str) {
        let snapshot = Snapshot::capture(&self.map, &self.interaction);
        self.history.save(title, Default::default(), snapshot, false);
    }

    /// Verwirft Karte, Historie und IDs; alle Szenen-Knoten werden entfernt.
    pub(crate) fn reset_session(&mut self) {
        for key in all_keys(&self.map) {
            self.scene_queue.push(key, SceneOp::Dispose);
        }
        self.map.reset();
        self.interaction = InteractionState::default();
        self.history.clear();
        self.ids.reset();
    }

    // === Undo/Redo ===

    /// Prüft ob Undo möglich ist.
    pub fn enable_undo(&self) -> bool {
        !self.unit.is_open() && self.history.enable_undo()
    }

    /// Prüft ob Redo möglich ist.
    pub fn enable_redo(&self) -> bool {
        !self.unit.is_open() && self.history.enable_redo()
    }

    /// Macht den letzten Record rückgängig.
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        if self.unit.is_open() {
            return Err(HistoryError::UnitOfWorkOpen);
        }
        let transition = self.history.undo()?;
        log::info!("Undo: {}", transition.title);
        self.apply_transition(transition);
        Ok(())
    }

    /// Wiederholt den nächsten Record.
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        if self.unit.is_open() {
            return Err(HistoryError::UnitOfWorkOpen);
        }
        let transition = self.history.redo()?;
        log::info!("Redo: {}", transition.title);
        self.apply_transition(transition);
        Ok(())
    }

    /// Stellt den Ziel-Snapshot je geänderter Collection wieder her.
    fn apply_transition(&mut self, transition: HistoryTransition) {
        let current = Snapshot::capture(&self.map, &self.interaction).to_value();
        let target = transition.target.to_value();
        let diff = self.differ.diff(&current, &target);
        let sections: Vec<String> = changed_sections(&diff)
            .into_iter()
            .map(str::to_owned)
            .collect();
        let diff_ids = transition.diff_ids;
        let snapshot = transition.target;

        let _ = self.run_unit(|ctx| {
            ctx.unit.mark_restore();
            for section in &sections {
                let changed = changed_ids(&diff, section);
                let (domain, mut keys) = match section.as_str() {
                    "roads" => {
                        ctx.map.roads = snapshot.map.roads.clone();
                        (Domain::Road, keys_of(&diff_ids.road_ids, EntityKey::Road))
                    }
                    "junctions" => {
                        ctx.map.junctions = snapshot.map.junctions.clone();
                        (
                            Domain::Junction,
                            keys_of(&diff_ids.junction_ids, EntityKey::Junction),
                        )
                    }
                    "objects" => {
                        ctx.map.objects = snapshot.map.objects.clone();
                        (
                            Domain::Object,
                            keys_of(&diff_ids.object_ids, EntityKey::Object),
                        )
                    }
                    "controlPoints" => {
                        ctx.map.control_points = snapshot.map.control_points.clone();
                        (
                            Domain::ControlPoint,
                            keys_of(&diff_ids.control_point_ids, EntityKey::ControlPoints),
                        )
                    }
                    "interaction" => {
                        ctx.interaction = snapshot.interaction.clone();
                        continue;
                    }
                    other => {
                        log::warn!("Unbekannter Snapshot-Abschnitt '{}'", other);
                        continue;
                    }
                };
                for raw in changed {
                    let key = key_for(domain, raw);
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                ctx.emit(OperationApplied::new(domain, Operation::ApplyState { keys }));
            }
            Ok::<(), std::convert::Infallible>(())
        });
    }
}

fn keys_of<I: Copy>(ids: &[I], key: fn(I) -> EntityKey) -> Vec<EntityKey> {
    ids.iter().map(|id| key(*id)).collect()
}

fn key_for(domain: Domain, raw: u64) -> EntityKey {
    match domain {
        Domain::Road => EntityKey::Road(RoadId(raw)),
        Domain::Junction => EntityKey::Junction(JunctionId(raw)),
        Domain::Object => EntityKey::Object(ObjectId(raw)),
        Domain::ControlPoint => EntityKey::ControlPoints(ControlPointSetId(raw)),
    }
}

/// Schlüssel aller Entitäten einer Karte.
pub(crate) fn all_keys(map: &MapData) -> Vec<EntityKey> {
    map.roads
        .ids()
        .map(EntityKey::Road)
        .chain(map.junctions.ids().map(EntityKey::Junction))
        .chain(map.objects.ids().map(EntityKey::Object))
        .chain(map.control_points.ids().map(EntityKey::ControlPoints))
        .collect()
}
