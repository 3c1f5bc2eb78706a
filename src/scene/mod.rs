//! Szenen-Grenze: Vertrag zur 3D-Darstellung und Batch-Synchronisation.
//!
//! Die Engine selbst baut keine Meshes. Sie sammelt pro Arbeitseinheit,
//! welche Knoten erzeugt, ersetzt, bewegt oder entfernt werden müssen, und
//! spielt das gesammelt gegen einen [`SceneSynchronizer`] ab.

mod ledger;
mod queue;

pub use ledger::{SceneEvent, SceneLedger};
pub use queue::{FlushReport, SceneOp, SceneQueue};

use crate::core::{Dimensions, EntityKey, EntityRef};
use futures_util::future::LocalBoxFuture;

/// Schlüssel eines Szenen-Knotens (identisch mit dem Entitäts-Schlüssel).
pub type SceneKey = EntityKey;

/// Metadaten eines erzeugten Szenen-Knotens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNodeMeta {
    pub key: SceneKey,
    /// Tatsächliche Modellgröße, falls ein Asset geladen wurde
    pub dimensions: Option<Dimensions>,
}

/// Ergebnis von [`SceneSynchronizer::create`].
pub enum SceneCreate {
    /// Knoten sofort erzeugt
    Ready(SceneNodeMeta),
    /// Knoten hängt von einem extern geladenen Asset ab
    Pending(LocalBoxFuture<'static, anyhow::Result<SceneNodeMeta>>),
}

/// Darstellungsschicht, gegen die die Engine synchronisiert.
///
/// Die Zuordnung zu Eltern-Containern (Straßen-, Kreuzungs-, Objekt-Layer)
/// leitet die Implementierung aus dem Schlüssel ab.
pub trait SceneSynchronizer {
    /// Erzeugt den Knoten einer Entität.
    fn create(&mut self, entity: EntityRef<'_>) -> SceneCreate;

    /// Übernimmt eine neue Position.
    fn move_node(&mut self, entity: EntityRef<'_>);

    /// Übernimmt eine neue Drehung.
    fn rotate_node(&mut self, entity: EntityRef<'_>);

    /// Übernimmt eine neue Größe.
    fn resize_node(&mut self, entity: EntityRef<'_>);

    /// Entfernt einen Knoten. Auf bereits fehlenden Knoten ein No-op.
    fn dispose(&mut self, key: SceneKey);

    /// Hebt die selektierten Knoten hervor.
    fn highlight(&mut self, _keys: &[SceneKey]) {}

    /// Löst ein abschließendes Rendern aus.
    fn render(&mut self) {}
}
