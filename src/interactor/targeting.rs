//! Kandidaten, Sortier-Strategien und Probe-/Filter-Verträge des Resolvers.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::interactable::Handedness;
use crate::core::{ActorId, ColliderId, InteractableId, InteractionRegistry};

/// Quelle, aus der ein Kandidat (oder eine aktive Selektion) stammt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CastSource {
    /// Keine aktive Quelle
    #[default]
    None,
    /// Volumetrischer Near-Probe
    Near,
    /// Curve-/Ray-Far-Probe
    Far,
    /// 2D-UI-Raycast
    Ui,
}

/// Ein per Tick entdeckter, noch nicht selektierter Kandidat.
///
/// Lebt nur einen Tick; über Frame-Grenzen überlebt ausschließlich die
/// `CastSource` der aktiven Selektion (für die Re-Attach-Entscheidung).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Aufgelöstes Interactable
    pub interactable: InteractableId,
    /// Getroffener Collider
    pub collider: ColliderId,
    /// Snap-Volume, falls der Treffer darüber kam
    pub snap_volume: Option<ColliderId>,
    /// Ursprungs-Probe
    pub source: CastSource,
    /// Quadrierte Roh-Distanz (Probe-Ursprung zu Treffer)
    pub distance_sq: f32,
}

/// Globale Sortier-Strategie eines Resolvers (genau eine pro Instanz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetSortMode {
    /// Keine Sortierung (Probe-Reihenfolge bleibt)
    None,
    /// Quadrierte Distanz zwischen Attach-Punkten (billigster Default)
    #[default]
    SquaredDistance,
    /// Vom Interactable gelieferter Rang (`custom_order`), Distanz als Tiebreak
    InteractableCustom,
    /// Nächster Punkt auf dem Collider (teuerste Geometrie-Abfrage,
    /// für hochpräzise Disambiguierung)
    ClosestPointOnCollider,
}

/// Kontext des anfragenden Actors für Filter und Sortierung.
#[derive(Debug, Clone, Copy)]
pub struct ActorContext {
    /// ID des Actors
    pub actor: ActorId,
    /// Händigkeit des Actors
    pub handedness: Handedness,
    /// Aktueller Attach-Punkt in Weltkoordinaten
    pub attach_point: Vec3,
}

/// Optionaler, steckbarer Target-Filter.
///
/// Darf Kandidaten umsortieren und/oder verwerfen. Der Resolver darf
/// **nicht** annehmen, dass der Filter sortiert — nur wenn
/// `sorts_targets()` `true` liefert, entfällt die eigene Sortierung.
pub trait TargetFilter {
    /// Filtert/sortiert die vorgefilterte Kandidatenliste nach `out`.
    fn process(
        &mut self,
        ctx: &ActorContext,
        registry: &InteractionRegistry,
        pre_filtered: &[Candidate],
        out: &mut Vec<Candidate>,
    );

    /// Übernimmt der Filter die Sortierung selbst?
    fn sorts_targets(&self) -> bool {
        false
    }
}

/// Volumetrischer Probe-Vertrag (Near-Region).
pub trait ColliderProbe {
    /// Schreibt alle überlappten Collider nach `out`; `false` bei keinem Treffer.
    fn collider_targets(
        &mut self,
        registry: &InteractionRegistry,
        out: &mut Vec<ColliderId>,
    ) -> bool;

    /// Ursprung des Probes in Weltkoordinaten.
    fn cast_origin(&self) -> Vec3;

    /// Pose-Update durch die Einbettung (Default: ignoriert).
    fn set_pose(&mut self, _origin: Vec3, _direction: Vec3) {}
}

/// Ein Treffer des Curve-/Ray-Probes, aufsteigend nach `distance` gerankt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    /// Getroffener Collider
    pub collider: ColliderId,
    /// Treffer-Punkt in Weltkoordinaten
    pub point: Vec3,
    /// Distanz vom Cast-Ursprung zum Treffer-Punkt
    pub distance: f32,
}

/// Curve-/Ray-Probe-Vertrag (Far-Region).
pub trait CurveProbe {
    /// Schreibt Collider und gerankte Treffer; `false` bei keinem Treffer.
    fn collider_targets(
        &mut self,
        registry: &InteractionRegistry,
        out_colliders: &mut Vec<ColliderId>,
        out_hits: &mut Vec<CurveHit>,
    ) -> bool;

    /// Sample-Punkte entlang der Kurve (für Visuals der Einbettung).
    fn sample_points(&self) -> &[Vec3];

    /// Letzter Sample-Punkt (Kurven-Ende).
    fn last_sample_point(&self) -> Vec3;

    /// Ursprung des Casts.
    fn cast_origin(&self) -> Vec3;

    /// Effektiver Ursprung (kann vom nominalen abweichen, z.B. stabilisiert).
    fn effective_cast_origin(&self) -> Vec3 {
        self.cast_origin()
    }

    /// Pose-Update durch die Einbettung (Default: ignoriert).
    fn set_pose(&mut self, _origin: Vec3, _direction: Vec3) {}
}

/// Aktueller 2D-UI-Raycast-Treffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiRaycastHit {
    /// Treffer-Punkt in Weltkoordinaten
    pub position: Vec3,
    /// Weltnormale der getroffenen Fläche
    pub normal: Vec3,
    /// Besitzendes Objekt, sofern es einem registrierten Interactable gehört
    /// (für den Same-Object-Vergleich mit dem 3D-Treffer)
    pub owner: Option<InteractableId>,
    /// Distanz vom Cast-Ursprung zum Treffer-Punkt
    pub distance: f32,
}

/// UI-Raycast-Provider-Vertrag (externes UI-System).
pub trait UiRaycastProvider {
    /// Aktueller Raycast-Treffer, falls vorhanden.
    fn current_raycast(&self) -> Option<UiRaycastHit>;

    /// Ist der UI-Select-Input aktuell aktiv?
    fn is_select_active(&self) -> bool;

    /// Scroll-Delta dieses Ticks.
    fn scroll_delta(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Sortiert Kandidaten nach der globalen Strategie des Resolvers.
pub(crate) fn sort_candidates(
    mode: TargetSortMode,
    registry: &InteractionRegistry,
    attach_point: Vec3,
    candidates: &mut [Candidate],
) {
    match mode {
        TargetSortMode::None => {}
        TargetSortMode::SquaredDistance => {
            candidates.sort_by(|a, b| {
                let da = attach_distance_sq(registry, a, attach_point);
                let db = attach_distance_sq(registry, b, attach_point);
                da.total_cmp(&db)
            });
        }
        TargetSortMode::InteractableCustom => {
            candidates.sort_by(|a, b| {
                let ra = custom_order(registry, a);
                let rb = custom_order(registry, b);
                ra.cmp(&rb).then_with(|| {
                    let da = attach_distance_sq(registry, a, attach_point);
                    let db = attach_distance_sq(registry, b, attach_point);
                    da.total_cmp(&db)
                })
            });
        }
        TargetSortMode::ClosestPointOnCollider => {
            candidates.sort_by(|a, b| {
                let da = collider_point_distance_sq(registry, a, attach_point);
                let db = collider_point_distance_sq(registry, b, attach_point);
                da.total_cmp(&db)
            });
        }
    }
}

fn attach_distance_sq(registry: &InteractionRegistry, candidate: &Candidate, attach: Vec3) -> f32 {
    registry
        .interactable(candidate.interactable)
        .map(|i| (i.attach_point - attach).length_squared())
        .unwrap_or(f32::MAX)
}

fn custom_order(registry: &InteractionRegistry, candidate: &Candidate) -> i32 {
    registry
        .interactable(candidate.interactable)
        .map(|i| i.custom_order)
        .unwrap_or(i32::MAX)
}

fn collider_point_distance_sq(
    registry: &InteractionRegistry,
    candidate: &Candidate,
    attach: Vec3,
) -> f32 {
    registry
        .collider(candidate.collider)
        .map(|c| (c.closest_point(attach) - attach).length_squared())
        .unwrap_or(f32::MAX)
}
