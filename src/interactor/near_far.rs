//! Dual-Region Target-Resolver: Near-Probe, Far-Cast und UI-Raycast
//! werden pro Tick zu genau einer geordneten Zielliste zusammengeführt.
//!
//! Die Schrittfolge pro Tick ist fix: Reset → Attach-Update → Region →
//! Near-Probe → Far-Probe → (im Process-Teil) Selection-Entry/-Exit.
//! Near hat harte Präzedenz: sobald der Near-Probe irgendein gültiges Ziel
//! liefert, wird die Far-Auswertung komplett übersprungen — das ist keine
//! Tiebreak-Regel, sondern gewollte Vorfahrt.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::attach::AttachController;
use super::probes::{LineCastProbe, SphereOverlapProbe};
use super::targeting::{
    sort_candidates, ActorContext, Candidate, CastSource, ColliderProbe, CurveHit, CurveProbe,
    TargetFilter, TargetSortMode, UiRaycastProvider,
};
use crate::core::interactable::AttachPreference;
use crate::core::{ColliderId, InteractionRegistry};
use crate::shared::options::{FarAttachMode, InteractionOptions};

/// Region-Klassifikation einer aktiven Selektion.
///
/// Reines Read-Model für nachgelagerte Konsumenten (Haptik, Visuals);
/// nicht autoritativ, wird jeden Tick neu berechnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Region {
    /// Keine aktive Selektion
    #[default]
    None,
    /// Selektion mit Attach-Punkt an der Hand
    Near,
    /// Selektion mit ausgelenktem Attach-Punkt
    Far,
}

/// Per-Tick-Zustand des Far-Casts (Read-Model für Ray-Visuals).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayCastState {
    /// Gültiger Treffer in diesem Tick?
    pub valid: bool,
    /// Endpunkt des Strahls (Treffer oder Kurvenende)
    pub endpoint: Vec3,
    /// Index des effektiven Treffers in der gerankten Hit-Liste
    pub hit_index: Option<usize>,
    /// Endpunkt stammt aus dem UI-Raycast
    pub from_ui: bool,
}

/// Per-Actor-Algorithmus zur Auflösung beider Probe-Quellen.
pub struct NearFarResolver {
    near_enabled: bool,
    far_enabled: bool,
    sort_mode: TargetSortMode,
    far_attach_mode: FarAttachMode,
    attach: AttachController,
    near_probe: Option<Box<dyn ColliderProbe>>,
    far_probe: Option<Box<dyn CurveProbe>>,
    ui_provider: Option<Box<dyn UiRaycastProvider>>,
    target_filter: Option<Box<dyn TargetFilter>>,
    region: Region,
    selected_cast_source: CastSource,
    suppress_far_visual: bool,
    visual_suppressed_this_tick: bool,
    ray: RayCastState,
    ranked: Vec<Candidate>,
    valid_targets: Vec<Candidate>,
    ui_interaction: bool,
    scratch_colliders: Vec<ColliderId>,
    scratch_hits: Vec<CurveHit>,
}

impl NearFarResolver {
    /// Erstellt einen Resolver mit Default-Konfiguration (ohne Probes).
    pub fn new() -> Self {
        Self {
            near_enabled: true,
            far_enabled: true,
            sort_mode: TargetSortMode::default(),
            far_attach_mode: FarAttachMode::default(),
            attach: AttachController::default(),
            near_probe: None,
            far_probe: None,
            ui_provider: None,
            target_filter: None,
            region: Region::None,
            selected_cast_source: CastSource::None,
            suppress_far_visual: false,
            visual_suppressed_this_tick: false,
            ray: RayCastState::default(),
            ranked: Vec::new(),
            valid_targets: Vec::new(),
            ui_interaction: false,
            scratch_colliders: Vec::new(),
            scratch_hits: Vec::new(),
        }
    }

    /// Erstellt einen Resolver aus den Engine-Optionen.
    ///
    /// Installiert die Default-Probes (Kugel + Linien-Cast) mit den
    /// Maßen aus den Optionen; `set_near_probe`/`set_far_probe` ersetzen
    /// sie bei Bedarf. Die Pose liefert die Einbettung über
    /// `set_probe_pose` nach.
    pub fn from_options(options: &InteractionOptions) -> Self {
        let mut resolver = Self::new();
        resolver.sort_mode = options.sort_mode;
        resolver.far_attach_mode = options.far_attach_mode;
        resolver.attach.set_ease_speed(options.attach_ease_speed);
        resolver.near_probe = Some(Box::new(SphereOverlapProbe::new(
            Vec3::ZERO,
            options.near_radius,
        )));
        resolver.far_probe = Some(Box::new(LineCastProbe::new(
            Vec3::ZERO,
            Vec3::NEG_Z,
            options.far_cast_length,
            options.far_cast_samples,
        )));
        resolver
    }

    // ── Konfiguration ───────────────────────────────────────────────

    /// Aktiviert/deaktiviert den Near-Probe.
    pub fn set_near_enabled(&mut self, enabled: bool) {
        self.near_enabled = enabled;
    }

    /// Aktiviert/deaktiviert den Far-Cast.
    pub fn set_far_enabled(&mut self, enabled: bool) {
        self.far_enabled = enabled;
    }

    /// Setzt die globale Sortier-Strategie (eine pro Resolver-Instanz).
    pub fn set_sort_mode(&mut self, mode: TargetSortMode) {
        self.sort_mode = mode;
    }

    /// Setzt den Attach-Default bei Far-Selektion.
    pub fn set_far_attach_mode(&mut self, mode: FarAttachMode) {
        self.far_attach_mode = mode;
    }

    /// Hängt den volumetrischen Near-Probe ein.
    pub fn set_near_probe(&mut self, probe: Box<dyn ColliderProbe>) {
        self.near_probe = Some(probe);
    }

    /// Hängt den Curve-/Ray-Far-Probe ein.
    pub fn set_far_probe(&mut self, probe: Box<dyn CurveProbe>) {
        self.far_probe = Some(probe);
    }

    /// Hängt den UI-Raycast-Provider ein.
    pub fn set_ui_provider(&mut self, provider: Box<dyn UiRaycastProvider>) {
        self.ui_provider = Some(provider);
    }

    /// Hängt einen optionalen Target-Filter ein.
    pub fn set_target_filter(&mut self, filter: Box<dyn TargetFilter>) {
        self.target_filter = Some(filter);
    }

    /// Zugriff auf den Attach-Controller (Tracking-Updates der Einbettung).
    pub fn attach_mut(&mut self) -> &mut AttachController {
        &mut self.attach
    }

    /// Read-only Zugriff auf den Attach-Controller.
    pub fn attach(&self) -> &AttachController {
        &self.attach
    }

    /// Aktualisiert die Pose beider Probes (Hand-Tracking der Einbettung).
    pub fn set_probe_pose(&mut self, origin: Vec3, direction: Vec3) {
        if let Some(probe) = self.near_probe.as_mut() {
            probe.set_pose(origin, direction);
        }
        if let Some(probe) = self.far_probe.as_mut() {
            probe.set_pose(origin, direction);
        }
        self.attach.set_origin(origin);
    }

    // ── Read-Models ─────────────────────────────────────────────────

    /// Region zum Beginn dieses Ticks.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Region aus dem aktuellen Zustand (für Notifications nach Mutation).
    pub(crate) fn region_now(&self, selecting: bool) -> Region {
        if !selecting {
            Region::None
        } else if self.attach.has_offset() {
            Region::Far
        } else {
            Region::Near
        }
    }

    /// Geordnete Zielliste dieses Ticks.
    ///
    /// Enthält per Design höchstens ein Ziel — Multi-Target-Auflösung ist
    /// bewusst aufgeschoben. Aufrufer dürfen keine Länge > 1 annehmen.
    pub fn valid_targets(&self) -> &[Candidate] {
        &self.valid_targets
    }

    /// Vollständig gerankte Kandidatenliste (Read-Model, z.B. für Affordances).
    pub fn ranked_targets(&self) -> &[Candidate] {
        &self.ranked
    }

    /// Zustand des Far-Casts in diesem Tick.
    pub fn ray(&self) -> RayCastState {
        self.ray
    }

    /// Darf die Einbettung den Far-Strahl in diesem Tick zeichnen?
    ///
    /// Nach einem Near-gepinnten Release für genau einen Tick unterdrückt,
    /// damit der Strahl nicht für einen Frame aufblitzt.
    pub fn far_visual_visible(&self) -> bool {
        self.ray.valid && !self.visual_suppressed_this_tick
    }

    /// Interagiert der Actor in diesem Tick aktiv mit externem UI?
    pub fn ui_interaction(&self) -> bool {
        self.ui_interaction
    }

    /// Cast-Quelle der aktiven Selektion (überlebt Frame-Grenzen).
    pub fn selected_cast_source(&self) -> CastSource {
        self.selected_cast_source
    }

    // ── Per-Tick-Auswertung (Preprocess) ────────────────────────────

    /// Wertet beide Probe-Quellen aus; `selecting` ist der Selektionsstand
    /// zum Tick-Beginn.
    pub(crate) fn evaluate(
        &mut self,
        ctx: &ActorContext,
        registry: &InteractionRegistry,
        dt: f32,
        selecting: bool,
    ) {
        // 1. Scratch-Zustand zurücksetzen.
        self.ranked.clear();
        self.valid_targets.clear();
        self.ui_interaction = false;
        self.ray = RayCastState::default();
        self.visual_suppressed_this_tick = self.suppress_far_visual;
        self.suppress_far_visual = false;

        // 2. Geteilte Ressourcen: Attach-Offset-Animation.
        self.attach.update(dt);

        // 3. Region zum Tick-Beginn (bewusst einen Tick hinter Schritt 2).
        self.region = self.region_now(selecting);

        // 4. Near-Probe.
        if !selecting && self.near_enabled {
            self.evaluate_near(ctx, registry);
        }

        // 5. Far-Probe (harte Near-Präzedenz: bei Near-Treffer übersprungen).
        let far_selecting = selecting && self.selected_cast_source == CastSource::Far;
        if (self.far_enabled || far_selecting) && self.valid_targets.is_empty() {
            self.evaluate_far(ctx, registry, selecting);
        }
    }

    fn evaluate_near(&mut self, ctx: &ActorContext, registry: &InteractionRegistry) {
        let Some(probe) = self.near_probe.as_mut() else {
            return;
        };

        self.scratch_colliders.clear();
        if !probe.collider_targets(registry, &mut self.scratch_colliders) {
            return;
        }

        let origin = probe.cast_origin();
        let items: Vec<(ColliderId, f32)> = self
            .scratch_colliders
            .iter()
            .filter_map(|&collider_id| {
                let collider = registry.collider(collider_id)?;
                let d = collider.surface_distance(origin);
                Some((collider_id, d * d))
            })
            .collect();

        resolve_ranked(
            ctx,
            registry,
            CastSource::Near,
            &items,
            self.sort_mode,
            self.target_filter.as_deref_mut(),
            &mut self.ranked,
        );

        if let Some(best) = self.ranked.first() {
            self.valid_targets.push(*best);
        }
    }

    fn evaluate_far(
        &mut self,
        ctx: &ActorContext,
        registry: &InteractionRegistry,
        selecting: bool,
    ) {
        let Some(probe) = self.far_probe.as_mut() else {
            return;
        };

        self.scratch_colliders.clear();
        self.scratch_hits.clear();
        let any_3d =
            probe.collider_targets(registry, &mut self.scratch_colliders, &mut self.scratch_hits);
        let curve_end = probe.last_sample_point();

        if selecting {
            // Genau eine aktive Selektion: keine Re-Auflösung, nur den
            // visuellen Endpunkt am nächsten aktuellen Treffer nachführen.
            if any_3d {
                self.ray.valid = true;
                self.ray.hit_index = Some(0);
                self.ray.endpoint = self.scratch_hits[0].point;
            } else {
                self.ray.endpoint = curve_end;
            }
            return;
        }

        let hit_3d = self.scratch_hits.first().copied();
        let ui_hit = self
            .ui_provider
            .as_ref()
            .and_then(|provider| provider.current_raycast());

        let same_object = match (&hit_3d, &ui_hit) {
            (Some(hit), Some(ui)) => {
                let owner = registry
                    .try_get_interactable_for_collider(hit.collider)
                    .map(|(interactable, _)| interactable);
                ui.owner.is_some() && ui.owner == owner
            }
            _ => false,
        };

        // Quellen rein nach quadrierter Distanz vom Cast-Ursprung ranken und
        // unabhängig entscheiden, ob sie in diesem Tick verarbeitet werden.
        let d3_sq = hit_3d.map(|hit| hit.distance * hit.distance);
        let dui_sq = ui_hit.map(|ui| ui.distance * ui.distance);
        let process_3d = match (d3_sq, dui_sq) {
            (Some(_), None) => true,
            (Some(d3), Some(dui)) => same_object || d3 <= dui,
            (None, _) => false,
        };
        let process_ui = match (d3_sq, dui_sq) {
            (None, Some(_)) => true,
            (Some(d3), Some(dui)) => same_object || dui < d3,
            (_, None) => false,
        };

        let mut handled = false;

        if process_3d {
            let items: Vec<(ColliderId, f32)> = self
                .scratch_hits
                .iter()
                .map(|hit| (hit.collider, hit.distance * hit.distance))
                .collect();

            resolve_ranked(
                ctx,
                registry,
                CastSource::Far,
                &items,
                self.sort_mode,
                self.target_filter.as_deref_mut(),
                &mut self.ranked,
            );

            if let Some(best) = self.ranked.first().copied() {
                // Wahren First-Hit-Index erfassen: ein Snap-Volume-Collider
                // vor dem eigentlichen Interactable verschiebt den
                // effektiven Treffer — nicht stumpf Index 0 nehmen.
                let hit_index = self
                    .scratch_hits
                    .iter()
                    .position(|hit| {
                        registry
                            .try_get_interactable_for_collider(hit.collider)
                            .map(|(interactable, _)| interactable)
                            == Some(best.interactable)
                    })
                    .unwrap_or(0);

                self.ray.valid = true;
                self.ray.hit_index = Some(hit_index);
                self.ray.endpoint = self.scratch_hits[hit_index].point;
                self.valid_targets.push(best);
                handled = true;
            }
        }

        // Kein selektierbares 3D-Ziel: Fallback auf den UI-Treffer.
        if !handled && process_ui {
            if let Some(ui) = ui_hit {
                self.ray.valid = true;
                self.ray.from_ui = true;
                self.ray.endpoint = ui.position;
                self.ui_interaction = self
                    .ui_provider
                    .as_ref()
                    .map(|provider| provider.is_select_active())
                    .unwrap_or(false);
                handled = true;
            }
        }

        if !handled {
            // Kein verwertbarer Treffer: Ray-Ergebnis dieses Ticks ungültig.
            self.ray.endpoint = curve_end;
        }
    }

    // ── Selection-Entry/-Exit (Process) ─────────────────────────────

    /// Schritt 6: Übergang von null auf eine Selektion.
    ///
    /// Entscheidet anhand Resolver-Default und Interactable-Präferenz, ob
    /// der Attach-Punkt zum Far-Hit wandert oder an der Hand bleibt.
    pub(crate) fn on_selection_entered(
        &mut self,
        source: CastSource,
        preference: AttachPreference,
        far_point: Vec3,
    ) {
        self.selected_cast_source = source;

        let use_far = match preference {
            AttachPreference::Near => false,
            AttachPreference::Far => true,
            AttachPreference::DeferToInteractor => self.far_attach_mode == FarAttachMode::Far,
        };

        if source == CastSource::Far && use_far {
            self.attach.move_to_world(far_point);
        } else {
            // Offset nullen pinnt die Region auf Near, bis wieder gezogen wird.
            self.attach.reset();
        }
    }

    /// Schritt 7: letzte Selektion wurde gelöst.
    ///
    /// Ein Release bei exakt null Offset unterdrückt den Far-Strahl für
    /// genau einen Tick (verhindert das Ein-Frame-Aufblitzen, bevor die
    /// nächste Auswertung ihn erneut unterdrücken kann).
    pub(crate) fn on_last_selection_exited(&mut self) {
        if !self.attach.has_offset() {
            self.suppress_far_visual = true;
        }
        self.attach.reset();
        self.selected_cast_source = CastSource::None;
    }
}

impl Default for NearFarResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Löst Collider-Treffer zu hover-berechtigten Kandidaten auf, wendet den
/// optionalen Filter an und sortiert bei Bedarf.
fn resolve_ranked(
    ctx: &ActorContext,
    registry: &InteractionRegistry,
    source: CastSource,
    items: &[(ColliderId, f32)],
    sort_mode: TargetSortMode,
    mut filter: Option<&mut (dyn TargetFilter + 'static)>,
    ranked_out: &mut Vec<Candidate>,
) {
    let mut pre_filtered: Vec<Candidate> = Vec::with_capacity(items.len());

    for &(collider_id, distance_sq) in items {
        let Some((interactable, snap_volume)) =
            registry.try_get_interactable_for_collider(collider_id)
        else {
            continue;
        };
        // Pro Interactable zählt nur der erstplatzierte Treffer.
        if pre_filtered
            .iter()
            .any(|candidate| candidate.interactable == interactable)
        {
            continue;
        }
        if !registry.is_hover_possible(ctx.handedness, interactable) {
            continue;
        }
        pre_filtered.push(Candidate {
            interactable,
            collider: collider_id,
            snap_volume,
            source,
            distance_sq,
        });
    }

    let filter_sorts = match filter.as_mut() {
        Some(filter) => {
            filter.process(ctx, registry, &pre_filtered, ranked_out);
            filter.sorts_targets()
        }
        None => {
            ranked_out.extend_from_slice(&pre_filtered);
            false
        }
    };

    if !filter_sorts {
        sort_candidates(sort_mode, registry, ctx.attach_point, ranked_out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactable::Handedness;
    use crate::core::{Collider, ColliderKind, Interactable, InteractableId};

    fn ctx() -> ActorContext {
        ActorContext {
            actor: 1,
            handedness: Handedness::None,
            attach_point: Vec3::ZERO,
        }
    }

    fn registry_with_near_and_far() -> InteractionRegistry {
        let mut registry = InteractionRegistry::new();
        registry.register_interactable(Interactable::new(1, Vec3::new(0.1, 0.0, 0.0)));
        registry.register_interactable(Interactable::new(2, Vec3::new(5.0, 0.0, 0.0)));
        registry.register_collider(
            Collider::sphere(11, Vec3::new(0.1, 0.0, 0.0), 0.05),
            1,
            ColliderKind::Surface,
        );
        registry.register_collider(
            Collider::sphere(12, Vec3::new(5.0, 0.0, 0.0), 0.5),
            2,
            ColliderKind::Surface,
        );
        registry.refresh_spatial_index();
        registry
    }

    fn resolver_with_probes() -> NearFarResolver {
        let mut resolver = NearFarResolver::new();
        resolver.set_near_probe(Box::new(SphereOverlapProbe::new(Vec3::ZERO, 0.1)));
        resolver.set_far_probe(Box::new(LineCastProbe::new(Vec3::ZERO, Vec3::X, 10.0, 8)));
        resolver
    }

    #[test]
    fn near_hit_skips_far_evaluation_entirely() {
        let registry = registry_with_near_and_far();
        let mut resolver = resolver_with_probes();

        resolver.evaluate(&ctx(), &registry, 0.016, false);

        let targets = resolver.valid_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].interactable, 1);
        assert_eq!(targets[0].source, CastSource::Near);
        // Far wurde übersprungen: kein Ray-Treffer trotz Treffer in Reichweite.
        assert!(!resolver.ray().valid);
    }

    #[test]
    fn far_hit_resolves_when_near_is_empty() {
        let mut registry = registry_with_near_and_far();
        registry.unregister_interactable(1);
        registry.refresh_spatial_index();

        let mut resolver = resolver_with_probes();
        resolver.evaluate(&ctx(), &registry, 0.016, false);

        let targets = resolver.valid_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].interactable, 2);
        assert_eq!(targets[0].source, CastSource::Far);
        assert!(resolver.ray().valid);
        assert_eq!(resolver.ray().hit_index, Some(0));
    }

    #[test]
    fn snap_volume_shifts_effective_hit_index() {
        let mut registry = InteractionRegistry::new();
        registry.register_interactable(Interactable::new(1, Vec3::new(4.0, 0.0, 0.0)));
        registry.register_interactable(Interactable::new(2, Vec3::new(6.0, 0.0, 0.0)));
        // Snap-Volume von Interactable 2 liegt vor dessen Oberfläche, aber
        // hinter Interactable 1.
        registry.register_collider(
            Collider::sphere(11, Vec3::new(4.0, 0.0, 0.0), 0.2),
            1,
            ColliderKind::Surface,
        );
        registry.register_collider(
            Collider::sphere(21, Vec3::new(6.0, 0.0, 0.0), 0.2),
            2,
            ColliderKind::Surface,
        );
        registry.register_collider(
            Collider::sphere(22, Vec3::new(5.0, 0.0, 0.0), 0.3),
            2,
            ColliderKind::SnapVolume,
        );
        // Interactable 1 ist nicht hoverbar: das Ziel wird Interactable 2.
        registry.interactable_mut(1).unwrap().hoverable = false;
        registry.refresh_spatial_index();

        let mut resolver = NearFarResolver::new();
        resolver.set_far_probe(Box::new(LineCastProbe::new(Vec3::ZERO, Vec3::X, 10.0, 8)));
        resolver.evaluate(&ctx(), &registry, 0.016, false);

        let targets = resolver.valid_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].interactable, 2);
        // Effektiver Treffer ist das Snap-Volume (Index 1 hinter dem
        // nicht-hoverbaren Interactable 1), nicht Index 0.
        assert_eq!(resolver.ray().hit_index, Some(1));
    }

    #[test]
    fn region_reflects_attach_offset() {
        let registry = registry_with_near_and_far();
        let mut resolver = resolver_with_probes();

        resolver.evaluate(&ctx(), &registry, 0.016, false);
        assert_eq!(resolver.region(), Region::None);

        // Selektion ohne Offset: Near.
        resolver.evaluate(&ctx(), &registry, 0.016, true);
        assert_eq!(resolver.region(), Region::Near);

        // Offset anlegen: Region wird Far (einen Tick später).
        resolver.attach_mut().move_to_world(Vec3::new(3.0, 0.0, 0.0));
        resolver.evaluate(&ctx(), &registry, 0.1, true);
        assert_eq!(resolver.region(), Region::Far);
    }

    #[test]
    fn near_release_suppresses_far_visual_for_one_tick() {
        let mut registry = registry_with_near_and_far();
        registry.unregister_interactable(1);
        registry.refresh_spatial_index();

        let mut resolver = resolver_with_probes();
        resolver.on_last_selection_exited();

        resolver.evaluate(&ctx(), &registry, 0.016, false);
        assert!(resolver.ray().valid);
        assert!(!resolver.far_visual_visible());

        // Nächster Tick: Unterdrückung ist vorbei.
        resolver.evaluate(&ctx(), &registry, 0.016, false);
        assert!(resolver.far_visual_visible());
    }

    struct RejectInteractable(InteractableId);

    impl TargetFilter for RejectInteractable {
        fn process(
            &mut self,
            _ctx: &ActorContext,
            _registry: &InteractionRegistry,
            pre_filtered: &[Candidate],
            out: &mut Vec<Candidate>,
        ) {
            out.extend(
                pre_filtered
                    .iter()
                    .copied()
                    .filter(|candidate| candidate.interactable != self.0),
            );
        }
    }

    #[test]
    fn target_filter_rejection_falls_through_to_far() {
        let registry = registry_with_near_and_far();
        let mut resolver = resolver_with_probes();
        resolver.set_target_filter(Box::new(RejectInteractable(1)));

        resolver.evaluate(&ctx(), &registry, 0.016, false);

        // Der Filter verwirft das nahe Ziel in beiden Quellen; übrig bleibt
        // das ferne über den Far-Cast.
        let targets = resolver.valid_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].interactable, 2);
        assert_eq!(targets[0].source, CastSource::Far);
    }

    #[test]
    fn from_options_sizes_default_probes() {
        let mut registry = InteractionRegistry::new();
        registry.register_interactable(Interactable::new(2, Vec3::new(5.0, 0.0, 0.0)));
        registry.register_collider(
            Collider::sphere(12, Vec3::new(5.0, 0.0, 0.0), 0.5),
            2,
            ColliderKind::Surface,
        );
        registry.refresh_spatial_index();

        // Kurzer Cast endet vor dem Ziel.
        let options = InteractionOptions {
            far_cast_length: 3.0,
            far_cast_samples: 4,
            ..InteractionOptions::default()
        };
        let mut resolver = NearFarResolver::from_options(&options);
        resolver.set_probe_pose(Vec3::ZERO, Vec3::X);
        resolver.evaluate(&ctx(), &registry, 0.016, false);
        assert!(resolver.valid_targets().is_empty());
        assert!(!resolver.ray().valid);

        // Default-Länge erreicht das Ziel ohne explizit gesetzte Probes.
        let mut resolver = NearFarResolver::from_options(&InteractionOptions::default());
        resolver.set_probe_pose(Vec3::ZERO, Vec3::X);
        resolver.evaluate(&ctx(), &registry, 0.016, false);
        let targets = resolver.valid_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].interactable, 2);
        assert_eq!(targets[0].source, CastSource::Far);

        // Aufgeweiteter Near-Radius greift dasselbe Ziel volumetrisch.
        let options = InteractionOptions {
            near_radius: 5.0,
            ..InteractionOptions::default()
        };
        let mut resolver = NearFarResolver::from_options(&options);
        resolver.evaluate(&ctx(), &registry, 0.016, false);
        let targets = resolver.valid_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].source, CastSource::Near);
    }
}
