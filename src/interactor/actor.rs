//! Actor: hovert und selektiert Interactables über den Dual-Region-Resolver.
//!
//! Jeder Tick zerfällt in Preprocess (Input-Interpretation, Probe-Auswertung,
//! keine actor-übergreifende Mutation) und Process (Hover-/Selektions-
//! Mutation). Die Arbitrierung zwischen Actors übernimmt der Group-Layer.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::near_far::{NearFarResolver, Region};
use super::targeting::{ActorContext, Candidate};
use crate::core::interactable::Handedness;
use crate::core::{ActorId, GroupId, InteractableId, InteractionRegistry};
use crate::events::{EventLog, InteractionEvent};
use crate::input::reader::InputReader;
use crate::input::trigger::{InputSample, LogicalInputState};
use crate::shared::options::InteractionOptions;

/// Wie viele aufgelöste Kandidaten der Actor als Read-Model publiziert.
///
/// Rein observationell (z.B. für Affordance-Systeme) — beeinflusst die
/// Arbitrierung nicht.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetPriorityMode {
    /// Nichts publizieren
    None,
    /// Nur den bestplatzierten Kandidaten publizieren
    #[default]
    HighestPriorityOnly,
    /// Die vollständige gerankte Liste publizieren
    All,
}

/// Ergebnis eines Process-Durchlaufs (für Arbitrierung und Steal-Auflösung).
pub(crate) struct ProcessOutcome {
    /// Actor hat in diesem Tick interagiert (Selektion, Hover oder UI)
    pub performed: bool,
    /// In diesem Tick neu erworbene Selektionen
    pub acquired: Vec<InteractableId>,
}

/// Ein Actor (Interactor): Hand, Controller oder Ray.
pub struct Actor {
    id: ActorId,
    handedness: Handedness,
    hovered: IndexSet<InteractableId>,
    selected: IndexSet<InteractableId>,
    keep_selected_target_valid: bool,
    target_priority_mode: TargetPriorityMode,
    select_input: LogicalInputState,
    activate_input: LogicalInputState,
    select_sample: InputSample,
    activate_sample: InputSample,
    select_reader: Option<Box<dyn InputReader>>,
    activate_reader: Option<Box<dyn InputReader>>,
    resolver: NearFarResolver,
    containing_group: Option<GroupId>,
    published_targets: Vec<Candidate>,
    last_notified_region: Region,
}

impl Actor {
    /// Erstellt einen Actor mit Default-Optionen.
    pub fn new(id: ActorId) -> Self {
        Self::with_options(id, &InteractionOptions::default())
    }

    /// Erstellt einen Actor aus den Engine-Optionen.
    pub fn with_options(id: ActorId, options: &InteractionOptions) -> Self {
        Self {
            id,
            handedness: Handedness::None,
            hovered: IndexSet::new(),
            selected: IndexSet::new(),
            keep_selected_target_valid: options.keep_selected_target_valid,
            target_priority_mode: TargetPriorityMode::default(),
            select_input: LogicalInputState::new(options.select_trigger_mode),
            activate_input: LogicalInputState::new(options.activate_trigger_mode),
            select_sample: InputSample::default(),
            activate_sample: InputSample::default(),
            select_reader: None,
            activate_reader: None,
            resolver: NearFarResolver::from_options(options),
            containing_group: None,
            published_targets: Vec::new(),
            last_notified_region: Region::None,
        }
    }

    // ── Identität & Konfiguration ───────────────────────────────────

    /// ID des Actors.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Händigkeit des Actors.
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Setzt die Händigkeit.
    pub fn set_handedness(&mut self, handedness: Handedness) {
        self.handedness = handedness;
    }

    /// Muss die aktuelle Selektion gültig bleiben (statt Ziel-Neuwahl)?
    pub fn keep_selected_target_valid(&self) -> bool {
        self.keep_selected_target_valid
    }

    /// Setzt das Verhalten beim Verlassen der Zielliste.
    pub fn set_keep_selected_target_valid(&mut self, keep: bool) {
        self.keep_selected_target_valid = keep;
    }

    /// Setzt den Publikations-Modus der Kandidatenliste.
    pub fn set_target_priority_mode(&mut self, mode: TargetPriorityMode) {
        self.target_priority_mode = mode;
    }

    /// Group, der dieser Actor aktuell angehört.
    pub fn containing_group(&self) -> Option<GroupId> {
        self.containing_group
    }

    pub(crate) fn set_containing_group(&mut self, group: Option<GroupId>) {
        self.containing_group = group;
    }

    // ── Input ───────────────────────────────────────────────────────

    /// Setzt das Select-Sample für den nächsten Tick (manuelles Feeding).
    pub fn set_select_sample(&mut self, sample: InputSample) {
        self.select_sample = sample;
    }

    /// Setzt das Activate-Sample für den nächsten Tick.
    pub fn set_activate_sample(&mut self, sample: InputSample) {
        self.activate_sample = sample;
    }

    /// Bindet einen Select-Reader; überschreibt manuelle Samples.
    pub fn set_select_reader(&mut self, reader: Box<dyn InputReader>) {
        self.select_reader = Some(reader);
    }

    /// Bindet einen Activate-Reader.
    pub fn set_activate_reader(&mut self, reader: Box<dyn InputReader>) {
        self.activate_reader = Some(reader);
    }

    /// Logischer Select-Zustand.
    pub fn select_input(&self) -> &LogicalInputState {
        &self.select_input
    }

    /// Mutable Zugriff (z.B. Trigger-Moduswechsel zur Laufzeit).
    pub fn select_input_mut(&mut self) -> &mut LogicalInputState {
        &mut self.select_input
    }

    /// Logischer Activate-Zustand.
    pub fn activate_input(&self) -> &LogicalInputState {
        &self.activate_input
    }

    // ── Read-Models ─────────────────────────────────────────────────

    /// Aktuell gehoverte Interactables (geordnet).
    pub fn hovered(&self) -> &IndexSet<InteractableId> {
        &self.hovered
    }

    /// Aktuelle Selektionen (geordnet).
    pub fn selected(&self) -> &IndexSet<InteractableId> {
        &self.selected
    }

    /// Hat der Actor aktuell mindestens eine Selektion?
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Publizierte Kandidaten gemäß `TargetPriorityMode`.
    pub fn published_targets(&self) -> &[Candidate] {
        &self.published_targets
    }

    /// Der Dual-Region-Resolver dieses Actors.
    pub fn resolver(&self) -> &NearFarResolver {
        &self.resolver
    }

    /// Mutable Resolver-Zugriff (Probes einhängen, Pose-Updates).
    pub fn resolver_mut(&mut self) -> &mut NearFarResolver {
        &mut self.resolver
    }

    fn context(&self) -> ActorContext {
        ActorContext {
            actor: self.id,
            handedness: self.handedness,
            attach_point: self.resolver.attach().attach_point(),
        }
    }

    // ── Tick-Phasen ─────────────────────────────────────────────────

    /// Preprocess: Input interpretieren und Probe-Quellen auswerten.
    /// Keine actor-übergreifende Mutation.
    pub(crate) fn preprocess(
        &mut self,
        registry: &InteractionRegistry,
        tick: u64,
        now: f64,
        dt: f32,
    ) {
        if let Some(reader) = self.select_reader.as_mut() {
            self.select_sample = reader.read();
        }
        if let Some(reader) = self.activate_reader.as_mut() {
            self.activate_sample = reader.read();
        }

        let has_selection = !self.selected.is_empty();
        self.select_input
            .update_input(self.select_sample, has_selection, tick, now);
        self.activate_input
            .update_input(self.activate_sample, has_selection, tick, now);

        // Manuelle Samples verbrauchen ihre Edges; der Pegel bleibt stehen.
        self.select_sample = InputSample {
            performed: self.select_sample.performed,
            performed_this_frame: false,
            completed_this_frame: false,
        };
        self.activate_sample = InputSample {
            performed: self.activate_sample.performed,
            performed_this_frame: false,
            completed_this_frame: false,
        };

        let ctx = self.context();
        self.resolver.evaluate(&ctx, registry, dt, has_selection);

        self.published_targets.clear();
        match self.target_priority_mode {
            TargetPriorityMode::None => {}
            TargetPriorityMode::HighestPriorityOnly => {
                self.published_targets
                    .extend(self.resolver.ranked_targets().first().copied());
            }
            TargetPriorityMode::All => {
                self.published_targets
                    .extend_from_slice(self.resolver.ranked_targets());
            }
        }
    }

    /// Process: Hover-/Selektionszustand anwenden.
    pub(crate) fn process(
        &mut self,
        registry: &InteractionRegistry,
        events: &mut EventLog,
    ) -> ProcessOutcome {
        let mut acquired = Vec::new();

        // Ungültig gewordene Selektionen lösen.
        let stale: Vec<InteractableId> = self
            .selected
            .iter()
            .copied()
            .filter(|&id| {
                if !registry.can_select(self.handedness, id) {
                    return true;
                }
                if !self.keep_selected_target_valid {
                    // Ohne Keep-Flag fällt die Selektion, sobald das Ziel
                    // die Zielliste verlässt.
                    return !self
                        .resolver
                        .valid_targets()
                        .iter()
                        .any(|candidate| candidate.interactable == id);
                }
                false
            })
            .collect();
        for id in stale {
            self.deselect_internal(id, events);
        }

        // Hover mit der Zielliste abgleichen (Exits vor Enters).
        let desired: Vec<InteractableId> = self
            .resolver
            .valid_targets()
            .iter()
            .filter(|candidate| registry.is_hover_possible(self.handedness, candidate.interactable))
            .map(|candidate| candidate.interactable)
            .collect();
        let exits: Vec<InteractableId> = self
            .hovered
            .iter()
            .copied()
            .filter(|id| !desired.contains(id))
            .collect();
        for id in exits {
            self.hovered.shift_remove(&id);
            events.record(InteractionEvent::HoverExited {
                actor: self.id,
                interactable: id,
            });
        }
        for id in desired {
            if self.hovered.insert(id) {
                events.record(InteractionEvent::HoverEntered {
                    actor: self.id,
                    interactable: id,
                });
            }
        }

        // Selektion erwerben oder lösen.
        if self.select_input.active() {
            if let Some(best) = self.resolver.valid_targets().first().copied() {
                if !self.selected.contains(&best.interactable)
                    && registry.can_select(self.handedness, best.interactable)
                {
                    let was_empty = self.selected.is_empty();
                    self.selected.insert(best.interactable);
                    events.record(InteractionEvent::SelectEntered {
                        actor: self.id,
                        interactable: best.interactable,
                    });
                    acquired.push(best.interactable);

                    if was_empty {
                        let preference = registry
                            .interactable(best.interactable)
                            .map(|interactable| interactable.attach_preference)
                            .unwrap_or_default();
                        let far_point = self.resolver.ray().endpoint;
                        self.resolver
                            .on_selection_entered(best.source, preference, far_point);
                    }
                    self.select_input.update_has_selection(true);
                }
            }
        } else if !self.selected.is_empty() {
            let held: Vec<InteractableId> = self.selected.iter().copied().collect();
            for id in held {
                self.deselect_internal(id, events);
            }
        }

        // Region-Notification nach allen Exits dispatchen.
        self.notify_region(events);

        ProcessOutcome {
            performed: !self.selected.is_empty()
                || !self.hovered.is_empty()
                || self.resolver.ui_interaction(),
            acquired,
        }
    }

    /// Harte Suppression durch die Group-Arbitrierung: alle Hover und
    /// Selektionen dieses Actors werden für diesen Tick gelöscht.
    pub(crate) fn clear_interactions(&mut self, events: &mut EventLog) {
        let hovers: Vec<InteractableId> = self.hovered.iter().copied().collect();
        for id in hovers {
            self.hovered.shift_remove(&id);
            events.record(InteractionEvent::HoverExited {
                actor: self.id,
                interactable: id,
            });
        }

        let held: Vec<InteractableId> = self.selected.iter().copied().collect();
        for id in held {
            self.deselect_internal(id, events);
        }

        self.notify_region(events);
    }

    /// Selektion wurde extern entzogen (Single-Mode-Steal durch anderen Actor).
    pub(crate) fn force_deselect(&mut self, interactable: InteractableId, events: &mut EventLog) {
        self.deselect_internal(interactable, events);
        self.notify_region(events);
    }

    /// Kann dieser Actor in diesem Tick (weiterhin) agieren?
    ///
    /// Mit Keep-Flag zählt die bestehende Selektion, sonst die frisch
    /// berechnete Zielliste. Laufende UI-Interaktion zählt immer.
    pub(crate) fn can_select_something(&self, registry: &InteractionRegistry) -> bool {
        if self.resolver.ui_interaction() {
            return true;
        }
        if !self.select_input.active() {
            return false;
        }
        if self.keep_selected_target_valid && !self.selected.is_empty() {
            self.selected
                .iter()
                .any(|&id| registry.can_select(self.handedness, id))
        } else {
            self.resolver
                .valid_targets()
                .iter()
                .any(|candidate| registry.can_select(self.handedness, candidate.interactable))
        }
    }

    fn deselect_internal(&mut self, interactable: InteractableId, events: &mut EventLog) {
        if !self.selected.shift_remove(&interactable) {
            return;
        }
        events.record(InteractionEvent::SelectExited {
            actor: self.id,
            interactable,
        });
        if self.selected.is_empty() {
            self.resolver.on_last_selection_exited();
        }
        let has_selection = !self.selected.is_empty();
        self.select_input.update_has_selection(has_selection);
        self.activate_input.update_has_selection(has_selection);
    }

    fn notify_region(&mut self, events: &mut EventLog) {
        let region = self.resolver.region_now(!self.selected.is_empty());
        if region != self.last_notified_region {
            self.last_notified_region = region;
            events.record(InteractionEvent::RegionChanged {
                actor: self.id,
                region,
            });
        }
    }
}
