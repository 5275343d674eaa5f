//! Tick-Orchestrierung: Registrierung, Zwei-Phasen-Tick und Steal-Auflösung.
//!
//! Der Manager ist single-threaded. Ein Tick läuft in fester Reihenfolge:
//! Event-Log segmentieren → Registrierungs-Queue flushen → Spatial-Index
//! auffrischen → **alle** Actors preprocessen → Top-Level-Mitglieder in
//! Registrierungsreihenfolge processen (Groups arbitrieren dabei intern) →
//! Single-Mode-Steals auflösen.
//!
//! Actor- und Group-Registrierung ist double-buffered: Aufrufe landen in
//! einer Queue und greifen erst beim Flush zu Beginn des nächsten Ticks.
//! Mitgliedschafts-Operationen prüfen eager (Zyklen, Doppel-Zugehörigkeit)
//! und greifen sofort; sie setzen bereits geflushte Teilnehmer voraus.

use indexmap::IndexMap;

use crate::core::{ActorId, GroupId, InteractableId, InteractionRegistry, SelectMode};
use crate::events::EventLog;
use crate::group::arbiter::{arbitrate_group, GroupError, InteractionGroup};
use crate::group::member::GroupMember;
use crate::interactor::actor::Actor;

enum PendingOp {
    RegisterActor(Box<Actor>),
    UnregisterActor(ActorId),
    RegisterGroup(GroupId),
    UnregisterGroup(GroupId),
}

/// Fassade über Registry, Actors und Groups.
#[derive(Default)]
pub struct InteractionManager {
    registry: InteractionRegistry,
    actors: IndexMap<ActorId, Actor>,
    groups: IndexMap<GroupId, InteractionGroup>,
    /// Ungrouped Actors und Root-Groups in Registrierungsreihenfolge.
    top_level: Vec<GroupMember>,
    pending: Vec<PendingOp>,
    events: EventLog,
    tick_in_progress: bool,
    tick: u64,
    time: f64,
}

impl InteractionManager {
    /// Erstellt einen leeren Manager.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registrierung (double-buffered) ─────────────────────────────

    /// Meldet einen Actor an; nimmt ab dem nächsten Tick teil.
    pub fn register_actor(&mut self, actor: Actor) {
        self.pending.push(PendingOp::RegisterActor(Box::new(actor)));
    }

    /// Meldet einen Actor ab; laufende Interaktionen werden beim Flush
    /// sauber beendet (Exit-Events).
    pub fn unregister_actor(&mut self, id: ActorId) {
        self.pending.push(PendingOp::UnregisterActor(id));
    }

    /// Meldet eine leere Group an; nimmt ab dem nächsten Tick teil.
    pub fn register_group(&mut self, id: GroupId) {
        self.pending.push(PendingOp::RegisterGroup(id));
    }

    /// Meldet eine Group ab; ihre Mitglieder werden beim Flush top-level.
    pub fn unregister_group(&mut self, id: GroupId) {
        self.pending.push(PendingOp::UnregisterGroup(id));
    }

    // ── Mitgliedschaft (eager geprüft, sofort wirksam) ──────────────

    /// Hängt ein Mitglied ans Ende der Prioritätsliste einer Group.
    pub fn add_group_member(
        &mut self,
        group: GroupId,
        member: GroupMember,
    ) -> Result<(), GroupError> {
        self.insert_group_member(group, usize::MAX, member)
    }

    /// Fügt ein Mitglied an einer bestimmten Prioritätsposition ein.
    ///
    /// Zyklen und Doppel-Zugehörigkeit werden eager abgewiesen; die
    /// Mitgliedschaft bleibt dann unverändert.
    pub fn insert_group_member(
        &mut self,
        group: GroupId,
        index: usize,
        member: GroupMember,
    ) -> Result<(), GroupError> {
        if self.tick_in_progress {
            return Err(GroupError::MutationDuringIteration);
        }
        if !self.groups.contains_key(&group) {
            return Err(GroupError::UnknownMember(GroupMember::Group(group)));
        }

        match member {
            GroupMember::Actor(id) => {
                let actor = self
                    .actors
                    .get(&id)
                    .ok_or(GroupError::UnknownMember(member))?;
                if let Some(owner) = actor.containing_group() {
                    return Err(GroupError::AlreadyMember(owner));
                }
            }
            GroupMember::Group(id) => {
                if id == group {
                    return Err(GroupError::SelfMembership);
                }
                let sub = self
                    .groups
                    .get(&id)
                    .ok_or(GroupError::UnknownMember(member))?;
                if let Some(owner) = sub.containing_group() {
                    return Err(GroupError::AlreadyMember(owner));
                }
                // Zyklus: die Ziel-Group darf nicht (transitiv) in der
                // aufzunehmenden Group enthalten sein.
                let mut cursor = Some(group);
                while let Some(current) = cursor {
                    if current == id {
                        return Err(GroupError::CyclicMembership);
                    }
                    cursor = self
                        .groups
                        .get(&current)
                        .and_then(|g| g.containing_group());
                }
            }
        }

        if let Some(target) = self.groups.get_mut(&group) {
            target.insert_member(index, member);
        }
        match member {
            GroupMember::Actor(id) => {
                if let Some(actor) = self.actors.get_mut(&id) {
                    actor.set_containing_group(Some(group));
                }
            }
            GroupMember::Group(id) => {
                if let Some(sub) = self.groups.get_mut(&id) {
                    sub.set_containing_group(Some(group));
                }
            }
        }
        self.top_level.retain(|m| *m != member);
        Ok(())
    }

    /// Entfernt ein Mitglied aus einer Group; es wird wieder top-level.
    pub fn remove_group_member(
        &mut self,
        group: GroupId,
        member: GroupMember,
    ) -> Result<(), GroupError> {
        if self.tick_in_progress {
            return Err(GroupError::MutationDuringIteration);
        }
        let target = self
            .groups
            .get_mut(&group)
            .ok_or(GroupError::UnknownMember(GroupMember::Group(group)))?;
        if !target.remove_member(member) {
            return Err(GroupError::UnknownMember(member));
        }
        if target.active_interactor().is_some_and(|active| {
            matches!(member, GroupMember::Actor(id) if id == active)
        }) {
            target.set_active_interactor(None);
        }

        match member {
            GroupMember::Actor(id) => {
                if let Some(actor) = self.actors.get_mut(&id) {
                    actor.set_containing_group(None);
                }
            }
            GroupMember::Group(id) => {
                if let Some(sub) = self.groups.get_mut(&id) {
                    sub.set_containing_group(None);
                }
            }
        }
        self.top_level.push(member);
        Ok(())
    }

    /// Verschiebt ein Mitglied an eine neue Prioritätsposition derselben
    /// Group.
    pub fn reorder_group_member(
        &mut self,
        group: GroupId,
        member: GroupMember,
        index: usize,
    ) -> Result<(), GroupError> {
        if self.tick_in_progress {
            return Err(GroupError::MutationDuringIteration);
        }
        let target = self
            .groups
            .get_mut(&group)
            .ok_or(GroupError::UnknownMember(GroupMember::Group(group)))?;
        if !target.remove_member(member) {
            return Err(GroupError::UnknownMember(member));
        }
        target.insert_member(index, member);
        Ok(())
    }

    // ── Zugriff ─────────────────────────────────────────────────────

    /// Die Welt-Registry (Interactables, Collider, Spatial-Index).
    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    /// Mutable Registry-Zugriff (Welt-Mutation zwischen Ticks).
    pub fn registry_mut(&mut self) -> &mut InteractionRegistry {
        &mut self.registry
    }

    /// Ein registrierter (geflushter) Actor.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Mutable Actor-Zugriff (Input-Feeding, Probe-Posen).
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Eine registrierte (geflushte) Group.
    pub fn group(&self, id: GroupId) -> Option<&InteractionGroup> {
        self.groups.get(&id)
    }

    /// Top-Level-Teilnehmer in Registrierungsreihenfolge.
    pub fn top_level(&self) -> &[GroupMember] {
        &self.top_level
    }

    /// Das Event-Log (tick-segmentiert).
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Anzahl der abgeschlossenen Ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Akkumulierte Simulationszeit in Sekunden.
    pub fn time(&self) -> f64 {
        self.time
    }

    // ── Tick ────────────────────────────────────────────────────────

    /// Schaltet die gesamte Engine um einen Tick weiter.
    pub fn tick(&mut self, dt: f32) {
        self.tick += 1;
        self.time += f64::from(dt);

        self.events.begin_tick();
        self.flush_pending();
        self.registry.refresh_spatial_index();

        self.tick_in_progress = true;

        // Phase 1: alle Actors preprocessen, bevor irgendeiner mutiert.
        for actor in self.actors.values_mut() {
            actor.preprocess(&self.registry, self.tick, self.time, dt);
        }

        // Phase 2: Top-Level in Registrierungsreihenfolge processen.
        let mut acquired: Vec<(ActorId, InteractableId)> = Vec::new();
        let top: Vec<GroupMember> = self.top_level.to_vec();
        for member in top {
            match member {
                GroupMember::Actor(id) => {
                    if let Some(actor) = self.actors.get_mut(&id) {
                        let outcome = actor.process(&self.registry, &mut self.events);
                        acquired.extend(outcome.acquired.iter().map(|&target| (id, target)));
                    }
                }
                GroupMember::Group(id) => {
                    arbitrate_group(
                        id,
                        &mut self.groups,
                        &mut self.actors,
                        &self.registry,
                        &mut self.events,
                        &mut acquired,
                    );
                }
            }
        }

        self.resolve_steals(&acquired);
        self.tick_in_progress = false;
    }

    fn flush_pending(&mut self) {
        let ops = std::mem::take(&mut self.pending);
        for op in ops {
            match op {
                PendingOp::RegisterActor(actor) => {
                    let id = actor.id();
                    if self.actors.contains_key(&id) {
                        log::warn!("Actor {id} ist bereits registriert — Anmeldung verworfen");
                        continue;
                    }
                    self.actors.insert(id, *actor);
                    self.top_level.push(GroupMember::Actor(id));
                }
                PendingOp::UnregisterActor(id) => {
                    let Some(mut actor) = self.actors.shift_remove(&id) else {
                        continue;
                    };
                    actor.clear_interactions(&mut self.events);
                    if let Some(owner) = actor.containing_group() {
                        if let Some(group) = self.groups.get_mut(&owner) {
                            group.remove_member(GroupMember::Actor(id));
                            if group.active_interactor() == Some(id) {
                                group.set_active_interactor(None);
                            }
                        }
                    } else {
                        self.top_level.retain(|m| *m != GroupMember::Actor(id));
                    }
                }
                PendingOp::RegisterGroup(id) => {
                    if self.groups.contains_key(&id) {
                        log::warn!("Group {id} ist bereits registriert — Anmeldung verworfen");
                        continue;
                    }
                    self.groups.insert(id, InteractionGroup::new(id));
                    self.top_level.push(GroupMember::Group(id));
                }
                PendingOp::UnregisterGroup(id) => {
                    let Some(group) = self.groups.shift_remove(&id) else {
                        continue;
                    };
                    // Mitglieder rücken in Mitgliedsreihenfolge auf Top-Level.
                    for member in group.members() {
                        match *member {
                            GroupMember::Actor(actor_id) => {
                                if let Some(actor) = self.actors.get_mut(&actor_id) {
                                    actor.set_containing_group(None);
                                }
                            }
                            GroupMember::Group(group_id) => {
                                if let Some(sub) = self.groups.get_mut(&group_id) {
                                    sub.set_containing_group(None);
                                }
                            }
                        }
                        self.top_level.push(*member);
                    }
                    if let Some(owner) = group.containing_group() {
                        if let Some(parent) = self.groups.get_mut(&owner) {
                            parent.remove_member(GroupMember::Group(id));
                        }
                    } else {
                        self.top_level.retain(|m| *m != GroupMember::Group(id));
                    }
                }
            }
        }
    }

    /// Single-Mode-Interactables dulden nur einen selektierenden Actor:
    /// der jüngste Erwerb entzieht allen früheren Haltern die Selektion.
    fn resolve_steals(&mut self, acquired: &[(ActorId, InteractableId)]) {
        for &(winner, target) in acquired {
            let is_single = self
                .registry
                .interactable(target)
                .is_some_and(|interactable| interactable.select_mode == SelectMode::Single);
            if !is_single {
                continue;
            }

            let victims: Vec<ActorId> = self
                .actors
                .iter()
                .filter(|(id, actor)| **id != winner && actor.selected().contains(&target))
                .map(|(id, _)| *id)
                .collect();
            for victim in victims {
                log::debug!(
                    "Selektion von Interactable {target} wandert von Actor {victim} zu Actor {winner}"
                );
                if let Some(actor) = self.actors.get_mut(&victim) {
                    actor.force_deselect(target, &mut self.events);
                }
            }
        }
    }
}
