//! Group-Arbitrierung: höchstens ein agierendes Mitglied pro Group und Tick.
//!
//! Die Mitgliederliste ist die Prioritätsreihenfolge. Ein zuvor aktiver
//! Actor, der weiterhin agieren kann, bleibt pre-priorisiert und schlägt
//! damit auch höher platzierte Mitglieder (Stickiness). Alle übrigen
//! Mitglieder werden für den Tick hart unterdrückt.

use indexmap::IndexMap;
use thiserror::Error;

use super::member::GroupMember;
use crate::core::{ActorId, GroupId, InteractableId, InteractionRegistry};
use crate::events::EventLog;
use crate::interactor::actor::Actor;

/// Fehler der Mitgliedschafts-Verwaltung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GroupError {
    /// Referenziertes Mitglied (oder Ziel-Group) ist nicht registriert
    #[error("Mitglied {0:?} ist nicht registriert")]
    UnknownMember(GroupMember),
    /// Mitglied gehört bereits einer Group an
    #[error("Mitglied gehört bereits Group {0} an")]
    AlreadyMember(GroupId),
    /// Eine Group kann sich nicht selbst enthalten
    #[error("Group kann sich nicht selbst enthalten")]
    SelfMembership,
    /// Aufnahme würde die Schachtelung zyklisch machen
    #[error("Mitgliedschaft würde einen Zyklus erzeugen")]
    CyclicMembership,
    /// Mitgliedschafts-Mutation, während ein Tick läuft
    #[error("Mitgliedschafts-Mutation während eines laufenden Ticks")]
    MutationDuringIteration,
}

/// Eine Interaction-Group: geordnete Mitglieder plus Arbitrierungs-Zustand.
#[derive(Debug, Default)]
pub struct InteractionGroup {
    id: GroupId,
    members: Vec<GroupMember>,
    containing_group: Option<GroupId>,
    active_interactor: Option<ActorId>,
}

impl InteractionGroup {
    /// Erstellt eine leere Group.
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            members: Vec::new(),
            containing_group: None,
            active_interactor: None,
        }
    }

    /// ID der Group.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Mitglieder in Prioritätsreihenfolge.
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// Group, in der diese Group selbst Mitglied ist.
    pub fn containing_group(&self) -> Option<GroupId> {
        self.containing_group
    }

    /// Actor, der im letzten Tick für diese Group agiert hat.
    pub fn active_interactor(&self) -> Option<ActorId> {
        self.active_interactor
    }

    pub(crate) fn push_member(&mut self, member: GroupMember) {
        self.members.push(member);
    }

    pub(crate) fn insert_member(&mut self, index: usize, member: GroupMember) {
        let index = index.min(self.members.len());
        self.members.insert(index, member);
    }

    pub(crate) fn remove_member(&mut self, member: GroupMember) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != member);
        before != self.members.len()
    }

    pub(crate) fn set_containing_group(&mut self, group: Option<GroupId>) {
        self.containing_group = group;
    }

    pub(crate) fn set_active_interactor(&mut self, actor: Option<ActorId>) {
        self.active_interactor = actor;
    }
}

/// Arbitriert eine Root-Group für diesen Tick.
///
/// Bestimmt zunächst das pre-priorisierte Mitglied (der Sieger des letzten
/// Ticks, sofern er weiterhin agieren kann) und läuft dann die Mitglieder
/// ab. Liefert den Sieger, falls einer agiert hat.
pub(crate) fn arbitrate_group(
    group_id: GroupId,
    groups: &mut IndexMap<GroupId, InteractionGroup>,
    actors: &mut IndexMap<ActorId, Actor>,
    registry: &InteractionRegistry,
    events: &mut EventLog,
    acquired: &mut Vec<(ActorId, InteractableId)>,
) -> Option<ActorId> {
    let pre_prioritized = groups
        .get(&group_id)
        .and_then(|group| group.active_interactor)
        .filter(|id| {
            actors
                .get(id)
                .is_some_and(|actor| actor.can_select_something(registry))
        });

    walk_group(
        group_id,
        groups,
        actors,
        registry,
        pre_prioritized,
        false,
        events,
        acquired,
    )
}

/// Läuft die Mitglieder einer Group in Prioritätsreihenfolge ab.
///
/// `suppress_all` unterdrückt die komplette (Unter-)Group, etwa weil ein
/// früheres Mitglied der übergeordneten Group bereits agiert hat.
#[allow(clippy::too_many_arguments)]
fn walk_group(
    group_id: GroupId,
    groups: &mut IndexMap<GroupId, InteractionGroup>,
    actors: &mut IndexMap<ActorId, Actor>,
    registry: &InteractionRegistry,
    pre_prioritized: Option<ActorId>,
    suppress_all: bool,
    events: &mut EventLog,
    acquired: &mut Vec<(ActorId, InteractableId)>,
) -> Option<ActorId> {
    // Snapshot: Mitgliedsmutationen während des Ticks sind enqueued und
    // greifen erst im nächsten Tick.
    let members: Vec<GroupMember> = groups
        .get(&group_id)
        .map(|group| group.members.to_vec())
        .unwrap_or_default();

    let mut winner: Option<ActorId> = None;
    for member in members {
        match member {
            GroupMember::Actor(id) => {
                let Some(actor) = actors.get_mut(&id) else {
                    continue;
                };
                let suppressed = suppress_all
                    || winner.is_some()
                    || pre_prioritized.is_some_and(|pre| pre != id);
                if suppressed {
                    actor.clear_interactions(events);
                } else {
                    let outcome = actor.process(registry, events);
                    acquired.extend(outcome.acquired.iter().map(|&target| (id, target)));
                    if outcome.performed {
                        winner = Some(id);
                    }
                }
            }
            GroupMember::Group(sub) => {
                let sub_suppressed = suppress_all || winner.is_some();
                let sub_winner = walk_group(
                    sub,
                    groups,
                    actors,
                    registry,
                    pre_prioritized,
                    sub_suppressed,
                    events,
                    acquired,
                );
                if winner.is_none() {
                    winner = sub_winner;
                }
            }
        }
    }

    if let Some(group) = groups.get_mut(&group_id) {
        group.set_active_interactor(if suppress_all { None } else { winner });
    }
    winner
}
