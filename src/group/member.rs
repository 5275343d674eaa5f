//! Mitglieds-Referenz einer Interaction-Group.

use serde::{Deserialize, Serialize};

use crate::core::{ActorId, GroupId};

/// Ein Mitglied einer Group: entweder ein Actor oder eine Untergruppe.
///
/// Die Reihenfolge der Mitglieder ist die Prioritätsreihenfolge der
/// Arbitrierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupMember {
    /// Direkt enthaltener Actor
    Actor(ActorId),
    /// Geschachtelte Untergruppe
    Group(GroupId),
}
