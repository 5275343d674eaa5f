//! Registry aller Interactables und Collider einer Session.
//!
//! Die Registry ist der explizite Kontext, der durch Preprocess/Process
//! gereicht wird — es gibt keinen globalen Zustand. Probes lösen Collider
//! über `try_get_interactable_for_collider()` zu Interactables auf;
//! Hover-/Select-Berechtigung wird hier zentral geprüft.

use glam::Vec3;
use indexmap::IndexMap;

use super::interactable::{Collider, Handedness, Interactable};
use super::spatial::ColliderIndex;
use super::{ColliderId, InteractableId};

/// Rolle eines Colliders relativ zu seinem Interactable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    /// Regulärer Oberflächen-Collider
    Surface,
    /// Snap-Volume: großzügiger Fang-Collider, der auf dasselbe
    /// Interactable auflöst, aber als Snap-Treffer markiert wird
    SnapVolume,
}

/// Bindung eines Colliders an sein Interactable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderBinding {
    /// Ziel-Interactable
    pub interactable: InteractableId,
    /// Oberflächen-Collider oder Snap-Volume
    pub kind: ColliderKind,
}

/// Registry über alle Interactables und Collider.
#[derive(Debug, Default)]
pub struct InteractionRegistry {
    interactables: IndexMap<InteractableId, Interactable>,
    colliders: IndexMap<ColliderId, Collider>,
    bindings: IndexMap<ColliderId, ColliderBinding>,
    spatial: ColliderIndex,
    spatial_dirty: bool,
}

impl InteractionRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self {
            interactables: IndexMap::new(),
            colliders: IndexMap::new(),
            bindings: IndexMap::new(),
            spatial: ColliderIndex::empty(),
            spatial_dirty: false,
        }
    }

    /// Registriert ein Interactable. Eine existierende ID wird überschrieben.
    pub fn register_interactable(&mut self, interactable: Interactable) {
        self.interactables.insert(interactable.id, interactable);
    }

    /// Entfernt ein Interactable samt aller gebundenen Collider.
    pub fn unregister_interactable(&mut self, id: InteractableId) {
        if self.interactables.shift_remove(&id).is_none() {
            return;
        }
        let orphaned: Vec<ColliderId> = self
            .bindings
            .iter()
            .filter(|(_, binding)| binding.interactable == id)
            .map(|(collider_id, _)| *collider_id)
            .collect();
        for collider_id in orphaned {
            self.colliders.shift_remove(&collider_id);
            self.bindings.shift_remove(&collider_id);
        }
        self.spatial_dirty = true;
    }

    /// Registriert einen Collider und bindet ihn an ein Interactable.
    ///
    /// Bindungen an unbekannte Interactables werden abgelehnt und geloggt
    /// (Konfigurationsfehler, keine Wirkung).
    pub fn register_collider(
        &mut self,
        collider: Collider,
        interactable: InteractableId,
        kind: ColliderKind,
    ) {
        if !self.interactables.contains_key(&interactable) {
            log::warn!(
                "Collider {} verweist auf unbekanntes Interactable {} — Registrierung verworfen",
                collider.id,
                interactable
            );
            return;
        }
        self.bindings
            .insert(collider.id, ColliderBinding { interactable, kind });
        self.colliders.insert(collider.id, collider);
        self.spatial_dirty = true;
    }

    /// Entfernt einen Collider samt Bindung.
    pub fn unregister_collider(&mut self, id: ColliderId) {
        if self.colliders.shift_remove(&id).is_some() {
            self.bindings.shift_remove(&id);
            self.spatial_dirty = true;
        }
    }

    /// Liefert ein Interactable per ID.
    pub fn interactable(&self, id: InteractableId) -> Option<&Interactable> {
        self.interactables.get(&id)
    }

    /// Mutable Zugriff auf ein Interactable (z.B. enable/disable zur Laufzeit).
    pub fn interactable_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.interactables.get_mut(&id)
    }

    /// Liefert einen Collider per ID.
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    /// Verschiebt einen Collider (Welt-Update durch die Einbettung).
    pub fn set_collider_center(&mut self, id: ColliderId, center: Vec3) {
        if let Some(collider) = self.colliders.get_mut(&id) {
            let radius = collider.radius();
            *collider = Collider::sphere(id, center, radius);
            self.spatial_dirty = true;
        }
    }

    /// Löst einen Collider zu seinem Interactable auf.
    ///
    /// Gibt zusätzlich die Snap-Volume-ID zurück, wenn der getroffene
    /// Collider selbst ein Snap-Volume ist.
    pub fn try_get_interactable_for_collider(
        &self,
        collider: ColliderId,
    ) -> Option<(InteractableId, Option<ColliderId>)> {
        let binding = self.bindings.get(&collider)?;
        if !self.interactables.contains_key(&binding.interactable) {
            return None;
        }
        let snap_volume = match binding.kind {
            ColliderKind::Surface => None,
            ColliderKind::SnapVolume => Some(collider),
        };
        Some((binding.interactable, snap_volume))
    }

    /// Prüft, ob Hovern für die Kombination aus Actor-Händigkeit und
    /// Interactable aktuell legal ist.
    pub fn is_hover_possible(&self, hand: Handedness, id: InteractableId) -> bool {
        let Some(interactable) = self.interactables.get(&id) else {
            return false;
        };
        interactable.enabled
            && interactable.hoverable
            && Self::handedness_allows(interactable, hand)
    }

    /// Prüft, ob Selektieren aktuell legal ist.
    pub fn can_select(&self, hand: Handedness, id: InteractableId) -> bool {
        let Some(interactable) = self.interactables.get(&id) else {
            return false;
        };
        interactable.enabled
            && interactable.selectable
            && Self::handedness_allows(interactable, hand)
    }

    fn handedness_allows(interactable: &Interactable, hand: Handedness) -> bool {
        match interactable.required_handedness {
            None => true,
            Some(required) => required == hand,
        }
    }

    /// Baut den Spatial-Index neu, falls sich Collider geändert haben.
    ///
    /// Wird einmal pro Tick vom Manager aufgerufen, bevor Probes laufen.
    pub fn refresh_spatial_index(&mut self) {
        if self.spatial_dirty {
            self.spatial = ColliderIndex::from_colliders(&self.colliders);
            self.spatial_dirty = false;
        }
    }

    /// Read-only Zugriff auf den Spatial-Index.
    pub fn spatial(&self) -> &ColliderIndex {
        &self.spatial
    }

    /// Anzahl registrierter Interactables.
    pub fn interactable_count(&self) -> usize {
        self.interactables.len()
    }

    /// Anzahl registrierter Collider.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}
