//! Datenmodell für Interactables und ihre Collider.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{ColliderId, InteractableId};

/// Händigkeit eines Actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Handedness {
    /// Keine Zuordnung (z.B. Gaze- oder Maus-Actor)
    #[default]
    None,
    /// Linke Hand / linker Controller
    Left,
    /// Rechte Hand / rechter Controller
    Right,
}

/// Selektionsmodus eines Interactables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectMode {
    /// Nur ein Actor gleichzeitig — ein neuer Actor übernimmt die Selektion
    /// und der bisherige verliert sie (Steal).
    #[default]
    Single,
    /// Mehrere Actors dürfen gleichzeitig selektieren.
    Multiple,
}

/// Attach-Präferenz eines Interactables bei Far-Selektion.
///
/// Überschreibt den Resolver-Default, sofern nicht `DeferToInteractor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttachPreference {
    /// Resolver-Default verwenden (dritter erlaubter Zustand)
    #[default]
    DeferToInteractor,
    /// Attach-Punkt bleibt an der Hand (Near)
    Near,
    /// Attach-Punkt wandert zum Far-Hit-Punkt
    Far,
}

/// Ein registrierbares Interaktionsobjekt.
#[derive(Debug, Clone)]
pub struct Interactable {
    /// Eindeutige ID (Registry-weit)
    pub id: InteractableId,
    /// Deaktivierte Interactables sind weder hover- noch selektierbar
    pub enabled: bool,
    /// Hovern erlaubt?
    pub hoverable: bool,
    /// Selektieren erlaubt?
    pub selectable: bool,
    /// Single- oder Multi-Actor-Selektion
    pub select_mode: SelectMode,
    /// Attach-Präferenz bei Far-Selektion
    pub attach_preference: AttachPreference,
    /// Optionale Händigkeits-Einschränkung (z.B. nur rechte Hand)
    pub required_handedness: Option<Handedness>,
    /// Vom Interactable gelieferter Rang für `TargetSortMode::InteractableCustom`
    /// (kleiner = höhere Priorität)
    pub custom_order: i32,
    /// Attach-Punkt in Weltkoordinaten (für Attach-zu-Attach-Distanzsortierung)
    pub attach_point: Vec3,
}

impl Interactable {
    /// Erstellt ein Interactable mit Standardwerten an der gegebenen Position.
    pub fn new(id: InteractableId, attach_point: Vec3) -> Self {
        Self {
            id,
            enabled: true,
            hoverable: true,
            selectable: true,
            select_mode: SelectMode::default(),
            attach_preference: AttachPreference::default(),
            required_handedness: None,
            custom_order: 0,
            attach_point,
        }
    }
}

/// Geometrische Form eines Colliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Kugel mit Mittelpunkt und Radius
    Sphere {
        /// Mittelpunkt in Weltkoordinaten
        center: Vec3,
        /// Radius in Weltmetern
        radius: f32,
    },
}

/// Ein Collider, der über die Registry an ein Interactable gebunden wird.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Eindeutige ID (Registry-weit)
    pub id: ColliderId,
    /// Form in Weltkoordinaten
    pub shape: ColliderShape,
}

impl Collider {
    /// Erstellt einen Kugel-Collider.
    pub fn sphere(id: ColliderId, center: Vec3, radius: f32) -> Self {
        Self {
            id,
            shape: ColliderShape::Sphere { center, radius },
        }
    }

    /// Mittelpunkt des Colliders.
    pub fn center(&self) -> Vec3 {
        match self.shape {
            ColliderShape::Sphere { center, .. } => center,
        }
    }

    /// Radius des Colliders.
    pub fn radius(&self) -> f32 {
        match self.shape {
            ColliderShape::Sphere { radius, .. } => radius,
        }
    }

    /// Nächster Punkt auf der Collider-Oberfläche zum Query-Punkt.
    ///
    /// Liegt der Punkt im Collider, wird er unverändert zurückgegeben.
    pub fn closest_point(&self, query: Vec3) -> Vec3 {
        match self.shape {
            ColliderShape::Sphere { center, radius } => {
                let offset = query - center;
                let dist = offset.length();
                if dist <= radius || dist <= f32::EPSILON {
                    query
                } else {
                    center + offset * (radius / dist)
                }
            }
        }
    }

    /// Distanz vom Query-Punkt zur Collider-Oberfläche (0 bei Überlappung).
    pub fn surface_distance(&self, query: Vec3) -> f32 {
        match self.shape {
            ColliderShape::Sphere { center, radius } => {
                ((query - center).length() - radius).max(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn closest_point_clamps_to_sphere_surface() {
        let collider = Collider::sphere(1, Vec3::ZERO, 1.0);
        let point = collider.closest_point(Vec3::new(3.0, 0.0, 0.0));
        assert_abs_diff_eq!(point.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn closest_point_inside_returns_query() {
        let collider = Collider::sphere(1, Vec3::ZERO, 2.0);
        let query = Vec3::new(0.5, 0.5, 0.0);
        assert_eq!(collider.closest_point(query), query);
    }

    #[test]
    fn surface_distance_is_zero_when_overlapping() {
        let collider = Collider::sphere(1, Vec3::ZERO, 2.0);
        assert_eq!(collider.surface_distance(Vec3::new(1.0, 0.0, 0.0)), 0.0);
        assert_abs_diff_eq!(
            collider.surface_distance(Vec3::new(5.0, 0.0, 0.0)),
            3.0,
            epsilon = 1e-6
        );
    }
}
