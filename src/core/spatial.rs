//! Spatial-Index (KD-Tree) für schnelle Collider-Abfragen.

use std::collections::HashMap;

use glam::Vec3;
use indexmap::IndexMap;
use kiddo::{KdTree, SquaredEuclidean};

use super::{Collider, ColliderId};

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// ID des gefundenen Colliders
    pub collider_id: ColliderId,
    /// Euklidische Distanz vom Suchpunkt zum Collider-Mittelpunkt
    pub distance: f32,
}

/// Read-only Spatial-Index über allen registrierten Collidern.
///
/// Indexiert Collider-Mittelpunkte; die Oberflächen-Distanz prüft der
/// Aufrufer nach (Vorfilter über `radius + max_collider_radius`).
#[derive(Debug, Clone)]
pub struct ColliderIndex {
    tree: KdTree<f64, 3>,
    collider_ids: Vec<ColliderId>,
    centers: HashMap<ColliderId, Vec3>,
    max_radius: f32,
}

impl ColliderIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 3]>::new()).into(),
            collider_ids: Vec::new(),
            centers: HashMap::new(),
            max_radius: 0.0,
        }
    }

    /// Baut einen neuen Index aus den übergebenen Collidern.
    pub fn from_colliders(colliders: &IndexMap<ColliderId, Collider>) -> Self {
        let mut collider_ids: Vec<ColliderId> = colliders.keys().copied().collect();
        collider_ids.sort_unstable();

        let entries: Vec<[f64; 3]> = collider_ids
            .iter()
            .filter_map(|id| {
                colliders.get(id).map(|collider| {
                    let c = collider.center();
                    [c.x as f64, c.y as f64, c.z as f64]
                })
            })
            .collect();

        let tree: KdTree<f64, 3> = (&entries).into();

        let centers = colliders
            .iter()
            .map(|(id, collider)| (*id, collider.center()))
            .collect();

        let max_radius = colliders
            .values()
            .map(|collider| collider.radius())
            .fold(0.0_f32, f32::max);

        Self {
            tree,
            collider_ids,
            centers,
            max_radius,
        }
    }

    /// Gibt die Anzahl indexierter Collider zurück.
    pub fn len(&self) -> usize {
        self.collider_ids.len()
    }

    /// Gibt `true` zurück, wenn keine Collider im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.collider_ids.is_empty()
    }

    /// Größter Collider-Radius im Index (für Query-Aufweitung).
    pub fn max_collider_radius(&self) -> f32 {
        self.max_radius
    }

    /// Gespeicherter Mittelpunkt eines Colliders.
    pub fn center_of(&self, id: ColliderId) -> Option<Vec3> {
        self.centers.get(&id).copied()
    }

    /// Findet den nächsten Collider zur gegebenen Weltposition.
    pub fn nearest(&self, query: Vec3) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x as f64, query.y as f64, query.z as f64]);
        let collider_id = *self.collider_ids.get(result.item as usize)?;

        Some(SpatialMatch {
            collider_id,
            distance: (result.distance as f32).sqrt(),
        })
    }

    /// Findet alle Collider-Mittelpunkte innerhalb eines Radius, nach Distanz sortiert.
    pub fn within_radius(&self, query: Vec3, radius: f32) -> Vec<SpatialMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(
                &[query.x as f64, query.y as f64, query.z as f64],
                (radius * radius) as f64,
            )
            .into_iter()
            .filter_map(|entry| {
                let collider_id = *self.collider_ids.get(entry.item as usize)?;
                Some(SpatialMatch {
                    collider_id,
                    distance: (entry.distance as f32).sqrt(),
                })
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results
    }
}

impl Default for ColliderIndex {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_colliders() -> IndexMap<ColliderId, Collider> {
        let mut colliders = IndexMap::new();
        colliders.insert(1, Collider::sphere(1, Vec3::new(0.0, 0.0, 0.0), 0.5));
        colliders.insert(2, Collider::sphere(2, Vec3::new(10.0, 0.0, 0.0), 0.5));
        colliders.insert(3, Collider::sphere(3, Vec3::new(4.0, 3.0, 0.0), 0.5));
        colliders
    }

    #[test]
    fn nearest_returns_expected_collider() {
        let index = ColliderIndex::from_colliders(&sample_colliders());
        let nearest = index
            .nearest(Vec3::new(3.9, 2.9, 0.0))
            .expect("Treffer erwartet");

        assert_eq!(nearest.collider_id, 3);
        assert!(nearest.distance < 0.2);
    }

    #[test]
    fn radius_query_returns_sorted_matches() {
        let index = ColliderIndex::from_colliders(&sample_colliders());
        let matches = index.within_radius(Vec3::ZERO, 6.0);

        let ids: Vec<ColliderId> = matches.into_iter().map(|m| m.collider_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = ColliderIndex::empty();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.nearest(Vec3::ZERO).is_none());
    }

    #[test]
    fn max_collider_radius_tracks_largest_sphere() {
        let mut colliders = sample_colliders();
        colliders.insert(4, Collider::sphere(4, Vec3::new(0.0, 5.0, 0.0), 2.5));
        let index = ColliderIndex::from_colliders(&colliders);

        assert_eq!(index.max_collider_radius(), 2.5);
    }
}
