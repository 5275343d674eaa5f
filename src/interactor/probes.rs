//! Default-Probes: volumetrischer Kugel-Probe und Linien-Cast.
//!
//! Die Probe-Traits bleiben die Integrationsnaht zur Physik der Einbettung;
//! diese Implementierungen machen die Engine stand-alone nutzbar und
//! deterministisch testbar (KD-Tree-Broad-Phase + analytische Kugel-Tests).

use glam::Vec3;

use super::targeting::{ColliderProbe, CurveHit, CurveProbe};
use crate::core::{ColliderId, InteractionRegistry};

/// Volumetrischer Near-Probe: Kugel um den Hand-Ursprung.
#[derive(Debug, Clone)]
pub struct SphereOverlapProbe {
    origin: Vec3,
    radius: f32,
}

impl SphereOverlapProbe {
    /// Erstellt einen Kugel-Probe mit Ursprung und Radius.
    pub fn new(origin: Vec3, radius: f32) -> Self {
        Self {
            origin,
            radius: radius.max(0.0),
        }
    }

    /// Abfrage-Radius in Weltmetern.
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl ColliderProbe for SphereOverlapProbe {
    fn collider_targets(
        &mut self,
        registry: &InteractionRegistry,
        out: &mut Vec<ColliderId>,
    ) -> bool {
        let spatial = registry.spatial();
        // Mittelpunkt-Vorfilter, aufgeweitet um den größten Collider-Radius.
        let reach = self.radius + spatial.max_collider_radius();

        for entry in spatial.within_radius(self.origin, reach) {
            let Some(collider) = registry.collider(entry.collider_id) else {
                continue;
            };
            if collider.surface_distance(self.origin) <= self.radius {
                out.push(entry.collider_id);
            }
        }

        !out.is_empty()
    }

    fn cast_origin(&self) -> Vec3 {
        self.origin
    }

    fn set_pose(&mut self, origin: Vec3, _direction: Vec3) {
        self.origin = origin;
    }
}

/// Far-Probe: gerader Strahl mit Sample-Punkten und analytischem Kugel-Test.
#[derive(Debug, Clone)]
pub struct LineCastProbe {
    origin: Vec3,
    direction: Vec3,
    length: f32,
    sample_points: Vec<Vec3>,
}

impl LineCastProbe {
    /// Erstellt einen Linien-Cast; `direction` wird normalisiert.
    pub fn new(origin: Vec3, direction: Vec3, length: f32, sample_count: usize) -> Self {
        let mut probe = Self {
            origin,
            direction: direction.normalize_or_zero(),
            length: length.max(0.0),
            sample_points: Vec::with_capacity(sample_count.max(2)),
        };
        probe.rebuild_samples(sample_count.max(2));
        probe
    }

    fn rebuild_samples(&mut self, count: usize) {
        self.sample_points.clear();
        let step = self.length / (count - 1) as f32;
        for i in 0..count {
            self.sample_points
                .push(self.origin + self.direction * (step * i as f32));
        }
    }

    /// Schnittpunkt-Parameter t des Strahls mit einer Kugel, falls vorhanden.
    fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let b = self.direction.dot(to_center);
        let disc = b * b - (to_center.length_squared() - radius * radius);
        if disc < 0.0 {
            return None;
        }
        let t = b - disc.sqrt();
        // Ursprung innerhalb der Kugel zählt als Treffer bei t = 0.
        let t = if t < 0.0 {
            if to_center.length_squared() <= radius * radius {
                0.0
            } else {
                return None;
            }
        } else {
            t
        };
        (t <= self.length).then_some(t)
    }
}

impl CurveProbe for LineCastProbe {
    fn collider_targets(
        &mut self,
        registry: &InteractionRegistry,
        out_colliders: &mut Vec<ColliderId>,
        out_hits: &mut Vec<CurveHit>,
    ) -> bool {
        let spatial = registry.spatial();
        let midpoint = self.origin + self.direction * (self.length * 0.5);
        let reach = self.length * 0.5 + spatial.max_collider_radius();

        let mut hits: Vec<CurveHit> = spatial
            .within_radius(midpoint, reach)
            .into_iter()
            .filter_map(|entry| {
                let collider = registry.collider(entry.collider_id)?;
                let t = self.intersect_sphere(collider.center(), collider.radius())?;
                Some(CurveHit {
                    collider: entry.collider_id,
                    point: self.origin + self.direction * t,
                    distance: t,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        out_colliders.extend(hits.iter().map(|hit| hit.collider));
        out_hits.extend(hits);

        !out_hits.is_empty()
    }

    fn sample_points(&self) -> &[Vec3] {
        &self.sample_points
    }

    fn last_sample_point(&self) -> Vec3 {
        self.sample_points
            .last()
            .copied()
            .unwrap_or(self.origin + self.direction * self.length)
    }

    fn cast_origin(&self) -> Vec3 {
        self.origin
    }

    fn set_pose(&mut self, origin: Vec3, direction: Vec3) {
        self.origin = origin;
        self.direction = direction.normalize_or_zero();
        let count = self.sample_points.len().max(2);
        self.rebuild_samples(count);
    }
}
