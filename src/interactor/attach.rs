//! Attach-Controller: zeitgesteuerte Offset-Animation des Attach-Punkts.
//!
//! Der Offset wird kontinuierlich pro Tick geeast, unabhängig vom Targeting.
//! Die Region-Klassifikation liest den Offset erst im Folge-Tick — der
//! Resolver agiert auf der Region zum Tick-*Beginn*.

use glam::Vec3;

use crate::shared::options::{ATTACH_EASE_SPEED, ATTACH_OFFSET_EPSILON_SQ};

/// Animierter Attach-Punkt eines Actors (Hand-Ursprung + Offset).
#[derive(Debug, Clone)]
pub struct AttachController {
    origin: Vec3,
    offset: Vec3,
    target_offset: Vec3,
    ease_speed: f32,
}

impl AttachController {
    /// Erstellt einen Controller ohne Offset am gegebenen Ursprung.
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            offset: Vec3::ZERO,
            target_offset: Vec3::ZERO,
            ease_speed: ATTACH_EASE_SPEED,
        }
    }

    /// Setzt die Easing-Geschwindigkeit (1/Sekunden).
    pub fn set_ease_speed(&mut self, ease_speed: f32) {
        self.ease_speed = ease_speed.max(0.0);
    }

    /// Aktualisiert den Hand-Ursprung (Tracking-Update der Einbettung).
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Hand-Ursprung in Weltkoordinaten.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Aktueller Attach-Punkt in Weltkoordinaten.
    pub fn attach_point(&self) -> Vec3 {
        self.origin + self.offset
    }

    /// Aktueller Offset relativ zum Ursprung.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// `true`, solange der Offset nicht (numerisch) null ist.
    pub fn has_offset(&self) -> bool {
        self.offset.length_squared() > ATTACH_OFFSET_EPSILON_SQ
    }

    /// Kontinuierliches Zeit-Update: Offset eased zum Ziel-Offset.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let t = (self.ease_speed * dt).min(1.0);
        self.offset += (self.target_offset - self.offset) * t;

        // Restfehler unterhalb der Epsilon-Schwelle wird eingerastet.
        if (self.target_offset - self.offset).length_squared() <= ATTACH_OFFSET_EPSILON_SQ {
            self.offset = self.target_offset;
        }
    }

    /// Kommandiert den Attach-Punkt zum gegebenen Weltpunkt (Far-Selektion).
    pub fn move_to_world(&mut self, point: Vec3) {
        self.target_offset = point - self.origin;
    }

    /// Setzt den Offset sofort auf null (pinnt die Region auf Near).
    pub fn reset(&mut self) {
        self.offset = Vec3::ZERO;
        self.target_offset = Vec3::ZERO;
    }
}

impl Default for AttachController {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn update_eases_toward_target() {
        let mut attach = AttachController::new(Vec3::ZERO);
        attach.set_ease_speed(10.0);
        attach.move_to_world(Vec3::new(1.0, 0.0, 0.0));

        assert!(!attach.has_offset());
        attach.update(0.016);
        assert!(attach.has_offset());
        assert!(attach.offset().x > 0.0 && attach.offset().x < 1.0);

        // Großer Zeitschritt rastet direkt aufs Ziel ein.
        attach.update(1.0);
        assert_abs_diff_eq!(attach.offset().x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn reset_clears_offset_immediately() {
        let mut attach = AttachController::new(Vec3::ZERO);
        attach.move_to_world(Vec3::new(2.0, 0.0, 0.0));
        attach.update(1.0);
        assert!(attach.has_offset());

        attach.reset();
        assert!(!attach.has_offset());
        assert_eq!(attach.attach_point(), Vec3::ZERO);
    }

    #[test]
    fn attach_point_tracks_origin() {
        let mut attach = AttachController::new(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(attach.attach_point(), Vec3::new(0.0, 1.0, 0.0));

        attach.set_origin(Vec3::new(0.5, 1.0, 0.0));
        assert_eq!(attach.attach_point(), Vec3::new(0.5, 1.0, 0.0));
    }
}
