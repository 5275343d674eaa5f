//! Zentrale Konfiguration für die Interaction-Engine.
//!
//! `InteractionOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten. Laden und
//! Speichern der Optionen übernimmt die einbettende Anwendung.

use serde::{Deserialize, Serialize};

use crate::input::TriggerMode;
use crate::interactor::targeting::TargetSortMode;

// ── Near-Probe ──────────────────────────────────────────────────────

/// Standard-Radius des volumetrischen Near-Probes (Weltmeter).
pub const DEFAULT_NEAR_RADIUS: f32 = 0.1;

// ── Far-Probe ───────────────────────────────────────────────────────

/// Standard-Länge des Far-Casts (Weltmeter).
pub const DEFAULT_FAR_CAST_LENGTH: f32 = 10.0;
/// Anzahl der Sample-Punkte entlang des Far-Casts (für Visuals).
pub const DEFAULT_FAR_CAST_SAMPLES: usize = 20;

// ── Attach-Controller ───────────────────────────────────────────────

/// Easing-Geschwindigkeit des Attach-Offsets (1/Sekunden).
pub const ATTACH_EASE_SPEED: f32 = 16.0;
/// Unterhalb dieser quadrierten Offset-Länge gilt der Attach-Punkt als "Near".
pub const ATTACH_OFFSET_EPSILON_SQ: f32 = 1e-8;

/// Resolver-Default: wandert der Attach-Punkt bei Far-Selektion zum Hit-Punkt?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FarAttachMode {
    /// Attach-Punkt bleibt an der Hand
    Near,
    /// Attach-Punkt wandert zum Far-Hit-Punkt
    #[default]
    Far,
}

/// Zur Laufzeit änderbare Engine-Optionen.
///
/// Dient als Vorlage beim Erstellen von Actors/Resolvern; bestehende
/// Instanzen übernehmen Änderungen nicht automatisch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionOptions {
    /// Radius des volumetrischen Near-Probes (Weltmeter)
    pub near_radius: f32,
    /// Länge des Far-Casts (Weltmeter)
    pub far_cast_length: f32,
    /// Anzahl Sample-Punkte entlang des Far-Casts
    pub far_cast_samples: usize,
    /// Easing-Geschwindigkeit des Attach-Offsets (1/Sekunden)
    pub attach_ease_speed: f32,
    /// Trigger-Modus des Select-Inputs.
    ///
    /// Default ist `StateChange`: `State` kann bei Multi-Actor-Kontention
    /// zu Ping-Pong-Selektionen führen, wenn beide Actors den Button über
    /// einen Handoff hinweg halten.
    pub select_trigger_mode: TriggerMode,
    /// Trigger-Modus des Activate-Inputs
    pub activate_trigger_mode: TriggerMode,
    /// Globale Sortier-Strategie des Resolvers
    pub sort_mode: TargetSortMode,
    /// Resolver-Default für die Attach-Entscheidung bei Far-Selektion
    pub far_attach_mode: FarAttachMode,
    /// Selektion halten, solange das Ziel selektierbar bleibt, auch wenn es
    /// die Zielliste verlässt
    pub keep_selected_target_valid: bool,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            near_radius: DEFAULT_NEAR_RADIUS,
            far_cast_length: DEFAULT_FAR_CAST_LENGTH,
            far_cast_samples: DEFAULT_FAR_CAST_SAMPLES,
            attach_ease_speed: ATTACH_EASE_SPEED,
            select_trigger_mode: TriggerMode::StateChange,
            activate_trigger_mode: TriggerMode::State,
            sort_mode: TargetSortMode::SquaredDistance,
            far_attach_mode: FarAttachMode::Far,
            keep_selected_target_valid: true,
        }
    }
}

// Re-Export, damit Einbettungen die Attach-Konfiguration an einer Stelle finden.
pub use crate::core::interactable::AttachPreference as InteractableAttachPreference;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_state_change_for_select() {
        let options = InteractionOptions::default();
        assert_eq!(options.select_trigger_mode, TriggerMode::StateChange);
        assert_eq!(options.far_attach_mode, FarAttachMode::Far);
    }
}
