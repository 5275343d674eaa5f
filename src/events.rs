//! Event-Log: Interaktionsereignisse eines Ticks in Dispatch-Reihenfolge.
//!
//! Reines Read-Model für nachgelagerte Konsumenten (Haptik, Audio,
//! Capture-Tooling). Garantie aus dem Selection-Exit: `RegionChanged`
//! wird erst **nach** dem zugehörigen `SelectExited` dispatcht.

use serde::Serialize;

use crate::core::{ActorId, InteractableId};
use crate::interactor::near_far::Region;

/// Ein Interaktionsereignis eines Ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InteractionEvent {
    /// Actor beginnt, ein Interactable zu hovern
    HoverEntered {
        /// Hovernder Actor
        actor: ActorId,
        /// Gehovertes Interactable
        interactable: InteractableId,
    },
    /// Actor hovert ein Interactable nicht mehr
    HoverExited {
        /// Actor
        actor: ActorId,
        /// Interactable
        interactable: InteractableId,
    },
    /// Actor hat ein Interactable selektiert
    SelectEntered {
        /// Selektierender Actor
        actor: ActorId,
        /// Selektiertes Interactable
        interactable: InteractableId,
    },
    /// Selektion wurde gelöst (freiwillig, Suppression oder Steal)
    SelectExited {
        /// Actor
        actor: ActorId,
        /// Interactable
        interactable: InteractableId,
    },
    /// Region-Klassifikation eines Actors hat sich geändert
    RegionChanged {
        /// Actor
        actor: ActorId,
        /// Neue Region
        region: Region,
    },
}

/// Begrenztes Log aller Interaktionsereignisse, tick-segmentiert.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<InteractionEvent>,
    tick_start: usize,
}

impl EventLog {
    const MAX_ENTRIES: usize = 1000;

    /// Erstellt ein leeres Event-Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            tick_start: 0,
        }
    }

    /// Markiert den Beginn eines neuen Ticks.
    /// Begrenzt auf MAX_ENTRIES, ältere Einträge werden verworfen.
    pub fn begin_tick(&mut self) {
        if self.entries.len() >= Self::MAX_ENTRIES {
            let drained = Self::MAX_ENTRIES / 2;
            self.entries.drain(..drained);
        }
        self.tick_start = self.entries.len();
    }

    /// Hängt ein Ereignis an.
    pub fn record(&mut self, event: InteractionEvent) {
        self.entries.push(event);
    }

    /// Ereignisse des aktuellen Ticks in Dispatch-Reihenfolge.
    pub fn current_tick(&self) -> &[InteractionEvent] {
        &self.entries[self.tick_start..]
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[InteractionEvent] {
        &self.entries
    }

    /// Gibt `true` zurück, wenn keine Ereignisse vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_tick_only_exposes_events_since_begin_tick() {
        let mut log = EventLog::new();
        log.record(InteractionEvent::HoverEntered {
            actor: 1,
            interactable: 10,
        });

        log.begin_tick();
        assert!(log.current_tick().is_empty());

        log.record(InteractionEvent::SelectEntered {
            actor: 1,
            interactable: 10,
        });
        assert_eq!(log.current_tick().len(), 1);
        assert_eq!(log.entries().len(), 2);
    }

    #[test]
    fn log_is_bounded() {
        let mut log = EventLog::new();
        for i in 0..1200 {
            if i % 10 == 0 {
                log.begin_tick();
            }
            log.record(InteractionEvent::HoverEntered {
                actor: 1,
                interactable: i,
            });
        }
        assert!(log.entries().len() <= 1200);
        log.begin_tick();
        assert!(log.entries().len() < 1200);
    }
}
