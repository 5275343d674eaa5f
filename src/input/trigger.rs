//! Logischer Input-Zustand: vier Trigger-Modi über rohen Button-Samples.

use serde::{Deserialize, Serialize};

/// Wie ein roher Button auf die logische `active`-Entscheidung abgebildet wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerMode {
    /// `active` folgt direkt dem gehaltenen Button.
    ///
    /// Anfällig für Ping-Pong bei Multi-Actor-Kontention — `StateChange`
    /// ist deshalb der empfohlene Default.
    State,
    /// `active` nur bei Press-Edge oder solange eine Selektion besteht.
    ///
    /// Ein vor der Eligibility gehaltener Button triggert nicht; die Edge
    /// muss passieren, während ein Ziel verfügbar ist.
    #[default]
    StateChange,
    /// Press schaltet ein, erneuter Press schaltet aus.
    Toggle,
    /// Press schaltet ein; deaktiviert erst beim Release nach dem zweiten Press.
    Sticky,
}

/// Ein roher Input-Sample für einen Tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSample {
    /// Button ist aktuell gedrückt
    pub performed: bool,
    /// Press-Edge in diesem Tick
    pub performed_this_frame: bool,
    /// Release-Edge in diesem Tick
    pub completed_this_frame: bool,
}

impl InputSample {
    /// Sample für den Tick, in dem der Button gedrückt wird.
    pub fn press() -> Self {
        Self {
            performed: true,
            performed_this_frame: true,
            completed_this_frame: false,
        }
    }

    /// Sample für einen Tick mit weiterhin gehaltenem Button.
    pub fn hold() -> Self {
        Self {
            performed: true,
            performed_this_frame: false,
            completed_this_frame: false,
        }
    }

    /// Sample für den Tick, in dem der Button losgelassen wird.
    pub fn release() -> Self {
        Self {
            performed: false,
            performed_this_frame: false,
            completed_this_frame: true,
        }
    }

    /// Sample für einen Tick ohne Button-Aktivität.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Per-Actor, per-Kanal (Select oder Activate) Zustandsmaschine.
///
/// `active` ist eine reine Funktion aus aktuellem Sample, `mode` und den
/// internen Latches. Latches mutieren ausschließlich über `update_input()`
/// (genau einmal pro Tick) und über den expliziten
/// `update_has_selection()`-Reset, wenn eine Selektion von außen entzogen
/// wurde.
#[derive(Debug, Clone)]
pub struct LogicalInputState {
    mode: TriggerMode,
    active: bool,
    activated_this_frame: bool,
    deactivated_this_frame: bool,
    sample: InputSample,
    has_selection: bool,
    toggled_on: bool,
    waiting_for_deactivate: bool,
    toggled_off_this_frame: bool,
    last_performed_time: Option<f64>,
    last_completed_time: Option<f64>,
    last_update_tick: Option<u64>,
}

impl LogicalInputState {
    /// Erstellt eine Zustandsmaschine im Ruhezustand.
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            active: false,
            activated_this_frame: false,
            deactivated_this_frame: false,
            sample: InputSample::default(),
            has_selection: false,
            toggled_on: false,
            waiting_for_deactivate: false,
            toggled_off_this_frame: false,
            last_performed_time: None,
            last_completed_time: None,
            last_update_tick: None,
        }
    }

    /// Aktueller Trigger-Modus.
    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Wechselt den Trigger-Modus.
    ///
    /// Latches werden bewusst **nicht** zurückgesetzt: `active` wird gegen
    /// die bestehenden Latch-Werte neu ausgewertet, ein Moduswechsel mitten
    /// in der Session kann `active` also ohne Edge ändern.
    pub fn set_mode(&mut self, mode: TriggerMode) {
        self.mode = mode;
        self.refresh();
    }

    /// Logische "Actor will agieren"-Entscheidung.
    pub fn active(&self) -> bool {
        self.active
    }

    /// `active` wurde in diesem Tick `true`.
    pub fn activated_this_frame(&self) -> bool {
        self.activated_this_frame
    }

    /// `active` wurde in diesem Tick `false`.
    pub fn deactivated_this_frame(&self) -> bool {
        self.deactivated_this_frame
    }

    /// Roher Button-Zustand des letzten Samples.
    pub fn is_performed(&self) -> bool {
        self.sample.performed
    }

    /// Press-Edge im letzten Sample.
    pub fn was_performed_this_frame(&self) -> bool {
        self.sample.performed_this_frame
    }

    /// Release-Edge im letzten Sample.
    pub fn was_completed_this_frame(&self) -> bool {
        self.sample.completed_this_frame
    }

    /// Zeitpunkt der letzten Press-Edge (Simulationszeit).
    pub fn last_performed_time(&self) -> Option<f64> {
        self.last_performed_time
    }

    /// Zeitpunkt der letzten Release-Edge (Simulationszeit).
    pub fn last_completed_time(&self) -> Option<f64> {
        self.last_completed_time
    }

    /// Schaltet die Maschine genau einmal pro Tick weiter.
    ///
    /// Ein zweiter Aufruf im selben Tick würde die edge-getriggerten Latches
    /// korrumpieren: im Debug-Build Assertion, im Release gewinnt der letzte
    /// Aufruf.
    pub fn update_input(
        &mut self,
        sample: InputSample,
        has_selection_now: bool,
        tick: u64,
        now: f64,
    ) {
        debug_assert!(
            self.last_update_tick != Some(tick),
            "update_input doppelt im selben Tick aufgerufen"
        );
        self.last_update_tick = Some(tick);

        self.toggled_off_this_frame = false;
        self.sample = sample;
        self.has_selection = has_selection_now;

        if sample.performed_this_frame {
            self.last_performed_time = Some(now);
        }
        if sample.completed_this_frame {
            self.last_completed_time = Some(now);
        }

        match self.mode {
            TriggerMode::State | TriggerMode::StateChange => {}
            TriggerMode::Toggle => {
                if sample.performed_this_frame {
                    if self.toggled_on {
                        self.toggled_on = false;
                        self.toggled_off_this_frame = true;
                    } else {
                        self.toggled_on = true;
                    }
                }
            }
            TriggerMode::Sticky => {
                if sample.performed_this_frame {
                    if self.toggled_on {
                        self.waiting_for_deactivate = true;
                    } else {
                        self.toggled_on = true;
                    }
                }
                if sample.completed_this_frame && self.waiting_for_deactivate {
                    self.toggled_on = false;
                    self.waiting_for_deactivate = false;
                }
            }
        }

        let was_active = self.active;
        self.refresh();
        self.activated_this_frame = self.active && !was_active;
        self.deactivated_this_frame = !self.active && was_active;
    }

    /// Idempotente Korrektur, wenn sich der Selektionszustand außerhalb des
    /// normalen Ticks geändert hat (z.B. Selektion von anderem Actor
    /// übernommen).
    ///
    /// Setzt Toggle-/Sticky-Latches auf den von außen erzwungenen Zustand,
    /// ohne Edges auszulösen.
    pub fn update_has_selection(&mut self, has_selection_now: bool) {
        if self.has_selection == has_selection_now {
            return;
        }
        self.has_selection = has_selection_now;

        if matches!(self.mode, TriggerMode::Toggle | TriggerMode::Sticky) {
            self.toggled_on = has_selection_now;
            self.waiting_for_deactivate = false;
            self.toggled_off_this_frame = false;
        }

        self.refresh();
    }

    /// Wertet `active` aus Sample, Modus und Latches neu aus.
    fn refresh(&mut self) {
        self.active = match self.mode {
            TriggerMode::State => self.sample.performed,
            TriggerMode::StateChange => {
                self.sample.performed_this_frame
                    || (self.has_selection && !self.sample.completed_this_frame)
            }
            TriggerMode::Toggle => {
                self.toggled_on
                    || (self.sample.performed_this_frame && !self.toggled_off_this_frame)
            }
            TriggerMode::Sticky => self.toggled_on,
        };
    }
}

impl Default for LogicalInputState {
    fn default() -> Self {
        Self::new(TriggerMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(state: &mut LogicalInputState, samples: &[(InputSample, bool)]) -> Vec<bool> {
        samples
            .iter()
            .enumerate()
            .map(|(tick, (sample, has_selection))| {
                state.update_input(*sample, *has_selection, tick as u64 + 1, tick as f64 * 0.016);
                state.active()
            })
            .collect()
    }

    #[test]
    fn state_mode_follows_raw_button() {
        let mut state = LogicalInputState::new(TriggerMode::State);
        let trace = drive(
            &mut state,
            &[
                (InputSample::press(), false),
                (InputSample::hold(), true),
                (InputSample::release(), true),
                (InputSample::idle(), false),
            ],
        );
        assert_eq!(trace, vec![true, true, false, false]);
    }

    #[test]
    fn state_change_requires_edge_while_eligible() {
        let mut state = LogicalInputState::new(TriggerMode::StateChange);
        // Button wird vor Eligibility gehalten: kein Trigger ohne neue Edge.
        let trace = drive(
            &mut state,
            &[
                (InputSample::hold(), false),
                (InputSample::hold(), false),
                (InputSample::release(), false),
                (InputSample::press(), false),
            ],
        );
        assert_eq!(trace, vec![false, false, false, true]);
    }

    #[test]
    fn state_change_holds_while_selection_exists() {
        let mut state = LogicalInputState::new(TriggerMode::StateChange);
        let trace = drive(
            &mut state,
            &[
                (InputSample::press(), false),
                (InputSample::hold(), true),
                (InputSample::hold(), true),
                (InputSample::release(), true),
            ],
        );
        assert_eq!(trace, vec![true, true, true, false]);
    }

    #[test]
    fn toggle_mode_flips_on_each_press() {
        let mut state = LogicalInputState::new(TriggerMode::Toggle);
        let trace = drive(
            &mut state,
            &[
                (InputSample::press(), false),
                (InputSample::release(), true),
                (InputSample::idle(), true),
                (InputSample::press(), true),
                (InputSample::release(), false),
            ],
        );
        assert_eq!(trace, vec![true, true, true, false, false]);
    }

    #[test]
    fn sticky_mode_deactivates_on_release_after_second_press() {
        let mut state = LogicalInputState::new(TriggerMode::Sticky);
        let trace = drive(
            &mut state,
            &[
                (InputSample::press(), false),
                (InputSample::release(), true),
                (InputSample::idle(), true),
                (InputSample::press(), true),
                (InputSample::hold(), true),
                (InputSample::release(), true),
            ],
        );
        // Erste Release lässt `active` stehen, erst die zweite deaktiviert.
        assert_eq!(trace, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn update_has_selection_resets_stale_toggle_latch() {
        let mut state = LogicalInputState::new(TriggerMode::Toggle);
        state.update_input(InputSample::press(), false, 1, 0.0);
        state.update_input(InputSample::release(), true, 2, 0.016);
        assert!(state.active());

        // Bestätigte Selektion wurde extern entzogen: Latch muss fallen,
        // ohne Edge.
        state.update_has_selection(false);
        assert!(!state.active());
        assert!(!state.deactivated_this_frame());

        // Idempotent: zweiter Aufruf ändert nichts.
        state.update_has_selection(false);
        assert!(!state.active());
    }

    #[test]
    fn update_has_selection_without_confirmed_selection_keeps_latch() {
        let mut state = LogicalInputState::new(TriggerMode::Toggle);
        state.update_input(InputSample::press(), false, 1, 0.0);
        assert!(state.active());

        // Es gab nie eine bestätigte Selektion: der Entzug ist ein No-Op
        // und lässt den frisch gesetzten Latch stehen.
        state.update_has_selection(false);
        assert!(state.active());
    }

    #[test]
    fn mode_switch_keeps_latches() {
        let mut state = LogicalInputState::new(TriggerMode::Toggle);
        state.update_input(InputSample::press(), false, 1, 0.0);
        state.update_input(InputSample::release(), true, 2, 0.016);
        assert!(state.active());

        // Wechsel auf State: `active` folgt sofort dem (losgelassenen) Button.
        state.set_mode(TriggerMode::State);
        assert!(!state.active());

        // Zurück auf Toggle: Latch ist noch gesetzt.
        state.set_mode(TriggerMode::Toggle);
        assert!(state.active());
    }

    #[test]
    fn timestamps_follow_edges() {
        let mut state = LogicalInputState::new(TriggerMode::State);
        state.update_input(InputSample::press(), false, 1, 1.0);
        state.update_input(InputSample::hold(), false, 2, 2.0);
        state.update_input(InputSample::release(), false, 3, 3.0);

        assert_eq!(state.last_performed_time(), Some(1.0));
        assert_eq!(state.last_completed_time(), Some(3.0));
    }
}
