//! Input-Reader-Vertrag: Sample-Quellen für `LogicalInputState`.

use std::collections::VecDeque;

use super::trigger::InputSample;

/// Liefert pro Tick genau ein rohes Button-Sample.
///
/// Die Einbettung implementiert diesen Trait über ihrem Input-System;
/// `ScriptedInput` und `ConstantInput` dienen Tests und Benches.
pub trait InputReader {
    /// Liest das Sample für den aktuellen Tick.
    fn read(&mut self) -> InputSample;
}

/// Spielt eine vorbereitete Sample-Sequenz ab; nach dem Ende wird der
/// Pegel des letzten Samples gehalten (ohne weitere Edges).
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    samples: VecDeque<InputSample>,
    last_level: bool,
}

impl ScriptedInput {
    /// Erstellt eine leere Sequenz (liefert dauerhaft `idle`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Baut die Sequenz aus Button-Pegeln pro Tick; Edges werden abgeleitet.
    pub fn from_levels(levels: &[bool]) -> Self {
        let mut samples = VecDeque::with_capacity(levels.len());
        let mut previous = false;
        for &level in levels {
            samples.push_back(InputSample {
                performed: level,
                performed_this_frame: level && !previous,
                completed_this_frame: !level && previous,
            });
            previous = level;
        }
        Self {
            samples,
            last_level: previous,
        }
    }

    /// Hängt ein einzelnes Sample an.
    pub fn push(&mut self, sample: InputSample) {
        self.last_level = sample.performed;
        self.samples.push_back(sample);
    }

    /// Anzahl noch nicht konsumierter Samples.
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl InputReader for ScriptedInput {
    fn read(&mut self) -> InputSample {
        self.samples.pop_front().unwrap_or(InputSample {
            performed: self.last_level,
            performed_this_frame: false,
            completed_this_frame: false,
        })
    }
}

/// Liefert in jedem Tick dasselbe Sample (z.B. dauerhaft `idle`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantInput(pub InputSample);

impl InputReader for ConstantInput {
    fn read(&mut self) -> InputSample {
        self.0
    }
}
