//! Input-Layer: logische Interpretation bereits gesampelter Button-Werte.
//!
//! Gerätespezifisches Binding ist Sache der Einbettung; dieses Modul
//! übersetzt rohe Samples in eine stabile "will dieser Actor agieren"-
//! Entscheidung.

pub mod reader;
pub mod trigger;

pub use reader::{ConstantInput, InputReader, ScriptedInput};
pub use trigger::{InputSample, LogicalInputState, TriggerMode};
