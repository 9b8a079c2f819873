use serde::Serialize;
use std::time::Duration;

pub const NEUTRAL_BUTTON_COLOR: &str = "#007bff";
pub const NEUTRAL_TEXT_COLOR: &str = "black";

/// Outcome signalled on the search control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseKind {
    Empty,
    Found,
    NotFound,
    LoadError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseDelays {
    pub short: Duration,
    pub long: Duration,
}

impl Default for PulseDelays {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(1000),
            long: Duration::from_millis(1500),
        }
    }
}

/// Transient visual state of the search control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pulse {
    pub kind: PulseKind,
    #[serde(rename = "buttonColor")]
    pub button_color: &'static str,
    #[serde(rename = "fieldValue")]
    pub field_value: &'static str,
    #[serde(rename = "textColor")]
    pub text_color: &'static str,
    #[serde(skip)]
    pub delay: Duration,
}

impl Pulse {
    pub fn new(kind: PulseKind, delays: PulseDelays) -> Self {
        let (button_color, field_value, text_color, delay) = match kind {
            PulseKind::Empty => ("red", "Null value", "red", delays.short),
            PulseKind::Found => ("green", "User found", "green", delays.short),
            PulseKind::NotFound => ("red", "User not found", "red", delays.long),
            PulseKind::LoadError => ("red", "Error loading user", "red", delays.long),
        };
        Self {
            kind,
            button_color,
            field_value,
            text_color,
            delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PulseState {
    Idle,
    Pulsing { generation: u64, pulse: Pulse },
}

/// Idle -> Pulsing -> Idle, keyed by a generation counter so that a newer
/// pulse invalidates the pending reset of an older one.
#[derive(Debug, Clone)]
pub struct PulseMachine {
    state: PulseState,
    generation: u64,
}

impl Default for PulseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseMachine {
    pub fn new() -> Self {
        Self {
            state: PulseState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PulseState {
        &self.state
    }

    /// Enters `Pulsing` and returns the generation the matching reset must carry.
    pub fn start(&mut self, pulse: Pulse) -> u64 {
        self.generation += 1;
        self.state = PulseState::Pulsing {
            generation: self.generation,
            pulse,
        };
        self.generation
    }

    /// Returns to `Idle` if `generation` is still the current pulse.
    /// Stale resets are ignored and return `false`.
    pub fn reset(&mut self, generation: u64) -> bool {
        match self.state {
            PulseState::Pulsing {
                generation: current,
                ..
            } if current == generation => {
                self.state = PulseState::Idle;
                true
            }
            _ => false,
        }
    }
}
