//! Directive value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Glyph used to express heat intensity.
pub const FLAME: &str = "🔥";

/// A countdown requested by a micro-step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerDirective {
    /// Whole minutes, always positive.
    pub minutes: u32,
    /// Label shown next to the countdown.
    pub label: String,
}

impl TimerDirective {
    /// Full countdown length in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.minutes.saturating_mul(60)
    }
}

/// Stove heat requested by a micro-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatLevel {
    /// Explicitly no heat (`N/A`).
    NotApplicable,
    /// One to three flames.
    Flames(u8),
}

impl fmt::Display for HeatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => f.write_str("N/A"),
            Self::Flames(count) => f.write_str(&FLAME.repeat(usize::from(*count))),
        }
    }
}

/// Heat token contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeatDirective {
    /// Heat intensity.
    pub level: HeatLevel,
    /// Parenthetical label; always empty for [`HeatLevel::NotApplicable`].
    pub label: String,
}

impl HeatDirective {
    /// Flames as display text: `N/A` or adjacent flame glyphs.
    #[must_use]
    pub fn flames(&self) -> String {
        self.level.to_string()
    }
}

/// Result of parsing one raw instruction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedInstruction {
    /// Display text with every directive token removed.
    pub clean_instruction: String,
    /// First well-formed timer token, if any.
    pub timer: Option<TimerDirective>,
    /// First heat token, if any.
    pub heat: Option<HeatDirective>,
}
