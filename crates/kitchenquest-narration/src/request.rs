//! Narration requests and their outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One line of CDM narration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NarrationRequest {
    /// Text to narrate. Blank or absent text is ignored entirely.
    pub text: Option<String>,
    /// Whether the line should be spoken as well as logged.
    pub speak_aloud: bool,
}

impl NarrationRequest {
    /// A line that is logged and spoken.
    #[must_use]
    pub fn spoken(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            speak_aloud: true,
        }
    }

    /// A line that is only logged.
    #[must_use]
    pub fn logged(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            speak_aloud: false,
        }
    }

    /// The trimmed text, or `None` when there is nothing to say.
    #[must_use]
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// How the game is being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Normal play: spoken lines are synthesised and played.
    #[default]
    Interactive,
    /// Demo presentation: nothing is ever played aloud.
    Demo,
}

impl PresentationMode {
    /// Returns true in demo presentation.
    #[must_use]
    pub fn is_demo(self) -> bool {
        self == Self::Demo
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive => f.write_str("interactive"),
            Self::Demo => f.write_str("demo"),
        }
    }
}

impl FromStr for PresentationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "interactive" => Ok(Self::Interactive),
            "demo" => Ok(Self::Demo),
            other => Err(format!("unknown presentation mode: {other}")),
        }
    }
}

/// How a narration request resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationOutcome {
    /// Nothing to say; not logged.
    Silent,
    /// Logged but not spoken.
    LogOnly,
    /// Synthesis produced no audio.
    NoAudio,
    /// Played to its natural end.
    Played,
    /// Stopped or superseded by a newer spoken line.
    Preempted,
}
