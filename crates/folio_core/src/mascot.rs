//! Byte, the console mascot
//!
//! A closed set of moods plus a tip string. Every mood change, including an
//! explicit return to idle, restarts a single revert timer; only the most
//! recent change ever reverts.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::timer::Timer;

pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(1800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Idle,
    Typing,
    Deploy,
    Fetch,
    Ok,
    Error,
    Clear,
    Health,
    Wave,
    Fun,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Idle => "idle",
            Mood::Typing => "typing",
            Mood::Deploy => "deploy",
            Mood::Fetch => "fetch",
            Mood::Ok => "ok",
            Mood::Error => "error",
            Mood::Clear => "clear",
            Mood::Health => "health",
            Mood::Wave => "wave",
            Mood::Fun => "fun",
        }
    }

    /// Presentation class, e.g. `"byte byte-wave active"`
    pub fn css_class(&self) -> String {
        match self {
            Mood::Idle => "byte byte-idle".to_string(),
            other => format!("byte byte-{} active", other.as_str()),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MascotState {
    pub mood: Mood,
    pub tip: String,
}

/// Pointer and keyboard events aimed at the mascot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    PointerEnter,
    PointerLeave,
    Click,
    DoubleClick,
    Key(String),
}

#[derive(Debug, Clone)]
pub struct Mascot {
    state: Arc<watch::Sender<MascotState>>,
    revert: Timer,
    revert_delay: Duration,
}

impl Default for Mascot {
    fn default() -> Self {
        Self::new(DEFAULT_REVERT_DELAY)
    }
}

impl Mascot {
    pub fn new(revert_delay: Duration) -> Self {
        let (tx, _) = watch::channel(MascotState::default());
        Self {
            state: Arc::new(tx),
            revert: Timer::new(),
            revert_delay,
        }
    }

    /// Enter `mood` and restart the revert countdown.
    pub fn set(&self, mood: Mood, tip: impl Into<String>) {
        let tip = tip.into();
        debug!("mascot -> {} {:?}", mood, tip);
        self.state.send_replace(MascotState { mood, tip });

        let state = self.state.clone();
        self.revert.schedule(self.revert_delay, move || {
            debug!("mascot reverting to idle");
            state.send_replace(MascotState::default());
        });
    }

    /// Inspect an appended log line. A line may trigger both reactions, the
    /// later one winning.
    pub fn react_to_log(&self, text: &str) {
        if text.contains("200 OK") {
            self.set(Mood::Ok, "Success!");
        }
        if text.to_lowercase().contains("error") {
            self.set(Mood::Error, "Oops!");
        }
    }

    /// Apply the mood change for an interaction. Unrecognized keys are ignored.
    pub fn interact(&self, interaction: &Interaction) {
        match interaction {
            Interaction::PointerEnter => self.set(Mood::Typing, "Hi!"),
            Interaction::PointerLeave => self.set(Mood::Idle, ""),
            Interaction::Click => self.set(Mood::Wave, "Hello 👋"),
            Interaction::DoubleClick => self.set(Mood::Fun, "Boop ✨"),
            Interaction::Key(key) => {
                if key == "Enter" || key == " " {
                    self.set(Mood::Wave, "Hello 👋");
                }
                if key.eq_ignore_ascii_case("f") {
                    self.set(Mood::Fun, "Sparkle ✨");
                }
            }
        }
    }

    pub fn state(&self) -> MascotState {
        self.state.borrow().clone()
    }

    pub fn mood(&self) -> Mood {
        self.state.borrow().mood
    }

    pub fn is_active(&self) -> bool {
        self.mood() != Mood::Idle
    }

    pub fn subscribe(&self) -> watch::Receiver<MascotState> {
        self.state.subscribe()
    }

    /// Stop any pending revert without changing the current mood.
    pub fn cancel_revert(&self) {
        self.revert.cancel();
    }

    /// Drop any pending revert and go straight back to idle.
    pub fn reset(&self) {
        self.revert.cancel();
        self.state.send_replace(MascotState::default());
    }
}
