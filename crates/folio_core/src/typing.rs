//! Typing effect for the hero role line
//!
//! [`TypingEffect`] is a pure state machine: each [`TypingEffect::step`] says
//! how long to wait and what the line shows afterwards. It is also an infinite
//! iterator of frames. [`TypingDriver`] runs the machine on a tokio task with a
//! single pending sleep and publishes the displayed text on a watch channel.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::duration_ms;

pub const DEFAULT_ROLES: &[&str] = &[
    "Cloud Platform Engineer",
    "System Architect",
    "ML/AI Enthusiast",
    "Tech Innovator",
    "DevOps Specialist",
    "Backend Developer",
    "Technical Leader",
];

/// Cadence of the typing effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingConfig {
    /// Delay between typed characters
    #[serde(with = "duration_ms", default = "default_typing_speed")]
    pub typing_speed: Duration,

    /// Delay between deleted characters
    #[serde(with = "duration_ms", default = "default_deleting_speed")]
    pub deleting_speed: Duration,

    /// Pause once the full role is shown
    #[serde(with = "duration_ms", default = "default_pause_duration")]
    pub pause_duration: Duration,

    /// Pause once the line is empty, before the next role starts
    #[serde(with = "duration_ms", default = "default_delete_pause_duration")]
    pub delete_pause_duration: Duration,
}

fn default_typing_speed() -> Duration {
    Duration::from_millis(90)
}

fn default_deleting_speed() -> Duration {
    Duration::from_millis(45)
}

fn default_pause_duration() -> Duration {
    Duration::from_millis(1700)
}

fn default_delete_pause_duration() -> Duration {
    Duration::from_millis(450)
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            typing_speed: default_typing_speed(),
            deleting_speed: default_deleting_speed(),
            pause_duration: default_pause_duration(),
            delete_pause_duration: default_delete_pause_duration(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    PausedFull,
    Deleting,
    PausedEmpty,
}

/// One step of the effect: after `delay`, the line reads `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub delay: Duration,
    pub text: String,
    /// Phase whose delay elapsed to produce this frame
    pub phase: Phase,
    /// Role shown after the step
    pub role_index: usize,
}

#[derive(Debug, Clone)]
pub struct TypingEffect {
    roles: Vec<String>,
    config: TypingConfig,
    role_index: usize,
    char_index: usize,
    deleting: bool,
}

impl TypingEffect {
    pub fn new(roles: Vec<String>, config: TypingConfig) -> Self {
        Self {
            roles,
            config,
            role_index: 0,
            char_index: 0,
            deleting: false,
        }
    }

    pub fn with_default_roles(config: TypingConfig) -> Self {
        Self::new(DEFAULT_ROLES.iter().map(|r| r.to_string()).collect(), config)
    }

    pub fn config(&self) -> TypingConfig {
        self.config
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn role_index(&self) -> usize {
        self.role_index
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    fn current_len(&self) -> usize {
        self.roles
            .get(self.role_index)
            .map_or(0, |role| role.chars().count())
    }

    /// Current phase, or `None` when there are no roles to show.
    pub fn phase(&self) -> Option<Phase> {
        if self.roles.is_empty() {
            return None;
        }
        let len = self.current_len();
        Some(match (self.deleting, self.char_index) {
            (false, ci) if ci < len => Phase::Typing,
            (false, _) => Phase::PausedFull,
            (true, 0) => Phase::PausedEmpty,
            (true, _) => Phase::Deleting,
        })
    }

    /// Delay before the next step.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.phase().map(|phase| self.delay_for(phase))
    }

    fn delay_for(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Typing => self.config.typing_speed,
            Phase::PausedFull => self.config.pause_duration,
            Phase::Deleting => self.config.deleting_speed,
            Phase::PausedEmpty => self.config.delete_pause_duration,
        }
    }

    /// Text currently on screen.
    pub fn displayed(&self) -> String {
        self.roles
            .get(self.role_index)
            .map(|role| role.chars().take(self.char_index).collect())
            .unwrap_or_default()
    }

    pub fn step(&mut self) -> Option<Frame> {
        let phase = self.phase()?;
        let delay = self.delay_for(phase);

        match phase {
            Phase::Typing => self.char_index += 1,
            Phase::PausedFull => self.deleting = true,
            Phase::Deleting => self.char_index -= 1,
            Phase::PausedEmpty => {
                self.deleting = false;
                self.role_index = (self.role_index + 1) % self.roles.len();
            }
        }

        Some(Frame {
            delay,
            text: self.displayed(),
            phase,
            role_index: self.role_index,
        })
    }

    /// Change the cadence. Position in the current role is kept.
    pub fn set_config(&mut self, config: TypingConfig) {
        self.config = config;
    }

    /// Replace the role list. Indices are kept, clamped to the new list.
    pub fn set_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
        if self.roles.is_empty() {
            self.role_index = 0;
            self.char_index = 0;
            self.deleting = false;
            return;
        }
        self.role_index %= self.roles.len();
        self.char_index = self.char_index.min(self.current_len());
    }
}

impl Iterator for TypingEffect {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.step()
    }
}

#[derive(Debug)]
enum Control {
    Config(TypingConfig),
    Roles(Vec<String>),
}

/// Runs a [`TypingEffect`] in real time.
///
/// Dropping the driver stops the effect.
#[derive(Debug)]
pub struct TypingDriver {
    display: watch::Receiver<String>,
    control: mpsc::UnboundedSender<Control>,
    handle: JoinHandle<()>,
}

impl TypingDriver {
    /// Start the effect. Must be called from within a tokio runtime.
    pub fn spawn(mut effect: TypingEffect) -> Self {
        let (display_tx, display) = watch::channel(effect.displayed());
        let (control, mut control_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            loop {
                let Some(delay) = effect.pending_delay() else {
                    // Nothing to animate until roles arrive.
                    match control_rx.recv().await {
                        Some(msg) => apply(&mut effect, msg, &display_tx),
                        None => break,
                    }
                    continue;
                };

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {
                        if let Some(frame) = effect.step() {
                            display_tx.send_replace(frame.text);
                        }
                    }
                    msg = control_rx.recv() => match msg {
                        // The sleep is dropped here; the next loop turn starts
                        // a fresh one for the (possibly new) phase delay.
                        Some(msg) => apply(&mut effect, msg, &display_tx),
                        None => break,
                    },
                }
            }
            debug!("typing driver stopped");
        });

        Self {
            display,
            control,
            handle,
        }
    }

    pub fn current(&self) -> String {
        self.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.clone()
    }

    pub fn set_config(&self, config: TypingConfig) {
        let _ = self.control.send(Control::Config(config));
    }

    pub fn set_roles(&self, roles: Vec<String>) {
        let _ = self.control.send(Control::Roles(roles));
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

fn apply(effect: &mut TypingEffect, msg: Control, display: &watch::Sender<String>) {
    match msg {
        Control::Config(config) => effect.set_config(config),
        Control::Roles(roles) => {
            effect.set_roles(roles);
            display.send_replace(effect.displayed());
        }
    }
}

impl Drop for TypingDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn roles(list: &[&str]) -> Vec<String> {
        list.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_full_cycle_over_two_roles() {
        let effect = TypingEffect::new(roles(&["A", "BB"]), TypingConfig::default());
        let frames: Vec<(u64, String, usize)> = effect
            .take(12)
            .map(|f| (f.delay.as_millis() as u64, f.text, f.role_index))
            .collect();

        let expected = vec![
            (90, "A".to_string(), 0),
            (1700, "A".to_string(), 0),
            (45, "".to_string(), 0),
            (450, "".to_string(), 1),
            (90, "B".to_string(), 1),
            (90, "BB".to_string(), 1),
            (1700, "BB".to_string(), 1),
            (45, "B".to_string(), 1),
            (45, "".to_string(), 1),
            (450, "".to_string(), 0),
            (90, "A".to_string(), 0),
            (1700, "A".to_string(), 0),
        ];
        assert_eq!(frames, expected);
    }

    #[test]
    fn test_phases_follow_the_cycle() {
        let mut effect = TypingEffect::new(roles(&["A"]), TypingConfig::default());
        assert_eq!(effect.phase(), Some(Phase::Typing));
        effect.step();
        assert_eq!(effect.phase(), Some(Phase::PausedFull));
        effect.step();
        assert_eq!(effect.phase(), Some(Phase::Deleting));
        effect.step();
        assert_eq!(effect.phase(), Some(Phase::PausedEmpty));
        effect.step();
        assert_eq!(effect.phase(), Some(Phase::Typing));
    }

    #[test]
    fn test_multibyte_roles_step_by_char() {
        let mut effect = TypingEffect::new(roles(&["né"]), TypingConfig::default());
        assert_eq!(effect.step().unwrap().text, "n");
        assert_eq!(effect.step().unwrap().text, "né");
    }

    #[test]
    fn test_empty_roles_yield_nothing() {
        let mut effect = TypingEffect::new(Vec::new(), TypingConfig::default());
        assert_eq!(effect.phase(), None);
        assert!(effect.step().is_none());
    }

    #[test]
    fn test_set_roles_preserves_and_clamps_indices() {
        let mut effect = TypingEffect::new(roles(&["Engineer", "Architect"]), TypingConfig::default());
        for _ in 0..6 {
            effect.step();
        }
        assert_eq!(effect.displayed(), "Engine");

        effect.set_roles(roles(&["Eng", "Other"]));
        assert_eq!(effect.role_index(), 0);
        assert_eq!(effect.char_index(), 3);
        assert_eq!(effect.phase(), Some(Phase::PausedFull));
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_publishes_frames_in_real_time() {
        let config = TypingConfig {
            typing_speed: ms(90),
            deleting_speed: ms(45),
            pause_duration: ms(1700),
            delete_pause_duration: ms(450),
        };
        let driver = TypingDriver::spawn(TypingEffect::new(roles(&["A", "BB"]), config));
        assert_eq!(driver.current(), "");

        tokio::time::sleep(ms(95)).await;
        assert_eq!(driver.current(), "A");

        // still paused on the full role
        tokio::time::sleep(ms(1690)).await;
        assert_eq!(driver.current(), "A");

        tokio::time::sleep(ms(60)).await;
        assert_eq!(driver.current(), "");

        tokio::time::sleep(ms(450 + 90)).await;
        assert_eq!(driver.current(), "B");
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_config_change_restarts_delay() {
        let slow = TypingConfig {
            typing_speed: ms(1000),
            ..TypingConfig::default()
        };
        let driver = TypingDriver::spawn(TypingEffect::new(roles(&["AB"]), slow));

        tokio::time::sleep(ms(600)).await;
        driver.set_config(TypingConfig {
            typing_speed: ms(100),
            ..TypingConfig::default()
        });

        // the pending 1000ms sleep was replaced by a fresh 100ms one
        tokio::time::sleep(ms(110)).await;
        assert_eq!(driver.current(), "A");
    }
}
