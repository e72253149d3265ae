//! Simulated console
//!
//! A bounded log, a tiny command language with live hints, a one-shot boot
//! script and a panel that collapses itself after a delay. The console owns
//! the mascot and shows it every line it appends.

mod buffer;
mod commands;
mod log_slot;

pub use buffer::{LogBuffer, LogLine, MAX_LINES, Tone};
pub use commands::{COMMANDS, Command, Hint, help_text};
pub use log_slot::{LogSink, LogSlot, LogSubscription};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    FolioError,
    config::duration_ms,
    markup::Markup,
    mascot::{DEFAULT_REVERT_DELAY, Interaction, Mascot, MascotState, Mood},
    navigation::NavigationRegistry,
    timer::Timer,
};

/// Flavor text for the last boot line
pub const FLAVOR_LINES: &[&str] = &[
    "Compiling coffee ☕…",
    "Warming up servers…",
    "Allocating extra vibes…",
    "Optimizing pixels…",
    "Spinning up tiny hamsters…",
    "Hydrating UI…",
];

const PREFETCH_AT: Duration = Duration::from_millis(220);
const GET_AT: Duration = Duration::from_millis(520);
const FLAVOR_AT: Duration = Duration::from_millis(900);

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// How long the panel stays expanded after it first shows
    #[serde(with = "duration_ms", default = "default_auto_minimize")]
    pub auto_minimize_delay: Duration,

    /// Viewports narrower than this get no console at all
    #[serde(default = "default_breakpoint")]
    pub breakpoint: u32,

    /// Mascot mood lifetime
    #[serde(with = "duration_ms", default = "default_mood_revert")]
    pub mood_revert_delay: Duration,
}

fn default_auto_minimize() -> Duration {
    Duration::from_millis(1500)
}

fn default_breakpoint() -> u32 {
    768
}

fn default_mood_revert() -> Duration {
    DEFAULT_REVERT_DELAY
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            auto_minimize_delay: default_auto_minimize(),
            breakpoint: default_breakpoint(),
            mood_revert_delay: default_mood_revert(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelState {
    Expanded,
    Minimized,
    /// Not rendered (narrow viewport or not attached)
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Line(LogLine),
    Cleared,
}

#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    buffer: Mutex<LogBuffer>,
    events: broadcast::Sender<ConsoleEvent>,
    mascot: Mascot,
    navigation: NavigationRegistry,
    input: Mutex<String>,
    hint: watch::Sender<Hint>,
    panel: watch::Sender<PanelState>,
    minimize: Timer,
    /// Panel was minimized when a narrow viewport hid it
    hidden_minimized: AtomicBool,
    boot: Timer,
    booted: AtomicBool,
    subscription: Mutex<Option<LogSubscription>>,
}

impl Console {
    pub fn new(config: ConsoleConfig, navigation: NavigationRegistry) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (hint, _) = watch::channel(Hint::Prompt);
        let (panel, _) = watch::channel(PanelState::Hidden);

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                buffer: Mutex::new(LogBuffer::default()),
                events,
                mascot: Mascot::new(config.mood_revert_delay),
                navigation,
                input: Mutex::new(String::new()),
                hint,
                panel,
                minimize: Timer::new(),
                hidden_minimized: AtomicBool::new(false),
                boot: Timer::new(),
                booted: AtomicBool::new(false),
                subscription: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn mascot(&self) -> &Mascot {
        &self.inner.mascot
    }

    // Log buffer

    /// Append a line and let the mascot react to it.
    pub fn append(&self, text: impl Into<Markup>, tone: Tone) {
        let line = LogLine::new(text, tone);
        let plain = line.text.plain_text();
        {
            let mut buffer = self.inner.buffer.lock();
            buffer.push(line.clone());
            // Sent under the lock so subscribers observe buffer order.
            let _ = self.inner.events.send(ConsoleEvent::Line(line));
        }
        self.inner.mascot.react_to_log(&plain);
    }

    pub fn clear(&self) {
        let mut buffer = self.inner.buffer.lock();
        buffer.clear();
        let _ = self.inner.events.send(ConsoleEvent::Cleared);
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.inner.buffer.lock().snapshot()
    }

    /// The newest line as plain text, for screen readers
    pub fn live_text(&self) -> String {
        self.inner
            .buffer
            .lock()
            .last()
            .map(|line| line.text.plain_text())
            .unwrap_or_default()
    }

    pub fn events(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.inner.events.subscribe()
    }

    // Boot script

    /// Play the boot script. Runs at most once per console; later calls return
    /// `false`.
    pub fn boot(&self) -> bool {
        if self.inner.booted.swap(true, Ordering::SeqCst) {
            return false;
        }
        info!("console booting");

        let flavor = FLAVOR_LINES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FLAVOR_LINES[0]);

        self.append(
            Markup::new().verb("Booting").plain(" ").section("client").plain("…"),
            Tone::Muted,
        );

        let console = Arc::downgrade(&self.inner);
        self.inner.boot.schedule_async(PREFETCH_AT, async move {
            let script = [
                (
                    Duration::ZERO,
                    Markup::new().verb("Prefetch").plain(" ").section("assets"),
                    Tone::Warn,
                ),
                (
                    GET_AT - PREFETCH_AT,
                    Markup::new()
                        .verb("GET")
                        .plain(" ")
                        .path("/")
                        .plain(" ")
                        .ok("200 OK"),
                    Tone::Muted,
                ),
                (FLAVOR_AT - GET_AT, Markup::from(flavor), Tone::Muted),
            ];
            for (wait, text, tone) in script {
                tokio::time::sleep(wait).await;
                let Some(inner) = console.upgrade() else {
                    return;
                };
                Console { inner }.append(text, tone);
            }
        });
        true
    }

    pub fn has_booted(&self) -> bool {
        self.inner.booted.load(Ordering::SeqCst)
    }

    // Input and commands

    pub fn input(&self) -> String {
        self.inner.input.lock().clone()
    }

    pub fn hint(&self) -> Hint {
        self.inner.hint.borrow().clone()
    }

    pub fn subscribe_hint(&self) -> watch::Receiver<Hint> {
        self.inner.hint.subscribe()
    }

    /// Replace the prompt contents, as if the user typed.
    pub fn set_input(&self, value: impl Into<String>) {
        let value = value.into();
        self.inner.hint.send_replace(Hint::for_input(&value));
        *self.inner.input.lock() = value;
        self.inner.mascot.set(Mood::Typing, "Typing…");
    }

    pub fn focus(&self) {
        self.inner.mascot.set(Mood::Typing, "Typing…");
    }

    pub fn blur(&self) {
        self.inner.mascot.set(Mood::Idle, "");
    }

    /// Run whatever is in the prompt, then reset the prompt.
    pub fn submit(&self) {
        let input = std::mem::take(&mut *self.inner.input.lock());
        self.handle_command(&input);
    }

    /// Execute one command line. Blank input is ignored entirely.
    pub fn handle_command(&self, raw: &str) {
        let Some(command) = Command::parse(raw) else {
            return;
        };
        debug!("console command {:?}", command);

        self.append(
            Markup::new().plain("> ").command(raw.trim()),
            Tone::Muted,
        );

        match command {
            Command::Wave => {
                self.inner.mascot.set(Mood::Wave, "Hello 👋");
                self.append(
                    Markup::new().section("Byte").plain(": ").note("Waving at you 👋"),
                    Tone::Muted,
                );
            }
            Command::Clear => {
                self.clear();
                self.append(Markup::new().note("Console cleared"), Tone::Ok);
            }
            Command::Help => {
                self.append(Markup::new().section("Commands").plain(":"), Tone::Warn);
                for (name, help) in COMMANDS {
                    self.append(
                        Markup::new()
                            .plain("- ")
                            .command(*name)
                            .plain(": ")
                            .note(*help),
                        Tone::Muted,
                    );
                }
            }
            Command::Download => {
                self.append(
                    Markup::new().note("Download triggered (not implemented)"),
                    Tone::Muted,
                );
            }
            Command::Goto(id) => match self.scroll_to(id) {
                Ok(()) => self.append(
                    Markup::new().note(format!("Scrolling to {}...", id)),
                    Tone::Muted,
                ),
                Err(e) => {
                    warn!("{}: {}", e, id);
                    self.append(
                        Markup::new().note(format!("Section {} not found", id)),
                        Tone::Error,
                    );
                }
            },
            Command::Unknown(cmd) => {
                self.append(
                    Markup::new()
                        .note("Unknown command:")
                        .plain(" ")
                        .command(cmd),
                    Tone::Warn,
                );
            }
        }

        self.inner.input.lock().clear();
        self.inner.hint.send_replace(Hint::Prompt);
    }

    fn scroll_to(&self, id: &str) -> crate::Result<()> {
        if self.inner.navigation.scroll_to(id) {
            Ok(())
        } else {
            Err(FolioError::section_not_found(id, self.inner.navigation.ids()))
        }
    }

    // Mascot

    pub fn interact(&self, interaction: Interaction) {
        self.inner.mascot.interact(&interaction);
        match interaction {
            Interaction::Click => self.append(
                Markup::new().section("Byte").plain(": ").note("Hello there!"),
                Tone::Warn,
            ),
            Interaction::DoubleClick => self.append(
                Markup::new().section("Byte").plain(": ").note("Boop!"),
                Tone::Muted,
            ),
            _ => {}
        }
    }

    pub fn mascot_state(&self) -> MascotState {
        self.inner.mascot.state()
    }

    // Panel

    pub fn panel(&self) -> PanelState {
        *self.inner.panel.borrow()
    }

    pub fn subscribe_panel(&self) -> watch::Receiver<PanelState> {
        self.inner.panel.subscribe()
    }

    /// Re-evaluate visibility for a viewport width.
    ///
    /// Narrow viewports hide the console and stop the minimize countdown.
    /// Becoming wide again restores a minimized panel as minimized; otherwise
    /// it shows expanded and restarts the countdown.
    pub fn resize(&self, viewport_width: u32) {
        let narrow = viewport_width < self.inner.config.breakpoint;
        let current = self.panel();

        if narrow {
            self.inner.minimize.cancel();
            if current != PanelState::Hidden {
                self.inner
                    .hidden_minimized
                    .store(current == PanelState::Minimized, Ordering::SeqCst);
            }
            self.set_panel(PanelState::Hidden);
        } else if current == PanelState::Hidden {
            if self.inner.hidden_minimized.swap(false, Ordering::SeqCst) {
                self.set_panel(PanelState::Minimized);
                return;
            }
            self.set_panel(PanelState::Expanded);
            let console = Arc::downgrade(&self.inner);
            self.inner
                .minimize
                .schedule(self.inner.config.auto_minimize_delay, move || {
                    if let Some(inner) = console.upgrade() {
                        let console = Console { inner };
                        if console.panel() == PanelState::Expanded {
                            console.set_panel(PanelState::Minimized);
                        }
                    }
                });
        }
    }

    /// Flip between expanded and minimized. A manual toggle cancels the
    /// pending auto-minimize.
    pub fn toggle(&self) {
        self.inner.minimize.cancel();
        match self.panel() {
            PanelState::Expanded => self.set_panel(PanelState::Minimized),
            PanelState::Minimized => self.set_panel(PanelState::Expanded),
            PanelState::Hidden => {}
        }
    }

    fn set_panel(&self, state: PanelState) {
        if self.inner.panel.send_if_modified(|current| {
            let changed = *current != state;
            *current = state;
            changed
        }) {
            debug!("console panel -> {:?}", state);
        }
    }

    // Lifecycle

    /// Take over the log slot, boot, and size the panel.
    pub fn attach(&self, log: &LogSlot, viewport_width: u32) {
        let sink: Arc<dyn LogSink> = Arc::new(self.clone());
        *self.inner.subscription.lock() = Some(log.subscribe(sink));
        self.boot();
        self.resize(viewport_width);
    }

    /// Release the log slot, stop pending timers and put the mascot back to
    /// idle.
    pub fn detach(&self) {
        self.inner.subscription.lock().take();
        self.inner.boot.cancel();
        self.inner.minimize.cancel();
        self.inner.mascot.reset();
        self.inner.hidden_minimized.store(false, Ordering::SeqCst);
        self.set_panel(PanelState::Hidden);
    }

    pub fn is_attached(&self) -> bool {
        self.inner
            .subscription
            .lock()
            .as_ref()
            .is_some_and(LogSubscription::is_current)
    }
}

impl LogSink for Console {
    fn log(&self, text: Markup, tone: Tone) {
        self.append(text, tone);
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("lines", &self.inner.buffer.lock().len())
            .field("panel", &self.panel())
            .field("mascot", &self.inner.mascot.mood())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavItem;
    use pretty_assertions::assert_eq;
    use tokio::time::sleep;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn console() -> Console {
        Console::new(ConsoleConfig::default(), NavigationRegistry::new())
    }

    fn texts(console: &Console) -> Vec<String> {
        console.lines().iter().map(|l| l.text.plain_text()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_leaves_one_ok_line() {
        let console = console();
        for i in 0..5 {
            console.append(format!("line {}", i), Tone::Muted);
        }
        console.handle_command("CLEAR");

        let lines = console.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].tone, Tone::Ok);
        assert_eq!(lines[0].text.plain_text(), "Console cleared");
    }

    #[tokio::test(start_paused = true)]
    async fn test_buffer_stays_bounded() {
        let console = console();
        console.handle_command("help");
        // echo + header + one per command, trimmed to the newest ten
        assert_eq!(console.lines().len(), MAX_LINES);
        assert_eq!(texts(&console).last().unwrap(), "- home: Scroll to top");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_ignored() {
        let console = console();
        console.handle_command("   ");
        assert!(console.lines().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_command_warns() {
        let console = console();
        console.handle_command("  rm -rf /  ");
        let lines = console.lines();
        assert_eq!(texts(&console), vec!["> rm -rf /", "Unknown command: rm -rf /"]);
        assert_eq!(lines[1].tone, Tone::Warn);
    }

    #[tokio::test(start_paused = true)]
    async fn test_goto_requires_registered_section() {
        let navigation = NavigationRegistry::new();
        let console = Console::new(ConsoleConfig::default(), navigation.clone());

        console.handle_command("about");
        assert_eq!(console.lines()[1].tone, Tone::Error);
        assert_eq!(texts(&console)[1], "Section about not found");

        navigation.register(NavItem::new("about", "About"));
        console.handle_command("About");
        assert_eq!(texts(&console)[3], "Scrolling to about...");
        assert_eq!(navigation.scroll_target().as_deref(), Some("about"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wave_sets_mood() {
        let console = console();
        console.handle_command("wave");
        assert_eq!(console.mascot_state().mood, Mood::Wave);
        assert_eq!(texts(&console)[1], "Byte: Waving at you 👋");
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_updates_hint_and_submit_resets() {
        let console = console();
        console.set_input("/cle");
        assert!(matches!(console.hint(), Hint::Command { name: "clear", .. }));
        assert_eq!(console.mascot().mood(), Mood::Typing);

        console.set_input("clear");
        console.submit();
        assert_eq!(console.input(), "");
        assert_eq!(console.hint(), Hint::Prompt);
        assert_eq!(texts(&console), vec!["Console cleared"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slash_only_applies_to_hints() {
        let console = console();
        console.set_input("/clear");
        assert!(matches!(console.hint(), Hint::Command { name: "clear", .. }));

        console.submit();
        assert_eq!(texts(&console), vec!["> /clear", "Unknown command: /clear"]);
        assert_eq!(console.lines()[1].tone, Tone::Warn);
    }

    #[tokio::test(start_paused = true)]
    async fn test_boot_runs_once_with_offsets() {
        let console = console();
        assert!(console.boot());
        assert!(!console.boot());
        assert_eq!(texts(&console), vec!["Booting client…"]);

        sleep(ms(230)).await;
        assert_eq!(texts(&console)[1], "Prefetch assets");

        sleep(ms(300)).await;
        assert_eq!(texts(&console)[2], "GET / 200 OK");
        assert_eq!(console.mascot().mood(), Mood::Ok);

        sleep(ms(400)).await;
        let lines = texts(&console);
        assert_eq!(lines.len(), 4);
        assert!(FLAVOR_LINES.contains(&lines[3].as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_minimizes_after_delay() {
        let console = console();
        let log = LogSlot::new();
        console.attach(&log, 1024);
        assert_eq!(console.panel(), PanelState::Expanded);

        sleep(ms(1499)).await;
        assert_eq!(console.panel(), PanelState::Expanded);
        sleep(ms(2)).await;
        assert_eq!(console.panel(), PanelState::Minimized);

        console.toggle();
        assert_eq!(console.panel(), PanelState::Expanded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_narrow_viewport_hides_console() {
        let console = console();
        let log = LogSlot::new();
        console.attach(&log, 500);
        assert_eq!(console.panel(), PanelState::Hidden);

        // still booted and still receiving lines
        assert!(console.has_booted());
        log.log("from elsewhere", Tone::Ok);
        assert_eq!(texts(&console).last().unwrap(), "from elsewhere");

        sleep(ms(2000)).await;
        assert_eq!(console.panel(), PanelState::Hidden);

        console.resize(1200);
        assert_eq!(console.panel(), PanelState::Expanded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_minimized_panel_survives_narrow_viewport() {
        let console = console();
        let log = LogSlot::new();
        console.attach(&log, 1024);
        sleep(ms(1600)).await;
        assert_eq!(console.panel(), PanelState::Minimized);

        console.resize(500);
        assert_eq!(console.panel(), PanelState::Hidden);
        console.resize(1024);
        assert_eq!(console.panel(), PanelState::Minimized);

        // an expanded panel comes back expanded and minimizes again
        console.toggle();
        console.resize(500);
        console.resize(1024);
        assert_eq!(console.panel(), PanelState::Expanded);
        sleep(ms(1600)).await;
        assert_eq!(console.panel(), PanelState::Minimized);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_releases_log_slot() {
        let console = console();
        let log = LogSlot::new();
        console.attach(&log, 1024);
        assert!(console.is_attached());

        console.detach();
        assert!(!log.has_subscriber());
        let before = console.lines().len();
        log.log("dropped", Tone::Muted);
        assert_eq!(console.lines().len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_leaves_mascot_idle() {
        let console = console();
        let log = LogSlot::new();
        console.attach(&log, 1024);
        console.interact(Interaction::Click);
        assert_eq!(console.mascot().mood(), Mood::Wave);

        console.detach();
        assert_eq!(console.mascot().mood(), Mood::Idle);
        sleep(ms(5000)).await;
        assert_eq!(console.mascot().mood(), Mood::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_logs_greeting() {
        let console = console();
        console.interact(Interaction::Click);
        assert_eq!(console.mascot().mood(), Mood::Wave);
        assert_eq!(console.lines()[0].tone, Tone::Warn);
        assert_eq!(texts(&console)[0], "Byte: Hello there!");
    }
}
