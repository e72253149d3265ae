use std::io::Write;

use folio_core::{
    LogLine, Markup, MascotState, Mood, PanelState, SpanStyle, Tone,
    console::Hint,
};
use owo_colors::OwoColorize;
use rustyline_async::SharedWriter;

/// Standard output formatting for the CLI
///
/// Inside the console session every line goes through the readline
/// SharedWriter so the prompt is redrawn below it.
#[derive(Clone, Default)]
pub struct Output {
    writer: Option<SharedWriter>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_writer(mut self, writer: SharedWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Print one raw line
    pub fn print(&self, line: &str) {
        match &self.writer {
            Some(writer) => {
                let mut writer = writer.clone();
                let _ = writeln!(writer, "{}", line);
            }
            None => println!("{}", line),
        }
    }

    /// Print a system/status message (indented)
    pub fn status(&self, message: &str) {
        self.print(&format!("  {}", message.dimmed()));
    }

    /// Print a labelled value (indented)
    pub fn info(&self, label: &str, value: &str) {
        self.print(&format!("  {} {}", label.bright_blue(), value));
    }

    pub fn success(&self, message: &str) {
        self.print(&format!("  {} {}", "✓".bright_green(), message));
    }

    pub fn error(&self, message: &str) {
        self.print(&format!("  {} {}", "✗".bright_red(), message));
    }

    pub fn warning(&self, message: &str) {
        self.print(&format!("  {} {}", "⚠".yellow(), message));
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        self.print("");
        self.print(&format!("{}", title.bright_cyan().bold()));
        self.print(&format!("{}", "─".repeat(40).dimmed()));
    }

    /// Print a list item (already indented)
    pub fn list_item(&self, item: &str) {
        self.print(&format!("    • {}", item));
    }

    /// Print a key/value pair with aligned keys
    pub fn kv(&self, key: &str, value: &str) {
        self.print(&format!("  {:<14} {}", format!("{}:", key).dimmed(), value));
    }

    /// Print a console log line in its tone
    pub fn log_line(&self, line: &LogLine) {
        let marker = match line.tone {
            Tone::Muted => "·".dimmed().to_string(),
            Tone::Warn => "›".yellow().to_string(),
            Tone::Error => "✗".bright_red().to_string(),
            Tone::Ok => "✓".bright_green().to_string(),
        };
        self.print(&format!("  {} {}", marker, render_markup(&line.text)));
    }

    pub fn hint(&self, hint: &Hint) {
        self.print(&format!("  {} {}", "hint".dimmed(), render_markup(&hint.to_markup())));
    }

    pub fn mascot(&self, state: &MascotState) {
        let face = mood_face(state.mood);
        if state.tip.is_empty() {
            self.print(&format!("  {} {}", face, state.mood.dimmed()));
        } else {
            self.print(&format!(
                "  {} {} {}",
                face,
                state.mood.dimmed(),
                state.tip.bright_white()
            ));
        }
    }

    pub fn panel(&self, panel: PanelState) {
        let label = match panel {
            PanelState::Expanded => "console expanded",
            PanelState::Minimized => "console minimized",
            PanelState::Hidden => "console hidden",
        };
        self.status(label);
    }
}

/// Render styled spans with terminal colors
pub fn render_markup(markup: &Markup) -> String {
    markup
        .spans()
        .iter()
        .map(|span| match span.style {
            SpanStyle::Plain => span.text.clone(),
            SpanStyle::Verb => span.text.bright_magenta().to_string(),
            SpanStyle::Section => span.text.bright_cyan().to_string(),
            SpanStyle::Path => span.text.blue().to_string(),
            SpanStyle::Command => span.text.bright_yellow().to_string(),
            SpanStyle::Note => span.text.dimmed().to_string(),
            SpanStyle::Ok => span.text.bright_green().to_string(),
            SpanStyle::Error => span.text.bright_red().to_string(),
        })
        .collect()
}

fn mood_face(mood: Mood) -> &'static str {
    match mood {
        Mood::Idle => "(•‿•)",
        Mood::Typing => "(•̀ᴗ•́)⌨",
        Mood::Deploy => "(•̀ᴗ•́)🚀",
        Mood::Fetch => "(•_•)…",
        Mood::Ok => "(＾▽＾)",
        Mood::Error => "(×_×)",
        Mood::Clear => "(－‿－)",
        Mood::Health => "(•‿•)♥",
        Mood::Wave => "(•‿•)ノ",
        Mood::Fun => "(☆▽☆)",
    }
}
