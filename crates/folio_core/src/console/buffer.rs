use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::markup::Markup;

pub const MAX_LINES: usize = 10;

/// Severity and styling of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Muted,
    Warn,
    Error,
    Ok,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Muted => "muted",
            Tone::Warn => "warn",
            Tone::Error => "error",
            Tone::Ok => "ok",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Muted => "log-line log-muted show",
            Tone::Warn => "log-line log-warn show",
            Tone::Error => "log-line log-error show",
            Tone::Ok => "log-line log-ok show",
        }
    }

    /// Parse a tone name, falling back to `Muted` for anything unknown.
    pub fn parse_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for Tone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "muted" => Ok(Tone::Muted),
            "warn" => Ok(Tone::Warn),
            "error" => Ok(Tone::Error),
            "ok" => Ok(Tone::Ok),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub text: Markup,
    pub tone: Tone,
    pub key: Uuid,
}

impl LogLine {
    pub fn new(text: impl Into<Markup>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            key: Uuid::new_v4(),
        }
    }

    /// `<div class="log-line log-ok show">…</div>` with escaped text
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"{}\"><span class=\"log-dot\"></span><span>{}</span></div>",
            self.tone.css_class(),
            self.text.to_html()
        )
    }
}

/// FIFO buffer keeping the newest [`MAX_LINES`] lines
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_LINES)
    }
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a line, returning the one evicted to make room, if any.
    pub fn push(&mut self, line: LogLine) -> Option<LogLine> {
        let evicted = if self.lines.len() == self.capacity {
            self.lines.pop_front()
        } else {
            None
        };
        self.lines.push_back(line);
        evicted
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn snapshot(&self) -> Vec<LogLine> {
        self.lines.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleventh_line_drops_oldest() {
        let mut buffer = LogBuffer::default();
        for i in 0..MAX_LINES {
            assert!(buffer.push(LogLine::new(format!("line {}", i), Tone::Muted)).is_none());
        }
        assert_eq!(buffer.len(), MAX_LINES);

        let evicted = buffer.push(LogLine::new("line 10", Tone::Ok)).unwrap();
        assert_eq!(evicted.text.plain_text(), "line 0");
        assert_eq!(buffer.len(), MAX_LINES);
        assert_eq!(buffer.iter().next().unwrap().text.plain_text(), "line 1");
        assert_eq!(buffer.last().unwrap().tone, Tone::Ok);
    }

    #[test]
    fn test_keys_are_unique() {
        let a = LogLine::new("same", Tone::Muted);
        let b = LogLine::new("same", Tone::Muted);
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn test_unknown_tone_falls_back_to_muted() {
        assert_eq!(Tone::parse_lossy("warn"), Tone::Warn);
        assert_eq!(Tone::parse_lossy("shouting"), Tone::Muted);
        assert_eq!(Tone::parse_lossy("shouting").css_class(), "log-line log-muted show");
    }

    #[test]
    fn test_html_escapes_text() {
        let line = LogLine::new(Markup::new().command("<b>"), Tone::Warn);
        assert_eq!(
            line.to_html(),
            "<div class=\"log-line log-warn show\"><span class=\"log-dot\"></span>\
             <span><span class=\"c-cmd\">&lt;b&gt;</span></span></div>"
        );
    }
}
