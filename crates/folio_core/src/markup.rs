//! Styled console text
//!
//! Log lines and hints are sequences of styled spans rather than raw HTML, so
//! the same line can be rendered as escaped HTML for a browser front-end, as
//! colored text in a terminal, or as plain text for content inspection.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStyle {
    Plain,
    Verb,
    Section,
    Path,
    Command,
    Note,
    Ok,
    Error,
}

impl SpanStyle {
    /// CSS class used when rendering to HTML. `None` for unstyled text.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            SpanStyle::Plain => None,
            SpanStyle::Verb => Some("c-verb"),
            SpanStyle::Section => Some("c-sec"),
            SpanStyle::Path => Some("c-path"),
            SpanStyle::Command => Some("c-cmd"),
            SpanStyle::Note => Some("c-note"),
            SpanStyle::Ok => Some("log-ok"),
            SpanStyle::Error => Some("log-error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub style: SpanStyle,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    spans: Vec<Span>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, style: SpanStyle, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(Span { style, text });
        }
        self
    }

    pub fn plain(self, text: impl Into<String>) -> Self {
        self.push(SpanStyle::Plain, text)
    }

    pub fn verb(self, text: impl Into<String>) -> Self {
        self.push(SpanStyle::Verb, text)
    }

    pub fn section(self, text: impl Into<String>) -> Self {
        self.push(SpanStyle::Section, text)
    }

    pub fn path(self, text: impl Into<String>) -> Self {
        self.push(SpanStyle::Path, text)
    }

    pub fn command(self, text: impl Into<String>) -> Self {
        self.push(SpanStyle::Command, text)
    }

    pub fn note(self, text: impl Into<String>) -> Self {
        self.push(SpanStyle::Note, text)
    }

    pub fn ok(self, text: impl Into<String>) -> Self {
        self.push(SpanStyle::Ok, text)
    }

    pub fn error(self, text: impl Into<String>) -> Self {
        self.push(SpanStyle::Error, text)
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Concatenated text with all styling removed.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// HTML with every text node escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span.style.css_class() {
                Some(class) => {
                    out.push_str("<span class=\"");
                    out.push_str(class);
                    out.push_str("\">");
                    escape_into(&mut out, &span.text);
                    out.push_str("</span>");
                }
                None => escape_into(&mut out, &span.text),
            }
        }
        out
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup::new().plain(text)
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Markup::new().plain(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escapes_user_text() {
        let line = Markup::new().plain("> ").command("<script>alert(1)</script>");
        assert_eq!(
            line.to_html(),
            "&gt; <span class=\"c-cmd\">&lt;script&gt;alert(1)&lt;/script&gt;</span>"
        );
    }

    #[test]
    fn test_plain_text_drops_styles() {
        let line = Markup::new()
            .verb("GET")
            .plain(" ")
            .path("/")
            .plain(" ")
            .ok("200 OK");
        assert_eq!(line.plain_text(), "GET / 200 OK");
        assert_eq!(line.to_string(), "GET / 200 OK");
    }

    #[test]
    fn test_empty_spans_are_skipped() {
        let line = Markup::new().note("").plain("x");
        assert_eq!(line.spans().len(), 1);
    }
}
