//! Log routing between stderr and the readline prompt
//!
//! Records go to stderr until the console session hands over its
//! [`SharedWriter`]; from then on they are printed above the prompt instead of
//! through it.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use rustyline_async::SharedWriter;
use tracing_subscriber::fmt::MakeWriter;

/// Shared destination for formatted log records. One clone is installed in
/// the subscriber, another is handed to the console session.
#[derive(Clone, Default)]
pub struct LogRoute {
    prompt: Arc<Mutex<Option<SharedWriter>>>,
}

impl LogRoute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print records above the prompt until [`LogRoute::release`].
    pub fn attach_prompt(&self, writer: SharedWriter) {
        *self.prompt.lock() = Some(writer);
    }

    /// Go back to stderr. Safe to call when nothing is attached.
    pub fn release(&self) {
        self.prompt.lock().take();
    }

    pub fn is_prompt(&self) -> bool {
        self.prompt.lock().is_some()
    }
}

/// Writer for one log record
pub enum RouteWriter {
    Prompt(SharedWriter),
    Stderr(io::Stderr),
}

impl Write for RouteWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            RouteWriter::Prompt(writer) => writer.write(buf),
            RouteWriter::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            RouteWriter::Prompt(writer) => writer.flush(),
            RouteWriter::Stderr(stderr) => stderr.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogRoute {
    type Writer = RouteWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match self.prompt.lock().as_ref() {
            Some(writer) => RouteWriter::Prompt(writer.clone()),
            None => RouteWriter::Stderr(io::stderr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_stderr() {
        let route = LogRoute::new();
        assert!(!route.is_prompt());
        assert!(matches!(route.make_writer(), RouteWriter::Stderr(_)));
    }

    #[test]
    fn test_release_without_prompt_is_noop() {
        let route = LogRoute::new();
        let installed = route.clone();
        route.release();
        assert!(!installed.is_prompt());
        assert!(matches!(installed.make_writer(), RouteWriter::Stderr(_)));
    }
}
