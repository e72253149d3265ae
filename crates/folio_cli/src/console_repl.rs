//! Interactive console session
//!
//! Watchers print console lines, mascot moods, panel changes and scroll
//! targets through the readline writer while the prompt feeds the console.

use folio_core::{FolioConfig, Interaction, Portfolio, console::ConsoleEvent};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use rustyline_async::{Readline, ReadlineEvent};
use tokio::task::JoinHandle;
use tokio_stream::{
    StreamExt,
    wrappers::{BroadcastStream, WatchStream, errors::BroadcastStreamRecvError},
};
use tracing::{debug, warn};

use crate::{log_route::LogRoute, output::Output};

const SESSION_HELP: &[(&str, &str)] = &[
    (":hint <text>", "show the hint for partial input"),
    (":click", "click the mascot"),
    (":poke", "double-click the mascot"),
    (":enter", "hover the mascot"),
    (":leave", "stop hovering the mascot"),
    (":key <k>", "press a key while the mascot is focused"),
    (":toggle", "expand or minimize the console panel"),
    (":more", "reveal the next page of projects"),
    (":retry", "retry the project feed"),
    (":nav", "list registered sections"),
    (":hero", "show the hero line"),
    (":help", "this list"),
    ("quit", "leave the session"),
];

/// Session-level input, everything else goes to the simulated console
#[derive(Debug, PartialEq, Eq)]
enum SessionInput<'a> {
    Quit,
    Hint(&'a str),
    Interact(Interaction),
    Toggle,
    More,
    Retry,
    Nav,
    Hero,
    Help,
    BadSession(&'a str),
    Console(&'a str),
}

impl<'a> SessionInput<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            return SessionInput::Quit;
        }
        let Some(rest) = trimmed.strip_prefix(':') else {
            return SessionInput::Console(trimmed);
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name {
            "hint" => SessionInput::Hint(arg),
            "click" => SessionInput::Interact(Interaction::Click),
            "poke" => SessionInput::Interact(Interaction::DoubleClick),
            "enter" => SessionInput::Interact(Interaction::PointerEnter),
            "leave" => SessionInput::Interact(Interaction::PointerLeave),
            "key" if !arg.is_empty() => SessionInput::Interact(Interaction::Key(key_name(arg))),
            "toggle" => SessionInput::Toggle,
            "more" => SessionInput::More,
            "retry" => SessionInput::Retry,
            "nav" => SessionInput::Nav,
            "hero" => SessionInput::Hero,
            "help" => SessionInput::Help,
            _ => SessionInput::BadSession(trimmed),
        }
    }
}

/// `space` and `enter` name keys that cannot be typed as an argument.
fn key_name(arg: &str) -> String {
    match arg.to_ascii_lowercase().as_str() {
        "space" => " ".to_string(),
        "enter" | "return" => "Enter".to_string(),
        _ => arg.to_string(),
    }
}

pub async fn run(config: FolioConfig, width: u32, log_route: &LogRoute) -> Result<()> {
    let output = Output::new();
    output.status("Type 'quit' or 'exit' to leave, ':help' for session commands");
    output.status("Anything else goes to the console; try 'help'");

    let (mut rl, writer) = Readline::new(format!("{} ", ">".bright_blue())).into_diagnostic()?;
    log_route.attach_prompt(writer.clone());
    let output = output.with_writer(writer.clone());

    let mut portfolio = Portfolio::new(config);
    let watchers = spawn_watchers(&portfolio, &output);
    portfolio.start(width).await;

    loop {
        let event = rl.readline().await;
        match event {
            Ok(ReadlineEvent::Line(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line.clone());
                if !handle_line(&portfolio, &output, &line).await {
                    break;
                }
            }
            Ok(ReadlineEvent::Interrupted) => {
                output.status("CTRL-C");
                continue;
            }
            Ok(ReadlineEvent::Eof) => {
                output.status("CTRL-D");
                break;
            }
            Err(e) => {
                output.error(&format!("Readline error: {}", e));
                break;
            }
        }
    }

    portfolio.shutdown().await;
    for watcher in watchers {
        watcher.abort();
    }
    rl.flush().into_diagnostic()?;
    log_route.release();
    Ok(())
}

/// Returns `false` when the session should end.
async fn handle_line(portfolio: &Portfolio, output: &Output, line: &str) -> bool {
    let console = portfolio.console();
    match SessionInput::parse(line) {
        SessionInput::Quit => return false,
        SessionInput::Console(text) => {
            console.set_input(text);
            console.submit();
        }
        SessionInput::Hint(text) => {
            console.set_input(text);
            output.hint(&console.hint());
        }
        SessionInput::Interact(interaction) => console.interact(interaction),
        SessionInput::Toggle => console.toggle(),
        SessionInput::More => {
            let feed = portfolio.feed();
            if feed.has_more() {
                feed.show_more();
                crate::commands::projects::print_repos(output, &feed.visible());
            } else {
                output.status("No more projects");
            }
        }
        SessionInput::Retry => portfolio.feed().retry().await,
        SessionInput::Nav => {
            output.section("Sections");
            for item in portfolio.navigation().items() {
                output.list_item(&format!("{} {}", item.label, format!("#{}", item.id).dimmed()));
            }
        }
        SessionInput::Hero => {
            let home = &portfolio.page().home;
            output.kv("Name", home.owner());
            output.kv("Role", &home.role_text());
            if let Some(years) = home.years() {
                output.kv("Experience", &format!("{}+ years", years));
            }
        }
        SessionInput::Help => {
            output.section("Session commands");
            for (name, help) in SESSION_HELP {
                output.list_item(&format!("{} {}", name.bright_yellow(), help.dimmed()));
            }
        }
        SessionInput::BadSession(text) => {
            output.warning(&format!("Unknown session command {}; try :help", text));
        }
    }
    true
}

fn spawn_watchers(portfolio: &Portfolio, output: &Output) -> Vec<JoinHandle<()>> {
    let console = portfolio.console();
    let mut watchers = Vec::new();

    let mut lines = BroadcastStream::new(console.events());
    let out = output.clone();
    watchers.push(tokio::spawn(async move {
        while let Some(event) = lines.next().await {
            match event {
                Ok(ConsoleEvent::Line(line)) => out.log_line(&line),
                Ok(ConsoleEvent::Cleared) => out.status("── console cleared ──"),
                Err(BroadcastStreamRecvError::Lagged(n)) => {
                    warn!("console printer lagged by {} lines", n);
                }
            }
        }
    }));

    let mut moods = WatchStream::from_changes(console.mascot().subscribe());
    let out = output.clone();
    watchers.push(tokio::spawn(async move {
        while let Some(state) = moods.next().await {
            out.mascot(&state);
        }
    }));

    let mut panel = WatchStream::from_changes(console.subscribe_panel());
    let out = output.clone();
    watchers.push(tokio::spawn(async move {
        while let Some(state) = panel.next().await {
            out.panel(state);
        }
    }));

    let mut scroll = WatchStream::from_changes(portfolio.navigation().subscribe_scroll());
    let out = output.clone();
    watchers.push(tokio::spawn(async move {
        while let Some(target) = scroll.next().await {
            if let Some(id) = target {
                debug!("scroll target {}", id);
                out.status(&format!("↳ #{}", id));
            }
        }
    }));

    watchers
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quit_and_exit() {
        assert_eq!(SessionInput::parse("quit"), SessionInput::Quit);
        assert_eq!(SessionInput::parse("  exit "), SessionInput::Quit);
    }

    #[test]
    fn test_plain_text_goes_to_console() {
        assert_eq!(SessionInput::parse(" help "), SessionInput::Console("help"));
        assert_eq!(SessionInput::parse("/hello"), SessionInput::Console("/hello"));
    }

    #[test]
    fn test_session_commands() {
        assert_eq!(SessionInput::parse(":hint do"), SessionInput::Hint("do"));
        assert_eq!(SessionInput::parse(":hint"), SessionInput::Hint(""));
        assert_eq!(
            SessionInput::parse(":poke"),
            SessionInput::Interact(Interaction::DoubleClick)
        );
        assert_eq!(SessionInput::parse(":toggle"), SessionInput::Toggle);
        assert_eq!(SessionInput::parse(":nope"), SessionInput::BadSession(":nope"));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(
            SessionInput::parse(":key space"),
            SessionInput::Interact(Interaction::Key(" ".to_string()))
        );
        assert_eq!(
            SessionInput::parse(":key ENTER"),
            SessionInput::Interact(Interaction::Key("Enter".to_string()))
        );
        assert_eq!(
            SessionInput::parse(":key F"),
            SessionInput::Interact(Interaction::Key("F".to_string()))
        );
        assert_eq!(SessionInput::parse(":key"), SessionInput::BadSession(":key"));
    }
}
