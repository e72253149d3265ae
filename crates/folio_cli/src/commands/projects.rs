use std::sync::Arc;

use folio_core::{
    FeedStatus, FolioConfig, LogLine, LogSink, LogSlot, Markup, Repo, RepoFeed, Tone,
};
use miette::Result;
use owo_colors::OwoColorize;

use crate::output::Output;

/// Prints feed progress lines as they are published
struct PrintSink {
    output: Output,
}

impl LogSink for PrintSink {
    fn log(&self, text: Markup, tone: Tone) {
        self.output.log_line(&LogLine::new(text, tone));
    }
}

/// Fetch the repository feed and print the first page, or everything.
pub async fn list(config: &FolioConfig, all: bool) -> Result<()> {
    let output = Output::new();
    let log = LogSlot::new();
    let _subscription = log.subscribe(Arc::new(PrintSink {
        output: output.clone(),
    }));

    let feed = RepoFeed::github(&config.feed, log);
    feed.load().await;

    if feed.status() == FeedStatus::Failed {
        output.error("Could not load projects");
        return Ok(());
    }

    if all {
        let total = feed.state().repos.len();
        for _ in 0..total {
            if !feed.has_more() {
                break;
            }
            feed.show_more();
        }
    }

    output.section("Projects");
    let visible = feed.visible();
    if visible.is_empty() {
        output.status("No public repositories");
        return Ok(());
    }
    print_repos(&output, &visible);

    let total = feed.state().repos.len();
    if feed.has_more() {
        output.print("");
        output.status(&format!(
            "Showing {} of {}; pass --all to list everything",
            visible.len(),
            total
        ));
    }

    Ok(())
}

pub fn print_repos(output: &Output, repos: &[Repo]) {
    for repo in repos {
        output.print("");
        output.print(&format!("  {}", repo.pretty_name().bright_white().bold()));
        output.print(&format!("    {}", repo.description_or_default().dimmed()));
        let tags = repo.tags();
        if !tags.is_empty() {
            output.print(&format!("    {}", tags.join(" · ").bright_cyan()));
        }
        output.print(&format!("    {}", repo.html_url.blue()));
    }
}
