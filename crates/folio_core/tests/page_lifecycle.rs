//! Integration tests for mounting the whole portfolio
//!
//! These run the composition root against fixture files on disk and a canned
//! repository source, and check that sections, console and feed cooperate.

use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{
    AssetSource, FeedStatus, FolioConfig, Portfolio, Repo, RepoSource, Result, Tone,
    console::PanelState,
};
use pretty_assertions::assert_eq;

#[derive(Debug)]
struct CannedSource(Vec<Repo>);

#[async_trait]
impl RepoSource for CannedSource {
    fn url(&self) -> String {
        "https://example.test/users/ada/repos".to_string()
    }

    async fn fetch(&self) -> Result<Vec<Repo>> {
        Ok(self.0.clone())
    }
}

fn repo(id: u64, name: &str, fork: bool) -> Repo {
    Repo {
        id,
        name: name.to_string(),
        html_url: format!("https://github.com/ada/{}", name),
        description: None,
        language: Some("Rust".to_string()),
        topics: None,
        fork,
        updated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
    }
}

const EXPERIENCE: &str = r#"[
    {"id": 1, "title": "Engineer", "company": "Acme", "period": "Jan 2018 – Jan 2021",
     "marker": "A", "category": "work"},
    {"id": 2, "title": "Student", "company": "Uni", "period": "Jan 2014 – Jan 2018",
     "marker": "U", "category": "education"}
]"#;

const ABOUT: &str = r#"[{"id": 1, "title": "Hello", "items": ["one", "two"]}]"#;

async fn portfolio(dir: &tempfile::TempDir) -> Portfolio {
    tokio::fs::write(dir.path().join("experience.json"), EXPERIENCE)
        .await
        .unwrap();
    tokio::fs::write(dir.path().join("about.json"), ABOUT)
        .await
        .unwrap();

    let mut config = FolioConfig::default();
    config.site.assets = AssetSource::Directory {
        path: dir.path().to_path_buf(),
    };
    let source = Arc::new(CannedSource(vec![
        repo(1, "mine", false),
        repo(2, "someone-elses", true),
    ]));
    Portfolio::with_source(config, source)
}

#[tokio::test]
async fn test_start_registers_sections_in_page_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut portfolio = portfolio(&dir).await;

    portfolio.start(1280).await;
    assert!(portfolio.page().is_mounted());
    assert_eq!(
        portfolio.navigation().ids(),
        vec!["home", "about", "experience", "projects", "contact"]
    );
    assert_eq!(portfolio.page().home.years(), Some(3));
    assert_eq!(portfolio.page().about.cards().len(), 1);
    assert_eq!(portfolio.page().experience.entries().len(), 2);
    assert_eq!(portfolio.page().contact.links().len(), 3);
    assert_eq!(portfolio.console().panel(), PanelState::Expanded);

    portfolio.shutdown().await;
    assert!(portfolio.navigation().items().is_empty());
    assert!(!portfolio.log().has_subscriber());
    assert_eq!(portfolio.console().panel(), PanelState::Hidden);
}

#[tokio::test]
async fn test_feed_lines_reach_the_console() {
    let dir = tempfile::tempdir().unwrap();
    let mut portfolio = portfolio(&dir).await;

    portfolio.start(1280).await;
    portfolio.page_mut().projects.loaded().await;

    assert_eq!(portfolio.feed().status(), FeedStatus::Ready);
    assert_eq!(portfolio.feed().visible().len(), 1);

    let lines: Vec<(Tone, String)> = portfolio
        .console()
        .lines()
        .into_iter()
        .map(|line| (line.tone, line.text.plain_text()))
        .collect();
    assert_eq!(lines[0], (Tone::Muted, "Booting client…".to_string()));
    assert!(lines.contains(&(Tone::Warn, "Loading GitHub Projects".to_string())));
    assert!(lines.contains(&(
        Tone::Ok,
        "GitHub Response: 1 repositories loaded".to_string()
    )));

    portfolio.shutdown().await;
}

#[tokio::test]
async fn test_console_navigates_to_mounted_sections() {
    let dir = tempfile::tempdir().unwrap();
    let mut portfolio = portfolio(&dir).await;
    portfolio.start(1280).await;

    portfolio.console().handle_command("contact");
    assert_eq!(
        portfolio.navigation().scroll_target().as_deref(),
        Some("contact")
    );

    portfolio.shutdown().await;
    portfolio.console().handle_command("contact");
    let last = portfolio.console().lines().pop().unwrap();
    assert_eq!(last.tone, Tone::Error);
    assert_eq!(last.text.plain_text(), "Section contact not found");
}

#[tokio::test]
async fn test_missing_fixtures_degrade_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = FolioConfig::default();
    config.site.assets = AssetSource::Directory {
        path: dir.path().join("nowhere"),
    };
    let mut portfolio = Portfolio::with_source(config, Arc::new(CannedSource(Vec::new())));

    portfolio.start(1280).await;
    assert_eq!(portfolio.page().home.years(), Some(0));
    assert!(portfolio.page().about.cards().is_empty());
    portfolio.shutdown().await;
}

#[tokio::test]
async fn test_narrow_viewport_still_logs() {
    let dir = tempfile::tempdir().unwrap();
    let mut portfolio = portfolio(&dir).await;

    portfolio.start(400).await;
    portfolio.page_mut().projects.loaded().await;
    assert_eq!(portfolio.console().panel(), PanelState::Hidden);
    assert!(portfolio.console().lines().len() >= 4);

    portfolio.shutdown().await;
}
