use std::sync::Arc;

use tracing::info;

use crate::{
    config::FolioConfig,
    console::{Console, LogSlot},
    feed::{GithubSource, RepoFeed, RepoSource},
    fixtures::FixtureStore,
    navigation::NavigationRegistry,
    sections::{Page, PageContext},
};

/// Composition root: one of everything, wired together
#[derive(Debug)]
pub struct Portfolio {
    config: FolioConfig,
    log: LogSlot,
    navigation: NavigationRegistry,
    console: Console,
    fixtures: Arc<FixtureStore>,
    feed: RepoFeed,
    page: Page,
}

impl Portfolio {
    /// Build against the live GitHub API.
    pub fn new(config: FolioConfig) -> Self {
        let source = Arc::new(GithubSource::new(&config.feed));
        Self::with_source(config, source)
    }

    /// Build with a custom repository source.
    pub fn with_source(config: FolioConfig, source: Arc<dyn RepoSource>) -> Self {
        let log = LogSlot::new();
        let navigation = NavigationRegistry::new();
        let console = Console::new(config.console, navigation.clone());
        let fixtures = Arc::new(FixtureStore::new(config.site.assets.clone()));
        let feed = RepoFeed::new(source, log.clone(), config.feed.page_size);
        let page = Page::from_config(&config);

        Self {
            config,
            log,
            navigation,
            console,
            fixtures,
            feed,
            page,
        }
    }

    pub fn context(&self) -> PageContext {
        PageContext {
            navigation: self.navigation.clone(),
            log: self.log.clone(),
            fixtures: self.fixtures.clone(),
            feed: self.feed.clone(),
        }
    }

    /// Attach the console, then the page. The console must hold the log slot
    /// before any section starts publishing.
    pub async fn start(&mut self, viewport_width: u32) {
        info!("starting portfolio for {}", self.config.site.owner);
        self.console.attach(&self.log, viewport_width);
        let ctx = self.context();
        self.page.mount(&ctx).await;
    }

    /// Detach in reverse order of [`Portfolio::start`].
    pub async fn shutdown(&mut self) {
        let ctx = self.context();
        self.page.unmount(&ctx).await;
        self.console.detach();
        info!("portfolio stopped");
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn log(&self) -> &LogSlot {
        &self.log
    }

    pub fn navigation(&self) -> &NavigationRegistry {
        &self.navigation
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn fixtures(&self) -> &Arc<FixtureStore> {
        &self.fixtures
    }

    pub fn feed(&self) -> &RepoFeed {
        &self.feed
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }
}
