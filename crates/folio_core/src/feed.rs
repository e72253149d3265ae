//! Repository feed
//!
//! Fetches the owner's public repositories once, drops forks, orders by most
//! recently updated and pages through them locally. Progress is reported as
//! console lines through the injected [`LogSlot`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{
    FolioError, Result,
    console::{LogSlot, Tone},
    markup::Markup,
};

pub const DEFAULT_PAGE_SIZE: usize = 6;
const NO_DESCRIPTION: &str = "Repository with no description.";
const MAX_TAGS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub fork: bool,
    pub updated_at: DateTime<Utc>,
}

impl Repo {
    /// Name with dashes turned into spaces
    pub fn pretty_name(&self) -> String {
        self.name.replace('-', " ")
    }

    /// Language first, then up to two topics
    pub fn tags(&self) -> Vec<&str> {
        let topics = self.topics.iter().flatten().take(2).map(String::as_str);
        self.language
            .as_deref()
            .into_iter()
            .chain(topics)
            .take(MAX_TAGS)
            .collect()
    }

    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NO_DESCRIPTION,
        }
    }
}

/// Drop forks and sort newest first. Ties keep their input order.
pub fn prepare(repos: Vec<Repo>) -> Vec<Repo> {
    let mut repos: Vec<Repo> = repos.into_iter().filter(|r| !r.fork).collect();
    repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    repos
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Account whose repositories are listed
    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_user() -> String {
    "hitesh-2457".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_user_agent() -> String {
    format!("folio/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            user: default_user(),
            page_size: default_page_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl FeedConfig {
    pub fn url(&self) -> String {
        format!(
            "{}/users/{}/repos",
            self.api_base.trim_end_matches('/'),
            self.user
        )
    }
}

/// Where repositories come from
#[async_trait]
pub trait RepoSource: Send + Sync + fmt::Debug {
    /// Shown in the `Request: GET …` line
    fn url(&self) -> String;

    async fn fetch(&self) -> Result<Vec<Repo>>;
}

/// Unauthenticated GitHub REST listing
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: reqwest::Client,
    url: String,
    user_agent: String,
}

impl GithubSource {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl RepoSource for GithubSource {
    fn url(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<Repo>> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| FolioError::FeedRequestFailed {
                url: self.url.clone(),
                cause: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FolioError::FeedStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FolioError::FeedRequestFailed {
                url: self.url.clone(),
                cause: e,
            })?;

        serde_json::from_slice(&body).map_err(|e| FolioError::feed_decode(&self.url, e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    pub status: FeedStatus,
    pub repos: Vec<Repo>,
    /// How many repos are revealed
    pub shown: usize,
}

#[derive(Clone)]
pub struct RepoFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    source: Arc<dyn RepoSource>,
    log: LogSlot,
    page_size: usize,
    state: watch::Sender<FeedState>,
    generation: AtomicU64,
}

impl RepoFeed {
    pub fn new(source: Arc<dyn RepoSource>, log: LogSlot, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let (state, _) = watch::channel(FeedState {
            status: FeedStatus::Idle,
            repos: Vec::new(),
            shown: page_size,
        });
        Self {
            inner: Arc::new(FeedInner {
                source,
                log,
                page_size,
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn github(config: &FeedConfig, log: LogSlot) -> Self {
        Self::new(Arc::new(GithubSource::new(config)), log, config.page_size)
    }

    /// Initial fetch.
    pub async fn load(&self) {
        info!("loading repositories from {}", self.inner.source.url());
        self.inner
            .log
            .log(Markup::new().verb("Loading GitHub Projects"), Tone::Warn);
        self.request("GitHub Response").await;
    }

    /// Start [`RepoFeed::load`] after yielding once, so whoever is attaching
    /// alongside us (the console) has subscribed to the log slot first.
    pub fn spawn_load(&self) -> JoinHandle<()> {
        let feed = self.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            feed.load().await;
        })
    }

    /// Forget everything and issue the same request again.
    pub async fn retry(&self) {
        let page_size = self.inner.page_size;
        self.inner.state.send_modify(|state| {
            state.repos.clear();
            state.shown = page_size;
        });
        self.request("Response").await;
    }

    async fn request(&self, response_label: &str) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let url = self.inner.source.url();

        self.inner.state.send_modify(|state| state.status = FeedStatus::Loading);
        self.inner.log.log(
            Markup::new()
                .verb("Request")
                .plain(": ")
                .path(format!("GET {}", url)),
            Tone::Warn,
        );

        let result = self.inner.source.fetch().await;

        if self.inner.generation.load(Ordering::SeqCst) != generation {
            debug!("dropping superseded response #{} from {}", generation, url);
            return;
        }

        match result {
            Ok(repos) => {
                let repos = prepare(repos);
                self.inner.log.log(
                    Markup::new()
                        .section(response_label)
                        .plain(": ")
                        .note(format!("{} repositories loaded", repos.len())),
                    Tone::Ok,
                );
                self.inner.state.send_modify(|state| {
                    state.repos = repos;
                    state.status = FeedStatus::Ready;
                });
            }
            Err(e) => {
                error!("Error fetching repositories: {:?}", e);
                self.inner.log.log(
                    Markup::new().error("Error: Unable to fetch projects from GitHub"),
                    Tone::Error,
                );
                self.inner
                    .state
                    .send_modify(|state| state.status = FeedStatus::Failed);
            }
        }
    }

    /// Reveal another page. Never reveals past the end.
    pub fn show_more(&self) {
        let page_size = self.inner.page_size;
        self.inner.state.send_if_modified(|state| {
            let next = (state.shown + page_size).min(state.repos.len().max(page_size));
            let changed = next != state.shown;
            state.shown = next;
            changed
        });
    }

    pub fn visible(&self) -> Vec<Repo> {
        let state = self.inner.state.borrow();
        state.repos.iter().take(state.shown).cloned().collect()
    }

    pub fn has_more(&self) -> bool {
        let state = self.inner.state.borrow();
        state.shown < state.repos.len()
    }

    pub fn status(&self) -> FeedStatus {
        self.inner.state.borrow().status
    }

    pub fn state(&self) -> FeedState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.inner.state.subscribe()
    }

    pub fn page_size(&self) -> usize {
        self.inner.page_size
    }
}

impl fmt::Debug for RepoFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("RepoFeed")
            .field("source", &self.inner.source)
            .field("status", &state.status)
            .field("repos", &state.repos.len())
            .field("shown", &state.shown)
            .finish()
    }
}
