//! Static biography fixtures
//!
//! `experience.json` and `about.json` are loaded at most once per store and
//! kept for the life of the process. A failed load is logged and remembered as
//! an empty list, so the page degrades instead of erroring.

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, error};

use crate::{
    FolioError, Result,
    experience::{AboutCard, Experience},
};

pub const EXPERIENCE_FILE: &str = "experience.json";
pub const ABOUT_FILE: &str = "about.json";

/// Where fixture files are read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetSource {
    /// A local directory holding the JSON files
    Directory { path: PathBuf },
    /// A deployed site; files are fetched from `<base>/assets/<file>`
    Url { base: String },
}

impl Default for AssetSource {
    fn default() -> Self {
        AssetSource::Directory {
            path: PathBuf::from("assets"),
        }
    }
}

impl AssetSource {
    /// Human-readable location of `file`
    pub fn location(&self, file: &str) -> String {
        match self {
            AssetSource::Directory { path } => path.join(file).display().to_string(),
            AssetSource::Url { base } => {
                format!("{}/assets/{}", base.trim_end_matches('/'), file)
            }
        }
    }
}

#[derive(Debug)]
pub struct FixtureStore {
    source: AssetSource,
    client: reqwest::Client,
    experiences: OnceCell<Arc<Vec<Experience>>>,
    about_cards: OnceCell<Arc<Vec<AboutCard>>>,
}

impl FixtureStore {
    pub fn new(source: AssetSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
            experiences: OnceCell::new(),
            about_cards: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    /// Work, education and patent entries. Empty if the fixture is missing or
    /// malformed.
    pub async fn experiences(&self) -> Arc<Vec<Experience>> {
        self.experiences
            .get_or_init(|| async {
                Arc::new(self.load_or_empty::<Experience>(EXPERIENCE_FILE, "experiences").await)
            })
            .await
            .clone()
    }

    /// Cards for the about section. Empty if the fixture is missing or
    /// malformed.
    pub async fn about_cards(&self) -> Arc<Vec<AboutCard>> {
        self.about_cards
            .get_or_init(|| async {
                Arc::new(self.load_or_empty::<AboutCard>(ABOUT_FILE, "about cards").await)
            })
            .await
            .clone()
    }

    async fn load_or_empty<T: DeserializeOwned>(&self, file: &str, what: &str) -> Vec<T> {
        match self.load::<T>(file, what).await {
            Ok(items) => {
                debug!("loaded {} {} from {}", items.len(), what, self.source.location(file));
                items
            }
            Err(e) => {
                error!("Error loading {}: {:?}", what, e);
                Vec::new()
            }
        }
    }

    /// Fetch and decode one fixture without caching.
    pub async fn load<T: DeserializeOwned>(&self, file: &str, what: &str) -> Result<Vec<T>> {
        let location = self.source.location(file);
        let bytes = match &self.source {
            AssetSource::Directory { path } => tokio::fs::read(path.join(file))
                .await
                .map_err(|e| FolioError::fixture_load(&location, e))?,
            AssetSource::Url { .. } => {
                let response = self
                    .client
                    .get(&location)
                    .send()
                    .await
                    .map_err(|e| FolioError::fixture_load(&location, e))?;
                let response = response
                    .error_for_status()
                    .map_err(|e| FolioError::fixture_load(&location, e))?;
                response
                    .bytes()
                    .await
                    .map_err(|e| FolioError::fixture_load(&location, e))?
                    .to_vec()
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| FolioError::FixtureDecodeFailed {
            location,
            data_type: what.to_string(),
            cause: e,
        })
    }
}
