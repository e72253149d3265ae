//! Folio Core - portfolio behavior without the rendering
//!
//! This crate owns everything the portfolio does apart from drawing it:
//! the navigation registry, the typed-role hero, experience aggregation,
//! the mascot, the simulated console and the repository feed.

pub mod config;
pub mod console;
pub mod error;
pub mod experience;
pub mod feed;
pub mod fixtures;
pub mod markup;
pub mod mascot;
pub mod navigation;
pub mod portfolio;
pub mod sections;
pub mod timer;
pub mod typing;

pub use config::FolioConfig;
pub use console::{Console, ConsoleConfig, LogLine, LogSink, LogSlot, PanelState, Tone};
pub use error::{FolioError, Result};
pub use experience::{AboutCard, Experience, ExperienceCategory, experience_years};
pub use feed::{FeedConfig, FeedStatus, GithubSource, Repo, RepoFeed, RepoSource};
pub use fixtures::{AssetSource, FixtureStore};
pub use markup::{Markup, SpanStyle};
pub use mascot::{Interaction, Mascot, MascotState, Mood};
pub use navigation::{NavItem, NavigationRegistry};
pub use portfolio::Portfolio;
pub use sections::{Page, PageContext, Section};
pub use timer::Timer;
pub use typing::{TypingConfig, TypingDriver, TypingEffect};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        AssetSource, Console, FolioConfig, FolioError, Interaction, LogSlot, Markup, Mood,
        NavItem, NavigationRegistry, Portfolio, Repo, RepoFeed, RepoSource, Result, Section,
        Tone, TypingConfig, TypingEffect,
    };
}
