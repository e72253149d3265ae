//! Page sections and their lifecycle
//!
//! A [`Page`] owns its sections and calls `on_attach` in declaration order
//! when mounted and `on_detach` in reverse order when unmounted. Attaching a
//! section registers it for navigation; detaching removes it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    config::{ContactLink, FolioConfig},
    console::LogSlot,
    experience::{AboutCard, Experience, experience_years},
    feed::RepoFeed,
    fixtures::FixtureStore,
    navigation::{NavItem, NavigationRegistry},
    typing::{TypingConfig, TypingDriver, TypingEffect},
};

/// Shared services handed to every section
#[derive(Debug, Clone)]
pub struct PageContext {
    pub navigation: NavigationRegistry,
    pub log: LogSlot,
    pub fixtures: Arc<FixtureStore>,
    pub feed: RepoFeed,
}

#[async_trait]
pub trait Section: Send + Sync {
    fn id(&self) -> &str;

    fn label(&self) -> &str;

    async fn on_attach(&mut self, ctx: &PageContext) {
        ctx.navigation.register(NavItem::new(self.id(), self.label()));
    }

    async fn on_detach(&mut self, ctx: &PageContext) {
        ctx.navigation.unregister(self.id());
    }
}

/// Hero with the typed role line and years of experience
#[derive(Debug)]
pub struct HomeSection {
    owner: String,
    roles: Vec<String>,
    typing: TypingConfig,
    driver: Option<TypingDriver>,
    years: Option<u32>,
}

impl HomeSection {
    pub fn new(owner: impl Into<String>, roles: Vec<String>, typing: TypingConfig) -> Self {
        Self {
            owner: owner.into(),
            roles,
            typing,
            driver: None,
            years: None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The typed role as currently displayed, empty while detached
    pub fn role_text(&self) -> String {
        self.driver
            .as_ref()
            .map(TypingDriver::current)
            .unwrap_or_default()
    }

    pub fn driver(&self) -> Option<&TypingDriver> {
        self.driver.as_ref()
    }

    /// Whole years of work experience, once loaded
    pub fn years(&self) -> Option<u32> {
        self.years
    }
}

#[async_trait]
impl Section for HomeSection {
    fn id(&self) -> &str {
        "home"
    }

    fn label(&self) -> &str {
        "Home"
    }

    async fn on_attach(&mut self, ctx: &PageContext) {
        ctx.navigation.register(NavItem::new(self.id(), self.label()));
        self.driver = Some(TypingDriver::spawn(TypingEffect::new(
            self.roles.clone(),
            self.typing,
        )));
        let experiences = ctx.fixtures.experiences().await;
        let years = experience_years(&experiences);
        debug!("{} years of experience", years);
        self.years = Some(years);
    }

    async fn on_detach(&mut self, ctx: &PageContext) {
        ctx.navigation.unregister(self.id());
        // dropping the driver stops it
        self.driver = None;
    }
}

#[derive(Debug, Default)]
pub struct AboutSection {
    cards: Arc<Vec<AboutCard>>,
}

impl AboutSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[AboutCard] {
        &self.cards
    }
}

#[async_trait]
impl Section for AboutSection {
    fn id(&self) -> &str {
        "about"
    }

    fn label(&self) -> &str {
        "About"
    }

    async fn on_attach(&mut self, ctx: &PageContext) {
        ctx.navigation.register(NavItem::new(self.id(), self.label()));
        self.cards = ctx.fixtures.about_cards().await;
    }
}

#[derive(Debug, Default)]
pub struct ExperienceSection {
    entries: Arc<Vec<Experience>>,
}

impl ExperienceSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Experience] {
        &self.entries
    }
}

#[async_trait]
impl Section for ExperienceSection {
    fn id(&self) -> &str {
        "experience"
    }

    fn label(&self) -> &str {
        "Experience"
    }

    async fn on_attach(&mut self, ctx: &PageContext) {
        ctx.navigation.register(NavItem::new(self.id(), self.label()));
        self.entries = ctx.fixtures.experiences().await;
    }
}

/// Repository grid; starts the feed on attach
#[derive(Debug, Default)]
pub struct ProjectsSection {
    load: Option<JoinHandle<()>>,
}

impl ProjectsSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the initial load started by `on_attach`.
    pub async fn loaded(&mut self) {
        if let Some(load) = self.load.take() {
            let _ = load.await;
        }
    }
}

#[async_trait]
impl Section for ProjectsSection {
    fn id(&self) -> &str {
        "projects"
    }

    fn label(&self) -> &str {
        "Projects"
    }

    async fn on_attach(&mut self, ctx: &PageContext) {
        ctx.navigation.register(NavItem::new(self.id(), self.label()));
        self.load = Some(ctx.feed.spawn_load());
    }

    async fn on_detach(&mut self, ctx: &PageContext) {
        ctx.navigation.unregister(self.id());
        if let Some(load) = self.load.take() {
            load.abort();
        }
    }
}

#[derive(Debug, Default)]
pub struct ContactSection {
    links: Vec<ContactLink>,
}

impl ContactSection {
    pub fn new(links: Vec<ContactLink>) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &[ContactLink] {
        &self.links
    }
}

#[async_trait]
impl Section for ContactSection {
    fn id(&self) -> &str {
        "contact"
    }

    fn label(&self) -> &str {
        "Contact"
    }
}

/// The portfolio's sections, in page order
pub struct Page {
    pub home: HomeSection,
    pub about: AboutSection,
    pub experience: ExperienceSection,
    pub projects: ProjectsSection,
    pub contact: ContactSection,
    mounted: bool,
}

impl Page {
    pub fn from_config(config: &FolioConfig) -> Self {
        Self {
            home: HomeSection::new(
                config.site.owner.clone(),
                config.hero.roles.clone(),
                config.hero.typing,
            ),
            about: AboutSection::new(),
            experience: ExperienceSection::new(),
            projects: ProjectsSection::new(),
            contact: ContactSection::new(config.site.contact.clone()),
            mounted: false,
        }
    }

    fn sections_mut(&mut self) -> [&mut dyn Section; 5] {
        [
            &mut self.home,
            &mut self.about,
            &mut self.experience,
            &mut self.projects,
            &mut self.contact,
        ]
    }

    /// Attach every section in page order. A second call is a no-op.
    pub async fn mount(&mut self, ctx: &PageContext) {
        if self.mounted {
            return;
        }
        for section in self.sections_mut() {
            debug!("attaching section {}", section.id());
            section.on_attach(ctx).await;
        }
        self.mounted = true;
        info!("page mounted");
    }

    /// Detach every section in reverse page order.
    pub async fn unmount(&mut self, ctx: &PageContext) {
        if !self.mounted {
            return;
        }
        for section in self.sections_mut().into_iter().rev() {
            debug!("detaching section {}", section.id());
            section.on_detach(ctx).await;
        }
        self.mounted = false;
        info!("page unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
