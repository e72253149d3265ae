use folio_core::{FixtureStore, FolioConfig, experience::group_by_category, experience_years};
use miette::Result;
use owo_colors::OwoColorize;

use crate::output::Output;

/// Print the timeline grouped by category, then total years of work.
pub async fn show(config: &FolioConfig) -> Result<()> {
    let output = Output::new();
    let fixtures = FixtureStore::new(config.site.assets.clone());
    let experiences = fixtures.experiences().await;

    if experiences.is_empty() {
        output.warning("No experience entries found");
        return Ok(());
    }

    for (category, entries) in group_by_category(&experiences) {
        output.section(category.label());
        for entry in entries {
            output.list_item(&format!(
                "{} {} {}",
                entry.title.bright_white(),
                format!("@ {}", entry.company).dimmed(),
                format!("({})", entry.period).dimmed()
            ));
        }
    }

    output.print("");
    output.kv("Experience", &format!("{}+ years", experience_years(&experiences)));

    Ok(())
}
