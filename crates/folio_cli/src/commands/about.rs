use folio_core::{FixtureStore, FolioConfig};
use miette::Result;

use crate::output::Output;

pub async fn show(config: &FolioConfig) -> Result<()> {
    let output = Output::new();
    let fixtures = FixtureStore::new(config.site.assets.clone());
    let cards = fixtures.about_cards().await;

    if cards.is_empty() {
        output.warning("No about cards found");
        return Ok(());
    }

    for card in cards.iter() {
        output.section(&card.title);
        for item in &card.items {
            output.list_item(item);
        }
    }

    Ok(())
}
