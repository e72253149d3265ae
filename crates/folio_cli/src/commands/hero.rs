use std::io::Write;

use folio_core::{
    FixtureStore, FolioConfig, experience_years,
    typing::{Phase, TypingEffect},
};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;

use crate::output::Output;

/// Play the typed role line in place for `cycles` roles.
///
/// One cycle types a role, pauses, deletes it and pauses again.
pub async fn play(config: &FolioConfig, cycles: usize) -> Result<()> {
    let output = Output::new();
    let fixtures = FixtureStore::new(config.site.assets.clone());
    let years = experience_years(&fixtures.experiences().await);

    output.section(&format!("Hi, I'm {}", config.site.owner));
    output.kv("Experience", &format!("{}+ years", years));
    output.print("");

    let effect = TypingEffect::new(config.hero.roles.clone(), config.hero.typing);
    if effect.roles().is_empty() {
        output.warning("No roles configured");
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    let mut completed = 0;
    for frame in effect {
        tokio::time::sleep(frame.delay).await;
        write!(stdout, "\r\x1b[K  {}{}", frame.text.bright_white().bold(), "▌".dimmed())
            .into_diagnostic()?;
        stdout.flush().into_diagnostic()?;

        if frame.phase == Phase::PausedEmpty {
            completed += 1;
            if completed >= cycles {
                break;
            }
        }
    }
    writeln!(stdout).into_diagnostic()?;

    Ok(())
}
