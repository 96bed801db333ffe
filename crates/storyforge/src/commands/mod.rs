//! CLI subcommands.

pub mod component;
pub mod init;
pub mod template;

use anyhow::Result;
use storyforge_stories::{GenerateError, GenerationOutcome};

/// Log a batch summary and fail if any item failed.
fn report(results: Vec<Result<GenerationOutcome, GenerateError>>) -> Result<()> {
    let total = results.len();
    let mut generated = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for result in results {
        match result {
            Ok(outcome) if outcome.is_generated() => generated += 1,
            Ok(_) => skipped += 1,
            Err(e) => {
                tracing::error!("{}", e);
                failed += 1;
            }
        }
    }

    tracing::info!(
        "{} generated, {} skipped, {} failed",
        generated,
        skipped,
        failed
    );

    if failed > 0 {
        anyhow::bail!("{} of {} stories failed to generate", failed, total);
    }

    Ok(())
}
