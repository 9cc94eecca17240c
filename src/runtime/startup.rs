use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::config;
use crate::controller::PlaybackController;
use crate::library::load_book;

use super::event_loop::RUNTIME_LOG_TARGET;

/// Push the configured volume to the engine and load the book named on the
/// command line, if any.
pub(super) fn apply_startup(
    controller: &mut PlaybackController,
    settings: &config::Settings,
    book_dir: Option<&Path>,
) -> anyhow::Result<()> {
    controller.set_volume(settings.engine.initial_volume);

    if let Some(dir) = book_dir {
        info!(target: RUNTIME_LOG_TARGET, "loading {}", dir.display());
        let book = load_book(dir, &settings.library)
            .with_context(|| format!("failed to load book from {}", dir.display()))?;
        controller.load(book);
    }

    Ok(())
}
