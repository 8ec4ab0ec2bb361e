//! Progress bar for the concurrent pull phase

use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::config::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use super::report::{Reporter, SyncEvent};

const PULL_PREFIX: &str = "🔽 pulling";

/// Creates the pull progress bar, drawn to stderr only when `visible`
///
/// The length is set once the number of repositories is known.
pub fn create_pull_progress_bar(visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
    pb.set_style(create_progress_style()?);
    pb.set_prefix(PULL_PREFIX);
    Ok(pb)
}

/// Creates a progress bar style configuration
pub(crate) fn create_progress_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)?
        .progress_chars(PROGRESS_CHARS))
}

/// Hides `progress` while `inner` reports, so log lines never land on the bar
pub struct ProgressReporter<R> {
    inner: R,
    progress: ProgressBar,
}

impl<R> ProgressReporter<R> {
    pub fn new(inner: R, progress: ProgressBar) -> Self {
        Self { inner, progress }
    }
}

impl<R: Reporter> Reporter for ProgressReporter<R> {
    fn report(&self, event: &SyncEvent) {
        self.progress.suspend(|| self.inner.report(event));
    }
}
