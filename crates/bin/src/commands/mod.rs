//! CLI subcommand implementations.

pub(crate) mod canonical;
pub(crate) mod inspect;
pub(crate) mod reconcile;
pub(crate) mod survey;

use indicatif::{ProgressBar, ProgressStyle};

/// Standard progress bar for batch loops over filings.
pub(crate) fn filing_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb
}
