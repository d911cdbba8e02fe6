//! Progress bar for the lookup phase.

use bibchex_core::resolver::LookupProgress;
use indicatif::{ProgressBar, ProgressStyle};

/// Creates the lookup bar, or a hidden one when output is not interactive.
pub(crate) fn lookup_bar(visible: bool, total: usize) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(progress_message(&LookupProgress {
        done: 0,
        total,
        errors: 0,
    }));
    bar
}

pub(crate) fn update(bar: &ProgressBar, progress: &LookupProgress) {
    bar.set_position(progress.done as u64);
    bar.set_message(progress_message(progress));
}

fn progress_message(progress: &LookupProgress) -> String {
    format!(
        "Done {} of {} (errors = {})",
        progress.done, progress.total, progress.errors
    )
}
