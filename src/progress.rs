//! Progress reporting for page loading.
//!
//! Trait-based so the loader stays decoupled from display concerns.

use std::sync::Arc;

/// Phase of a load-all operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    /// Foreground fetch of page 1.
    FetchingFirst,
    /// Background prefetch, about to request `current` of `total`.
    Prefetching { current: u32, total: u32 },
    /// Every remaining page has been attempted.
    Complete,
    /// The foreground fetch failed.
    Failed(String),
}

/// Progress reporter trait; implement for different display backends.
pub trait ProgressReporter: Send + Sync {
    fn set_phase(&self, phase: LoadPhase);

    /// Finish and clean up the display.
    fn finish(&self);
}

/// A no-op reporter for when progress display is disabled.
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn set_phase(&self, _phase: LoadPhase) {}
    fn finish(&self) {}
}

/// A simple reporter that just prints to stderr (for non-TTY).
pub struct SimpleReporter;

impl ProgressReporter for SimpleReporter {
    fn set_phase(&self, phase: LoadPhase) {
        match phase {
            LoadPhase::FetchingFirst => eprintln!("Fetching first page..."),
            LoadPhase::Prefetching { current, total } => {
                eprintln!("   fetching page {current}/{total}");
            }
            LoadPhase::Complete => eprintln!("All pages loaded."),
            LoadPhase::Failed(error) => eprintln!("Failed: {error}"),
        }
    }

    fn finish(&self) {}
}

/// Interactive reporter with a progress bar (for TTY).
pub struct FancyReporter {
    bar: indicatif::ProgressBar,
}

impl FancyReporter {
    pub fn new() -> Self {
        let bar = indicatif::ProgressBar::new_spinner();
        bar.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.yellow} {msg}")
                .unwrap(),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }
}

impl Default for FancyReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for FancyReporter {
    fn set_phase(&self, phase: LoadPhase) {
        match phase {
            LoadPhase::FetchingFirst => self.bar.set_message("Fetching first page..."),
            LoadPhase::Prefetching { current, total } => {
                if self.bar.length().is_none() {
                    self.bar.set_style(
                        indicatif::ProgressStyle::default_bar()
                            .template("{bar:40.yellow/blue} {pos}/{len} pages")
                            .unwrap()
                            .progress_chars("█▓▒░  "),
                    );
                    self.bar.set_length(u64::from(total));
                }
                self.bar.set_position(u64::from(current));
            }
            LoadPhase::Complete => self.bar.finish_with_message("All pages loaded."),
            LoadPhase::Failed(error) => self.bar.finish_with_message(format!("Failed: {error}")),
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Create an appropriate reporter based on terminal capabilities.
pub fn create_reporter() -> Arc<dyn ProgressReporter> {
    if console::Term::stderr().is_term() {
        Arc::new(FancyReporter::new())
    } else {
        Arc::new(SimpleReporter)
    }
}
