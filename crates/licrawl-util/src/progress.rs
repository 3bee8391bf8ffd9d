use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

fn emit(style: Style, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{:>12} {message}", style.apply_to(label));
}

/// Stderr line with a green label right-aligned to 12 columns: `    Licensed 42 modules`.
pub fn status(label: &str, message: &str) {
    emit(Style::new().green().bold(), label, message);
}

/// Cyan variant of [`status`] for counts and other facts.
pub fn status_info(label: &str, message: &str) {
    emit(Style::new().cyan().bold(), label, message);
}

pub fn status_warn(label: &str, message: &str) {
    emit(Style::new().yellow().bold(), label, message);
}

/// Ticking spinner for work of unknown length, such as closure resolution.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Counts gathered over one licensing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LicenseTally {
    pub total: usize,
    /// Served from the module cache.
    pub cached: usize,
    /// Fetched into the scratch directory.
    pub cloned: usize,
    /// Rows left for manual review.
    pub failed: usize,
}

impl LicenseTally {
    /// Print the closing summary lines.
    pub fn report(&self) {
        status(
            "Licensed",
            &format!(
                "{} modules, {} from the module cache, {} cloned",
                self.total, self.cached, self.cloned
            ),
        );
        if self.failed > 0 {
            status_warn("Warning", &format!("{} modules need manual review", self.failed));
        }
    }
}

/// Progress bar for a licensing run, shared across workers.
///
/// The bar shows the last finished module and keeps cached, cloned and
/// failed counts for [`LicenseProgress::finish`].
pub struct LicenseProgress {
    bar: ProgressBar,
    cached: AtomicUsize,
    cloned: AtomicUsize,
    failed: AtomicUsize,
}

impl LicenseProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{msg:40!} [{bar:30.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self {
            bar,
            cached: AtomicUsize::new(0),
            cloned: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Record one finished module, labelled `path@version`.
    pub fn record(&self, module: &str, cached: bool, failed: bool) {
        let counter = if cached { &self.cached } else { &self.cloned };
        counter.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.bar.set_message(module.to_string());
        self.bar.inc(1);
    }

    /// Clear the bar and hand back the counts.
    pub fn finish(&self) -> LicenseTally {
        self.bar.finish_and_clear();
        let cached = self.cached.load(Ordering::Relaxed);
        let cloned = self.cloned.load(Ordering::Relaxed);
        LicenseTally {
            total: cached + cloned,
            cached,
            cloned,
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
