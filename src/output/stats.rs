//! Batch reporting.

use std::path::Path;

use console::style;
use indicatif::ProgressBar;

use crate::download::{BatchObserver, BatchResult, ItemOutcome};
use crate::fs::display_path;
use crate::output::console::print_rule;
use crate::output::progress::create_item_bar;
use crate::scrape::LinkRecord;

/// Print the batch header.
pub fn print_batch_header(total: usize, output_dir: &Path) {
    println!();
    print_rule();
    println!("Starting batch download: {} files", total);
    println!("Output directory: {}", display_path(output_dir));
    print_rule();
}

/// Print the final counts and every failed URL.
pub fn print_batch_summary(result: &BatchResult, output_dir: &Path) {
    println!();
    print_rule();
    println!("{}", style("Download Complete!").bold());
    println!("  Successful: {}", style(result.successful).green());
    println!("  Skipped (already exist): {}", style(result.skipped).yellow());
    if result.failed > 0 {
        println!("  Failed: {}", style(result.failed).red());
    } else {
        println!("  Failed: 0");
    }
    println!("  Total: {}", result.total);
    println!("  Files saved to: {}", display_path(output_dir));
    print_rule();

    if !result.failed_urls.is_empty() {
        println!();
        println!("{}", style("Failed downloads:").red().bold());
        for url in &result.failed_urls {
            println!("  - {}", url);
        }
    }
}

/// Prints one line per finished file above an item progress bar.
pub struct ConsoleObserver {
    bar: ProgressBar,
}

impl ConsoleObserver {
    /// `quiet` hides both the bar and the per-file lines.
    pub fn new(total: usize, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            create_item_bar(total as u64)
        };
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl BatchObserver for ConsoleObserver {
    fn on_start(&mut self, _index: usize, _total: usize, link: &LinkRecord) {
        self.bar.set_message(link.text.clone());
    }

    fn on_finish(
        &mut self,
        index: usize,
        total: usize,
        link: &LinkRecord,
        outcome: &ItemOutcome<'_>,
    ) {
        let prefix = format!("[{}/{}]", index + 1, total);
        let line = match outcome {
            ItemOutcome::Downloaded(path) => format!(
                "{} {} Downloaded: {}",
                prefix,
                style("✓").green(),
                file_name(path)
            ),
            ItemOutcome::Skipped(path) => format!(
                "{} {} Skipped (exists): {}",
                prefix,
                style("✓").yellow(),
                file_name(path)
            ),
            ItemOutcome::Failed(err) => format!(
                "{} {} Failed: {} ({})",
                prefix,
                style("✗").red(),
                link.url,
                err
            ),
        };
        self.bar.println(line);
        self.bar.inc(1);
    }
}
