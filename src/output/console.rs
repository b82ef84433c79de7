//! Console output utilities.

use std::collections::BTreeMap;

use console::style;

use crate::scrape::link::truncate_chars;
use crate::scrape::LinkRecord;

/// Number of links shown by [`print_preview`].
pub const PREVIEW_LIMIT: usize = 10;

/// Characters of link text shown per preview line.
const PREVIEW_TEXT_LIMIT: usize = 60;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print a horizontal rule.
pub fn print_rule() {
    println!("{}", style("═".repeat(60)).dim());
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     linkgrab                                          ║
║     Find and download files linked from web pages     ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Extension counts ordered by count (descending), then by extension.
pub fn sorted_statistics(stats: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut rows: Vec<_> = stats.iter().map(|(ext, n)| (ext.as_str(), *n)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

/// Print the number of links found and the per-extension breakdown.
pub fn print_statistics(total: usize, stats: &BTreeMap<String, usize>) {
    println!();
    print_rule();
    println!(
        "{}",
        style(format!("Found {} downloadable files", total)).bold()
    );
    println!();
    println!("File types:");
    for (ext, count) in sorted_statistics(stats) {
        println!("  .{}: {} files", ext, style(count).green());
    }
    print_rule();
}

/// Print the first [`PREVIEW_LIMIT`] links.
pub fn print_preview(links: &[LinkRecord]) {
    println!();
    println!("{}", style("Preview of files to download:").bold());
    for (i, link) in links.iter().take(PREVIEW_LIMIT).enumerate() {
        println!(
            "{:>3}. [{}] {}",
            i + 1,
            style(link.extension.to_uppercase()).cyan(),
            truncate_chars(&link.text, PREVIEW_TEXT_LIMIT)
        );
    }
    if links.len() > PREVIEW_LIMIT {
        println!("     ... and {} more", links.len() - PREVIEW_LIMIT);
    }
    print_rule();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_sorted_by_count() {
        let stats: BTreeMap<String, usize> = [("zip", 1), ("pdf", 5), ("csv", 1), ("doc", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        assert_eq!(
            sorted_statistics(&stats),
            vec![("pdf", 5), ("doc", 3), ("csv", 1), ("zip", 1)]
        );
    }
}
