//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Link statistics and previews
//! - Batch progress and summaries

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_error, print_info, print_preview, print_rule, print_statistics,
    print_warning,
};
pub use progress::{create_item_bar, create_spinner};
pub use stats::{print_batch_header, print_batch_summary, ConsoleObserver};
