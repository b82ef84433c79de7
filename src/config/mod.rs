//! Configuration module for linkgrab.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Pagination mode selection
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, DownloadConfig, PaginationConfig, ScraperConfig, ServerConfig};
pub use modes::PaginationMode;
pub use validation::{validate_config, validate_url};
