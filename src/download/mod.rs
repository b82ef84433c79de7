//! Download module for fetching matched files.
//!
//! This module provides:
//! - Single file downloads with skip-if-exists and partial file cleanup
//! - Sequential, rate-limited batch downloads with exact accounting

pub mod batch;
pub mod file;

pub use batch::{BatchObserver, BatchResult, ItemOutcome, NoopObserver};
pub use file::{FileDownloader, FileOutcome};
