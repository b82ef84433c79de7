//! Background download jobs for the web API.
//!
//! - [`JobRegistry`]: shared table of jobs, safe to poll while workers run
//! - [`JobRunner`]: bounded pool that executes jobs on the runtime
//! - [`archive`]: ZIP export of completed jobs

pub mod archive;
pub mod job;
pub mod registry;
pub mod runner;

pub use archive::{archive_job, archive_name, build_zip};
pub use job::{DownloadJob, JobSnapshot, JobStatus};
pub use registry::JobRegistry;
pub use runner::{JobRunner, SubmittedJob};
