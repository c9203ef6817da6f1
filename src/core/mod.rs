//! Translation pipeline.
//!
//! ## Module Structure
//!
//! - `properties`: `.properties` text codec
//! - `bundle`: ordered bundles, loading and replace-on-write saving
//! - `protect`: no-translate span shielding
//! - `cache`: fingerprinted per (bundle, language) translation cache
//! - `batch`: provider requests under a size budget
//! - `job`: the per (bundle, language) state machine
//! - `scanner`, `plan`, `runner`: discovery, job planning and parallel execution

pub mod batch;
pub mod bundle;
pub mod cache;
pub mod job;
pub mod plan;
pub mod properties;
pub mod protect;
pub mod runner;
pub mod scanner;

pub use bundle::{Bundle, BundleRole, StorageError};
pub use job::{JobError, JobReport, JobSettings, JobSpec, JobState, TranslationJob};
pub use protect::PatternProtector;
pub use runner::{RunMode, RunOptions, RunSummary, run_jobs};
