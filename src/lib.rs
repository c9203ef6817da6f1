//! propbabel - incremental translation of `.properties` resource bundles
//!
//! Source bundles are translated into each configured language through a
//! translation provider. Every translated value is cached together with a
//! fingerprint of its source text, so later runs only send new or changed
//! values. Hand-written override files always win, and no-translate patterns
//! (format placeholders and the like) are shielded from the provider.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Translation pipeline (bundles, cache, batching, jobs)
//! - `provider`: Translation backends

pub mod cli;
pub mod config;
pub mod core;
pub mod provider;
