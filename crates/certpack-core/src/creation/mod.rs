//! Archive building.
//!
//! Packs an ordered list of entries into a DEFLATE zip archive. A failed
//! build never leaves a partial archive behind.

pub mod builder;
pub mod config;
pub mod report;
pub mod zip;

pub use builder::ArchiveBuilder;
pub use config::BuildConfig;
pub use report::BuildReport;
