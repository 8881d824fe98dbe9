//! Archive extraction.
//!
//! Unpacks a flat zip archive into a directory. A failed extraction removes
//! every file it wrote, so the destination is left as it was found.

mod atomic;
pub mod config;
pub mod extractor;
pub mod report;

pub use config::ExtractConfig;
pub use extractor::ArchiveExtractor;
pub use report::ExtractReport;
