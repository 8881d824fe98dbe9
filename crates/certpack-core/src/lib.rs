//! Directory listing, lock filtering and all-or-nothing zip packaging for
//! inbound bank certificate files.
//!
//! A typical lifecycle lists a directory into an [`EntryContainer`], keeps the
//! entries that are [ready](EntryContainer::ready) (unlocked and valid), packs
//! them with an [`ArchiveBuilder`] and later unpacks the archive elsewhere with
//! an [`ArchiveExtractor`]. Builds and extractions either complete or leave
//! nothing behind.
//!
//! # Examples
//!
//! ```no_run
//! use certpack_core::ArchiveBuilder;
//! use certpack_core::ArchiveExtractor;
//! use certpack_core::EntryContainer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let inbox = EntryContainer::certificates("/var/spool/certs")?;
//! let built = ArchiveBuilder::new("/var/spool/outbox", "batch.zip")
//!     .delete_sources(true)
//!     .build(inbox.ready())?;
//! println!("{}", built.message());
//!
//! let unpacked = ArchiveExtractor::new("/var/spool/outbox", "batch.zip", "/srv/certs")
//!     .extract()?;
//! println!("Extracted {} files", unpacked.files_extracted());
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! Operations emit [`tracing`] events: `error` where a failure is detected,
//! `info` on success and `debug` per file. Install a subscriber to see them.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod container;
pub mod creation;
pub mod entry;
pub mod error;
pub mod extraction;
pub mod lock;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use container::EntryContainer;
pub use creation::ArchiveBuilder;
pub use creation::BuildConfig;
pub use creation::BuildReport;
pub use entry::CertificateName;
pub use entry::CertificateState;
pub use entry::Entry;
pub use entry::EntryFactory;
pub use entry::EntryKind;
pub use error::ArchiveError;
pub use error::Result;
pub use error::ValidationError;
pub use extraction::ArchiveExtractor;
pub use extraction::ExtractConfig;
pub use extraction::ExtractReport;
pub use lock::LockProbe;
