//! Tubely Media Library
//!
//! Content sniffing and temp-file staging for the upload pipeline. Media
//! types are always determined from content bytes, never from declared
//! headers, and staged uploads are released unconditionally on drop.

pub mod sniff;
pub mod staging;

pub use sniff::{detect_content_type, extension_for};
pub use staging::{StagedUpload, StagingError, StagingSink};
