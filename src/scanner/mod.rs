//! Directory scanning. The only I/O in the crate; it runs before a tree is
//! built and never during layout.

pub mod types;
pub mod walk;

pub use types::{RawFileEntry, ScanProgress};
pub use walk::scan_walkdir;
