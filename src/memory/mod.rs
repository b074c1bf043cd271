//! Memory dumps turned into square-map trees.
//!
//! Each object's box holds the objects it references. Reference cycles are
//! broken during the build, and objects with several referrers appear under
//! each of them with a share of their size.

pub mod adapter;
pub mod graph;
pub mod record;

pub use adapter::MemoryAdapter;
pub use graph::{MemoryGraph, MemoryObject, ObjId};
pub use record::{load_dump, parse_dump, ObjectRecord};
