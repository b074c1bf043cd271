//! Profiler call records turned into square-map trees.
//!
//! A [`ProfileTree`] holds two views over the same rows: the call tree
//! (who called whom, weighted by cumulative time) and the location tree
//! (rows grouped by directory and source file, weighted by local time).

pub mod adapter;
pub mod calltree;
mod location;
pub mod stats;

pub use adapter::ProfileAdapter;
pub use calltree::{NodeId, NodeKind, ProfileNode, ProfileTree};
pub use stats::{parse_stats, CallerRecord, CallerStats, FuncKey, StatsRecord};

/// Which hierarchy of a profile is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileView {
    /// Caller → callee nesting.
    #[default]
    Calls,
    /// Directory → file → function nesting.
    Files,
}
