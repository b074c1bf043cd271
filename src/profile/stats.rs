use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Identity of a profiled function: source file, first line, name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncKey {
    pub file: String,
    pub line: u32,
    pub name: String,
}

impl FuncKey {
    pub fn new(file: impl Into<String>, line: u32, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            name: name.into(),
        }
    }
}

/// Counters for one caller → callee edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CallerStats {
    #[serde(default)]
    pub calls: u64,
    #[serde(default)]
    pub recursive: u64,
    #[serde(default)]
    pub local: f64,
    #[serde(default)]
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerRecord {
    #[serde(flatten)]
    pub key: FuncKey,
    #[serde(flatten)]
    pub stats: CallerStats,
}

/// One function's profiler counters, as exported from a stats dump.
///
/// `calls` counts primitive (non-recursive) calls, `recursive` all calls.
/// Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    #[serde(flatten)]
    pub key: FuncKey,
    pub calls: u64,
    pub recursive: u64,
    pub local: f64,
    pub cumulative: f64,
    #[serde(default)]
    pub callers: Vec<CallerRecord>,
}

impl StatsRecord {
    /// A record with every counter at zero carries no information.
    pub fn is_null(&self) -> bool {
        self.calls == 0 && self.recursive == 0 && self.local == 0.0 && self.cumulative == 0.0
    }

    pub fn called_by(mut self, caller: FuncKey, stats: CallerStats) -> Self {
        self.callers.push(CallerRecord { key: caller, stats });
        self
    }
}

/// Parse a JSON array of [`StatsRecord`]s.
pub fn parse_stats(text: &str) -> Result<Vec<StatsRecord>, BuildError> {
    serde_json::from_str(text).map_err(|source| BuildError::Malformed {
        line: source.line(),
        source,
    })
}
