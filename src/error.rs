use std::path::PathBuf;

use thiserror::Error;

/// Precondition violations reported by an adapter during layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("adapter returned invalid weight {weight} for '{label}'")]
    InvalidWeight { label: String, weight: f64 },

    #[error("adapter returned empty fraction {fraction} for '{label}', expected 0..=1")]
    InvalidEmpty { label: String, fraction: f64 },
}

/// Failures while turning raw records into a node graph.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no usable records to build a tree from")]
    NoRows,

    #[error("malformed record on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
