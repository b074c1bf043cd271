use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// One object from a memory dump.
///
/// Dumps are JSON lines, one object per line. `refs` lists the addresses
/// this object points at; `total_size` may be precomputed by the dumper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub address: u64,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    pub size: u64,
    #[serde(default)]
    pub total_size: Option<u64>,
    #[serde(default)]
    pub refs: Vec<u64>,
}

impl ObjectRecord {
    pub fn new(address: u64, type_name: &str, size: u64) -> Self {
        Self {
            address,
            type_name: type_name.to_string(),
            name: None,
            value: None,
            module: None,
            size,
            total_size: None,
            refs: Vec::new(),
        }
    }

    pub fn with_refs(mut self, refs: &[u64]) -> Self {
        self.refs = refs.to_vec();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// Parse a dump given as text.
///
/// Blank lines are skipped. A dump wrapped as one JSON list (a `[` line,
/// objects with trailing commas, a `]` line) is accepted too.
pub fn parse_dump(text: &str) -> Result<Vec<ObjectRecord>, BuildError> {
    let mut records = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line == "[" || line == "]" {
            continue;
        }
        let line = line.strip_suffix(',').unwrap_or(line);
        let record = serde_json::from_str(line).map_err(|source| BuildError::Malformed { line: i + 1, source })?;
        records.push(record);
    }
    Ok(records)
}

/// Read and parse a dump file.
pub fn load_dump(path: &Path) -> Result<Vec<ObjectRecord>, BuildError> {
    let text = fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_dump(&text)?;
    tracing::info!("Loaded {} objects from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_lines() {
        let text = r#"
{"address": 1, "type": "dict", "size": 140, "refs": [2, 3]}
{"address": 2, "type": "str", "size": 40, "value": "hello"}

{"address": 3, "type": "type", "name": "Widget", "size": 900, "total_size": 1200}
"#;
        let records = parse_dump(text).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].refs, vec![2, 3]);
        assert_eq!(records[1].value.as_deref(), Some("hello"));
        assert_eq!(records[2].type_name, "type");
        assert_eq!(records[2].total_size, Some(1200));
        assert!(records[1].refs.is_empty());
    }

    #[test]
    fn accepts_list_wrapped_dumps() {
        let text = "[\n{\"address\": 1, \"type\": \"int\", \"size\": 24},\n{\"address\": 2, \"type\": \"int\", \"size\": 24}\n]\n";
        assert_eq!(parse_dump(text).unwrap().len(), 2);
    }

    #[test]
    fn reports_the_bad_line() {
        let text = "{\"address\": 1, \"type\": \"int\", \"size\": 24}\n{\"address\": \"x\"}\n";
        match parse_dump(text) {
            Err(BuildError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_dump(Path::new("/nonexistent/dump.jsonl")).unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }
}
