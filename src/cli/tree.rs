//! Tree command implementation.
//!
//! Reads a flat JSON array of path-keyed records and prints the
//! reassembled trees.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::ContentPath;
use crate::tree::{HasPath, ListToTreeConverter, MissingParentPolicy};

/// A record with a path and arbitrary scalar fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatRecord {
    pub path: ContentPath,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HasPath for FlatRecord {
    fn path(&self) -> &ContentPath {
        &self.path
    }
}

pub fn run_tree(input: Option<&Path>, promote_orphans: bool) -> Result<()> {
    let content = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let records: Vec<FlatRecord> =
        serde_json::from_str(&content).context("input must be a JSON array of {path, ...} records")?;

    let policy = if promote_orphans {
        MissingParentPolicy::PromoteToRoot
    } else {
        MissingParentPolicy::Drop
    };

    let tree = ListToTreeConverter::new(policy).convert(records);
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_record_round_trip() {
        let json = r#"[{"path": "/", "a": 0}, {"path": "/a", "a": 1}]"#;
        let records: Vec<FlatRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, "/");
        assert_eq!(records[1].extra["a"], 1);

        let tree = ListToTreeConverter::new(MissingParentPolicy::Drop).convert(records);
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value[0]["path"], "/");
        assert_eq!(value[0]["children"][0]["a"], 1);
    }
}
