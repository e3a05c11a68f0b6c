//! Call graph document.
//!
//! In-memory form of `call_graph.json`: a table of functions keyed by name,
//! each recording the file it lives in and the names it calls.

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Top-level document as written by the call graph generator.
///
/// Only `functions` shapes the graph. The other fields are metadata: a value
/// of the wrong shape reads as absent, and malformed relationships are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct CallGraphDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub repository: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_functions: Option<usize>,
    pub functions: FunctionTable,
    #[serde(default, deserialize_with = "lenient_list")]
    pub call_relationships: Vec<CallRelationship>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring malformed metadata field");
        T::default()
    }))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(found = %other, "ignoring metadata list that is not an array");
            Vec::new()
        }
    };
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        tracing::warn!(skipped = total - kept.len(), "skipped malformed metadata entries");
    }
    Ok(kept)
}

/// One function entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionRecord {
    #[serde(default)]
    pub name: Option<String>,
    pub file: String,
    #[serde(default)]
    pub line: Option<u32>,
    pub calls: Vec<String>,
}

/// Flattened caller -> callee pair recorded by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallRelationship {
    pub caller: String,
    pub callee: String,
    #[serde(default)]
    pub caller_file: Option<String>,
}

/// Function table that keeps the key order of the source text.
///
/// A duplicated key keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionTable {
    entries: Vec<(String, FunctionRecord)>,
}

impl FunctionTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FunctionRecord> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionRecord)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Distinct `file` values with their function counts, in order of first appearance.
    pub fn files(&self) -> Vec<(String, usize)> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut out: Vec<(String, usize)> = Vec::new();
        for (_, record) in &self.entries {
            match positions.get(record.file.as_str()) {
                Some(&pos) => out[pos].1 += 1,
                None => {
                    positions.insert(record.file.as_str(), out.len());
                    out.push((record.file.clone(), 1));
                }
            }
        }
        out
    }

    fn insert(&mut self, positions: &mut HashMap<String, usize>, name: String, record: FunctionRecord) {
        match positions.get(&name) {
            Some(&pos) => self.entries[pos].1 = record,
            None => {
                positions.insert(name.clone(), self.entries.len());
                self.entries.push((name, record));
            }
        }
    }
}

impl FromIterator<(String, FunctionRecord)> for FunctionTable {
    fn from_iter<I: IntoIterator<Item = (String, FunctionRecord)>>(iter: I) -> Self {
        let mut table = FunctionTable::default();
        let mut positions = HashMap::new();
        for (name, record) in iter {
            table.insert(&mut positions, name, record);
        }
        table
    }
}

impl<'de> Deserialize<'de> for FunctionTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = FunctionTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping function names to records")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = FunctionTable {
                    entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
                };
                let mut positions = HashMap::new();
                while let Some((name, record)) = access.next_entry::<String, FunctionRecord>()? {
                    table.insert(&mut positions, name, record);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "repository": "https://example.com/repo.git",
        "total_functions": 3,
        "functions": {
            "zeta": {"name": "zeta", "file": "ingestion.py", "line": 3, "calls": ["alpha"]},
            "alpha": {"name": "alpha", "file": "ingestion.py", "line": 10, "calls": []},
            "mid": {"file": "utils.py", "calls": ["print"]}
        },
        "call_relationships": [
            {"caller": "zeta", "callee": "alpha", "caller_file": "ingestion.py"}
        ]
    }"#;

    #[test]
    fn test_preserves_source_order() {
        let doc: CallGraphDocument = serde_json::from_str(SAMPLE).unwrap();
        let names: Vec<&str> = doc.functions.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(doc.total_functions, Some(3));
        assert_eq!(doc.call_relationships.len(), 1);
    }

    #[test]
    fn test_optional_fields_default() {
        let doc: CallGraphDocument =
            serde_json::from_str(r#"{"functions": {"f": {"file": "a.py", "calls": []}}}"#).unwrap();
        assert!(doc.repository.is_none());
        assert!(doc.call_relationships.is_empty());
        let f = doc.functions.get("f").unwrap();
        assert_eq!(f.line, None);
        assert_eq!(f.name, None);
    }

    #[test]
    fn test_duplicate_key_keeps_first_position_last_value() {
        let doc: CallGraphDocument = serde_json::from_str(
            r#"{"functions": {
                "a": {"file": "x.py", "calls": []},
                "b": {"file": "x.py", "calls": []},
                "a": {"file": "y.py", "calls": ["b"]}
            }}"#,
        )
        .unwrap();
        assert_eq!(doc.functions.len(), 2);
        let (first, record) = doc.functions.iter().next().unwrap();
        assert_eq!(first, "a");
        assert_eq!(record.file, "y.py");
    }

    #[test]
    fn test_malformed_metadata_is_ignored() {
        let doc: CallGraphDocument = serde_json::from_str(
            r#"{
                "repository": 7,
                "total_functions": "2",
                "functions": {"f": {"file": "a.py", "calls": ["g"]}},
                "call_relationships": [
                    {"caller": "a"},
                    {"caller": "f", "callee": "g"},
                    "f -> g"
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.repository, None);
        assert_eq!(doc.total_functions, None);
        assert_eq!(doc.functions.len(), 1);
        assert_eq!(
            doc.call_relationships,
            vec![CallRelationship {
                caller: "f".to_string(),
                callee: "g".to_string(),
                caller_file: None,
            }]
        );
    }

    #[test]
    fn test_relationships_of_wrong_type_read_as_empty() {
        let doc: CallGraphDocument = serde_json::from_str(
            r#"{"functions": {}, "call_relationships": {"caller": "f"}, "total_functions": -1}"#,
        )
        .unwrap();
        assert!(doc.call_relationships.is_empty());
        assert_eq!(doc.total_functions, None);
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let result =
            serde_json::from_str::<CallGraphDocument>(r#"{"functions": {"f": {"calls": []}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_files_counts_in_first_appearance_order() {
        let doc: CallGraphDocument = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            doc.functions.files(),
            vec![("ingestion.py".to_string(), 2), ("utils.py".to_string(), 1)]
        );
    }
}
