//! Secondary indices mapping column values back to primary keys.

use std::collections::HashMap;

/// How a column's cells are turned into index keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKind {
    /// The whole cell is the key.
    SingleValued,
    /// The cell is a list split on the given sub-delimiter; every element is
    /// a key, and so is the whole cell.
    MultiValued(String),
}

impl IndexKind {
    /// Pick the kind from an optional sub-delimiter.
    pub fn from_sub_delimiter(sub_delimiter: Option<&str>) -> Self {
        match sub_delimiter {
            Some(sub) => IndexKind::MultiValued(sub.to_string()),
            None => IndexKind::SingleValued,
        }
    }
}

/// Value → primary keys, in row insertion order.
///
/// Several rows may share a value; each primary key is recorded at most once
/// per value.
#[derive(Debug, Clone)]
pub struct SecondaryIndex {
    kind: IndexKind,
    entries: HashMap<String, Vec<String>>,
}

impl SecondaryIndex {
    /// Create an empty index.
    pub fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// The kind of this index.
    pub fn kind(&self) -> &IndexKind {
        &self.kind
    }

    /// Index one cell of the row identified by `primary_key`.
    pub fn insert(&mut self, cell: &str, primary_key: &str) {
        let Self { kind, entries } = self;
        insert_key(entries, cell, primary_key);
        if let IndexKind::MultiValued(sub) = kind {
            for part in cell.split(sub.as_str()).filter(|p| !p.is_empty()) {
                insert_key(entries, part, primary_key);
            }
        }
    }

    /// Primary keys of rows holding `value`, if any.
    pub fn get(&self, value: &str) -> Option<&[String]> {
        self.entries.get(value).map(Vec::as_slice)
    }

    /// Whether `value` appears in the indexed column.
    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains_key(value)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn insert_key(entries: &mut HashMap<String, Vec<String>>, key: &str, primary_key: &str) {
    let keys = entries.entry(key.to_string()).or_default();
    // Rows are indexed one at a time, so a repeat can only be the last entry.
    if keys.last().map(String::as_str) != Some(primary_key) {
        keys.push(primary_key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_valued_collects_duplicates() {
        let mut index = SecondaryIndex::new(IndexKind::SingleValued);
        index.insert("mammal", "cat");
        index.insert("mammal", "dog");
        index.insert("bird", "crow");

        assert_eq!(index.get("mammal"), Some(&["cat".to_string(), "dog".to_string()][..]));
        assert_eq!(index.get("bird").map(|k| k.len()), Some(1));
        assert!(index.get("fish").is_none());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_multi_valued_indexes_elements_and_cell() {
        let mut index = SecondaryIndex::new(IndexKind::from_sub_delimiter(Some(", ")));
        index.insert("p, q, r", "row1");
        index.insert("q", "row2");

        assert_eq!(index.get("p"), Some(&["row1".to_string()][..]));
        assert_eq!(
            index.get("q"),
            Some(&["row1".to_string(), "row2".to_string()][..])
        );
        assert!(index.contains("p, q, r"));
        assert!(!index.contains("p, q"));
    }

    #[test]
    fn test_repeated_element_records_key_once() {
        let mut index = SecondaryIndex::new(IndexKind::MultiValued(",".to_string()));
        index.insert("a,a", "row1");
        index.insert("a", "row2");
        assert_eq!(
            index.get("a"),
            Some(&["row1".to_string(), "row2".to_string()][..])
        );
    }
}
