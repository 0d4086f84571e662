//! Row model and record index
//!
//! A `Table` is what the workbook reader hands over: header names plus raw
//! cell values. `RecordIndex` turns it into a key → attributes lookup that
//! keeps source-row order.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Header name prefix given to columns whose header cell is blank.
pub const PLACEHOLDER_COLUMN_PREFIX: &str = "Unnamed";

// ============================================
// Cell values
// ============================================

/// Raw value of one worksheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Stringified value. Integral numbers print without a fractional part.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ============================================
// Table
// ============================================

/// Header row plus data rows, as read from the source sheet
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// Columns carrying a human-assigned header, in sheet order
    pub fn usable_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !is_placeholder_column(c))
            .collect()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name && !is_placeholder_column(c))
    }
}

/// Blank or auto-generated (`Unnamed: 3`) header
pub fn is_placeholder_column(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || name.starts_with(PLACEHOLDER_COLUMN_PREFIX)
}

/// Uppercase, trimmed stock code
pub fn normalize_key(value: &CellValue) -> String {
    value.to_text().to_uppercase().trim().to_string()
}

// ============================================
// Records
// ============================================

/// Attribute name → raw value for one record (placeholder columns removed)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: HashMap<String, CellValue>,
}

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: CellValue) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: String,
    pub attributes: Attributes,
}

/// Unique key → attributes lookup in first-seen row order
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    records: Vec<Record>,
    positions: HashMap<String, usize>,
    duplicates_dropped: usize,
    blank_keys: usize,
}

impl RecordIndex {
    /// Index `table` by `key_column`.
    ///
    /// The first row for a key wins; later rows with the same normalized key
    /// are dropped. Rows with a blank key are skipped.
    pub fn build(table: &Table, key_column: &str) -> Result<Self> {
        let key_idx = table
            .column_index(key_column)
            .ok_or_else(|| Error::KeyColumnNotFound(key_column.to_string()))?;

        let kept: Vec<(usize, &str)> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !is_placeholder_column(name))
            .map(|(i, name)| (i, name.as_str()))
            .collect();

        let mut index = Self::default();
        for row in &table.rows {
            let key = row.get(key_idx).map(normalize_key).unwrap_or_default();
            if key.is_empty() {
                index.blank_keys += 1;
                continue;
            }
            if index.positions.contains_key(&key) {
                index.duplicates_dropped += 1;
                continue;
            }

            let attributes = kept
                .iter()
                .filter(|(i, _)| *i != key_idx)
                .map(|(i, name)| (*name, row.get(*i).cloned().unwrap_or_default()))
                .collect();

            index.positions.insert(key.clone(), index.records.len());
            index.records.push(Record { key, attributes });
        }

        Ok(index)
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.positions.get(key).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped because their key was already indexed
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    pub fn blank_keys(&self) -> usize {
        self.blank_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(
            vec![
                "Stock Code".into(),
                "Purity".into(),
                "Unnamed: 2".into(),
                "Gross Wt".into(),
            ],
            vec![
                vec![
                    CellValue::text(" r1001 "),
                    CellValue::text("22K"),
                    CellValue::text("junk"),
                    CellValue::Number(4.5),
                ],
                vec![
                    CellValue::text("BR2002"),
                    CellValue::text("18K"),
                    CellValue::Empty,
                    CellValue::Number(10.0),
                ],
                vec![
                    CellValue::text("R1001"),
                    CellValue::text("14K"),
                    CellValue::Empty,
                    CellValue::Number(9.9),
                ],
            ],
        )
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(&CellValue::text("  ab12 ")), "AB12");
        assert_eq!(normalize_key(&CellValue::Number(1001.0)), "1001");
        assert_eq!(normalize_key(&CellValue::Empty), "");
    }

    #[test]
    fn test_placeholder_columns() {
        assert!(is_placeholder_column("Unnamed: 4"));
        assert!(is_placeholder_column("   "));
        assert!(!is_placeholder_column("Price"));

        let table = sample_table();
        assert_eq!(table.usable_columns(), vec!["Stock Code", "Purity", "Gross Wt"]);
    }

    #[test]
    fn test_build_keeps_first_occurrence() {
        let index = RecordIndex::build(&sample_table(), "Stock Code").unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.duplicates_dropped(), 1);
        let record = index.get("R1001").unwrap();
        assert_eq!(record.attributes.get("Purity"), Some(&CellValue::text("22K")));
        assert_eq!(record.attributes.get("Gross Wt"), Some(&CellValue::Number(4.5)));
    }

    #[test]
    fn test_build_preserves_row_order() {
        let index = RecordIndex::build(&sample_table(), "Stock Code").unwrap();
        let keys: Vec<&str> = index.keys().collect();
        assert_eq!(keys, vec!["R1001", "BR2002"]);
    }

    #[test]
    fn test_placeholder_columns_not_in_attributes() {
        let index = RecordIndex::build(&sample_table(), "Stock Code").unwrap();
        let record = index.get("R1001").unwrap();
        assert!(record.attributes.get("Unnamed: 2").is_none());
        assert!(record.attributes.get("Stock Code").is_none());
        assert_eq!(record.attributes.len(), 2);
    }

    #[test]
    fn test_missing_key_column() {
        let err = RecordIndex::build(&sample_table(), "SKU").unwrap_err();
        assert!(matches!(err, Error::KeyColumnNotFound(ref c) if c == "SKU"));
    }

    #[test]
    fn test_placeholder_cannot_be_key_column() {
        let err = RecordIndex::build(&sample_table(), "Unnamed: 2").unwrap_err();
        assert!(matches!(err, Error::KeyColumnNotFound(_)));
    }

    #[test]
    fn test_blank_keys_skipped() {
        let table = Table::new(
            vec!["Code".into()],
            vec![vec![CellValue::text("  ")], vec![], vec![CellValue::text("E5")]],
        );
        let index = RecordIndex::build(&table, "Code").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.blank_keys(), 2);
    }

    #[test]
    fn test_short_rows_fill_empty() {
        let table = Table::new(
            vec!["Code".into(), "Price".into()],
            vec![vec![CellValue::text("N1")]],
        );
        let index = RecordIndex::build(&table, "Code").unwrap();
        assert_eq!(
            index.get("N1").unwrap().attributes.get("Price"),
            Some(&CellValue::Empty)
        );
    }
}
