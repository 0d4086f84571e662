use catalog_common::Record;
use std::path::PathBuf;

/// Image file resolved for one stock code
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub key: String,
    pub path: PathBuf,
}

/// Record joined with its image
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedItem {
    pub record: Record,
    pub asset: Asset,
}

impl MatchedItem {
    pub fn key(&self) -> &str {
        &self.record.key
    }
}

/// Matching outcome with the keys that did not make it
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub matched: Vec<MatchedItem>,
    /// Keys rejected by the category filter
    pub filtered_out: Vec<String>,
    /// Keys that passed the filter but have no image file
    pub unmatched: Vec<String>,
}
