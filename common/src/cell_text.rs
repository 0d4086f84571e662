//! Cell caption assembly
//!
//! Title line is the stock code. Line 1 carries purity, gross weight and
//! diamond weight; line 2 carries stone weight and price. Each line is the
//! " | "-join of the fields that are both selected and present.

use crate::format::{clean_text, format_decimal};
use crate::record::Attributes;
use std::collections::HashSet;

// ============================================
// Column names and labels
// ============================================

pub const PURITY_COLUMN: &str = "Purity";
pub const GROSS_WT_COLUMN: &str = "Gross Wt";
pub const DIA_WT_COLUMN: &str = "Total Dia Wt";
pub const STONE_WT_COLUMN: &str = "Total stone Wt";
pub const PRICE_COLUMN: &str = "Price";

pub const GROSS_WT_LABEL: &str = "G Wt - ";
pub const DIA_WT_LABEL: &str = "Dia Wt - ";
pub const STONE_WT_LABEL: &str = "Clr Wt - ";
pub const PRICE_LABEL: &str = "Price - ";

pub const LINE_SEPARATOR: &str = " | ";

/// Caption values of one product, already formatted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFields {
    pub purity: Option<String>,
    pub gross_wt: Option<String>,
    pub dia_wt: Option<String>,
    pub stone_wt: Option<String>,
    pub price: Option<String>,
}

impl CatalogFields {
    /// Pull the caption fields out of `attributes`, ignoring unselected columns
    pub fn extract(attributes: &Attributes, selected: &HashSet<String>) -> Self {
        let pick = |column: &str| {
            if selected.contains(column) {
                attributes.get(column)
            } else {
                None
            }
        };

        Self {
            purity: clean_text(pick(PURITY_COLUMN)),
            gross_wt: format_decimal(pick(GROSS_WT_COLUMN)),
            dia_wt: format_decimal(pick(DIA_WT_COLUMN)),
            stone_wt: format_decimal(pick(STONE_WT_COLUMN)),
            price: clean_text(pick(PRICE_COLUMN)),
        }
    }

    pub fn line1(&self) -> Option<String> {
        join_present([
            self.purity.clone(),
            labeled(GROSS_WT_LABEL, &self.gross_wt),
            labeled(DIA_WT_LABEL, &self.dia_wt),
        ])
    }

    pub fn line2(&self) -> Option<String> {
        join_present([
            labeled(STONE_WT_LABEL, &self.stone_wt),
            labeled(PRICE_LABEL, &self.price),
        ])
    }
}

fn labeled(label: &str, value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| format!("{}{}", label, v))
}

fn join_present<const N: usize>(parts: [Option<String>; N]) -> Option<String> {
    let present: Vec<String> = parts.into_iter().flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(LINE_SEPARATOR))
    }
}

/// Title plus the attribute lines that have content
pub fn build_cell_lines(key: &str, attributes: &Attributes, selected: &HashSet<String>) -> Vec<String> {
    let fields = CatalogFields::extract(attributes, selected);
    std::iter::once(key.to_string())
        .chain(fields.line1())
        .chain(fields.line2())
        .collect()
}
