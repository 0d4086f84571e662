//! Stock workbook reading
//!
//! Reads the first worksheet with calamine. The header row sits at a fixed
//! absolute sheet row; everything below it is data.

use crate::error::{CatalogError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use catalog_common::record::PLACEHOLDER_COLUMN_PREFIX;
use catalog_common::{CellValue, Table};
use std::collections::HashMap;
use std::path::Path;

/// Read the first worksheet of `path` as a table
pub fn read_table(path: &Path, header_row: usize) -> Result<Table> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogError::Workbook("workbook has no worksheets".into()))??;

    tracing::debug!(
        "read {} ({} rows x {} cols, header row {})",
        path.display(),
        range.height(),
        range.width(),
        header_row
    );

    table_from_range(&range, header_row)
}

/// Split a used range into header names and data rows.
///
/// `header_row` is an absolute sheet row; the used range may start below
/// row 0 when the top of the sheet is blank.
pub fn table_from_range(range: &Range<Data>, header_row: usize) -> Result<Table> {
    let (start_row, start_col) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Err(CatalogError::EmptyWorkbook(header_row)),
    };

    let mut rows = range.rows();
    let header: Vec<Data> = if header_row < start_row {
        vec![Data::Empty; range.width()]
    } else {
        rows.nth(header_row - start_row)
            .ok_or(CatalogError::EmptyWorkbook(header_row))?
            .to_vec()
    };

    let columns = header_names(&header, start_col);
    let rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(Table::new(columns, rows))
}

/// Blank headers become `Unnamed: <col>`; repeated names get `.1`, `.2`, ...
fn header_names(header: &[Data], start_col: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_value(cell).to_text().trim().to_string();
            if name.is_empty() {
                return format!("{}: {}", PLACEHOLDER_COLUMN_PREFIX, start_col + i);
            }
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_with(cells: &[((u32, u32), Data)]) -> Range<Data> {
        let end_row = cells.iter().map(|((r, _), _)| *r).max().unwrap();
        let end_col = cells.iter().map(|((_, c), _)| *c).max().unwrap();
        let start_row = cells.iter().map(|((r, _), _)| *r).min().unwrap();
        let mut range = Range::new((start_row, 0), (end_row, end_col));
        for (pos, value) in cells {
            range.set_value(*pos, value.clone());
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_header_at_fourth_row() {
        let range = range_with(&[
            ((0, 0), s("YS18 Stock Report")),
            ((3, 0), s("Stock Code")),
            ((3, 1), s("Gross Wt")),
            ((4, 0), s("r100")),
            ((4, 1), Data::Float(3.25)),
            ((5, 0), s("E200")),
        ]);

        let table = table_from_range(&range, 3).unwrap();
        assert_eq!(table.columns, vec!["Stock Code", "Gross Wt"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], CellValue::Number(3.25));
        assert_eq!(table.rows[1][1], CellValue::Empty);
    }

    #[test]
    fn test_used_range_starting_below_top() {
        let range = range_with(&[
            ((3, 0), s("Code")),
            ((4, 0), s("C1")),
        ]);
        let table = table_from_range(&range, 3).unwrap();
        assert_eq!(table.columns, vec!["Code"]);
        assert_eq!(table.rows, vec![vec![CellValue::text("C1")]]);
    }

    #[test]
    fn test_blank_and_duplicate_headers() {
        let range = range_with(&[
            ((0, 0), s("Code")),
            ((0, 2), s("Price")),
            ((0, 3), s("Price")),
            ((1, 0), s("P1")),
        ]);
        let table = table_from_range(&range, 0).unwrap();
        assert_eq!(table.columns, vec!["Code", "Unnamed: 1", "Price", "Price.1"]);
        assert_eq!(table.usable_columns(), vec!["Code", "Price", "Price.1"]);
    }

    #[test]
    fn test_header_row_past_end() {
        let range = range_with(&[((0, 0), s("Code"))]);
        let err = table_from_range(&range, 3).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyWorkbook(3)));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::text("true"));
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_missing_file() {
        let err = read_table(Path::new("/nonexistent/stock.xlsx"), 3).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound(_)));
    }
}
