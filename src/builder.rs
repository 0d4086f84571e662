//! Catalog orchestration
//!
//! workbook → record index → image matching → page composition → PDF.
//! Nothing is written until composition has finished.

use crate::config::Config;
use crate::error::Result;
use crate::export::{Catalog, CatalogCell, CatalogRenderer};
use crate::image_loader::AssetLoader;
use crate::matcher::{self, MatchedItem, IMAGE_EXTENSIONS};
use crate::reader;
use catalog_common::{
    build_cell_lines, LayoutPreset, PageComposer, PresetChoice, RecordIndex, SkipReason,
    SkippedItem, Table,
};
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

pub const PREVIEW_FILE_NAME: &str = "PREVIEW.pdf";
pub const FINAL_FILE_PREFIX: &str = "YS18_";

/// What the caller asked for
#[derive(Debug, Clone)]
pub struct CatalogRequest {
    pub excel: PathBuf,
    pub images: PathBuf,
    pub title: String,
    /// Stock code column; first usable column when `None`
    pub stock_col: Option<String>,
    /// Caption columns; every non-key column when `None`
    pub selected_headers: Option<Vec<String>>,
    pub layout: String,
    pub category: String,
    pub preview: bool,
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_path: PathBuf,
    pub preset: PresetChoice,
    pub stock_col: String,
    pub records: usize,
    pub duplicates_dropped: usize,
    pub matched: usize,
    pub placed: usize,
    pub pages: usize,
    pub skipped: Vec<SkippedItem>,
}

/// Catalog plus the figures that went into the report
#[derive(Debug, Clone)]
pub struct BuiltCatalog {
    pub catalog: Catalog,
    pub preset: PresetChoice,
    pub stock_col: String,
    pub records: usize,
    pub duplicates_dropped: usize,
    pub matched: usize,
    pub skipped: Vec<SkippedItem>,
}

pub struct CatalogBuilder<'a, L, R> {
    config: &'a Config,
    loader: L,
    renderer: R,
}

impl<'a, L: AssetLoader, R: CatalogRenderer> CatalogBuilder<'a, L, R> {
    pub fn new(config: &'a Config, loader: L, renderer: R) -> Self {
        Self {
            config,
            loader,
            renderer,
        }
    }

    /// Full run: read the workbook, build, write one PDF
    pub fn run<P: FnMut(f32)>(&self, request: &CatalogRequest, progress: P) -> Result<BuildReport> {
        let table = reader::read_table(&request.excel, self.config.header_row)?;
        let built = self.build(&table, request, progress)?;

        let out_dir = output_dir(&request.images, &self.config.output_dir_name);
        std::fs::create_dir_all(&out_dir)?;
        let output_path = output_path(&out_dir, request.preview, Local::now());

        self.renderer.render(&built.catalog, &output_path)?;

        let report = BuildReport {
            output_path,
            preset: built.preset,
            stock_col: built.stock_col,
            records: built.records,
            duplicates_dropped: built.duplicates_dropped,
            matched: built.matched,
            placed: built.catalog.cell_count(),
            pages: built.catalog.pages.len(),
            skipped: built.skipped,
        };
        tracing::info!(
            "wrote {} ({} placed, {} skipped, {} pages)",
            report.output_path.display(),
            report.placed,
            report.skipped.len(),
            report.pages
        );
        Ok(report)
    }

    /// Build the catalog for an already-read table without writing anything
    pub fn build<P: FnMut(f32)>(
        &self,
        table: &Table,
        request: &CatalogRequest,
        progress: P,
    ) -> Result<BuiltCatalog> {
        let preset = LayoutPreset::resolve(&request.layout);
        if preset.fell_back {
            tracing::warn!(
                "unknown layout {:?}, using {}",
                request.layout,
                preset.preset
            );
        }
        let geometry = preset.preset.geometry();

        let stock_col = resolve_stock_col(table, request.stock_col.as_deref());
        let index = RecordIndex::build(table, &stock_col)?;
        if index.duplicates_dropped() > 0 {
            tracing::info!("{} duplicate stock codes dropped", index.duplicates_dropped());
        }

        let filter = self.config.category_prefixes.filter(&request.category);
        let items = matcher::match_images(&index, &request.images, &filter, IMAGE_EXTENSIONS)?;
        let selected = selected_headers(table, &stock_col, request.selected_headers.as_deref());

        let composition = PageComposer::new(geometry).compose(
            &items,
            |item| self.build_cell(item, &selected),
            progress,
        );

        for skip in &composition.skipped {
            tracing::warn!("skipped {}: {}", skip.key, skip.reason);
        }

        Ok(BuiltCatalog {
            catalog: Catalog {
                title: request.title.clone(),
                geometry,
                pages: composition.pages,
            },
            preset,
            stock_col,
            records: index.len(),
            duplicates_dropped: index.duplicates_dropped(),
            matched: items.len(),
            skipped: composition.skipped,
        })
    }

    fn build_cell(&self, item: &MatchedItem, selected: &HashSet<String>) -> std::result::Result<CatalogCell, SkippedItem> {
        let skip = |reason| SkippedItem {
            key: item.key().to_string(),
            reason,
        };

        // A decoder panic costs this one item, not the run
        let image = panic::catch_unwind(AssertUnwindSafe(|| self.loader.load(&item.asset)))
            .map_err(|_| skip(SkipReason::Unreadable("decoder panicked".into())))?
            .map_err(skip)?;

        Ok(CatalogCell {
            key: item.key().to_string(),
            lines: build_cell_lines(item.key(), &item.record.attributes, selected),
            image,
        })
    }
}

/// Explicit stock column, or the first usable column
pub fn resolve_stock_col(table: &Table, requested: Option<&str>) -> String {
    match requested {
        Some(col) => col.to_string(),
        None => table
            .usable_columns()
            .first()
            .map(|c| c.to_string())
            .unwrap_or_default(),
    }
}

/// Caption columns: the requested ones, or every usable column but the key
pub fn selected_headers(table: &Table, stock_col: &str, requested: Option<&[String]>) -> HashSet<String> {
    match requested {
        Some(headers) => headers.iter().cloned().collect(),
        None => table
            .usable_columns()
            .into_iter()
            .filter(|c| *c != stock_col)
            .map(String::from)
            .collect(),
    }
}

// ============================================
// Output naming
// ============================================

/// `<image folder parent>/<dir_name>`
pub fn output_dir(image_folder: &Path, dir_name: &str) -> PathBuf {
    image_folder
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(dir_name)
}

/// Preview: fixed name, overwritten. Final: timestamped, never overwritten.
pub fn output_path(out_dir: &Path, preview: bool, now: DateTime<Local>) -> PathBuf {
    if preview {
        return out_dir.join(PREVIEW_FILE_NAME);
    }

    let stem = format!("{}{}", FINAL_FILE_PREFIX, now.format("%Y%m%d_%H%M%S"));
    let candidate = out_dir.join(format!("{}.pdf", stem));
    if !candidate.exists() {
        return candidate;
    }

    (1..)
        .map(|n| out_dir.join(format!("{}_{}.pdf", stem, n)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_common::CellValue;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 17, 9, 5, 7).unwrap()
    }

    #[test]
    fn test_output_dir_is_sibling() {
        let dir = output_dir(Path::new("/data/shoot/photos"), "YS18_OUTPUT");
        assert_eq!(dir, PathBuf::from("/data/shoot/YS18_OUTPUT"));
    }

    #[test]
    fn test_preview_name_fixed() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PREVIEW_FILE_NAME), b"old").unwrap();
        let path = output_path(dir.path(), true, fixed_time());
        assert_eq!(path, dir.path().join("PREVIEW.pdf"));
    }

    #[test]
    fn test_final_name_timestamped() {
        let dir = tempdir().unwrap();
        let path = output_path(dir.path(), false, fixed_time());
        assert_eq!(path, dir.path().join("YS18_20261017_090507.pdf"));
    }

    #[test]
    fn test_final_name_never_overwrites() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("YS18_20261017_090507.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("YS18_20261017_090507_1.pdf"), b"x").unwrap();

        let path = output_path(dir.path(), false, fixed_time());
        assert_eq!(path, dir.path().join("YS18_20261017_090507_2.pdf"));
    }

    #[test]
    fn test_default_stock_col_and_headers() {
        let table = Table::new(
            vec!["Unnamed: 0".into(), "Code".into(), "Purity".into(), "Price".into()],
            vec![vec![CellValue::Empty, CellValue::text("R1")]],
        );

        let stock_col = resolve_stock_col(&table, None);
        assert_eq!(stock_col, "Code");

        let selected = selected_headers(&table, &stock_col, None);
        let expected: HashSet<String> = ["Purity", "Price"].into_iter().map(String::from).collect();
        assert_eq!(selected, expected);
    }
}
