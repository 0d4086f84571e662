pub mod pdf;

use crate::error::Result;
use crate::image_loader::PreparedImage;
use catalog_common::{LayoutGeometry, Page};
use std::path::Path;

pub use pdf::PdfRenderer;

/// One product cell: photo plus caption lines (title first)
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCell {
    pub key: String,
    pub lines: Vec<String>,
    pub image: PreparedImage,
}

/// Finished catalog handed to a renderer
#[derive(Debug, Clone)]
pub struct Catalog {
    pub title: String,
    pub geometry: LayoutGeometry,
    pub pages: Vec<Page<CatalogCell>>,
}

impl Catalog {
    pub fn cell_count(&self) -> usize {
        self.pages.iter().map(Page::real_cell_count).sum()
    }
}

/// Writes a catalog document to disk
pub trait CatalogRenderer {
    fn render(&self, catalog: &Catalog, output_path: &Path) -> Result<()>;
}
