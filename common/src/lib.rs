//! YS18 Catalog Common Library
//!
//! I/O-free core shared by the CLI: field formatting, record indexing,
//! category filtering, layout presets and grid pagination.

pub mod category;
pub mod cell_text;
pub mod composer;
pub mod error;
pub mod format;
pub mod layout;
pub mod record;

pub use category::{CategoryFilter, CategoryTable};
pub use cell_text::{build_cell_lines, CatalogFields};
pub use composer::{Composition, Page, PageComposer, SkipReason, SkippedItem, Slot};
pub use error::{Error, Result};
pub use format::{clean_text, format_decimal};
pub use layout::{LayoutGeometry, LayoutPreset, PresetChoice};
pub use record::{Attributes, CellValue, Record, RecordIndex, Table};
