//! YS18 jewellery catalog generator
//!
//! Matches rows of a stock workbook to product photos and lays them out as a
//! paginated PDF catalog. The pure core (indexing, layout, pagination) lives
//! in `catalog-common`; this crate adds the workbook, image and PDF plumbing.

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod image_loader;
pub mod matcher;
pub mod reader;

pub use builder::{BuildReport, CatalogBuilder, CatalogRequest};
pub use error::{CatalogError, Result};
