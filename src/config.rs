use crate::error::{CatalogError, Result};
use catalog_common::layout::LayoutPreset;
use catalog_common::CategoryTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Header row offset in the workbook (0-based: the 4th sheet row)
pub const DEFAULT_HEADER_ROW: usize = 3;

/// Output folder created next to the image folder
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "YS18_OUTPUT";

const MIN_IMAGE_PX: u32 = 64;

pub const DEFAULT_TITLE: &str = "YS18 Jewellery Catalog Collection";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub header_row: usize,
    pub output_dir_name: String,
    pub default_layout: LayoutPreset,
    pub default_title: String,
    /// Longest image side after downscaling (px)
    pub max_image_px: u32,
    pub category_prefixes: CategoryTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_row: DEFAULT_HEADER_ROW,
            output_dir_name: DEFAULT_OUTPUT_DIR_NAME.into(),
            default_layout: LayoutPreset::Small,
            default_title: DEFAULT_TITLE.into(),
            max_image_px: 800,
            category_prefixes: CategoryTable::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CatalogError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("ys18-catalog").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.max_image_px < MIN_IMAGE_PX {
            return Err(CatalogError::Config(format!(
                "max_image_px must be at least {}, got {}",
                MIN_IMAGE_PX, self.max_image_px
            )));
        }
        if self.output_dir_name.trim().is_empty() || self.output_dir_name.contains(['/', '\\']) {
            return Err(CatalogError::Config(format!(
                "output_dir_name must be a plain folder name, got {:?}",
                self.output_dir_name
            )));
        }
        Ok(())
    }
}
