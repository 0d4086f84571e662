//! Layout presets and page geometry
//!
//! All lengths are mm unless the name says pt. The page is A4 with fixed
//! margins; presets only decide the grid.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================
// Page constants
// ============================================

/// A4 size (mm)
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Margins (mm)
pub const MARGIN_LEFT_MM: f32 = 3.0;
pub const MARGIN_RIGHT_MM: f32 = 3.0;
pub const MARGIN_TOP_MM: f32 = 13.0;
pub const MARGIN_BOTTOM_MM: f32 = 6.0;

/// Padding below the image and below each text line (pt)
pub const CELL_PADDING_PT: f32 = 4.0;

/// Line spacing added on top of the font size (pt)
pub const LEADING_EXTRA_PT: f32 = 2.0;

/// Header title font size (pt), printed inside the top margin
pub const HEADER_FONT_SIZE_PT: f32 = 10.0;

/// Cell text colour #565656
pub const TEXT_GRAY: u8 = 0x56;

/// 1mm = 2.8346pt
pub const MM_TO_PT: f32 = 72.0 / 25.4;

// ============================================
// Geometry
// ============================================

/// Grid geometry for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    pub columns: usize,
    /// Side of the square image box (mm)
    pub cell_size_mm: f32,
    pub font_size_pt: f32,
    /// Forced page break after this many rows; `None` = unbounded
    pub max_rows_per_page: Option<usize>,
}

impl LayoutGeometry {
    pub fn usable_width_mm(&self) -> f32 {
        A4_WIDTH_MM - MARGIN_LEFT_MM - MARGIN_RIGHT_MM
    }

    pub fn usable_height_mm(&self) -> f32 {
        A4_HEIGHT_MM - MARGIN_TOP_MM - MARGIN_BOTTOM_MM
    }

    pub fn column_width_mm(&self) -> f32 {
        self.usable_width_mm() / self.columns.max(1) as f32
    }

    pub fn leading_pt(&self) -> f32 {
        self.font_size_pt + LEADING_EXTRA_PT
    }

    /// Height of a cell holding the image and `lines` text lines
    pub fn cell_height_mm(&self, lines: usize) -> f32 {
        let text_pt = CELL_PADDING_PT + lines as f32 * (self.leading_pt() + CELL_PADDING_PT);
        self.cell_size_mm + pt_to_mm(text_pt)
    }

    /// Left edge of a column (mm from the page's left edge)
    pub fn column_x_mm(&self, column: usize) -> f32 {
        MARGIN_LEFT_MM + column as f32 * self.column_width_mm()
    }
}

// ============================================
// Presets
// ============================================

/// Named density preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutPreset {
    Small,
    Medium,
    Large,
}

/// Preset used when a name is not recognized
pub const FALLBACK_PRESET: LayoutPreset = LayoutPreset::Large;

/// Outcome of resolving a preset name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetChoice {
    pub preset: LayoutPreset,
    /// The requested name was unknown and `FALLBACK_PRESET` was used
    pub fell_back: bool,
}

impl LayoutPreset {
    pub const ALL: [LayoutPreset; 3] = [
        LayoutPreset::Small,
        LayoutPreset::Medium,
        LayoutPreset::Large,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutPreset::Small => "Small",
            LayoutPreset::Medium => "Medium",
            LayoutPreset::Large => "Large",
        }
    }

    /// Exact (case-insensitive) lookup
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Lookup with the documented fallback for unknown names
    pub fn resolve(name: &str) -> PresetChoice {
        match Self::from_name(name) {
            Some(preset) => PresetChoice {
                preset,
                fell_back: false,
            },
            None => PresetChoice {
                preset: FALLBACK_PRESET,
                fell_back: true,
            },
        }
    }

    pub fn geometry(&self) -> LayoutGeometry {
        match self {
            LayoutPreset::Small => LayoutGeometry {
                columns: 5,
                cell_size_mm: 39.0,
                font_size_pt: 6.0,
                max_rows_per_page: None,
            },
            LayoutPreset::Medium => LayoutGeometry {
                columns: 2,
                cell_size_mm: 54.0,
                font_size_pt: 9.0,
                max_rows_per_page: None,
            },
            // Big images: two per page regardless of fit
            LayoutPreset::Large => LayoutGeometry {
                columns: 1,
                cell_size_mm: 105.0,
                font_size_pt: 11.0,
                max_rows_per_page: Some(2),
            },
        }
    }
}

impl fmt::Display for LayoutPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================
// Helpers
// ============================================

#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_geometry() {
        let small = LayoutPreset::Small.geometry();
        assert_eq!(small.columns, 5);
        assert_eq!(small.max_rows_per_page, None);

        let medium = LayoutPreset::Medium.geometry();
        assert_eq!(medium.columns, 2);
        assert!((medium.cell_size_mm - 54.0).abs() < 0.01);

        let large = LayoutPreset::Large.geometry();
        assert_eq!(large.columns, 1);
        assert_eq!(large.max_rows_per_page, Some(2));
        assert!((large.font_size_pt - 11.0).abs() < 0.01);
    }

    #[test]
    fn test_resolve_known_names() {
        let choice = LayoutPreset::resolve("medium");
        assert_eq!(choice.preset, LayoutPreset::Medium);
        assert!(!choice.fell_back);
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let choice = LayoutPreset::resolve("Huge");
        assert_eq!(choice.preset, FALLBACK_PRESET);
        assert!(choice.fell_back);
    }

    #[test]
    fn test_images_fit_columns() {
        for preset in LayoutPreset::ALL {
            let g = preset.geometry();
            assert!(g.cell_size_mm <= g.column_width_mm(), "{} image wider than column", preset);
        }
    }

    #[test]
    fn test_forced_rows_fit_physically() {
        let g = LayoutPreset::Large.geometry();
        let rows = g.max_rows_per_page.unwrap() as f32;
        assert!(g.cell_height_mm(3) * rows <= g.usable_height_mm());
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((pt_to_mm(mm_to_pt(12.5)) - 12.5).abs() < 0.001);
    }

    #[test]
    fn test_column_positions() {
        let g = LayoutPreset::Medium.geometry();
        assert!((g.column_x_mm(0) - MARGIN_LEFT_MM).abs() < 0.001);
        assert!((g.column_x_mm(1) - (MARGIN_LEFT_MM + 102.0)).abs() < 0.001);
    }
}
