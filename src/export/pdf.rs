//! PDF writer
//!
//! Each composed page starts a new A4 sheet. Rows that do not fit on the
//! current sheet continue on the next one, so unbounded presets still flow
//! across sheets. The header title is printed in the top margin of every
//! sheet, including the single sheet of a catalog with no cells.
//!
//! The document is written to a temporary file in the output folder and
//! renamed into place, so a failed save leaves no partial PDF behind.

use super::{Catalog, CatalogCell, CatalogRenderer};
use crate::error::{CatalogError, Result};
use crate::image_loader::PreparedImage;
use catalog_common::layout::{
    pt_to_mm, A4_HEIGHT_MM, A4_WIDTH_MM, CELL_PADDING_PT, HEADER_FONT_SIZE_PT, MARGIN_BOTTOM_MM,
    MARGIN_TOP_MM, TEXT_GRAY,
};
use catalog_common::{LayoutGeometry, Slot};
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Rgb,
};
use std::io::BufWriter;
use std::path::Path;
use tempfile::NamedTempFile;

const LAYER_NAME: &str = "Layer 1";

/// Resolution images are placed at before scaling to the cell box
const IMAGE_DPI: f32 = 300.0;

/// Average Helvetica glyph width (em) used to centre captions
const REGULAR_CHAR_EM: f32 = 0.5;
const BOLD_CHAR_EM: f32 = 0.56;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl CatalogRenderer for PdfRenderer {
    fn render(&self, catalog: &Catalog, output_path: &Path) -> Result<()> {
        let writer = write_sheets(catalog)?;
        tracing::debug!("{} sheets for {} pages", writer.sheets, catalog.pages.len());
        writer.save(output_path)
    }
}

fn write_sheets(catalog: &Catalog) -> Result<SheetWriter> {
    let mut writer = SheetWriter::new(&catalog.title)?;

    for page in &catalog.pages {
        writer.start_sheet();
        for row in &page.rows {
            writer.place_row(row, &catalog.geometry)?;
        }
    }
    if writer.sheets == 0 {
        writer.start_sheet();
    }

    Ok(writer)
}

struct SheetWriter {
    doc: PdfDocumentReference,
    title: String,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Page created together with the document, used by the first sheet
    initial: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    /// Top edge of the next row (mm from the bottom)
    cursor_mm: f32,
    sheets: usize,
}

impl SheetWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME);

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| CatalogError::PdfGeneration(format!("font error: {:?}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| CatalogError::PdfGeneration(format!("font error: {:?}", e)))?;

        Ok(Self {
            doc,
            title: title.to_string(),
            regular,
            bold,
            initial: Some((page, layer)),
            layer: None,
            cursor_mm: content_top_mm(),
            sheets: 0,
        })
    }

    fn start_sheet(&mut self) {
        let (page, layer) = self
            .initial
            .take()
            .unwrap_or_else(|| self.doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME));
        let layer = self.doc.get_page(page).get_layer(layer);

        layer.set_fill_color(gray());
        if !self.title.is_empty() {
            let baseline = A4_HEIGHT_MM - MARGIN_TOP_MM / 2.0 - pt_to_mm(HEADER_FONT_SIZE_PT) / 2.0;
            let width = text_width_mm(&self.title, HEADER_FONT_SIZE_PT, BOLD_CHAR_EM);
            layer.use_text(
                self.title.clone(),
                HEADER_FONT_SIZE_PT,
                Mm(((A4_WIDTH_MM - width) / 2.0).max(0.0)),
                Mm(baseline),
                &self.bold,
            );
        }

        self.layer = Some(layer);
        self.cursor_mm = content_top_mm();
        self.sheets += 1;
    }

    fn place_row(&mut self, row: &[Slot<CatalogCell>], geometry: &LayoutGeometry) -> Result<()> {
        let height = row
            .iter()
            .filter_map(Slot::cell)
            .map(|cell| geometry.cell_height_mm(cell.lines.len()))
            .fold(0.0_f32, f32::max);

        let sheet_has_rows = self.cursor_mm < content_top_mm();
        if self.layer.is_none() || (sheet_has_rows && self.cursor_mm - height < MARGIN_BOTTOM_MM) {
            self.start_sheet();
        }

        let layer = match &self.layer {
            Some(layer) => layer.clone(),
            None => return Err(CatalogError::PdfGeneration("no sheet to draw on".into())),
        };

        for (column, slot) in row.iter().enumerate() {
            if let Slot::Filled(cell) = slot {
                self.draw_cell(&layer, cell, column, geometry)?;
            }
        }

        self.cursor_mm -= height;
        Ok(())
    }

    fn draw_cell(
        &self,
        layer: &PdfLayerReference,
        cell: &CatalogCell,
        column: usize,
        geometry: &LayoutGeometry,
    ) -> Result<()> {
        let column_x = geometry.column_x_mm(column);
        let column_w = geometry.column_width_mm();
        let top = self.cursor_mm;
        let size = geometry.cell_size_mm;

        // Photo, fitted inside the square box
        let (draw_w, draw_h) = fit_in_box(&cell.image, size);
        let x = column_x + (column_w - draw_w) / 2.0;
        let y = top - size + (size - draw_h) / 2.0;
        let natural_w = cell.image.width as f32 / IMAGE_DPI * 25.4;
        let natural_h = cell.image.height as f32 / IMAGE_DPI * 25.4;

        pdf_image(&cell.image, &cell.key)?.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(y)),
                scale_x: Some(draw_w / natural_w),
                scale_y: Some(draw_h / natural_h),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );

        // Caption
        let font_size = geometry.font_size_pt;
        let step = geometry.leading_pt() + CELL_PADDING_PT;
        layer.set_fill_color(gray());
        for (i, line) in cell.lines.iter().enumerate() {
            let (font, em) = if i == 0 {
                (&self.bold, BOLD_CHAR_EM)
            } else {
                (&self.regular, REGULAR_CHAR_EM)
            };
            let baseline = top - size - pt_to_mm(CELL_PADDING_PT + i as f32 * step + font_size);
            let width = text_width_mm(line, font_size, em);
            let text_x = (column_x + (column_w - width) / 2.0).max(column_x);
            layer.use_text(line.clone(), font_size, Mm(text_x), Mm(baseline), font);
        }

        Ok(())
    }

    fn save(self, output_path: &Path) -> Result<()> {
        let dir = match output_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)?;

        let mut writer = BufWriter::new(temp);
        self.doc
            .save(&mut writer)
            .map_err(|e| CatalogError::PdfGeneration(format!("save error: {:?}", e)))?;
        let temp = writer
            .into_inner()
            .map_err(|e| CatalogError::Io(e.into_error()))?;

        temp.persist(output_path).map_err(|e| CatalogError::Io(e.error))?;
        Ok(())
    }
}

fn content_top_mm() -> f32 {
    A4_HEIGHT_MM - MARGIN_TOP_MM
}

fn gray() -> Color {
    let v = TEXT_GRAY as f32 / 255.0;
    Color::Rgb(Rgb::new(v, v, v, None))
}

fn text_width_mm(text: &str, font_size_pt: f32, em: f32) -> f32 {
    pt_to_mm(text.chars().count() as f32 * font_size_pt * em)
}

/// Drawn size of an image scaled to fit a square box, aspect kept
fn fit_in_box(image: &PreparedImage, box_mm: f32) -> (f32, f32) {
    let w = image.width.max(1) as f32;
    let h = image.height.max(1) as f32;
    if w >= h {
        (box_mm, box_mm * h / w)
    } else {
        (box_mm * w / h, box_mm)
    }
}

fn pdf_image(image: &PreparedImage, key: &str) -> Result<Image> {
    let buffer = RgbImage::from_raw(image.width, image.height, image.rgb.clone()).ok_or_else(|| {
        CatalogError::PdfGeneration(format!("pixel buffer size mismatch for {}", key))
    })?;
    Ok(Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer)))
}
