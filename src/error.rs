use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Image folder not found: {0}")]
    FolderNotFound(String),

    #[error("Workbook read error: {0}")]
    Workbook(String),

    #[error("Workbook has no data below header row {0}")]
    EmptyWorkbook(usize),

    #[error("PDF generation error: {0}")]
    PdfGeneration(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Key column missing or no matching images
    #[error(transparent)]
    Common(#[from] catalog_common::Error),
}

impl CatalogError {
    /// Caller-correctable input problem (wrong column, nothing matched)
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CatalogError::Common(catalog_common::Error::KeyColumnNotFound(_))
                | CatalogError::Common(catalog_common::Error::NoMatchingImages)
                | CatalogError::FileNotFound(_)
                | CatalogError::FolderNotFound(_)
        )
    }
}

impl From<calamine::Error> for CatalogError {
    fn from(e: calamine::Error) -> Self {
        CatalogError::Workbook(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
