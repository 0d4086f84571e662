//! Stock code → photo matching
//!
//! For every indexed key (in row order) the image folder is probed for
//! `<key><ext>` over a fixed extension list; the first existing file wins.

pub mod types;

pub use types::{Asset, MatchReport, MatchedItem};

use crate::error::{CatalogError, Result};
use catalog_common::{CategoryFilter, Error as CoreError, RecordIndex};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Probe order for image files
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".JPG", ".PNG"];

/// First `<key><ext>` file that exists in `folder`
pub fn resolve_asset(folder: &Path, key: &str, extensions: &[&str]) -> Option<Asset> {
    extensions
        .iter()
        .map(|ext| folder.join(format!("{}{}", key, ext)))
        .find(|path| path.is_file())
        .map(|path| Asset {
            key: key.to_string(),
            path,
        })
}

/// Match every key and keep track of what was left out
pub fn match_report(
    index: &RecordIndex,
    folder: &Path,
    filter: &CategoryFilter,
    extensions: &[&str],
) -> Result<MatchReport> {
    if !folder.is_dir() {
        return Err(CatalogError::FolderNotFound(folder.display().to_string()));
    }

    let mut report = MatchReport::default();
    for record in index.iter() {
        if !filter.accepts(&record.key) {
            report.filtered_out.push(record.key.clone());
            continue;
        }

        match resolve_asset(folder, &record.key, extensions) {
            Some(asset) => report.matched.push(MatchedItem {
                record: record.clone(),
                asset,
            }),
            None => {
                tracing::debug!("no image for {}", record.key);
                report.unmatched.push(record.key.clone());
            }
        }
    }

    tracing::debug!(
        "matched {} / filtered {} / unmatched {}",
        report.matched.len(),
        report.filtered_out.len(),
        report.unmatched.len()
    );

    Ok(report)
}

/// Matched items in row order; an empty result is an error
pub fn match_images(
    index: &RecordIndex,
    folder: &Path,
    filter: &CategoryFilter,
    extensions: &[&str],
) -> Result<Vec<MatchedItem>> {
    let report = match_report(index, folder, filter, extensions)?;
    if report.matched.is_empty() {
        return Err(CoreError::NoMatchingImages.into());
    }
    Ok(report.matched)
}

/// Image files directly in `folder` whose stem is not an indexed key
pub fn find_orphan_images(folder: &Path, index: &RecordIndex) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(CatalogError::FolderNotFound(folder.display().to_string()));
    }

    let mut orphans: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_image_file(path))
        .filter(|path| {
            path.file_stem()
                .map(|stem| !index.contains(&stem.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    orphans.sort();
    Ok(orphans)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = format!(".{}", ext.to_string_lossy());
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_common::{CategoryTable, CellValue, Table};
    use std::fs::File;
    use tempfile::tempdir;

    fn index(keys: &[&str]) -> RecordIndex {
        let table = Table::new(
            vec!["Code".into()],
            keys.iter().map(|k| vec![CellValue::text(*k)]).collect(),
        );
        RecordIndex::build(&table, "Code").unwrap()
    }

    #[test]
    fn test_extension_probe_order() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("R1.png")).unwrap();
        File::create(dir.path().join("R1.jpeg")).unwrap();

        let asset = resolve_asset(dir.path(), "R1", IMAGE_EXTENSIONS).unwrap();
        assert_eq!(asset.path, dir.path().join("R1.jpeg"));
    }

    #[test]
    fn test_directory_named_like_image_ignored() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("R1.jpg")).unwrap();
        assert!(resolve_asset(dir.path(), "R1", IMAGE_EXTENSIONS).is_none());
    }

    #[test]
    fn test_match_keeps_row_order() {
        let dir = tempdir().unwrap();
        for name in ["E3.jpg", "R1.PNG", "C2.jpg"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let items = match_images(
            &index(&["R1", "C2", "X9", "E3"]),
            dir.path(),
            &CategoryFilter::All,
            IMAGE_EXTENSIONS,
        )
        .unwrap();

        let keys: Vec<&str> = items.iter().map(|i| i.key()).collect();
        assert_eq!(keys, vec!["R1", "C2", "E3"]);
    }

    #[test]
    fn test_category_filter_excludes() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("BR1001.jpg")).unwrap();
        File::create(dir.path().join("R1001.jpg")).unwrap();

        let filter = CategoryTable::default().filter("Ring");
        let report = match_report(&index(&["BR1001", "R1001"]), dir.path(), &filter, IMAGE_EXTENSIONS).unwrap();

        assert_eq!(report.matched.len(), 1);
        assert_eq!(report.matched[0].key(), "R1001");
        assert_eq!(report.filtered_out, vec!["BR1001".to_string()]);
    }

    #[test]
    fn test_no_matches_is_error() {
        let dir = tempdir().unwrap();
        let err = match_images(&index(&["R1"]), dir.path(), &CategoryFilter::All, IMAGE_EXTENSIONS).unwrap_err();
        assert!(matches!(err, CatalogError::Common(CoreError::NoMatchingImages)));
    }

    #[test]
    fn test_missing_folder() {
        let err = match_images(
            &index(&["R1"]),
            Path::new("/nonexistent/photos"),
            &CategoryFilter::All,
            IMAGE_EXTENSIONS,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::FolderNotFound(_)));
    }

    #[test]
    fn test_orphan_images() {
        let dir = tempdir().unwrap();
        for name in ["R1.jpg", "Z9.png", "notes.txt", "b2.JPG"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let orphans = find_orphan_images(dir.path(), &index(&["R1", "B2"])).unwrap();
        let names: Vec<String> = orphans
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Z9.png".to_string(), "b2.JPG".to_string()]);
    }
}
