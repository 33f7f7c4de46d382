//! Grid layout for displaying a file list as a gallery

use crate::error::{Result, ValidationError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Name of the folder conventionally holding screenshots inside Pictures
pub const SCREENSHOTS_FOLDER: &str = "Screenshots";

/// The user's screenshots folder, if the platform has a pictures directory
pub fn default_screenshots_dir() -> Option<PathBuf> {
    dirs::picture_dir().map(|pictures| pictures.join(SCREENSHOTS_FOLDER))
}

/// One cell of the gallery grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryTile {
    pub path: PathBuf,
    /// File name shown under the thumbnail
    pub label: String,
    pub row: usize,
    pub column: usize,
}

/// Fixed-column grid, filled row by row in file list order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryLayout {
    columns: usize,
}

impl GalleryLayout {
    pub const DEFAULT_COLUMNS: usize = 4;

    pub fn new(columns: usize) -> Result<Self> {
        if columns == 0 {
            return Err(
                ValidationError::invalid_parameter("columns", "must be at least 1").into(),
            );
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows needed for `count` tiles
    pub fn rows(&self, count: usize) -> usize {
        count.div_ceil(self.columns)
    }

    pub fn tiles<P: AsRef<Path>>(&self, files: &[P]) -> Vec<GalleryTile> {
        files
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let path = path.as_ref();
                GalleryTile {
                    path: path.to_path_buf(),
                    label: label_for(path),
                    row: index / self.columns,
                    column: index % self.columns,
                }
            })
            .collect()
    }
}

impl Default for GalleryLayout {
    fn default() -> Self {
        Self {
            columns: Self::DEFAULT_COLUMNS,
        }
    }
}

fn label_for(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
