//! Default image extensions for `--images-only`

/// Still-image formats a gallery can display
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "heic", "heif", "avif", "tif", "tiff",
];

/// Convert extensions to glob patterns
pub fn extensions_to_patterns(extensions: &[&str]) -> Vec<String> {
    extensions
        .iter()
        .flat_map(|ext| [format!("*.{ext}"), format!("*.{}", ext.to_uppercase())])
        .collect()
}
