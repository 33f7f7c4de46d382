//! Include/exclude filtering of walk results using glob patterns

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

use super::extensions::{DEFAULT_IMAGE_EXTENSIONS, extensions_to_patterns};
use super::{FilterError, Result};

/// Pattern matcher using GlobSet for efficient matching
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    globset: GlobSet,
}

impl PatternMatcher {
    /// Create a new pattern matcher from glob patterns
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| FilterError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.kind().to_string(),
            })?;
            builder.add(glob);
        }

        let globset = builder.build().map_err(|e| FilterError::InvalidPattern {
            pattern: patterns.join(", "),
            reason: e.to_string(),
        })?;

        Ok(Self { globset })
    }

    /// Check if a path matches any of the patterns
    pub fn matches(&self, path: &Path) -> bool {
        self.globset.is_match(path)
    }
}

/// File filter managing include and exclude patterns
#[derive(Debug, Default)]
pub struct FileFilter {
    include_matcher: Option<PatternMatcher>,
    /// Overrides includes
    exclude_matcher: Option<PatternMatcher>,
    /// Must also match when set, independently of the includes
    image_matcher: Option<PatternMatcher>,
}

impl FileFilter {
    /// Create a new file filter
    pub fn new(include_patterns: Vec<String>, exclude_patterns: Vec<String>) -> Result<Self> {
        let include_matcher = if !include_patterns.is_empty() {
            Some(PatternMatcher::new(&include_patterns)?)
        } else {
            None
        };

        let exclude_matcher = if !exclude_patterns.is_empty() {
            Some(PatternMatcher::new(&exclude_patterns)?)
        } else {
            None
        };

        Ok(Self {
            include_matcher,
            exclude_matcher,
            image_matcher: None,
        })
    }

    /// Only keep files with one of the default image extensions
    pub fn images_only(mut self, enabled: bool) -> Result<Self> {
        self.image_matcher = if enabled {
            Some(PatternMatcher::new(&extensions_to_patterns(
                DEFAULT_IMAGE_EXTENSIONS,
            ))?)
        } else {
            None
        };
        Ok(self)
    }

    /// Check if a file should be included based on patterns
    ///
    /// Rules:
    /// 1. If path matches exclude patterns -> false (exclude overrides)
    /// 2. If images only and path is not an image -> false
    /// 3. If no include patterns -> true (include all by default)
    /// 4. If path matches include patterns -> true
    /// 5. Otherwise -> false
    pub fn should_include(&self, path: &Path) -> bool {
        if let Some(ref exclude) = self.exclude_matcher
            && exclude.matches(path)
        {
            return false;
        }

        if let Some(ref images) = self.image_matcher
            && !images.matches(path)
        {
            return false;
        }

        match self.include_matcher {
            Some(ref include) => include.matches(path),
            None => true,
        }
    }

    /// Check if the filter removes anything at all
    pub fn has_patterns(&self) -> bool {
        self.include_matcher.is_some()
            || self.exclude_matcher.is_some()
            || self.image_matcher.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matcher_basic() {
        let patterns = vec!["*.png".to_string(), "*.jpg".to_string()];
        let matcher = PatternMatcher::new(&patterns).unwrap();

        assert!(matcher.matches(Path::new("shot.png")));
        assert!(matcher.matches(Path::new("photo.jpg")));
        assert!(!matcher.matches(Path::new("notes.txt")));
        assert!(matcher.matches(Path::new("2024/05/shot.png")));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = PatternMatcher::new(&["[unclosed".to_string()]).unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_file_filter_exclude_overrides() {
        let filter =
            FileFilter::new(vec!["*.png".to_string()], vec!["trash/*".to_string()]).unwrap();

        assert!(filter.should_include(Path::new("shot.png")));
        assert!(filter.should_include(Path::new("2024/shot.png")));
        assert!(!filter.should_include(Path::new("trash/shot.png")));
    }

    #[test]
    fn test_file_filter_no_patterns() {
        let filter = FileFilter::new(vec![], vec![]).unwrap();

        assert!(!filter.has_patterns());
        assert!(filter.should_include(Path::new("a.txt")));
        assert!(filter.should_include(Path::new("any/path/file.xyz")));
    }

    #[test]
    fn test_images_only_narrows_includes() {
        let filter = FileFilter::new(vec!["sub/**".to_string()], vec![])
            .unwrap()
            .images_only(true)
            .unwrap();

        assert!(filter.should_include(Path::new("sub/b.jpg")));
        assert!(filter.should_include(Path::new("sub/sub2/C.PNG")));
        assert!(!filter.should_include(Path::new("sub/notes.txt")));
        assert!(!filter.should_include(Path::new("other.png")));
    }
}
