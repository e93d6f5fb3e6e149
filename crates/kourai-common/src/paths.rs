//! Path utilities for selecting media files by extension.

use std::path::Path;

/// Extensions linked when none are configured.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["avi", "mkv", "mp4"];

/// Check if a path's extension is in `extensions`, ignoring case.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use kourai_common::paths::{has_extension, DEFAULT_VIDEO_EXTENSIONS};
///
/// assert!(has_extension(Path::new("/in/movie.mkv"), DEFAULT_VIDEO_EXTENSIONS));
/// assert!(has_extension(Path::new("MOVIE.AVI"), DEFAULT_VIDEO_EXTENSIONS));
/// assert!(!has_extension(Path::new("movie.srt"), DEFAULT_VIDEO_EXTENSIONS));
/// assert!(!has_extension(Path::new("README"), DEFAULT_VIDEO_EXTENSIONS));
/// ```
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Normalize user-supplied extensions: lower-case, no leading dot.
///
/// ```
/// use kourai_common::paths::normalize_extensions;
///
/// assert_eq!(normalize_extensions([".MKV", "mp4", ""]), vec!["mkv", "mp4"]);
/// ```
pub fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_extensions() {
        let exts = vec!["m4v".to_string()];
        assert!(has_extension(Path::new("a.M4V"), &exts));
        assert!(!has_extension(Path::new("a.mkv"), &exts));
    }

    #[test]
    fn test_multiple_dots() {
        assert!(has_extension(
            Path::new("Foobar.1999.2160p.WEB-DL.mkv"),
            DEFAULT_VIDEO_EXTENSIONS
        ));
    }
}
