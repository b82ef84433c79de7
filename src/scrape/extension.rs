//! File extension classification.

use std::collections::HashSet;

/// Extensions considered downloadable. `jpg` and `jpeg` are distinct keys.
pub const DOWNLOADABLE_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", // documents
    "zip", "rar", "7z", "tar", "gz", // archives
    "txt", "csv", "json", "xml", // data
    "jpg", "jpeg", "png", "gif", "svg", // images
    "mp3", "mp4", "avi", "mov", "wmv", // media
    "exe", "dmg", "apk", "deb", "rpm", // installers
];

/// Return the lowercase extension of the last path segment of `url`.
///
/// Query string and fragment are ignored. Returns an empty string when the
/// last segment has no dot.
pub fn extension_of(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();

    match segment.rfind('.') {
        Some(pos) => segment[pos + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Whether `extension` is in the downloadable allow-list.
pub fn is_downloadable(extension: &str) -> bool {
    DOWNLOADABLE_EXTENSIONS.contains(&extension)
}

/// Normalize a caller-supplied extension filter (`".PDF"`, `" doc"`) into
/// lowercase, dot-free keys.
pub fn normalize_extension_filter<I, S>(extensions: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim().replace('.', "").to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_ignores_query_and_fragment() {
        assert_eq!(extension_of("/docs/report.PDF?v=2#top"), "pdf");
        assert_eq!(
            extension_of("https://example.com/docs/report.PDF?v=2#top"),
            "pdf"
        );
    }

    #[test]
    fn test_extension_uses_last_segment() {
        assert_eq!(extension_of("https://example.com/v1.2/download"), "");
        assert_eq!(extension_of("https://example.com/archive.tar.gz"), "gz");
        assert_eq!(extension_of("https://example.com/"), "");
        assert_eq!(extension_of("https://example.com/page?file=a.pdf"), "");
    }

    #[test]
    fn test_is_downloadable() {
        assert!(is_downloadable("pdf"));
        assert!(is_downloadable("jpeg"));
        assert!(is_downloadable("7z"));
        assert!(!is_downloadable("html"));
        assert!(!is_downloadable("PDF"));
        assert!(!is_downloadable(""));
    }

    #[test]
    fn test_normalize_filter() {
        let filter = normalize_extension_filter([".PDF", " doc ", "", "."]);
        assert_eq!(filter.len(), 2);
        assert!(filter.contains("pdf"));
        assert!(filter.contains("doc"));
    }
}
