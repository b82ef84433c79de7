//! Filename derivation and sanitization.

use url::Url;

/// Maximum length, in characters, of a filename stem (extension excluded).
pub const MAX_STEM_LENGTH: usize = 200;

/// Derive a filename from the last path segment of `url`.
///
/// The segment is percent-decoded. When it is empty or has no dot, a name of
/// the form `<host>_<unixtime>.file` is synthesized (leading `www.` removed).
pub fn filename_from_url(url: &str, now: i64) -> String {
    let parsed = Url::parse(url).ok();

    let basename = parsed
        .as_ref()
        .map(|u| u.path().rsplit('/').next().unwrap_or_default().to_string())
        .unwrap_or_default();
    let decoded = urlencoding::decode(&basename)
        .map(|d| d.into_owned())
        .unwrap_or(basename);

    if !decoded.is_empty() && decoded.contains('.') {
        return decoded;
    }

    let host = parsed
        .as_ref()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());
    let host = host.strip_prefix("www.").unwrap_or(&host);
    format!("{}_{}.file", host, now)
}

/// Make a filename safe to create inside the output directory.
///
/// Characters illegal on common filesystems become `_`, control characters
/// are removed and the stem is truncated to [`MAX_STEM_LENGTH`] characters.
/// A result that is empty, `.` or `..` becomes `file_<unixtime>`.
pub fn sanitize_filename(name: &str, now: i64) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect();

    let (stem, ext) = split_extension(&cleaned);
    let stem: String = stem.chars().take(MAX_STEM_LENGTH).collect();
    let sanitized = format!("{}{}", stem, ext);

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return format!("file_{}", now);
    }
    sanitized
}

/// Split `name` into stem and extension (including the dot). A leading dot
/// does not start an extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 && !name[..pos].chars().all(|c| c == '.') => name.split_at(pos),
        _ => (name, ""),
    }
}

/// Filename used on disk for `url`.
pub fn output_filename(url: &str, now: i64) -> String {
    sanitize_filename(&filename_from_url(url, now), now)
}
