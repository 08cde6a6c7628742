//! Upload filename sanitisation and URL construction.
//!
//! The sanitised filename is used three times per submission: as the name of
//! the staged temp file, as the object-store key, and as the last path
//! segment of both the public object URL and the audit-log URL.

use unicode_normalization::UnicodeNormalization;

/// Longest filename we keep, in bytes (all retained characters are ASCII).
pub const MAX_FILENAME_LEN: usize = 255;

/// Sanitise a client-supplied filename so it is safe as a local file name and
/// as an object key.
///
/// - The name is NFKD-normalised, then non-ASCII characters are dropped, so
///   `é` becomes `e`.
/// - Path separators (`/`, `\`) are treated as whitespace, and runs of
///   whitespace collapse into a single `_`.
/// - Only `[A-Za-z0-9._-]` survive.
/// - Leading and trailing `.` / `_` are stripped, which removes any `..`
///   traversal prefix left after separator replacement.
///
/// Returns `None` when nothing usable remains.
///
/// # Examples
///
/// ```
/// use babycontest_core::naming::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/passwd.png").as_deref(), Some("etc_passwd.png"));
/// assert_eq!(sanitize_filename("my photo.jpg").as_deref(), Some("my_photo.jpg"));
/// assert_eq!(sanitize_filename("bébé.png").as_deref(), Some("bebe.png"));
/// assert_eq!(sanitize_filename(".."), None);
/// ```
pub fn sanitize_filename(raw: &str) -> Option<String> {
    // Decompose so accented letters keep their base letter.
    let ascii: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');
    let truncated = &trimmed[..trimmed.len().min(MAX_FILENAME_LEN)];
    let name = truncated.trim_end_matches(|c| c == '.' || c == '_');

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Public URL of an object in AWS S3, virtual-hosted style.
///
/// Convention: `https://{bucket}.s3.{region}.amazonaws.com/{key}`
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}

/// Public URL of an object behind a custom, path-style endpoint
/// (MinIO and other S3-compatible stores).
pub fn path_style_object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/'))
}

/// URL under which the upload is recorded in the audit log.
///
/// This points at the app's own static path and is unrelated to where the
/// object actually lives.
pub fn local_upload_url(host: &str, port: u16, filename: &str) -> String {
    format!("http://{host}:{port}/static/uploads/{filename}")
}

/// Guess an image MIME type from the filename extension.
pub fn image_content_type(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}
