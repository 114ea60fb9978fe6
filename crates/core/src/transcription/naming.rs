//! Job naming and media format inference.

use std::path::Path;

/// Transcribe rejects job names longer than this.
pub const MAX_JOB_NAME_LEN: usize = 200;

/// Media formats batch transcription accepts, keyed by file extension.
pub const SUPPORTED_MEDIA_FORMATS: &[&str] =
    &["amr", "flac", "m4a", "mp3", "mp4", "ogg", "wav", "webm"];

/// Builds a unique job name for the `index`-th object of an invocation.
///
/// Characters outside `[0-9A-Za-z._-]` are replaced with `-` and the result
/// is capped at [`MAX_JOB_NAME_LEN`].
pub fn job_name(request_id: &str, index: usize) -> String {
    let raw = format!("{request_id}-{index}");
    let mut name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if name.len() > MAX_JOB_NAME_LEN {
        // Keep the index suffix so names stay unique within an invocation.
        let suffix = format!("-{index}");
        name.truncate(MAX_JOB_NAME_LEN - suffix.len());
        name.push_str(&suffix);
    }

    name
}

/// Picks the Transcribe media format from the object key's extension,
/// falling back to `default` for unknown or missing extensions.
pub fn media_format_for_key(key: &str, default: &str) -> String {
    Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| SUPPORTED_MEDIA_FORMATS.contains(&ext.as_str()))
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_name_from_request_id() {
        assert_eq!(
            job_name("6f1c2a9e-0b4d-4c59-9c1a-2f3e4d5c6b7a", 0),
            "6f1c2a9e-0b4d-4c59-9c1a-2f3e4d5c6b7a-0"
        );
    }

    #[test]
    fn test_job_name_replaces_invalid_characters() {
        assert_eq!(job_name("req id/1", 2), "req-id-1-2");
    }

    #[test]
    fn test_job_name_is_capped() {
        let name = job_name(&"x".repeat(300), 12);
        assert_eq!(name.len(), MAX_JOB_NAME_LEN);
        assert!(name.ends_with("-12"));
    }

    #[test]
    fn test_media_format_from_extension() {
        assert_eq!(media_format_for_key("calls/one.wav", "mp3"), "wav");
        assert_eq!(media_format_for_key("two.FLAC", "mp3"), "flac");
        assert_eq!(media_format_for_key("three.m4a", "mp3"), "m4a");
    }

    #[test]
    fn test_media_format_fallback() {
        assert_eq!(media_format_for_key("notes.txt", "mp3"), "mp3");
        assert_eq!(media_format_for_key("no-extension", "mp3"), "mp3");
    }
}
