//! Key generation for the content-store namespaces.
//!
//! Key format: `videos/{unix_ms}-{name}`, `frames/{unix_ms}-{frameFileName}`,
//! `brand-images/{unix_ms}-{name}`. Callers supply the timestamp so one
//! pipeline run can stamp every frame key with the same value.

/// Namespace prefix for persisted source videos.
pub const VIDEOS_PREFIX: &str = "videos";

/// Namespace prefix for extracted frames.
pub const FRAMES_PREFIX: &str = "frames";

/// Namespace prefix for brand reference images.
pub const BRAND_IMAGES_PREFIX: &str = "brand-images";

/// Generate a key for a persisted source video.
pub fn video_key(unix_ms: i64, original_name: &str) -> String {
    format!(
        "{}/{}-{}",
        VIDEOS_PREFIX,
        unix_ms,
        sanitize_name(original_name)
    )
}

/// Generate a key for one extracted frame.
pub fn frame_key(unix_ms: i64, frame_file_name: &str) -> String {
    format!(
        "{}/{}-{}",
        FRAMES_PREFIX,
        unix_ms,
        sanitize_name(frame_file_name)
    )
}

/// Generate a key for a brand reference image.
pub fn brand_image_key(unix_ms: i64, original_name: &str) -> String {
    format!(
        "{}/{}-{}",
        BRAND_IMAGES_PREFIX,
        unix_ms,
        sanitize_name(original_name)
    )
}

/// Strip path separators and traversal sequences from a caller-supplied name.
///
/// Uploaded filenames end up inside storage keys; a name like `../x` must not
/// be able to escape its namespace.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let cleaned = cleaned.replace("..", "_");
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_key_namespace() {
        let key = video_key(1700000000000, "clip.mp4");
        assert_eq!(key, "videos/1700000000000-clip.mp4");
    }

    #[test]
    fn test_frame_key_namespace() {
        let key = frame_key(1700000000000, "frame-1.jpg");
        assert_eq!(key, "frames/1700000000000-frame-1.jpg");
    }

    #[test]
    fn test_brand_image_key_namespace() {
        let key = brand_image_key(1700000000000, "logo.png");
        assert_eq!(key, "brand-images/1700000000000-logo.png");
    }

    #[test]
    fn test_sanitize_strips_separators_and_traversal() {
        assert_eq!(sanitize_name("a/b.mp4"), "a_b.mp4");
        assert_eq!(sanitize_name("..\\evil"), "__evil");
        assert_eq!(sanitize_name(""), "unnamed");
    }
}
