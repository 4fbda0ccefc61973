//! YouTube URL helpers: id extraction, embed rewriting, derived thumbnails.

/// Check if a URL points at a YouTube host.
pub fn is_youtube_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.contains("youtube.com") || lower.contains("youtu.be")
}

/// Extract the 11-character video id from the common YouTube URL forms:
/// `watch?v=ID`, `youtu.be/ID` and `/embed/ID`. Anything that does not carry
/// a well-formed id yields `None`.
pub fn extract_youtube_id(url: &str) -> Option<String> {
    const MARKERS: [&str; 3] = ["youtube.com/watch?v=", "youtu.be/", "youtube.com/embed/"];

    for marker in MARKERS {
        if let Some(candidate) = id_after(url, marker) {
            if is_valid_id(candidate) {
                return Some(candidate.to_string());
            }
        }
    }

    None
}

/// Slice out the id-shaped segment following `marker`, stopping at the first
/// delimiter.
fn id_after<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    let start = url.find(marker)? + marker.len();
    let rest = &url[start..];
    let end = rest.find(['&', '#', '?', '/']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Video ids are exactly 11 characters from `[A-Za-z0-9_-]`.
fn is_valid_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Canonical deep link, used by the "open externally" fallback.
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

/// Rewrite a YouTube `watch?v=` URL into its embeddable form. Any other URL,
/// including non-YouTube ones that happen to contain `watch?v=`, comes back
/// unchanged.
pub fn to_embed_url(url: &str) -> String {
    if is_youtube_url(url) && url.contains("watch?v=") {
        url.replacen("watch?v=", "embed/", 1)
    } else {
        url.to_string()
    }
}

/// Default thumbnail YouTube serves for any public video.
pub fn derived_thumbnail(id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_short_url() {
        assert_eq!(
            extract_youtube_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_id_from_watch_url() {
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_id_from_embed_url() {
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn ignores_trailing_query_parameters() {
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn rejects_non_matching_urls() {
        assert_eq!(extract_youtube_id("https://example.com/video.mp4"), None);
        assert_eq!(extract_youtube_id("https://vimeo.com/12345"), None);
        // Right host, malformed id.
        assert_eq!(extract_youtube_id("https://youtu.be/short"), None);
    }

    #[test]
    fn rewrites_watch_urls_to_embed_form() {
        assert_eq!(
            to_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            to_embed_url("https://example.com/player"),
            "https://example.com/player"
        );
    }

    #[test]
    fn does_not_rewrite_watch_segments_on_other_hosts() {
        assert_eq!(
            to_embed_url("https://example.com/watch?v=dQw4w9WgXcQ"),
            "https://example.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn derives_thumbnail_url() {
        assert_eq!(
            derived_thumbnail("dQw4w9WgXcQ"),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }
}
