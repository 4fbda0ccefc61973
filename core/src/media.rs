pub mod youtube;

use crate::feed::FeedRecord;
use youtube::{derived_thumbnail, extract_youtube_id, is_youtube_url, to_embed_url};

/// How a feed record can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A static image addressed by URL.
    Image,
    /// A direct video file (`.mp4`, `.webm`, `.ogg`).
    DirectVideoFile,
    /// A YouTube video with an extracted 11-character id.
    YouTubeVideo,
    /// Video-like but unrecognized; rendered as a generic embeddable URL.
    GenericEmbed,
    /// No resolvable media. Rendered as a placeholder, never an error.
    Empty,
}

/// Render-ready description of one record.
///
/// Built fresh per render call and discarded after use; never cached across
/// records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    pub primary_url: String,
    pub youtube_id: Option<String>,
    /// Resolved for card contexts: explicit thumbnail field if present, else
    /// the derived YouTube thumbnail for YouTube records.
    pub thumbnail_url: Option<String>,
}

/// Classify one feed record into a renderable media descriptor.
///
/// Pure and total over any record shape: a record with no resolvable URL
/// comes back as [`MediaKind::Empty`] rather than an error.
pub fn classify(record: &FeedRecord) -> MediaDescriptor {
    let url = primary_url(record);

    let declared_video = record
        .media_type
        .as_deref()
        .map(|t| t.to_ascii_lowercase().starts_with("video"))
        .unwrap_or(false);
    let video_like = declared_video || is_youtube_url(&url) || has_video_extension(&url);

    if video_like {
        if let Some(id) = extract_youtube_id(&url) {
            let thumbnail = explicit_thumbnail(record).unwrap_or_else(|| derived_thumbnail(&id));
            return MediaDescriptor {
                kind: MediaKind::YouTubeVideo,
                primary_url: url,
                youtube_id: Some(id),
                thumbnail_url: Some(thumbnail),
            };
        }

        if has_video_extension(&url) {
            return MediaDescriptor {
                kind: MediaKind::DirectVideoFile,
                primary_url: url,
                youtube_id: None,
                thumbnail_url: explicit_thumbnail(record),
            };
        }

        // Unrecognized video URL: hand back something embeddable.
        return MediaDescriptor {
            kind: MediaKind::GenericEmbed,
            primary_url: to_embed_url(&url),
            youtube_id: None,
            thumbnail_url: explicit_thumbnail(record),
        };
    }

    if !url.is_empty() {
        return MediaDescriptor {
            kind: MediaKind::Image,
            primary_url: url,
            youtube_id: None,
            thumbnail_url: explicit_thumbnail(record),
        };
    }

    MediaDescriptor {
        kind: MediaKind::Empty,
        primary_url: String::new(),
        youtube_id: None,
        thumbnail_url: None,
    }
}

/// First non-empty of `hdurl`, `url`, `image`.
fn primary_url(record: &FeedRecord) -> String {
    [&record.hdurl, &record.url, &record.image]
        .into_iter()
        .flatten()
        .find(|u| !u.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// First non-empty of the thumbnail fields the feed has used over time.
fn explicit_thumbnail(record: &FeedRecord) -> Option<String> {
    [&record.thumbnail_url, &record.thumbnail, &record.thumb]
        .into_iter()
        .flatten()
        .find(|u| !u.is_empty())
        .cloned()
}

/// Direct video file extensions, query string ignored.
fn has_video_extension(url: &str) -> bool {
    let path = url.split('?').next().unwrap_or(url).to_ascii_lowercase();
    path.ends_with(".mp4") || path.ends_with(".webm") || path.ends_with(".ogg")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_url(url: &str) -> FeedRecord {
        FeedRecord {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_record_classifies_as_empty() {
        let descriptor = classify(&FeedRecord::default());
        assert_eq!(descriptor.kind, MediaKind::Empty);
        assert!(descriptor.primary_url.is_empty());
        assert!(descriptor.thumbnail_url.is_none());
    }

    #[test]
    fn hdurl_wins_over_url_and_image() {
        let record = FeedRecord {
            hdurl: Some("https://example.com/hd.jpg".into()),
            url: Some("https://example.com/sd.jpg".into()),
            image: Some("https://example.com/img.jpg".into()),
            ..Default::default()
        };
        let descriptor = classify(&record);
        assert_eq!(descriptor.kind, MediaKind::Image);
        assert_eq!(descriptor.primary_url, "https://example.com/hd.jpg");
    }

    #[test]
    fn empty_hdurl_falls_through_to_url() {
        let record = FeedRecord {
            hdurl: Some(String::new()),
            url: Some("https://example.com/sd.jpg".into()),
            ..Default::default()
        };
        assert_eq!(classify(&record).primary_url, "https://example.com/sd.jpg");
    }

    #[test]
    fn youtube_url_classifies_with_id() {
        let descriptor = classify(&record_with_url("https://youtu.be/abc12345678"));
        assert_eq!(descriptor.kind, MediaKind::YouTubeVideo);
        assert_eq!(descriptor.youtube_id.as_deref(), Some("abc12345678"));
        assert_eq!(
            descriptor.thumbnail_url.as_deref(),
            Some("https://img.youtube.com/vi/abc12345678/hqdefault.jpg")
        );
    }

    #[test]
    fn explicit_thumbnail_beats_derived() {
        let record = FeedRecord {
            url: Some("https://youtu.be/abc12345678".into()),
            thumbnail_url: Some("https://example.com/custom.jpg".into()),
            ..Default::default()
        };
        assert_eq!(
            classify(&record).thumbnail_url.as_deref(),
            Some("https://example.com/custom.jpg")
        );
    }

    #[test]
    fn direct_video_file_detected_with_query_string() {
        let descriptor = classify(&record_with_url("https://example.com/clip.mp4?dl=1"));
        assert_eq!(descriptor.kind, MediaKind::DirectVideoFile);
    }

    #[test]
    fn media_type_prefix_marks_video_like() {
        let record = FeedRecord {
            media_type: Some("Video/external".into()),
            url: Some("https://player.example.com/xyz".into()),
            ..Default::default()
        };
        let descriptor = classify(&record);
        assert_eq!(descriptor.kind, MediaKind::GenericEmbed);
        assert_eq!(descriptor.primary_url, "https://player.example.com/xyz");
    }

    #[test]
    fn generic_embed_rewrites_watch_urls() {
        // A watch URL with a malformed id is still video-like by host, but no
        // id can be extracted, so it falls through to the embed rewrite.
        let descriptor = classify(&record_with_url("https://www.youtube.com/watch?v=bad"));
        assert_eq!(descriptor.kind, MediaKind::GenericEmbed);
        assert_eq!(descriptor.primary_url, "https://www.youtube.com/embed/bad");
    }

    #[test]
    fn declared_video_on_another_host_keeps_its_url() {
        let record = FeedRecord {
            media_type: Some("video".into()),
            url: Some("https://example.com/watch?v=dQw4w9WgXcQ".into()),
            ..Default::default()
        };
        let descriptor = classify(&record);
        assert_eq!(descriptor.kind, MediaKind::GenericEmbed);
        assert_eq!(
            descriptor.primary_url,
            "https://example.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn plain_url_is_an_image() {
        let descriptor = classify(&record_with_url("https://example.com/nebula.png"));
        assert_eq!(descriptor.kind, MediaKind::Image);
    }

    #[test]
    fn classification_is_deterministic() {
        let record = record_with_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(classify(&record), classify(&record));
    }
}
