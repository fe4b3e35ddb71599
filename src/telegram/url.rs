use once_cell::sync::Lazy;
use regex::Regex;

/// Cached regex for YouTube links, with or without scheme and `www.`
/// Compiled once at startup and reused for all requests
static VIDEO_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://)?(www\.)?(youtube\.com|youtu\.be)/\S+").expect("Failed to compile video URL regex")
});

/// Returns the first video-sharing link in `text`, exactly as the user typed it.
pub fn extract_video_url(text: &str) -> Option<&str> {
    VIDEO_URL_REGEX.find(text.trim()).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_common_forms() {
        let cases = [
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            ("https://youtu.be/dQw4w9WgXcQ", "https://youtu.be/dQw4w9WgXcQ"),
            ("youtu.be/dQw4w9WgXcQ", "youtu.be/dQw4w9WgXcQ"),
            ("www.youtube.com/shorts/abc123", "www.youtube.com/shorts/abc123"),
            ("HTTPS://YOUTU.BE/ABC", "HTTPS://YOUTU.BE/ABC"),
        ];
        for (text, expected) in cases {
            assert_eq!(extract_video_url(text), Some(expected), "input: {}", text);
        }
    }

    #[test]
    fn test_finds_link_inside_text() {
        let text = "  look at this https://youtu.be/abc?t=42 it's great ";
        assert_eq!(extract_video_url(text), Some("https://youtu.be/abc?t=42"));
    }

    #[test]
    fn test_first_link_wins() {
        let text = "https://youtu.be/first https://youtu.be/second";
        assert_eq!(extract_video_url(text), Some("https://youtu.be/first"));
    }

    #[test]
    fn test_ignores_other_text() {
        for text in [
            "hello there",
            "https://vimeo.com/123",
            "youtube.com",
            "https://example.com/youtube",
            "",
        ] {
            assert_eq!(extract_video_url(text), None, "input: {:?}", text);
        }
    }
}
