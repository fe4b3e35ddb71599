use strum::{AsRefStr, Display, EnumString};

/// What the user asked for: the MP4 video or only the MP3 audio track.
///
/// The lowercase name (`video` / `audio`) is what travels in callback payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum DownloadMode {
    Video,
    Audio,
}

impl DownloadMode {
    pub fn is_audio(self) -> bool {
        matches!(self, DownloadMode::Audio)
    }

    /// Text of the inline button offering this mode
    pub fn button_label(self) -> &'static str {
        match self {
            DownloadMode::Video => "🎬 Video MP4",
            DownloadMode::Audio => "🎵 Audio MP3",
        }
    }

    /// Emoji put in front of the title in the upload caption
    pub fn caption_icon(self) -> &'static str {
        match self {
            DownloadMode::Video => "🎬",
            DownloadMode::Audio => "🎵",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(DownloadMode::Video.to_string(), "video");
        assert_eq!(DownloadMode::Audio.as_ref(), "audio");
        assert_eq!(DownloadMode::from_str("audio").unwrap(), DownloadMode::Audio);
        assert_eq!(DownloadMode::from_str("video").unwrap(), DownloadMode::Video);
        assert!(DownloadMode::from_str("gif").is_err());
    }

    #[test]
    fn test_labels() {
        assert!(DownloadMode::Audio.button_label().contains("MP3"));
        assert!(DownloadMode::Video.button_label().contains("MP4"));
        assert_eq!(DownloadMode::Audio.caption_icon(), "🎵");
    }
}
