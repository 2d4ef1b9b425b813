use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use yt_transcript_rs::api::YouTubeTranscriptApi;

/// One timestamped unit of transcript text, entity-decoded and trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Offset from the start of the video, in seconds.
    pub start: f64,
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Languages tried when none of the preferred ones has a transcript.
const FALLBACK_LANGUAGES: &[&str] = &[
    "en", "es", "de", "fr", "pt", "it", "hi", "ja", "ko", "ru", "ar", "id",
];

#[derive(Clone)]
pub struct TranscriptService {
    api: YouTubeTranscriptApi,
}

impl TranscriptService {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::network(format!("failed to initialize transcript client: {e}")))?;
        Ok(Self { api })
    }

    /// Fetch the transcript for a video URL as ordered segments.
    ///
    /// Tries the preferred languages first, then falls back to a broad
    /// built-in list. A single failed attempt per list; no retries.
    pub async fn fetch(
        &self,
        video_url: &str,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>> {
        let video_id = extract_video_id(video_url)?;
        let preferred: Vec<&str> = languages.iter().map(|s| s.as_str()).collect();

        let transcript = match self.api.fetch_transcript(&video_id, &preferred, false).await {
            Ok(transcript) => transcript,
            Err(first) => {
                // Only a missing transcript warrants the language fallback;
                // an unavailable video fails the same way in every language.
                match classify_fetch_failure(&video_id, &first.to_string()) {
                    Error::NotFound { .. } => self
                        .api
                        .fetch_transcript(&video_id, FALLBACK_LANGUAGES, false)
                        .await
                        .map_err(|e| classify_fetch_failure(&video_id, &e.to_string()))?,
                    other => return Err(other),
                }
            }
        };

        let segments: Vec<TranscriptSegment> = transcript
            .snippets
            .iter()
            .map(|snippet| TranscriptSegment {
                text: html_escape::decode_html_entities(snippet.text.trim()).into_owned(),
                start: snippet.start,
                duration: snippet.duration,
            })
            .filter(|segment| !segment.text.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(Error::not_found(format!(
                "No transcript available for video {video_id}. Try a video with subtitles enabled."
            )));
        }

        Ok(segments)
    }
}

/// Map a transcript fetch failure onto the error kinds callers act on.
/// The underlying client only exposes a rendered message, so this keys
/// off the phrases it uses for each failure class.
fn classify_fetch_failure(video_id: &str, message: &str) -> Error {
    let lower = message.to_lowercase();
    if lower.contains("unavailable") || lower.contains("private") || lower.contains("removed") {
        Error::unavailable(format!("video {video_id} is private or removed"))
    } else if lower.contains("no transcript")
        || lower.contains("disabled")
        || lower.contains("not found")
        || lower.contains("no captions")
    {
        Error::not_found(format!(
            "No transcript available for video {video_id}. Try a video with subtitles enabled."
        ))
    } else {
        Error::network(format!(
            "failed to fetch transcript for {video_id}: {message}"
        ))
    }
}

pub fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1_000;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

const VIDEO_ID_LEN: usize = 11;

/// Extract the 11-character video identifier from common YouTube URL
/// shapes, or accept a bare identifier.
pub fn extract_video_id(url: &str) -> Result<String> {
    let trimmed = url.trim();

    let raw_id = if let Some(v_param) = split_after(trimmed, "v=") {
        v_param
    } else if let Some(rest) = split_after(trimmed, "youtu.be/") {
        rest
    } else if let Some(rest) = split_after(trimmed, "/shorts/") {
        rest
    } else if let Some(rest) = split_after(trimmed, "/embed/") {
        rest
    } else if let Some(rest) = split_after(trimmed, "/v/") {
        rest
    } else {
        trimmed
    };

    // The id runs until the first URL delimiter.
    let candidate = raw_id.split(['&', '?', '#', '/']).next().unwrap_or(raw_id);

    sanitize_video_id(candidate)
}

fn split_after<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    url.split(marker).nth(1)
}

/// Ensure a video identifier is safe for downstream use (API calls,
/// filesystem paths). Exactly 11 ASCII alphanumeric / `_` / `-` chars.
pub fn sanitize_video_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    if trimmed.len() != VIDEO_ID_LEN
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(Error::invalid_input(
            "not a valid YouTube URL or 11-character video ID",
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{extract_video_id, format_timestamp, sanitize_video_id};

    #[test]
    fn extracts_from_watch_url() {
        let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").expect("valid");
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn extracts_from_watch_url_with_extra_params() {
        let id =
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").expect("valid");
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn extracts_from_short_url() {
        let id = extract_video_id("https://youtu.be/dQw4w9WgXcQ?feature=shared").expect("valid");
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn extracts_from_shorts_url() {
        let id = extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ").expect("valid");
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn accepts_bare_id() {
        let id = extract_video_id("dQw4w9WgXcQ").expect("valid");
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn rejects_malformed_url() {
        assert!(matches!(
            extract_video_id("not-a-url"),
            Err(crate::error::Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn rejects_empty() {
        assert!(extract_video_id("   ").is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(sanitize_video_id("short").is_err());
        assert!(sanitize_video_id("waytoolongtobeavideoid").is_err());
    }

    #[test]
    fn rejects_invalid_chars() {
        assert!(sanitize_video_id("abc/../etc!").is_err());
    }

    #[test]
    fn formats_timestamps() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(75.4), "01:15");
        assert_eq!(format_timestamp(3600.0), "01:00:00");
    }
}
