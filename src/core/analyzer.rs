use std::collections::HashSet;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::keywords::KeywordExtractor;
use crate::core::sentiment::{Sentiment, SentimentAnalyzer};
use crate::core::transcript::TranscriptSegment;

/// Trigger words gating aspect extraction, matched case-insensitively
/// against the raw segment text.
pub const POSITIVE_TRIGGERS: &[&str] = &["love", "great", "amazing", "easy", "best"];
pub const NEGATIVE_TRIGGERS: &[&str] = &["problem", "difficult", "bad", "worst", "issue"];

/// Placeholder title until the metadata fetch for the run succeeds.
pub const UNKNOWN_TITLE: &str = "N/A";

/// Broader dashboard stop-word list, applied on top of the extractor's
/// own filtering; the net exclusions are the union of both lists.
static DASHBOARD_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "people",
        "thing",
        "it",
        "they",
        "he",
        "she",
        "we",
        "you",
        "i",
        "the",
        "a",
        "an",
        "this",
        "that",
        "these",
        "those",
        "here",
        "there",
        "be",
        "have",
        "do",
        "say",
        "go",
        "will",
        "would",
        "can",
        "could",
        "may",
        "might",
        "should",
        "get",
        "make",
        "know",
        "think",
        "take",
        "see",
        "come",
        "look",
        "use",
        "one",
        "two",
        "three",
        "four",
        "five",
        "year",
        "years",
        "month",
        "months",
        "day",
        "days",
        "time",
        "lot",
        "bit",
        "kind",
        "sort",
        "way",
        "something",
        "anything",
        "everything",
        "nothing",
        "someone",
        "anyone",
        "everyone",
        "noone",
        "well",
        "really",
        "very",
        "pretty",
        "quite",
        "just",
        "even",
        "still",
        "however",
        "also",
        "too",
        "much",
        "many",
        "good",
        "bad",
        "overall",
        "experience",
        "feel",
        "seem",
    ]
    .into_iter()
    .collect()
});

/// One transcript segment annotated with sentiment, keywords and product
/// aspects. Created once per analysis run, appended to the store, never
/// mutated afterwards (`video_title` back-fill happens before the append).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSegment {
    pub video_url: String,
    pub video_title: String,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    pub sentiment: Sentiment,
    pub keywords: Vec<String>,
    pub good_aspect: Vec<String>,
    pub bad_aspect: Vec<String>,
    pub product_name: String,
    pub analyzed_at: DateTime<Utc>,
}

pub fn dashboard_filter(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .filter(|keyword| !DASHBOARD_STOP_WORDS.contains(keyword.as_str()))
        .collect()
}

/// The per-segment pipeline: sentiment, filtered keywords, aspect gating.
/// A pure function of its inputs apart from the `analyzed_at` stamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentAnalyzer {
    sentiment: SentimentAnalyzer,
    keywords: KeywordExtractor,
}

impl SegmentAnalyzer {
    pub fn new() -> Self {
        Self {
            sentiment: SentimentAnalyzer::new(),
            keywords: KeywordExtractor::new(),
        }
    }

    pub fn analyze(
        &self,
        segment: &TranscriptSegment,
        product_name: &str,
        video_url: &str,
    ) -> AnalyzedSegment {
        let sentiment = self.sentiment.classify(&segment.text);
        let keywords = dashboard_filter(self.keywords.extract(&segment.text));
        let lower = segment.text.to_lowercase();

        let good_aspect = if sentiment == Sentiment::Positive
            && POSITIVE_TRIGGERS.iter().any(|word| lower.contains(word))
        {
            keywords.clone()
        } else {
            Vec::new()
        };

        let bad_aspect = if sentiment == Sentiment::Negative
            && NEGATIVE_TRIGGERS.iter().any(|word| lower.contains(word))
        {
            keywords.clone()
        } else {
            Vec::new()
        };

        AnalyzedSegment {
            video_url: video_url.to_string(),
            video_title: UNKNOWN_TITLE.to_string(),
            start_time: segment.start,
            end_time: segment.end(),
            text: segment.text.clone(),
            sentiment,
            keywords,
            good_aspect,
            bad_aspect,
            product_name: product_name.trim().to_string(),
            analyzed_at: Utc::now(),
        }
    }

    pub fn analyze_all(
        &self,
        segments: &[TranscriptSegment],
        product_name: &str,
        video_url: &str,
    ) -> Vec<AnalyzedSegment> {
        segments
            .iter()
            .map(|segment| self.analyze(segment, product_name, video_url))
            .collect()
    }
}

/// Joins the video title in after a successful metadata fetch.
pub fn backfill_title(segments: &mut [AnalyzedSegment], title: &str) {
    for segment in segments {
        segment.video_title = title.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start: 12.0,
            duration: 3.5,
        }
    }

    #[test]
    fn positive_trigger_fills_good_aspect() {
        let analyzer = SegmentAnalyzer::new();
        let analyzed = analyzer.analyze(
            &segment("This product is absolutely amazing and easy to use"),
            "Widget",
            "https://youtu.be/dQw4w9WgXcQ",
        );

        assert_eq!(analyzed.sentiment, Sentiment::Positive);
        assert!(!analyzed.good_aspect.is_empty());
        assert!(analyzed.bad_aspect.is_empty());
        assert!(analyzed.keywords.contains(&"product".to_string()));
        // "use" sits on the dashboard stop list.
        assert!(!analyzed.keywords.contains(&"use".to_string()));
        assert_eq!(analyzed.good_aspect, analyzed.keywords);
    }

    #[test]
    fn negative_trigger_fills_bad_aspect() {
        let analyzer = SegmentAnalyzer::new();
        let analyzed = analyzer.analyze(
            &segment("This had a terrible problem and was the worst purchase"),
            "Widget",
            "https://youtu.be/dQw4w9WgXcQ",
        );

        assert_eq!(analyzed.sentiment, Sentiment::Negative);
        assert!(!analyzed.bad_aspect.is_empty());
        assert!(analyzed.good_aspect.is_empty());
        assert!(analyzed.bad_aspect.contains(&"problem".to_string()));
    }

    #[test]
    fn positive_sentiment_without_trigger_keeps_aspects_empty() {
        let analyzer = SegmentAnalyzer::new();
        let analyzed = analyzer.analyze(
            &segment("the camera is excellent and reliable"),
            "Widget",
            "https://youtu.be/dQw4w9WgXcQ",
        );

        assert_eq!(analyzed.sentiment, Sentiment::Positive);
        assert!(analyzed.good_aspect.is_empty());
        assert!(analyzed.bad_aspect.is_empty());
    }

    #[test]
    fn neutral_segment_has_no_aspects() {
        let analyzer = SegmentAnalyzer::new();
        let analyzed = analyzer.analyze(
            &segment("unboxing the widget on a rainy afternoon"),
            "Widget",
            "https://youtu.be/dQw4w9WgXcQ",
        );

        assert_eq!(analyzed.sentiment, Sentiment::Neutral);
        assert!(analyzed.good_aspect.is_empty());
        assert!(analyzed.bad_aspect.is_empty());
    }

    #[test]
    fn analysis_is_idempotent_modulo_timestamp() {
        let analyzer = SegmentAnalyzer::new();
        let input = segment("battery life is great, I love it");
        let url = "https://youtu.be/dQw4w9WgXcQ";

        let mut first = analyzer.analyze(&input, "Widget", url);
        let second = analyzer.analyze(&input, "Widget", url);

        first.analyzed_at = second.analyzed_at;
        assert_eq!(first, second);
    }

    #[test]
    fn product_name_is_trimmed() {
        let analyzer = SegmentAnalyzer::new();
        let analyzed = analyzer.analyze(&segment("fine"), "  Widget ", "url");
        assert_eq!(analyzed.product_name, "Widget");
    }

    #[test]
    fn segment_times_carry_over() {
        let analyzer = SegmentAnalyzer::new();
        let analyzed = analyzer.analyze(&segment("fine"), "Widget", "url");
        assert_eq!(analyzed.start_time, 12.0);
        assert_eq!(analyzed.end_time, 15.5);
        assert_eq!(analyzed.video_title, UNKNOWN_TITLE);
    }

    #[test]
    fn backfill_replaces_placeholder_titles() {
        let analyzer = SegmentAnalyzer::new();
        let mut segments = analyzer.analyze_all(
            &[segment("fine"), segment("also fine")],
            "Widget",
            "url",
        );

        backfill_title(&mut segments, "Widget Review 2024");
        assert!(segments
            .iter()
            .all(|s| s.video_title == "Widget Review 2024"));
    }
}
