use serde::Serialize;

use crate::core::analyzer::AnalyzedSegment;
use crate::core::sentiment::Sentiment;

pub const TOP_KEYWORD_LIMIT: usize = 10;

/// Aggregate view over one set of analyzed segments. Recomputed on
/// demand, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub overall_sentiment: Sentiment,
    /// Counts in first-seen order of the sentiment values.
    pub sentiment_distribution: Vec<(Sentiment, usize)>,
    pub positive_aspects: Vec<String>,
    pub negative_aspects: Vec<String>,
    /// At most `TOP_KEYWORD_LIMIT` entries, by descending frequency;
    /// ties keep first-seen order.
    pub top_keywords: Vec<(String, usize)>,
    pub total_segments: usize,
    pub summary_text: String,
}

pub fn summarize(segments: &[AnalyzedSegment]) -> Summary {
    let mut distribution: Vec<(Sentiment, usize)> = Vec::new();
    for segment in segments {
        match distribution
            .iter_mut()
            .find(|(sentiment, _)| *sentiment == segment.sentiment)
        {
            Some((_, count)) => *count += 1,
            None => distribution.push((segment.sentiment, 1)),
        }
    }

    // Ties go to the first-encountered sentiment; empty input is neutral.
    let mut overall_sentiment = Sentiment::Neutral;
    let mut best = 0usize;
    for (sentiment, count) in &distribution {
        if *count > best {
            best = *count;
            overall_sentiment = *sentiment;
        }
    }

    let top_keywords = count_keywords(segments.iter().flat_map(|s| s.keywords.iter()));

    let mut positive_aspects = Vec::new();
    let mut negative_aspects = Vec::new();
    for segment in segments {
        for aspect in &segment.good_aspect {
            push_unique(&mut positive_aspects, aspect);
        }
        for aspect in &segment.bad_aspect {
            push_unique(&mut negative_aspects, aspect);
        }
    }

    let summary_text = render_summary_text(
        segments.len(),
        overall_sentiment,
        &distribution,
        &top_keywords,
        &positive_aspects,
        &negative_aspects,
    );

    Summary {
        overall_sentiment,
        sentiment_distribution: distribution,
        positive_aspects,
        negative_aspects,
        top_keywords,
        total_segments: segments.len(),
        summary_text,
    }
}

/// Frequency table of the keywords from segments with the given
/// sentiment. Drives the per-sentiment dashboard charts and word clouds.
pub fn top_keywords_for(
    segments: &[AnalyzedSegment],
    sentiment: Sentiment,
    limit: usize,
) -> Vec<(String, usize)> {
    let mut counts = count_all_keywords(
        segments
            .iter()
            .filter(|s| s.sentiment == sentiment)
            .flat_map(|s| s.keywords.iter()),
    );
    counts.truncate(limit);
    counts
}

fn count_keywords<'a>(keywords: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts = count_all_keywords(keywords);
    counts.truncate(TOP_KEYWORD_LIMIT);
    counts
}

fn count_all_keywords<'a>(keywords: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for keyword in keywords {
        match counts.iter_mut().find(|(k, _)| k == keyword) {
            Some((_, count)) => *count += 1,
            None => counts.push((keyword.clone(), 1)),
        }
    }
    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

fn render_summary_text(
    total: usize,
    overall: Sentiment,
    distribution: &[(Sentiment, usize)],
    top_keywords: &[(String, usize)],
    positive_aspects: &[String],
    negative_aspects: &[String],
) -> String {
    if total == 0 {
        return "No segments analyzed yet.".to_string();
    }

    let count_of = |wanted: Sentiment| {
        distribution
            .iter()
            .find(|(sentiment, _)| *sentiment == wanted)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    };

    let keywords = if top_keywords.is_empty() {
        "none".to_string()
    } else {
        top_keywords
            .iter()
            .map(|(keyword, count)| format!("{keyword} ({count})"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut text = format!(
        "Analyzed {total} segments; overall sentiment is {overall}.\n\
         Positive: {} | Negative: {} | Neutral: {}\n\
         Top keywords: {keywords}",
        count_of(Sentiment::Positive),
        count_of(Sentiment::Negative),
        count_of(Sentiment::Neutral),
    );

    if !positive_aspects.is_empty() {
        text.push_str(&format!("\nPraised: {}", positive_aspects.join(", ")));
    }
    if !negative_aspects.is_empty() {
        text.push_str(&format!("\nCriticized: {}", negative_aspects.join(", ")));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn segment(sentiment: Sentiment, keywords: &[&str]) -> AnalyzedSegment {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_string()).collect();
        AnalyzedSegment {
            video_url: "url".to_string(),
            video_title: "title".to_string(),
            start_time: 0.0,
            end_time: 1.0,
            text: "text".to_string(),
            sentiment,
            good_aspect: if sentiment == Sentiment::Positive {
                keywords.clone()
            } else {
                Vec::new()
            },
            bad_aspect: if sentiment == Sentiment::Negative {
                keywords.clone()
            } else {
                Vec::new()
            },
            keywords,
            product_name: "Widget".to_string(),
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_input_summarizes_without_failing() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_segments, 0);
        assert!(summary.top_keywords.is_empty());
        assert!(summary.sentiment_distribution.is_empty());
        assert_eq!(summary.overall_sentiment, Sentiment::Neutral);
    }

    #[test]
    fn counts_sentiments_and_picks_majority() {
        let segments = vec![
            segment(Sentiment::Positive, &["battery"]),
            segment(Sentiment::Positive, &["screen"]),
            segment(Sentiment::Negative, &["price"]),
        ];

        let summary = summarize(&segments);
        assert_eq!(summary.overall_sentiment, Sentiment::Positive);
        assert_eq!(
            summary.sentiment_distribution,
            vec![(Sentiment::Positive, 2), (Sentiment::Negative, 1)]
        );
        assert_eq!(summary.total_segments, 3);
    }

    #[test]
    fn sentiment_tie_goes_to_first_seen() {
        let segments = vec![
            segment(Sentiment::Negative, &[]),
            segment(Sentiment::Positive, &[]),
        ];
        assert_eq!(summarize(&segments).overall_sentiment, Sentiment::Negative);
    }

    #[test]
    fn top_keywords_order_and_tie_break() {
        let segments = vec![
            segment(Sentiment::Neutral, &["screen", "battery"]),
            segment(Sentiment::Neutral, &["battery", "camera"]),
            segment(Sentiment::Neutral, &["battery", "screen"]),
        ];

        let summary = summarize(&segments);
        // battery 3, then screen before camera: both seen, screen first.
        assert_eq!(
            summary.top_keywords,
            vec![
                ("battery".to_string(), 3),
                ("screen".to_string(), 2),
                ("camera".to_string(), 1)
            ]
        );
    }

    #[test]
    fn top_keywords_capped_at_limit() {
        let keywords: Vec<String> = (0..15).map(|i| format!("keyword{i}")).collect();
        let refs: Vec<&str> = keywords.iter().map(|k| k.as_str()).collect();
        let summary = summarize(&[segment(Sentiment::Neutral, &refs)]);
        assert_eq!(summary.top_keywords.len(), TOP_KEYWORD_LIMIT);
    }

    #[test]
    fn aspect_unions_are_deduplicated() {
        let segments = vec![
            segment(Sentiment::Positive, &["battery", "screen"]),
            segment(Sentiment::Positive, &["battery"]),
            segment(Sentiment::Negative, &["price"]),
        ];

        let summary = summarize(&segments);
        assert_eq!(summary.positive_aspects, vec!["battery", "screen"]);
        assert_eq!(summary.negative_aspects, vec!["price"]);
    }

    #[test]
    fn per_sentiment_keyword_tally() {
        let segments = vec![
            segment(Sentiment::Positive, &["battery"]),
            segment(Sentiment::Positive, &["battery", "screen"]),
            segment(Sentiment::Negative, &["battery", "price"]),
        ];

        let positive = top_keywords_for(&segments, Sentiment::Positive, 10);
        assert_eq!(
            positive,
            vec![("battery".to_string(), 2), ("screen".to_string(), 1)]
        );

        let negative = top_keywords_for(&segments, Sentiment::Negative, 10);
        assert_eq!(
            negative,
            vec![("battery".to_string(), 1), ("price".to_string(), 1)]
        );
    }

    #[test]
    fn summary_text_mentions_counts() {
        let segments = vec![segment(Sentiment::Positive, &["battery"])];
        let summary = summarize(&segments);
        assert!(summary.summary_text.contains("Analyzed 1 segments"));
        assert!(summary.summary_text.contains("positive"));
        assert!(summary.summary_text.contains("battery"));
    }
}
