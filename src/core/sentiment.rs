use std::collections::HashSet;

use derive_more::Display;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Three-way sentiment label derived from a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[display("positive")]
    Positive,
    #[display("negative")]
    Negative,
    #[display("neutral")]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Polarity past this magnitude flips the label away from neutral.
/// A score of exactly +/-0.1 stays neutral.
pub const POLARITY_THRESHOLD: f64 = 0.1;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "amazing",
        "awesome",
        "beautiful",
        "best",
        "better",
        "brilliant",
        "comfortable",
        "convenient",
        "durable",
        "easy",
        "effective",
        "efficient",
        "enjoy",
        "enjoyed",
        "excellent",
        "fantastic",
        "fast",
        "favorite",
        "flawless",
        "fun",
        "good",
        "great",
        "happy",
        "helpful",
        "impressed",
        "impressive",
        "incredible",
        "intuitive",
        "love",
        "loved",
        "loves",
        "nice",
        "outstanding",
        "perfect",
        "pleasant",
        "powerful",
        "premium",
        "recommend",
        "recommended",
        "reliable",
        "responsive",
        "satisfied",
        "sleek",
        "smooth",
        "solid",
        "sturdy",
        "superb",
        "wonderful",
        "worth",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "annoying",
        "awful",
        "bad",
        "broke",
        "broken",
        "buggy",
        "cheap",
        "clunky",
        "crash",
        "crashed",
        "defective",
        "difficult",
        "disappointed",
        "disappointing",
        "fail",
        "failed",
        "fails",
        "faulty",
        "flaw",
        "flawed",
        "flimsy",
        "fragile",
        "frustrating",
        "glitch",
        "hate",
        "hated",
        "horrible",
        "issue",
        "issues",
        "lag",
        "laggy",
        "mediocre",
        "overpriced",
        "poor",
        "problem",
        "problems",
        "refund",
        "regret",
        "returned",
        "slow",
        "terrible",
        "trouble",
        "unreliable",
        "unusable",
        "useless",
        "waste",
        "worse",
        "worst",
        "wrong",
    ]
    .into_iter()
    .collect()
});

// Contraction stems ("isn't" tokenizes to "isn") carry the negation.
static NEGATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "no", "not", "never", "neither", "nor", "without", "hardly", "barely", "isn", "wasn",
        "aren", "weren", "don", "doesn", "didn", "couldn", "wouldn", "shouldn", "ain",
    ]
    .into_iter()
    .collect()
});

/// Lexicon-based polarity classifier. Total: every input maps to exactly
/// one label, no failure path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Scalar polarity in [-1, 1]: the signed balance of lexicon hits
    /// over all hits. A negator directly before a hit flips its sign.
    /// Text with no lexicon hits scores 0.
    pub fn polarity(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let mut positive = 0u32;
        let mut negative = 0u32;
        let mut negated = false;

        for token in lower
            .split(|c: char| !c.is_alphabetic())
            .filter(|t| !t.is_empty())
        {
            if NEGATORS.contains(token) {
                negated = true;
                continue;
            }

            let sign = if POSITIVE_WORDS.contains(token) {
                Some(1i32)
            } else if NEGATIVE_WORDS.contains(token) {
                Some(-1i32)
            } else {
                None
            };

            if let Some(sign) = sign {
                let sign = if negated { -sign } else { sign };
                if sign > 0 {
                    positive += 1;
                } else {
                    negative += 1;
                }
            }
            negated = false;
        }

        let total = positive + negative;
        if total == 0 {
            return 0.0;
        }
        (positive as f64 - negative as f64) / total as f64
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        let polarity = self.polarity(text);
        if polarity > POLARITY_THRESHOLD {
            Sentiment::Positive
        } else if polarity < -POLARITY_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Sentiment, SentimentAnalyzer};

    fn repeated(word: &str, count: usize) -> String {
        vec![word; count].join(" ")
    }

    #[test]
    fn classifies_positive_review() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(
            analyzer.classify("This product is absolutely amazing and easy to use"),
            Sentiment::Positive
        );
    }

    #[test]
    fn classifies_negative_review() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(
            analyzer.classify("This had a terrible problem and was the worst purchase"),
            Sentiment::Negative
        );
    }

    #[test]
    fn empty_and_unknown_text_are_neutral() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.classify(""), Sentiment::Neutral);
        assert_eq!(analyzer.classify("the quick brown fox"), Sentiment::Neutral);
    }

    #[test]
    fn non_ascii_text_is_handled() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.classify("これは素晴らしい製品です"), Sentiment::Neutral);
    }

    #[test]
    fn very_long_text_is_handled() {
        let analyzer = SentimentAnalyzer::new();
        let text = repeated("great", 50_000);
        assert_eq!(analyzer.classify(&text), Sentiment::Positive);
    }

    #[test]
    fn threshold_boundary_is_neutral() {
        let analyzer = SentimentAnalyzer::new();

        // 11 positive / 9 negative hits: polarity = 2/20 = 0.1 exactly.
        let boundary = format!("{} {}", repeated("great", 11), repeated("bad", 9));
        assert_eq!(analyzer.polarity(&boundary), 0.1);
        assert_eq!(analyzer.classify(&boundary), Sentiment::Neutral);

        // 12 / 8 crosses it: polarity = 4/20 = 0.2.
        let above = format!("{} {}", repeated("great", 12), repeated("bad", 8));
        assert_eq!(analyzer.classify(&above), Sentiment::Positive);

        let mirror = format!("{} {}", repeated("great", 9), repeated("bad", 11));
        assert_eq!(analyzer.classify(&mirror), Sentiment::Neutral);

        let below = format!("{} {}", repeated("great", 8), repeated("bad", 12));
        assert_eq!(analyzer.classify(&below), Sentiment::Negative);
    }

    #[test]
    fn negator_flips_adjacent_hit() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.classify("not great"), Sentiment::Negative);
        assert_eq!(analyzer.classify("never disappointing"), Sentiment::Positive);
    }

    #[test]
    fn determinism() {
        let analyzer = SentimentAnalyzer::new();
        let text = "mostly great but the battery is a problem";
        assert_eq!(analyzer.polarity(text), analyzer.polarity(text));
    }
}
