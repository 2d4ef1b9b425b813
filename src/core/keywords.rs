use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Function words dropped at extraction time. A second, larger list is
/// applied by the segment analyzer before keywords reach the dashboard.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "your", "our", "was", "were", "has",
        "have", "had", "this", "that", "these", "those", "with", "from", "they", "them", "their",
        "there", "here", "what", "when", "where", "which", "who", "whom", "will", "would", "can",
        "could", "may", "might", "should", "its", "his", "her", "him", "she", "out", "about",
        "into", "over", "under", "again", "then", "than", "too", "very", "just", "because",
        "been", "being", "does", "did", "doing", "how", "all", "any", "both", "each", "few",
        "more", "most", "other", "some", "such", "only", "own", "same", "now", "get", "got",
        "per",
    ]
    .into_iter()
    .collect()
});

const MIN_TOKEN_LEN: usize = 3;

/// Normalizes free text into unique keyword tokens: lower-cased,
/// punctuation stripped, short tokens and stop words dropped.
/// Deterministic, first-occurrence order, infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();

        for raw in lower.split_whitespace() {
            let token: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();
            if token.chars().count() < MIN_TOKEN_LEN || STOP_WORDS.contains(token.as_str()) {
                continue;
            }
            if seen.insert(token.clone()) {
                keywords.push(token);
            }
        }

        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::{KeywordExtractor, STOP_WORDS};

    #[test]
    fn lowercases_and_strips_punctuation() {
        let extractor = KeywordExtractor::new();
        assert_eq!(
            extractor.extract("The Battery, LIFE (amazing!)"),
            vec!["battery", "life", "amazing"]
        );
    }

    #[test]
    fn drops_short_tokens_and_stop_words() {
        let extractor = KeywordExtractor::new();
        let keywords = extractor.extract("it is the best camera on a phone");
        assert_eq!(keywords, vec!["best", "camera", "phone"]);
        for keyword in &keywords {
            assert!(keyword.chars().count() > 2);
            assert!(!STOP_WORDS.contains(keyword.as_str()));
        }
    }

    #[test]
    fn collapses_duplicates_keeping_first_occurrence() {
        let extractor = KeywordExtractor::new();
        assert_eq!(
            extractor.extract("screen glare screen brightness glare"),
            vec!["screen", "glare", "brightness"]
        );
    }

    #[test]
    fn is_deterministic() {
        let extractor = KeywordExtractor::new();
        let text = "battery life and screen quality, battery again";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }

    #[test]
    fn empty_text_yields_empty_set() {
        let extractor = KeywordExtractor::new();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("a an it").is_empty());
    }
}
