use std::env;
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const STORE_PATH_ENV: &str = "REVU_STORE_PATH";
pub const LANGUAGES_ENV: &str = "REVU_LANGUAGES";

const DEFAULT_STORE_PATH: &str = "reviews/segment_reviews.json";
const DEFAULT_LANGUAGES: &str = "en,es";

/// Runtime settings resolved once at startup from the environment
/// (`.env` is loaded by `main` before this runs).
#[derive(Debug, Clone)]
pub struct Settings {
    /// YouTube Data API credential. Optional: the pipeline still runs
    /// without it, video titles just stay "N/A".
    pub api_key: Option<String>,
    pub store_path: PathBuf,
    pub languages: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let store_path = env::var(STORE_PATH_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));

        let languages = env::var(LANGUAGES_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGES.to_string());

        Self {
            api_key,
            store_path,
            languages: parse_languages(&languages),
        }
    }
}

pub fn parse_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_languages;

    #[test]
    fn splits_and_trims() {
        assert_eq!(parse_languages("en, es ,de"), vec!["en", "es", "de"]);
    }

    #[test]
    fn drops_empty_entries() {
        assert_eq!(parse_languages("en,,es,"), vec!["en", "es"]);
    }
}
