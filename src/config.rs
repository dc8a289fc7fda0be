//! Ranker configuration.
//!
//! Field names follow the snake_case settings; the upper-case aliases let a
//! site generator hand its settings object over unchanged.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_RELATED_POSTS: usize = 5;
pub const DEFAULT_MIN_TOKEN_COUNT: u64 = 2;
pub const DEFAULT_NUM_TOPICS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Result cap per document
    #[serde(alias = "MAX_RELATED_POSTS")]
    pub max_related_posts: usize,

    /// Minimum document frequency for a token to stay in the vocabulary
    #[serde(alias = "MIN_TOKEN_COUNT")]
    pub min_token_count: u64,

    /// Rank of the topic space
    #[serde(alias = "NUM_TOPICS")]
    pub num_topics: usize,

    /// Tokens always excluded. `None` uses the English list of the
    /// `stop-words` crate.
    #[serde(alias = "STOP_WORDS")]
    pub stop_words: Option<Vec<String>>,

    /// Re-weight bag-of-words counts by inverse document frequency
    #[serde(alias = "USE_TFIDF")]
    pub use_tfidf: bool,

    /// Lower-case text before tokenizing
    #[serde(alias = "LOWERCASE")]
    pub lowercase: bool,

    /// Neighbours whose identifier contains any of these substrings are
    /// dropped before truncation (e.g. `"pages"`)
    #[serde(alias = "EXCLUDE_PATTERNS")]
    pub exclude_patterns: Vec<String>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            max_related_posts: DEFAULT_MAX_RELATED_POSTS,
            min_token_count: DEFAULT_MIN_TOKEN_COUNT,
            num_topics: DEFAULT_NUM_TOPICS,
            stop_words: None,
            use_tfidf: true,
            lowercase: true,
            exclude_patterns: Vec::new(),
        }
    }
}

impl RankerConfig {
    /// Parse settings from JSON. Unknown keys are ignored so a whole
    /// generator settings object can be passed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            return Err(Error::Config("num_topics must be at least 1".to_string()));
        }
        if self.exclude_patterns.iter().any(|p| p.is_empty()) {
            return Err(Error::Config(
                "exclude_patterns must not contain an empty pattern".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved stop-word set
    pub fn stop_word_set(&self) -> HashSet<String> {
        match &self.stop_words {
            Some(words) => words.iter().cloned().collect(),
            None => get(LANGUAGE::English).into_iter().collect(),
        }
    }

    pub fn with_max_related_posts(mut self, max: usize) -> Self {
        self.max_related_posts = max;
        self
    }

    pub fn with_min_token_count(mut self, min: u64) -> Self {
        self.min_token_count = min;
        self
    }

    pub fn with_num_topics(mut self, k: usize) -> Self {
        self.num_topics = k;
        self
    }

    pub fn with_stop_words<T: AsRef<str>>(mut self, words: &[T]) -> Self {
        self.stop_words = Some(words.iter().map(|w| w.as_ref().to_string()).collect());
        self
    }

    pub fn with_tfidf(mut self, use_tfidf: bool) -> Self {
        self.use_tfidf = use_tfidf;
        self
    }

    pub fn with_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }
}
