//! This crate ranks blog posts by topic similarity (TF-IDF + LSI + cosine)
//! to produce "related posts" lists.

pub mod config;
pub mod error;
pub mod ranker;
pub mod utils;

pub use error::{Error, Result};

/// Similarity Ranker
/// The top-level struct of this crate.
/// It turns a corpus of documents into ranked neighbour lists:
/// tokenize -> filtered vocabulary -> bag of words -> TF-IDF -> LSI topic
/// space -> pairwise cosine similarity.
///
/// Everything is rebuilt on every call; nothing is persisted between runs.
///
/// `SimilarityRanker<E>` has one generic parameter:
/// - `E`: weighting engine (e.g., `DefaultTFIDFEngine`)
///
/// # Examples
/// ```
/// use related_posts::{Document, RankerConfig, SimilarityRanker};
///
/// let config = RankerConfig::default()
///     .with_min_token_count(1)
///     .with_num_topics(2)
///     .with_stop_words(&["are"]);
/// let ranker: SimilarityRanker = SimilarityRanker::new(config).unwrap();
/// let docs = vec![
///     Document::new("a", "cats are great pets"),
///     Document::new("b", "dogs are great pets"),
///     Document::new("c", "stock market rallies today"),
/// ];
/// let related = ranker.related_posts(&docs);
/// assert_eq!(related.related("a")[0].id, "b");
/// ```
pub use ranker::SimilarityRanker;

/// Input document: identifier, text and optional tags
pub use ranker::Document;

/// Intermediate results of one run (vocabulary, IDF, topic model, vectors)
pub use ranker::Analysis;

/// Ranker configuration
/// `max_related_posts`, `min_token_count`, `num_topics`, `stop_words`,
/// `use_tfidf`, `lowercase` and `exclude_patterns`.
/// Deserializable from a generator settings object (upper-case keys work).
pub use config::RankerConfig;

/// Tokenizer and per-document Token Frequency
/// - `Tokenizer`: lower-cased `\w+` runs by default
/// - `TokenFrequency`: token counts of one document, first-seen order
pub use ranker::token::{TokenFrequency, Tokenizer};

/// Corpus vocabulary with document frequencies and dense ids
pub use ranker::vocabulary::Vocabulary;

/// TF IDF Calculation Engine Trait
/// A trait that defines how bag-of-words counts are weighted before topic
/// reduction.
///
/// By implementing this trait, you can plug different weighting strategies
/// into `SimilarityRanker<E>`.
/// `DefaultTFIDFEngine` performs log2 IDF weighting with L2 normalisation;
/// `RawCountEngine` leaves counts untouched.
pub use ranker::tfidf::{DefaultTFIDFEngine, IDFVector, RawCountEngine, TFIDFEngine};

/// LSI topic model and topic descriptions
pub use ranker::topic::{Topic, TopicModel};

/// Ranking results
/// - `Rankings`: full ranked neighbour list per document
/// - `Neighbor`: one (identifier, score) entry
pub use ranker::evaluate::scoring::{Neighbor, Rankings};

/// Selection of related posts
/// - `RelatedPosts`: capped lists plus score lookup, as consumed by templates
/// - `IdentifierFilter`: drops non-article identifiers before truncation
/// - `DocumentLookup`: the caller's set of resolvable identifiers
/// - `RankWarning`: recoverable problems (unresolvable neighbours)
pub use ranker::evaluate::related::{DocumentLookup, IdentifierFilter, RankWarning, RelatedPosts};
