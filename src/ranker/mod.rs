pub mod evaluate;
pub mod tfidf;
pub mod token;
pub mod topic;
pub mod vocabulary;

use std::{
    collections::{BTreeSet, HashSet},
    marker::PhantomData,
};

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn, Level};

use crate::{
    config::RankerConfig,
    error::Result,
    ranker::{
        evaluate::{
            related::{IdentifierFilter, RelatedPosts},
            scoring::Rankings,
        },
        tfidf::{DefaultTFIDFEngine, IDFVector, RawCountEngine, TFIDFEngine},
        token::{TokenFrequency, Tokenizer},
        topic::TopicModel,
        vocabulary::Vocabulary,
    },
    utils::math::vector::ZeroSpVec,
};

/// Terms listed per topic in the debug log
const LOGGED_TOPIC_TERMS: usize = 8;

/// Input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// unique, stable identifier (source path, slug, ...)
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            tags: BTreeSet::new(),
        }
    }

    /// Document from raw bytes. Invalid UTF-8 degrades to empty text.
    pub fn from_utf8(id: impl Into<String>, bytes: &[u8]) -> Self {
        let id = id.into();
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(err) => {
                warn!(
                    document = %id,
                    error = %err,
                    "document text is not valid UTF-8, treating as empty"
                );
                String::new()
            }
        };
        Self::new(id, text)
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// Everything one ranking run computes, kept for inspection
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// identifiers, corpus order, unique
    pub ids: Vec<String>,
    pub vocabulary: Vocabulary,
    pub idf: IDFVector,
    /// weighted document vectors, same order as `ids`
    pub vectors: Vec<ZeroSpVec<f64>>,
    pub model: TopicModel,
    /// topic-space vectors, same order as `ids`
    pub topic_vectors: Vec<Vec<f64>>,
}

impl Analysis {
    pub fn rankings(&self) -> Rankings {
        Rankings::from_topic_vectors(&self.ids, &self.topic_vectors)
    }
}

/// Similarity Ranker
/// Ranks every document of a corpus against every other one by topic
/// similarity.
///
/// The pipeline is rebuilt from scratch on every call:
/// tokenize -> vocabulary -> bag of words -> TF-IDF -> LSI -> cosine.
///
/// `E` is the weighting engine used when `use_tfidf` is set.
#[derive(Debug, Clone)]
pub struct SimilarityRanker<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    config: RankerConfig,
    tokenizer: Tokenizer,
    stop_words: HashSet<String>,
    filter: IdentifierFilter,
    _marker: PhantomData<E>,
}

impl SimilarityRanker<DefaultTFIDFEngine> {
    /// Ranker with [`RankerConfig::default`]
    pub fn with_defaults() -> Result<Self> {
        Self::new(RankerConfig::default())
    }
}

impl<E> SimilarityRanker<E>
where
    E: TFIDFEngine,
{
    pub fn new(config: RankerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::new(config.lowercase)?,
            stop_words: config.stop_word_set(),
            filter: IdentifierFilter::new(&config.exclude_patterns),
            config,
            _marker: PhantomData,
        })
    }

    /// Replace the tokenizer, e.g. with a custom token pattern.
    /// The tokenizer's case folding wins; `config().lowercase` follows it.
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.config.lowercase = tokenizer.lowercase();
        self.tokenizer = tokenizer;
        self
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Run the vector-space pipeline over `documents`.
    /// A repeated identifier replaces the earlier document in place.
    pub fn analyze(&self, documents: &[Document]) -> Analysis {
        let mut corpus: IndexMap<&str, &str> = IndexMap::with_capacity(documents.len());
        for doc in documents {
            if corpus.insert(doc.id.as_str(), doc.text.as_str()).is_some() {
                warn!(document = %doc.id, "duplicate document identifier, keeping the later one");
            }
        }
        if corpus.is_empty() {
            return Analysis::default();
        }

        let ids: Vec<String> = corpus.keys().map(|id| id.to_string()).collect();
        let texts: Vec<&str> = corpus.values().copied().collect();
        let tokenizer = &self.tokenizer;
        let freqs: Vec<TokenFrequency> = texts
            .par_iter()
            .map(|text| TokenFrequency::from(tokenizer.tokenize(text).as_slice()))
            .collect();

        let mut vocabulary = Vocabulary::from_frequencies(&freqs);
        let seen = vocabulary.len();
        let removed = vocabulary.filter(&self.stop_words, self.config.min_token_count);
        info!(
            documents = ids.len(),
            tokens = seen,
            removed,
            vocabulary = vocabulary.len(),
            "built vocabulary"
        );

        let bows: Vec<ZeroSpVec<f64>> = freqs.iter().map(|f| vocabulary.doc2bow(f)).collect();
        let (idf, vectors) = if self.config.use_tfidf {
            weigh::<E>(&vocabulary, &bows)
        } else {
            weigh::<RawCountEngine>(&vocabulary, &bows)
        };
        for (id, vector) in ids.iter().zip(&vectors) {
            if vector.nnz() == 0 {
                debug!(document = %id, "document has an empty vector after filtering");
            }
        }

        let model = TopicModel::fit(&vectors, vocabulary.len(), self.config.num_topics);
        info!(
            requested = self.config.num_topics,
            topics = model.num_topics(),
            "fit topic model"
        );
        if tracing::enabled!(Level::DEBUG) {
            for topic in model.describe_topics(&vocabulary, LOGGED_TOPIC_TERMS) {
                debug!(
                    topic = topic.index,
                    singular_value = topic.singular_value,
                    terms = ?topic.terms,
                    "topic"
                );
            }
        }
        let topic_vectors = model.project_corpus(&vectors);

        Analysis {
            ids,
            vocabulary,
            idf,
            vectors,
            model,
            topic_vectors,
        }
    }

    /// Full ranked neighbour lists for every document
    pub fn rank(&self, documents: &[Document]) -> Rankings {
        self.analyze(documents).rankings()
    }

    /// Rank, then select against the input documents themselves with the
    /// configured identifier filter and `max_related_posts` cap.
    ///
    /// Call once after every document is loaded.
    pub fn related_posts(&self, documents: &[Document]) -> RelatedPosts {
        let rankings = self.rank(documents);
        let related = rankings.select(&rankings, &self.filter, self.config.max_related_posts);
        info!(
            documents = related.len(),
            warnings = related.warnings().len(),
            "selected related posts"
        );
        related
    }
}

fn weigh<W: TFIDFEngine>(
    vocabulary: &Vocabulary,
    bows: &[ZeroSpVec<f64>],
) -> (IDFVector, Vec<ZeroSpVec<f64>>) {
    let idf = W::idf_vec(vocabulary);
    let vectors = bows.iter().map(|bow| W::weigh(bow, &idf)).collect();
    (idf, vectors)
}
