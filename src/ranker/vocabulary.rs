use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ranker::token::TokenFrequency, utils::math::vector::ZeroSpVec};

/// Corpus vocabulary
/// token -> dense id (= position, first occurrence order) with the
/// document frequency of every token and the corpus document count.
///
/// Built in full for every ranking run; there is no incremental update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    /// token -> document frequency, index is the token id
    doc_freqs: IndexMap<Box<str>, u64>,
    /// number of documents seen
    doc_num: u64,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            doc_freqs: IndexMap::new(),
            doc_num: 0,
        }
    }

    /// Build over a whole corpus, one frequency table per document
    pub fn from_frequencies<'a>(docs: impl IntoIterator<Item = &'a TokenFrequency>) -> Self {
        let mut vocab = Self::new();
        for doc in docs {
            vocab.add_doc(doc);
        }
        vocab
    }

    /// Add a document's tokens; each unique token counts once
    pub fn add_doc(&mut self, doc: &TokenFrequency) {
        self.doc_num += 1;
        for token in doc.token_set_ref_str() {
            match self.doc_freqs.get_mut(token) {
                Some(df) => *df += 1,
                None => {
                    self.doc_freqs.insert(token.into(), 1);
                }
            }
        }
    }

    /// Drop stop words and tokens with document frequency below `min_count`,
    /// then compact ids. Relative order of surviving tokens is kept.
    ///
    /// Stop words match the token form exactly (case-sensitive).
    ///
    /// # Returns
    /// * number of removed tokens
    pub fn filter(&mut self, stop_words: &HashSet<String>, min_count: u64) -> usize {
        let before = self.doc_freqs.len();
        self.doc_freqs
            .retain(|token, df| *df >= min_count && !stop_words.contains(token.as_ref()));
        before - self.doc_freqs.len()
    }

    /// Bag of words over this vocabulary: token id -> count.
    /// Tokens outside the vocabulary are ignored.
    pub fn doc2bow(&self, doc: &TokenFrequency) -> ZeroSpVec<f64> {
        ZeroSpVec::from_pairs(
            self.len(),
            doc.iter()
                .filter_map(|(token, count)| self.id(token).map(|id| (id, count as f64))),
        )
    }

    #[inline]
    pub fn id(&self, token: &str) -> Option<usize> {
        self.doc_freqs.get_index_of(token)
    }

    #[inline]
    pub fn token(&self, id: usize) -> Option<&str> {
        self.doc_freqs.get_index(id).map(|(token, _)| token.as_ref())
    }

    #[inline]
    pub fn doc_freq(&self, id: usize) -> u64 {
        self.doc_freqs.get_index(id).map_or(0, |(_, df)| *df)
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.doc_freqs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.doc_freqs.is_empty()
    }

    /// Tokens in id order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.doc_freqs.keys().map(|t| t.as_ref())
    }
}
