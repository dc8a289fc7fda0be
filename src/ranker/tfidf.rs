use serde::{Deserialize, Serialize};

use crate::{ranker::vocabulary::Vocabulary, utils::math::vector::ZeroSpVec};

/// IDF Vector
/// dense, one entry per vocabulary id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IDFVector {
    pub idf_vec: Vec<f64>,
    /// document count the vector was fit on
    pub doc_num: u64,
}

impl IDFVector {
    #[inline]
    pub fn get(&self, id: usize) -> f64 {
        self.idf_vec.get(id).copied().unwrap_or(0.0)
    }
}

/// TF-IDF weighting strategy
///
/// `idf_vec` is fit once per corpus, `weigh` is then applied uniformly to
/// every document's bag of words.
pub trait TFIDFEngine {
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `vocab` - フィルタ済み語彙
    fn idf_vec(vocab: &Vocabulary) -> IDFVector;

    /// 文書のbag of wordsを重み付けする
    /// # Arguments
    /// * `bow` - token id -> count
    /// * `idf` - `idf_vec` の結果
    fn weigh(bow: &ZeroSpVec<f64>, idf: &IDFVector) -> ZeroSpVec<f64>;
}

/// デフォルトのTF-IDFエンジン
/// - idf(t) = log2(N / df(t))
/// - w(t, d) = count(t, d) * idf(t), L2 正規化
///
/// A token present in every document gets weight 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(vocab: &Vocabulary) -> IDFVector {
        let doc_num = vocab.doc_num() as f64;
        let idf_vec = (0..vocab.len())
            .map(|id| {
                let df = vocab.doc_freq(id).max(1) as f64;
                (doc_num / df).log2()
            })
            .collect();
        IDFVector {
            idf_vec,
            doc_num: vocab.doc_num(),
        }
    }

    fn weigh(bow: &ZeroSpVec<f64>, idf: &IDFVector) -> ZeroSpVec<f64> {
        bow.map_values(|id, count| count * idf.get(id)).normalized()
    }
}

/// Plain bag-of-words counts, no re-weighting
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCountEngine;

impl TFIDFEngine for RawCountEngine {
    fn idf_vec(vocab: &Vocabulary) -> IDFVector {
        IDFVector {
            idf_vec: vec![1.0; vocab.len()],
            doc_num: vocab.doc_num(),
        }
    }

    fn weigh(bow: &ZeroSpVec<f64>, _idf: &IDFVector) -> ZeroSpVec<f64> {
        bow.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ranker::token::TokenFrequency;

    fn vocab(docs: &[&[&str]]) -> (Vocabulary, Vec<TokenFrequency>) {
        let freqs: Vec<TokenFrequency> = docs.iter().map(|d| TokenFrequency::from(*d)).collect();
        let mut vocab = Vocabulary::from_frequencies(&freqs);
        vocab.filter(&HashSet::new(), 1);
        (vocab, freqs)
    }

    #[test]
    fn idf_is_log2_ratio() {
        let (vocab, _) = vocab(&[&["a", "b"], &["a"], &["a"], &["c"]]);
        let idf = DefaultTFIDFEngine::idf_vec(&vocab);
        assert_eq!(idf.doc_num, 4);
        assert!((idf.get(vocab.id("a").unwrap()) - (4.0_f64 / 3.0).log2()).abs() < 1e-12);
        assert!((idf.get(vocab.id("b").unwrap()) - 2.0).abs() < 1e-12);
        assert_eq!(idf.get(99), 0.0);
    }

    #[test]
    fn weighted_vectors_are_unit_length() {
        let (vocab, freqs) = vocab(&[&["a", "b", "b"], &["a", "c"], &["d"]]);
        let idf = DefaultTFIDFEngine::idf_vec(&vocab);
        let w = DefaultTFIDFEngine::weigh(&vocab.doc2bow(&freqs[0]), &idf);
        assert!((w.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn token_in_every_document_weighs_zero() {
        let (vocab, freqs) = vocab(&[&["a", "b"], &["a", "c"]]);
        let idf = DefaultTFIDFEngine::idf_vec(&vocab);
        let w = DefaultTFIDFEngine::weigh(&vocab.doc2bow(&freqs[0]), &idf);
        assert_eq!(w.get(vocab.id("a").unwrap()), Some(0.0));
        assert_eq!(w.nnz(), 1);
    }

    #[test]
    fn raw_counts_pass_through() {
        let (vocab, freqs) = vocab(&[&["a", "a", "b"]]);
        let idf = RawCountEngine::idf_vec(&vocab);
        let bow = vocab.doc2bow(&freqs[0]);
        assert_eq!(RawCountEngine::weigh(&bow, &idf), bow);
    }
}
