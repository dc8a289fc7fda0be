use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    ranker::vocabulary::Vocabulary,
    utils::{
        math::{eigen::SymmetricEigen, vector::ZeroSpVec},
        sort::sort_by_score_desc,
    },
};

/// Eigenvalues below `RANK_TOLERANCE * largest` count as zero rank
const RANK_TOLERANCE: f64 = 1e-10;

/// Latent topic model (LSI)
///
/// A rank-k truncated SVD of the document-term matrix `X`, computed from the
/// eigen-decomposition of the document Gram matrix `X Xᵀ = V Σ² Vᵀ`.
/// Each topic keeps a dense term-space basis vector `u = Xᵀ v / σ`, so any
/// vector over the same vocabulary can be projected with `project`.
///
/// Fewer than `k` topics are kept when the corpus rank is lower.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicModel {
    /// `basis[topic][token_id]`
    basis: Vec<Vec<f64>>,
    /// singular values, descending
    singular_values: Vec<f64>,
}

/// One topic's description: its strongest terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub index: usize,
    pub singular_value: f64,
    /// (token, weight), descending by |weight|
    pub terms: Vec<(String, f64)>,
}

impl TopicModel {
    /// Fit over the whole corpus
    ///
    /// # Arguments
    /// * `vectors` - weighted document vectors, corpus order
    /// * `dim` - vocabulary size
    /// * `num_topics` - target rank
    pub fn fit(vectors: &[ZeroSpVec<f64>], dim: usize, num_topics: usize) -> Self {
        if vectors.is_empty() || dim == 0 || num_topics == 0 {
            return Self::default();
        }

        // 行ごとに並列, collect は順序保持
        let gram: Vec<Vec<f64>> = (0..vectors.len())
            .into_par_iter()
            .map(|i| vectors.iter().map(|other| vectors[i].dot(other)).collect())
            .collect();
        let eig = SymmetricEigen::new(&gram);

        let largest = eig.values.first().copied().unwrap_or(0.0);
        let cutoff = largest * RANK_TOLERANCE;
        let mut basis = Vec::with_capacity(num_topics);
        let mut singular_values = Vec::with_capacity(num_topics);
        for (value, mut coeffs) in eig.values.into_iter().zip(eig.vectors) {
            if basis.len() == num_topics || value <= cutoff || value <= 0.0 {
                break;
            }
            normalize_sign(&mut coeffs);
            let sigma = value.sqrt();
            let mut u = vec![0.0; dim];
            for (vector, &c) in vectors.iter().zip(&coeffs) {
                for (id, w) in vector.raw_iter() {
                    if let Some(slot) = u.get_mut(id) {
                        *slot += c * w;
                    }
                }
            }
            u.iter_mut().for_each(|x| *x /= sigma);
            basis.push(u);
            singular_values.push(sigma);
        }

        Self { basis, singular_values }
    }

    /// Map a vector of the fitted vocabulary space into topic space
    pub fn project(&self, vector: &ZeroSpVec<f64>) -> Vec<f64> {
        self.basis.iter().map(|u| vector.dot_dense(u)).collect()
    }

    /// Project a whole corpus, order preserved
    pub fn project_corpus(&self, vectors: &[ZeroSpVec<f64>]) -> Vec<Vec<f64>> {
        vectors.par_iter().map(|v| self.project(v)).collect()
    }

    /// Number of topics actually kept
    pub fn num_topics(&self) -> usize {
        self.basis.len()
    }

    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Top `n` terms of every topic
    pub fn describe_topics(&self, vocab: &Vocabulary, n: usize) -> Vec<Topic> {
        self.basis
            .iter()
            .zip(&self.singular_values)
            .enumerate()
            .map(|(index, (u, &singular_value))| {
                let mut terms: Vec<(usize, f64)> =
                    u.iter().copied().enumerate().filter(|(_, w)| *w != 0.0).collect();
                sort_by_score_desc(&mut terms, |(_, w)| w.abs());
                let terms = terms
                    .into_iter()
                    .take(n)
                    .filter_map(|(id, w)| vocab.token(id).map(|t| (t.to_string(), w)))
                    .collect();
                Topic { index, singular_value, terms }
            })
            .collect()
    }
}

/// Flip so the largest-magnitude coefficient is positive (first one on ties)
fn normalize_sign(coeffs: &mut [f64]) {
    let mut pivot = 0.0_f64;
    for &c in coeffs.iter() {
        if c.abs() > pivot.abs() {
            pivot = c;
        }
    }
    if pivot < 0.0 {
        coeffs.iter_mut().for_each(|c| *c = -*c);
    }
}
