use std::fmt::{self, Debug};

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::{math::vector::math::cosine_similarity, sort::sort_by_score_desc};

/// One ranked neighbour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: String,
    pub score: f64,
}

/// Full ranked neighbour lists, keyed by document identifier in corpus order.
///
/// Every list holds all other documents, descending by score, ties in corpus
/// order. A document never appears in its own list.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rankings {
    entries: IndexMap<String, Vec<Neighbor>>,
}

impl Rankings {
    /// Score every document against every other one in topic space
    ///
    /// # Arguments
    /// * `ids` - identifiers, corpus order
    /// * `vectors` - topic vectors, same order as `ids`
    ///
    /// A repeated identifier keeps its first position and its last vector.
    /// Identifiers without a vector (or vectors without an identifier) are
    /// dropped with a warning.
    pub(crate) fn from_topic_vectors(ids: &[String], vectors: &[Vec<f64>]) -> Self {
        if ids.len() != vectors.len() {
            warn!(
                ids = ids.len(),
                vectors = vectors.len(),
                "identifier and vector counts differ, ranking the common prefix"
            );
        }
        let mut corpus: IndexMap<&str, &[f64]> = IndexMap::with_capacity(ids.len());
        for (id, vector) in ids.iter().zip(vectors) {
            corpus.insert(id.as_str(), vector.as_slice());
        }

        let entries: Vec<(&str, &[f64])> = corpus.into_iter().collect();

        // 行単位で並列計算, collect で corpus 順に戻る
        let rows: Vec<Vec<Neighbor>> = entries
            .par_iter()
            .enumerate()
            .map(|(i, (_, row))| {
                let mut scores: Vec<(usize, f64)> = entries
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(j, (_, other))| (j, cosine_similarity(row, other)))
                    .collect();
                sort_by_score_desc(&mut scores, |(_, s)| *s);
                scores
                    .into_iter()
                    .map(|(j, score)| Neighbor {
                        id: entries[j].0.to_string(),
                        score,
                    })
                    .collect()
            })
            .collect();

        Self {
            entries: entries.iter().map(|(id, _)| id.to_string()).zip(rows).collect(),
        }
    }

    /// Full ranked list for `id`
    pub fn get(&self, id: &str) -> Option<&[Neighbor]> {
        self.entries.get(id).map(|v| v.as_slice())
    }

    /// First `n` entries for `id`, no filtering
    pub fn top(&self, id: &str, n: usize) -> Option<&[Neighbor]> {
        self.get(id).map(|list| &list[..n.min(list.len())])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Neighbor])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Debug for Rankings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each neighbour on a new line
            writeln!(f, "Rankings [")?;
            for (id, list) in &self.entries {
                writeln!(f, "    {:?}:", id)?;
                for n in list {
                    writeln!(f, "        {:?}: {:.6}", n.id, n.score)?;
                }
            }
            write!(f, "]")
        } else {
            f.debug_map().entries(self.entries.iter()).finish()
        }
    }
}
