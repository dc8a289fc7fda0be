use std::{
    collections::{HashMap, HashSet},
    fmt,
    hash::BuildHasher,
};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ranker::evaluate::scoring::{Neighbor, Rankings};

/// Set of identifiers the caller can resolve back to its own documents
pub trait DocumentLookup {
    fn contains_document(&self, id: &str) -> bool;
}

impl<S: BuildHasher> DocumentLookup for HashSet<String, S> {
    fn contains_document(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl<V, S: BuildHasher> DocumentLookup for HashMap<String, V, S> {
    fn contains_document(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

impl<S: BuildHasher> DocumentLookup for IndexSet<String, S> {
    fn contains_document(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl<V, S: BuildHasher> DocumentLookup for IndexMap<String, V, S> {
    fn contains_document(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

impl DocumentLookup for Rankings {
    fn contains_document(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// Drops neighbours whose identifier contains any of the patterns
/// (plain substring match, e.g. `"pages"` for non-article sources)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifierFilter {
    patterns: Vec<String>,
}

impl IdentifierFilter {
    pub fn new<T: AsRef<str>>(patterns: &[T]) -> Self {
        Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    #[inline]
    pub fn excludes(&self, id: &str) -> bool {
        self.patterns.iter().any(|p| id.contains(p.as_str()))
    }
}

/// Recoverable problems met while selecting related posts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankWarning {
    #[error("can't find document {neighbor} (ranked for {document})")]
    MissingDocument { document: String, neighbor: String },
}

/// Capped related-post lists with a score lookup per document
///
/// This is what a page-rendering step consumes: `related(id)` in rank order,
/// and `score(id, other)` / `format_score(id, other)` for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedPosts {
    related: IndexMap<String, Vec<Neighbor>>,
    scores: IndexMap<String, IndexMap<String, f64>>,
    warnings: Vec<RankWarning>,
}

impl RelatedPosts {
    /// Related posts of `id`, best first. Empty for unknown ids.
    pub fn related(&self, id: &str) -> &[Neighbor] {
        self.related.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Scores of `id`'s related posts keyed by neighbour identifier
    pub fn scores(&self, id: &str) -> Option<&IndexMap<String, f64>> {
        self.scores.get(id)
    }

    pub fn score(&self, id: &str, neighbor: &str) -> Option<f64> {
        self.scores.get(id)?.get(neighbor).copied()
    }

    /// Score with three decimals, e.g. `"0.873"`
    pub fn format_score(&self, id: &str, neighbor: &str) -> Option<String> {
        self.score(id, neighbor).map(|s| format!("{:.3}", s))
    }

    pub fn warnings(&self) -> &[RankWarning] {
        &self.warnings
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Neighbor])> {
        self.related.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.related.len()
    }

    pub fn is_empty(&self) -> bool {
        self.related.is_empty()
    }
}

impl fmt::Display for RelatedPosts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, list) in &self.related {
            writeln!(f, "{}", id)?;
            for n in list {
                writeln!(f, "    {} ({:.3})", n.id, n.score)?;
            }
        }
        Ok(())
    }
}

impl Rankings {
    /// Apply the caller's view to the full rankings.
    ///
    /// Per document, in rank order: neighbours matched by `filter` are
    /// dropped, neighbours `known` cannot resolve are skipped with a
    /// [`RankWarning`], and only then is the list cut to `max` entries.
    /// Skipped entries never take a result slot.
    pub fn select<L>(&self, known: &L, filter: &IdentifierFilter, max: usize) -> RelatedPosts
    where
        L: DocumentLookup + ?Sized,
    {
        let mut out = RelatedPosts::default();
        for (id, list) in self.iter() {
            let mut picked = Vec::with_capacity(max.min(list.len()));
            let mut scores = IndexMap::with_capacity(max.min(list.len()));
            for neighbor in list {
                if picked.len() >= max {
                    break;
                }
                if filter.excludes(&neighbor.id) {
                    continue;
                }
                if !known.contains_document(&neighbor.id) {
                    warn!(document = id, neighbor = %neighbor.id, "can't find related document");
                    out.warnings.push(RankWarning::MissingDocument {
                        document: id.to_string(),
                        neighbor: neighbor.id.clone(),
                    });
                    continue;
                }
                scores.insert(neighbor.id.clone(), neighbor.score);
                picked.push(neighbor.clone());
            }
            out.related.insert(id.to_string(), picked);
            out.scores.insert(id.to_string(), scores);
        }
        out
    }
}
