//! Similarity Engine - rank the catalog against one movie
//!
//! ## Algorithm
//! 1. Expand the query movie's vector to a dense array
//! 2. Cosine similarity against every other vector (dot product of unit vectors)
//! 3. Drop the query itself
//! 4. Sort by score descending, ties by ascending ordinal
//! 5. Return the top k
//!
//! Each query costs O(N * V). There is no precomputed all-pairs matrix; that
//! is the first thing to revisit for catalogs far beyond a few thousand movies.

use crate::tfidf::FeatureIndex;
use data_loader::Ordinal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One ranked neighbour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub ordinal: Ordinal,
    /// Cosine similarity in [-1, 1]; [0, 1] for non-negative weights
    pub score: f64,
}

/// Answers "most similar to X" against a built `FeatureIndex`.
///
/// Read-only: any number of engines can share one index across threads.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine<'a> {
    index: &'a FeatureIndex,
}

impl<'a> SimilarityEngine<'a> {
    pub fn new(index: &'a FeatureIndex) -> Self {
        Self { index }
    }

    /// Top `k` movies most similar to `ordinal`, excluding itself.
    ///
    /// Returns fewer than `k` when the catalog is smaller, and nothing for an
    /// unknown ordinal.
    #[instrument(skip(self))]
    pub fn recommend(&self, ordinal: Ordinal, k: usize) -> Vec<ScoredMatch> {
        let Some(query) = self.index.vector_for(ordinal) else {
            debug!("Ordinal {} is outside the index", ordinal);
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let dense = query.to_dense(self.index.vocabulary_size());
        let mut scored: Vec<ScoredMatch> = self
            .index
            .vectors()
            .par_iter()
            .enumerate()
            .filter(|&(candidate, _)| candidate != ordinal)
            .map(|(candidate, vector)| ScoredMatch {
                ordinal: candidate,
                score: to_cosine(vector.dot_dense(&dense)),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.ordinal.cmp(&b.ordinal))
        });
        scored.truncate(k);

        debug!("Ranked {} neighbours for ordinal {}", scored.len(), ordinal);
        scored
    }

    /// Cosine similarity between two catalog ordinals
    pub fn similarity(&self, a: Ordinal, b: Ordinal) -> Option<f64> {
        let left = self.index.vector_for(a)?;
        let right = self.index.vector_for(b)?;
        Some(to_cosine(left.dot(right)))
    }
}

/// Clamp to [-1, 1] and fold a negative zero into +0.0 so that
/// `total_cmp` sees every zero score as the same value
fn to_cosine(raw: f64) -> f64 {
    raw.clamp(-1.0, 1.0) + 0.0
}
