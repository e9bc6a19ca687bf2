//! TF-IDF feature index over genre documents.
//!
//! ## Algorithm
//! 1. Document = the movie's genre tags joined by a space
//! 2. Terms = unigrams + bigrams from the `Tokenizer`
//! 3. Vocabulary = every term seen, sorted lexicographically
//! 4. idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! 5. weight = raw count * idf, then L2-normalize each document
//!
//! Rare genres (Film-Noir) end up with more weight than common ones (Drama),
//! so cosine similarity favours movies that share specific combinations.
//!
//! The index is a batch structure: it is built once and never updated.

use crate::tokenizer::Tokenizer;
use data_loader::{Catalog, Ordinal};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Sparse, unit-length TF-IDF vector for one document.
///
/// Entries are `(term_index, weight)` sorted by term index. A document with
/// no terms has no entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of one term, 0.0 when absent
    pub fn weight(&self, term_index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&term_index, |&(idx, _)| idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Euclidean length (1.0 for any non-empty document)
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).fold(0.0, |acc, x| acc + x).sqrt()
    }

    /// Sparse-sparse dot product by merging sorted entries
    pub fn dot(&self, other: &FeatureVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Dot product against a dense vector indexed by term
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(idx, w)| w * dense.get(idx).copied().unwrap_or(0.0))
            .fold(0.0, |acc, x| acc + x)
    }

    /// Expand to a dense vector of the given vocabulary size
    pub fn to_dense(&self, dimensions: usize) -> Vec<f64> {
        let mut dense = vec![0.0; dimensions];
        for &(idx, w) in &self.entries {
            if idx < dimensions {
                dense[idx] = w;
            }
        }
        dense
    }
}

/// Vocabulary plus one feature vector per catalog ordinal.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    /// term -> column, assigned in sorted term order
    vocabulary: BTreeMap<String, usize>,
    /// idf per column
    idf: Vec<f64>,
    /// vectors[ordinal] belongs to catalog.get_by_ordinal(ordinal)
    vectors: Vec<FeatureVector>,
}

impl FeatureIndex {
    /// Build the index with the default tokenizer (unigrams + bigrams)
    pub fn build(catalog: &Catalog) -> Self {
        Self::build_with(catalog, &Tokenizer::default())
    }

    /// Build the index with a custom tokenizer
    #[instrument(skip(catalog, tokenizer), fields(movies = catalog.len()))]
    pub fn build_with(catalog: &Catalog, tokenizer: &Tokenizer) -> Self {
        // Step 1: Tokenize every document (order preserved)
        let documents: Vec<Vec<String>> = catalog
            .movies()
            .par_iter()
            .map(|movie| tokenizer.terms(&movie.genres.join(" ")))
            .collect();

        // Step 2: Document frequencies, in sorted term order
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for terms in &documents {
            let unique: BTreeSet<&String> = terms.iter().collect();
            for term in unique {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Step 3: Vocabulary and smoothed idf
        let n = documents.len() as f64;
        let vocabulary: BTreeMap<String, usize> = document_frequency
            .keys()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        let idf: Vec<f64> = document_frequency
            .values()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        // Step 4: Weighted, normalized vectors
        let vectors: Vec<FeatureVector> = documents
            .par_iter()
            .map(|terms| vectorize(terms, &vocabulary, &idf))
            .collect();

        debug!(
            "Built feature index: {} documents, {} terms",
            vectors.len(),
            vocabulary.len()
        );

        Self {
            vocabulary,
            idf,
            vectors,
        }
    }

    /// Feature vector for a catalog ordinal
    pub fn vector_for(&self, ordinal: Ordinal) -> Option<&FeatureVector> {
        self.vectors.get(ordinal)
    }

    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    /// Column of a term, if it is in the vocabulary
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Inverse document frequency of a term
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|idx| self.idf[idx])
    }

    /// Terms in column order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents (equals the catalog length it was built from)
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn vectorize(terms: &[String], vocabulary: &BTreeMap<String, usize>, idf: &[f64]) -> FeatureVector {
    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
    for term in terms {
        if let Some(&idx) = vocabulary.get(term) {
            *counts.entry(idx).or_insert(0.0) += 1.0;
        }
    }

    let mut entries: Vec<(usize, f64)> = counts
        .into_iter()
        .map(|(idx, count)| (idx, count * idf[idx]))
        .collect();

    let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for entry in &mut entries {
            entry.1 /= norm;
        }
    }

    FeatureVector { entries }
}
