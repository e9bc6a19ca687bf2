//! # Catalog Snapshot
//!
//! The catalog and its feature index are addressed by the same ordinals, so
//! they are built from one ordered catalog and kept together. A snapshot is
//! immutable once built and is shared behind an `Arc`; reloading produces a
//! new snapshot rather than mutating this one.

use std::time::Instant;

use data_loader::{Catalog, MovieRecord, Ordinal};
use similarity::{FeatureIndex, ScoredMatch, SimilarityEngine};
use tracing::{info, instrument};

use crate::error::SnapshotError;

#[derive(Debug)]
pub struct CatalogSnapshot {
    catalog: Catalog,
    features: FeatureIndex,
}

impl CatalogSnapshot {
    /// Index `catalog` and freeze both together.
    #[instrument(skip(catalog), fields(movies = catalog.len()))]
    pub fn build(catalog: Catalog) -> Result<Self, SnapshotError> {
        let start = Instant::now();
        let features = FeatureIndex::build(&catalog);
        let snapshot = Self::from_parts(catalog, features)?;

        info!(
            "Built feature index: {} movies, {} terms in {:.2?}",
            snapshot.len(),
            snapshot.features.vocabulary_size(),
            start.elapsed()
        );
        Ok(snapshot)
    }

    /// Pair an existing catalog with its feature index.
    ///
    /// Fails when the two disagree in length or the vocabulary is empty.
    pub fn from_parts(catalog: Catalog, features: FeatureIndex) -> Result<Self, SnapshotError> {
        if catalog.len() != features.len() {
            return Err(SnapshotError::LengthMismatch {
                catalog: catalog.len(),
                features: features.len(),
            });
        }
        if features.vocabulary_size() == 0 {
            return Err(SnapshotError::EmptyVocabulary);
        }
        Ok(Self { catalog, features })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn features(&self) -> &FeatureIndex {
        &self.features
    }

    pub fn engine(&self) -> SimilarityEngine<'_> {
        SimilarityEngine::new(&self.features)
    }

    /// Top `k` neighbours of `ordinal`, paired with their records
    pub fn similar_to(&self, ordinal: Ordinal, k: usize) -> Vec<(&MovieRecord, ScoredMatch)> {
        self.engine()
            .recommend(ordinal, k)
            .into_iter()
            .filter_map(|m| self.catalog.get_by_ordinal(m.ordinal).map(|movie| (movie, m)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
