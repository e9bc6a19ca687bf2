//! Core traits for the browse pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to catalog records.

use data_loader::MovieRecord;

/// Core trait for filtering catalog records.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across request threads
/// - Filters take ownership of the Vec and return the kept subset, in order
/// - Records are borrowed from the catalog; nothing is cloned
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of records.
    ///
    /// # Arguments
    /// * `movies` - The records to filter (takes ownership of the list)
    ///
    /// # Returns
    /// The records that pass, in their original order
    fn apply<'a>(&self, movies: Vec<&'a MovieRecord>) -> Vec<&'a MovieRecord>;
}
