//! Catalog browsing pipeline.
//!
//! This crate provides:
//! - Filter trait and implementations for narrowing the catalog
//! - FilterPipeline for composing filters
//! - SortKey for ordering results
//! - `browse` plus the popular / top-rated / by-genre listings
//!
//! ## Architecture
//! A browse request runs in stages:
//! 1. Criteria are turned into a FilterPipeline (only the criteria that are set)
//! 2. Filters are applied conjunctively, in catalog order
//! 3. Survivors are stably sorted and truncated to the limit
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{browse, BrowseCriteria, SortKey};
//!
//! let criteria = BrowseCriteria::new()
//!     .with_years(Some(1990), Some(1999))
//!     .with_min_rating(7.5)
//!     .with_genre("Crime")
//!     .with_sort(SortKey::Rating);
//!
//! for movie in browse(&catalog, &criteria) {
//!     println!("{} ({:?})", movie.clean_title, movie.year);
//! }
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod sort;
pub mod browse;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use filters::RuntimeBucket;
pub use sort::SortKey;
pub use browse::{browse, by_genre, popular, top_rated, BrowseCriteria, DEFAULT_BROWSE_LIMIT};
