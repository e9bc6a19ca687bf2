//! # Similarity Crate
//!
//! Content-based similarity over movie genre tags.
//!
//! ## Components
//!
//! ### Tokenizer
//! Lowercased word tokens, stop words removed, unigrams + bigrams.
//!
//! ### Feature Index
//! One TF-IDF vector per catalog ordinal, L2-normalized, over a sorted
//! vocabulary so that builds are reproducible.
//!
//! ### Similarity Engine
//! Cosine similarity of one movie against the whole index, ranked by score
//! with catalog order as the tie-break.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use similarity::{FeatureIndex, SimilarityEngine};
//!
//! let catalog = Catalog::load(rows)?;
//! let index = FeatureIndex::build(&catalog);
//!
//! let engine = SimilarityEngine::new(&index);
//! let neighbours = engine.recommend(0, 20);
//! ```

// Public modules
pub mod tokenizer;
pub mod tfidf;
pub mod engine;

// Re-export commonly used types
pub use tokenizer::Tokenizer;
pub use tfidf::{FeatureIndex, FeatureVector};
pub use engine::{ScoredMatch, SimilarityEngine};
