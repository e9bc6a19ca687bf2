//! Recommender defaults.

use pipeline::DEFAULT_BROWSE_LIMIT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Results returned by `recommend_default`
    pub default_k: usize,
    /// Default cap for title searches
    pub search_limit: usize,
    /// Default cap for browse listings
    pub browse_limit: usize,
    /// Entries kept by the poster cache
    pub poster_cache_capacity: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_k: 20,
            search_limit: 8,
            browse_limit: DEFAULT_BROWSE_LIMIT,
            poster_cache_capacity: 1000,
        }
    }
}

impl RecommenderConfig {
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn with_browse_limit(mut self, limit: usize) -> Self {
        self.browse_limit = limit;
        self
    }

    pub fn with_poster_cache_capacity(mut self, capacity: usize) -> Self {
        self.poster_cache_capacity = capacity;
        self
    }
}
