//! Query resolution: map user input to a single catalog ordinal.
//!
//! Precedence, first match wins:
//! 1. exact title (case-insensitive), e.g. "heat (1995)"
//! 2. exact clean title (case-insensitive), e.g. "heat"
//! 3. substring of the clean title, first in catalog order
//!
//! Step 3 does not rank by relevance: "Batman" may resolve to
//! "Batman Returns" if that appears first in the catalog.

use crate::types::{Catalog, MovieId, Ordinal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A request for one movie, by id or by free-text title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovieQuery {
    Id(MovieId),
    Title(String),
}

impl MovieQuery {
    /// Interpret user input: an all-digit string is an id, anything else a title
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<MovieId>() {
            Ok(id) if trimmed.bytes().all(|b| b.is_ascii_digit()) => MovieQuery::Id(id),
            _ => MovieQuery::Title(trimmed.to_string()),
        }
    }
}

impl From<MovieId> for MovieQuery {
    fn from(id: MovieId) -> Self {
        MovieQuery::Id(id)
    }
}

impl From<&str> for MovieQuery {
    fn from(title: &str) -> Self {
        MovieQuery::Title(title.to_string())
    }
}

impl From<String> for MovieQuery {
    fn from(title: String) -> Self {
        MovieQuery::Title(title)
    }
}

impl fmt::Display for MovieQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieQuery::Id(id) => write!(f, "#{}", id),
            MovieQuery::Title(title) => write!(f, "\"{}\"", title),
        }
    }
}

impl Catalog {
    /// Resolve a free-text title to an ordinal.
    pub fn find_ordinal(&self, query: &str) -> Option<Ordinal> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let lowered: Vec<(String, String)> = self
            .movies
            .iter()
            .map(|m| (m.title.to_lowercase(), m.clean_title.to_lowercase()))
            .collect();

        lowered
            .iter()
            .position(|(title, _)| *title == query)
            .or_else(|| lowered.iter().position(|(_, clean)| *clean == query))
            .or_else(|| lowered.iter().position(|(_, clean)| clean.contains(&query)))
    }

    /// Resolve an id-or-title query. Ids never fall back to title matching.
    pub fn resolve(&self, query: &MovieQuery) -> Option<Ordinal> {
        match query {
            MovieQuery::Id(id) => self.ordinal_of(*id),
            MovieQuery::Title(title) => self.find_ordinal(title),
        }
    }
}
