//! Poster image resolution.
//!
//! The recommender only hands out movie records; turning one into an image
//! URL is the caller's job. This module ships a deterministic placeholder
//! resolver and a bounded cache that can sit in front of any resolver.

use std::collections::{HashMap, VecDeque};

use data_loader::{MovieId, MovieRecord};
use tracing::debug;

const PLACEHOLDER_COLORS: [&str; 10] = [
    "667eea", "f093fb", "4facfe", "43e97b", "fa709a", "fee140", "a18cd1", "30cfd0", "f5576c",
    "4481eb",
];

const PLACEHOLDER_TITLE_CHARS: usize = 25;

/// Turns a movie into a poster image URL
pub trait PosterResolver {
    fn resolve(&self, movie: &MovieRecord) -> String;
}

/// Uses the record's own poster when it looks real, otherwise a coloured
/// placeholder carrying the title.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderPosters;

impl PlaceholderPosters {
    /// A usable poster URL: http(s), not a placeholder service, and for TMDB
    /// a real file path rather than a bare numeric id.
    pub fn is_real_poster(url: &str) -> bool {
        if !url.starts_with("http") {
            return false;
        }
        if url.contains("image.tmdb.org") {
            let path = url.rsplit('/').next().unwrap_or_default();
            return !path.chars().all(|c| c.is_ascii_digit());
        }
        !url.to_lowercase().contains("placeholder")
    }

    pub fn placeholder_url(movie: &MovieRecord) -> String {
        let color = PLACEHOLDER_COLORS[movie.id as usize % PLACEHOLDER_COLORS.len()];
        let title: String = movie.clean_title.chars().take(PLACEHOLDER_TITLE_CHARS).collect();
        let encoded = title.replace(' ', "+").replace('&', "%26");
        format!("https://via.placeholder.com/300x450/{}/ffffff?text={}", color, encoded)
    }
}

impl PosterResolver for PlaceholderPosters {
    fn resolve(&self, movie: &MovieRecord) -> String {
        match movie.poster_url.as_deref() {
            Some(url) if Self::is_real_poster(url) => url.to_string(),
            _ => Self::placeholder_url(movie),
        }
    }
}

/// Bounded cache in front of a resolver, keyed by movie id.
///
/// Once full, the oldest entry is evicted first.
#[derive(Debug)]
pub struct CachedPosters<R> {
    inner: R,
    capacity: usize,
    entries: HashMap<MovieId, String>,
    order: VecDeque<MovieId>,
}

impl<R: PosterResolver> CachedPosters<R> {
    pub fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Resolve through the cache
    pub fn get(&mut self, movie: &MovieRecord) -> String {
        if let Some(url) = self.entries.get(&movie.id) {
            return url.clone();
        }

        let url = self.inner.resolve(movie);
        if self.capacity == 0 {
            return url;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    debug!("Evicted poster for movie {}", oldest);
                }
                None => break,
            }
        }
        self.entries.insert(movie.id, url.clone());
        self.order.push_back(movie.id);
        url
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Catalog, RawMovieRow};
    use std::cell::Cell;

    fn movie(id: u32, title: &str, poster: Option<&str>) -> MovieRecord {
        let mut row = RawMovieRow::new(id, title, "Drama");
        if let Some(url) = poster {
            row = row.with_poster_url(url);
        }
        let catalog = Catalog::load(vec![row]).unwrap();
        catalog.movies()[0].clone()
    }

    #[test]
    fn test_placeholder_url() {
        let m = movie(12, "Beauty & the Beast Returns Again Forever (1991)", None);
        let url = PlaceholderPosters.resolve(&m);
        assert_eq!(
            url,
            "https://via.placeholder.com/300x450/4facfe/ffffff?text=Beauty+%26+the+Beast+Return"
        );
    }

    #[test]
    fn test_real_posters_are_kept() {
        let real = "https://image.tmdb.org/t/p/w500/abc123.jpg";
        assert_eq!(PlaceholderPosters.resolve(&movie(1, "Heat (1995)", Some(real))), real);

        let numeric = "https://image.tmdb.org/t/p/w500/949";
        assert!(!PlaceholderPosters::is_real_poster(numeric));
        assert!(!PlaceholderPosters::is_real_poster("https://via.placeholder.com/x.png"));
        assert!(!PlaceholderPosters::is_real_poster("posters/heat.jpg"));
    }

    struct CountingResolver {
        calls: Cell<usize>,
    }

    impl PosterResolver for CountingResolver {
        fn resolve(&self, movie: &MovieRecord) -> String {
            self.calls.set(self.calls.get() + 1);
            format!("poster-{}", movie.id)
        }
    }

    #[test]
    fn test_cache_is_bounded_fifo() {
        let resolver = CountingResolver { calls: Cell::new(0) };
        let mut cache = CachedPosters::new(resolver, 2);

        let (a, b, c) = (movie(1, "A1", None), movie(2, "B2", None), movie(3, "C3", None));
        assert_eq!(cache.get(&a), "poster-1");
        assert_eq!(cache.get(&a), "poster-1");
        assert_eq!(cache.inner.calls.get(), 1);

        cache.get(&b);
        cache.get(&c);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(1));
        assert!(cache.contains(2));
        assert!(cache.contains(3));
    }
}
