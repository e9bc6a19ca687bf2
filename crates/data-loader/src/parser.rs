//! Parsing for catalog files and the fields derived from them.
//!
//! - `read_catalog_csv`: CSV with header `movieId,title,genres[,...]`
//! - Title year: "Toy Story (1995)" -> 1995
//! - Clean title: "Toy Story (1995)" -> "Toy Story"
//! - Genres: "Action|Adventure|(no genres listed)" -> ["Action", "Adventure"]

use crate::error::{DataLoadError, Result};
use crate::types::{NO_GENRES_SENTINEL, RawMovieRow};
use std::path::Path;

/// Columns every catalog file must carry
pub const REQUIRED_COLUMNS: [&str; 3] = ["movieId", "title", "genres"];

/// Read every row of a catalog CSV file.
///
/// Fails if the file is missing, the header lacks a required column, or a row
/// has a malformed `movieId`. Malformed optional columns are read as absent.
pub fn read_catalog_csv(path: &Path) -> Result<Vec<RawMovieRow>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h.trim() == *column))
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns {
            missing: missing.join(", "),
        });
    }

    let file = path.display().to_string();
    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<RawMovieRow>().enumerate() {
        let row = result.map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: e.position().map(|p| p.line() as usize).unwrap_or(idx + 2),
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Find a parenthesised 4-digit year anywhere in a title.
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
pub fn extract_year_from_title(title: &str) -> Option<u16> {
    title
        .as_bytes()
        .windows(6)
        .find(|w| is_year_group(w))
        .and_then(|w| std::str::from_utf8(&w[1..5]).ok())
        .and_then(|digits| digits.parse().ok())
}

/// Strip a trailing "(YYYY)" suffix and surrounding whitespace.
///
/// Example: "Heat (1995)" -> "Heat"
///          "(500) Days of Summer (2009)" -> "(500) Days of Summer"
pub fn clean_title(title: &str) -> String {
    let trimmed = title.trim_end();
    let bytes = trimmed.as_bytes();
    let stripped = if bytes.len() >= 6 && is_year_group(&bytes[bytes.len() - 6..]) {
        &trimmed[..trimmed.len() - 6]
    } else {
        trimmed
    };
    stripped.trim().to_string()
}

/// Split a pipe-separated genre string into tags.
///
/// Tags are trimmed; empty tags and the "(no genres listed)" sentinel are
/// dropped. Order is preserved.
pub fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|genre| !genre.is_empty() && *genre != NO_GENRES_SENTINEL)
        .map(str::to_string)
        .collect()
}

fn is_year_group(window: &[u8]) -> bool {
    window.len() == 6
        && window[0] == b'('
        && window[5] == b')'
        && window[1..5].iter().all(u8::is_ascii_digit)
}
