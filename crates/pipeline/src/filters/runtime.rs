//! Filter on runtime bucket.

use crate::traits::Filter;
use data_loader::MovieRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse runtime buckets, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeBucket {
    /// under 90
    Short,
    /// 90 to 120
    Medium,
    /// 121 to 180
    Long,
    /// over 180
    Epic,
}

impl RuntimeBucket {
    pub fn contains(&self, minutes: u32) -> bool {
        match self {
            RuntimeBucket::Short => minutes < 90,
            RuntimeBucket::Medium => (90..=120).contains(&minutes),
            RuntimeBucket::Long => minutes > 120 && minutes <= 180,
            RuntimeBucket::Epic => minutes > 180,
        }
    }
}

impl FromStr for RuntimeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(RuntimeBucket::Short),
            "medium" => Ok(RuntimeBucket::Medium),
            "long" => Ok(RuntimeBucket::Long),
            "epic" => Ok(RuntimeBucket::Epic),
            other => Err(format!("unknown runtime bucket: {}", other)),
        }
    }
}

impl fmt::Display for RuntimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeBucket::Short => "short",
            RuntimeBucket::Medium => "medium",
            RuntimeBucket::Long => "long",
            RuntimeBucket::Epic => "epic",
        };
        f.write_str(name)
    }
}

/// Keeps records whose runtime falls in a bucket.
///
/// Records without a runtime are dropped. The pipeline skips this filter
/// when the catalog has no runtime data at all.
pub struct RuntimeFilter {
    bucket: RuntimeBucket,
}

impl RuntimeFilter {
    pub fn new(bucket: RuntimeBucket) -> Self {
        Self { bucket }
    }
}

impl Filter for RuntimeFilter {
    fn name(&self) -> &str {
        "RuntimeFilter"
    }

    fn apply<'a>(&self, movies: Vec<&'a MovieRecord>) -> Vec<&'a MovieRecord> {
        movies
            .into_iter()
            .filter(|movie| movie.runtime.is_some_and(|minutes| self.bucket.contains(minutes)))
            .collect()
    }
}
