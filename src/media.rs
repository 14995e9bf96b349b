use regex::Regex;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::SearchError;
use crate::parse::ParsedQuery;

const YEAR: &str = r"(19\d\d|20\d\d)";

lazy_static! {
    static ref ONLY_YEAR: Regex = Regex::new(&format!("^{YEAR}$")).unwrap();
    static ref FIND_YEAR: Regex = Regex::new(&format!(r"\b{YEAR}\b")).unwrap();
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Series,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "series"),
        }
    }
}

impl FromStr for MediaType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "series" => Ok(MediaType::Series),
            other => Err(SearchError::InvalidMediaType(other.to_string())),
        }
    }
}

/// One search provider result.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    /// Always four digits, `19xx` or `20xx`.
    pub year: String,
    pub media_type: MediaType,
    /// Another candidate in the same result set has this exact title.
    pub is_dupe: bool,
    /// Filled in by the matcher.
    pub accuracy: i32,
}

impl Candidate {
    /// Builds a candidate from a free-form date or year string, rejecting
    /// results that carry no usable release year.
    pub fn new(
        title: impl Into<String>,
        released: &str,
        media_type: MediaType,
    ) -> Option<Candidate> {
        Some(Candidate {
            title: title.into(),
            year: release_year(released)?,
            media_type,
            is_dupe: false,
            accuracy: 0,
        })
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

/// A file resolved against a search result, ready to be rendered into a
/// destination path. Field names double as template variables.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchedResult {
    pub name: String,
    pub year: String,
    pub media_type: MediaType,
    pub season: u32,
    pub episode: Option<u32>,
    pub extra_episode: Option<u32>,
    pub episode_date: String,
    pub ext: String,
    pub accuracy: i32,
    pub query: String,
    pub path: PathBuf,
}

impl MatchedResult {
    pub fn new(parsed: ParsedQuery, candidate: Candidate) -> MatchedResult {
        let mut name = candidate.title;
        // same-titled series are told apart by their premiere year
        if candidate.media_type == MediaType::Series && candidate.is_dupe {
            name = format!("{} ({})", name, candidate.year);
        }
        MatchedResult {
            name,
            year: candidate.year,
            media_type: candidate.media_type,
            season: parsed.season,
            episode: parsed.episode,
            extra_episode: parsed.extra_episode,
            episode_date: parsed.episode_date,
            ext: parsed.ext,
            accuracy: candidate.accuracy,
            query: parsed.query,
            path: parsed.path,
        }
    }
}

/// Fails unless `year` is empty or a plausible four digit year.
pub fn validate_year(year: &str) -> Result<(), SearchError> {
    if year.is_empty() || ONLY_YEAR.is_match(year) {
        Ok(())
    } else {
        Err(SearchError::InvalidYear(year.to_string()))
    }
}

/// First `19xx`/`20xx` word in a date like `2008-02-13` or `2008–2013`.
pub fn release_year(s: &str) -> Option<String> {
    FIND_YEAR
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
