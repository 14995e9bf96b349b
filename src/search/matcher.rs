use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::SearchError;
use crate::media::{Candidate, MediaType};
use crate::normalize::accuracy;

/// Default accuracy a result needs to be accepted. 100 is an exact match.
pub const DEFAULT_THRESHOLD: i32 = 95;

/// Collects search results and picks the best one for a query.
pub struct Matcher<'a> {
    query: &'a str,
    year: &'a str,
    threshold: i32,
    results: Vec<Candidate>,
    /// title -> index of the first result with that title
    titles: HashMap<String, usize>,
}

impl<'a> Matcher<'a> {
    pub fn new(query: &'a str, year: &'a str, threshold: i32) -> Matcher<'a> {
        Matcher {
            query,
            year,
            threshold,
            results: Vec::new(),
            titles: HashMap::new(),
        }
    }

    pub fn add(&mut self, mut candidate: Candidate) {
        candidate.accuracy = accuracy(self.query, &candidate.title);
        match self.titles.get(&candidate.title) {
            Some(&first) => {
                self.results[first].is_dupe = true;
                candidate.is_dupe = true;
            }
            None => {
                self.titles.insert(candidate.title.clone(), self.results.len());
            }
        }
        self.results.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Most accurate result; ties go to the requested year, or failing that
    /// to the newest. Fails when nothing reaches the threshold.
    pub fn best_match(mut self) -> Result<Candidate, SearchError> {
        let year = self.year;
        self.results.sort_by(|a, b| compare(a, b, year));
        for (i, r) in self.results.iter().enumerate() {
            log::debug!("#{i}: {r} (acc: {})", r.accuracy);
        }
        let best = self.results.into_iter().next().ok_or(SearchError::NoResults)?;
        if best.accuracy < self.threshold {
            return Err(SearchError::BelowThreshold {
                title: best.title,
                accuracy: best.accuracy,
            });
        }
        Ok(best)
    }
}

fn compare(a: &Candidate, b: &Candidate, year: &str) -> Ordering {
    b.accuracy.cmp(&a.accuracy).then_with(|| {
        if year.is_empty() {
            b.year.cmp(&a.year)
        } else {
            (b.year == year).cmp(&(a.year == year))
        }
    })
}

/// Ranks provider results for `query`. With a type hint, results of the other
/// type are only considered when none of the hinted type came back.
pub fn rank(
    candidates: Vec<Candidate>,
    query: &str,
    year: &str,
    media_type: Option<MediaType>,
    threshold: i32,
) -> Result<Candidate, SearchError> {
    let (matching, other): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| media_type.map_or(true, |mt| c.media_type == mt));
    let pool = if matching.is_empty() { other } else { matching };
    let mut matcher = Matcher::new(query, year, threshold);
    for candidate in pool {
        matcher.add(candidate);
    }
    matcher.best_match()
}
