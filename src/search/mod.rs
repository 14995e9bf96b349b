//! Metadata lookups: a chain of providers behind a coalescing cache, with a
//! matcher picking the winning result.

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::cache::SearchCache;
use crate::error::{ProviderError, SearchError};
use crate::media::{validate_year, Candidate, MediaType};

pub mod google;
pub mod matcher;
pub mod omdb;
pub mod tmdb;
pub mod tvmaze;

pub use matcher::{rank, Matcher, DEFAULT_THRESHOLD};

/// A metadata source answering free-text title searches.
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// TV specialised providers are only asked about series, and asked first.
    fn is_tv(&self) -> bool {
        false
    }

    fn search(
        &self,
        query: &str,
        year: &str,
        media_type: Option<MediaType>,
    ) -> Result<Vec<Candidate>, ProviderError>;
}

/// Credentials and limits for the bundled HTTP providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub tmdb_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub timeout: Duration,
}

/// Builds the default chain: TVMaze, then TMDB and OMDB when keyed, then the
/// Google/IMDB fallback (which resolves through TMDB).
pub fn default_providers(
    settings: &ProviderSettings,
) -> Result<Vec<Box<dyn SearchProvider>>, ProviderError> {
    let client = Client::builder().timeout(settings.timeout).build()?;
    let mut providers: Vec<Box<dyn SearchProvider>> =
        vec![Box::new(tvmaze::TvMaze::new(client.clone()))];
    if let Some(key) = &settings.tmdb_api_key {
        providers.push(Box::new(tmdb::Tmdb::new(client.clone(), key.as_str())));
    }
    if let Some(key) = &settings.omdb_api_key {
        providers.push(Box::new(omdb::Omdb::new(client.clone(), key.as_str())));
    }
    if let Some(key) = &settings.tmdb_api_key {
        let no_redirects = Client::builder()
            .timeout(settings.timeout)
            .redirect(Policy::none())
            .build()?;
        let tmdb = tmdb::Tmdb::new(client, key.as_str());
        providers.push(Box::new(google::GoogleImdb::new(no_redirects, tmdb)));
    } else {
        log::warn!("no TMDB API key, movie searches will find nothing");
    }
    Ok(providers)
}

/// Resolves queries to their best matching title.
///
/// Owns the result cache: share one `Searcher` (behind an `Arc`) between
/// every worker of a run so duplicate queries only hit the providers once.
pub struct Searcher {
    providers: Vec<Box<dyn SearchProvider>>,
    threshold: i32,
    cache: SearchCache,
}

impl Searcher {
    pub fn new(providers: Vec<Box<dyn SearchProvider>>, threshold: i32) -> Searcher {
        Searcher {
            providers,
            threshold,
            cache: SearchCache::new(),
        }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Searches for `query`, optionally narrowed by `year` and `media_type`.
    ///
    /// Results are cached by query. Concurrent calls for a query already being
    /// searched wait for that search and get its outcome, errors included.
    pub fn search(
        &self,
        query: &str,
        year: &str,
        media_type: Option<MediaType>,
    ) -> Result<Candidate, SearchError> {
        validate_year(year)?;
        self.cache
            .get_or_compute(query, || self.dispatch(query, year, media_type))
    }

    /// [`Searcher::search`] with the media type as text (`""`, `"movie"` or
    /// `"series"`).
    pub fn search_str(
        &self,
        query: &str,
        year: &str,
        media_type: &str,
    ) -> Result<Candidate, SearchError> {
        let media_type = match media_type {
            "" => None,
            mt => Some(mt.parse::<MediaType>()?),
        };
        self.search(query, year, media_type)
    }

    /// Providers to ask, in order: TV providers lead for series and are
    /// skipped otherwise.
    fn chain(&self, media_type: Option<MediaType>) -> Vec<&dyn SearchProvider> {
        let tv = self.providers.iter().filter(|p| p.is_tv());
        let general = self.providers.iter().filter(|p| !p.is_tv());
        match media_type {
            Some(MediaType::Series) => tv.chain(general).map(|p| p.as_ref()).collect(),
            _ => general.map(|p| p.as_ref()).collect(),
        }
    }

    fn dispatch(
        &self,
        query: &str,
        year: &str,
        media_type: Option<MediaType>,
    ) -> Result<Candidate, SearchError> {
        let mut msg = format!("Searching '{query}'");
        if let Some(mt) = media_type {
            msg.push_str(&format!(" ({mt})"));
        }
        if !year.is_empty() {
            msg.push_str(&format!(" from {year}"));
        }
        log::info!(target: "cli", "{msg}");

        let mut last_error = None;
        for provider in self.chain(media_type) {
            match provider.search(query, year, media_type) {
                Ok(candidates) if !candidates.is_empty() => {
                    log::debug!(
                        "{} returned {} results for '{query}'",
                        provider.name(),
                        candidates.len()
                    );
                    return rank(candidates, query, year, media_type, self.threshold);
                }
                Ok(_) => log::debug!("{} has no results for '{query}'", provider.name()),
                Err(e) => {
                    log::warn!("{} search for '{query}' failed: {e}", provider.name());
                    last_error = Some(e.to_string());
                }
            }
        }
        Err(last_error.map_or(SearchError::NoResults, SearchError::ProvidersFailed))
    }
}
