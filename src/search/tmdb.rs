use reqwest::blocking::Client;
use serde_derive::Deserialize;
use url::Url;

use super::SearchProvider;
use crate::error::ProviderError;
use crate::media::{Candidate, MediaType};

const TMDB_API_URL: &str = "https://api.themoviedb.org/3/";

// Movies carry title/release_date, shows name/first_air_date; multi search
// mixes both (and people, which have neither).
#[derive(Deserialize, Debug, Default)]
struct TmdbResult {
    title: Option<String>,
    release_date: Option<String>,
    name: Option<String>,
    first_air_date: Option<String>,
}

impl TmdbResult {
    fn to_candidate(&self) -> Option<Candidate> {
        match (&self.title, &self.release_date, &self.name, &self.first_air_date) {
            (Some(title), Some(released), _, _) => {
                Candidate::new(title.as_str(), released, MediaType::Movie)
            }
            (_, _, Some(name), Some(aired)) => {
                Candidate::new(name.as_str(), aired, MediaType::Series)
            }
            _ => None,
        }
    }
}

#[derive(Deserialize, Debug)]
struct TmdbSearch {
    #[serde(default)]
    results: Vec<TmdbResult>,
    status_message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TmdbFind {
    #[serde(default)]
    movie_results: Vec<TmdbResult>,
    #[serde(default)]
    tv_results: Vec<TmdbResult>,
    status_message: Option<String>,
}

/// The Movie Database search, movies and series alike.
pub struct Tmdb {
    client: Client,
    api_key: String,
}

impl Tmdb {
    pub fn new(client: Client, api_key: impl Into<String>) -> Tmdb {
        Tmdb {
            client,
            api_key: api_key.into(),
        }
    }

    fn get<T>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, ProviderError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut url = Url::parse(TMDB_API_URL)?.join(path)?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("api_key", &self.api_key);
        // error bodies are json too, decode before looking at the status
        Ok(self.client.get(url).send()?.json::<T>()?)
    }

    /// Looks up an IMDB id (`tt0133093`), used by the web search fallback.
    pub fn find_imdb(&self, imdb_id: &str) -> Result<Vec<Candidate>, ProviderError> {
        let found: TmdbFind =
            self.get(&format!("find/{imdb_id}"), &[("external_source", "imdb_id")])?;
        if let Some(message) = found.status_message {
            return Err(ProviderError::Api { provider: "tmdb", message });
        }
        Ok(found
            .movie_results
            .iter()
            .chain(found.tv_results.iter())
            .filter_map(TmdbResult::to_candidate)
            .collect())
    }
}

impl SearchProvider for Tmdb {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn search(
        &self,
        query: &str,
        year: &str,
        media_type: Option<MediaType>,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let (path, year_key) = match media_type {
            Some(MediaType::Movie) => ("search/movie", "year"),
            Some(MediaType::Series) => ("search/tv", "first_air_date_year"),
            None => ("search/multi", "year"),
        };
        let mut params = vec![("query", query)];
        if !year.is_empty() {
            params.push((year_key, year));
        }
        let found: TmdbSearch = self.get(path, &params)?;
        if let Some(message) = found.status_message {
            return Err(ProviderError::Api { provider: "tmdb", message });
        }
        Ok(found.results.iter().filter_map(TmdbResult::to_candidate).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_multi_search() {
        let body = r#"{"page": 1, "results": [
            {"id": 603, "media_type": "movie", "title": "The Matrix", "release_date": "1999-03-30"},
            {"id": 1, "media_type": "tv", "name": "Fargo", "first_air_date": "2014-04-15"},
            {"id": 2, "media_type": "person", "name": "Keanu Reeves"},
            {"id": 3, "media_type": "movie", "title": "Untitled", "release_date": ""}
        ], "total_results": 4, "total_pages": 1}"#;
        let found: TmdbSearch = serde_json::from_str(body).unwrap();
        let candidates: Vec<Candidate> = found.results.iter().filter_map(TmdbResult::to_candidate).collect();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "The Matrix");
        assert_eq!(candidates[0].media_type, MediaType::Movie);
        assert_eq!(candidates[0].year, "1999");
        assert_eq!(candidates[1].title, "Fargo");
        assert_eq!(candidates[1].media_type, MediaType::Series);
        assert_eq!(candidates[1].year, "2014");
    }

    #[test]
    fn test_decode_error() {
        let body = r#"{"status_code": 7, "status_message": "Invalid API key: You must be granted a valid key.", "success": false}"#;
        let found: TmdbSearch = serde_json::from_str(body).unwrap();
        assert!(found.results.is_empty());
        assert!(found.status_message.unwrap().starts_with("Invalid API key"));
    }
}
