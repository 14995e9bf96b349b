use reqwest::blocking::Client;
use serde_derive::Deserialize;
use url::Url;

use super::SearchProvider;
use crate::error::ProviderError;
use crate::media::{Candidate, MediaType};

const OMDB_API_URL: &str = "https://www.omdbapi.com/";

// {"Search":[{"Title":"Tropic Thunder","Year":"2008","imdbID":"tt0942385","Type":"movie","Poster":"..."}],"totalResults":"1","Response":"True"}
#[derive(Deserialize, Debug)]
#[serde(rename_all(deserialize = "PascalCase"))]
struct OmdbSearchResult {
    title: String,
    year: String,
    /// movie, series, episode or game
    #[serde(rename = "Type")]
    kind: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all(deserialize = "PascalCase"))]
struct OmdbSearch {
    #[serde(default)]
    search: Vec<OmdbSearchResult>,
    error: Option<String>,
}

impl OmdbSearch {
    fn into_candidates(self) -> Result<Vec<Candidate>, ProviderError> {
        match self.error {
            // "Movie not found!" is just an empty result
            Some(message) if !message.contains("not found") => {
                Err(ProviderError::Api { provider: "omdb", message })
            }
            _ => Ok(self
                .search
                .into_iter()
                .filter_map(|r| {
                    let media_type = r.kind.parse::<MediaType>().ok()?;
                    Candidate::new(r.title, &r.year, media_type)
                })
                .collect()),
        }
    }
}

/// Open Movie Database title search.
pub struct Omdb {
    client: Client,
    api_key: String,
}

impl Omdb {
    pub fn new(client: Client, api_key: impl Into<String>) -> Omdb {
        Omdb {
            client,
            api_key: api_key.into(),
        }
    }
}

impl SearchProvider for Omdb {
    fn name(&self) -> &'static str {
        "omdb"
    }

    // Year and type are left out on purpose: other matches are needed to
    // spot same-titled results.
    fn search(
        &self,
        query: &str,
        _year: &str,
        _media_type: Option<MediaType>,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let params = [("apiKey", self.api_key.as_str()), ("s", query)];
        let url = Url::parse_with_params(OMDB_API_URL, &params)?;
        let found = self.client.get(url).send()?.json::<OmdbSearch>()?;
        found.into_candidates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search() {
        let body = r#"{"Search":[
            {"Title":"Tropic Thunder","Year":"2008","imdbID":"tt0942385","Type":"movie","Poster":"N/A"},
            {"Title":"Breaking Bad","Year":"2008–2013","imdbID":"tt0903747","Type":"series","Poster":"N/A"},
            {"Title":"Pilot","Year":"2008","imdbID":"tt0959621","Type":"episode","Poster":"N/A"}
        ],"totalResults":"3","Response":"True"}"#;
        let candidates = serde_json::from_str::<OmdbSearch>(body).unwrap().into_candidates().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].title, "Breaking Bad");
        assert_eq!(candidates[1].year, "2008");
        assert_eq!(candidates[1].media_type, MediaType::Series);
    }

    #[test]
    fn test_decode_not_found_and_errors() {
        let empty = r#"{"Response":"False","Error":"Movie not found!"}"#;
        assert!(serde_json::from_str::<OmdbSearch>(empty).unwrap().into_candidates().unwrap().is_empty());

        let bad_key = r#"{"Response":"False","Error":"Invalid API key!"}"#;
        assert!(matches!(
            serde_json::from_str::<OmdbSearch>(bad_key).unwrap().into_candidates(),
            Err(ProviderError::Api { provider: "omdb", .. })
        ));
    }
}
