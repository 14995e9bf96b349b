use reqwest::blocking::Client;
use serde_derive::Deserialize;
use url::Url;

use super::SearchProvider;
use crate::error::ProviderError;
use crate::media::{Candidate, MediaType};

const TVMAZE_SEARCH_URL: &str = "https://api.tvmaze.com/search/shows";

#[derive(Deserialize, Debug)]
struct TvMazeResult {
    show: TvMazeShow,
}

#[derive(Deserialize, Debug)]
struct TvMazeShow {
    name: String,
    premiered: Option<String>,
}

/// TVMaze show search. Free, keyless, series only.
pub struct TvMaze {
    client: Client,
}

impl TvMaze {
    pub fn new(client: Client) -> TvMaze {
        TvMaze { client }
    }
}

impl SearchProvider for TvMaze {
    fn name(&self) -> &'static str {
        "tvmaze"
    }

    fn is_tv(&self) -> bool {
        true
    }

    fn search(
        &self,
        query: &str,
        _year: &str,
        _media_type: Option<MediaType>,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let url = Url::parse_with_params(TVMAZE_SEARCH_URL, &[("q", query)])?;
        let results = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json::<Vec<TvMazeResult>>()?;
        Ok(to_candidates(results))
    }
}

fn to_candidates(results: Vec<TvMazeResult>) -> Vec<Candidate> {
    results
        .into_iter()
        .filter_map(|r| {
            let premiered = r.show.premiered.unwrap_or_default();
            Candidate::new(r.show.name, &premiered, MediaType::Series)
        })
        .collect()
}
