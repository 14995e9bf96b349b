use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, LOCATION, USER_AGENT};
use reqwest::StatusCode;
use url::Url;

use super::tmdb::Tmdb;
use super::SearchProvider;
use crate::error::ProviderError;
use crate::media::{Candidate, MediaType};

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
const BROWSER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_2) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2272.118 Safari/537.36";

lazy_static! {
    static ref IMDB_ID: Regex = Regex::new(r"/(tt\d+)/").unwrap();
}

/// Last resort: an "I'm feeling lucky" search restricted to imdb.com, whose
/// redirect carries an IMDB id that TMDB then resolves.
///
/// `client` must not follow redirects.
pub struct GoogleImdb {
    client: Client,
    tmdb: Tmdb,
}

impl GoogleImdb {
    pub fn new(client: Client, tmdb: Tmdb) -> GoogleImdb {
        GoogleImdb { client, tmdb }
    }
}

fn lucky_query(query: &str, year: &str, media_type: Option<MediaType>) -> String {
    let mut q = query.to_string();
    if !year.is_empty() {
        q.push(' ');
        q.push_str(year);
    }
    if let Some(mt) = media_type {
        q.push(' ');
        q.push_str(&mt.to_string());
    }
    q.push_str(" site:imdb.com");
    q
}

fn imdb_id(location: &str) -> Option<&str> {
    IMDB_ID.captures(location).and_then(|c| c.get(1)).map(|m| m.as_str())
}

impl SearchProvider for GoogleImdb {
    fn name(&self) -> &'static str {
        "google"
    }

    fn search(
        &self,
        query: &str,
        year: &str,
        media_type: Option<MediaType>,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let q = lucky_query(query, year, media_type);
        let url = Url::parse_with_params(GOOGLE_SEARCH_URL, &[("btnI", ""), ("q", q.as_str())])?;
        let resp = self
            .client
            .head(url)
            .header(ACCEPT, "*/*")
            .header(USER_AGENT, BROWSER_AGENT)
            .send()?;
        if resp.status() != StatusCode::FOUND {
            return Err(ProviderError::Api {
                provider: "google",
                message: format!("search failed ({})", resp.status()),
            });
        }
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|l| l.to_str().ok())
            .unwrap_or_default();
        let id = imdb_id(location).ok_or_else(|| ProviderError::Api {
            provider: "google",
            message: format!("no IMDB match ({location})"),
        })?;
        self.tmdb.find_imdb(id)
    }
}
