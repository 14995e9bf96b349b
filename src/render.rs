use regex::Regex;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

use crate::error::RenderError;
use crate::media::{MatchedResult, MediaType};

pub const DEFAULT_TV_TEMPLATE: &str = "{% if episode_date %}{{ name }} {{ episode_date }}\
    {% else %}{{ name }} S{{ season | pad }}E{{ episode | pad }}\
    {% if extra_episode is number %}-{{ extra_episode | pad }}{% endif %}{% endif %}.{{ ext }}";

pub const DEFAULT_MOVIE_TEMPLATE: &str = "{{ name }} ({{ year }}).{{ ext }}";

const TV: &str = "tv";
const MOVIE: &str = "movie";

lazy_static! {
    static ref INVALID_CHARS: Regex = Regex::new(r"[^\p{Greek}\p{P}\p{N}\p{L}_\-. ()/\\]").unwrap();
    static ref DOUBLE_DASH: Regex = Regex::new(r"-(?:\s*-\s*)+ ").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// Destination naming templates. Empty means the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathConfig {
    pub tv_template: String,
    pub movie_template: String,
}

/// Renders matched results into relative destination paths.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new(config: &PathConfig) -> Result<Renderer, RenderError> {
        let mut tera = Tera::default();
        tera.register_filter("pad", pad);
        tera.add_raw_template(TV, or_default(&config.tv_template, DEFAULT_TV_TEMPLATE))?;
        tera.add_raw_template(MOVIE, or_default(&config.movie_template, DEFAULT_MOVIE_TEMPLATE))?;
        Ok(Renderer { tera })
    }

    pub fn render(&self, result: &MatchedResult) -> Result<String, RenderError> {
        let template = match result.media_type {
            MediaType::Series => {
                if result.episode.is_none() && result.episode_date.is_empty() {
                    return Err(RenderError::MissingEpisode(result.name.clone()));
                }
                TV
            }
            MediaType::Movie => {
                if result.episode.is_some() {
                    return Err(RenderError::EpisodeOnMovie(result.name.clone()));
                }
                MOVIE
            }
        };
        let context = Context::from_serialize(result)?;
        let rendered = self.tera.render(template, &context)?;
        Ok(sanitize_path(&rendered))
    }
}

fn or_default<'a>(template: &'a str, default: &'a str) -> &'a str {
    if template.is_empty() {
        default
    } else {
        template
    }
}

/// `{{ n | pad }}` zero-pads a number, to 2 digits unless `width` says otherwise.
fn pad(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let width = match args.get("width") {
        Some(w) => w
            .as_u64()
            .ok_or_else(|| tera::Error::msg(format!("pad: invalid width {w}")))? as usize,
        None => 2,
    };
    let n = value
        .as_u64()
        .ok_or_else(|| tera::Error::msg(format!("pad: {value} is not a number")))?;
    Ok(Value::String(format!("{n:0width$}")))
}

/// Makes a rendered name safe to use as a path: drops apostrophes, turns
/// colons into ` -` and anything that is not a letter, digit, punctuation,
/// space or path separator into `-`, then collapses dash and space runs.
pub fn sanitize_path(s: &str) -> String {
    let s = s.replace('\'', "").replace(':', " -");
    let mut s = INVALID_CHARS.replace_all(&s, "-").into_owned();
    loop {
        let dashes = DOUBLE_DASH.replace_all(&s, "- ");
        let next = SPACES.replace_all(&dashes, " ").into_owned();
        if next == s {
            return s;
        }
        s = next;
    }
}
