use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};

use crate::error::ParseError;
use crate::media::MediaType;
use crate::normalize::normalize;

// Every pattern below runs over normalized text (lowercase words separated by
// single spaces), except the season/episode fallback which sees the raw name.
lazy_static! {
    static ref SAMPLE: Regex = Regex::new(r"\bsample\b").unwrap();
    static ref EXTENSION: Regex = Regex::new(r"\.\w+$").unwrap();
    static ref EPISODE_DATE: Regex = Regex::new(
        r"^(.+?\b)((19\d\d|20\d\d) \d{2} \d{2}|\d{2} \d{2} (19\d\d|20\d\d))\b"
    ).unwrap();
    static ref DOUBLE_EPISODE: Regex = Regex::new(
        r"^(.+?)\bs?(\d{1,2})(?:e|x|xe)?(\d{2}).?(?:e|x|xe)?(\d{2})\b"
    ).unwrap();
    static ref SEASON_EPISODE: Regex = Regex::new(
        r"(?i)^(.+?)\b(?:season ?|s)?(\d{1,2})(?:e(?:pisode)?|xe|x| e(?:pisode)?| (?:episode )?)(\d{1,2})\b"
    ).unwrap();
    static ref SEASON_PHRASE: Regex = Regex::new(r"(?i)\bseason[\s.\-]*\d{1,2}\b").unwrap();
    static ref JOINED_EPISODE: Regex = Regex::new(r"^(.+?\b)(\d)(\d{2})\b").unwrap();
    static ref YEAR: Regex = Regex::new(r"^(.+?\b)(19\d\d|20\d\d)\b").unwrap();
    static ref PART: Regex = Regex::new(r"^(.+?\b)(\d{1,2})\b").unwrap();

    /// The extraction cascade, in precedence order.
    pub static ref RULES: Vec<Box<dyn Rule>> = vec![
        Box::new(EpisodeDateRule),
        Box::new(DoubleEpisodeRule),
        Box::new(SeasonEpisodeRule),
        Box::new(SeasonPhraseRule),
        Box::new(JoinedEpisodeRule),
        Box::new(YearRule),
        Box::new(PartRule),
    ];
}

/// What a file name says about itself, before any lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// File stem, prefixed with the ancestor directory names pulled in by depth.
    pub raw_name: String,
    /// Normalized name with every structural token stripped.
    pub query: String,
    pub media_type: Option<MediaType>,
    pub season: u32,
    pub episode: Option<u32>,
    pub extra_episode: Option<u32>,
    /// `yyyy-mm-dd` (or `dd-mm-yyyy`) for weekly shows.
    pub episode_date: String,
    pub year: String,
    /// Without the dot.
    pub ext: String,
    pub path: PathBuf,
}

impl ParsedQuery {
    fn new(raw_name: &str) -> ParsedQuery {
        ParsedQuery {
            raw_name: raw_name.to_string(),
            query: normalize(raw_name),
            media_type: None,
            season: 1,
            episode: None,
            extra_episode: None,
            episode_date: String::new(),
            year: String::new(),
            ext: String::new(),
            path: PathBuf::new(),
        }
    }

    fn apply(&mut self, m: RuleMatch) {
        match m.extracted {
            Extracted::EpisodeDate(date) => {
                self.media_type = Some(MediaType::Series);
                self.episode_date = date;
            }
            Extracted::Episode { season, episode, extra_episode } => {
                self.media_type = Some(MediaType::Series);
                self.season = season;
                self.episode = Some(episode);
                self.extra_episode = extra_episode;
            }
            Extracted::Year(year) => {
                self.media_type.get_or_insert(MediaType::Movie);
                self.year = year;
            }
            Extracted::Part(part) => self.episode = Some(part),
            Extracted::Nothing => {}
        }
        if let Some(remaining) = m.remaining {
            self.query = remaining;
        }
    }
}

/// Fields pulled out of the name by one rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    EpisodeDate(String),
    Episode {
        season: u32,
        episode: u32,
        extra_episode: Option<u32>,
    },
    Year(String),
    Part(u32),
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub extracted: Extracted,
    /// The query with the matched token (and what follows it) removed, or
    /// `None` to leave the query as it was.
    pub remaining: Option<String>,
}

/// One step of the extraction cascade.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the rule runs at all given what earlier rules found.
    fn applies(&self, parsed: &ParsedQuery) -> bool {
        parsed.media_type.is_none()
    }

    fn try_match(&self, query: &str) -> Option<RuleMatch>;

    /// Second chance against the untrimmed raw name.
    fn fallback(&self, _raw_name: &str) -> Option<RuleMatch> {
        None
    }
}

fn number(caps: &Captures, i: usize) -> Option<u32> {
    caps.get(i)?.as_str().parse().ok()
}

fn prefix(caps: &Captures) -> Option<String> {
    caps.get(1).map(|m| m.as_str().to_string())
}

/// `show 2020 05 12` or `show 12 05 2020`.
pub struct EpisodeDateRule;

impl Rule for EpisodeDateRule {
    fn name(&self) -> &'static str {
        "episode-date"
    }

    fn try_match(&self, query: &str) -> Option<RuleMatch> {
        let caps = EPISODE_DATE.captures(query)?;
        Some(RuleMatch {
            extracted: Extracted::EpisodeDate(caps[2].replacen(' ', "-", 2)),
            remaining: prefix(&caps),
        })
    }
}

/// `show s02e05e06`, `show 2x05x06`.
pub struct DoubleEpisodeRule;

impl Rule for DoubleEpisodeRule {
    fn name(&self) -> &'static str {
        "double-episode"
    }

    fn try_match(&self, query: &str) -> Option<RuleMatch> {
        let caps = DOUBLE_EPISODE.captures(query)?;
        Some(RuleMatch {
            extracted: Extracted::Episode {
                season: number(&caps, 2)?,
                episode: number(&caps, 3)?,
                extra_episode: Some(number(&caps, 4)?),
            },
            remaining: prefix(&caps),
        })
    }
}

/// `show s01e02`, `show 1x02`, `show season 1 episode 2`.
pub struct SeasonEpisodeRule;

impl SeasonEpisodeRule {
    fn episode(caps: &Captures) -> Option<Extracted> {
        Some(Extracted::Episode {
            season: number(caps, 2)?,
            episode: number(caps, 3)?,
            extra_episode: None,
        })
    }
}

impl Rule for SeasonEpisodeRule {
    fn name(&self) -> &'static str {
        "season-episode"
    }

    fn try_match(&self, query: &str) -> Option<RuleMatch> {
        let caps = SEASON_EPISODE.captures(query)?;
        Some(RuleMatch {
            extracted: Self::episode(&caps)?,
            remaining: prefix(&caps),
        })
    }

    fn fallback(&self, raw_name: &str) -> Option<RuleMatch> {
        let caps = SEASON_EPISODE.captures(raw_name)?;
        Some(RuleMatch {
            extracted: Self::episode(&caps)?,
            remaining: None,
        })
    }
}

/// Drops a leftover `season 2` (usually from a folder name) from series queries.
pub struct SeasonPhraseRule;

impl Rule for SeasonPhraseRule {
    fn name(&self) -> &'static str {
        "season-phrase"
    }

    fn applies(&self, parsed: &ParsedQuery) -> bool {
        parsed.media_type == Some(MediaType::Series)
    }

    fn try_match(&self, query: &str) -> Option<RuleMatch> {
        if !SEASON_PHRASE.is_match(query) {
            return None;
        }
        Some(RuleMatch {
            extracted: Extracted::Nothing,
            remaining: Some(normalize(&SEASON_PHRASE.replace_all(query, ""))),
        })
    }
}

/// `show 102` as season 1 episode 2.
pub struct JoinedEpisodeRule;

impl Rule for JoinedEpisodeRule {
    fn name(&self) -> &'static str {
        "joined-episode"
    }

    fn try_match(&self, query: &str) -> Option<RuleMatch> {
        let caps = JOINED_EPISODE.captures(query)?;
        Some(RuleMatch {
            extracted: Extracted::Episode {
                season: number(&caps, 2)?,
                episode: number(&caps, 3)?,
                extra_episode: None,
            },
            remaining: prefix(&caps),
        })
    }
}

/// `movie 2012`. Runs whatever the type, only claims "movie" when nothing
/// else has.
pub struct YearRule;

impl Rule for YearRule {
    fn name(&self) -> &'static str {
        "year"
    }

    fn applies(&self, _parsed: &ParsedQuery) -> bool {
        true
    }

    fn try_match(&self, query: &str) -> Option<RuleMatch> {
        let caps = YEAR.captures(query)?;
        Some(RuleMatch {
            extracted: Extracted::Year(caps[2].to_string()),
            remaining: prefix(&caps),
        })
    }
}

/// `movie 2` as part/episode 2. A weak hint: the type is left to the search
/// and the query is not trimmed.
pub struct PartRule;

impl Rule for PartRule {
    fn name(&self) -> &'static str {
        "part"
    }

    fn try_match(&self, query: &str) -> Option<RuleMatch> {
        let caps = PART.captures(query)?;
        Some(RuleMatch {
            extracted: Extracted::Part(number(&caps, 2)?),
            remaining: None,
        })
    }
}

/// Runs the cascade over a (depth-prefixed) file stem. Never fails, at worst
/// the query is the whole normalized name with no hints.
pub fn extract(raw_name: &str) -> ParsedQuery {
    let mut parsed = ParsedQuery::new(raw_name);
    for rule in RULES.iter() {
        if !rule.applies(&parsed) {
            continue;
        }
        let matched = rule
            .try_match(&parsed.query)
            .or_else(|| rule.fallback(&parsed.raw_name));
        if let Some(m) = matched {
            log::debug!("rule {} matched '{}': {:?}", rule.name(), parsed.query, m.extracted);
            parsed.apply(m);
        }
    }
    parsed.query = parsed.query.trim().to_string();
    parsed
}

/// Parses a media file path. `depth` ancestor directory names (closest to the
/// file, `-1` for all of them) are prepended to the stem so a folder like
/// `My Show Season 2/` can supply what `S02E05.mp4` lacks.
pub fn parse_path(path: &Path, depth: i32) -> Result<ParsedQuery, ParseError> {
    if SAMPLE.is_match(&path.to_string_lossy().to_lowercase()) {
        return Err(ParseError::Sample);
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .ok_or_else(|| ParseError::NoFileName(path.to_path_buf()))?;
    let ext = EXTENSION.find(&file_name).map(|m| m.as_str()).unwrap_or("");
    let stem = &file_name[..file_name.len() - ext.len()];

    let dirs: Vec<String> = path
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    let take = usize::try_from(depth).map_or(dirs.len(), |d| d.min(dirs.len()));
    let mut parts = dirs[dirs.len() - take..].to_vec();
    parts.push(stem.to_string());

    let mut parsed = extract(&parts.join(" "));
    parsed.ext = ext.trim_start_matches('.').to_string();
    parsed.path = path.to_path_buf();
    log::debug!("'{}' -> '{}'", parsed.raw_name, parsed.query);
    Ok(parsed)
}
