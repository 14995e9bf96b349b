use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`crate::Searcher::search`].
///
/// Cloneable so a coalesced search can hand the same outcome to every caller
/// waiting on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid year ({0})")]
    InvalidYear(String),
    #[error("invalid media type ({0})")]
    InvalidMediaType(String),
    #[error("no results")]
    NoResults,
    #[error("no results ({0})")]
    ProvidersFailed(String),
    #[error("no results (closest result was '{title}' with an accuracy score of {accuracy})")]
    BelowThreshold { title: String, accuracy: i32 },
    #[error("search for '{0}' was abandoned")]
    Abandoned(String),
}

/// A single provider failing. Logged and skipped by the dispatch chain.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("{provider}: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("skipped sample media")]
    Sample,
    #[error("no file name in {0}")]
    NoFileName(PathBuf),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template: {0}")]
    Template(#[from] tera::Error),
    #[error("tv series with no episode found '{0}'")]
    MissingEpisode(String),
    #[error("movie '{0}' has an episode number")]
    EpisodeOnMovie(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("please provide at least one file or directory")]
    NoTargets,
    #[error("invalid action '{0}' (expected move, copy or link)")]
    InvalidAction(String),
    #[error("invalid link type '{0}' (expected hard or sym)")]
    InvalidLinkType(String),
    #[error("overwrite and overwrite-if-larger are mutually exclusive")]
    ConflictingOverwrite,
    #[error("watch requires recursive mode")]
    WatchWithoutRecursive,
    #[error("watch requires at least one directory")]
    NothingToWatch,
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("'{0}' is a directory (recursive mode is off)")]
    NotRecursive(PathBuf),
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watcher: {0}")]
    Notify(#[from] notify::Error),
    #[error("watcher channel disconnected")]
    Disconnected,
}

/// Everything that can go wrong while resolving and relocating one file.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("file already exists '{0}'")]
    DestinationExists(PathBuf),
    #[error("{action} failed: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    pub(crate) fn io(action: &'static str) -> impl FnOnce(io::Error) -> ResolveError {
        move |source| ResolveError::Io { action, source }
    }
}

/// A per-file failure, tagged with the file's position in the batch.
#[derive(Debug, Error)]
#[error("[{index}] {}: {source}", .path.display())]
pub struct FileError {
    pub index: usize,
    pub path: PathBuf,
    #[source]
    pub source: ResolveError,
}

/// Fatal run-level errors: configuration, scanning and watching.
#[derive(Debug, Error)]
pub enum SortError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("scan: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Watch(#[from] WatchError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
