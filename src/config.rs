use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::relocate::RelocateMode;
use crate::render::PathConfig;
use crate::search::DEFAULT_THRESHOLD;

pub const DEFAULT_EXTENSIONS: &str = "mp4,m4v,avi,mkv,mpeg,mpg,mov,webm";
pub const DEFAULT_MIN_FILE_SIZE: u64 = 25_000_000;
pub const DEFAULT_CONCURRENCY: usize = 6;
pub const DEFAULT_FILE_LIMIT: usize = 1000;
pub const DEFAULT_WATCH_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move,
    Copy,
    Link,
}

impl FromStr for Action {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move" => Ok(Action::Move),
            "copy" => Ok(Action::Copy),
            "link" => Ok(Action::Link),
            other => Err(ConfigError::InvalidAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Hard,
    Sym,
}

impl FromStr for LinkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hard" => Ok(LinkType::Hard),
            "sym" => Ok(LinkType::Sym),
            other => Err(ConfigError::InvalidLinkType(other.to_string())),
        }
    }
}

/// Everything a sort run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    /// Files and directories to sort.
    pub targets: Vec<PathBuf>,
    pub movie_dir: PathBuf,
    pub tv_dir: PathBuf,
    pub path_config: PathConfig,
    /// Lowercase, without dots.
    pub extensions: Vec<String>,
    pub min_file_size: u64,
    pub recursive: bool,
    /// Ancestor directory names added to the search query, -1 for all.
    pub depth: i32,
    pub dry_run: bool,
    pub skip_hidden: bool,
    pub skip_subtitles: bool,
    pub action: Action,
    pub link_type: LinkType,
    pub overwrite: bool,
    pub overwrite_if_larger: bool,
    pub watch: bool,
    pub watch_delay: Duration,
    pub concurrency: usize,
    pub file_limit: usize,
    pub accuracy_threshold: i32,
    pub verbose: bool,
    pub tmdb_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        Config {
            targets: Vec::new(),
            movie_dir: home.join("movies"),
            tv_dir: home.join("tv"),
            path_config: PathConfig::default(),
            extensions: parse_extensions(DEFAULT_EXTENSIONS),
            min_file_size: DEFAULT_MIN_FILE_SIZE,
            recursive: false,
            depth: 0,
            dry_run: false,
            skip_hidden: false,
            skip_subtitles: false,
            action: Action::Move,
            link_type: LinkType::Hard,
            overwrite: false,
            overwrite_if_larger: false,
            watch: false,
            watch_delay: DEFAULT_WATCH_DELAY,
            concurrency: DEFAULT_CONCURRENCY,
            file_limit: DEFAULT_FILE_LIMIT,
            accuracy_threshold: DEFAULT_THRESHOLD,
            verbose: false,
            tmdb_api_key: None,
            omdb_api_key: None,
        }
    }
}

impl Config {
    /// Rejects option combinations that make no sense before any file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        if self.overwrite && self.overwrite_if_larger {
            return Err(ConfigError::ConflictingOverwrite);
        }
        if self.watch && !self.recursive {
            return Err(ConfigError::WatchWithoutRecursive);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    pub fn relocate_mode(&self) -> RelocateMode {
        match (self.action, self.link_type) {
            (Action::Move, _) => RelocateMode::Move,
            (Action::Copy, _) => RelocateMode::Copy,
            (Action::Link, LinkType::Hard) => RelocateMode::HardLink,
            (Action::Link, LinkType::Sym) => RelocateMode::SymLink,
        }
    }

    pub fn allows_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

/// `"mp4, .MKV"` -> `["mp4", "mkv"]`
pub fn parse_extensions(s: &str) -> Vec<String> {
    s.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            targets: vec![PathBuf::from("/downloads")],
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.extensions.len(), 8);
        assert!(c.movie_dir.ends_with("movies"));
        assert!(c.tv_dir.ends_with("tv"));
        assert_eq!(c.accuracy_threshold, 95);
        assert_eq!(c.relocate_mode(), RelocateMode::Move);
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn test_validate() {
        assert_eq!(Config::default().validate(), Err(ConfigError::NoTargets));
        let c = Config {
            overwrite: true,
            overwrite_if_larger: true,
            ..config()
        };
        assert_eq!(c.validate(), Err(ConfigError::ConflictingOverwrite));
        let c = Config { watch: true, ..config() };
        assert_eq!(c.validate(), Err(ConfigError::WatchWithoutRecursive));
        let c = Config {
            watch: true,
            recursive: true,
            ..config()
        };
        assert_eq!(c.validate(), Ok(()));
        let c = Config { concurrency: 0, ..config() };
        assert_eq!(c.validate(), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn test_action_and_link_type() {
        assert_eq!("copy".parse::<Action>(), Ok(Action::Copy));
        assert_eq!("rename".parse::<Action>(), Err(ConfigError::InvalidAction("rename".into())));
        assert_eq!("sym".parse::<LinkType>(), Ok(LinkType::Sym));
        assert_eq!("soft".parse::<LinkType>(), Err(ConfigError::InvalidLinkType("soft".into())));
        let c = Config {
            action: Action::Link,
            link_type: LinkType::Sym,
            ..config()
        };
        assert_eq!(c.relocate_mode(), RelocateMode::SymLink);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(parse_extensions("mp4, .MKV,,avi"), vec!["mp4", "mkv", "avi"]);
        assert!(config().allows_extension("MKV"));
        assert!(!config().allows_extension("srt"));
    }
}
