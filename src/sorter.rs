use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::{ConfigError, FileError, RenderError, ResolveError, SortError};
use crate::media::{MatchedResult, MediaType};
use crate::parse::parse_path;
use crate::relocate::{same_file, staging_path, FsRelocator, RelocateMode, Relocator};
use crate::render::Renderer;
use crate::search::{SearchProvider, Searcher};
use crate::watch::{ChangeSource, NotifyWatcher};

/// Files found by a scan, plus the directories visited (watch targets).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scan {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct SortReport {
    pub checked: usize,
    pub matched: usize,
    pub moved: usize,
    pub errors: Vec<FileError>,
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sorted {
    Relocated,
    AlreadySorted,
    DryRun,
}

pub struct Sorter {
    config: Config,
    searcher: Arc<Searcher>,
    renderer: Renderer,
    relocator: Box<dyn Relocator>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().map_or(false, |s| s.starts_with('.'))
}

impl Sorter {
    /// Builds a sorter with its own [`Searcher`] over `providers`, accepting
    /// matches from `config.accuracy_threshold` up.
    pub fn with_providers(
        config: Config,
        providers: Vec<Box<dyn SearchProvider>>,
    ) -> Result<Sorter, SortError> {
        let searcher = Searcher::new(providers, config.accuracy_threshold);
        Sorter::new(config, Arc::new(searcher))
    }

    /// Builds a sorter around a shared `searcher`. Its threshold applies,
    /// `config.accuracy_threshold` is not consulted.
    pub fn new(config: Config, searcher: Arc<Searcher>) -> Result<Sorter, SortError> {
        config.validate()?;
        let renderer = Renderer::new(&config.path_config)?;
        Ok(Sorter {
            config,
            searcher,
            renderer,
            relocator: Box::new(FsRelocator),
        })
    }

    pub fn with_relocator(mut self, relocator: impl Relocator + 'static) -> Sorter {
        self.relocator = Box::new(relocator);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Collects the media files under every target.
    pub fn scan(&self) -> Result<Scan, SortError> {
        let mut scan = Scan::default();
        for target in &self.config.targets {
            let meta = fs::metadata(target).map_err(|source| SortError::Io {
                path: target.clone(),
                source,
            })?;
            if !meta.is_dir() {
                self.add_file(&mut scan, target, meta.len());
                continue;
            }
            if !self.config.recursive {
                return Err(ConfigError::NotRecursive(target.clone()).into());
            }
            let skip_hidden = self.config.skip_hidden;
            let walker = WalkDir::new(target)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !(skip_hidden && e.depth() > 0 && is_hidden(e)));
            for entry in walker {
                let entry = entry?;
                if entry.file_type().is_dir() {
                    scan.dirs.push(entry.into_path());
                } else if entry.file_type().is_file() {
                    let len = entry.metadata()?.len();
                    self.add_file(&mut scan, entry.path(), len);
                }
            }
        }
        log::debug!("scan found {} files in {} directories", scan.files.len(), scan.dirs.len());
        Ok(scan)
    }

    fn add_file(&self, scan: &mut Scan, path: &Path, len: u64) {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !self.config.allows_extension(ext) || len < self.config.min_file_size {
            return;
        }
        if scan.files.len() >= self.config.file_limit {
            if scan.files.len() == self.config.file_limit {
                log::debug!("file limit ({}) reached, skipping the rest", self.config.file_limit);
            }
            return;
        }
        scan.files.push(path.to_path_buf());
    }

    /// Parses a path and finds its best search result.
    pub fn resolve(&self, path: &Path) -> Result<MatchedResult, ResolveError> {
        let parsed = parse_path(path, self.config.depth)?;
        let candidate = self
            .searcher
            .search(&parsed.query, &parsed.year, parsed.media_type)?;
        Ok(MatchedResult::new(parsed, candidate))
    }

    pub fn destination(&self, result: &MatchedResult) -> Result<PathBuf, RenderError> {
        let base = match result.media_type {
            MediaType::Series => &self.config.tv_dir,
            MediaType::Movie => &self.config.movie_dir,
        };
        Ok(base.join(self.renderer.render(result)?))
    }

    pub fn sort_file(&self, path: &Path) -> Result<Sorted, ResolveError> {
        let result = self.resolve(path)?;
        let dest = self.destination(&result)?;
        let mode = self.config.relocate_mode();
        log::info!(
            target: "cli",
            "{}\n  '{}'\n  └─> '{}'",
            mode.verb(),
            path.display(),
            dest.display()
        );
        let sorted = self.place(mode, path, &dest)?;
        if sorted == Sorted::Relocated && !self.config.skip_subtitles {
            let subtitle = path.with_extension("srt");
            if subtitle.is_file() {
                if let Err(e) = self.place(mode, &subtitle, &dest.with_extension("srt")) {
                    log::warn!("subtitle {}: {e}", subtitle.display());
                }
            }
        }
        Ok(sorted)
    }

    fn place(&self, mode: RelocateMode, src: &Path, dst: &Path) -> Result<Sorted, ResolveError> {
        let replacing = fs::symlink_metadata(dst).is_ok();
        if replacing {
            if same_file(src, dst).unwrap_or(false) {
                log::debug!("already sorted '{}'", dst.display());
                return Ok(Sorted::AlreadySorted);
            }
            if !self.may_overwrite(src, dst)? {
                return Err(ResolveError::DestinationExists(dst.to_path_buf()));
            }
        }
        if self.config.dry_run {
            return Ok(Sorted::DryRun);
        }
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(ResolveError::io("mkdir"))?;
        }
        // rename replaces the old file in one step, the other modes need a
        // staging file so the old one survives a failure
        if replacing && mode != RelocateMode::Move {
            self.replace(mode, src, dst)?;
        } else {
            self.relocator
                .relocate(mode, src, dst)
                .map_err(ResolveError::io(mode.name()))?;
        }
        Ok(Sorted::Relocated)
    }

    fn replace(&self, mode: RelocateMode, src: &Path, dst: &Path) -> Result<(), ResolveError> {
        let staged = staging_path(dst);
        match fs::remove_file(&staged) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                return Err(ResolveError::io("remove stale staging file")(e));
            }
            _ => {}
        }
        let placed = self
            .relocator
            .relocate(mode, src, &staged)
            .map_err(ResolveError::io(mode.name()))
            .and_then(|()| fs::rename(&staged, dst).map_err(ResolveError::io("replace")));
        if placed.is_err() {
            let _ = fs::remove_file(&staged);
        }
        placed
    }

    fn may_overwrite(&self, src: &Path, dst: &Path) -> Result<bool, ResolveError> {
        if self.config.overwrite {
            return Ok(true);
        }
        if !self.config.overwrite_if_larger {
            return Ok(false);
        }
        let src_len = fs::metadata(src).map_err(ResolveError::io("stat"))?.len();
        let dst_len = fs::metadata(dst).map(|m| m.len()).unwrap_or(0);
        Ok(src_len > dst_len)
    }

    /// Sorts `files` on a pool of `concurrency` workers. Per-file failures are
    /// logged and collected, they never stop the batch.
    pub fn sort(&self, files: &[PathBuf]) -> Result<SortReport, SortError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.concurrency)
            .build()?;
        let outcomes: Vec<_> = pool.install(|| {
            files
                .par_iter()
                .enumerate()
                .map(|(index, path)| (index, path, self.sort_file(path)))
                .collect()
        });

        let mut report = SortReport {
            checked: files.len(),
            ..SortReport::default()
        };
        for (index, path, outcome) in outcomes {
            match outcome {
                Ok(sorted) => {
                    report.matched += 1;
                    if sorted == Sorted::Relocated {
                        report.moved += 1;
                    }
                }
                Err(source) => {
                    let err = FileError {
                        index,
                        path: path.clone(),
                        source,
                    };
                    log::error!(target: "cli", "{err}");
                    report.errors.push(err);
                }
            }
        }
        log::info!(
            target: "cli",
            "Checked #{}, Matched #{}, Moved #{}",
            report.checked,
            report.matched,
            report.moved
        );
        Ok(report)
    }

    /// Scans and sorts once; in watch mode keeps re-sorting on changes and only
    /// returns on a fatal error.
    pub fn run(&self) -> Result<SortReport, SortError> {
        if self.config.dry_run {
            log::info!(target: "cli", "[Dryrun Mode]");
        }
        let scan = self.scan()?;
        if self.config.watch && scan.dirs.is_empty() {
            return Err(ConfigError::NothingToWatch.into());
        }
        let report = self.sort(&scan.files)?;
        if self.config.watch {
            self.watch(&scan)?;
        }
        Ok(report)
    }

    pub fn watch(&self, scan: &Scan) -> Result<(), SortError> {
        if scan.dirs.is_empty() {
            return Err(ConfigError::NothingToWatch.into());
        }
        let mut watcher = NotifyWatcher::new(&scan.dirs)?;
        log::info!(target: "cli", "Watching {} directories for changes", scan.dirs.len());
        self.watch_with(&mut watcher)
    }

    /// Re-sorts after every change reported by `source`, debounced by
    /// `watch_delay`. Returns when the source fails.
    pub fn watch_with(&self, source: &mut dyn ChangeSource) -> Result<(), SortError> {
        loop {
            source.wait()?;
            thread::sleep(self.config.watch_delay);
            source.drain();
            let scan = self.scan()?;
            self.sort(&scan.files)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Action;
    use crate::error::{SearchError, WatchError};
    use crate::search::tests::{movie, series, StubProvider};
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        downloads: PathBuf,
        tv: PathBuf,
        movies: PathBuf,
    }

    impl Fixture {
        fn new() -> Fixture {
            let dir = tempdir().unwrap();
            let downloads = dir.path().join("downloads");
            fs::create_dir(&downloads).unwrap();
            Fixture {
                tv: dir.path().join("tv"),
                movies: dir.path().join("movies"),
                downloads,
                _dir: dir,
            }
        }

        fn file(&self, name: &str, content: &str) -> PathBuf {
            let path = self.downloads.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }

        fn config(&self) -> Config {
            Config {
                targets: vec![self.downloads.clone()],
                movie_dir: self.movies.clone(),
                tv_dir: self.tv.clone(),
                recursive: true,
                min_file_size: 0,
                concurrency: 2,
                watch_delay: Duration::ZERO,
                ..Config::default()
            }
        }

        fn sorter(&self, config: Config) -> Sorter {
            let stub = StubProvider::new("stub", vec![series("Foo", "2019"), movie("Heat", "1995")]);
            let searcher = Searcher::new(vec![Box::new(stub)], 95);
            Sorter::new(config, Arc::new(searcher)).unwrap()
        }
    }

    #[test]
    fn test_sorts_series_and_movies() {
        let fx = Fixture::new();
        let episode = fx.file("foo s01e02.mp4", "episode");
        let film = fx.file("Heat.1995.1080p.BluRay.mkv", "film");
        let report = fx.sorter(fx.config()).run().unwrap();
        assert_eq!((report.checked, report.matched, report.moved), (2, 2, 2));
        assert!(report.errors.is_empty());
        assert_eq!(fs::read_to_string(fx.tv.join("Foo S01E02.mp4")).unwrap(), "episode");
        assert_eq!(fs::read_to_string(fx.movies.join("Heat (1995).mkv")).unwrap(), "film");
        assert!(!episode.exists());
        assert!(!film.exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let fx = Fixture::new();
        let episode = fx.file("foo s01e02.mp4", "episode");
        let config = Config {
            dry_run: true,
            ..fx.config()
        };
        let report = fx.sorter(config).run().unwrap();
        assert_eq!((report.matched, report.moved), (1, 0));
        assert!(episode.exists());
        assert!(!fx.tv.exists());
    }

    #[test]
    fn test_destination_exists() {
        let fx = Fixture::new();
        let episode = fx.file("foo s01e02.mp4", "episode");
        let dest = fx.tv.join("Foo S01E02.mp4");
        fs::create_dir_all(&fx.tv).unwrap();
        fs::write(&dest, "older episode").unwrap();

        let report = fx.sorter(fx.config()).run().unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(&report.errors[0].source, ResolveError::DestinationExists(p) if *p == dest));
        assert_eq!(report.errors[0].index, 0);
        assert!(episode.exists());

        // smaller source is not an upgrade
        let config = Config {
            overwrite_if_larger: true,
            ..fx.config()
        };
        assert_eq!(fx.sorter(config.clone()).run().unwrap().errors.len(), 1);

        fs::write(&episode, "a much longer episode").unwrap();
        let report = fx.sorter(config).run().unwrap();
        assert_eq!(report.moved, 1);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "a much longer episode");
    }

    #[test]
    fn test_overwrite() {
        let fx = Fixture::new();
        fx.file("foo s01e02.mp4", "new");
        fs::create_dir_all(&fx.tv).unwrap();
        fs::write(fx.tv.join("Foo S01E02.mp4"), "much older and larger").unwrap();
        let config = Config {
            overwrite: true,
            ..fx.config()
        };
        assert_eq!(fx.sorter(config).run().unwrap().moved, 1);
        assert_eq!(fs::read_to_string(fx.tv.join("Foo S01E02.mp4")).unwrap(), "new");
    }

    #[test]
    fn test_already_sorted() {
        let fx = Fixture::new();
        let episode = fx.file("foo s01e02.mp4", "episode");
        fs::create_dir_all(&fx.tv).unwrap();
        fs::hard_link(&episode, fx.tv.join("Foo S01E02.mp4")).unwrap();
        let report = fx.sorter(fx.config()).run().unwrap();
        assert!(report.errors.is_empty());
        assert_eq!((report.matched, report.moved), (1, 0));
        assert!(episode.exists());
    }

    #[test]
    fn test_subtitles_follow() {
        let fx = Fixture::new();
        fx.file("foo s01e02.mp4", "episode");
        let subs = fx.file("foo s01e02.srt", "subs");
        fx.sorter(fx.config()).run().unwrap();
        assert_eq!(fs::read_to_string(fx.tv.join("Foo S01E02.srt")).unwrap(), "subs");
        assert!(!subs.exists());

        let fx = Fixture::new();
        fx.file("foo s01e02.mp4", "episode");
        let subs = fx.file("foo s01e02.srt", "subs");
        let config = Config {
            skip_subtitles: true,
            ..fx.config()
        };
        fx.sorter(config).run().unwrap();
        assert!(subs.exists());
        assert!(!fx.tv.join("Foo S01E02.srt").exists());
    }

    #[test]
    fn test_copy_and_link_actions() {
        let fx = Fixture::new();
        let episode = fx.file("foo s01e02.mp4", "episode");
        let config = Config {
            action: Action::Link,
            ..fx.config()
        };
        assert_eq!(fx.sorter(config).run().unwrap().moved, 1);
        assert!(same_file(&episode, &fx.tv.join("Foo S01E02.mp4")).unwrap());

        let fx = Fixture::new();
        let episode = fx.file("foo s01e02.mp4", "episode");
        let config = Config {
            action: Action::Copy,
            ..fx.config()
        };
        fx.sorter(config).run().unwrap();
        assert!(episode.exists());
        assert!(!same_file(&episode, &fx.tv.join("Foo S01E02.mp4")).unwrap());
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let fx = Fixture::new();
        fx.file("a strange thing 2019.mkv", "x");
        fx.file("b sample.mkv", "x");
        fx.file("foo s01e02.mp4", "episode");
        let report = fx.sorter(fx.config()).run().unwrap();
        assert_eq!((report.checked, report.matched, report.moved), (3, 1, 1));
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].index, 0);
        assert!(matches!(
            report.errors[0].source,
            ResolveError::Search(SearchError::BelowThreshold { .. })
        ));
        assert!(matches!(report.errors[1].source, ResolveError::Parse(_)));
        assert!(fx.tv.join("Foo S01E02.mp4").exists());
    }

    #[test]
    fn test_scan_filters() {
        let fx = Fixture::new();
        fx.file("a.mp4", "1234567890");
        fx.file("b.MKV", "1234567890");
        fx.file("c.txt", "1234567890");
        fx.file("small.mp4", "12");
        fx.file(".hidden.mp4", "1234567890");
        fx.file(".cache/d.mp4", "1234567890");
        fx.file("nested/e.mp4", "1234567890");

        let config = Config {
            min_file_size: 10,
            ..fx.config()
        };
        let names = |scan: Scan| -> Vec<String> {
            scan.files
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };
        let scan = fx.sorter(config.clone()).scan().unwrap();
        assert_eq!(scan.dirs.len(), 3);
        assert_eq!(names(scan), vec!["d.mp4", ".hidden.mp4", "a.mp4", "b.MKV", "e.mp4"]);

        let hidden = Config {
            skip_hidden: true,
            ..config.clone()
        };
        let scan = fx.sorter(hidden).scan().unwrap();
        assert_eq!(scan.dirs, vec![fx.downloads.clone(), fx.downloads.join("nested")]);
        assert_eq!(names(scan), vec!["a.mp4", "b.MKV", "e.mp4"]);

        let limited = Config {
            file_limit: 2,
            ..config
        };
        assert_eq!(names(fx.sorter(limited).scan().unwrap()), vec!["d.mp4", ".hidden.mp4"]);
    }

    #[test]
    fn test_scan_errors() {
        let fx = Fixture::new();
        let config = Config {
            recursive: false,
            ..fx.config()
        };
        assert!(matches!(
            fx.sorter(config).scan(),
            Err(SortError::Config(ConfigError::NotRecursive(_)))
        ));

        // single files are fine without recursion
        let file = fx.file("foo s01e02.mp4", "episode");
        let config = Config {
            targets: vec![file.clone()],
            recursive: false,
            ..fx.config()
        };
        assert_eq!(fx.sorter(config).scan().unwrap().files, vec![file]);

        let config = Config {
            targets: vec![fx.downloads.join("missing")],
            ..fx.config()
        };
        assert!(matches!(fx.sorter(config).scan(), Err(SortError::Io { .. })));
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let fx = Fixture::new();
        let searcher = Arc::new(Searcher::new(vec![], 95));
        let config = Config {
            watch: true,
            recursive: false,
            ..fx.config()
        };
        assert!(matches!(
            Sorter::new(config, searcher.clone()),
            Err(SortError::Config(ConfigError::WatchWithoutRecursive))
        ));
        let file = fx.file("foo s01e02.mp4", "episode");
        let config = Config {
            targets: vec![file.clone()],
            recursive: true,
            watch: true,
            ..fx.config()
        };
        let sorter = fx.sorter(config);
        let scan = sorter.scan().unwrap();
        assert!(matches!(
            sorter.watch(&scan),
            Err(SortError::Config(ConfigError::NothingToWatch))
        ));
        // refused before anything is sorted
        assert!(matches!(
            sorter.run(),
            Err(SortError::Config(ConfigError::NothingToWatch))
        ));
        assert!(file.exists());
        assert!(!fx.tv.join("Foo S01E02.mp4").exists());
    }

    #[test]
    fn test_threshold_comes_from_config() {
        let fx = Fixture::new();
        let film = fx.file("the heat wave 1995.mkv", "film");
        let providers = || -> Vec<Box<dyn SearchProvider>> {
            vec![Box::new(StubProvider::new("stub", vec![movie("Heat", "1995")]))]
        };

        let report = Sorter::with_providers(fx.config(), providers()).unwrap().run().unwrap();
        assert!(matches!(
            report.errors[0].source,
            ResolveError::Search(SearchError::BelowThreshold { accuracy: 91, .. })
        ));
        assert!(film.exists());

        let config = Config {
            accuracy_threshold: 90,
            ..fx.config()
        };
        let report = Sorter::with_providers(config, providers()).unwrap().run().unwrap();
        assert_eq!(report.moved, 1);
        assert!(fx.movies.join("Heat (1995).mkv").exists());
    }

    struct ReadOnlyFs;

    impl Relocator for ReadOnlyFs {
        fn relocate(&self, _mode: RelocateMode, _src: &Path, _dst: &Path) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn test_relocation_failure_is_per_file() {
        let fx = Fixture::new();
        let episode = fx.file("foo s01e02.mp4", "episode");
        let report = fx.sorter(fx.config()).with_relocator(ReadOnlyFs).run().unwrap();
        assert_eq!((report.matched, report.moved), (0, 0));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].to_string(),
            format!("[0] {}: move failed: read-only", episode.display())
        );
        assert!(episode.exists());
    }

    #[test]
    fn test_failed_overwrite_keeps_destination() {
        for action in [Action::Move, Action::Copy, Action::Link] {
            let fx = Fixture::new();
            let episode = fx.file("foo s01e02.mp4", "episode");
            let dest = fx.tv.join("Foo S01E02.mp4");
            fs::create_dir_all(&fx.tv).unwrap();
            fs::write(&dest, "library copy").unwrap();
            let config = Config {
                overwrite: true,
                action,
                ..fx.config()
            };
            let report = fx.sorter(config).with_relocator(ReadOnlyFs).run().unwrap();
            assert_eq!(report.errors.len(), 1, "{action:?}");
            assert_eq!(fs::read_to_string(&dest).unwrap(), "library copy", "{action:?}");
            assert!(episode.exists());
            assert!(!staging_path(&dest).exists());
        }
    }

    #[test]
    fn test_overwrite_by_copy_and_link() {
        for action in [Action::Copy, Action::Link] {
            let fx = Fixture::new();
            let episode = fx.file("foo s01e02.mp4", "new episode");
            let dest = fx.tv.join("Foo S01E02.mp4");
            fs::create_dir_all(&fx.tv).unwrap();
            fs::write(&dest, "library copy").unwrap();
            let config = Config {
                overwrite: true,
                action,
                ..fx.config()
            };
            assert_eq!(fx.sorter(config).run().unwrap().moved, 1, "{action:?}");
            assert_eq!(fs::read_to_string(&dest).unwrap(), "new episode");
            assert!(episode.exists());
            assert!(!staging_path(&dest).exists());
        }
    }

    /// Reports one change, then dies.
    struct OneChange<F: FnMut()> {
        on_change: F,
        waits: usize,
    }

    impl<F: FnMut()> ChangeSource for OneChange<F> {
        fn wait(&mut self) -> Result<(), WatchError> {
            self.waits += 1;
            if self.waits > 1 {
                return Err(WatchError::Disconnected);
            }
            (self.on_change)();
            Ok(())
        }
    }

    #[test]
    fn test_watch_resorts_on_change() {
        let fx = Fixture::new();
        let sorter = fx.sorter(fx.config());
        sorter.sort(&sorter.scan().unwrap().files).unwrap();

        let mut source = OneChange {
            on_change: || {
                fx.file("foo s01e03.mp4", "new episode");
            },
            waits: 0,
        };
        let err = sorter.watch_with(&mut source).unwrap_err();
        assert!(matches!(err, SortError::Watch(WatchError::Disconnected)));
        assert_eq!(source.waits, 2);
        assert_eq!(fs::read_to_string(fx.tv.join("Foo S01E03.mp4")).unwrap(), "new episode");
    }
}
