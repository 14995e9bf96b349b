use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use mediasort::config::{self, parse_extensions, Action, LinkType};
use mediasort::error::ConfigError;
use mediasort::render::PathConfig;
use mediasort::search::{default_providers, ProviderSettings};
use mediasort::{Config, Sorter};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn cli() -> Command {
    Command::new("mediasort")
        .about("Sort movies and TV episodes into a tidy library using online metadata")
        .arg(
            Arg::new("targets")
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf))
                .help("Files and directories to sort"),
        )
        .arg(
            Arg::new("movie-dir")
                .short('m')
                .long("movie-dir")
                .value_parser(value_parser!(PathBuf))
                .help("Movie library [default: ~/movies]"),
        )
        .arg(
            Arg::new("tv-dir")
                .short('t')
                .long("tv-dir")
                .value_parser(value_parser!(PathBuf))
                .help("TV library [default: ~/tv]"),
        )
        .arg(Arg::new("tv-template").long("tv-template").help("TV series path template"))
        .arg(Arg::new("movie-template").long("movie-template").help("Movie path template"))
        .arg(
            Arg::new("extensions")
                .short('e')
                .long("extensions")
                .default_value(config::DEFAULT_EXTENSIONS)
                .help("Media file extensions"),
        )
        .arg(
            Arg::new("min-file-size")
                .long("min-file-size")
                .value_parser(value_parser!(u64))
                .default_value("25000000")
                .help("Ignore files smaller than this many bytes"),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .action(ArgAction::SetTrue)
                .help("Search directories recursively"),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .value_parser(value_parser!(i32))
                .allow_negative_numbers(true)
                .default_value("0")
                .help("Parent directory names to add to the search query (-1 for all)"),
        )
        .arg(
            Arg::new("dry-run")
                .short('d')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Show what would happen without touching any file"),
        )
        .arg(
            Arg::new("skip-hidden")
                .long("skip-hidden")
                .action(ArgAction::SetTrue)
                .help("Skip dot files and directories"),
        )
        .arg(
            Arg::new("skip-subtitles")
                .long("skip-subtitles")
                .action(ArgAction::SetTrue)
                .help("Leave .srt files behind"),
        )
        .arg(
            Arg::new("action")
                .short('a')
                .long("action")
                .default_value("move")
                .help("move, copy or link"),
        )
        .arg(
            Arg::new("link-type")
                .long("link-type")
                .default_value("hard")
                .help("hard or sym, used by the link action"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace existing destination files"),
        )
        .arg(
            Arg::new("overwrite-if-larger")
                .long("overwrite-if-larger")
                .action(ArgAction::SetTrue)
                .help("Replace existing destination files when the source is larger"),
        )
        .arg(
            Arg::new("watch")
                .short('w')
                .long("watch")
                .action(ArgAction::SetTrue)
                .help("Keep sorting as files appear (requires --recursive)"),
        )
        .arg(
            Arg::new("watch-delay")
                .long("watch-delay")
                .value_parser(value_parser!(u64))
                .default_value("3")
                .help("Seconds to wait for changes to settle"),
        )
        .arg(
            Arg::new("concurrency")
                .short('c')
                .long("concurrency")
                .value_parser(value_parser!(usize))
                .default_value("6")
                .help("Files sorted in parallel"),
        )
        .arg(
            Arg::new("file-limit")
                .long("file-limit")
                .value_parser(value_parser!(usize))
                .default_value("1000")
                .help("Maximum files per scan"),
        )
        .arg(
            Arg::new("accuracy-threshold")
                .long("accuracy-threshold")
                .value_parser(value_parser!(i32))
                .default_value("95")
                .help("Minimum match accuracy (100 is exact)"),
        )
        .arg(
            Arg::new("tmdb-api-key")
                .long("tmdb-api-key")
                .help("TMDB API key [env: TMDB_API_KEY]"),
        )
        .arg(
            Arg::new("omdb-api-key")
                .long("omdb-api-key")
                .help("OMDB API key [env: OMDB_API_KEY]"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
}

fn api_key(app: &ArgMatches, name: &str, env: &str) -> Option<String> {
    app.get_one::<String>(name)
        .cloned()
        .or_else(|| std::env::var(env).ok())
        .filter(|k| !k.is_empty())
}

fn build_config(app: &ArgMatches) -> Result<Config, ConfigError> {
    let defaults = Config::default();
    let string = |name: &str| app.get_one::<String>(name).cloned().unwrap_or_default();
    Ok(Config {
        targets: app.get_many::<PathBuf>("targets").unwrap_or_default().cloned().collect(),
        movie_dir: app.get_one::<PathBuf>("movie-dir").cloned().unwrap_or(defaults.movie_dir),
        tv_dir: app.get_one::<PathBuf>("tv-dir").cloned().unwrap_or(defaults.tv_dir),
        path_config: PathConfig {
            tv_template: string("tv-template"),
            movie_template: string("movie-template"),
        },
        extensions: parse_extensions(&string("extensions")),
        min_file_size: app
            .get_one::<u64>("min-file-size")
            .copied()
            .unwrap_or(defaults.min_file_size),
        recursive: app.get_flag("recursive"),
        depth: app.get_one::<i32>("depth").copied().unwrap_or_default(),
        dry_run: app.get_flag("dry-run"),
        skip_hidden: app.get_flag("skip-hidden"),
        skip_subtitles: app.get_flag("skip-subtitles"),
        action: string("action").parse::<Action>()?,
        link_type: string("link-type").parse::<LinkType>()?,
        overwrite: app.get_flag("overwrite"),
        overwrite_if_larger: app.get_flag("overwrite-if-larger"),
        watch: app.get_flag("watch"),
        watch_delay: app
            .get_one::<u64>("watch-delay")
            .map_or(defaults.watch_delay, |s| Duration::from_secs(*s)),
        concurrency: app.get_one::<usize>("concurrency").copied().unwrap_or(defaults.concurrency),
        file_limit: app.get_one::<usize>("file-limit").copied().unwrap_or(defaults.file_limit),
        accuracy_threshold: app
            .get_one::<i32>("accuracy-threshold")
            .copied()
            .unwrap_or(defaults.accuracy_threshold),
        verbose: app.get_flag("verbose"),
        tmdb_api_key: api_key(app, "tmdb-api-key", "TMDB_API_KEY"),
        omdb_api_key: api_key(app, "omdb-api-key", "OMDB_API_KEY"),
    })
}

/// Progress lines (target "cli") print bare, everything else with its level.
fn init_logging(verbose: bool) -> Result<(), String> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let cli = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();
    let diagnostics = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("cli", Box::new(cli)))
        .appender(Appender::builder().build("diagnostics", Box::new(diagnostics)))
        .logger(Logger::builder().appender("cli").additive(false).build("cli", level))
        .build(Root::builder().appender("diagnostics").build(level))
        .map_err(|e| e.to_string())?;
    log4rs::init_config(config).map_err(|e| e.to_string())?;
    Ok(())
}

fn main() -> ExitCode {
    let app = cli().get_matches();
    if let Err(e) = init_logging(app.get_flag("verbose")) {
        eprintln!("logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match build_config(&app) {
        Ok(config) => config,
        Err(e) => {
            log::error!(target: "cli", "{e}");
            return ExitCode::FAILURE;
        }
    };
    let settings = ProviderSettings {
        tmdb_api_key: config.tmdb_api_key.clone(),
        omdb_api_key: config.omdb_api_key.clone(),
        timeout: HTTP_TIMEOUT,
    };
    let providers = match default_providers(&settings) {
        Ok(providers) => providers,
        Err(e) => {
            log::error!(target: "cli", "{e}");
            return ExitCode::FAILURE;
        }
    };
    let report = match Sorter::with_providers(config, providers).and_then(|sorter| sorter.run()) {
        Ok(report) => report,
        Err(e) => {
            log::error!(target: "cli", "{e}");
            return ExitCode::FAILURE;
        }
    };
    if report.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
