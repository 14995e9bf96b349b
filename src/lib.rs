//! Identify movies and TV episodes from messy file names and sort them into
//! a clean `<title> (<year>)` / `<title> SxxEyy` layout.

#[macro_use]
extern crate lazy_static;

pub mod cache;
pub mod config;
pub mod error;
pub mod media;
pub mod normalize;
pub mod parse;
pub mod relocate;
pub mod render;
pub mod search;
pub mod sorter;
pub mod watch;

pub use config::Config;
pub use error::{FileError, ResolveError, SearchError, SortError};
pub use media::{Candidate, MatchedResult, MediaType};
pub use search::{SearchProvider, Searcher};
pub use sorter::{SortReport, Sorter};
