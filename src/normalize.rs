use regex::Regex;

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]").unwrap();
    // release group noise starts at the first encoding marker
    static ref JUNK: Regex = Regex::new(r"\b(720p|1080p|hdtv|x264|dts|bluray)\b.*").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// Turns a file name or title into a search term: lowercase ascii words
/// separated by single spaces, with encoding junk cut off.
pub fn normalize(s: &str) -> String {
    let s = s.to_lowercase();
    let s = NON_ALNUM.replace_all(&s, " ");
    let s = JUNK.replace_all(&s, "");
    let s = SPACES.replace_all(&s, " ");
    s.trim().to_string()
}

/// `100 - levenshtein(normalize(a), normalize(b))`. Not clamped, very
/// different strings score below zero.
pub fn accuracy(a: &str, b: &str) -> i32 {
    let distance = strsim::levenshtein(&normalize(a), &normalize(b));
    100 - i32::try_from(distance).unwrap_or(i32::MAX - 100)
}
