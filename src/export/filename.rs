use super::SaveFormat;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Everything that is not a letter or a digit
static NON_ALNUM_REGEX: OnceLock<Regex> = OnceLock::new();

const DEFAULT_PREFIX: &str = "Lyrics_";
const UNKNOWN_ARTIST: &str = "Unknown";

fn get_non_alnum_regex() -> &'static Regex {
    NON_ALNUM_REGEX.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap())
}

/// Strip whitespace and punctuation from an artist name
pub fn compact_artist(artist: &str) -> String {
    get_non_alnum_regex().replace_all(artist, "").into_owned()
}

/// `Lyrics_<Artist>.<ext>` in the current directory
pub fn default_filename(artist: &str, format: SaveFormat) -> PathBuf {
    let mut name = compact_artist(artist);
    if name.is_empty() {
        name = UNKNOWN_ARTIST.to_string();
    }
    PathBuf::from(format!("{DEFAULT_PREFIX}{name}.{}", format.extension()))
}

/// Resolve the target path: either the caller's filename with its extension
/// forced to the format's, or the default derived from the artist name
pub fn resolve(filename: Option<&Path>, artist: &str, format: SaveFormat) -> PathBuf {
    let path = match filename {
        Some(name) => name.with_extension(format.extension()),
        None => default_filename(artist, format),
    };
    tracing::debug!("Resolved lyrics file: {}", path.display());
    path
}
