pub mod filename;
pub mod prompt;

use crate::error::{Error, Result};
use crate::song::Song;
use prompt::OverwritePrompt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output format of a lyrics file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Txt,
    Json,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Txt => "txt",
            SaveFormat::Json => "json",
        }
    }
}

impl FromStr for SaveFormat {
    type Err = Error;

    /// Accepts `txt`/`json` with or without a leading dot, in any case
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.strip_prefix('.').unwrap_or(s).to_ascii_lowercase();
        match normalized.as_str() {
            "txt" => Ok(SaveFormat::Txt),
            "json" => Ok(SaveFormat::Json),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Target file; its extension is replaced by the format's.
    /// Defaults to `Lyrics_<Artist>.<ext>`.
    pub filename: Option<PathBuf>,
    pub format: SaveFormat,
    /// Replace an existing file without asking
    pub overwrite: bool,
    /// Print a status line after saving or skipping
    pub verbose: bool,
    /// Return the payload as UTF-8 bytes
    pub binary: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            filename: None,
            format: SaveFormat::Txt,
            overwrite: false,
            verbose: true,
            binary: false,
        }
    }
}

/// One song entry of a JSON lyrics file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricsEntry {
    pub title: String,
    pub album: Option<String>,
    pub year: Option<String>,
    pub lyrics: String,
    pub image: Option<String>,
    pub artist: String,
    /// The raw API body
    pub json: Map<String, Value>,
}

/// Top-level object of a JSON lyrics file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricsDocument {
    pub songs: Vec<LyricsEntry>,
    pub artist: String,
}

impl LyricsDocument {
    pub fn from_song(song: &Song) -> Self {
        let entry = LyricsEntry {
            title: song.title().to_string(),
            album: song.album().map(str::to_string),
            year: song.year().map(str::to_string),
            lyrics: song.lyrics().to_string(),
            image: song.song_art_image_url().map(str::to_string),
            artist: song.artist().to_string(),
            json: song.body().clone(),
        };

        Self {
            songs: vec![entry],
            artist: song.artist().to_string(),
        }
    }
}

/// What a save produced, whether or not it reached the disk
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(LyricsDocument),
    Binary(Vec<u8>),
}

impl Payload {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(match self {
            Payload::Text(text) => text.as_bytes().to_vec(),
            Payload::Json(document) => serde_json::to_vec(document)?,
            Payload::Binary(bytes) => bytes.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub written: bool,
    pub payload: Payload,
}

impl Song {
    /// Save the lyrics as a `.txt` file or a `.json` lyrics document.
    ///
    /// When the target exists and `options.overwrite` is false, `prompt`
    /// decides; a refusal leaves the file untouched but the payload is still
    /// computed and returned.
    pub fn save(
        &self,
        options: &SaveOptions,
        prompt: &mut impl OverwritePrompt,
    ) -> Result<SaveOutcome> {
        let format = options.format;
        let path = filename::resolve(options.filename.as_deref(), self.artist(), format);

        // Ask before replacing an existing file unless forced
        let write_file = if !path.is_file() || options.overwrite {
            true
        } else {
            prompt.confirm_overwrite(&path)?
        };

        // The payload is computed even when the write is skipped
        let mut payload = match format {
            SaveFormat::Txt => Payload::Text(self.lyrics().to_string()),
            SaveFormat::Json => Payload::Json(LyricsDocument::from_song(self)),
        };
        if options.binary {
            payload = Payload::Binary(payload.to_bytes()?);
        }

        if write_file {
            let bytes = payload.to_bytes()?;
            write_atomic(&path, &bytes)?;
            tracing::info!("Wrote {} to {}", self.title(), path.display());
            if options.verbose {
                println!("Wrote {} to {}.", self.title(), path.display());
            }
        } else {
            tracing::info!("Skipped saving {}", path.display());
            if options.verbose {
                println!("Skipping file save.\n");
            }
        }

        Ok(SaveOutcome {
            path,
            written: write_file,
            payload,
        })
    }
}

/// Write to a temp file beside the real target, then rename over it.
///
/// Symlinks are followed, so the linked file is replaced and the link kept.
/// The existing file's permissions carry over; a read-only target is refused.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| Error::Io { path, source }
    };

    // Resolve symlinks to the file they point at
    let target = if path.exists() {
        fs::canonicalize(path).map_err(io_error(path))?
    } else {
        path.to_path_buf()
    };
    let existing = fs::metadata(&target).ok();

    if existing.as_ref().is_some_and(|meta| meta.permissions().readonly()) {
        return Err(Error::Io {
            path: target,
            source: io::Error::new(io::ErrorKind::PermissionDenied, "target file is read-only"),
        });
    }

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".lyricfile-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // New files get the usual 0o666 minus umask
        let permissions = match &existing {
            Some(meta) => meta.permissions(),
            None => fs::Permissions::from_mode(0o666),
        };
        builder.permissions(permissions);
    }

    // Write to temporary file first; it is removed if anything below fails
    let mut temp_file = builder.tempfile_in(dir).map_err(io_error(dir))?;
    temp_file
        .write_all(bytes)
        .and_then(|()| temp_file.as_file().sync_all())
        .map_err(io_error(temp_file.path()))?;

    // Atomic rename to final destination
    temp_file
        .persist(&target)
        .map_err(|e| Error::Io {
            path: target.clone(),
            source: e.error,
        })?;

    tracing::debug!("Replaced {} atomically", target.display());
    Ok(())
}
