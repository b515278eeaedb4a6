pub mod types;

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use types::{ArtistCredit, MediaLink};

const ENVELOPE_KEY: &str = "song";
const LYRICS_KEY: &str = "lyrics";
const DISPLAY_LYRICS_CHARS: usize = 100;
const DISPLAY_INDENT: &str = "    ";

/// A song record returned by the lyrics metadata API.
///
/// The record keeps the API body as-is and reads fields out of it on demand,
/// so fields this type has no accessor for survive a JSON save untouched.
#[derive(Debug, Clone)]
pub struct Song {
    body: Map<String, Value>,
    url: String,
    api_path: String,
    id: u64,
}

impl Song {
    /// Build a song from an API object, with or without the `{"song": ...}`
    /// envelope, and attach the lyrics text to it.
    pub fn new(json: Value, lyrics: impl Into<String>) -> Result<Self> {
        let Value::Object(mut object) = json else {
            return Err(Error::NotAnObject);
        };

        let mut body = match object.remove(ENVELOPE_KEY) {
            Some(Value::Object(inner)) => inner,
            Some(_) => return Err(Error::MalformedEnvelope),
            None => {
                tracing::debug!("No song envelope, using raw object as body");
                object
            }
        };

        body.insert(LYRICS_KEY.to_string(), Value::String(lyrics.into()));

        // Identity fields must be present and well-typed
        let url = required(&body, "url", Value::as_str)?.to_string();
        let api_path = required(&body, "api_path", Value::as_str)?.to_string();
        let id = required(&body, "id", Value::as_u64)?;

        if !body.contains_key("title") {
            tracing::warn!("Song {} has no title", id);
        }

        tracing::debug!("Loaded song {} ({})", id, api_path);

        Ok(Self {
            body,
            url,
            api_path,
            id,
        })
    }

    /// Parse a JSON document from a reader and build a song from it
    pub fn from_reader<R: Read>(reader: R, lyrics: impl Into<String>) -> Result<Self> {
        let json: Value = serde_json::from_reader(reader)?;
        Self::new(json, lyrics)
    }

    pub fn title(&self) -> &str {
        self.str_at(&["title"]).unwrap_or_default()
    }

    /// Name of the primary artist
    pub fn artist(&self) -> &str {
        self.str_at(&["primary_artist", "name"]).unwrap_or_default()
    }

    pub fn lyrics(&self) -> &str {
        self.str_at(&[LYRICS_KEY]).unwrap_or_default()
    }

    pub fn album(&self) -> Option<&str> {
        self.str_at(&["album", "name"])
    }

    pub fn album_url(&self) -> Option<&str> {
        self.str_at(&["album", "url"])
    }

    /// Release date as reported by the API (e.g. `2017-04-14`)
    pub fn year(&self) -> Option<&str> {
        self.str_at(&["release_date"])
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn api_path(&self) -> &str {
        &self.api_path
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Featured artists, or `None` when the API sent no such list
    pub fn featured_artists(&self) -> Option<Vec<ArtistCredit>> {
        self.body
            .get("featured_artists")
            .filter(|v| !v.is_null())
            .map(ArtistCredit::list_from)
    }

    /// Provider name to URL (youtube, spotify, soundcloud, ...)
    pub fn media(&self) -> BTreeMap<String, String> {
        let Some(Value::Array(entries)) = self.body.get("media") else {
            return BTreeMap::new();
        };

        entries
            .iter()
            .filter_map(|entry| serde_json::from_value::<MediaLink>(entry.clone()).ok())
            .map(|link| (link.provider, link.url))
            .collect()
    }

    /// Artists credited as writers
    pub fn writer_artists(&self) -> Vec<ArtistCredit> {
        self.body
            .get("writer_artists")
            .map(ArtistCredit::list_from)
            .unwrap_or_default()
    }

    pub fn song_art_image_url(&self) -> Option<&str> {
        self.str_at(&["song_art_image_url"])
    }

    /// The raw API body, lyrics included
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Short form used in listings: `("title", "artist")`
    pub fn short_repr(&self) -> String {
        format!("({:?}, {:?})", self.title(), self.artist())
    }

    fn str_at(&self, path: &[&str]) -> Option<&str> {
        let (first, rest) = path.split_first()?;
        let mut value = self.body.get(*first)?;
        for key in rest {
            value = value.get(key)?;
        }
        value.as_str()
    }
}

fn required<'a, T>(
    body: &'a Map<String, Value>,
    field: &'static str,
    read: impl FnOnce(&'a Value) -> Option<T>,
) -> Result<T> {
    let value = body.get(field).ok_or(Error::MissingField(field))?;
    read(value).ok_or(Error::InvalidField(field))
}

impl FromStr for Song {
    type Err = Error;

    /// Parse a song without lyrics
    fn from_str(s: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(s)?;
        Self::new(json, String::new())
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.title() == other.title()
            && self.artist() == other.artist()
            && self.lyrics() == other.lyrics()
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lyrics = self.lyrics();
        let mut excerpt: String = lyrics.chars().take(DISPLAY_LYRICS_CHARS).collect();
        if lyrics.chars().count() > DISPLAY_LYRICS_CHARS {
            excerpt.push_str("...");
        }
        let indented = excerpt.replace('\n', &format!("\n{DISPLAY_INDENT}"));

        write!(
            f,
            "\"{}\" by {}:\n{}{}",
            self.title(),
            self.artist(),
            DISPLAY_INDENT,
            indented
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_body() -> Value {
        json!({
            "id": 3039923,
            "api_path": "/songs/3039923",
            "url": "https://genius.com/Kendrick-lamar-humble-lyrics",
            "title": "HUMBLE.",
            "primary_artist": {
                "name": "Kendrick Lamar",
                "id": 1421,
                "url": "https://genius.com/artists/Kendrick-lamar"
            },
            "album": {
                "name": "DAMN.",
                "url": "https://genius.com/albums/Kendrick-lamar/Damn"
            },
            "release_date": "2017-03-30",
            "song_art_image_url": "https://images.genius.com/humble.jpg",
            "featured_artists": [],
            "media": [
                {"provider": "youtube", "type": "video", "url": "https://www.youtube.com/watch?v=tvTRZJ-4EyI"},
                {"provider": "spotify", "type": "audio", "url": "https://open.spotify.com/track/7KXjTSCq5nL1LoYtL7XAwS"}
            ],
            "writer_artists": [
                {"name": "Kendrick Lamar", "id": 1421, "url": "https://genius.com/artists/Kendrick-lamar"},
                {"name": "Mike WiLL Made-It", "id": 3770, "url": "https://genius.com/artists/Mike-will-made-it"}
            ]
        })
    }

    #[test]
    fn test_new_unwraps_envelope() {
        let song = Song::new(json!({ "song": sample_body() }), "Nobody pray for me").unwrap();
        assert_eq!(song.id(), 3039923);
        assert_eq!(song.api_path(), "/songs/3039923");
        assert_eq!(song.title(), "HUMBLE.");
        assert_eq!(song.artist(), "Kendrick Lamar");
        assert_eq!(song.lyrics(), "Nobody pray for me");
        assert_eq!(song.body()["lyrics"], "Nobody pray for me");
    }

    #[test]
    fn test_new_without_envelope() {
        let song = Song::new(sample_body(), "").unwrap();
        assert_eq!(song.url(), "https://genius.com/Kendrick-lamar-humble-lyrics");
        assert_eq!(song.album(), Some("DAMN."));
        assert_eq!(song.year(), Some("2017-03-30"));
    }

    #[test]
    fn test_new_rejects_malformed_input() {
        assert!(matches!(Song::new(json!([1, 2]), ""), Err(Error::NotAnObject)));
        assert!(matches!(
            Song::new(json!({"song": "nope"}), ""),
            Err(Error::MalformedEnvelope)
        ));

        let mut body = sample_body();
        body.as_object_mut().unwrap().remove("api_path");
        assert!(matches!(
            Song::new(body, ""),
            Err(Error::MissingField("api_path"))
        ));
    }

    #[test]
    fn test_new_rejects_wrong_field_types() {
        let mut body = sample_body();
        body["id"] = json!("abc");
        assert!(matches!(
            Song::new(body, ""),
            Err(Error::InvalidField("id"))
        ));

        let mut body = sample_body();
        body["url"] = json!(42);
        assert!(matches!(
            Song::new(body, ""),
            Err(Error::InvalidField("url"))
        ));
    }

    #[test]
    fn test_missing_album() {
        let mut body = sample_body();
        body.as_object_mut().unwrap().remove("album");
        let song = Song::new(body, "").unwrap();
        assert_eq!(song.album(), None);
        assert_eq!(song.album_url(), None);
    }

    #[test]
    fn test_optional_fields_absent() {
        let song = Song::new(
            json!({"id": 1, "api_path": "/songs/1", "url": "https://genius.com/x"}),
            "",
        )
        .unwrap();
        assert_eq!(song.title(), "");
        assert_eq!(song.artist(), "");
        assert_eq!(song.year(), None);
        assert_eq!(song.song_art_image_url(), None);
        assert_eq!(song.featured_artists(), None);
        assert!(song.media().is_empty());
        assert!(song.writer_artists().is_empty());
    }

    #[test]
    fn test_media_and_writers() {
        let song = Song::new(sample_body(), "").unwrap();

        let media = song.media();
        assert_eq!(media.len(), 2);
        assert_eq!(
            media.get("youtube").map(String::as_str),
            Some("https://www.youtube.com/watch?v=tvTRZJ-4EyI")
        );

        let writers = song.writer_artists();
        assert_eq!(writers.len(), 2);
        assert_eq!(writers[1].name, "Mike WiLL Made-It");
        assert_eq!(writers[1].id, 3770);

        assert_eq!(song.featured_artists(), Some(Vec::new()));
    }

    #[test]
    fn test_from_str_and_reader() {
        let text = sample_body().to_string();
        let song: Song = text.parse().unwrap();
        assert_eq!(song.lyrics(), "");

        let song = Song::from_reader(text.as_bytes(), "la la").unwrap();
        assert_eq!(song.lyrics(), "la la");

        assert!(matches!("{not json".parse::<Song>(), Err(Error::Json(_))));
    }

    #[test]
    fn test_display_short_lyrics() {
        let song = Song::new(sample_body(), "Line one\nLine two").unwrap();
        assert_eq!(
            song.to_string(),
            "\"HUMBLE.\" by Kendrick Lamar:\n    Line one\n    Line two"
        );
    }

    #[test]
    fn test_display_truncates_long_lyrics() {
        let lyrics = "a".repeat(150);
        let song = Song::new(sample_body(), lyrics).unwrap();
        let expected = format!("\"HUMBLE.\" by Kendrick Lamar:\n    {}...", "a".repeat(100));
        assert_eq!(song.to_string(), expected);

        let exact = Song::new(sample_body(), "b".repeat(100)).unwrap();
        assert!(!exact.to_string().ends_with("..."));
    }

    #[test]
    fn test_short_repr_and_equality() {
        let a = Song::new(sample_body(), "words").unwrap();
        let b = Song::new(json!({ "song": sample_body() }), "words").unwrap();
        let c = Song::new(sample_body(), "other words").unwrap();

        assert_eq!(a.short_repr(), "(\"HUMBLE.\", \"Kendrick Lamar\")");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
