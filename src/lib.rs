//! Song records from a lyrics metadata API, with their lyrics saved to
//! `.txt` files or `.json` lyrics documents.

pub mod error;
pub mod export;
pub mod paths;
pub mod song;

pub use error::{Error, Result};
pub use export::prompt::{ConsolePrompt, OverwritePrompt};
pub use export::{LyricsDocument, LyricsEntry, Payload, SaveFormat, SaveOptions, SaveOutcome};
pub use song::types::ArtistCredit;
pub use song::Song;
