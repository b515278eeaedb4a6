use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lyricfile::{ConsolePrompt, SaveFormat, SaveOptions, Song};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lyricfile")]
#[command(version, about = "Save song lyrics from a lyrics API record", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the song title, artist and a lyrics excerpt
    Show {
        /// Song record as returned by the API (with or without the `song` envelope)
        song: PathBuf,
        /// Plain text file holding the lyrics
        #[arg(long)]
        lyrics: Option<PathBuf>,
    },
    /// Write the lyrics to a .txt or .json file
    Save {
        song: PathBuf,
        #[arg(long)]
        lyrics: Option<PathBuf>,
        /// Output file (extension is replaced by the format's)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, env = "LYRICFILE_FORMAT", default_value = "txt")]
        format: SaveFormat,
        /// Replace an existing file without asking
        #[arg(long)]
        overwrite: bool,
        #[arg(short, long)]
        quiet: bool,
        /// Encode the payload as raw UTF-8 bytes
        #[arg(long)]
        binary: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize file-based logging so stdout stays free for status lines
    let log_dir = lyricfile::paths::get_log_dir()?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "lyricfile.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lyricfile=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    match cli.command {
        Commands::Show { song, lyrics } => {
            let song = load_song(&song, lyrics.as_deref())?;
            println!("{}", song);
        }
        Commands::Save {
            song,
            lyrics,
            output,
            format,
            overwrite,
            quiet,
            binary,
        } => {
            let song = load_song(&song, lyrics.as_deref())?;
            let options = SaveOptions {
                filename: output,
                format,
                overwrite,
                verbose: !quiet,
                binary,
            };
            let outcome = song.save(&options, &mut ConsolePrompt::stdio())?;
            tracing::debug!(
                "Save finished: {} (written: {})",
                outcome.path.display(),
                outcome.written
            );
        }
    }

    Ok(())
}

fn load_song(song_path: &Path, lyrics_path: Option<&Path>) -> Result<Song> {
    // Lyrics come from a separate file; without one the song has none
    let lyrics = match lyrics_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lyrics file: {}", path.display()))?,
        None => String::new(),
    };

    let file = File::open(song_path)
        .with_context(|| format!("Failed to open song file: {}", song_path.display()))?;
    let song = Song::from_reader(BufReader::new(file), lyrics)
        .with_context(|| format!("Failed to load song from {}", song_path.display()))?;

    tracing::info!("Loaded {} from {}", song.short_repr(), song_path.display());
    Ok(song)
}
