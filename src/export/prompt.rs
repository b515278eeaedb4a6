use crate::error::{Error, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Decides whether an existing file may be replaced.
pub trait OverwritePrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> Result<bool>;
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&Path) -> bool,
{
    fn confirm_overwrite(&mut self, path: &Path) -> Result<bool> {
        Ok(self(path))
    }
}

/// Asks on a console-like pair of streams; only `y` (any case) confirms.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> OverwritePrompt for ConsolePrompt<R, W> {
    fn confirm_overwrite(&mut self, path: &Path) -> Result<bool> {
        write!(
            self.output,
            "{} already exists. Overwrite?\n(y/n): ",
            path.display()
        )
        .map_err(Error::Prompt)?;
        self.output.flush().map_err(Error::Prompt)?;

        let mut answer = String::new();
        self.input.read_line(&mut answer).map_err(Error::Prompt)?;

        let confirmed = answer.trim().eq_ignore_ascii_case("y");
        tracing::debug!(
            "Overwrite of {} {}",
            path.display(),
            if confirmed { "confirmed" } else { "declined" }
        );
        Ok(confirmed)
    }
}
