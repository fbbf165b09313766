//! Infrastructure implementation of the `Prompter` port.
//!
//! Uses `dialoguer` on a terminal and plain line reads otherwise, so the
//! shell can be driven from a pipe.

use std::io::{BufRead, BufReader, Write};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use console::Term;

use crate::application::ports::Prompter;

pub struct DialoguerPrompter {
    /// Answer confirmations with "yes". Value prompts still ask.
    assume_yes: bool,
    is_tty: bool,
    input: Mutex<Box<dyn BufRead + Send>>,
}

impl DialoguerPrompter {
    #[must_use]
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            is_tty: Term::stdout().is_term() && Term::stderr().is_term(),
            input: Mutex::new(Box::new(BufReader::new(std::io::stdin()))),
        }
    }

    /// Prompter reading plain lines from `input`, as on a pipe.
    #[must_use]
    pub fn from_reader(assume_yes: bool, input: impl BufRead + Send + 'static) -> Self {
        Self {
            assume_yes,
            is_tty: false,
            input: Mutex::new(Box::new(input)),
        }
    }

    /// Read one shell command line. `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    pub fn read_command(&self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt} ");
        std::io::stdout().flush()?;
        self.read_line()
    }

    fn read_line(&self) -> Result<Option<String>> {
        let mut input = self
            .input
            .lock()
            .map_err(|_| anyhow!("input reader poisoned"))?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl Prompter for DialoguerPrompter {
    fn read_value(&self, prompt: &str, default: &str) -> Result<String> {
        if self.is_tty {
            let value: String = dialoguer::Input::new()
                .with_prompt(prompt)
                .default(default.to_string())
                .interact_text()
                .context("reading input")?;
            return Ok(value);
        }
        print!("{prompt} [{default}]> ");
        std::io::stdout().flush()?;
        let line = self.read_line()?.context("no input provided")?;
        let value = line.trim();
        Ok(if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        })
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if self.is_tty {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(default)
                .interact()?;
            return Ok(confirmed);
        }
        print!("{prompt} [y/N]: ");
        std::io::stdout().flush()?;
        let line = self.read_line()?.context("no input provided")?;
        Ok(line.trim().eq_ignore_ascii_case("y"))
    }
}
