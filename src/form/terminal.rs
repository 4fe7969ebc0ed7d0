use std::io::{self, Write};

use anyhow::{Context, Result};

use super::Prompter;

/// Reads from stdin; secrets are read without echo.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;
        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }

    fn read_secret(&self, label: &str) -> Result<String> {
        let secret = rpassword::prompt_password(label).context("failed to read secret")?;
        Ok(secret.trim().to_string())
    }
}
