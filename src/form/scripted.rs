use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use super::Prompter;

/// A prompter for tests. Answers every prompt, masked or not, from a
/// queue of pre-defined lines.
pub struct ScriptedPrompter {
    lines: Mutex<VecDeque<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Mutex::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    fn next(&self) -> Result<Option<String>> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| anyhow!("ScriptedPrompter lock poisoned"))?;
        Ok(lines.pop_front())
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&self, _label: &str) -> Result<Option<String>> {
        self.next()
    }

    fn read_secret(&self, _label: &str) -> Result<String> {
        self.next()?
            .ok_or_else(|| anyhow!("ScriptedPrompter: no more lines for secret"))
    }
}
