use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;

pub struct QuitCommand;

#[async_trait]
impl Command for QuitCommand {
    fn name(&self) -> &str {
        "/quit"
    }

    fn aliases(&self) -> &[&str] {
        &["quit", "exit", "/exit"]
    }

    fn description(&self) -> &str {
        "exit the session"
    }

    async fn execute(&self, _session: &mut Session) -> Result<CommandResult> {
        Ok(CommandResult::Quit)
    }
}
