use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;

/// Listing is done by the registry, which knows every command.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "show this help"
    }

    async fn execute(&self, _session: &mut Session) -> Result<CommandResult> {
        Ok(CommandResult::Handled)
    }
}
