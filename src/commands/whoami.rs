use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;

pub struct WhoamiCommand;

#[async_trait]
impl Command for WhoamiCommand {
    fn name(&self) -> &str {
        "/whoami"
    }

    fn description(&self) -> &str {
        "show role, model, and auth status"
    }

    async fn execute(&self, session: &mut Session) -> Result<CommandResult> {
        let role = session
            .context
            .role()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "—".to_string());
        println!("  role   {role}");
        println!("  model  {}", session.model);
        println!("  auth   {}", session.context.auth_status());
        println!(
            "  memo   {}",
            if session.requester.caching() { "on" } else { "off" }
        );
        Ok(CommandResult::Handled)
    }
}
