use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::auth::Attempt;
use crate::banner::{auth_error_banner, missing_key_banner};
use crate::session::Session;

pub struct GuestCommand;

#[async_trait]
impl Command for GuestCommand {
    fn name(&self) -> &str {
        "/guest"
    }

    fn aliases(&self) -> &[&str] {
        &["/others"]
    }

    fn description(&self) -> &str {
        "use your own Gemini API key"
    }

    async fn execute(&self, session: &mut Session) -> Result<CommandResult> {
        let api_key = session.prompter.read_secret("Gemini API key: ")?;
        match session.sign_in(Attempt::Guest { api_key }) {
            Ok(credential) if credential.api_key.is_some() => println!("  ✓ key set"),
            Ok(_) => eprintln!("  {}", missing_key_banner()),
            Err(e) => eprintln!("  {}", auth_error_banner(&e)),
        }
        Ok(CommandResult::Handled)
    }
}
