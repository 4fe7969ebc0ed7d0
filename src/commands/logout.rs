use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;

pub struct LogoutCommand;

#[async_trait]
impl Command for LogoutCommand {
    fn name(&self) -> &str {
        "/logout"
    }

    fn description(&self) -> &str {
        "forget the current role and API key"
    }

    async fn execute(&self, session: &mut Session) -> Result<CommandResult> {
        session.context.sign_out();
        tracing::info!("signed out");
        println!("  ✓ signed out");
        Ok(CommandResult::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credential, Role};
    use crate::commands::tests::harness;

    #[tokio::test]
    async fn clears_credential() {
        let mut h = harness(&[], vec![]);
        h.session.context.authenticate(Credential {
            role: Role::Guest,
            api_key: Some("abc".to_string()),
        });

        let result = LogoutCommand.execute(&mut h.session).await.unwrap();

        assert_eq!(result, CommandResult::Handled);
        assert!(h.session.context.api_key().is_none());
        assert!(h.session.context.role().is_none());
    }
}
