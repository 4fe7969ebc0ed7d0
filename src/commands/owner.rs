use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::auth::Attempt;
use crate::banner::auth_error_banner;
use crate::session::Session;

pub struct OwnerCommand;

#[async_trait]
impl Command for OwnerCommand {
    fn name(&self) -> &str {
        "/owner"
    }

    fn aliases(&self) -> &[&str] {
        &["/me"]
    }

    fn description(&self) -> &str {
        "sign in as the owner with the stored password"
    }

    async fn execute(&self, session: &mut Session) -> Result<CommandResult> {
        let password = session.prompter.read_secret("Password: ")?;
        match session.sign_in(Attempt::Owner { password }) {
            Ok(_) => println!("  ✓ Logged in successfully!"),
            Err(e) => eprintln!("  {}", auth_error_banner(&e)),
        }
        Ok(CommandResult::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credential, Role};
    use crate::commands::tests::harness;

    #[tokio::test]
    async fn correct_password_loads_stored_key() {
        let mut h = harness(&["hunter2"], vec![]);
        OwnerCommand.execute(&mut h.session).await.unwrap();
        assert_eq!(h.session.context.role(), Some(Role::Owner));
        assert_eq!(h.session.context.api_key(), Some("stored-key"));
    }

    #[tokio::test]
    async fn wrong_password_leaves_no_key() {
        let mut h = harness(&["nope"], vec![]);
        let result = OwnerCommand.execute(&mut h.session).await.unwrap();
        assert_eq!(result, CommandResult::Handled);
        assert_eq!(h.session.context.role(), Some(Role::Owner));
        assert!(h.session.context.credential().is_none());
    }

    #[tokio::test]
    async fn failed_login_discards_previous_guest_key() {
        let mut h = harness(&["nope"], vec![]);
        h.session.context.authenticate(Credential {
            role: Role::Guest,
            api_key: Some("guest-key".to_string()),
        });
        OwnerCommand.execute(&mut h.session).await.unwrap();
        assert!(h.session.context.api_key().is_none());
    }

    #[tokio::test]
    async fn input_failure_propagates() {
        let mut h = harness(&[], vec![]);
        assert!(OwnerCommand.execute(&mut h.session).await.is_err());
    }
}
