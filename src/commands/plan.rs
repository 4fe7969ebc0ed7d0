use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::banner::{print_result, submit_error_banner};
use crate::form::collect_trip;
use crate::itinerary::ValidationError;
use crate::session::Session;
use crate::spinner::Spinner;

/// The submit trigger: read the trip form, then ask for an itinerary.
pub struct PlanCommand;

#[async_trait]
impl Command for PlanCommand {
    fn name(&self) -> &str {
        "/plan"
    }

    fn aliases(&self) -> &[&str] {
        &["/go"]
    }

    fn description(&self) -> &str {
        "enter trip details and generate an itinerary"
    }

    async fn execute(&self, session: &mut Session) -> Result<CommandResult> {
        let today = chrono::Local::now().date_naive();
        let form = match collect_trip(session.prompter.as_ref(), today) {
            Ok(form) => form,
            Err(e) => match e.downcast_ref::<ValidationError>() {
                Some(invalid) => {
                    tracing::warn!("invalid trip form: {invalid}");
                    eprintln!("  ✗ {invalid}");
                    return Ok(CommandResult::Handled);
                }
                None => return Err(e),
            },
        };

        let spinner = Spinner::start("planning your trip");
        let outcome = session.submit(&form).await;
        spinner.stop();

        match outcome {
            Ok(result) => print_result(&result),
            Err(e) => {
                tracing::error!("submission rejected: {e}");
                eprintln!("  {}", submit_error_banner(&e));
            }
        }
        Ok(CommandResult::Handled)
    }
}
