//! The interactive loop and its per-turn catch-all.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::banner::{print_goodbye, top_level_banner};
use crate::commands::{CommandRegistry, CommandResult};
use crate::session::Session;

/// Run one line through the registry. Nothing raised here, error or
/// panic, escapes: it is logged, shown, and the session carries on.
pub async fn run_turn(registry: &CommandRegistry, session: &mut Session, line: &str) -> CommandResult {
    let turn = AssertUnwindSafe(registry.dispatch(line, session))
        .catch_unwind()
        .await;

    let detail = match turn {
        Ok(Ok(result)) => return result,
        Ok(Err(e)) => {
            tracing::error!(error = ?e, "Unexpected error in main: {e:#}");
            format!("{e:#}")
        }
        Err(panic) => {
            let detail = panic_message(panic.as_ref());
            tracing::error!("Unexpected panic in main: {detail}");
            detail
        }
    };
    eprintln!("{}", top_level_banner(&detail));
    CommandResult::Handled
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Read lines until `/quit` or end of input.
pub async fn run(registry: &CommandRegistry, session: &mut Session) {
    loop {
        let line = match session.prompter.read_line("\ntripwise> ") {
            Ok(Some(line)) => line,
            Ok(None) => {
                // Ctrl+D (EOF)
                println!();
                break;
            }
            Err(e) => {
                tracing::error!("input error: {e:#}");
                eprintln!("input error: {e:#}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match run_turn(registry, session, line).await {
            CommandResult::Quit => break,
            CommandResult::NotACommand => {
                println!("type /plan to plan a trip, or /help for commands");
            }
            CommandResult::Handled => {}
        }
    }

    print_goodbye();
}
