//! A terminal spinner shown while the backend is working.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// Draws on stderr so stdout keeps only the itinerary.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start a spinner with the given message (e.g. `"planning your trip"`).
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(FRAMES),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(INTERVAL);
        Self { bar }
    }

    /// Stop the spinner and clear its line.
    pub fn stop(self) {
        self.bar.finish_and_clear();
    }
}
