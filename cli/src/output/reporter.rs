//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Owns a copy of the stylesheet so it can be shared with background
//! pollers running on other threads.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, Styles};

/// Terminal progress reporter.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
/// - `progress()` prints `"  … {label}: {percentage}%"`
///
/// Everything except warnings is suppressed when quiet.
pub struct TerminalReporter {
    styles: Styles,
    quiet: bool,
}

impl TerminalReporter {
    /// Create a reporter matching the given output context.
    #[must_use]
    pub fn new(ctx: &OutputContext) -> Self {
        Self {
            styles: ctx.styles.clone(),
            quiet: ctx.quiet,
        }
    }
}

impl ProgressReporter for TerminalReporter {
    fn step(&self, message: &str) {
        if !self.quiet {
            println!("  {} {message}", "→".style(self.styles.step));
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            println!("  {} {message}", "✓".style(self.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("  {} {message}", "!".style(self.styles.warning));
    }

    fn progress(&self, label: &str, percentage: u8) {
        if !self.quiet {
            println!(
                "  {} {label}: {}",
                "…".style(self.styles.dim),
                format!("{percentage}%").style(self.styles.bold)
            );
        }
    }
}
