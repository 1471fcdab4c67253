//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`, or shows a spinner on a TTY
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ! {message}"`
///
/// All three are suppressed when `ctx.quiet`. When a scenario label is set
/// every line is prefixed with `[label]`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    label: Option<String>,
    spinners: bool,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            label: None,
            spinners: ctx.show_progress(),
            active: RefCell::new(None),
        }
    }

    /// Prefix every line with `[label]`.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Print plain lines only. Needed when several reporters share the
    /// terminal at once.
    #[must_use]
    pub fn without_spinner(mut self) -> Self {
        self.spinners = false;
        self
    }

    fn decorate(&self, message: &str) -> String {
        match &self.label {
            Some(label) => format!(
                "{} {message}",
                format!("[{label}]").style(self.ctx.styles.scenario)
            ),
            None => message.to_string(),
        }
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.active.borrow_mut().take()
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if let Some(previous) = self.take_spinner() {
            progress::finish_step(&previous);
        }
        let line = self.decorate(message);
        if self.spinners {
            *self.active.borrow_mut() = Some(progress::spinner(&line));
        } else {
            println!("  {} {line}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        let line = self.decorate(message);
        match self.take_spinner() {
            Some(pb) => progress::finish_ok(&pb, &line),
            None => println!("  {} {line}", "✓".style(self.ctx.styles.success)),
        }
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        let line = self.decorate(message);
        match self.take_spinner() {
            Some(pb) => progress::finish_warn(&pb, &line),
            None => println!("  {} {line}", "!".style(self.ctx.styles.warning)),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = self.active.get_mut().take() {
            progress::finish_step(&pb);
        }
    }
}
