use super::menu::{self, MenuChoice, INVALID_CHOICE, SELECT_PROMPT};
use super::screen::{Clear, Screen};
use crate::actions::{ActionKind, ActionRequest};
use crate::error::{Result, ToolboxError};
use crate::shell::Invoke;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const RUN_AGAIN_PROMPT: &str = "Run again? (y/n): ";

/// Returns true when a run-again answer means "yes".
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_lowercase() == "y"
}

/// An interactive toolbox session over one input stream and one output sink.
///
/// The session owns the menu loop and the run-again loop of every action. It
/// never exits the process; `run` returns once the user quits and the caller
/// decides the exit code.
pub struct Session<R, W, I, C = Screen> {
    input: R,
    output: W,
    invoker: I,
    screen: C,
    spinner: bool,
    /// Shown under the menu on every redraw.
    warning: Option<String>,
    /// Shown under the menu on the next redraw only.
    flash: Option<String>,
}

impl<R: BufRead, W: Write, I: Invoke> Session<R, W, I> {
    /// Creates a session that never clears the display.
    pub fn new(input: R, output: W, invoker: I) -> Self {
        Self {
            input,
            output,
            invoker,
            screen: Screen::disabled(),
            spinner: false,
            warning: None,
            flash: None,
        }
    }
}

impl<R: BufRead, W: Write, I: Invoke, C: Clear> Session<R, W, I, C> {
    pub fn with_screen<S: Clear>(self, screen: S) -> Session<R, W, I, S> {
        Session {
            input: self.input,
            output: self.output,
            invoker: self.invoker,
            screen,
            spinner: self.spinner,
            warning: self.warning,
            flash: self.flash,
        }
    }

    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.spinner = enabled;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    /// Runs the menu loop until the user selects quit.
    ///
    /// Fails only when the session streams fail, including the input reaching EOF.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.screen.clear(&mut self.output);
            menu::render(&mut self.output)?;
            if let Some(warning) = &self.warning {
                writeln!(self.output, "{} {}", "Warning:".yellow().bold(), warning)?;
                writeln!(self.output)?;
            }
            if let Some(flash) = self.flash.take() {
                writeln!(self.output, "{}", flash.red())?;
                writeln!(self.output)?;
            }

            let selection = self.prompt(SELECT_PROMPT)?;
            match MenuChoice::parse(&selection) {
                Some(MenuChoice::Action(kind)) => self.run_action(kind)?,
                Some(MenuChoice::Quit) => {
                    info!("Quit selected");
                    return Ok(());
                },
                None => {
                    debug!(%selection, "Invalid menu choice");
                    self.flash = Some(INVALID_CHOICE.to_string());
                },
            }
        }
    }

    /// Prompts for, runs and reports `kind` until the user declines to run it again.
    pub fn run_action(&mut self, kind: ActionKind) -> Result<()> {
        loop {
            writeln!(
                self.output,
                "{}",
                format!("You selected {}", kind.label()).cyan().bold()
            )?;

            let mut params = Vec::with_capacity(kind.prompts().len());
            for prompt in kind.prompts() {
                params.push(self.prompt(prompt)?);
            }
            let request = ActionRequest::new(kind, params);

            let spinner = self.start_spinner(kind)?;
            let outcome = self.invoker.invoke(&request);
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            self.report(kind, outcome)?;

            let answer = self.prompt(RUN_AGAIN_PROMPT)?;
            if !is_affirmative(&answer) {
                self.screen.clear(&mut self.output);
                return Ok(());
            }
        }
    }

    fn report(&mut self, kind: ActionKind, outcome: Result<String>) -> Result<()> {
        match outcome {
            Ok(stdout) => {
                info!(action = %kind, "Module function completed");
                writeln!(self.output, "{}", stdout)?;
            },
            Err(e) => {
                warn!(action = %kind, error = %e, "Module function failed");
                writeln!(
                    self.output,
                    "{}",
                    format!("Command execution failed: {}", e).red()
                )?;
                if let Some(stderr) = e.stderr() {
                    writeln!(self.output, "{}", stderr)?;
                }
            },
        }
        Ok(())
    }

    fn start_spinner(&self, kind: ActionKind) -> Result<Option<ProgressBar>> {
        if !self.spinner {
            return Ok(None);
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")?);
        spinner.set_message(format!("Running {}...", kind.function()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Ok(Some(spinner))
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads one trimmed line. EOF means the input stream is gone.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Err(ToolboxError::InputClosed);
        }
        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }
}
