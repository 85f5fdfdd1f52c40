use console::Term;
use std::io::Write;
use tracing::debug;

/// Clears the display between menu screens.
///
/// `out` is the session's output sink. Clearing never fails the caller.
pub trait Clear {
    fn clear(&mut self, out: &mut dyn Write);
}

/// Clears the process's stdout terminal, or does nothing when disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    enabled: bool,
}

impl Screen {
    pub fn terminal() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Clear for Screen {
    fn clear(&mut self, out: &mut dyn Write) {
        if !self.enabled {
            return;
        }
        // Pending output must land before the terminal is wiped
        if let Err(e) = out.flush() {
            debug!(error = %e, "Failed to flush output before clearing");
        }
        if let Err(e) = Term::stdout().clear_screen() {
            debug!(error = %e, "Failed to clear screen");
        }
    }
}
