//! Runs capability module operations through an external interpreter.
//!
//! Includes:
//! - `Invoke`: the seam the interactive session calls into.
//! - `powershell`: the PowerShell-backed implementation.

mod powershell;

pub use powershell::*;

use crate::actions::ActionRequest;
use crate::error::Result;

/// Executes an action against the capability module.
///
/// Returns the captured standard output on success. Failures carry whatever
/// standard-error text the operation produced.
pub trait Invoke {
    fn invoke(&self, request: &ActionRequest) -> Result<String>;
}
