//! Handles the Command Line Interface (CLI) of the toolbox.
//!
//! Includes parsing startup flags into a `Config`, rendering the menu, clearing
//! the terminal and driving the interactive session.

mod commands;
mod menu;
mod screen;
mod session;

pub use commands::*;
pub use menu::*;
pub use screen::*;
pub use session::*;
