use crate::actions::ActionKind;
use colored::*;
use std::io::{self, Write};

pub const MENU_TITLE: &str = "Active Directory Toolbox";
pub const SELECT_PROMPT: &str = "Select an Option: ";
pub const INVALID_CHOICE: &str = "Invalid choice, please choose from the listed options";
pub const QUIT_SELECTOR: &str = "q";

/// What the user picked at the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Action(ActionKind),
    Quit,
}

impl MenuChoice {
    /// Parses a trimmed menu selection. Selectors are matched exactly.
    pub fn parse(input: &str) -> Option<Self> {
        if input == QUIT_SELECTOR {
            return Some(MenuChoice::Quit);
        }
        ActionKind::from_selector(input).map(MenuChoice::Action)
    }
}

/// Writes the option list. The selection prompt is written by the session.
pub fn render<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "       {}       ", MENU_TITLE.cyan().bold())?;
    writeln!(out)?;
    writeln!(out, "Please select an option:")?;
    writeln!(out)?;
    for kind in ActionKind::ALL {
        writeln!(out, "{}. {}", kind.selector(), kind.label())?;
    }
    writeln!(out)?;
    writeln!(out, "{}. Quit", QUIT_SELECTOR)?;
    writeln!(out)?;
    Ok(())
}
