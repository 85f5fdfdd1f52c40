//! Defines the actions offered by the toolbox menu.
//!
//! Each action kind carries its menu selector, label, prompts and the capability
//! module function it maps to, so the menu and the runner stay data-driven.

mod kind;

pub use kind::*;
