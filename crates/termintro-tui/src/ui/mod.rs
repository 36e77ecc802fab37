//! UI module for the termintro TUI.

pub mod layout;
pub mod theme;

pub use layout::*;
pub use theme::*;
