//! Terminal styling for tally CLI output.
//!
//! Color is applied only when the terminal supports it; every renderer
//! falls back to plain text otherwise.

pub mod styles;
pub mod terminal;
