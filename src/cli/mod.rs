//! Command-line interface for ethiscan.

mod commands;
mod helpers;
pub mod icons;

pub use commands::{is_verbose, run};
