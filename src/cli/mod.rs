//! CLI argument parsing and input documents.

mod args;
mod input;
mod validators;

pub use args::Cli;
pub use input::SpectrogramInput;
