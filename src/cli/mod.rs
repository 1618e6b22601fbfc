/// Command Line Interface for sshman
/// (c) 2024 Ross Younger
mod args;
mod cli_main;
mod print;
pub(crate) mod styles;
pub use cli_main::cli;
