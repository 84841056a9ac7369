//! Command-line interface.
//!
//! - [`args`] - parsing `keyward <subcommand> [arg]`
//! - [`commands`] - handlers writing user-facing output
//! - [`format`] - key display and number formatting
//! - [`version`] - version string
//!
//! # Usage
//!
//! ```ignore
//! use keyward::cli::{parse_args, run_command};
//!
//! let command = parse_args(std::env::args());
//! run_command(command, &prompt, stdin, &mut std::io::stdout()).await?;
//! ```

pub mod args;
pub mod commands;
pub mod format;
pub mod version;

pub use args::{complete, parse_args, Command};
pub use commands::run_command;
pub use version::VERSION;
