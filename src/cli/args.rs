//! Command-line argument parsing.
//!
//! `keyward <subcommand> [arg]`, mirroring the in-game `/api` command.
//! Subcommand names are case-insensitive.

/// Subcommands, in the order they are listed.
pub const SUBCOMMANDS: &[&str] = &["new", "get", "set", "stats", "hide", "watch", "wait"];

/// Parsed command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List subcommands
    Help,
    /// Show version information
    Version,
    /// Explain how to have a new key issued
    New,
    /// Display the current key
    Get,
    /// Validate and store a key
    Set(Option<String>),
    /// Show usage stats for the stored key or another one
    Stats(Option<String>),
    /// Toggle hiding the key in output
    Hide,
    /// Read chat lines from stdin and adopt announced keys
    Watch,
    /// Wait for a usable key on behalf of a feature
    Wait(String),
    /// Anything else
    Unknown(String),
}

impl Command {
    /// Whether the stored key should be checked before running.
    pub fn needs_startup_validation(&self) -> bool {
        matches!(self, Command::Get | Command::Wait(_))
    }
}

/// Parse command-line arguments (program name first).
///
/// # Examples
///
/// ```
/// use keyward::cli::args::{parse_args, Command};
///
/// let args = vec!["keyward".to_string(), "SET".to_string(), "abc".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Command::Set(Some("abc".to_string())));
/// ```
pub fn parse_args<I>(args: I) -> Command
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);
    let subcommand = match args.next() {
        Some(s) => s,
        None => return Command::Help,
    };
    let arg = args.next().filter(|a| !a.is_empty());

    match subcommand.to_lowercase().as_str() {
        "--version" | "-v" => Command::Version,
        "help" | "--help" | "-h" => Command::Help,
        "new" => Command::New,
        "get" => Command::Get,
        "set" => Command::Set(arg),
        "stats" => Command::Stats(arg),
        "hide" => Command::Hide,
        "watch" => Command::Watch,
        "wait" => Command::Wait(arg.unwrap_or_else(|| "keyward".to_string())),
        _ => Command::Unknown(subcommand),
    }
}

/// Subcommands starting with `prefix`, for shell completion.
pub fn complete(prefix: &str) -> Vec<&'static str> {
    let prefix = prefix.to_lowercase();
    SUBCOMMANDS
        .iter()
        .copied()
        .filter(|c| c.starts_with(&prefix))
        .collect()
}
