//! Notifier that prints to the terminal.

use std::io::{self, Write};

use crate::error::KeyError;
use crate::traits::Notifier;

const SET_KEY_HINT: &str =
    "Set one with `keyward set <key>` or generate a new one with `keyward new`.";

/// Prints instructional messages to stderr, keeping stdout for results.
#[derive(Debug, Clone, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn new() -> Self {
        Self
    }

    fn emit(lines: &[String]) {
        let mut stderr = io::stderr().lock();
        for line in lines {
            // Nothing sensible to do if the terminal is gone.
            let _ = writeln!(stderr, "{}", line);
        }
    }

    fn required_lines(feature: &str) -> Vec<String> {
        vec![
            format!("{} requires your API key to operate!", feature),
            "Generate a new API key with `keyward new` or set it with `keyward set <key>`."
                .to_string(),
        ]
    }

    fn rejected_lines(err: &KeyError) -> Vec<String> {
        match err {
            KeyError::Transport { message } => vec![
                format!("Could not check your API key right now ({}).", message),
                "It will be treated as unusable until it is checked again.".to_string(),
            ],
            _ => vec![
                format!(
                    "Your current API key is invalid! ({})",
                    err.cause().unwrap_or_default()
                ),
                SET_KEY_HINT.to_string(),
            ],
        }
    }
}

impl Notifier for TerminalNotifier {
    fn key_required(&self, feature: &str) {
        Self::emit(&Self::required_lines(feature));
    }

    fn stored_key_rejected(&self, err: &KeyError) {
        Self::emit(&Self::rejected_lines(err));
    }
}
