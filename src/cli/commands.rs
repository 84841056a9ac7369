//! Command handlers.
//!
//! Handlers write their user-facing output to the given writer so they can
//! be tested without a terminal.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::args::{Command, SUBCOMMANDS};
use super::format::{display_key, number_with_commas};
use super::version::version_line;
use crate::chat::parse_new_key;
use crate::error::KeyError;
use crate::key::{KeyState, PromptCoordinator};

const MAKE_KEY_HINT: &str =
    "Set one with `keyward set <key>` or generate a new one with `keyward new`.";

/// Run a parsed command.
///
/// `input` feeds the `watch` and `wait` commands.
pub async fn run_command<R, W>(
    command: Command,
    prompt: &PromptCoordinator,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let state = prompt.state();
    match command {
        Command::Help => write_help(out),
        Command::Version => writeln!(out, "{}", version_line()),
        Command::New => write_new(out),
        Command::Get => {
            if let Some(session) = state.session() {
                if tokio::time::timeout(prompt.timeout(), session).await.is_err() {
                    debug!("Startup validation still running, showing key as unusable");
                }
            }
            write_get(state, out)
        }
        Command::Set(key) => set_key(state, key.as_deref(), out).await,
        Command::Stats(other) => write_stats(state, other.as_deref(), out).await,
        Command::Hide => toggle_hide(state, out),
        Command::Watch => watch_lines(state, input, out).await.map(|_| ()),
        Command::Wait(feature) => wait_for_key(prompt, &feature, input, out).await,
        Command::Unknown(name) => writeln!(
            out,
            "Invalid command `{}`! The available commands are: {}.",
            name,
            SUBCOMMANDS.join(", ")
        ),
    }
}

pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "--- API KEY MANAGER ---")?;
    writeln!(out, "keyward new          - Generate a new API key")?;
    writeln!(out, "keyward get          - Display your current API key")?;
    writeln!(out, "keyward set <key>    - Set your current API key")?;
    writeln!(out, "keyward stats [key]  - View stats about your API key")?;
    writeln!(out, "keyward hide         - Toggle your API key being visible in command output")?;
    writeln!(out, "keyward watch        - Adopt keys announced in chat lines read from stdin")?;
    writeln!(out, "keyward wait [name]  - Wait for a usable API key")
}

fn write_new<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Run `/api new` on the server to have a new key issued.")?;
    writeln!(
        out,
        "Pipe the chat log into `keyward watch` and the key is picked up automatically."
    )
}

fn write_no_key<W: Write>(state: &KeyState, out: &mut W) -> io::Result<()> {
    if state.has_value() {
        writeln!(out, "Your current API key is invalid!")?;
    } else {
        writeln!(out, "You do not have an API key set!")?;
    }
    writeln!(out, "{}", MAKE_KEY_HINT)
}

pub fn write_get<W: Write>(state: &KeyState, out: &mut W) -> io::Result<()> {
    match state.current() {
        Some(key) => writeln!(
            out,
            "Your API key is {}",
            display_key(&key, state.is_hidden())
        ),
        None => write_no_key(state, out),
    }
}

pub async fn set_key<W: Write>(state: &KeyState, key: Option<&str>, out: &mut W) -> io::Result<()> {
    let key = match key {
        Some(k) => k,
        None => return writeln!(out, "Please enter your key with `keyward set <key>`."),
    };

    match state.try_set(key).await {
        Ok(_) => writeln!(
            out,
            "Saved your API key as {}",
            display_key(key, state.is_hidden())
        ),
        Err(err @ KeyError::Transport { .. }) => writeln!(out, "{}", err.user_message()),
        Err(err) => writeln!(
            out,
            "It appears your API key was invalid! ({})",
            err.cause().unwrap_or_default()
        ),
    }
}

/// Usage stats for the stored key, or for `other`.
///
/// A failure on the stored key means it stopped being valid, so the key
/// is invalidated.
pub async fn write_stats<W: Write>(
    state: &KeyState,
    other: Option<&str>,
    out: &mut W,
) -> io::Result<()> {
    let own_key;
    let (checking, own) = match other {
        Some(key) => (key, false),
        None => match state.value() {
            Some(key) => {
                own_key = key;
                (own_key.as_str(), true)
            }
            None => return write_no_key(state, out),
        },
    };

    match state.info(Some(checking)).await {
        Ok(info) => {
            let hidden = own && state.is_hidden();
            writeln!(out, "Key: {}", display_key(checking, hidden))?;
            writeln!(out, "Owner: {}", info.owner)?;
            writeln!(out, "Limit: {}", info.limit)?;
            writeln!(
                out,
                "Queries in the last minute: {}",
                number_with_commas(info.queries_in_past_minute)
            )?;
            writeln!(out, "Total Queries: {}", number_with_commas(info.total_queries))
        }
        Err(_) if own => {
            state.invalidate();
            writeln!(out, "Uh oh! Looks like your API key was invalid!")
        }
        Err(_) => writeln!(out, "Looks like that key is invalid!"),
    }
}

pub fn toggle_hide<W: Write>(state: &KeyState, out: &mut W) -> io::Result<()> {
    if state.toggle_hidden() {
        writeln!(out, "Your key is now hidden from command output.")
    } else {
        writeln!(out, "Your key is no longer hidden from command output.")
    }
}

/// Adopt every key announced in `reader` until end of input.
///
/// Returns how many keys were adopted.
pub async fn watch_lines<R, W>(state: &KeyState, reader: R, out: &mut W) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut adopted = 0;

    while let Some(line) = lines.next_line().await? {
        if let Some(key) = parse_new_key(&line) {
            state.replace(key.as_str());
            adopted += 1;
            writeln!(
                out,
                "Your new API key is {}",
                display_key(&key, state.is_hidden())
            )?;
        }
    }

    debug!(adopted, "Chat input ended");
    Ok(adopted)
}

/// Wait for a usable key on behalf of `feature`, adopting announced keys
/// from `reader` meanwhile.
pub async fn wait_for_key<R, W>(
    prompt: &PromptCoordinator,
    feature: &str,
    reader: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let wait = prompt.await_key(feature);
    tokio::pin!(wait);
    let mut sink = io::sink();

    let early = tokio::select! {
        result = &mut wait => Some(result),
        watched = watch_lines(prompt.state(), reader, &mut sink) => {
            if let Err(e) = watched {
                debug!(error = %e, "Stopped reading chat input");
            }
            None
        }
    };
    let result = match early {
        Some(result) => result,
        None => wait.await,
    };

    match result {
        Ok(key) => writeln!(
            out,
            "{} can use API key {}",
            feature,
            display_key(&key, prompt.state().is_hidden())
        ),
        Err(err) => writeln!(out, "{}", err.user_message()),
    }
}
