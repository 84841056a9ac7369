//! Version command.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The version line printed by `keyward --version`.
pub fn version_line() -> String {
    format!("keyward {}", VERSION)
}
