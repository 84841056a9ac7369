//! Formatting helpers for command output.

/// Shown in place of a hidden key.
pub const HIDDEN_PLACEHOLDER: &str = "[Hidden]";

/// The key as it should appear in output.
pub fn display_key(key: &str, hidden: bool) -> &str {
    if hidden {
        HIDDEN_PLACEHOLDER
    } else {
        key
    }
}

/// `1234567` -> `1,234,567`
pub fn number_with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
