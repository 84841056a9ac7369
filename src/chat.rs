//! Recognising a freshly issued key in server chat output.
//!
//! When the server issues a new key it announces it with a line like
//! `&aYour new API key is &r&b1a2b3c4d-...&r`. Seeing that line is the
//! trusted replacement event.

use once_cell::sync::Lazy;
use regex::Regex;

/// Colour and style codes, written with either `&` or `§`.
static FORMAT_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[&§][0-9a-fk-orA-FK-OR]").expect("Invalid format code regex"));

static NEW_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Your new API key is (?P<key>[0-9A-Za-z-]+)$").expect("Invalid new key regex")
});

/// Strip colour and style codes from a chat line.
pub fn strip_format_codes(line: &str) -> String {
    FORMAT_CODE_REGEX.replace_all(line, "").into_owned()
}

/// The key announced by `line`, if it is a new-key announcement.
pub fn parse_new_key(line: &str) -> Option<String> {
    let plain = strip_format_codes(line);
    NEW_KEY_REGEX
        .captures(plain.trim())
        .map(|caps| caps["key"].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_announcement() {
        assert_eq!(
            parse_new_key("&aYour new API key is &r&b1a2b3c4d-0000-4abc-9def-123456789abc&r"),
            Some("1a2b3c4d-0000-4abc-9def-123456789abc".to_string())
        );
    }

    #[test]
    fn test_section_sign_codes() {
        assert_eq!(
            parse_new_key("§aYour new API key is §r§bdeadbeef§r"),
            Some("deadbeef".to_string())
        );
    }

    #[test]
    fn test_plain_announcement_with_whitespace() {
        assert_eq!(
            parse_new_key("  Your new API key is abc-123\r\n"),
            Some("abc-123".to_string())
        );
    }

    #[test]
    fn test_unrelated_lines() {
        assert_eq!(parse_new_key("Your API key is abc"), None);
        assert_eq!(parse_new_key("<Player> Your new API key is abc"), None);
        assert_eq!(parse_new_key("Your new API key is "), None);
        assert_eq!(parse_new_key(""), None);
    }

    #[test]
    fn test_strip_format_codes() {
        assert_eq!(strip_format_codes("&a&lHello §bWorld"), "Hello World");
        assert_eq!(strip_format_codes("rock & roll"), "rock & roll");
    }
}
