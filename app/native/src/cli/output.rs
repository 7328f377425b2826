//! CLI output formatting utilities.
//!
//! JSON syntax highlighting and colored boolean markers for tables.

use colored::Colorize;

/// Prints JSON with syntax highlighting.
///
/// Keys are cyan, strings green, numbers yellow, and `true`/`false`/`null`
/// magenta. Punctuation is left uncolored.
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json_str = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json_str));
}

/// Returns `json` with ANSI colors applied.
///
/// Expects well-formed JSON; anything the scanner does not recognise is
/// copied through unchanged.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            let end = string_end(&chars, i);
            let token: String = chars[i..end].iter().collect();
            let is_key = chars[end..].iter().find(|c| !c.is_whitespace()) == Some(&':');
            let colored = if is_key { token.cyan() } else { token.green() };
            out.push_str(&colored.to_string());
            i = end;
        } else if ch == '-' || ch.is_ascii_alphanumeric() {
            let end = chars[i..]
                .iter()
                .position(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.')))
                .map_or(chars.len(), |offset| i + offset);
            let token: String = chars[i..end].iter().collect();
            out.push_str(&color_literal(&token));
            i = end;
        } else {
            out.push(ch);
            i += 1;
        }
    }

    out
}

/// Returns the index just past the string literal starting at `start`.
fn string_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '"' => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn color_literal(token: &str) -> String {
    match token {
        "true" | "false" | "null" => token.magenta().to_string(),
        _ if token.parse::<f64>().is_ok() => token.yellow().to_string(),
        _ => token.to_string(),
    }
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
