//! Text normalization applied to both content leaves and search terms.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

fn entity_regex() -> &'static Regex {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"(?i)&(quot|apos|amp|lt|gt|ndash|mdash|nbsp|#[0-9]{1,7}|#x[0-9a-f]{1,6});")
            .expect("valid regex")
    })
}

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Plain replacement for a recognised entity body, `None` leaves it as is.
fn decode_entity(body: &str) -> Option<char> {
    let lower = body.to_ascii_lowercase();
    let code_point = if let Some(hex) = lower.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = lower.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return match lower.as_str() {
            "quot" => Some('"'),
            "apos" => Some('\''),
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "ndash" | "mdash" => Some('-'),
            "nbsp" => Some(' '),
            _ => None,
        };
    };

    match code_point {
        34 => Some('"'),
        39 => Some('\''),
        38 => Some('&'),
        60 => Some('<'),
        62 => Some('>'),
        8211 | 8212 => Some('-'),
        160 => Some(' '),
        _ => None,
    }
}

fn fold_unicode(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        _ => c,
    }
}

fn fold_once(text: &str) -> Cow<'_, str> {
    let decoded = entity_regex().replace_all(text, |caps: &Captures<'_>| {
        decode_entity(&caps[1]).map_or_else(|| caps[0].to_string(), String::from)
    });

    let folded: Cow<'_, str> = if decoded.chars().any(|c| fold_unicode(c) != c) {
        Cow::Owned(decoded.chars().map(fold_unicode).collect())
    } else {
        decoded
    };

    // Whitespace last so entity-produced spaces collapse too.
    let collapsed = match whitespace_regex().replace_all(&folded, " ") {
        Cow::Borrowed(_) => None,
        Cow::Owned(collapsed) => Some(collapsed),
    };
    match collapsed {
        Some(collapsed) => Cow::Owned(collapsed),
        None => folded,
    }
}

/// Fold entity-encoded and typographic variants into a canonical form.
///
/// The fold is applied until the text stops changing, so double-encoded
/// input such as `&amp;quot;` ends at `"` and the function is idempotent.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut current = fold_once(text).into_owned();
    loop {
        match fold_once(&current) {
            Cow::Borrowed(_) => return current,
            Cow::Owned(next) if next == current => return current,
            Cow::Owned(next) => current = next,
        }
    }
}
