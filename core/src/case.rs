//! # Case Conversion
//!
//! Identifier case conversion for tag names.

use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// Converts an identifier-style string to lower camel case.
///
/// The input is split into words on `_`, `-` and other non-alphanumeric
/// characters, and the separators are dropped. A word written in a single case
/// (`field`, `EAGER`) is normalized: the first word is lowercased and every
/// following one is capitalized. A mixed-case word keeps its capitals, except
/// that a leading uppercase run of the first word is lowercased
/// (`MyField` -> `myField`, `HTTPServer` -> `httpServer`).
///
/// The output never contains separators and starts lowercase, so re-applying
/// the function to its own output is a no-op (`a_b_c` -> `aBC` -> `aBC`).
pub fn to_lower_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let words = input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty());

    for word in words {
        // Digit-only words before the first letter do not count as the first word.
        let first = !out.chars().any(char::is_alphabetic);
        let mixed = word.chars().any(char::is_lowercase) && word.chars().any(char::is_uppercase);
        match (first, mixed) {
            (true, false) => out.push_str(&word.to_lower_camel_case()),
            (false, false) => out.push_str(&word.to_upper_camel_case()),
            (true, true) => out.push_str(&lower_leading_run(word)),
            (false, true) => out.push_str(&capitalize(word)),
        }
    }
    out
}

/// Lowercases the leading uppercase run of `word`. When the run is followed by
/// a lowercase letter, its last capital starts the next word and is kept.
fn lower_leading_run(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let run = chars.iter().take_while(|c| c.is_uppercase()).count();
    let lowered = match chars.get(run) {
        Some(next) if run > 1 && next.is_lowercase() => run - 1,
        _ => run,
    };

    let mut out = String::with_capacity(word.len());
    out.extend(chars[..lowered].iter().flat_map(|c| c.to_lowercase()));
    out.extend(&chars[lowered..]);
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_table() {
        let cases = [
            ("my_field", "myField"),
            ("MyField", "myField"),
            ("ALLCAPS", "allcaps"),
            ("already_camel_ok", "alreadyCamelOk"),
            ("kebab-case-name", "kebabCaseName"),
            ("HTTPServer", "httpServer"),
            ("TABLE_EAGER_RULE", "tableEagerRule"),
            ("f2", "f2"),
            ("a_b_c", "aBC"),
            ("is_a_b", "isAB"),
            ("x_y_z", "xYZ"),
            ("ip_v4_a", "ipV4A"),
            ("user_IDList", "userIDList"),
            ("1_a", "1a"),
            ("-", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(to_lower_camel_case(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_fixed_point() {
        for input in [
            "already_camel_ok",
            "TABLE_EAGER_RULE",
            "keySeparator",
            "x",
            "a_b_c",
            "is_a_b",
            "x_y_z",
            "ip_v4_a",
            "HTTPServer",
            "1_a",
            "2_B_c",
        ] {
            let once = to_lower_camel_case(input);
            assert_eq!(to_lower_camel_case(&once), once, "input: {:?}", input);
        }
    }
}
