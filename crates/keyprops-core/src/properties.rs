//! Line-oriented `key=value` properties parsing and rendering.
//!
//! This is the text format of `key.properties`: one assignment per line,
//! `#` or `!` comment lines, backslash escapes (`\t`, `\n`, `\r`, `\\`,
//! `\=`, `\uXXXX`), and a trailing backslash continuing the assignment on
//! the next physical line. The first unescaped `=` separates key from
//! value; whitespace around it is trimmed unless escaped. A non-comment
//! line without a separator is malformed.

use std::collections::HashMap;

use thiserror::Error;

/// Parse failure for a properties document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based physical line number where the offending entry starts.
    pub line: usize,
    /// Description of the violation.
    pub message: String,
}

/// Parses properties text into a key-value mapping.
///
/// Duplicate keys are tolerated with a warning; the last value wins.
pub fn parse(text: &str) -> Result<HashMap<String, String>, ParseError> {
    let mut entries = HashMap::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let line = idx + 1;
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        // Fold backslash continuations into one logical line. Comment
        // detection applies to natural lines only, so a continuation is
        // consumed here even if it starts with '#'.
        let mut logical = trimmed.to_string();
        while has_trailing_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let Some((raw_key, raw_value)) = split_assignment(&logical) else {
            return Err(ParseError {
                line,
                message: format!("expected 'key=value', found '{}'", logical),
            });
        };

        let key = unescape(trim_unescaped_end(raw_key))
            .map_err(|message| ParseError { line, message })?;
        let value =
            unescape(raw_value.trim_start()).map_err(|message| ParseError { line, message })?;

        if entries.insert(key.clone(), value).is_some() {
            tracing::warn!("Duplicate key '{}' in properties input, last value wins", key);
        }
    }

    Ok(entries)
}

/// Renders a mapping to properties text.
///
/// Keys are emitted in sorted order and escaped so that [`parse`] gives
/// back an equal mapping.
pub fn render(entries: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();

    let mut out = String::new();
    for key in keys {
        escape_into(&mut out, key, true);
        out.push('=');
        escape_into(&mut out, &entries[key], false);
        out.push('\n');
    }
    out
}

/// An odd number of trailing backslashes continues the logical line.
fn has_trailing_continuation(s: &str) -> bool {
    s.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits at the first unescaped `=`, if any.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' => return Some((&line[..i], &line[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Trims trailing spaces and tabs that are not escaped by a backslash.
fn trim_unescaped_end(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = s.len();
    while end > 0 && (bytes[end - 1] == b' ' || bytes[end - 1] == b'\t') {
        let mut backslashes = 0;
        let mut i = end - 1;
        while i > 0 && bytes[i - 1] == b'\\' {
            backslashes += 1;
            i -= 1;
        }
        if backslashes % 2 == 1 {
            break;
        }
        end -= 1;
    }
    &s[..end]
}

fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|h| h.to_digit(16))
                        .ok_or_else(|| "invalid \\u escape: expected 4 hex digits".to_string())?;
                    code = code * 16 + digit;
                }
                let ch = char::from_u32(code)
                    .ok_or_else(|| format!("invalid \\u escape: U+{:04X}", code))?;
                out.push(ch);
            }
            // A backslash before any other character yields that character.
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Ok(out)
}

fn escape_into(out: &mut String, s: &str, is_key: bool) {
    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '=' => out.push_str("\\="),
            '#' | '!' if is_key && i == 0 => {
                out.push('\\');
                out.push(c);
            }
            // Keys are fully space-escaped; values only need their leading
            // space protected from the separator trim.
            ' ' if is_key || i == 0 => out.push_str("\\u0020"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_basic_assignments() {
        let text = "storePassword=hunter2\nkeyAlias=upload\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries, map(&[("storePassword", "hunter2"), ("keyAlias", "upload")]));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let text = "# generated by keyprops\n\n! legacy comment\nkeyAlias=upload\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries, map(&[("keyAlias", "upload")]));
    }

    #[test]
    fn test_parse_trims_around_separator() {
        let entries = parse("  keyAlias  =  upload\n").unwrap();
        assert_eq!(entries.get("keyAlias").map(String::as_str), Some("upload"));
    }

    #[test]
    fn test_parse_value_keeps_interior_and_trailing_whitespace() {
        let entries = parse("storeFile=release keystore.jks \n").unwrap();
        assert_eq!(
            entries.get("storeFile").map(String::as_str),
            Some("release keystore.jks ")
        );
    }

    #[test]
    fn test_parse_value_may_contain_separator() {
        let entries = parse("storePassword=a=b=c\n").unwrap();
        assert_eq!(entries.get("storePassword").map(String::as_str), Some("a=b=c"));
    }

    #[test]
    fn test_parse_escaped_separator_in_key() {
        let entries = parse("odd\\=key=value\n").unwrap();
        assert_eq!(entries.get("odd=key").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_parse_escape_sequences() {
        let entries = parse("k=a\\tb\\nc\\\\d\\u0041\n").unwrap();
        assert_eq!(entries.get("k").map(String::as_str), Some("a\tb\nc\\dA"));
    }

    #[test]
    fn test_parse_escaped_trailing_space_in_key() {
        let entries = parse("key\\ =v\n").unwrap();
        assert_eq!(entries.get("key ").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_parse_line_continuation() {
        let text = "storeFile=one \\\n    two\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries.get("storeFile").map(String::as_str), Some("one two"));
    }

    #[test]
    fn test_parse_escaped_backslash_is_not_continuation() {
        let text = "a=ends\\\\\nb=next\n";
        let entries = parse(text).unwrap();
        assert_eq!(entries.get("a").map(String::as_str), Some("ends\\"));
        assert_eq!(entries.get("b").map(String::as_str), Some("next"));
    }

    #[test]
    fn test_parse_continuation_at_eof() {
        let entries = parse("a=dangling\\").unwrap();
        assert_eq!(entries.get("a").map(String::as_str), Some("dangling"));
    }

    #[test]
    fn test_parse_missing_separator_fails_with_line() {
        let err = parse("storePassword=x\nnot an assignment\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("key=value"));
    }

    #[test]
    fn test_parse_line_number_counts_comments_and_blanks() {
        let err = parse("# one\n\n! three\nbad\n").unwrap_err();
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_parse_truncated_unicode_escape_fails() {
        let err = parse("k=\\u00\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("\\u"));
    }

    #[test]
    fn test_parse_invalid_unicode_escape_fails() {
        assert!(parse("k=\\uZZZZ\n").is_err());
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let entries = parse("k=first\nk=second\n").unwrap();
        assert_eq!(entries.get("k").map(String::as_str), Some("second"));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_render_sorted_and_parseable() {
        let entries = map(&[("storeFile", "upload.jks"), ("keyAlias", "upload")]);
        let text = render(&entries);
        assert_eq!(text, "keyAlias=upload\nstoreFile=upload.jks\n");
    }

    #[test]
    fn test_render_empty_map() {
        assert_eq!(render(&HashMap::new()), "");
    }

    #[test]
    fn test_round_trip_plain() {
        let entries = map(&[
            ("storePassword", "hunter2"),
            ("keyPassword", "s3cret"),
            ("keyAlias", "upload"),
            ("storeFile", "upload-keystore.jks"),
        ]);
        assert_eq!(parse(&render(&entries)).unwrap(), entries);
    }

    #[test]
    fn test_round_trip_awkward_characters() {
        let entries = map(&[
            ("key with spaces", " leading and trailing "),
            ("equals=in=key", "equals=in=value"),
            ("#commentish", "!also commentish"),
            ("tabs\tand\\slashes", "line\nbreak\tand\\more"),
            ("", "empty key"),
            ("empty value", ""),
        ]);
        assert_eq!(parse(&render(&entries)).unwrap(), entries);
    }

    #[test]
    fn test_round_trip_trailing_backslash_value() {
        let entries = map(&[("k", "ends with backslash\\")]);
        assert_eq!(parse(&render(&entries)).unwrap(), entries);
    }
}
