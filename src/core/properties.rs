//! Reading and writing the `.properties` text format.
//!
//! Supports the parts of the Java syntax that resource bundles use in
//! practice: `#`/`!` comments, `=`, `:` or whitespace separators, backslash
//! line continuations and the `\t \n \r \f \\ \uXXXX` escapes. Lines may end
//! with `\n`, `\r\n` or `\r`. Files are read and written as UTF-8.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertiesError {
    #[error("line {line}: malformed \\uXXXX escape")]
    MalformedUnicodeEscape { line: usize },
}

/// Parse `.properties` content into entries in file order.
///
/// Duplicate keys are returned as they appear; callers decide which wins.
pub fn parse(content: &str) -> Result<Vec<(String, String)>, PropertiesError> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let mut entries = Vec::new();
    let mut logical = String::new();
    let mut logical_start = 0;
    let mut continuing = false;

    for (index, raw_line) in lines(content).enumerate() {
        let line = raw_line.trim_start_matches(is_whitespace);

        if !continuing {
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            logical_start = index + 1;
        }

        if ends_with_continuation(line) {
            logical.push_str(&line[..line.len() - 1]);
            continuing = true;
            continue;
        }

        logical.push_str(line);
        continuing = false;
        entries.push(parse_entry(&logical, logical_start)?);
        logical.clear();
    }

    if continuing {
        entries.push(parse_entry(&logical, logical_start)?);
    }

    Ok(entries)
}

/// Serialize entries, preceded by `header` as `#` comment lines.
pub fn serialize<'a, I>(entries: I, header: Option<&str>) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();

    if let Some(header) = header {
        for line in header.lines() {
            out.push('#');
            out.push_str(line);
            out.push('\n');
        }
    }

    for (key, value) in entries {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }

    out
}

/// Split on `\n`, `\r\n` and lone `\r`.
fn lines(content: &str) -> impl Iterator<Item = &str> {
    let content = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix(['\n', '\r']))
        .unwrap_or(content);
    content
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn parse_entry(line: &str, line_number: usize) -> Result<(String, String), PropertiesError> {
    let mut key_end = line.len();
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_whitespace(c) {
            key_end = i;
            break;
        }
    }

    let rest = line[key_end..].trim_start_matches(is_whitespace);
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .map(|after| after.trim_start_matches(is_whitespace))
        .unwrap_or(rest);

    Ok((
        unescape(&line[..key_end], line_number)?,
        unescape(rest, line_number)?,
    ))
}

fn unescape(raw: &str, line_number: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    // Consecutive \u escapes may form a UTF-16 surrogate pair.
    let mut units: Vec<u16> = Vec::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_units(&mut units, &mut out);
            out.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            break;
        };

        if escaped == 'u' {
            let hex: String = chars.by_ref().take(4).collect();
            let unit = (hex.len() == 4)
                .then(|| u16::from_str_radix(&hex, 16).ok())
                .flatten()
                .ok_or(PropertiesError::MalformedUnicodeEscape { line: line_number })?;
            units.push(unit);
            continue;
        }

        flush_units(&mut units, &mut out);
        out.push(match escaped {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\x0c',
            other => other,
        });
    }

    flush_units(&mut units, &mut out);
    Ok(out)
}

fn flush_units(units: &mut Vec<u16>, out: &mut String) {
    if units.is_empty() {
        return;
    }
    out.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());

    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }

    out
}
