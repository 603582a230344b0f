// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Word splitting that respects quotes and bracket nesting.

/// Blank lines and `#` comments carry no command.
pub fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Split off the first whitespace-delimited word: `("run-batch", "--verbose")`.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    }
}

/// Split arguments on whitespace outside quotes and brackets.
///
/// Quotes are kept in the returned words so that values can be re-parsed.
pub fn split_args(text: &str) -> Vec<String> {
    split_where(text, char::is_whitespace)
}

/// Split on `sep` outside quotes and brackets, trimming each piece and
/// dropping empty ones.
///
/// `batch,/a=b:add(x=1,y=2),run-batch` splits into three commands.
pub fn split_top_level(text: &str, sep: char) -> Vec<String> {
    split_where(text, |c| c == sep)
}

fn split_where(text: &str, is_sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_quotes {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                current.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if depth == 0 && is_sep(c) => push_part(&mut parts, &mut current),
            c => current.push(c),
        }
    }
    push_part(&mut parts, &mut current);
    parts
}

fn push_part(parts: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    current.clear();
}
