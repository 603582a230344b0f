// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte ranges in a command line and the caret snippet printed under a
//! rejected line.

use serde::{Deserialize, Serialize};

/// A byte range in a command line, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Up to `context_chars` characters either side of `span.start`, with a
/// caret line underneath. An empty span still gets one caret.
///
/// ```text
/// /system-property=p:add(value=)
///                              ^
/// ```
pub fn context_snippet(input: &str, span: Span, context_chars: usize) -> String {
    let mut at = span.start.min(input.len());
    while !input.is_char_boundary(at) {
        at -= 1;
    }

    let before: Vec<char> = input[..at].chars().collect();
    let skipped = before.len().saturating_sub(context_chars);
    let lead: String = before[skipped..].iter().collect();
    let tail: String = input[at..].chars().take(context_chars + 1).collect();

    let column = before.len() - skipped;
    let carets = "^".repeat(span.len().max(1));
    format!("{lead}{tail}\n{:column$}{carets}", "")
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
