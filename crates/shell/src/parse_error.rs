// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation request parse errors.

use thiserror::Error;

use crate::span::{context_snippet, Span};

/// Errors turning a command line into an operation request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty operation request")]
    Empty,

    /// A character that does not fit the request grammar.
    #[error("unexpected '{found}' at position {}, expected {expected}", span.start)]
    UnexpectedChar {
        found: char,
        expected: String,
        span: Span,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// An address with no `:operation` after it.
    #[error("operation name is missing after the address")]
    MissingOperation { span: Span },

    #[error("unterminated quoted string at position {}", span.start)]
    UnterminatedQuote { span: Span },

    #[error("parameter '{name}' is given more than once")]
    DuplicateParameter { name: String, span: Span },
}

impl ParseError {
    /// Get the span associated with this error, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Empty | ParseError::UnexpectedEof { .. } => None,
            ParseError::UnexpectedChar { span, .. }
            | ParseError::MissingOperation { span }
            | ParseError::UnterminatedQuote { span }
            | ParseError::DuplicateParameter { span, .. } => Some(*span),
        }
    }

    /// Snippet of `input` with carets under the error, or `None` if no span.
    pub fn context(&self, input: &str, context_chars: usize) -> Option<String> {
        Some(context_snippet(input, self.span()?, context_chars))
    }
}
