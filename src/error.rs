// Error types for the parser driver.
//
// Matchers never produce these: inside a grammar, failure is an invalid
// span. `Parser` converts the outcome of a whole-input match into an
// `Error` at the boundary.

use std::ops::Range;

/// Top-level error type for driven parses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The top-level matcher failed.
    ///
    /// `span` starts at the furthest offset any alternative reached, which
    /// is usually the most useful place to point at.
    #[error("syntax error in {nonterminal} at {span:?}: {message}")]
    Syntax {
        /// Source location of the failure.
        span: Range<usize>,
        /// The rule the driver was asked to match.
        nonterminal: &'static str,
        /// Human-readable description of the error.
        message: String,
    },

    /// The input matched, but the driver requires the whole input to be
    /// consumed and some is left over.
    #[error("unexpected trailing input at {span:?}")]
    TrailingInput {
        /// The unconsumed remainder.
        span: Range<usize>,
    },
}

impl Error {
    /// Construct a syntax error.
    #[must_use]
    pub fn syntax(
        span: Range<usize>,
        nonterminal: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Error::Syntax {
            span,
            nonterminal,
            message: message.into(),
        }
    }

    /// Construct a trailing-input error.
    #[must_use]
    pub fn trailing_input(span: Range<usize>) -> Self {
        Error::TrailingInput { span }
    }

    /// Source location of the error.
    pub fn span(&self) -> Range<usize> {
        match self {
            Error::Syntax { span, .. } | Error::TrailingInput { span } => span.clone(),
        }
    }

    /// The offset the error points at.
    #[inline]
    pub fn offset(&self) -> usize {
        self.span().start
    }

    /// One-based line and column of the error in `source`.
    ///
    /// Columns count bytes; a `\n` ends a line.
    pub fn line_col(&self, source: &[u8]) -> (usize, usize) {
        let offset = self.offset().min(source.len());
        let before = &source[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = match before.iter().rposition(|&b| b == b'\n') {
            Some(newline) => offset - newline,
            None => offset + 1,
        };
        (line, column)
    }
}

/// Result type alias for driven parses.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_cases {
        ($($name:ident: $test:expr),* $(,)?) => {
            $(
                #[test]
                fn $name() {
                    $test
                }
            )*
        };
    }

    test_cases! {
        test_error_display: {
            let err = Error::syntax(5..10, "<value>", "unexpected end of input");
            let display = format!("{err}");
            assert!(display.contains("<value>"));
            assert!(display.contains("5..10"));
            assert!(display.contains("unexpected end of input"));
        },

        test_trailing_input_span: {
            let err = Error::trailing_input(3..7);
            assert_eq!(err.offset(), 3);
            assert_eq!(err.span(), 3..7);
            assert!(format!("{err}").contains("trailing input"));
        },

        test_line_col_first_line: {
            let err = Error::syntax(2..3, "<x>", "bad");
            assert_eq!(err.line_col(b"abcdef"), (1, 3));
        },

        test_line_col_after_newlines: {
            let err = Error::syntax(6..7, "<x>", "bad");
            assert_eq!(err.line_col(b"ab\ncd\nef"), (3, 1));
            let err = Error::syntax(4..5, "<x>", "bad");
            assert_eq!(err.line_col(b"ab\ncd\nef"), (2, 2));
        },

        test_line_col_clamps_to_source: {
            let err = Error::trailing_input(99..100);
            assert_eq!(err.line_col(b"a\nb"), (2, 2));
        },
    }
}
