// Parser configuration and driver
//
// Grammars are ordinary matchers and can always be run by hand. The driver
// is the convenience layer on top: it resets the context, runs the
// top-level matcher over the whole input, enforces full consumption if
// asked to, and turns a failed span into an `Error`.

use crate::constants::DEFAULT_NONTERMINAL;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::matcher::Matcher;
use crate::span::Span;

// ============================================================================
// Configuration Builder
// ============================================================================

/// Configuration builder for [`Parser`].
///
/// # Examples
///
/// Simple usage with defaults:
/// ```
/// use parpeg::Builder;
///
/// let parser = Builder::default().build();
/// ```
///
/// With custom configuration:
/// ```
/// use parpeg::Builder;
///
/// let parser = Builder::default()
///     .require_full_match(false)
///     .nonterminal("<json>")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    /// Fail with [`Error::TrailingInput`] unless the matcher consumes the
    /// whole input (default: true).
    require_full_match: bool,

    /// Rule name reported in [`Error::Syntax`] (default: `<input>`).
    nonterminal: &'static str,

    /// Reset the context before each parse (default: true).
    ///
    /// Turning this off lets a caller chain several parses into one tree.
    reset_context: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            require_full_match: true,
            nonterminal: DEFAULT_NONTERMINAL,
            reset_context: true,
        }
    }
}

impl Builder {
    /// Require the matcher to consume the whole input.
    #[must_use]
    pub fn require_full_match(mut self, required: bool) -> Self {
        self.require_full_match = required;
        self
    }

    /// Set the rule name used in syntax errors.
    #[must_use]
    pub fn nonterminal(mut self, name: &'static str) -> Self {
        self.nonterminal = name;
        self
    }

    /// Reset the context before each parse.
    #[must_use]
    pub fn reset_context(mut self, reset: bool) -> Self {
        self.reset_context = reset;
        self
    }

    /// Build a parser driver with this configuration.
    ///
    /// The driver holds no per-parse state and can be reused freely.
    #[must_use]
    pub fn build(self) -> Parser {
        Parser { config: self }
    }
}

// ============================================================================
// Parser Driver
// ============================================================================

/// Runs a top-level matcher over complete inputs.
///
/// # Examples
///
/// ```
/// use parpeg::{Builder, Error, TextContext};
/// use parpeg::matcher::{range, some};
///
/// let parser = Builder::default().nonterminal("<digits>").build();
/// let mut ctx = TextContext::<u8>::new();
/// let digits = some(range(b'0', b'9'));
///
/// assert!(parser.parse_str(&digits, &mut ctx, "2024").is_ok());
/// assert!(matches!(
///     parser.parse_str(&digits, &mut ctx, "20x4"),
///     Err(Error::TrailingInput { .. })
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    config: Builder,
}

impl Default for Parser {
    fn default() -> Self {
        Builder::default().build()
    }
}

impl Parser {
    /// Match `matcher` against `input` and return the span after the match.
    ///
    /// The offending atom in a syntax error is shown with its `Debug`
    /// form; byte grammars read better through [`parse_bytes`](Self::parse_bytes).
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] when the matcher fails, pointing at the furthest
    /// failure; [`Error::TrailingInput`] when full consumption is required
    /// and input remains.
    pub fn parse<'i, C, M>(
        &self,
        matcher: &M,
        ctx: &mut C,
        input: &'i [C::Atom],
    ) -> Result<Span<'i, C::Atom>>
    where
        C: Context,
        M: Matcher<C>,
    {
        self.run(matcher, ctx, input, |atom| format!("{atom:?}"))
    }

    /// [`parse`](Self::parse) over bytes, showing an offending byte as a
    /// byte literal such as `b'x'` or `b'\n'`.
    ///
    /// # Errors
    ///
    /// As for [`parse`](Self::parse).
    pub fn parse_bytes<'i, C, M>(
        &self,
        matcher: &M,
        ctx: &mut C,
        input: &'i [u8],
    ) -> Result<Span<'i, u8>>
    where
        C: Context<Atom = u8>,
        M: Matcher<C>,
    {
        self.run(matcher, ctx, input, |byte| format!("b'{}'", byte.escape_ascii()))
    }

    /// [`parse_bytes`](Self::parse_bytes) over the bytes of `input`.
    ///
    /// # Errors
    ///
    /// As for [`parse`](Self::parse).
    pub fn parse_str<'i, C, M>(
        &self,
        matcher: &M,
        ctx: &mut C,
        input: &'i str,
    ) -> Result<Span<'i, u8>>
    where
        C: Context<Atom = u8>,
        M: Matcher<C>,
    {
        self.parse_bytes(matcher, ctx, input.as_bytes())
    }

    fn run<'i, C, M>(
        &self,
        matcher: &M,
        ctx: &mut C,
        input: &'i [C::Atom],
        describe: impl Fn(&C::Atom) -> String,
    ) -> Result<Span<'i, C::Atom>>
    where
        C: Context,
        M: Matcher<C>,
    {
        if self.config.reset_context {
            ctx.reset();
        }

        let end = matcher.matches(ctx, Span::new(input));
        let Some(consumed) = end.cursor() else {
            let at = end.position();
            let message = match input.get(at) {
                Some(atom) => format!("unexpected {}", describe(atom)),
                None => "unexpected end of input".to_string(),
            };
            tracing::debug!(
                nonterminal = self.config.nonterminal,
                offset = at,
                len = input.len(),
                "parse failed"
            );
            let stop = if at < input.len() { at + 1 } else { at };
            return Err(Error::syntax(at..stop, self.config.nonterminal, message));
        };

        tracing::debug!(
            nonterminal = self.config.nonterminal,
            consumed,
            len = input.len(),
            "parse matched"
        );
        if self.config.require_full_match && consumed < input.len() {
            return Err(Error::trailing_input(consumed..input.len()));
        }
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TextContext;
    use crate::matcher::{atom, seq};

    struct TestCase {
        input: &'static str,
        full: bool,
        expected: std::result::Result<usize, Error>,
    }

    #[test]
    fn test_parse_outcomes() {
        let ab = seq((atom(b'a'), atom(b'b')));
        let cases = [
            TestCase {
                input: "ab",
                full: true,
                expected: Ok(2),
            },
            TestCase {
                input: "abc",
                full: false,
                expected: Ok(2),
            },
            TestCase {
                input: "abc",
                full: true,
                expected: Err(Error::trailing_input(2..3)),
            },
            TestCase {
                input: "ax",
                full: true,
                expected: Err(Error::syntax(1..2, "<ab>", "unexpected b'x'")),
            },
            TestCase {
                input: "a",
                full: true,
                expected: Err(Error::syntax(1..1, "<ab>", "unexpected end of input")),
            },
        ];

        let mut ctx = TextContext::<u8>::new();
        for case in cases {
            let parser = Builder::default()
                .require_full_match(case.full)
                .nonterminal("<ab>")
                .build();
            let result = parser
                .parse_str(&ab, &mut ctx, case.input)
                .map(|end| end.position());
            assert_eq!(result, case.expected, "input: {:?}", case.input);
        }
    }

    #[test]
    fn test_offending_atom_rendering() {
        let parser = Parser::default();
        let mut ctx = TextContext::<u8>::new();
        let newline = parser.parse_bytes(&atom(b'a'), &mut ctx, b"\n").unwrap_err();
        assert_eq!(newline, Error::syntax(0..1, "<input>", "unexpected b'\\n'"));
        let high = parser.parse_bytes(&atom(b'a'), &mut ctx, &[0xff]).unwrap_err();
        assert_eq!(high, Error::syntax(0..1, "<input>", "unexpected b'\\xff'"));

        // Other atom types keep their Debug form.
        let mut chars = TextContext::<char>::new();
        let err = parser.parse(&atom('a'), &mut chars, &['b']).unwrap_err();
        assert_eq!(err, Error::syntax(0..1, "<input>", "unexpected 'b'"));
    }

    #[test]
    fn test_default_nonterminal() {
        let parser = Parser::default();
        let mut ctx = TextContext::<u8>::new();
        let err = parser.parse_str(&atom(b'a'), &mut ctx, "b").unwrap_err();
        assert!(matches!(err, Error::Syntax { nonterminal: "<input>", .. }));
    }
}
