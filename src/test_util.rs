// Helpers shared by the unit tests.

use crate::context::TextContext;
use crate::matcher::Matcher;
use crate::span::Span;

pub(crate) type Text = TextContext<u8>;

/// What a match left behind: the unconsumed text, or the failure offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome<'a> {
    Rest(&'a str),
    FailAt(usize),
}

/// Run `matcher` over `input` with a fresh [`Text`] context.
pub(crate) fn run<M: Matcher<Text>>(matcher: M, input: &str) -> Outcome<'_> {
    let mut ctx = Text::new();
    outcome(input, matcher.matches(&mut ctx, Span::from(input)))
}

#[expect(clippy::string_slice, reason = "test inputs are ASCII")]
pub(crate) fn outcome<'a>(input: &'a str, span: Span<'_, u8>) -> Outcome<'a> {
    match span.cursor() {
        Some(at) => Outcome::Rest(&input[at..]),
        None => Outcome::FailAt(span.position()),
    }
}
