// Repetition and optional matching.
//
// All repetitions here are PEG repetitions: greedy and non-backtracking.
// Once a repetition stops it never hands atoms back to a later step.

use crate::context::Context;
use crate::matcher::Matcher;
use crate::span::Span;

/// One speculative attempt: `Ok(next)` when `inner` matched, `Err(failure)`
/// with the context rewound when it did not.
#[inline]
fn step<'i, C: Context, M: Matcher<C>>(
    inner: &M,
    ctx: &mut C,
    span: Span<'i, C::Atom>,
) -> Result<Span<'i, C::Atom>, Span<'i, C::Atom>> {
    let checkpoint = ctx.checkpoint();
    let next = inner.matches(ctx, span);
    if !next.is_valid() {
        ctx.rewind(span, checkpoint);
        return Err(next);
    }
    Ok(next)
}

/// See [`any`].
#[derive(Debug, Clone, Copy)]
pub struct Any<M>(M);

/// Zero or more repetitions of `inner`. Never fails.
///
/// Greedy and non-backtracking: `seq((any(atom(b'a')), atom(b'a')))` can
/// never match, because `any` has already eaten every `a`. A repetition
/// that matches without consuming ends the loop.
pub fn any<M>(inner: M) -> Any<M> {
    Any(inner)
}

fn greedy<'i, C: Context, M: Matcher<C>>(
    inner: &M,
    ctx: &mut C,
    span: Span<'i, C::Atom>,
) -> Span<'i, C::Atom> {
    let mut span = span;
    while let Ok(next) = step(inner, ctx, span) {
        if next.cursor() == span.cursor() {
            return next;
        }
        span = next;
    }
    span
}

impl<C: Context, M: Matcher<C>> Matcher<C> for Any<M> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        greedy(&self.0, ctx, span)
    }
}

/// See [`some`].
#[derive(Debug, Clone, Copy)]
pub struct OneOrMore<M>(M);

/// One or more repetitions of `inner`; greedy like [`any`].
pub fn some<M>(inner: M) -> OneOrMore<M> {
    OneOrMore(inner)
}

impl<C: Context, M: Matcher<C>> Matcher<C> for OneOrMore<M> {
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let first = self.0.matches(ctx, span);
        if !first.is_valid() || first.cursor() == span.cursor() {
            return first;
        }
        greedy(&self.0, ctx, first)
    }
}

/// See [`opt`].
#[derive(Debug, Clone, Copy)]
pub struct Opt<M>(M);

/// `inner`, or succeed without consuming anything.
pub fn opt<M>(inner: M) -> Opt<M> {
    Opt(inner)
}

impl<C: Context, M: Matcher<C>> Matcher<C> for Opt<M> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        step(&self.0, ctx, span).unwrap_or(span)
    }
}

/// See [`rep`].
#[derive(Debug, Clone, Copy)]
pub struct Rep<const N: usize, M>(M);

/// Exactly `N` repetitions of `inner`.
///
/// Fails like a sequence would: at the repetition that did not match,
/// without rewinding the repetitions that did.
pub fn rep<const N: usize, M>(inner: M) -> Rep<N, M> {
    Rep(inner)
}

impl<C: Context, M: Matcher<C>, const N: usize> Matcher<C> for Rep<N, M> {
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let mut span = span;
        for _ in 0..N {
            span = self.0.matches(ctx, span);
            if !span.is_valid() {
                break;
            }
        }
        span
    }
}

/// See [`rep_range`].
#[derive(Debug, Clone, Copy)]
pub struct RepRange<const MIN: usize, const MAX: usize, M>(M);

/// Between `MIN` and `MAX` repetitions of `inner`, taking as many as
/// possible.
///
/// Fails if fewer than `MIN` repetitions match. A zero-width repetition
/// satisfies all remaining repetitions at once.
pub fn rep_range<const MIN: usize, const MAX: usize, M>(inner: M) -> RepRange<MIN, MAX, M> {
    const { assert!(MIN <= MAX, "rep_range needs MIN <= MAX") };
    RepRange(inner)
}

impl<C: Context, M: Matcher<C>, const MIN: usize, const MAX: usize> Matcher<C>
    for RepRange<MIN, MAX, M>
{
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let mut span = span;
        for count in 0..MAX {
            if count < MIN {
                let next = self.0.matches(ctx, span);
                if !next.is_valid() || next.cursor() == span.cursor() {
                    return next;
                }
                span = next;
                continue;
            }
            match step(&self.0, ctx, span) {
                Ok(next) if next.cursor() == span.cursor() => return next,
                Ok(next) => span = next,
                Err(_) => break,
            }
        }
        span
    }
}

/// See [`until`].
#[derive(Debug, Clone, Copy)]
pub struct Until<M>(M);

/// Consume atoms one at a time until `terminator` would match.
///
/// The terminator itself is only looked at, never consumed, and anything it
/// recorded in the context is rewound. Running out of input before the
/// terminator matches is a failure at the end of input.
pub fn until<M>(terminator: M) -> Until<M> {
    Until(terminator)
}

impl<C: Context, M: Matcher<C>> Matcher<C> for Until<M> {
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let mut span = span;
        loop {
            let checkpoint = ctx.checkpoint();
            let probe = self.0.matches(ctx, span);
            ctx.rewind(span, checkpoint);
            if probe.is_valid() {
                return span;
            }
            if span.peek().is_none() {
                return span.fail();
            }
            span = span.advance(1);
        }
    }
}
