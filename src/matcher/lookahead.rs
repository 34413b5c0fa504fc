// Zero-width lookahead.

use crate::context::Context;
use crate::matcher::Matcher;
use crate::span::Span;

/// See [`and`].
#[derive(Debug, Clone, Copy)]
pub struct And<M>(M);

/// Succeed without consuming if `inner` would match here.
///
/// Always rewinds: neither input nor anything `inner` recorded (tree
/// nodes, backreferences) is kept.
pub fn and<M>(inner: M) -> And<M> {
    And(inner)
}

impl<C: Context, M: Matcher<C>> Matcher<C> for And<M> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let checkpoint = ctx.checkpoint();
        let probe = self.0.matches(ctx, span);
        ctx.rewind(span, checkpoint);
        if probe.is_valid() { span } else { probe }
    }
}

/// See [`not`].
#[derive(Debug, Clone, Copy)]
pub struct Not<M>(M);

/// Succeed without consuming if `inner` would *not* match here.
pub fn not<M>(inner: M) -> Not<M> {
    Not(inner)
}

impl<C: Context, M: Matcher<C>> Matcher<C> for Not<M> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let checkpoint = ctx.checkpoint();
        let probe = self.0.matches(ctx, span);
        ctx.rewind(span, checkpoint);
        if probe.is_valid() { span.fail() } else { span }
    }
}
