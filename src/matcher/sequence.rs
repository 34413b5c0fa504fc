// Sequencing combinators.

use crate::context::Context;
use crate::matcher::Matcher;
use crate::span::Span;

/// See [`seq`].
#[derive(Debug, Clone, Copy)]
pub struct Seq<T>(T);

/// Match a tuple of matchers one after another.
///
/// The first failure is returned immediately. `seq` never rewinds: state
/// created by the steps that did match (tree nodes, backreferences) stays
/// until an enclosing backtracking combinator discards it.
pub fn seq<T>(steps: T) -> Seq<T> {
    Seq(steps)
}

/// See [`seq_opt`].
#[derive(Debug, Clone, Copy)]
pub struct SeqOpt<T>(T);

/// A sequence whose steps are each optional, but only as a prefix: a step
/// is attempted only when every earlier step matched.
///
/// `seq_opt((a, b, c))` accepts `abc`, `ab`, `a` and the empty input, and
/// on `bc` succeeds without consuming anything. Wrap it in [`not_empty`]
/// when at least the first step is required.
pub fn seq_opt<T>(steps: T) -> SeqOpt<T> {
    SeqOpt(steps)
}

macro_rules! impl_sequences {
    ($($m:ident),+) => {
        impl<C: Context, $($m: Matcher<C>),+> Matcher<C> for Seq<($($m,)+)> {
            #[allow(non_snake_case)]
            #[inline]
            fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
                let ($($m,)+) = &self.0;
                let mut span = span;
                $(
                    span = $m.matches(ctx, span);
                    if !span.is_valid() {
                        return span;
                    }
                )+
                span
            }
        }

        impl<C: Context, $($m: Matcher<C>),+> Matcher<C> for SeqOpt<($($m,)+)> {
            #[allow(non_snake_case)]
            fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
                let ($($m,)+) = &self.0;
                let mut span = span;
                $(
                    let checkpoint = ctx.checkpoint();
                    let next = $m.matches(ctx, span);
                    if !next.is_valid() {
                        ctx.rewind(span, checkpoint);
                        return span;
                    }
                    span = next;
                )+
                span
            }
        }
    };
}

impl_sequences!(M1);
impl_sequences!(M1, M2);
impl_sequences!(M1, M2, M3);
impl_sequences!(M1, M2, M3, M4);
impl_sequences!(M1, M2, M3, M4, M5);
impl_sequences!(M1, M2, M3, M4, M5, M6);
impl_sequences!(M1, M2, M3, M4, M5, M6, M7);
impl_sequences!(M1, M2, M3, M4, M5, M6, M7, M8);
impl_sequences!(M1, M2, M3, M4, M5, M6, M7, M8, M9);
impl_sequences!(M1, M2, M3, M4, M5, M6, M7, M8, M9, M10);
impl_sequences!(M1, M2, M3, M4, M5, M6, M7, M8, M9, M10, M11);
impl_sequences!(M1, M2, M3, M4, M5, M6, M7, M8, M9, M10, M11, M12);

/// See [`not_empty`].
#[derive(Debug, Clone, Copy)]
pub struct NotEmpty<M>(M);

/// Turn a zero-width success of `inner` into a failure at the start.
pub fn not_empty<M>(inner: M) -> NotEmpty<M> {
    NotEmpty(inner)
}

impl<C: Context, M: Matcher<C>> Matcher<C> for NotEmpty<M> {
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let checkpoint = ctx.checkpoint();
        let next = self.0.matches(ctx, span);
        if next.is_valid() && next.cursor() == span.cursor() {
            ctx.rewind(span, checkpoint);
            return span.fail();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{atom, opt};
    use crate::test_util::{Outcome, run};

    #[test]
    fn seq_fails_where_the_failing_step_was_attempted() {
        let ab = seq((atom(b'a'), atom(b'b')));
        assert_eq!(run(ab, "abc"), Outcome::Rest("c"));
        assert_eq!(run(ab, "acd"), Outcome::FailAt(1));
        assert_eq!(run(ab, "xcd"), Outcome::FailAt(0));
    }

    #[test]
    fn seq_opt_accepts_prefixes_only() {
        let abc = seq_opt((atom(b'a'), atom(b'b'), atom(b'c')));
        assert_eq!(run(abc, "abc!"), Outcome::Rest("!"));
        assert_eq!(run(abc, "ab!"), Outcome::Rest("!"));
        assert_eq!(run(abc, "a!"), Outcome::Rest("!"));
        assert_eq!(run(abc, "ac"), Outcome::Rest("c"));
        assert_eq!(run(abc, "bc"), Outcome::Rest("bc"));
    }

    #[test]
    fn not_empty_rejects_zero_width_success() {
        let abc = not_empty(seq_opt((atom(b'a'), atom(b'b'), atom(b'c'))));
        assert_eq!(run(abc, "ab"), Outcome::Rest(""));
        assert_eq!(run(abc, "bc"), Outcome::FailAt(0));

        let optional = not_empty(seq((opt(atom(b'x')), opt(atom(b'y')))));
        assert_eq!(run(optional, "y"), Outcome::Rest(""));
        assert_eq!(run(optional, "z"), Outcome::FailAt(0));
    }
}
