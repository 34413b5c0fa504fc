// Ordered choice.

use crate::context::Context;
use crate::matcher::Matcher;
use crate::span::Span;

/// See [`one_of`].
#[derive(Debug, Clone, Copy)]
pub struct OneOf<T>(T);

/// Ordered choice over a tuple of alternatives: the first success wins.
///
/// Before each later alternative is tried, the context is rewound to the
/// state it had when the choice started, so nodes or backreferences left
/// behind by a failed alternative are discarded. When every alternative
/// fails the result is the failure that got furthest into the input, which
/// is usually the most useful place to point an error message at.
///
/// Alternatives are never reordered: list longer or more specific
/// alternatives before the ones they share a prefix with.
pub fn one_of<T>(alternatives: T) -> OneOf<T> {
    OneOf(alternatives)
}

macro_rules! impl_one_of {
    ($($m:ident),+) => {
        impl<C: Context, $($m: Matcher<C>),+> Matcher<C> for OneOf<($($m,)+)> {
            #[allow(non_snake_case)]
            fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
                let ($($m,)+) = &self.0;
                let start = ctx.checkpoint();
                let mut failure = span.fail();
                $(
                    let attempt = $m.matches(ctx, span);
                    if attempt.is_valid() {
                        return attempt;
                    }
                    ctx.rewind(span, start);
                    failure = failure.furthest(attempt);
                )+
                failure
            }
        }
    };
}

impl_one_of!(M1);
impl_one_of!(M1, M2);
impl_one_of!(M1, M2, M3);
impl_one_of!(M1, M2, M3, M4);
impl_one_of!(M1, M2, M3, M4, M5);
impl_one_of!(M1, M2, M3, M4, M5, M6);
impl_one_of!(M1, M2, M3, M4, M5, M6, M7);
impl_one_of!(M1, M2, M3, M4, M5, M6, M7, M8);
impl_one_of!(M1, M2, M3, M4, M5, M6, M7, M8, M9);
impl_one_of!(M1, M2, M3, M4, M5, M6, M7, M8, M9, M10);
impl_one_of!(M1, M2, M3, M4, M5, M6, M7, M8, M9, M10, M11);
impl_one_of!(M1, M2, M3, M4, M5, M6, M7, M8, M9, M10, M11, M12);
