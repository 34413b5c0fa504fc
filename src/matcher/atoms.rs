// Single-atom and literal matchers.
//
// All of these look at atoms only through `Context::compare`, so the same
// matcher serves bytes, characters and token kinds.

use crate::context::Context;
use crate::matcher::Matcher;
use crate::span::Span;
use std::cmp::Ordering;

/// See [`atom`].
#[derive(Debug, Clone, Copy)]
pub struct Atom<A>(A);

/// Match exactly `a`.
pub fn atom<A>(a: A) -> Atom<A> {
    Atom(a)
}

impl<C: Context> Matcher<C> for Atom<C::Atom> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        match span.peek() {
            Some(next) if ctx.atoms_equal(next, &self.0) => span.advance(1),
            _ => span.fail(),
        }
    }
}

/// See [`range`].
#[derive(Debug, Clone, Copy)]
pub struct AtomRange<A> {
    lo: A,
    hi: A,
}

/// Match one atom in the inclusive range `lo..=hi`.
///
/// # Panics
///
/// Matching panics if `lo` compares greater than `hi`.
pub fn range<A>(lo: A, hi: A) -> AtomRange<A> {
    AtomRange { lo, hi }
}

#[inline]
fn in_range<C: Context>(ctx: &C, a: &C::Atom, lo: &C::Atom, hi: &C::Atom) -> bool {
    assert!(
        ctx.compare(lo, hi) != Ordering::Greater,
        "empty atom range {lo:?}..={hi:?}"
    );
    ctx.compare(lo, a) != Ordering::Greater && ctx.compare(a, hi) != Ordering::Greater
}

impl<C: Context> Matcher<C> for AtomRange<C::Atom> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        match span.peek() {
            Some(next) if in_range(ctx, next, &self.lo, &self.hi) => span.advance(1),
            _ => span.fail(),
        }
    }
}

/// See [`charset`].
#[derive(Debug, Clone, Copy)]
pub struct Charset<'a, A> {
    set: &'a [A],
}

/// Match one atom that is a member of `set`.
///
/// # Panics
///
/// Panics if `set` is empty.
pub fn charset<A>(set: &[A]) -> Charset<'_, A> {
    assert!(!set.is_empty(), "charset needs at least one atom");
    Charset { set }
}

#[inline]
fn in_set<C: Context>(ctx: &C, a: &C::Atom, set: &[C::Atom]) -> bool {
    set.iter().any(|member| ctx.atoms_equal(a, member))
}

impl<C: Context> Matcher<C> for Charset<'_, C::Atom> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        match span.peek() {
            Some(next) if in_set(ctx, next, self.set) => span.advance(1),
            _ => span.fail(),
        }
    }
}

/// See [`lit`].
#[derive(Debug, Clone, Copy)]
pub struct Lit<'a, A> {
    atoms: &'a [A],
}

/// Match the fixed run `atoms`, failing at the first atom that differs.
///
/// # Panics
///
/// Panics if `atoms` is empty.
pub fn lit<A>(atoms: &[A]) -> Lit<'_, A> {
    assert!(!atoms.is_empty(), "literal needs at least one atom");
    Lit { atoms }
}

impl<C: Context> Matcher<C> for Lit<'_, C::Atom> {
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let mut cursor = span;
        for expected in self.atoms {
            match cursor.peek() {
                Some(next) if ctx.atoms_equal(next, expected) => cursor = cursor.advance(1),
                _ => return cursor.fail(),
            }
        }
        cursor
    }
}

/// See [`any_atom`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyAtom;

/// Match any single atom; fails only at the end of input.
pub fn any_atom() -> AnyAtom {
    AnyAtom
}

impl<C: Context> Matcher<C> for AnyAtom {
    #[inline]
    fn matches<'i>(&self, _ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        match span.peek() {
            Some(_) => span.advance(1),
            None => span.fail(),
        }
    }
}

/// See [`eoi`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Eoi;

/// Succeed, consuming nothing, only at the end of input.
pub fn eoi() -> Eoi {
    Eoi
}

impl<C: Context> Matcher<C> for Eoi {
    #[inline]
    fn matches<'i>(&self, _ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        if span.is_empty() { span } else { span.fail() }
    }
}

/// See [`not_atom`].
#[derive(Debug, Clone, Copy)]
pub struct NotAtom<A>(A);

/// Consume one atom that is anything but `a`.
pub fn not_atom<A>(a: A) -> NotAtom<A> {
    NotAtom(a)
}

impl<C: Context> Matcher<C> for NotAtom<C::Atom> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        match span.peek() {
            Some(next) if !ctx.atoms_equal(next, &self.0) => span.advance(1),
            _ => span.fail(),
        }
    }
}

/// See [`not_charset`].
#[derive(Debug, Clone, Copy)]
pub struct NotCharset<'a, A> {
    set: &'a [A],
}

/// Consume one atom that is not a member of `set`.
///
/// # Panics
///
/// Panics if `set` is empty.
pub fn not_charset<A>(set: &[A]) -> NotCharset<'_, A> {
    assert!(!set.is_empty(), "charset needs at least one atom");
    NotCharset { set }
}

impl<C: Context> Matcher<C> for NotCharset<'_, C::Atom> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        match span.peek() {
            Some(next) if !in_set(ctx, next, self.set) => span.advance(1),
            _ => span.fail(),
        }
    }
}

/// See [`not_range`].
#[derive(Debug, Clone, Copy)]
pub struct NotRange<A> {
    lo: A,
    hi: A,
}

/// Consume one atom outside the inclusive range `lo..=hi`.
pub fn not_range<A>(lo: A, hi: A) -> NotRange<A> {
    NotRange { lo, hi }
}

impl<C: Context> Matcher<C> for NotRange<C::Atom> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        match span.peek() {
            Some(next) if !in_range(ctx, next, &self.lo, &self.hi) => span.advance(1),
            _ => span.fail(),
        }
    }
}
