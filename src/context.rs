// Matching contexts
//
// A context is the per-parse mutable state threaded through every matcher:
// the atom comparison capability, the checkpoint/rewind hook used by
// backtracking combinators, and an optional backreference store.
//
// `TextContext` is the plain recognizer. Tree-building contexts live in
// `crate::tree`.

use crate::backref::{BackrefMark, Backrefs};
use crate::span::Span;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::marker::PhantomData;

// ============================================================================
// Atom Comparison
// ============================================================================

/// Three-way comparison of atoms.
///
/// This is the only way matchers look at atoms, which is what lets the same
/// combinators run over bytes, characters, or the token kinds produced by
/// an earlier lexing pass.
pub trait Compare<A> {
    fn compare(&self, a: &A, b: &A) -> Ordering;
}

/// Compare atoms by their `Ord` implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<A: Ord> Compare<A> for Natural {
    #[inline]
    fn compare(&self, a: &A, b: &A) -> Ordering {
        a.cmp(b)
    }
}

/// Compare bytes or characters ignoring ASCII case.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AsciiCaseless;

impl Compare<u8> for AsciiCaseless {
    #[inline]
    fn compare(&self, a: &u8, b: &u8) -> Ordering {
        a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
    }
}

impl Compare<char> for AsciiCaseless {
    #[inline]
    fn compare(&self, a: &char, b: &char) -> Ordering {
        a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
    }
}

// ============================================================================
// Context Trait
// ============================================================================

/// Per-parse state shared by all matchers of one top-level match.
///
/// A context is exclusively owned by one in-flight parse. Concurrent parses
/// each need their own context.
pub trait Context {
    /// The unit of input.
    type Atom: Copy + Debug;

    /// Everything [`rewind`](Context::rewind) needs to restore.
    type Checkpoint: Copy;

    /// Three-way compare two atoms.
    fn compare(&self, a: &Self::Atom, b: &Self::Atom) -> Ordering;

    /// Record the current speculative state.
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Discard everything recorded since `to`.
    ///
    /// Called by the combinators that are allowed to backtrack (`one_of`,
    /// `opt`, `any`, `and`, `not`, ...) whenever they abandon an attempt
    /// that started at `span`.
    fn rewind(&mut self, span: Span<'_, Self::Atom>, to: Self::Checkpoint);

    /// Clear all per-parse state so the context can be reused.
    fn reset(&mut self);

    /// The backreference store, if this context keeps one.
    fn backrefs(&mut self) -> Option<&mut Backrefs> {
        None
    }

    #[inline]
    fn atoms_equal(&self, a: &Self::Atom, b: &Self::Atom) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

// ============================================================================
// Text Context
// ============================================================================

/// A recognizing context: matches input without building a tree.
///
/// Rewinding only restores the backreference store.
pub struct TextContext<A, Cm = Natural> {
    compare: Cm,
    backrefs: Backrefs,
    _atom: PhantomData<fn(&A)>,
}

impl<A, Cm: Default> TextContext<A, Cm> {
    pub fn new() -> Self {
        Self::with_compare(Cm::default())
    }
}

impl<A, Cm: Default> Default for TextContext<A, Cm> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, Cm> TextContext<A, Cm> {
    /// Create a context that compares atoms with `compare`.
    pub fn with_compare(compare: Cm) -> Self {
        Self {
            compare,
            backrefs: Backrefs::default(),
            _atom: PhantomData,
        }
    }
}

impl<A, Cm> Context for TextContext<A, Cm>
where
    A: Copy + Debug,
    Cm: Compare<A>,
{
    type Atom = A;
    type Checkpoint = BackrefMark;

    #[inline]
    fn compare(&self, a: &A, b: &A) -> Ordering {
        self.compare.compare(a, b)
    }

    #[inline]
    fn checkpoint(&self) -> BackrefMark {
        self.backrefs.mark()
    }

    #[inline]
    fn rewind(&mut self, _span: Span<'_, A>, to: BackrefMark) {
        self.backrefs.restore(to);
    }

    fn reset(&mut self) {
        self.backrefs.clear();
    }

    #[inline]
    fn backrefs(&mut self) -> Option<&mut Backrefs> {
        Some(&mut self.backrefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_compare_orders_atoms() {
        assert_eq!(Natural.compare(&b'a', &b'b'), Ordering::Less);
        assert_eq!(Natural.compare(&'z', &'z'), Ordering::Equal);
    }

    #[test]
    fn caseless_compare_folds_ascii_only() {
        assert_eq!(AsciiCaseless.compare(&b'A', &b'a'), Ordering::Equal);
        assert_eq!(AsciiCaseless.compare(&'Q', &'q'), Ordering::Equal);
        assert_ne!(AsciiCaseless.compare(&'Ä', &'ä'), Ordering::Equal);
    }

    #[test]
    fn text_context_rewind_restores_backrefs() {
        let mut ctx: TextContext<u8> = TextContext::new();
        let span = Span::from("abcd");
        let mark = ctx.checkpoint();
        if let Some(store) = ctx.backrefs() {
            store.store("k", 0..2);
        }
        assert!(ctx.backrefs.get("k").is_some());
        ctx.rewind(span, mark);
        assert!(ctx.backrefs.get("k").is_none());
    }

    #[test]
    fn reset_clears_backrefs() {
        let mut ctx: TextContext<char, AsciiCaseless> = TextContext::default();
        ctx.backrefs.store("k", 0..1);
        ctx.reset();
        assert!(ctx.backrefs.is_empty());
    }
}
