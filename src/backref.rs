// Backreferences
//
// A backreference records the exact atoms a sub-pattern consumed, under a
// name, so that a later part of the same grammar can demand a literal
// repeat of them (for example the `==` in a `[==[ ... ]==]` long string).
//
// The store lives in the context, never in process-wide state. It is a
// stack: a later store under the same name shadows the earlier one, and
// rewinding pops every entry recorded since the checkpoint.

use crate::context::Context;
use crate::matcher::Matcher;
use crate::span::Span;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: &'static str,
    range: Range<usize>,
}

/// Per-context stack of named captures.
#[derive(Debug, Default, Clone)]
pub struct Backrefs {
    entries: Vec<Entry>,
}

/// A position in a [`Backrefs`] stack, restored on rewind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackrefMark(usize);

impl Backrefs {
    #[inline]
    pub fn mark(&self) -> BackrefMark {
        BackrefMark(self.entries.len())
    }

    /// Drop every entry stored after `mark`.
    #[inline]
    pub fn restore(&mut self, mark: BackrefMark) {
        self.entries.truncate(mark.0);
    }

    /// Record `range` (absolute offsets into the input) under `name`.
    pub fn store(&mut self, name: &'static str, range: Range<usize>) {
        self.entries.push(Entry { name, range });
    }

    /// The most recent range stored under `name`.
    pub fn get(&self, name: &str) -> Option<Range<usize>> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.name == name)
            .map(|entry| entry.range.clone())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Matchers
// ============================================================================

/// See [`store_backref`].
#[derive(Debug, Clone, Copy)]
pub struct StoreBackref<M> {
    name: &'static str,
    inner: M,
}

/// Match `inner` and remember what it consumed under `name`.
///
/// # Panics
///
/// Matching panics if the context keeps no backreference store.
pub fn store_backref<M>(name: &'static str, inner: M) -> StoreBackref<M> {
    StoreBackref { name, inner }
}

impl<C: Context, M: Matcher<C>> Matcher<C> for StoreBackref<M> {
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let end = self.inner.matches(ctx, span);
        if let (Some(from), Some(to)) = (span.cursor(), end.cursor()) {
            let Some(store) = ctx.backrefs() else {
                panic!(
                    "backreference `{}` stored on a context without a backreference store",
                    self.name
                );
            };
            store.store(self.name, from..to);
        }
        end
    }
}

/// See [`match_backref`].
#[derive(Debug, Clone, Copy)]
pub struct MatchBackref {
    name: &'static str,
}

/// Require a literal repeat of the atoms last stored under `name`.
///
/// Fails at the first atom that differs from the stored text.
///
/// # Panics
///
/// Matching panics if nothing was stored under `name`; that is a grammar
/// bug, not a parse failure.
pub fn match_backref(name: &'static str) -> MatchBackref {
    MatchBackref { name }
}

impl<C: Context> Matcher<C> for MatchBackref {
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let stored = ctx.backrefs().and_then(|store| store.get(self.name));
        let Some(stored) = stored else {
            panic!("backreference `{}` matched before it was stored", self.name);
        };

        let source = span.source();
        let mut cursor = span;
        for expected in &source[stored] {
            match cursor.peek() {
                Some(actual) if ctx.atoms_equal(actual, expected) => cursor = cursor.advance(1),
                _ => return cursor.fail(),
            }
        }
        cursor
    }
}
