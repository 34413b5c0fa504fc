//! The combinator engine.
//!
//! Every primitive, every composite combinator, and every grammar rule
//! implements the same contract, [`Matcher::matches`]: take a context and
//! a valid span, return the span after the consumed atoms or a failed span
//! carrying the failure offset. That single signature is what makes
//! arbitrary composition possible.
//!
//! Grammar rules are plain functions:
//!
//! ```
//! use parpeg::{Context, Matcher, Span, TextContext};
//! use parpeg::matcher::{atom, one_of, range, seq, some};
//!
//! // value := digit+ | '(' value ')'
//! fn value<'i, C: Context<Atom = u8>>(ctx: &mut C, span: Span<'i, u8>) -> Span<'i, u8> {
//!     one_of((
//!         some(range(b'0', b'9')),
//!         seq((atom(b'('), value::<C>, atom(b')'))),
//!     ))
//!     .matches(ctx, span)
//! }
//!
//! let mut ctx = TextContext::<u8>::new();
//! let rest = value(&mut ctx, Span::from("((42))x"));
//! assert_eq!(rest.remaining(), b"x");
//! ```
//!
//! # Greedy repetition is not regex repetition
//!
//! [`any`], [`some`], [`rep_range`] and friends are PEG repetitions: they
//! take as many repetitions as they can and never give any back. So
//! `seq((any(atom(b'a')), atom(b'a')))` matches *no* input, unlike the
//! regex `a*a`. Write `some(seq((atom(b'a'), and(atom(b'a')))))` style
//! lookaheads instead when the tail must be left for a later step.

use crate::context::Context;
use crate::span::Span;

mod atoms;
mod choice;
mod delimited;
mod lookahead;
mod repeat;
mod sequence;

pub use crate::backref::{MatchBackref, StoreBackref, match_backref, store_backref};
pub use atoms::{
    AnyAtom, Atom, AtomRange, Charset, Eoi, Lit, NotAtom, NotCharset, NotRange, any_atom, atom,
    charset, eoi, lit, not_atom, not_charset, not_range, range,
};
pub use choice::{OneOf, one_of};
pub use delimited::{DelimitedBlock, DelimitedList, delimited_block, delimited_list};
pub use lookahead::{And, Not, and, not};
pub use repeat::{
    Any, OneOrMore, Opt, Rep, RepRange, Until, any, opt, rep, rep_range, some, until,
};
pub use sequence::{NotEmpty, Seq, SeqOpt, not_empty, seq, seq_opt};

/// The uniform matching contract.
pub trait Matcher<C: Context> {
    /// Match at the cursor of `span` (which must be valid).
    ///
    /// On success the returned span's cursor has advanced past the consumed
    /// atoms and its limit is unchanged. On failure the returned span is
    /// invalid and records where the failure was detected.
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom>;
}

impl<C, F> Matcher<C> for F
where
    C: Context,
    F: for<'i> Fn(&mut C, Span<'i, C::Atom>) -> Span<'i, C::Atom>,
{
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        self(ctx, span)
    }
}

/// The signature of a named grammar rule.
pub type RuleFn<C> =
    for<'i> fn(&mut C, Span<'i, <C as Context>::Atom>) -> Span<'i, <C as Context>::Atom>;

/// One level of indirection to a separately named rule.
///
/// Any `fn` item with the [`RuleFn`] signature is already a matcher; `Ref`
/// exists for the places where a rule has to be stored as a value (rule
/// tables, forward references chosen at runtime).
pub struct Ref<C: Context>(pub RuleFn<C>);

impl<C: Context> Clone for Ref<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Context> Copy for Ref<C> {}

impl<C: Context> Matcher<C> for Ref<C> {
    #[inline]
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        (self.0)(ctx, span)
    }
}
