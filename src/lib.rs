//! Parpeg: PEG matcher combinators with speculative tree construction.
//!
//! Grammars are built from [`Matcher`]s: primitives that compare single
//! atoms, and combinators that sequence, choose, repeat and look ahead.
//! Any `fn(&mut C, Span) -> Span` is a matcher too, which is how grammar
//! rules (including recursive ones) are written.
//!
//! Matching threads a [`Context`] through every step. [`TextContext`]
//! only recognizes input. [`TreeContext`] also builds a parse tree of
//! tagged nodes *while* matching: nodes are created as soon as a captured
//! pattern succeeds, and recycled in exact reverse creation order when an
//! enclosing alternative fails. Node storage is a slab [`Arena`] that only
//! ever frees its most recent allocation.
//!
//! ```
//! use parpeg::{Builder, Matcher, Span, TreeContext};
//! use parpeg::matcher::{atom, delimited_list, range, some};
//! use parpeg::tree::capture;
//!
//! let word = capture("word", some(range(b'a', b'z')));
//! let list = capture("list", delimited_list(atom(b'('), word, atom(b','), atom(b')')));
//!
//! let mut ctx = TreeContext::<u8, &str>::new();
//! let input = "(ab,cd)";
//! Builder::default().build().parse_str(&list, &mut ctx, input).unwrap();
//!
//! let list = ctx.roots().next().unwrap();
//! let words: Vec<_> = ctx.children(list).map(|id| ctx.text(id, input.as_bytes())).collect();
//! assert_eq!(words, [b"ab", b"cd"]);
//! ```
//!
//! The optional `samples` feature exposes small complete grammars (nested
//! lists, JSON, a two-stage calculator, Lua long strings) under
//! [`samples`].

pub mod arena;
mod backref;
mod constants;
mod context;
mod error;
pub mod matcher;
mod parser;
mod span;
pub mod tree;

#[cfg(any(test, feature = "samples"))]
pub mod samples;

// Test utilities - only available in test builds
#[cfg(test)]
mod test_util;

pub use arena::{Arena, ArenaId};
pub use backref::{BackrefMark, Backrefs};
pub use constants::{DEFAULT_NONTERMINAL, DEFAULT_SLAB_CAPACITY};
pub use context::{AsciiCaseless, Compare, Context, Natural, TextContext};
pub use error::{Error, Result};
pub use matcher::{Matcher, Ref, RuleFn};
pub use parser::{Builder, Parser};
pub use span::Span;
pub use tree::{
    FrozenNode, Node, NodeId, TreeCheckpoint, TreeConfig, TreeContext, TreeStats,
};
