//! Small complete grammars built on the engine.
//!
//! These are exercised by the crate's tests and benchmarks and double as
//! worked examples:
//!
//! - [`list`]: nested comma-separated lists of words, with a serializer that
//!   reproduces the input from the tree.
//! - [`json`]: strict JSON over bytes, decoded into a [`json::Value`].
//! - [`calc`]: arithmetic in two stages, lexing bytes into tokens and then
//!   parsing the token kinds; postfix operators use bookmark capture.
//! - [`longstring`]: Lua long-bracket strings, matched with backreferences.

pub mod calc;
pub mod json;
pub mod list;
pub mod longstring;
