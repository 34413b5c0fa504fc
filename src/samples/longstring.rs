// Lua long-bracket strings: `[[...]]`, `[==[...]==]`.
//
// The closing bracket must repeat the opening level, which a plain PEG
// cannot express; a backreference carries the level across.

use crate::context::{Context, TextContext};
use crate::error::Result;
use crate::matcher::{
    Matcher, any, atom, match_backref, one_of, opt, range, seq, some, store_backref, until,
};
use crate::parser::Builder;
use crate::span::Span;

const LEVEL: &str = "level";

fn close<'i, C: Context<Atom = u8>>(ctx: &mut C, span: Span<'i, u8>) -> Span<'i, u8> {
    seq((atom(b']'), match_backref(LEVEL), atom(b']'))).matches(ctx, span)
}

/// `long_string := '[' '='* '[' (!close .)* close`, where `close` repeats
/// the opening run of `=`.
///
/// Works with any byte context that keeps a backreference store.
pub fn long_string<'i, C: Context<Atom = u8>>(ctx: &mut C, span: Span<'i, u8>) -> Span<'i, u8> {
    seq((
        atom(b'['),
        store_backref(LEVEL, any(atom(b'='))),
        atom(b'['),
        until(close::<C>),
        close::<C>,
    ))
    .matches(ctx, span)
}

/// Parse one long string and return its contents.
///
/// As in Lua, a newline directly after the opening bracket is not part of
/// the contents.
///
/// # Errors
///
/// Returns a syntax error for an unterminated or malformed string and a
/// trailing-input error when anything follows the closing bracket.
pub fn parse(input: &str) -> Result<&str> {
    let mut ctx = TextContext::<u8>::new();
    Builder::default()
        .nonterminal("<long-string>")
        .build()
        .parse_str(&long_string::<TextContext<u8>>, &mut ctx, input)?;

    let level = input.bytes().skip(1).take_while(|&b| b == b'=').count();
    let bracket = level + 2;
    let body = input
        .get(bracket..input.len() - bracket)
        .unwrap_or_default();
    Ok(strip_leading_newline(body))
}

fn strip_leading_newline(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}

/// A sequence of long strings separated by commas, e.g. `[[a]],[=[b]=]`.
///
/// Each string stores its own level; a later level shadows the earlier one
/// and is discarded again if its string fails to match.
pub fn long_string_list<'i, C: Context<Atom = u8>>(
    ctx: &mut C,
    span: Span<'i, u8>,
) -> Span<'i, u8> {
    seq((
        long_string::<C>,
        any(seq((atom(b','), long_string::<C>))),
        opt(atom(b',')),
    ))
    .matches(ctx, span)
}

/// Either a long string or a plain `[`-free word, for mixing long strings
/// into tree-building grammars.
pub fn word_or_long_string<'i, C: Context<Atom = u8>>(
    ctx: &mut C,
    span: Span<'i, u8>,
) -> Span<'i, u8> {
    one_of((long_string::<C>, some(range(b'a', b'z')))).matches(ctx, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_util::{Outcome, Text, run};
    use crate::tree::{TreeContext, capture};

    #[test]
    fn test_contents() {
        let cases = [
            ("[[abc]]", "abc"),
            ("[[]]", ""),
            ("[==[a]]b]=]c]==]", "a]]b]=]c"),
            ("[[\nline]]", "line"),
            ("[=[\r\n]]x]=]", "]]x"),
        ];
        for (input, expected) in cases {
            assert_eq!(parse(input).unwrap(), expected, "{input:?}");
        }
    }

    #[test]
    fn test_level_must_match() {
        assert_eq!(run(long_string::<Text>, "[=[abc]]"), Outcome::FailAt(8));
        assert_eq!(run(long_string::<Text>, "[=[abc]==]"), Outcome::FailAt(10));
        assert_eq!(run(long_string::<Text>, "[=x"), Outcome::FailAt(2));
        assert!(matches!(parse("[[a]]b"), Err(Error::TrailingInput { .. })));
    }

    #[test]
    fn test_each_string_has_its_own_level() {
        let list = long_string_list::<Text>;
        assert_eq!(run(list, "[=[a]=],[[b]],[==[c]==]!"), Outcome::Rest("!"));
        // The unterminated second string is abandoned, the comma is not.
        assert_eq!(run(list, "[=[a]=],[[b]=]"), Outcome::Rest("[[b]=]"));
    }

    #[test]
    fn test_in_tree_context() {
        type Ctx = TreeContext<u8, char>;
        let input = "[==[x]]==]";
        let mut ctx = Ctx::new();
        let item = capture('s', word_or_long_string::<Ctx>);
        assert!(item.matches(&mut ctx, Span::from(input)).is_valid());
        let root = ctx.head().unwrap();
        assert_eq!(ctx.text(root, input.as_bytes()), input.as_bytes());
    }
}
