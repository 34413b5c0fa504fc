// Nested lists of lowercase words: `(abcd,efgh,(ab),(a,(bc,de)),ghijk)`.

use crate::error::Result;
use crate::matcher::{Matcher, atom, delimited_list, one_of, range, some};
use crate::parser::Builder;
use crate::span::Span;
use crate::tree::{NodeId, TreeContext, capture};

/// Node tags of the list grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListTag {
    Word,
    List,
}

pub type ListContext = TreeContext<u8, ListTag>;

/// `word := [a-z]+`
pub fn word<'i>(ctx: &mut ListContext, span: Span<'i, u8>) -> Span<'i, u8> {
    capture(ListTag::Word, some(range(b'a', b'z'))).matches(ctx, span)
}

/// `element := word | list`
pub fn element<'i>(ctx: &mut ListContext, span: Span<'i, u8>) -> Span<'i, u8> {
    one_of((word, list)).matches(ctx, span)
}

/// `list := '(' (element (',' element)* ','?)? ')'`
pub fn list<'i>(ctx: &mut ListContext, span: Span<'i, u8>) -> Span<'i, u8> {
    capture(
        ListTag::List,
        delimited_list(atom(b'('), element, atom(b','), atom(b')')),
    )
    .matches(ctx, span)
}

/// Parse a complete list into `ctx`.
///
/// # Errors
///
/// Returns a syntax error at the furthest failure, or a trailing-input
/// error when something follows the closing parenthesis.
pub fn parse(ctx: &mut ListContext, input: &str) -> Result<()> {
    Builder::default()
        .nonterminal("<list>")
        .build()
        .parse_str(&list, ctx, input)?;
    Ok(())
}

/// Write the tree in `ctx` back out in canonical form.
///
/// For input without a trailing separator this reproduces the input.
pub fn serialize(ctx: &ListContext, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for root in ctx.roots() {
        write_node(ctx, input.as_bytes(), root, &mut out);
    }
    out
}

fn write_node(ctx: &ListContext, source: &[u8], id: NodeId, out: &mut String) {
    match ctx.node(id).tag() {
        Some(ListTag::Word) => out.push_str(&String::from_utf8_lossy(ctx.text(id, source))),
        Some(ListTag::List) | None => {
            out.push('(');
            for (i, child) in ctx.children(id).enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_node(ctx, source, child, out);
            }
            out.push(')');
        }
    }
}
