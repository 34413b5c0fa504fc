// Strict JSON (RFC 8259) over bytes.

use crate::error::{Error, Result};
use crate::matcher::{
    Matcher, any, atom, charset, lit, not, not_range, one_of, opt, range, rep, seq, some,
};
use crate::parser::Builder;
use crate::span::Span;
use crate::tree::{NodeId, TreeContext, capture};

/// Node tags of the JSON grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonTag {
    Object,
    Member,
    Array,
    String,
    Number,
    True,
    False,
    Null,
}

pub type JsonContext = TreeContext<u8, JsonTag>;

/// A decoded JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// Members in document order; duplicate keys are kept.
    Object(Vec<(String, Value)>),
}

// ============================================================================
// Grammar
// ============================================================================

fn ws<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    any(charset(b" \t\r\n")).matches(ctx, span)
}

fn digit<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    range(b'0', b'9').matches(ctx, span)
}

fn hex<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    one_of((range(b'0', b'9'), range(b'a', b'f'), range(b'A', b'F'))).matches(ctx, span)
}

/// `value := ws (object | array | string | number | true | false | null) ws`
pub fn value<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    seq((
        ws,
        one_of((
            object,
            array,
            string,
            number,
            capture(JsonTag::True, lit(b"true")),
            capture(JsonTag::False, lit(b"false")),
            capture(JsonTag::Null, lit(b"null")),
        )),
        ws,
    ))
    .matches(ctx, span)
}

fn member<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    capture(JsonTag::Member, seq((ws, string, ws, atom(b':'), value))).matches(ctx, span)
}

fn object<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    let members = seq((member, any(seq((atom(b','), member)))));
    capture(
        JsonTag::Object,
        seq((atom(b'{'), one_of((members, ws)), atom(b'}'))),
    )
    .matches(ctx, span)
}

fn array<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    let elements = seq((value, any(seq((atom(b','), value)))));
    capture(
        JsonTag::Array,
        seq((atom(b'['), one_of((elements, ws)), atom(b']'))),
    )
    .matches(ctx, span)
}

fn string<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    let escape = seq((
        atom(b'\\'),
        one_of((charset(b"\"\\/bfnrt"), seq((atom(b'u'), rep::<4, _>(hex))))),
    ));
    let unescaped = seq((not(charset(b"\"\\")), not_range(0x00, 0x1f)));
    capture(
        JsonTag::String,
        seq((atom(b'"'), any(one_of((escape, unescaped))), atom(b'"'))),
    )
    .matches(ctx, span)
}

fn number<'i>(ctx: &mut JsonContext, span: Span<'i, u8>) -> Span<'i, u8> {
    let int = one_of((atom(b'0'), seq((range(b'1', b'9'), any(digit)))));
    let frac = opt(seq((atom(b'.'), some(digit))));
    let exp = opt(seq((charset(b"eE"), opt(charset(b"+-")), some(digit))));
    capture(JsonTag::Number, seq((opt(atom(b'-')), int, frac, exp))).matches(ctx, span)
}

// ============================================================================
// Decoding
// ============================================================================

/// Parse `input` as one JSON document.
///
/// # Errors
///
/// Returns a syntax error at the furthest failure, or a trailing-input
/// error when a complete value is followed by anything but whitespace.
pub fn parse(ctx: &mut JsonContext, input: &str) -> Result<Value> {
    Builder::default()
        .nonterminal("<json>")
        .build()
        .parse_str(&value, ctx, input)?;
    match ctx.head() {
        Some(root) => Ok(decode(ctx, input.as_bytes(), root)),
        None => Err(Error::syntax(0..0, "<json>", "empty document")),
    }
}

/// Convert the subtree at `id` into a [`Value`].
pub fn decode(ctx: &JsonContext, source: &[u8], id: NodeId) -> Value {
    let text = ctx.text(id, source);
    match ctx.node(id).tag() {
        Some(JsonTag::Null) | None => Value::Null,
        Some(JsonTag::True) => Value::Bool(true),
        Some(JsonTag::False) => Value::Bool(false),
        Some(JsonTag::Number) => Value::Number(
            std::str::from_utf8(text)
                .ok()
                .and_then(|digits| digits.parse().ok())
                .unwrap_or(f64::NAN),
        ),
        Some(JsonTag::String) => Value::String(unescape(text)),
        Some(JsonTag::Array) => Value::Array(
            ctx.children(id)
                .map(|child| decode(ctx, source, child))
                .collect(),
        ),
        Some(JsonTag::Object) => Value::Object(
            ctx.children(id)
                .map(|member| decode_member(ctx, source, member))
                .collect(),
        ),
        Some(JsonTag::Member) => Value::Object(vec![decode_member(ctx, source, id)]),
    }
}

fn decode_member(ctx: &JsonContext, source: &[u8], id: NodeId) -> (String, Value) {
    let mut parts = ctx.children(id);
    let key = match parts.next() {
        Some(key) => unescape(ctx.text(key, source)),
        None => String::new(),
    };
    let value = match parts.next() {
        Some(value) => decode(ctx, source, value),
        None => Value::Null,
    };
    (key, value)
}

/// Decode a quoted string literal, quotes included.
fn unescape(quoted: &[u8]) -> String {
    let body = match quoted {
        [b'"', body @ .., b'"'] => body,
        other => other,
    };
    let mut out = Vec::with_capacity(body.len());
    let mut bytes = body.iter().copied();
    while let Some(byte) = bytes.next() {
        if byte != b'\\' {
            out.push(byte);
            continue;
        }
        let decoded = match bytes.next() {
            Some(b'b') => '\u{8}',
            Some(b'f') => '\u{c}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                let unit = hex4(&mut bytes);
                match unit {
                    0xD800..=0xDBFF => {
                        let mut lookahead = bytes.clone();
                        let low = match (lookahead.next(), lookahead.next()) {
                            (Some(b'\\'), Some(b'u')) => Some(hex4(&mut lookahead)),
                            _ => None,
                        };
                        match low {
                            Some(low @ 0xDC00..=0xDFFF) => {
                                bytes = lookahead;
                                let scalar = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                                char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER)
                            }
                            _ => char::REPLACEMENT_CHARACTER,
                        }
                    }
                    _ => char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER),
                }
            }
            Some(other) => char::from(other),
            None => break,
        };
        let mut buf = [0; 4];
        out.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex4(bytes: &mut impl Iterator<Item = u8>) -> u32 {
    bytes
        .take(4)
        .fold(0, |acc, b| acc * 16 + char::from(b).to_digit(16).unwrap_or(0))
}
