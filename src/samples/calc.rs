// Arithmetic in two stages.
//
// Stage one lexes bytes into a flat run of captured tokens. Stage two runs
// a second grammar whose atoms are the token kinds themselves, so the same
// combinators serve both passes. Binary and postfix operators are built
// with `capture_begin`/`capture_end`: the left operand is matched first and
// moved under the operator node afterwards, which keeps chains
// left-associative without left recursion.

use crate::error::{Error, Result};
use crate::matcher::{Matcher, any, atom, charset, eoi, lit, one_of, range, seq, some};
use crate::parser::Builder;
use crate::span::Span;
use crate::tree::{NodeId, TreeContext, capture, capture_begin, capture_end};

// ============================================================================
// Lexer
// ============================================================================

/// Token kinds, which are also the atoms of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Number,
    Ident,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Increment,
    Decrement,
}

/// A lexed token and the bytes it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

pub type LexContext = TreeContext<u8, TokenKind>;

fn blank<'i>(ctx: &mut LexContext, span: Span<'i, u8>) -> Span<'i, u8> {
    any(charset(b" \t\r\n")).matches(ctx, span)
}

fn token<'i>(ctx: &mut LexContext, span: Span<'i, u8>) -> Span<'i, u8> {
    let ident_start = one_of((range(b'a', b'z'), range(b'A', b'Z'), atom(b'_')));
    let ident_rest = one_of((
        range(b'a', b'z'),
        range(b'A', b'Z'),
        range(b'0', b'9'),
        atom(b'_'),
    ));
    one_of((
        capture(TokenKind::Number, some(range(b'0', b'9'))),
        capture(TokenKind::Ident, seq((ident_start, any(ident_rest)))),
        capture(TokenKind::Increment, lit(b"++")),
        capture(TokenKind::Decrement, lit(b"--")),
        capture(TokenKind::Plus, atom(b'+')),
        capture(TokenKind::Minus, atom(b'-')),
        capture(TokenKind::Star, atom(b'*')),
        capture(TokenKind::Slash, atom(b'/')),
        capture(TokenKind::LParen, atom(b'(')),
        capture(TokenKind::RParen, atom(b')')),
    ))
    .matches(ctx, span)
}

/// `tokens := blank (token blank)* EOI`
pub fn tokens<'i>(ctx: &mut LexContext, span: Span<'i, u8>) -> Span<'i, u8> {
    seq((blank, any(seq((token, blank))), eoi())).matches(ctx, span)
}

// ============================================================================
// Expression grammar
// ============================================================================

/// Node tags of the expression tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprTag {
    Number,
    Variable,
    Negate,
    Add,
    Subtract,
    Multiply,
    Divide,
    Increment,
    Decrement,
}

pub type ExprContext = TreeContext<TokenKind, ExprTag>;

type TokenSpan<'i> = Span<'i, TokenKind>;

/// `expr := product (('+' | '-') product)*`
pub fn expr<'i>(ctx: &mut ExprContext, span: TokenSpan<'i>) -> TokenSpan<'i> {
    capture_begin(seq((
        product,
        any(one_of((
            capture_end(ExprTag::Add, seq((atom(TokenKind::Plus), product))),
            capture_end(ExprTag::Subtract, seq((atom(TokenKind::Minus), product))),
        ))),
    )))
    .matches(ctx, span)
}

fn product<'i>(ctx: &mut ExprContext, span: TokenSpan<'i>) -> TokenSpan<'i> {
    capture_begin(seq((
        prefix,
        any(one_of((
            capture_end(ExprTag::Multiply, seq((atom(TokenKind::Star), prefix))),
            capture_end(ExprTag::Divide, seq((atom(TokenKind::Slash), prefix))),
        ))),
    )))
    .matches(ctx, span)
}

fn prefix<'i>(ctx: &mut ExprContext, span: TokenSpan<'i>) -> TokenSpan<'i> {
    one_of((
        capture(ExprTag::Negate, seq((atom(TokenKind::Minus), prefix))),
        postfix,
    ))
    .matches(ctx, span)
}

fn postfix<'i>(ctx: &mut ExprContext, span: TokenSpan<'i>) -> TokenSpan<'i> {
    capture_begin(seq((
        primary,
        any(one_of((
            capture_end(ExprTag::Increment, atom(TokenKind::Increment)),
            capture_end(ExprTag::Decrement, atom(TokenKind::Decrement)),
        ))),
    )))
    .matches(ctx, span)
}

fn primary<'i>(ctx: &mut ExprContext, span: TokenSpan<'i>) -> TokenSpan<'i> {
    one_of((
        capture(ExprTag::Number, atom(TokenKind::Number)),
        capture(ExprTag::Variable, atom(TokenKind::Ident)),
        seq((atom(TokenKind::LParen), expr, atom(TokenKind::RParen))),
    ))
    .matches(ctx, span)
}

// ============================================================================
// Driver
// ============================================================================

/// Reusable two-stage calculator.
///
/// Both contexts and the token buffers are kept between calls, so parsing
/// a stream of expressions allocates only while the buffers grow.
#[derive(Default)]
pub struct Calculator {
    lexer: LexContext,
    parser: ExprContext,
    tokens: Vec<Token>,
    kinds: Vec<TokenKind>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lex `source` into tokens.
    ///
    /// # Errors
    ///
    /// Returns a syntax error at the first byte that starts no token.
    pub fn tokenize(&mut self, source: &str) -> Result<&[Token]> {
        Builder::default()
            .nonterminal("<tokens>")
            .build()
            .parse_str(&tokens, &mut self.lexer, source)?;

        self.tokens.clear();
        self.kinds.clear();
        for id in self.lexer.roots() {
            let node = self.lexer.node(id);
            if let Some(kind) = node.tag() {
                self.tokens.push(Token {
                    kind,
                    start: node.start(),
                    end: node.end(),
                });
                self.kinds.push(kind);
            }
        }
        Ok(&self.tokens)
    }

    /// Lex and parse `source`; the tree is left in [`Self::tree`].
    ///
    /// # Errors
    ///
    /// Lexing and parsing errors, with spans in bytes of `source`.
    pub fn parse(&mut self, source: &str) -> Result<()> {
        self.tokenize(source)?;
        let parsed = Builder::default()
            .nonterminal("<expr>")
            .build()
            .parse(&expr, &mut self.parser, &self.kinds);
        match parsed {
            Ok(_) => Ok(()),
            Err(err) => Err(self.locate_error(err, source.len())),
        }
    }

    /// The expression tree from the last successful [`parse`](Self::parse).
    /// Node spans count tokens, not bytes.
    pub fn tree(&self) -> &ExprContext {
        &self.parser
    }

    /// Parse `source` and render it as an s-expression, e.g. `(+ 1 (* 2 3))`.
    ///
    /// # Errors
    ///
    /// As for [`parse`](Self::parse).
    pub fn render(&mut self, source: &str) -> Result<String> {
        self.parse(source)?;
        let mut out = String::new();
        if let Some(root) = self.parser.head() {
            self.write_sexpr(source, root, &mut out);
        }
        Ok(out)
    }

    /// Parse and evaluate `source` over `i64`, looking variables up in
    /// `vars`. `x++` is `x + 1` and `x--` is `x - 1`.
    ///
    /// Returns `Ok(None)` for unknown variables, division by zero and
    /// overflow.
    ///
    /// # Errors
    ///
    /// As for [`parse`](Self::parse).
    pub fn evaluate(&mut self, source: &str, vars: &[(&str, i64)]) -> Result<Option<i64>> {
        self.parse(source)?;
        Ok(self
            .parser
            .head()
            .and_then(|root| self.eval(source, root, vars)))
    }

    /// Source text of the single-token node `id`.
    fn token_text<'s>(&self, source: &'s str, id: NodeId) -> &'s str {
        self.tokens
            .get(self.parser.node(id).start())
            .and_then(|token| source.get(token.start..token.end))
            .unwrap_or_default()
    }

    fn write_sexpr(&self, source: &str, id: NodeId, out: &mut String) {
        let op = match self.parser.node(id).tag() {
            Some(ExprTag::Number | ExprTag::Variable) | None => {
                out.push_str(self.token_text(source, id));
                return;
            }
            Some(ExprTag::Negate) => "neg",
            Some(ExprTag::Add) => "+",
            Some(ExprTag::Subtract) => "-",
            Some(ExprTag::Multiply) => "*",
            Some(ExprTag::Divide) => "/",
            Some(ExprTag::Increment) => "++",
            Some(ExprTag::Decrement) => "--",
        };
        out.push('(');
        out.push_str(op);
        for child in self.parser.children(id) {
            out.push(' ');
            self.write_sexpr(source, child, out);
        }
        out.push(')');
    }

    fn eval(&self, source: &str, id: NodeId, vars: &[(&str, i64)]) -> Option<i64> {
        let mut operands = self.parser.children(id);
        let mut operand = || {
            operands
                .next()
                .and_then(|child| self.eval(source, child, vars))
        };
        match self.parser.node(id).tag()? {
            ExprTag::Number => self.token_text(source, id).parse().ok(),
            ExprTag::Variable => {
                let name = self.token_text(source, id);
                vars.iter()
                    .find(|(var, _)| *var == name)
                    .map(|&(_, value)| value)
            }
            ExprTag::Negate => operand()?.checked_neg(),
            ExprTag::Increment => operand()?.checked_add(1),
            ExprTag::Decrement => operand()?.checked_sub(1),
            ExprTag::Add => operand()?.checked_add(operand()?),
            ExprTag::Subtract => operand()?.checked_sub(operand()?),
            ExprTag::Multiply => operand()?.checked_mul(operand()?),
            ExprTag::Divide => operand()?.checked_div(operand()?),
        }
    }

    /// Re-express a token-level error in bytes of the source.
    fn locate_error(&self, err: Error, source_len: usize) -> Error {
        let at = err.offset();
        let (start, end) = match self.tokens.get(at) {
            Some(token) => (token.start, token.end),
            None => (source_len, source_len),
        };
        match err {
            Error::Syntax {
                nonterminal,
                message,
                ..
            } => Error::syntax(start..end, nonterminal, message),
            Error::TrailingInput { .. } => Error::trailing_input(start..source_len),
        }
    }
}
