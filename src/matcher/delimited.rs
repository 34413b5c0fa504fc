// Bracketed blocks and separated lists.

use crate::context::Context;
use crate::matcher::Matcher;
use crate::span::Span;

/// Try `close` at `span`; on failure rewind and hand back the failure.
#[inline]
fn try_close<'i, C: Context, M: Matcher<C>>(
    close: &M,
    ctx: &mut C,
    span: Span<'i, C::Atom>,
) -> Result<Span<'i, C::Atom>, Span<'i, C::Atom>> {
    let checkpoint = ctx.checkpoint();
    let closed = close.matches(ctx, span);
    if closed.is_valid() {
        return Ok(closed);
    }
    ctx.rewind(span, checkpoint);
    Err(closed)
}

/// See [`delimited_block`].
#[derive(Debug, Clone, Copy)]
pub struct DelimitedBlock<L, I, R> {
    open: L,
    item: I,
    close: R,
}

/// `open item* close`.
///
/// `close` is tried before `item` on every iteration, which costs a single
/// comparison in the common about-to-close case. An item that matches
/// without consuming input and is not followed by `close` is a failure.
pub fn delimited_block<L, I, R>(open: L, item: I, close: R) -> DelimitedBlock<L, I, R> {
    DelimitedBlock { open, item, close }
}

impl<C, L, I, R> Matcher<C> for DelimitedBlock<L, I, R>
where
    C: Context,
    L: Matcher<C>,
    I: Matcher<C>,
    R: Matcher<C>,
{
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let mut span = self.open.matches(ctx, span);
        while span.is_valid() {
            let unclosed = match try_close(&self.close, ctx, span) {
                Ok(closed) => return closed,
                Err(unclosed) => unclosed,
            };
            let next = self.item.matches(ctx, span);
            if !next.is_valid() {
                return unclosed.furthest(next);
            }
            if next.cursor() == span.cursor() {
                return span.fail();
            }
            span = next;
        }
        span
    }
}

/// See [`delimited_list`].
#[derive(Debug, Clone, Copy)]
pub struct DelimitedList<L, I, S, R> {
    open: L,
    item: I,
    separator: S,
    close: R,
}

/// `open (item (separator item)* separator?)? close`.
///
/// Accepts zero items, requires `separator` strictly between items, and
/// allows one trailing separator. A leading separator, two items without a
/// separator, a wrong separator or a malformed item all fail at the first
/// offending atom. As with [`delimited_block`], a round in which neither
/// the item nor the separator consumes anything is a failure.
pub fn delimited_list<L, I, S, R>(
    open: L,
    item: I,
    separator: S,
    close: R,
) -> DelimitedList<L, I, S, R> {
    DelimitedList {
        open,
        item,
        separator,
        close,
    }
}

impl<C, L, I, S, R> Matcher<C> for DelimitedList<L, I, S, R>
where
    C: Context,
    L: Matcher<C>,
    I: Matcher<C>,
    S: Matcher<C>,
    R: Matcher<C>,
{
    fn matches<'i>(&self, ctx: &mut C, span: Span<'i, C::Atom>) -> Span<'i, C::Atom> {
        let mut span = self.open.matches(ctx, span);
        while span.is_valid() {
            let round = span;
            // Expecting an item, or the close after zero items or a
            // trailing separator.
            let unclosed = match try_close(&self.close, ctx, span) {
                Ok(closed) => return closed,
                Err(unclosed) => unclosed,
            };
            let next = self.item.matches(ctx, span);
            if !next.is_valid() {
                return unclosed.furthest(next);
            }
            span = next;

            // Expecting the close or a separator.
            let unclosed = match try_close(&self.close, ctx, span) {
                Ok(closed) => return closed,
                Err(unclosed) => unclosed,
            };
            let next = self.separator.matches(ctx, span);
            if !next.is_valid() {
                return unclosed.furthest(next);
            }
            // An item and separator that both matched nothing would repeat
            // forever.
            if next.cursor() == round.cursor() {
                return span.fail();
            }
            span = next;
        }
        span
    }
}
