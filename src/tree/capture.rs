// Matchers that create tree nodes.

use super::{NodeId, TreeContext};
use crate::context::{Compare, Context};
use crate::matcher::Matcher;
use crate::span::Span;
use std::fmt::Debug;
use std::ops::Range;

/// Run `inner`, returning the watermark and the consumed range on success.
/// On failure everything `inner` created is recycled.
#[inline]
fn run_inner<'i, A, K, Cm, M>(
    inner: &M,
    ctx: &mut TreeContext<A, K, Cm>,
    span: Span<'i, A>,
) -> Result<(Option<NodeId>, Range<usize>, Span<'i, A>), Span<'i, A>>
where
    A: Copy + Debug,
    K: Copy,
    Cm: Compare<A>,
    M: Matcher<TreeContext<A, K, Cm>>,
{
    let checkpoint = ctx.checkpoint();
    let watermark = ctx.tail();
    let end = inner.matches(ctx, span);
    match (span.cursor(), end.cursor()) {
        (Some(start), Some(stop)) => Ok((watermark, start..stop, end)),
        _ => {
            ctx.rewind(span, checkpoint);
            Err(end)
        }
    }
}

// ============================================================================
// Capture
// ============================================================================

/// See [`capture`].
#[derive(Debug, Clone, Copy)]
pub struct Capture<K, M> {
    tag: Option<K>,
    inner: M,
}

/// Match `inner` and record a `tag` node spanning what it consumed.
///
/// Nodes created by `inner` become the new node's children. On failure no
/// node is left behind.
///
/// # Examples
///
/// ```
/// use parpeg::{Matcher, Span, TreeContext};
/// use parpeg::matcher::{atom, range, seq, some};
/// use parpeg::tree::capture;
///
/// let word = capture("word", some(range(b'a', b'z')));
/// let pair = capture("pair", seq((word, atom(b'='), word)));
///
/// let mut ctx = TreeContext::<u8, &str>::new();
/// let rest = pair.matches(&mut ctx, Span::from("ab=cd"));
/// assert!(rest.is_valid());
///
/// let root = ctx.roots().next().unwrap();
/// assert_eq!(ctx.node(root).tag(), Some("pair"));
/// assert_eq!(ctx.children(root).count(), 2);
/// ```
pub fn capture<K, M>(tag: K, inner: M) -> Capture<K, M> {
    Capture {
        tag: Some(tag),
        inner,
    }
}

/// Like [`capture`], but the node carries no tag.
///
/// Useful for grouping the nodes of a subpattern without naming it.
pub fn group<K, M>(inner: M) -> Group<K, M> {
    Group(Capture { tag: None, inner })
}

impl<A, K, Cm, M> Matcher<TreeContext<A, K, Cm>> for Capture<K, M>
where
    A: Copy + Debug,
    K: Copy,
    Cm: Compare<A>,
    M: Matcher<TreeContext<A, K, Cm>>,
{
    fn matches<'i>(&self, ctx: &mut TreeContext<A, K, Cm>, span: Span<'i, A>) -> Span<'i, A> {
        match run_inner(&self.inner, ctx, span) {
            Ok((watermark, range, end)) => {
                ctx.close_node(watermark, self.tag, range, false);
                end
            }
            Err(failed) => failed,
        }
    }
}

/// See [`group`].
#[derive(Debug, Clone, Copy)]
pub struct Group<K, M>(Capture<K, M>);

impl<A, K, Cm, M> Matcher<TreeContext<A, K, Cm>> for Group<K, M>
where
    A: Copy + Debug,
    K: Copy,
    Cm: Compare<A>,
    M: Matcher<TreeContext<A, K, Cm>>,
{
    #[inline]
    fn matches<'i>(&self, ctx: &mut TreeContext<A, K, Cm>, span: Span<'i, A>) -> Span<'i, A> {
        self.0.matches(ctx, span)
    }
}

// ============================================================================
// Two-phase capture
// ============================================================================

/// See [`capture_end`].
#[derive(Debug, Clone, Copy)]
pub struct CaptureEnd<K, M> {
    tag: K,
    inner: M,
}

/// Match `inner` and leave a bookmarked `tag` node for the nearest
/// enclosing [`capture_begin`] to complete.
///
/// This is how postfix operators are written without left recursion: the
/// operand is matched first, then `capture_end` marks where the operator
/// node ends, and `capture_begin` later moves the operand under it.
pub fn capture_end<K, M>(tag: K, inner: M) -> CaptureEnd<K, M> {
    CaptureEnd { tag, inner }
}

impl<A, K, Cm, M> Matcher<TreeContext<A, K, Cm>> for CaptureEnd<K, M>
where
    A: Copy + Debug,
    K: Copy,
    Cm: Compare<A>,
    M: Matcher<TreeContext<A, K, Cm>>,
{
    fn matches<'i>(&self, ctx: &mut TreeContext<A, K, Cm>, span: Span<'i, A>) -> Span<'i, A> {
        match run_inner(&self.inner, ctx, span) {
            Ok((watermark, range, end)) => {
                ctx.close_node(watermark, Some(self.tag), range, true);
                end
            }
            Err(failed) => failed,
        }
    }
}

/// See [`capture_begin`].
#[derive(Debug, Clone, Copy)]
pub struct CaptureBegin<M>(M);

/// Match `inner`, then complete the bookmarks it left.
///
/// Every bookmarked node created by `inner`, in order, adopts the new
/// sibling nodes before it and is widened to start where `inner` started.
/// Chained bookmarks therefore nest to the left: `a++--` becomes
/// `--(++(a))`. When `inner` leaves no bookmark no node is made; that is
/// not a failure.
///
/// # Examples
///
/// ```
/// use parpeg::{Matcher, Span, TreeContext};
/// use parpeg::matcher::{any, atom, range, seq};
/// use parpeg::tree::{capture, capture_begin, capture_end};
///
/// let operand = capture("id", range(b'a', b'z'));
/// let postfix = capture_begin(seq((operand, any(capture_end("bang", atom(b'!'))))));
///
/// let mut ctx = TreeContext::<u8, &str>::new();
/// assert!(postfix.matches(&mut ctx, Span::from("x!!")).is_valid());
///
/// let outer = ctx.roots().next().unwrap();
/// assert_eq!(ctx.node(outer).tag(), Some("bang"));
/// assert_eq!(ctx.node(outer).span(), 0..3);
/// let inner = ctx.children(outer).next().unwrap();
/// assert_eq!(ctx.node(inner).tag(), Some("bang"));
/// assert_eq!(ctx.node(inner).span(), 0..2);
/// ```
pub fn capture_begin<M>(inner: M) -> CaptureBegin<M> {
    CaptureBegin(inner)
}

impl<A, K, Cm, M> Matcher<TreeContext<A, K, Cm>> for CaptureBegin<M>
where
    A: Copy + Debug,
    K: Copy,
    Cm: Compare<A>,
    M: Matcher<TreeContext<A, K, Cm>>,
{
    fn matches<'i>(&self, ctx: &mut TreeContext<A, K, Cm>, span: Span<'i, A>) -> Span<'i, A> {
        match run_inner(&self.0, ctx, span) {
            Ok((watermark, range, end)) => {
                ctx.promote_bookmarks(watermark, range);
                end
            }
            Err(failed) => failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{any, atom, lit, one_of, range, seq, some};
    use crate::tree::TreeStats;

    type Ctx = TreeContext<u8, &'static str>;

    fn shape(ctx: &Ctx) -> Vec<(usize, &'static str)> {
        ctx.preorder()
            .map(|(depth, id)| (depth, ctx.node(id).tag().unwrap_or("_")))
            .collect()
    }

    #[test]
    fn capture_wraps_inner_nodes() {
        let mut ctx = Ctx::new();
        let digit = capture("d", range(b'0', b'9'));
        let number = capture("n", some(digit));
        let rest = number.matches(&mut ctx, Span::from("12x"));
        assert_eq!(rest.remaining(), b"x");
        assert_eq!(shape(&ctx), vec![(0, "n"), (1, "d"), (1, "d")]);
    }

    #[test]
    fn failed_capture_leaves_nothing() {
        let mut ctx = Ctx::new();
        let pair = capture("p", seq((capture("a", atom(b'a')), atom(b'b'))));
        assert!(!pair.matches(&mut ctx, Span::from("ac")).is_valid());
        assert_eq!(ctx.node_count(), 0);
        assert_eq!(ctx.stats().recycled, 1);
    }

    #[test]
    fn abandoned_alternative_is_recycled() {
        let mut ctx = Ctx::new();
        let m = one_of((
            seq((capture("x", lit(b"ab")), atom(b'!'))),
            capture("y", lit(b"ab")),
        ));
        assert!(m.matches(&mut ctx, Span::from("ab")).is_valid());
        assert_eq!(shape(&ctx), vec![(0, "y")]);
        assert_eq!(ctx.stats(), TreeStats { created: 2, recycled: 1 });
    }

    #[test]
    fn group_has_no_tag() {
        let mut ctx = Ctx::new();
        let m = group(seq((capture("a", atom(b'a')), capture("b", atom(b'b')))));
        assert!(m.matches(&mut ctx, Span::from("ab")).is_valid());
        assert_eq!(shape(&ctx), vec![(0, "_"), (1, "a"), (1, "b")]);
    }

    #[test]
    fn chained_bookmarks_fold_left() {
        let mut ctx = Ctx::new();
        let postfix = capture_begin(seq((
            capture("id", range(b'a', b'z')),
            any(one_of((
                capture_end("inc", lit(b"++")),
                capture_end("dec", lit(b"--")),
            ))),
        )));
        assert!(postfix.matches(&mut ctx, Span::from("a++--")).is_valid());
        assert_eq!(shape(&ctx), vec![(0, "dec"), (1, "inc"), (2, "id")]);

        let outer = ctx.head().unwrap();
        assert_eq!(ctx.node(outer).span(), 0..5);
        let inner = ctx.node(outer).first_child().unwrap();
        assert_eq!(ctx.node(inner).span(), 0..3);
    }

    #[test]
    fn promoted_bookmark_spans_the_whole_match() {
        let mut ctx = Ctx::new();
        let statement = capture_begin(seq((
            capture("id", range(b'a', b'z')),
            capture_end("bang", atom(b'!')),
            capture("semi", atom(b';')),
        )));
        assert!(statement.matches(&mut ctx, Span::from("x!;")).is_valid());
        assert_eq!(shape(&ctx), vec![(0, "bang"), (1, "id"), (0, "semi")]);

        let outer = ctx.head().unwrap();
        assert_eq!(ctx.node(outer).span(), 0..3);
        assert!(!ctx.node(outer).is_bookmark());
    }

    #[test]
    fn adopted_bookmark_is_cleared() {
        let mut ctx = Ctx::new();
        let wrapped = capture(
            "wrap",
            seq((capture("id", range(b'a', b'z')), capture_end("bang", atom(b'!')))),
        );
        assert!(wrapped.matches(&mut ctx, Span::from("x!")).is_valid());
        assert_eq!(shape(&ctx), vec![(0, "wrap"), (1, "id"), (1, "bang")]);
        for (_, id) in ctx.preorder() {
            assert!(!ctx.node(id).is_bookmark());
        }

        // Left at top level with no capture_begin, the flag stays set.
        ctx.reset();
        let bang = capture_end("bang", atom(b'!'));
        assert!(bang.matches(&mut ctx, Span::from("!")).is_valid());
        assert!(ctx.node(ctx.head().unwrap()).is_bookmark());
    }

    #[test]
    fn begin_without_bookmark_makes_no_node() {
        let mut ctx = Ctx::new();
        let plain = capture_begin(capture("id", range(b'a', b'z')));
        assert!(plain.matches(&mut ctx, Span::from("q")).is_valid());
        assert_eq!(shape(&ctx), vec![(0, "id")]);
        assert!(!ctx.node(ctx.head().unwrap()).is_bookmark());
    }
}
