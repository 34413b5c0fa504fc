// Speculative tree construction: building, recycling and walking.

use bumpalo::Bump;
use parpeg::matcher::{atom, delimited_list, one_of, range, seq, some};
use parpeg::tree::{capture, group};
use parpeg::{Arena, Builder, Context, Matcher, Span, TreeConfig, TreeContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Word,
    List,
    Group,
    Leaf,
}

type Ctx = TreeContext<u8, Tag>;

fn word<'i>(ctx: &mut Ctx, span: Span<'i, u8>) -> Span<'i, u8> {
    capture(Tag::Word, some(range(b'a', b'z'))).matches(ctx, span)
}

fn list<'i>(ctx: &mut Ctx, span: Span<'i, u8>) -> Span<'i, u8> {
    capture(
        Tag::List,
        delimited_list(atom(b'('), one_of((word, list)), atom(b','), atom(b')')),
    )
    .matches(ctx, span)
}

/// Every level first tries a variant that demands a trailing `!`, builds
/// the whole subtree, fails, and builds it again.
fn nest<'i>(ctx: &mut Ctx, span: Span<'i, u8>) -> Span<'i, u8> {
    let parens = || capture(Tag::Group, seq((atom(b'('), nest, atom(b')'))));
    one_of((
        seq((parens(), atom(b'!'))),
        parens(),
        capture(Tag::Leaf, atom(b'x')),
    ))
    .matches(ctx, span)
}

fn render(ctx: &Ctx, source: &[u8]) -> String {
    let mut out = String::new();
    for root in ctx.roots() {
        render_node(ctx, source, root, &mut out);
    }
    out
}

fn render_node(ctx: &Ctx, source: &[u8], id: parpeg::NodeId, out: &mut String) {
    match ctx.node(id).tag() {
        Some(Tag::Word | Tag::Leaf) => {
            out.push_str(std::str::from_utf8(ctx.text(id, source)).unwrap());
        }
        _ => {
            out.push('(');
            for (i, child) in ctx.children(id).enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_node(ctx, source, child, out);
            }
            out.push(')');
        }
    }
}

#[test]
fn round_trip() {
    let input = "(abcd,efgh,(ab),(a,(bc,de)),ghijk)";
    let mut ctx = Ctx::new();
    let end = list(&mut ctx, Span::from(input));
    assert!(end.is_empty());
    assert_eq!(render(&ctx, input.as_bytes()), input);
    assert_eq!(ctx.roots().count(), 1);
}

#[test]
fn node_links_are_consistent() {
    let input = "(a,(b,c),d)";
    let mut ctx = Ctx::new();
    assert!(list(&mut ctx, Span::from(input)).is_valid());

    for (_, id) in ctx.preorder() {
        let node = ctx.node(id);
        let children: Vec<_> = ctx.children(id).collect();
        assert_eq!(node.first_child(), children.first().copied());
        assert_eq!(node.last_child(), children.last().copied());
        for pair in children.windows(2) {
            assert_eq!(ctx.node(pair[1]).prev(), Some(pair[0]));
        }
        for &child in &children {
            assert_eq!(ctx.node(child).parent(), Some(id));
            assert!(child < id, "children are allocated before their parent");
            assert!(node.start() <= ctx.node(child).start());
            assert!(ctx.node(child).end() <= node.end());
        }
    }
}

#[test]
fn failed_branches_restore_arena_state() {
    let mut ctx = Ctx::new();
    assert!(word(&mut ctx, Span::from("keep")).is_valid());
    let bytes = ctx.live_bytes();
    let nodes = ctx.node_count();

    let span = Span::from("(a,(b,c)");
    let checkpoint = ctx.checkpoint();
    assert!(!seq((list, atom(b'!'))).matches(&mut ctx, span).is_valid());
    ctx.rewind(span, checkpoint);

    assert_eq!(ctx.live_bytes(), bytes);
    assert_eq!(ctx.node_count(), nodes);
    assert_eq!(ctx.roots().count(), 1);
}

#[test]
fn recycled_ids_are_reused_newest_first() {
    let mut ctx = Ctx::new();
    let span = Span::from("(a,b)?");
    let checkpoint = ctx.checkpoint();
    assert!(list(&mut ctx, span).is_valid());
    let first_pass: Vec<_> = ctx.preorder().map(|(_, id)| id.index()).collect();
    ctx.rewind(span, checkpoint);
    assert_eq!(ctx.node_count(), 0);

    // Rebuilding allocates exactly the ids that were released.
    assert!(list(&mut ctx, span).is_valid());
    let second_pass: Vec<_> = ctx.preorder().map(|(_, id)| id.index()).collect();
    assert_eq!(first_pass, second_pass);
    assert_eq!(first_pass, vec![2, 0, 1]);
}

#[test]
fn arena_releases_in_reverse_order() {
    let mut arena = Arena::with_slab_capacity(3);
    let ids: Vec<_> = (0..7).map(|n| arena.alloc(n)).collect();
    assert_eq!(arena.slab_count(), 3);
    for (n, &id) in ids.iter().enumerate().rev() {
        assert_eq!(arena.free(id), n);
    }
    assert!(arena.is_empty());
    assert_eq!(arena.slab_count(), 3);
}

#[test]
#[should_panic(expected = "LIFO")]
fn arena_rejects_out_of_order_release() {
    let mut arena = Arena::new();
    let a = arena.alloc("a");
    let _b = arena.alloc("b");
    arena.free(a);
}

#[test]
fn pathological_nesting_recycles_dead_nodes() {
    let input = "((((((x))))))";
    let mut ctx = TreeContext::with_config(TreeConfig::default().slab_capacity(16));
    let end = nest(&mut ctx, Span::from(input));
    assert!(end.is_empty());

    assert_eq!(ctx.node_count(), 7);
    let stats = ctx.stats();
    assert_eq!(stats.created, 190);
    assert_eq!(stats.recycled, 183);
    assert_eq!(stats.created - stats.recycled, ctx.node_count());

    let depths: Vec<_> = ctx.preorder().map(|(depth, _)| depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 3, 4, 5, 6]);
    let leaf = ctx.preorder().last().map(|(_, id)| id).unwrap();
    assert_eq!(ctx.node(leaf).tag(), Some(Tag::Leaf));
    assert_eq!(ctx.node(leaf).span(), 6..7);
}

#[test]
fn reset_reuses_slabs() {
    let mut ctx = TreeContext::with_config(TreeConfig::default().slab_capacity(4));
    let input = "(a,b,c,d,e,f,g,h)";
    assert!(list(&mut ctx, Span::from(input)).is_valid());
    let slabs = ctx.slab_count();
    assert!(slabs >= 3);

    ctx.reset();
    assert_eq!(ctx.node_count(), 0);
    assert_eq!(ctx.roots().count(), 0);
    assert!(list(&mut ctx, Span::from(input)).is_valid());
    assert_eq!(ctx.slab_count(), slabs);
}

#[test]
fn groups_are_untagged() {
    let mut ctx = Ctx::new();
    let pair = group(seq((word, atom(b'='), word)));
    assert!(pair.matches(&mut ctx, Span::from("a=b")).is_valid());
    let root = ctx.head().unwrap();
    assert_eq!(ctx.node(root).tag(), None);
    assert_eq!(ctx.children(root).count(), 2);
}

#[test]
fn frozen_tree_outlives_the_context() {
    let input = "(ab,(cd))";
    let bump = Bump::new();
    let frozen = {
        let mut ctx = Ctx::new();
        assert!(list(&mut ctx, Span::from(input)).is_valid());
        ctx.freeze(&bump)
    };

    assert_eq!(frozen.len(), 1);
    let outer = &frozen[0];
    assert_eq!(outer.tag(), Some(Tag::List));
    let [first, second] = outer.children() else {
        panic!("expected two children");
    };
    assert_eq!(first.text(input.as_bytes()), b"ab");
    assert_eq!(second.tag(), Some(Tag::List));
    assert_eq!(second.children()[0].span(), 5..7);
}

#[test]
fn parser_can_append_to_an_existing_tree() {
    let chained = Builder::default().reset_context(false).build();
    let mut ctx = Ctx::new();
    chained.parse_str(&list, &mut ctx, "(a)").unwrap();
    chained.parse_str(&list, &mut ctx, "(b,c)").unwrap();
    assert_eq!(ctx.roots().count(), 2);
    assert_eq!(ctx.node_count(), 5);

    Builder::default().build().parse_str(&word, &mut ctx, "d").unwrap();
    assert_eq!(ctx.node_count(), 1);
}
