//! Speculative parse-tree construction.
//!
//! A [`TreeContext`] builds the tree *while* matching. Nodes are created
//! the moment a captured pattern succeeds, even if an enclosing alternative
//! later fails; that failure rewinds the context, and rewinding recycles
//! every node created since the checkpoint.
//!
//! Nodes live in an [`Arena`] and link to each other by [`NodeId`]. The
//! top level of the tree is an intrusive sibling list (`head`/`tail`); each
//! node owns its children through a first/last child pair. Two facts keep
//! recycling cheap and safe:
//!
//! - a node is always allocated *after* all of its descendants, because it
//!   is created when its pattern finishes and adopts whatever its pattern
//!   created;
//! - a checkpoint is just the current tail, and everything created after
//!   it is the tail-ward part of the top-level list plus descendants.
//!
//! Recycling therefore walks back from the tail to the checkpoint and frees
//! nodes in exact reverse allocation order, which is the only order the
//! arena accepts.

use crate::arena::{Arena, ArenaId};
use crate::backref::{BackrefMark, Backrefs};
use crate::constants::DEFAULT_SLAB_CAPACITY;
use crate::context::{Compare, Context, Natural};
use crate::span::Span;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::mem;
use std::ops::Range;

mod capture;
mod freeze;
mod walk;

pub use capture::{
    Capture, CaptureBegin, CaptureEnd, Group, capture, capture_begin, capture_end, group,
};
pub use freeze::FrozenNode;
pub use walk::{Preorder, Siblings};

// ============================================================================
// Nodes
// ============================================================================

/// Handle to a node of a [`TreeContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(ArenaId);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }
}

/// A captured subtree.
#[derive(Debug, Clone, Copy)]
pub struct Node<K> {
    tag: Option<K>,
    start: usize,
    end: usize,
    bookmark: bool,
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

impl<K: Copy> Node<K> {
    /// The rule label, if the node was captured with one.
    #[inline]
    pub fn tag(&self) -> Option<K> {
        self.tag
    }

    /// Offsets of the consumed atoms.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Set by `capture_end` until an enclosing `capture_begin` promotes
    /// the node. Only a top-level node can still carry it: adoption by
    /// another capture clears it.
    #[inline]
    pub fn is_bookmark(&self) -> bool {
        self.bookmark
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    #[inline]
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    #[inline]
    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Construction options for a [`TreeContext`].
///
/// # Examples
///
/// ```
/// use parpeg::{TreeConfig, TreeContext};
///
/// let config = TreeConfig::default().slab_capacity(64);
/// let ctx: TreeContext<u8, &str> = TreeContext::with_config(config);
/// assert_eq!(ctx.node_count(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    slab_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            slab_capacity: DEFAULT_SLAB_CAPACITY,
        }
    }
}

impl TreeConfig {
    /// Set how many nodes each arena slab holds (default: 1024).
    #[must_use]
    pub fn slab_capacity(mut self, nodes: usize) -> Self {
        self.slab_capacity = nodes;
        self
    }
}

// ============================================================================
// Tree Context
// ============================================================================

/// Node churn since the last reset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes allocated, including ones later recycled.
    pub created: usize,
    /// Nodes discarded by rewinds.
    pub recycled: usize,
}

/// The state [`TreeContext`] rewinds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeCheckpoint {
    tail: Option<NodeId>,
    backrefs: BackrefMark,
}

/// A context that builds a parse tree of `K`-tagged nodes while matching
/// atoms of type `A`.
pub struct TreeContext<A, K, Cm = Natural> {
    compare: Cm,
    arena: Arena<Node<K>>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    backrefs: Backrefs,
    stats: TreeStats,
    /// Reused work list for recycling.
    scratch: Vec<NodeId>,
    _atom: PhantomData<fn(&A)>,
}

impl<A, K, Cm: Default> TreeContext<A, K, Cm> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_compare_and_config(Cm::default(), config)
    }
}

impl<A, K, Cm: Default> Default for TreeContext<A, K, Cm> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, K, Cm> TreeContext<A, K, Cm> {
    pub fn with_compare(compare: Cm) -> Self {
        Self::with_compare_and_config(compare, TreeConfig::default())
    }

    pub fn with_compare_and_config(compare: Cm, config: TreeConfig) -> Self {
        Self {
            compare,
            arena: Arena::with_slab_capacity(config.slab_capacity),
            head: None,
            tail: None,
            backrefs: Backrefs::default(),
            stats: TreeStats::default(),
            scratch: Vec::new(),
            _atom: PhantomData,
        }
    }
}

impl<A, K: Copy, Cm> TreeContext<A, K, Cm> {
    /// Number of live nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Bytes held by live nodes in the arena.
    #[inline]
    pub fn live_bytes(&self) -> usize {
        self.arena.live_bytes()
    }

    #[inline]
    pub fn slab_count(&self) -> usize {
        self.arena.slab_count()
    }

    #[inline]
    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<K> {
        self.arena.get(id.0)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.arena.get_mut(id.0)
    }

    /// The first top-level node.
    #[inline]
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// The last top-level node; also the watermark captures record.
    #[inline]
    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    /// The first top-level node created after `watermark`.
    #[inline]
    fn first_after(&self, watermark: Option<NodeId>) -> Option<NodeId> {
        match watermark {
            Some(mark) => self.node(mark).next,
            None => self.head,
        }
    }

    #[inline]
    fn link_after(&mut self, watermark: Option<NodeId>, id: NodeId) {
        match watermark {
            Some(mark) => self.node_mut(mark).next = Some(id),
            None => self.head = Some(id),
        }
    }

    /// Create a node covering `range` and make every top-level node created
    /// since `watermark` its children. With nothing created since the
    /// watermark the node is simply appended.
    pub(crate) fn close_node(
        &mut self,
        watermark: Option<NodeId>,
        tag: Option<K>,
        range: Range<usize>,
        bookmark: bool,
    ) -> NodeId {
        let first = self.first_after(watermark);
        let last = first.and(self.tail);
        let id = NodeId(self.arena.alloc(Node {
            tag,
            start: range.start,
            end: range.end,
            bookmark,
            parent: None,
            prev: watermark,
            next: None,
            first_child: first,
            last_child: last,
        }));
        self.stats.created += 1;

        let mut child = first;
        while let Some(current) = child {
            let node = self.node_mut(current);
            node.parent = Some(id);
            node.bookmark = false;
            child = node.next;
        }
        if let Some(first) = first {
            self.node_mut(first).prev = None;
        }

        self.link_after(watermark, id);
        self.tail = Some(id);
        id
    }

    /// Resolve the bookmarks set since `watermark`.
    ///
    /// Each bookmarked top-level node, left to right, adopts every new
    /// sibling before it (so chained bookmarks nest to the left), has its
    /// start widened to `range.start`, and loses its bookmark flag. The
    /// last one, the outermost, then spans all of `range`. Returns it.
    pub(crate) fn promote_bookmarks(
        &mut self,
        watermark: Option<NodeId>,
        range: Range<usize>,
    ) -> Option<NodeId> {
        let mut promoted = None;
        let mut cursor = self.first_after(watermark);
        while let Some(id) = cursor {
            cursor = self.node(id).next;
            if !self.node(id).bookmark {
                continue;
            }
            self.adopt_preceding(watermark, id);
            let node = self.node_mut(id);
            node.bookmark = false;
            node.start = range.start;
            promoted = Some(id);
        }
        if let Some(outer) = promoted {
            self.node_mut(outer).end = range.end;
        }
        promoted
    }

    /// Prepend the top-level nodes between `watermark` and `id` to `id`'s
    /// children.
    fn adopt_preceding(&mut self, watermark: Option<NodeId>, id: NodeId) {
        let first = match self.first_after(watermark) {
            Some(first) if first != id => first,
            _ => return,
        };
        let Some(before) = self.node(id).prev else {
            unreachable!("a node after the watermark has a predecessor");
        };

        let mut child = Some(first);
        while let Some(current) = child {
            if current == id {
                break;
            }
            let node = self.node_mut(current);
            node.parent = Some(id);
            child = node.next;
        }

        let old_first = self.node(id).first_child;
        self.node_mut(before).next = old_first;
        match old_first {
            Some(old_first) => self.node_mut(old_first).prev = Some(before),
            None => self.node_mut(id).last_child = Some(before),
        }
        self.node_mut(first).prev = None;

        let node = self.node_mut(id);
        node.first_child = Some(first);
        node.prev = watermark;
        self.link_after(watermark, id);
    }

    /// Recycle every node created after `watermark`, newest first.
    fn recycle_to(&mut self, watermark: Option<NodeId>) {
        let mut pending = mem::take(&mut self.scratch);
        let mut recycled = 0;

        while self.tail != watermark {
            let Some(top) = self.tail else {
                panic!("rewind target {watermark:?} is no longer a top-level node");
            };
            self.tail = self.node(top).prev;

            pending.push(top);
            while let Some(id) = pending.pop() {
                let node = self.arena.free(id.0);
                recycled += 1;
                let mut child = node.first_child;
                while let Some(current) = child {
                    pending.push(current);
                    child = self.node(current).next;
                }
            }
        }

        match watermark {
            Some(mark) => self.node_mut(mark).next = None,
            None => self.head = None,
        }
        self.scratch = pending;

        if recycled > 0 {
            self.stats.recycled += recycled;
            tracing::trace!(recycled, live = self.arena.len(), "recycled speculative nodes");
        }
    }
}

impl<A, K, Cm> Context for TreeContext<A, K, Cm>
where
    A: Copy + Debug,
    K: Copy,
    Cm: Compare<A>,
{
    type Atom = A;
    type Checkpoint = TreeCheckpoint;

    #[inline]
    fn compare(&self, a: &A, b: &A) -> Ordering {
        self.compare.compare(a, b)
    }

    #[inline]
    fn checkpoint(&self) -> TreeCheckpoint {
        TreeCheckpoint {
            tail: self.tail,
            backrefs: self.backrefs.mark(),
        }
    }

    fn rewind(&mut self, _span: Span<'_, A>, to: TreeCheckpoint) {
        self.recycle_to(to.tail);
        self.backrefs.restore(to.backrefs);
    }

    /// Drop every node and rewind the arena to its first slab, keeping the
    /// slab memory for the next parse.
    fn reset(&mut self) {
        tracing::debug!(
            nodes = self.arena.len(),
            slabs = self.arena.slab_count(),
            created = self.stats.created,
            recycled = self.stats.recycled,
            "resetting tree context"
        );
        self.arena.reset();
        self.head = None;
        self.tail = None;
        self.backrefs.clear();
        self.stats = TreeStats::default();
    }

    #[inline]
    fn backrefs(&mut self) -> Option<&mut Backrefs> {
        Some(&mut self.backrefs)
    }
}
