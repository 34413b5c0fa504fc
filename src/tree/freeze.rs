// Copying a finished tree out of the speculative arena.
//
// The speculative arena is recycled on every reset, so anything that must
// outlive the next parse is copied into a caller-owned `bumpalo::Bump`.

use super::{NodeId, TreeContext};
use bumpalo::Bump;
use std::ops::Range;

/// An immutable node of a frozen tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrozenNode<'a, K> {
    tag: Option<K>,
    start: usize,
    end: usize,
    children: &'a [FrozenNode<'a, K>],
}

impl<'a, K: Copy> FrozenNode<'a, K> {
    #[inline]
    pub fn tag(&self) -> Option<K> {
        self.tag
    }

    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    #[inline]
    pub fn children(&self) -> &'a [FrozenNode<'a, K>] {
        self.children
    }

    /// The atoms this node consumed out of `source`.
    pub fn text<'s, A>(&self, source: &'s [A]) -> &'s [A] {
        &source[self.span()]
    }
}

impl<A, K: Copy, Cm> TreeContext<A, K, Cm> {
    /// Copy the current forest into `bump` and return its top-level nodes.
    ///
    /// The result borrows only `bump`, so the context can be reset and
    /// reused while the frozen tree lives on.
    pub fn freeze<'a>(&self, bump: &'a Bump) -> &'a [FrozenNode<'a, K>] {
        let roots: Vec<_> = self.roots().map(|id| self.freeze_node(id, bump)).collect();
        bump.alloc_slice_fill_iter(roots)
    }

    fn freeze_node<'a>(&self, id: NodeId, bump: &'a Bump) -> FrozenNode<'a, K> {
        let node = self.node(id);
        let children: Vec<_> = self
            .children(id)
            .map(|child| self.freeze_node(child, bump))
            .collect();
        FrozenNode {
            tag: node.tag(),
            start: node.start(),
            end: node.end(),
            children: bump.alloc_slice_fill_iter(children),
        }
    }
}
