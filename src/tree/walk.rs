// Read-only traversal of a built tree.

use super::{NodeId, TreeContext};

/// Iterator over a sibling list. See [`TreeContext::roots`] and
/// [`TreeContext::children`].
pub struct Siblings<'t, A, K, Cm> {
    tree: &'t TreeContext<A, K, Cm>,
    next: Option<NodeId>,
}

/// Depth-first, parent-before-children traversal yielding
/// `(depth, node)` pairs. See [`TreeContext::preorder`].
pub struct Preorder<'t, A, K, Cm> {
    tree: &'t TreeContext<A, K, Cm>,
    stack: Vec<(usize, NodeId)>,
}

impl<A, K: Copy, Cm> Iterator for Siblings<'_, A, K, Cm> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.node(id).next();
        Some(id)
    }
}

impl<A, K: Copy, Cm> Iterator for Preorder<'_, A, K, Cm> {
    type Item = (usize, NodeId);

    fn next(&mut self) -> Option<(usize, NodeId)> {
        let (depth, id) = self.stack.pop()?;
        // Push children last-to-first so the first child pops next.
        let mut child = self.tree.node(id).last_child();
        while let Some(current) = child {
            self.stack.push((depth + 1, current));
            child = self.tree.node(current).prev();
        }
        Some((depth, id))
    }
}

impl<A, K: Copy, Cm> TreeContext<A, K, Cm> {
    /// The top-level nodes, in input order.
    pub fn roots(&self) -> Siblings<'_, A, K, Cm> {
        Siblings {
            tree: self,
            next: self.head,
        }
    }

    /// The children of `id`, in input order.
    pub fn children(&self, id: NodeId) -> Siblings<'_, A, K, Cm> {
        Siblings {
            tree: self,
            next: self.node(id).first_child(),
        }
    }

    /// Every node of the forest in preorder, with its depth below the top
    /// level.
    pub fn preorder(&self) -> Preorder<'_, A, K, Cm> {
        let mut stack = Vec::new();
        let mut root = self.tail;
        while let Some(current) = root {
            stack.push((0, current));
            root = self.node(current).prev();
        }
        Preorder { tree: self, stack }
    }

    /// The atoms `id` consumed out of `source`, which must be the input the
    /// tree was built from.
    pub fn text<'s>(&self, id: NodeId, source: &'s [A]) -> &'s [A] {
        &source[self.node(id).span()]
    }
}

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::matcher::{Matcher, atom, range, seq, some};
    use crate::span::Span;
    use crate::tree::{TreeContext, capture};

    #[test]
    fn walks_in_input_order() {
        let input = "ab.cd";
        let word = capture('w', some(range(b'a', b'z')));
        let pair = capture('p', seq((word, atom(b'.'), word)));

        let mut ctx = TreeContext::<u8, char>::new();
        assert!(pair.matches(&mut ctx, Span::from(input)).is_valid());

        let roots: Vec<_> = ctx.roots().collect();
        assert_eq!(roots.len(), 1);
        let words: Vec<_> = ctx
            .children(roots[0])
            .map(|id| ctx.text(id, input.as_bytes()))
            .collect();
        assert_eq!(words, vec![b"ab".as_slice(), b"cd".as_slice()]);

        let order: Vec<_> = ctx
            .preorder()
            .map(|(depth, id)| (depth, ctx.node(id).tag()))
            .collect();
        assert_eq!(order, vec![(0, Some('p')), (1, Some('w')), (1, Some('w'))]);
    }

    #[test]
    fn empty_forest_walks_nothing() {
        let mut ctx = TreeContext::<u8, char>::new();
        ctx.reset();
        assert_eq!(ctx.roots().count(), 0);
        assert_eq!(ctx.preorder().count(), 0);
    }
}
