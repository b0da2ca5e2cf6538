//! Depth-first pre-order traversal.

/// Pre-order tree walker parameterized by a "children if container"
/// function.
///
/// The traversal stack is internal; callers only see nodes and depths.
pub struct Walker<C> {
    children_of: C,
}

impl<C> Walker<C> {
    /// Create a walker. `children_of` returns `None` for leaves.
    pub fn new(children_of: C) -> Self {
        Self { children_of }
    }

    /// Visit every node reachable from `root`, parents before children,
    /// siblings in order. The root has depth 0.
    pub fn walk<N, I, V>(&self, root: N, mut visit: V)
    where
        C: Fn(&N) -> Option<I>,
        I: IntoIterator<Item = N>,
        V: FnMut(&N, usize),
    {
        let mut stack = vec![(root, 0)];
        while let Some((node, depth)) = stack.pop() {
            visit(&node, depth);
            if let Some(children) = (self.children_of)(&node) {
                let children: Vec<N> = children.into_iter().collect();
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }

    /// Pre-order snapshot of `(node, depth)` pairs.
    pub fn collect<N, I>(&self, root: N) -> Vec<(N, usize)>
    where
        C: Fn(&N) -> Option<I>,
        I: IntoIterator<Item = N>,
        N: Clone,
    {
        let mut out = Vec::new();
        self.walk(root, |node, depth| out.push((node.clone(), depth)));
        out
    }
}
