/// One node of a synthetic complete binary tree.
///
/// `val` holds the height that remained when the node was built, so the root of a
/// tree of height `h` has `val == h` and leaves have `val == 1`.
#[derive(Debug)]
pub struct TreeNode {
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
    pub val: u32,
}

/// Builds a complete binary tree of the given height.
///
/// Height 0 allocates nothing and returns `None`. Any other height allocates
/// exactly `2^height - 1` nodes. Recursion depth equals `height`, not the node count.
///
/// # Examples
///
/// ```
/// use rdiluvian::build_tree;
///
/// assert!(build_tree(0).is_none());
/// let root = build_tree(3).unwrap();
/// assert_eq!(root.val, 3);
/// assert_eq!(root.node_count(), 7);
/// ```
pub fn build_tree(height: u32) -> Option<Box<TreeNode>> {
    if height == 0 {
        return None;
    }

    let mut node = Box::new(TreeNode {
        left: None,
        right: None,
        val: 0,
    });
    node.left = build_tree(height - 1);
    node.right = build_tree(height - 1);
    node.val = height;
    Some(node)
}

/// Number of nodes `build_tree(height)` allocates.
pub fn expected_node_count(height: u32) -> u64 {
    (1u64 << height) - 1
}

impl TreeNode {
    /// Counts this node and all of its descendants.
    pub fn node_count(&self) -> u64 {
        let left = self.left.as_ref().map_or(0, |n| n.node_count());
        let right = self.right.as_ref().map_or(0, |n| n.node_count());
        1 + left + right
    }

    /// Length of the longest root-to-leaf path, counted in nodes.
    pub fn height(&self) -> u32 {
        let left = self.left.as_ref().map_or(0, |n| n.height());
        let right = self.right.as_ref().map_or(0, |n| n.height());
        1 + left.max(right)
    }

    /// Checks the shape invariant: every node with `val == h` has either two
    /// children of `val == h - 1` or, when `h == 1`, no children at all.
    pub fn is_complete(&self) -> bool {
        match (&self.left, &self.right) {
            (None, None) => self.val == 1,
            (Some(l), Some(r)) => {
                l.val + 1 == self.val && r.val + 1 == self.val && l.is_complete() && r.is_complete()
            }
            _ => false,
        }
    }
}
