use super::handle::Handle;
use super::size::Size;

/// Color of the link from a node's parent to the node.
///
/// A red link glues a node to its parent into one 3-node (or, transiently, a
/// 4-node); a black link is an ordinary 2-3 tree edge. The root and every
/// absent child count as black.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub(crate) const fn flip(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// A single key-value entry and its two owned subtrees.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) color: Color,
    // Nodes in the subtree rooted here, including this one.
    pub(crate) size: Size,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// A fresh leaf. New keys always join the tree through a red link.
    pub(crate) const fn new_leaf(key: K, value: V) -> Self {
        Self {
            color: Color::Red,
            size: Size::ONE,
            key,
            value,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn flip_is_an_involution() {
        assert_eq!(Color::Red.flip(), Color::Black);
        assert_eq!(Color::Black.flip(), Color::Red);
        assert_eq!(Color::Red.flip().flip(), Color::Red);
    }

    #[test]
    fn new_leaf_is_red_with_size_one() {
        let node = Node::new_leaf("k", 7);
        assert!(node.is_red());
        assert!(node.is_leaf());
        assert_eq!(node.size, Size::ONE);
        assert_eq!(node.into_entry(), ("k", 7));
    }
}
