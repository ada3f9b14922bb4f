use core::fmt;

/// A broken red-black tree invariant, as reported by
/// [`OSRBTreeMap::validate`](crate::OSRBTreeMap::validate).
///
/// The map's own operations never produce one of these; seeing one means a
/// key's `Ord` implementation is not a total order or its ordering changed
/// while it was stored in the map.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum InvariantViolation {
    /// The root is colored red.
    RedRoot,
    /// A node is attached to its parent's right side through a red link.
    RightLeaningRed,
    /// A red node has a red left child.
    ConsecutiveReds,
    /// The two subtrees of some node have different black heights.
    BlackHeightMismatch {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A node's cached subtree size disagrees with its children.
    SizeMismatch {
        /// `1 + size(left) + size(right)`.
        expected: usize,
        /// The size stored in the node.
        actual: usize,
    },
    /// An in-order walk does not visit keys in strictly ascending order.
    OutOfOrder,
    /// The tree reaches a different number of nodes than are allocated.
    LengthMismatch {
        /// Nodes reachable from the root.
        reachable: usize,
        /// Nodes allocated.
        allocated: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => f.write_str("root node is red"),
            Self::RightLeaningRed => f.write_str("red link leans right"),
            Self::ConsecutiveReds => f.write_str("two consecutive red links"),
            Self::BlackHeightMismatch { left, right } => {
                write!(f, "unbalanced black height: left {left}, right {right}")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "subtree size is {actual}, children account for {expected}")
            }
            Self::OutOfOrder => f.write_str("keys are not in ascending order"),
            Self::LengthMismatch { reachable, allocated } => {
                write!(f, "{reachable} nodes reachable from the root but {allocated} allocated")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}
