use super::handle::Handle;
use super::raw_osrbtree_map::RawOSRBTreeMap;
use crate::InvariantViolation;

impl<K: Ord, V> RawOSRBTreeMap<K, V> {
    /// Checks every left-leaning red-black invariant and returns the black
    /// height of the tree: the number of black nodes on each path from the
    /// root to an absent child.
    pub(crate) fn validate(&self) -> Result<usize, InvariantViolation> {
        let result = self.check_tree();
        if let Err(violation) = &result {
            log::debug!("tree of {} entries failed validation: {violation}", self.len());
        }
        result
    }

    fn check_tree(&self) -> Result<usize, InvariantViolation> {
        let Some(root) = self.root() else {
            return match self.node_count() {
                0 => Ok(0),
                allocated => Err(InvariantViolation::LengthMismatch { reachable: 0, allocated }),
            };
        };
        if self.node(root).is_red() {
            return Err(InvariantViolation::RedRoot);
        }

        let (black_height, reachable) = self.check_subtree(root, None, None)?;
        let allocated = self.node_count();
        if reachable != allocated {
            return Err(InvariantViolation::LengthMismatch { reachable, allocated });
        }
        Ok(black_height)
    }

    /// Returns `(black height, node count)` of the subtree at `handle`, whose
    /// keys must all lie strictly between `lower` and `upper`.
    fn check_subtree(
        &self,
        handle: Handle,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<(usize, usize), InvariantViolation> {
        let node = self.node(handle);
        if lower.is_some_and(|lo| *lo >= node.key) || upper.is_some_and(|hi| node.key >= *hi) {
            return Err(InvariantViolation::OutOfOrder);
        }
        if self.is_red(node.right) {
            return Err(InvariantViolation::RightLeaningRed);
        }
        if node.is_red() && self.is_red(node.left) {
            return Err(InvariantViolation::ConsecutiveReds);
        }

        let (left_height, left_count) = match node.left {
            Some(left) => self.check_subtree(left, lower, Some(&node.key))?,
            None => (0, 0),
        };
        let (right_height, right_count) = match node.right {
            Some(right) => self.check_subtree(right, Some(&node.key), upper)?,
            None => (0, 0),
        };
        if left_height != right_height {
            return Err(InvariantViolation::BlackHeightMismatch {
                left: left_height,
                right: right_height,
            });
        }

        let expected = 1 + left_count + right_count;
        let actual = node.size.to_usize();
        if actual != expected {
            return Err(InvariantViolation::SizeMismatch { expected, actual });
        }

        Ok((left_height + usize::from(!node.is_red()), expected))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::node::{Color, Node};
    use crate::raw::size::Size;

    fn valid_tree() -> RawOSRBTreeMap<u32, ()> {
        let mut tree = RawOSRBTreeMap::new();
        for k in 0..64 {
            tree.insert(k, ());
        }
        tree
    }

    fn root_node(tree: &mut RawOSRBTreeMap<u32, ()>) -> &mut Node<u32, ()> {
        let root = tree.root().unwrap();
        tree.node_mut(root)
    }

    #[test]
    fn balanced_tree_passes() {
        let tree = valid_tree();
        let black_height = tree.validate().unwrap();
        assert!(black_height >= 4);
    }

    #[test]
    fn detects_red_root() {
        let mut tree = valid_tree();
        root_node(&mut tree).color = Color::Red;
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot));
    }

    #[test]
    fn detects_stale_size() {
        let mut tree = valid_tree();
        root_node(&mut tree).size = Size::from_usize(63);
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::SizeMismatch {
                expected: 64,
                actual: 63
            })
        );
    }

    #[test]
    fn detects_unordered_keys() {
        let mut tree = valid_tree();
        let root = tree.root().unwrap();
        let left = tree.node(root).left.unwrap();
        tree.node_mut(left).key = 1_000;
        assert_eq!(tree.validate(), Err(InvariantViolation::OutOfOrder));
    }

    #[test]
    fn detects_right_leaning_red() {
        let mut tree = valid_tree();
        let root = tree.root().unwrap();
        let right = tree.node(root).right.unwrap();
        tree.node_mut(right).color = Color::Red;
        assert_eq!(tree.validate(), Err(InvariantViolation::RightLeaningRed));
    }

    #[test]
    fn detects_black_height_mismatch() {
        let mut tree = RawOSRBTreeMap::new();
        for k in [2u32, 1, 3] {
            tree.insert(k, ());
        }
        let root = tree.root().unwrap();
        let left = tree.node(root).left.unwrap();
        tree.node_mut(left).color = Color::Red;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::BlackHeightMismatch { left: 0, right: 1 })
        );
    }

    #[test]
    fn empty_tree_has_black_height_zero() {
        let tree: RawOSRBTreeMap<u32, ()> = RawOSRBTreeMap::new();
        assert_eq!(tree.validate(), Ok(0));
    }
}
