use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};
use super::size::Size;

/// Ancestors still to be visited during an in-order walk. A left-leaning
/// red-black tree is at most `2 * log2(n)` deep, so this stays inline for any
/// tree the arena can address.
type Spine = SmallVec<[Handle; 64]>;

/// The left-leaning red-black tree backing `OSRBTreeMap`.
///
/// Every recursive helper takes the handle of a subtree root and returns the
/// handle of the subtree root after it has been restructured; the caller
/// stores that handle back into its own child link. Nodes never point at
/// their parents.
#[derive(Clone)]
pub(crate) struct RawOSRBTreeMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

impl<K, V> RawOSRBTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Number of entries, read from the root's cached subtree size.
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        log::trace!("clearing tree of {} entries", self.len());
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Number of live nodes in the arena, independent of the tree links.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ─── Node primitives ────────────────────────────────────────────────────

    /// Absent links are black.
    #[inline]
    pub(crate) fn is_red(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|h| self.nodes.get(h).is_red())
    }

    /// Absent links hold no nodes.
    #[inline]
    pub(crate) fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |h| self.nodes.get(h).size.to_usize())
    }

    #[inline]
    fn left(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).left
    }

    #[inline]
    fn right(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).right
    }

    #[inline]
    fn left_of(&self, link: Option<Handle>) -> Option<Handle> {
        link.and_then(|h| self.left(h))
    }

    fn update_size(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let size = Size::of_children(self.size_of(node.left), self.size_of(node.right));
        self.nodes.get_mut(handle).size = size;
    }

    /// Inverts the colors of `handle` and both of its children, splitting a
    /// 4-node or merging three 2-nodes.
    fn flip_colors(&mut self, handle: Handle) {
        let node = self.nodes.get_mut(handle);
        node.color = node.color.flip();
        let children = [node.left, node.right];
        for child in children {
            let child = child.expect("`RawOSRBTreeMap::flip_colors()` - node is missing a child!");
            let child = self.nodes.get_mut(child);
            child.color = child.color.flip();
        }
    }

    /// Turns a right-leaning link into a left-leaning one.
    ///
    /// The risen child takes over the old root's color and size; the old root
    /// hangs off it through a red link.
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let risen = self.right(handle).expect("`RawOSRBTreeMap::rotate_left()` - no right child!");
        let inner = self.left(risen);

        let old = self.nodes.get_mut(handle);
        old.right = inner;
        let (color, size) = (old.color, old.size);
        old.color = Color::Red;

        let new = self.nodes.get_mut(risen);
        new.left = Some(handle);
        new.color = color;
        new.size = size;

        self.update_size(handle);
        risen
    }

    /// Mirror of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let risen = self.left(handle).expect("`RawOSRBTreeMap::rotate_right()` - no left child!");
        let inner = self.right(risen);

        let old = self.nodes.get_mut(handle);
        old.left = inner;
        let (color, size) = (old.color, old.size);
        old.color = Color::Red;

        let new = self.nodes.get_mut(risen);
        new.right = Some(handle);
        new.color = color;
        new.size = size;

        self.update_size(handle);
        risen
    }

    /// Restores the left-leaning invariants at `handle` on the way back up
    /// from an insertion or deletion, then recomputes its size.
    fn balance(&mut self, handle: Handle) -> Handle {
        let mut h = handle;
        if self.is_red(self.right(h)) && !self.is_red(self.left(h)) {
            h = self.rotate_left(h);
        }
        if self.is_red(self.left(h)) && self.is_red(self.left_of(self.left(h))) {
            h = self.rotate_right(h);
        }
        if self.is_red(self.left(h)) && self.is_red(self.right(h)) {
            self.flip_colors(h);
        }
        self.update_size(h);
        h
    }

    /// Borrows a red link from the right sibling so that the left child
    /// (black, with a black left child of its own) can lose a node.
    fn move_red_left(&mut self, handle: Handle) -> Handle {
        self.flip_colors(handle);
        let right = self.right(handle).expect("`RawOSRBTreeMap::move_red_left()` - no right sibling!");
        if self.is_red(self.left(right)) {
            let right = self.rotate_right(right);
            self.nodes.get_mut(handle).right = Some(right);
            let h = self.rotate_left(handle);
            self.flip_colors(h);
            return h;
        }
        handle
    }

    /// Mirror of [`move_red_left`](Self::move_red_left) for the right child.
    fn move_red_right(&mut self, handle: Handle) -> Handle {
        self.flip_colors(handle);
        if self.is_red(self.left_of(self.left(handle))) {
            let h = self.rotate_right(handle);
            self.flip_colors(h);
            return h;
        }
        handle
    }

    // ─── Deletion ───────────────────────────────────────────────────────────

    /// Colors the root red when both of its children are black, so a delete
    /// walk never starts from a lone black node.
    fn redden_root(&mut self, root: Handle) {
        if !self.is_red(self.left(root)) && !self.is_red(self.right(root)) {
            log::trace!("reddening root for delete walk");
            self.nodes.get_mut(root).color = Color::Red;
        }
    }

    fn set_root(&mut self, root: Option<Handle>) {
        if let Some(root) = root {
            self.nodes.get_mut(root).color = Color::Black;
        }
        self.root = root;
    }

    /// Splices the leftmost node out of the subtree at `handle`.
    fn delete_min(&mut self, handle: Handle) -> (Option<Handle>, (K, V)) {
        let Some(left) = self.left(handle) else {
            let node = self.nodes.take(handle);
            debug_assert!(node.right.is_none(), "minimum node has a right child");
            return (None, node.into_entry());
        };

        let mut h = handle;
        if !self.is_red(Some(left)) && !self.is_red(self.left(left)) {
            h = self.move_red_left(h);
        }
        let left = self.left(h).expect("`RawOSRBTreeMap::delete_min()` - left subtree vanished!");
        let (child, removed) = self.delete_min(left);
        self.nodes.get_mut(h).left = child;
        (Some(self.balance(h)), removed)
    }

    /// Splices the rightmost node out of the subtree at `handle`.
    fn delete_max(&mut self, handle: Handle) -> (Option<Handle>, (K, V)) {
        let mut h = handle;
        if self.is_red(self.left(h)) {
            h = self.rotate_right(h);
        }
        let Some(right) = self.right(h) else {
            let node = self.nodes.take(h);
            debug_assert!(node.left.is_none(), "maximum node has a left child");
            return (None, node.into_entry());
        };

        if !self.is_red(Some(right)) && !self.is_red(self.left(right)) {
            h = self.move_red_right(h);
        }
        let right = self.right(h).expect("`RawOSRBTreeMap::delete_max()` - right subtree vanished!");
        let (child, removed) = self.delete_max(right);
        self.nodes.get_mut(h).right = child;
        (Some(self.balance(h)), removed)
    }
}

impl<K: Ord, V> RawOSRBTreeMap<K, V> {
    // ─── Lookup ─────────────────────────────────────────────────────────────

    /// Returns the handle of the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut link = self.root;
        while let Some(h) = link {
            let node = self.nodes.get(h);
            link = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(h),
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|h| &self.nodes.get(h).value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.search(key)?;
        Some(&mut self.nodes.get_mut(h).value)
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.get(self.search(key)?);
        Some((&node.key, &node.value))
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.nodes.get(self.root?);
        while let Some(left) = node.left {
            node = self.nodes.get(left);
        }
        Some((&node.key, &node.value))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.nodes.get(self.root?);
        while let Some(right) = node.right {
            node = self.nodes.get(right);
        }
        Some((&node.key, &node.value))
    }

    // ─── Insertion ──────────────────────────────────────────────────────────

    /// Inserts or overwrites `key`, returning the previous value if any.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, replaced) = self.put(self.root, key, value);
        self.set_root(Some(root));
        replaced
    }

    fn put(&mut self, link: Option<Handle>, key: K, value: V) -> (Handle, Option<V>) {
        let Some(h) = link else {
            return (self.nodes.alloc(Node::new_leaf(key, value)), None);
        };

        let node = self.nodes.get_mut(h);
        let replaced = match key.cmp(&node.key) {
            Ordering::Less => {
                let left = node.left;
                let (child, replaced) = self.put(left, key, value);
                self.nodes.get_mut(h).left = Some(child);
                replaced
            }
            Ordering::Greater => {
                let right = node.right;
                let (child, replaced) = self.put(right, key, value);
                self.nodes.get_mut(h).right = Some(child);
                replaced
            }
            // Same key: the shape of the tree does not change.
            Ordering::Equal => return (h, Some(mem::replace(&mut node.value, value))),
        };
        (self.balance(h), replaced)
    }

    // ─── Deletion entry points ──────────────────────────────────────────────

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        self.redden_root(root);
        let (root, removed) = self.delete_min(root);
        self.set_root(root);
        Some(removed)
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        self.redden_root(root);
        let (root, removed) = self.delete_max(root);
        self.set_root(root);
        Some(removed)
    }

    /// Removes `key`, returning the stored key and value. A missing key
    /// leaves the tree untouched.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let root = self.root?;
        self.search(key)?;
        self.redden_root(root);
        let (root, removed) = self.delete(root, key);
        self.set_root(root);
        Some(removed)
    }

    /// Removes `key` from the subtree at `handle`. `key` must be present.
    fn delete<Q>(&mut self, handle: Handle, key: &Q) -> (Option<Handle>, (K, V))
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut h = handle;
        if key.cmp(self.nodes.get(h).key.borrow()) == Ordering::Less {
            let left = self.left(h).expect("`RawOSRBTreeMap::delete()` - `key` is not in the tree!");
            if !self.is_red(Some(left)) && !self.is_red(self.left(left)) {
                h = self.move_red_left(h);
            }
            let left = self.left(h).expect("`RawOSRBTreeMap::delete()` - left subtree vanished!");
            let (child, removed) = self.delete(left, key);
            self.nodes.get_mut(h).left = child;
            return (Some(self.balance(h)), removed);
        }

        if self.is_red(self.left(h)) {
            h = self.rotate_right(h);
        }
        if key.cmp(self.nodes.get(h).key.borrow()) == Ordering::Equal && self.right(h).is_none() {
            let node = self.nodes.take(h);
            debug_assert!(node.is_leaf(), "matched node without a right child has a left child");
            return (None, node.into_entry());
        }

        let right = self.right(h).expect("`RawOSRBTreeMap::delete()` - `key` is not in the tree!");
        if !self.is_red(Some(right)) && !self.is_red(self.left(right)) {
            h = self.move_red_right(h);
        }
        let right = self.right(h).expect("`RawOSRBTreeMap::delete()` - right subtree vanished!");
        let removed = if key.cmp(self.nodes.get(h).key.borrow()) == Ordering::Equal {
            // Two children: take over the in-order successor's entry.
            let (child, (successor_key, successor_value)) = self.delete_min(right);
            let node = self.nodes.get_mut(h);
            node.right = child;
            (mem::replace(&mut node.key, successor_key), mem::replace(&mut node.value, successor_value))
        } else {
            let (child, removed) = self.delete(right, key);
            self.nodes.get_mut(h).right = child;
            removed
        };
        (Some(self.balance(h)), removed)
    }

    // ─── Order statistics ───────────────────────────────────────────────────

    /// Handle of the node at zero-based position `rank`.
    fn select(&self, mut rank: usize) -> Option<Handle> {
        if rank >= self.len() {
            return None;
        }
        let mut link = self.root;
        while let Some(h) = link {
            let node = self.nodes.get(h);
            let below = self.size_of(node.left);
            match rank.cmp(&below) {
                Ordering::Less => link = node.left,
                Ordering::Greater => {
                    rank -= below + 1;
                    link = node.right;
                }
                Ordering::Equal => return Some(h),
            }
        }
        None
    }

    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        let node = self.nodes.get(self.select(rank)?);
        Some((&node.key, &node.value))
    }

    pub(crate) fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let h = self.select(rank)?;
        let node = self.nodes.get_mut(h);
        Some((&node.key, &mut node.value))
    }

    /// Number of keys strictly less than `key`, and whether `key` itself is
    /// present.
    fn position<Q>(&self, key: &Q) -> (usize, bool)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut below = 0;
        let mut link = self.root;
        while let Some(h) = link {
            let node = self.nodes.get(h);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => link = node.left,
                Ordering::Greater => {
                    below += 1 + self.size_of(node.left);
                    link = node.right;
                }
                Ordering::Equal => return (below + self.size_of(node.left), true),
            }
        }
        (below, false)
    }

    pub(crate) fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.position(key).0
    }

    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (rank, found) = self.position(key);
        found.then_some(rank)
    }

    /// Greatest key less than or equal to `key`.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut link = self.root;
        while let Some(h) = link {
            let node = self.nodes.get(h);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => link = node.left,
                Ordering::Greater => {
                    best = Some(&node.key);
                    link = node.right;
                }
                Ordering::Equal => return Some(&node.key),
            }
        }
        best
    }

    /// Least key greater than or equal to `key`.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut link = self.root;
        while let Some(h) = link {
            let node = self.nodes.get(h);
            match key.cmp(node.key.borrow()) {
                Ordering::Greater => link = node.right,
                Ordering::Less => {
                    best = Some(&node.key);
                    link = node.left;
                }
                Ordering::Equal => return Some(&node.key),
            }
        }
        best
    }

    /// Number of keys in `[lo, hi]`, computed from ranks alone.
    pub(crate) fn len_between<Q>(&self, lo: &Q, hi: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if lo > hi {
            return 0;
        }
        let (hi_rank, hi_found) = self.position(hi);
        hi_rank + usize::from(hi_found) - self.rank(lo)
    }

    /// Keys in `[lo, hi]` in ascending order.
    pub(crate) fn keys_between<Q>(&self, lo: &Q, hi: &Q) -> Vec<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut keys = Vec::new();
        if lo <= hi {
            self.collect_between(self.root, lo, hi, &mut keys);
        }
        keys
    }

    /// In-order walk that skips every subtree lying wholly outside `[lo, hi]`.
    fn collect_between<'a, Q>(&'a self, link: Option<Handle>, lo: &Q, hi: &Q, keys: &mut Vec<&'a K>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(h) = link else {
            return;
        };
        let node = self.nodes.get(h);
        let key: &Q = node.key.borrow();
        if lo < key {
            self.collect_between(node.left, lo, hi, keys);
        }
        if lo <= key && key <= hi {
            keys.push(&node.key);
        }
        if hi > key {
            self.collect_between(node.right, lo, hi, keys);
        }
    }
}

impl<K, V> RawOSRBTreeMap<K, V> {
    /// All entries in ascending key order.
    pub(crate) fn entries(&self) -> Vec<(&K, &V)> {
        let mut entries = Vec::with_capacity(self.len());
        let mut spine = Spine::new();
        let mut link = self.root;
        loop {
            while let Some(h) = link {
                spine.push(h);
                link = self.nodes.get(h).left;
            }
            let Some(h) = spine.pop() else {
                break;
            };
            let node = self.nodes.get(h);
            entries.push((&node.key, &node.value));
            link = node.right;
        }
        entries
    }
}
