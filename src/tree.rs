//! An ordered key-indexed sequence based on an AVL tree.

use compare::{Compare, Natural};
use log::debug;
use std::fmt::{self, Debug};
use std::ops;
use std::sync::atomic::{AtomicU64, Ordering};
use super::cursor::{Cursor, CursorError, Position};
use super::node::{self, Iter, Link, Nodes};

/// Identifies one tree for the lifetime of the process, so cursors can tell trees apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        TreeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An ordered key-indexed sequence based on an AVL tree.
///
/// Entries are kept in key order as determined by the tree's comparator. Lookups, insertions and
/// removals take logarithmic time. Positions in the sequence are represented by
/// [`Cursor`](struct.Cursor.html)s, which are created by the tree and stepped independently of
/// it.
///
/// Every insertion of a new key and every removal bumps the tree's generation. A cursor created
/// before such a change is stale, and every operation on it reports
/// [`CursorError::Stale`](enum.CursorError.html) instead of reading a moved or freed node. The
/// only exception is the cursor passed to [`remove_at`](#method.remove_at), which is
/// repositioned onto the removed entry's successor.
///
/// The behavior of this tree is unspecified if a key's ordering relative to any other key changes
/// while the key is in the tree.
pub struct AvlTree<K, V, C = Natural<K>> where C: Compare<K> {
    nodes: Nodes<K, V>,
    cmp: C,
    id: TreeId,
    generation: u64,
}

impl<K, V> AvlTree<K, V> where K: Ord {
    /// Creates an empty tree ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree = avl_sequence::AvlTree::new();
    ///
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    ///
    /// let mut it = tree.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { AvlTree::with_cmp(compare::natural()) }
}

impl<K, V, C> AvlTree<K, V, C> where C: Compare<K> {
    /// Creates an empty tree ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut tree = avl_sequence::AvlTree::with_cmp(natural().rev());
    ///
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    ///
    /// let mut it = tree.iter();
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        AvlTree { nodes: Nodes::new(), cmp: cmp, id: TreeId::next(), generation: 0 }
    }

    /// Checks if the tree is empty.
    pub fn is_empty(&self) -> bool { self.nodes.root.is_none() }

    /// Returns the number of entries in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree = avl_sequence::AvlTree::new();
    /// assert_eq!(tree.len(), 0);
    ///
    /// tree.insert(2, "b");
    /// tree.insert(2, "bb");
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns the number of levels in the tree, which is zero for an empty tree.
    ///
    /// An AVL tree holding `n` entries never has more than `1.4405 * log2(n + 2) - 0.3277`
    /// levels.
    ///
    /// # Examples
    ///
    /// ```
    /// let tree: avl_sequence::AvlTree<_, _> = (0..7).map(|k| (k, ())).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn height(&self) -> usize { (self.nodes.height(self.nodes.root) + 1) as usize }

    /// Returns a reference to the tree's comparator.
    pub fn cmp(&self) -> &C { &self.cmp }

    /// Removes all entries from the tree, invalidating every cursor.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.touch();
    }

    /// Inserts an entry into the tree, returning the previous value, if any, associated with the
    /// key.
    ///
    /// Overwriting the value of a present key does not change the tree's shape and leaves
    /// existing cursors valid. Inserting a new key invalidates them.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree = avl_sequence::AvlTree::new();
    /// assert_eq!(tree.insert(1, "a"), None);
    /// assert_eq!(tree.get(&1), Some(&"a"));
    /// assert_eq!(tree.insert(1, "b"), Some("a"));
    /// assert_eq!(tree.get(&1), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let old_value = node::insert(&mut self.nodes, &self.cmp, key, value);
        if old_value.is_none() { self.touch(); }
        old_value
    }

    /// Removes and returns the entry whose key is equal to the given key, returning `None` if the
    /// tree does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree = avl_sequence::AvlTree::new();
    ///
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    /// tree.insert(3, "c");
    ///
    /// assert_eq!(tree.remove(&1), Some((1, "a")));
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        let link = self.nodes.find(&self.cmp, key);
        self.remove_link(link)
    }

    /// Removes and returns the entry with the smallest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree: avl_sequence::AvlTree<_, _> = vec![(2, "b"), (1, "a")].into_iter().collect();
    ///
    /// assert_eq!(tree.remove_front(), Some((1, "a")));
    /// assert_eq!(tree.remove_front(), Some((2, "b")));
    /// assert_eq!(tree.remove_front(), None);
    /// ```
    pub fn remove_front(&mut self) -> Option<(K, V)> {
        let link = self.nodes.first();
        self.remove_link(link)
    }

    /// Removes and returns the entry with the largest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree: avl_sequence::AvlTree<_, _> = vec![(2, "b"), (1, "a")].into_iter().collect();
    ///
    /// assert_eq!(tree.remove_rear(), Some((2, "b")));
    /// assert_eq!(tree.remove_rear(), Some((1, "a")));
    /// assert_eq!(tree.remove_rear(), None);
    /// ```
    pub fn remove_rear(&mut self) -> Option<(K, V)> {
        let link = self.nodes.last();
        self.remove_link(link)
    }

    /// Removes and returns the entry the cursor is on, moving the cursor to the entry's in-order
    /// successor, or past the rear if it was the last one.
    ///
    /// The given cursor stays valid; every other cursor into this tree becomes stale.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree: avl_sequence::AvlTree<_, _> = (1..4).map(|k| (k, k * 10)).collect();
    ///
    /// let mut cursor = tree.find(&2);
    /// assert_eq!(tree.remove_at(&mut cursor), Ok((2, 20)));
    /// assert_eq!(cursor.key(&tree), &3);
    ///
    /// assert_eq!(tree.remove_at(&mut cursor), Ok((3, 30)));
    /// assert!(cursor.is_past_rear(&tree));
    /// ```
    pub fn remove_at(&mut self, cursor: &mut Cursor) -> Result<(K, V), CursorError> {
        let id = match self.check(cursor)? {
            Position::OnElement(id) => id,
            _ => return Err(CursorError::InvalidPosition),
        };

        let (key_value, next) = node::remove(&mut self.nodes, id);
        self.touch();
        *cursor = self.cursor(next.map_or(Position::PastRear, Position::OnElement));
        Ok(key_value)
    }

    /// Checks if the tree contains the given key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        self.nodes.find(&self.cmp, key).is_some()
    }

    /// Returns a reference to the value associated with the given key, or `None` if the tree
    /// does not contain the key.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.nodes.find(&self.cmp, key).map(|id| &self.nodes[id].value)
    }

    /// Returns a mutable reference to the value associated with the given key, or `None` if the
    /// tree does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree = avl_sequence::AvlTree::new();
    /// tree.insert(1, "a");
    ///
    /// if let Some(value) = tree.get_mut(&1) { *value = "b"; }
    /// assert_eq!(tree.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        match self.nodes.find(&self.cmp, key) {
            Some(id) => Some(&mut self.nodes[id].value),
            None => None,
        }
    }

    /// Returns the entry with the smallest key, or `None` if the tree is empty.
    pub fn first(&self) -> Option<(&K, &V)> { self.key_value(self.nodes.first()) }

    /// Returns the entry with the largest key, or `None` if the tree is empty.
    pub fn last(&self) -> Option<(&K, &V)> { self.key_value(self.nodes.last()) }

    /// Returns an iterator over the tree's entries in ascending key order.
    pub fn iter(&self) -> Iter<K, V> { self.nodes.iter() }

    /// Returns a cursor on the entry with the smallest key, or past the rear if the tree is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree = avl_sequence::AvlTree::new();
    /// assert!(tree.front().is_past_rear(&tree));
    ///
    /// tree.insert(2, "b");
    /// tree.insert(1, "a");
    ///
    /// let mut cursor = tree.front();
    /// assert_eq!(cursor.value(&tree), Ok(&"a"));
    /// cursor.advance(&tree).unwrap();
    /// assert_eq!(cursor.value(&tree), Ok(&"b"));
    /// cursor.advance(&tree).unwrap();
    /// assert!(cursor.is_past_rear(&tree));
    /// ```
    pub fn front(&self) -> Cursor {
        self.cursor(self.nodes.first().map_or(Position::PastRear, Position::OnElement))
    }

    /// Returns a cursor past the rear of the tree, whatever its contents.
    ///
    /// # Examples
    ///
    /// ```
    /// let tree: avl_sequence::AvlTree<_, _> = (1..4).map(|k| (k, ())).collect();
    ///
    /// let mut cursor = tree.past_rear();
    /// cursor.rewind(&tree).unwrap();
    /// assert_eq!(cursor.key(&tree), &3);
    /// ```
    pub fn past_rear(&self) -> Cursor { self.cursor(Position::PastRear) }

    /// Returns a cursor on the entry with the given key, or past the rear if the tree does not
    /// contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let tree: avl_sequence::AvlTree<_, _> = (1..4).map(|k| (k, k * 10)).collect();
    ///
    /// assert_eq!(tree.find(&2).value(&tree), Ok(&20));
    /// assert!(tree.find(&7).is_past_rear(&tree));
    /// ```
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        let link = self.nodes.find(&self.cmp, key);
        self.cursor(link.map_or(Position::PastRear, Position::OnElement))
    }

    /// Returns the cursor's position if it was created by this tree and is not stale.
    pub(crate) fn check(&self, cursor: &Cursor) -> Result<Position, CursorError> {
        if cursor.tree() != self.id {
            debug!("rejecting cursor of {:?} passed to {:?}", cursor.tree(), self.id);
            return Err(CursorError::ForeignTree);
        }

        if cursor.generation() != self.generation {
            debug!("rejecting cursor of generation {} on {:?} at generation {}",
                   cursor.generation(), self.id, self.generation);
            return Err(CursorError::Stale);
        }

        Ok(cursor.position())
    }

    pub(crate) fn nodes(&self) -> &Nodes<K, V> { &self.nodes }

    pub(crate) fn nodes_mut(&mut self) -> &mut Nodes<K, V> { &mut self.nodes }

    fn cursor(&self, position: Position) -> Cursor {
        Cursor::new(self.id, self.generation, position)
    }

    fn touch(&mut self) { self.generation = self.generation.wrapping_add(1); }

    fn key_value(&self, link: Link) -> Option<(&K, &V)> {
        link.map(|id| { let node = &self.nodes[id]; (&node.key, &node.value) })
    }

    fn remove_link(&mut self, link: Link) -> Option<(K, V)> {
        let (key_value, _) = node::remove(&mut self.nodes, link?);
        self.touch();
        Some(key_value)
    }
}

impl<K, V, C> Clone for AvlTree<K, V, C> where K: Clone, V: Clone, C: Compare<K> + Clone {
    /// Clones the tree's entries into a new tree. Cursors of the original are foreign to the
    /// clone.
    fn clone(&self) -> Self {
        AvlTree { nodes: self.nodes.clone(), cmp: self.cmp.clone(), id: TreeId::next(), generation: 0 }
    }
}

impl<K, V, C> Debug for AvlTree<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Default for AvlTree<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { AvlTree::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for AvlTree<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.insert(k, v); }
    }
}

impl<K, V, C> FromIterator<(K, V)> for AvlTree<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(it: I) -> Self {
        let mut tree: AvlTree<K, V, C> = Default::default();
        tree.extend(it);
        tree
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for AvlTree<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;
    fn index(&self, key: &'a Q) -> &V { self.get(key).expect("key not found") }
}

impl<'a, K, V, C> IntoIterator for &'a AvlTree<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<K, V, C> PartialEq for AvlTree<K, V, C> where K: PartialEq, V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, C> Eq for AvlTree<K, V, C> where K: Eq, V: Eq, C: Compare<K> {}
