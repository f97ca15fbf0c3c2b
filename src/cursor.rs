//! Stateful positions in an `AvlTree`.

use compare::Compare;
use std::error::Error;
use std::fmt::{self, Display};
use super::node::{Dir, Left, NodeId, Nodes, Right};
use super::tree::{AvlTree, TreeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Position {
    BeforeFirst,
    OnElement(NodeId),
    PastRear,
}

/// An error returned by a cursor operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorError {
    /// The cursor was created by a different tree.
    ForeignTree,
    /// The tree has gained or lost an entry since the cursor was created or last repositioned
    /// by [`AvlTree::remove_at`](struct.AvlTree.html#method.remove_at).
    Stale,
    /// The operation needs an entry, but the cursor is before the first or past the rear one.
    InvalidPosition,
}

impl Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            CursorError::ForeignTree => "cursor belongs to a different tree",
            CursorError::Stale => "cursor was invalidated by a change to the tree",
            CursorError::InvalidPosition => "cursor is not on an element",
        })
    }
}

impl Error for CursorError {}

/// A position in an [`AvlTree`](struct.AvlTree.html): before the first entry, on an entry, or
/// past the rear one.
///
/// A cursor is a detached, copyable position. It borrows its tree only for the duration of each
/// call, and every call checks that the tree is the one that created the cursor and that the
/// tree has not gained or lost entries since.
///
/// # Examples
///
/// ```
/// let tree: avl_sequence::AvlTree<_, _> = vec![(5, 'e'), (1, 'a'), (3, 'c')].into_iter().collect();
///
/// let mut cursor = tree.front();
/// let mut keys = vec![];
///
/// while cursor.is_on_element(&tree) {
///     keys.push(*cursor.key(&tree));
///     cursor.advance(&tree).unwrap();
/// }
///
/// assert_eq!(keys, [1, 3, 5]);
/// assert!(cursor.is_past_rear(&tree));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    tree: TreeId,
    generation: u64,
    position: Position,
}

impl Cursor {
    pub(crate) fn new(tree: TreeId, generation: u64, position: Position) -> Self {
        Cursor { tree: tree, generation: generation, position: position }
    }

    pub(crate) fn tree(&self) -> TreeId { self.tree }

    pub(crate) fn generation(&self) -> u64 { self.generation }

    pub(crate) fn position(&self) -> Position { self.position }

    /// Checks if the cursor is before the first entry.
    ///
    /// Returns `false` for a cursor that is stale or belongs to another tree.
    pub fn is_before_first<K, V, C>(&self, tree: &AvlTree<K, V, C>) -> bool where C: Compare<K> {
        tree.check(self) == Ok(Position::BeforeFirst)
    }

    /// Checks if the cursor is on an entry.
    ///
    /// Returns `false` for a cursor that is stale or belongs to another tree.
    pub fn is_on_element<K, V, C>(&self, tree: &AvlTree<K, V, C>) -> bool where C: Compare<K> {
        match tree.check(self) {
            Ok(Position::OnElement(_)) => true,
            _ => false,
        }
    }

    /// Checks if the cursor is past the rear entry.
    ///
    /// Returns `false` for a cursor that is stale or belongs to another tree.
    pub fn is_past_rear<K, V, C>(&self, tree: &AvlTree<K, V, C>) -> bool where C: Compare<K> {
        tree.check(self) == Ok(Position::PastRear)
    }

    /// Moves the cursor to the next entry in key order.
    ///
    /// A cursor before the first entry moves onto it; a cursor on the last entry moves past the
    /// rear; a cursor past the rear stays there. Does nothing on an empty tree.
    pub fn advance<K, V, C>(&mut self, tree: &AvlTree<K, V, C>) -> Result<(), CursorError>
        where C: Compare<K> {

        tree.check(self)?;
        self.position = step::<Right, _, _>(tree.nodes(), self.position);
        Ok(())
    }

    /// Moves the cursor to the previous entry in key order.
    ///
    /// A cursor past the rear moves onto the last entry; a cursor on the first entry moves before
    /// it; a cursor before the first entry stays there. Does nothing on an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// let tree: avl_sequence::AvlTree<_, _> = (1..3).map(|k| (k, ())).collect();
    ///
    /// let mut cursor = tree.find(&1);
    /// cursor.rewind(&tree).unwrap();
    /// assert!(cursor.is_before_first(&tree));
    ///
    /// cursor.rewind(&tree).unwrap();
    /// assert!(cursor.is_before_first(&tree));
    ///
    /// cursor.advance(&tree).unwrap();
    /// assert_eq!(cursor.key(&tree), &1);
    /// ```
    pub fn rewind<K, V, C>(&mut self, tree: &AvlTree<K, V, C>) -> Result<(), CursorError>
        where C: Compare<K> {

        tree.check(self)?;
        self.position = step::<Left, _, _>(tree.nodes(), self.position);
        Ok(())
    }

    /// Advances the cursor `offset` times, or rewinds it `-offset` times if `offset` is negative.
    ///
    /// Takes time linear in `offset`.
    ///
    /// # Examples
    ///
    /// ```
    /// let tree: avl_sequence::AvlTree<_, _> = (0..10).map(|k| (k, ())).collect();
    ///
    /// let mut cursor = tree.front();
    /// cursor.shift(&tree, 4).unwrap();
    /// assert_eq!(cursor.key(&tree), &4);
    ///
    /// cursor.shift(&tree, -2).unwrap();
    /// assert_eq!(cursor.key(&tree), &2);
    ///
    /// cursor.shift(&tree, 100).unwrap();
    /// assert!(cursor.is_past_rear(&tree));
    /// ```
    pub fn shift<K, V, C>(&mut self, tree: &AvlTree<K, V, C>, offset: isize)
        -> Result<(), CursorError> where C: Compare<K> {

        tree.check(self)?;
        let nodes = tree.nodes();

        for _ in 0..offset.unsigned_abs() {
            let next = if offset > 0 {
                step::<Right, _, _>(nodes, self.position)
            } else {
                step::<Left, _, _>(nodes, self.position)
            };

            // Parked on a sentinel.
            if next == self.position { break; }
            self.position = next;
        }

        Ok(())
    }

    /// Moves the cursor to the entry with the given zero-based rank in key order.
    ///
    /// A negative position leaves the cursor before the first entry and a position of at least
    /// `tree.len()` leaves it past the rear. Takes time linear in `pos`.
    ///
    /// # Examples
    ///
    /// ```
    /// let tree: avl_sequence::AvlTree<_, _> = (10..20).map(|k| (k, ())).collect();
    ///
    /// let mut cursor = tree.past_rear();
    /// cursor.set_position(&tree, 3).unwrap();
    /// assert_eq!(cursor.key(&tree), &13);
    ///
    /// cursor.set_position(&tree, -1).unwrap();
    /// assert!(cursor.is_before_first(&tree));
    /// ```
    pub fn set_position<K, V, C>(&mut self, tree: &AvlTree<K, V, C>, pos: isize)
        -> Result<(), CursorError> where C: Compare<K> {

        tree.check(self)?;
        self.position = Position::BeforeFirst;
        self.shift(tree, pos.saturating_add(1))
    }

    /// Returns the key and value of the entry the cursor is on.
    pub fn entry<'a, K, V, C>(&self, tree: &'a AvlTree<K, V, C>)
        -> Result<(&'a K, &'a V), CursorError> where C: Compare<K> {

        match tree.check(self)? {
            Position::OnElement(id) => {
                let node = &tree.nodes()[id];
                Ok((&node.key, &node.value))
            }
            _ => Err(CursorError::InvalidPosition),
        }
    }

    /// Returns a reference to the value of the entry the cursor is on.
    pub fn value<'a, K, V, C>(&self, tree: &'a AvlTree<K, V, C>) -> Result<&'a V, CursorError>
        where C: Compare<K> {

        self.entry(tree).map(|e| e.1)
    }

    /// Returns a mutable reference to the value of the entry the cursor is on.
    ///
    /// Writing through the reference does not change the tree's shape, so cursors stay valid.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut tree: avl_sequence::AvlTree<_, _> = (1..4).map(|k| (k, k)).collect();
    ///
    /// let cursor = tree.find(&2);
    /// *cursor.value_mut(&mut tree).unwrap() *= 10;
    /// assert_eq!(cursor.value(&tree), Ok(&20));
    /// ```
    pub fn value_mut<'a, K, V, C>(&self, tree: &'a mut AvlTree<K, V, C>)
        -> Result<&'a mut V, CursorError> where C: Compare<K> {

        match tree.check(self)? {
            Position::OnElement(id) => Ok(&mut tree.nodes_mut()[id].value),
            _ => Err(CursorError::InvalidPosition),
        }
    }

    /// Returns a reference to the key of the entry the cursor is on.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not on an entry, is stale, or belongs to another tree.
    pub fn key<'a, K, V, C>(&self, tree: &'a AvlTree<K, V, C>) -> &'a K where C: Compare<K> {
        match self.entry(tree) {
            Ok((key, _)) => key,
            Err(err) => panic!("cursor has no current key: {}", err),
        }
    }
}

// Moves one entry in direction `D`, entering the tree from the sentinel behind it and leaving
// through the sentinel ahead of it.
fn step<D, K, V>(nodes: &Nodes<K, V>, position: Position) -> Position where D: Dir {
    let (behind, ahead) =
        if D::left() { (Position::PastRear, Position::BeforeFirst) }
        else { (Position::BeforeFirst, Position::PastRear) };

    let next = match (position, nodes.root) {
        (_, None) => return position,
        (Position::OnElement(id), _) => nodes.neighbor::<D>(id),
        (position, Some(root)) if position == behind => Some(nodes.extremum::<D::Opposite>(root)),
        _ => return position,
    };

    next.map_or(ahead, Position::OnElement)
}
