mod iter;


use compare::Compare;
use slab::Slab;
use std::cmp::max;
use std::cmp::Ordering::*;
use std::mem::replace;
use std::ops::{Index, IndexMut};
use super::balance::Mode;

pub use self::iter::Iter;

/// The slab index of a live node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

pub type Link = Option<NodeId>;

#[derive(Clone, Debug)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub left: Link,
    pub right: Link,
    pub parent: Link,
    pub height: isize,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, parent: Link) -> Self {
        Node { key: key, value: value, left: None, right: None, parent: parent, height: 0 }
    }
}

/// Every node owned by a tree, plus the link to its root.
///
/// Children and parents refer to each other by `NodeId`, so rotations and splices are plain
/// index rewrites.
#[derive(Clone)]
pub struct Nodes<K, V> {
    slab: Slab<Node<K, V>>,
    pub root: Link,
}

impl<K, V> Nodes<K, V> {
    pub fn new() -> Self { Nodes { slab: Slab::new(), root: None } }

    pub fn len(&self) -> usize { self.slab.len() }

    pub fn clear(&mut self) {
        self.slab.clear();
        self.root = None;
    }

    #[cfg(test)]
    pub fn contains(&self, id: NodeId) -> bool { self.slab.contains(id.0) }

    fn alloc(&mut self, node: Node<K, V>) -> NodeId { NodeId(self.slab.insert(node)) }

    fn free(&mut self, id: NodeId) -> Node<K, V> { self.slab.remove(id.0) }

    /// Height of the subtree behind `link`; an absent subtree has height -1.
    pub fn height(&self, link: Link) -> isize { link.map_or(-1, |id| self[id].height) }

    pub fn fix_height(&mut self, id: NodeId) {
        let height = 1 + max(self.height(self[id].left), self.height(self[id].right));
        self[id].height = height;
    }

    /// Left height minus right height.
    pub fn balance_factor(&self, id: NodeId) -> isize { self.lean::<Left>(id) }

    /// How much taller the node's `D` subtree is than its other one.
    pub fn lean<D>(&self, id: NodeId) -> isize where D: Dir {
        self.height(D::forward(&self[id])) - self.height(D::Opposite::forward(&self[id]))
    }

    /// Follows `D` links from `id` as far as they go.
    pub fn extremum<D>(&self, mut id: NodeId) -> NodeId where D: Dir {
        while let Some(next) = D::forward(&self[id]) { id = next; }
        id
    }

    /// The in-order neighbor of `id` in direction `D`: the successor for `Right`, the
    /// predecessor for `Left`.
    pub fn neighbor<D>(&self, id: NodeId) -> Link where D: Dir {
        if let Some(child) = D::forward(&self[id]) {
            return Some(self.extremum::<D::Opposite>(child));
        }

        let mut node = id;
        let mut parent = self[id].parent;

        while let Some(p) = parent {
            if D::forward(&self[p]) != Some(node) { break; }
            node = p;
            parent = self[p].parent;
        }

        parent
    }

    pub fn first(&self) -> Link { self.root.map(|root| self.extremum::<Left>(root)) }

    pub fn last(&self) -> Link { self.root.map(|root| self.extremum::<Right>(root)) }

    /// Points whatever links to `id` (its parent, or the root) at `substitute` instead.
    pub fn replace(&mut self, id: NodeId, substitute: Link) {
        let parent = self[id].parent;
        if let Some(sub) = substitute { self[sub].parent = parent; }

        match parent {
            None => self.root = substitute,
            Some(p) =>
                if self[p].left == Some(id) {
                    self[p].left = substitute;
                } else {
                    self[p].right = substitute;
                },
        }
    }

    pub fn find<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> Link where C: Compare<Q, K> {
        let mut link = self.root;

        while let Some(id) = link {
            link = match cmp.compare(key, &self[id].key) {
                Equal => return link,
                Less => self[id].left,
                Greater => self[id].right,
            };
        }

        None
    }
}

impl<K, V> Index<NodeId> for Nodes<K, V> {
    type Output = Node<K, V>;
    fn index(&self, id: NodeId) -> &Node<K, V> { &self.slab[id.0] }
}

impl<K, V> IndexMut<NodeId> for Nodes<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> { &mut self.slab[id.0] }
}

/// Inserts an entry, returning the previous value if the key was already present.
///
/// A present key keeps its node and only has its value overwritten.
pub fn insert<K, V, C>(nodes: &mut Nodes<K, V>, cmp: &C, key: K, value: V) -> Option<V>
    where C: Compare<K> {

    let mut parent = None;
    let mut link = nodes.root;
    let mut left = false;

    while let Some(id) = link {
        parent = link;
        link = match cmp.compare(&key, &nodes[id].key) {
            Equal => return Some(replace(&mut nodes[id].value, value)),
            Less => { left = true; nodes[id].left }
            Greater => { left = false; nodes[id].right }
        };
    }

    let id = nodes.alloc(Node::new(key, value, parent));

    match parent {
        None => nodes.root = Some(id),
        Some(p) => {
            if left { nodes[p].left = Some(id); } else { nodes[p].right = Some(id); }
            nodes.rebalance(parent, Mode::Insert);
        }
    }

    None
}

/// Removes the entry held by `id`.
///
/// Returns the entry together with the node that holds its in-order successor afterwards, if
/// any. When `id` has two children it survives and takes over its successor's entry, so it is
/// its own "next" node.
pub fn remove<K, V>(nodes: &mut Nodes<K, V>, id: NodeId) -> ((K, V), Link) {
    match (nodes[id].left, nodes[id].right) {
        (Some(_), Some(right)) => {
            let succ = nodes.extremum::<Left>(right);
            let (key, value) = unlink(nodes, succ);
            let node = &mut nodes[id];
            ((replace(&mut node.key, key), replace(&mut node.value, value)), Some(id))
        }
        _ => {
            let next = nodes.neighbor::<Right>(id);
            (unlink(nodes, id), next)
        }
    }
}

// Physically removes a node with at most one child.
fn unlink<K, V>(nodes: &mut Nodes<K, V>, id: NodeId) -> (K, V) {
    let parent = nodes[id].parent;
    let child = nodes[id].left.or(nodes[id].right);

    nodes.replace(id, child);
    let node = nodes.free(id);
    nodes.rebalance(parent, Mode::Remove);

    (node.key, node.value)
}

pub trait Dir: Sized {
    type Opposite: Dir<Opposite=Self>;

    fn left() -> bool;

    fn forward<K, V>(node: &Node<K, V>) -> Link;
    fn forward_mut<K, V>(node: &mut Node<K, V>) -> &mut Link;
}

pub enum Left {}

impl Dir for Left {
    type Opposite = Right;

    fn left() -> bool { true }

    fn forward<K, V>(node: &Node<K, V>) -> Link { node.left }
    fn forward_mut<K, V>(node: &mut Node<K, V>) -> &mut Link { &mut node.left }
}

pub enum Right {}

impl Dir for Right {
    type Opposite = Left;

    fn left() -> bool { false }

    fn forward<K, V>(node: &Node<K, V>) -> Link { node.right }
    fn forward_mut<K, V>(node: &mut Node<K, V>) -> &mut Link { &mut node.right }
}
