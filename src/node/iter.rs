use std::iter::FusedIterator;
use super::{Left, Link, Nodes, Right};

impl<K, V> Nodes<K, V> {
    pub fn iter(&self) -> Iter<K, V> {
        Iter { nodes: self, front: self.first(), back: self.last(), size: self.len() }
    }
}

/// An iterator over a tree's entries in ascending key order.
///
/// Walks successor links from the front and predecessor links from the back, so it needs no
/// stack of its own.
pub struct Iter<'a, K: 'a, V: 'a> {
    nodes: &'a Nodes<K, V>,
    front: Link,
    back: Link,
    size: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self { Iter { ..*self } }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        if self.size == 0 { return None; }

        let nodes = self.nodes;
        let node = &nodes[self.front?];
        self.front = self.front.and_then(|id| nodes.neighbor::<Right>(id));
        self.size -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.size, Some(self.size)) }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        if self.size == 0 { return None; }

        let nodes = self.nodes;
        let node = &nodes[self.back?];
        self.back = self.back.and_then(|id| nodes.neighbor::<Left>(id));
        self.size -= 1;
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}
