//! Height-balance maintenance for the node graph.

use log::trace;
use super::node::{Dir, Left, Link, NodeId, Nodes, Right};

/// The kind of mutation a rebalance walk follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// A leaf was linked somewhere below the starting node.
    Insert,
    /// A node was unlinked somewhere below the starting node.
    Remove,
}

impl Mode {
    // After an insertion a balance of 0 means the shorter side grew; after a removal a balance
    // of +-1 means the taller side was left alone. Either way the subtree height is unchanged.
    fn settled(self, balance: isize) -> bool {
        match self {
            Mode::Insert => balance == 0,
            Mode::Remove => balance.abs() == 1,
        }
    }
}

impl<K, V> Nodes<K, V> {
    /// Walks from `start` toward the root, refreshing heights and rotating where a node's
    /// subtrees differ in height by two.
    ///
    /// Stops as soon as a subtree's height is known to be unchanged, since nothing above it can
    /// have moved out of balance.
    pub fn rebalance(&mut self, start: Link, mode: Mode) {
        let mut link = start;

        while let Some(id) = link {
            self.fix_height(id);
            let balance = self.balance_factor(id);
            let parent = self[id].parent;

            if mode.settled(balance) {
                trace!("{:?} rebalance settled at {:?}", mode, id);
                return;
            }

            match balance {
                2 => self.restore::<Left>(id),
                -2 => self.restore::<Right>(id),
                _ => {}
            }

            link = parent;
        }
    }

    // Restores balance at a node whose `Heavy` subtree is two levels taller than the other.
    //
    // A child leaning away from `Heavy` is first rotated toward `Heavy`, making the pair a
    // double rotation.
    fn restore<Heavy>(&mut self, id: NodeId) where Heavy: Dir {
        if let Some(child) = Heavy::forward(&self[id]) {
            if self.lean::<Heavy::Opposite>(child) > 0 {
                self.rotate::<Heavy>(child);
            }
        }

        self.rotate::<Heavy::Opposite>(id);
    }

    /// Rotates the subtree rooted at `id` so that `id` moves down in direction `D`.
    ///
    /// `rotate::<Left>` is the classic left rotation: the right child becomes the subtree root
    /// and takes `id` as its left child, while its old left subtree becomes `id`'s right one.
    pub fn rotate<D>(&mut self, id: NodeId) where D: Dir {
        let pivot = match D::Opposite::forward(&self[id]) {
            Some(pivot) => pivot,
            None => {
                debug_assert!(false, "rotation of {:?} has no pivot", id);
                return;
            }
        };

        trace!("rotating {:?} {}", id, if D::left() { "left" } else { "right" });

        let inner = D::forward(&self[pivot]);
        *D::Opposite::forward_mut(&mut self[id]) = inner;
        if let Some(inner) = inner { self[inner].parent = Some(id); }

        self.replace(id, Some(pivot));
        *D::forward_mut(&mut self[pivot]) = Some(id);
        self[id].parent = Some(pivot);

        self.fix_height(id);
        self.fix_height(pivot);
    }
}

#[cfg(test)]
mod test {
    use compare::natural;
    use crate::node::{self, Left, Nodes, Right};

    fn keys(nodes: &Nodes<u32, ()>) -> Vec<u32> { nodes.iter().map(|e| *e.0).collect() }

    #[test]
    fn ascending_inserts_rotate_left() {
        let mut nodes = Nodes::new();
        for key in 1..4 { node::insert(&mut nodes, &natural(), key, ()); }

        let root = nodes.root.unwrap();
        assert_eq!(nodes[root].key, 2);
        assert_eq!(nodes[root].height, 1);
        assert_eq!(nodes[nodes[root].left.unwrap()].key, 1);
        assert_eq!(nodes[nodes[root].right.unwrap()].key, 3);
    }

    #[test]
    fn zig_zag_inserts_rotate_twice() {
        let mut nodes = Nodes::new();
        for &key in &[3, 1, 2] { node::insert(&mut nodes, &natural(), key, ()); }

        let root = nodes.root.unwrap();
        assert_eq!(nodes[root].key, 2);
        assert_eq!(nodes[root].parent, None);
        assert_eq!(keys(&nodes), [1, 2, 3]);
    }

    #[test]
    fn zag_zig_inserts_rotate_twice() {
        let mut nodes = Nodes::new();
        for &key in &[1, 3, 2] { node::insert(&mut nodes, &natural(), key, ()); }

        let root = nodes.root.unwrap();
        let left = nodes[root].left.unwrap();
        let right = nodes[root].right.unwrap();

        assert_eq!(nodes[root].key, 2);
        assert_eq!(nodes[root].parent, None);
        assert_eq!(nodes[root].height, 1);
        assert_eq!((nodes[left].key, nodes[left].parent), (1, Some(root)));
        assert_eq!((nodes[right].key, nodes[right].parent), (3, Some(root)));
        assert_eq!((nodes[left].height, nodes[right].height), (0, 0));
        assert_eq!(keys(&nodes), [1, 2, 3]);
    }

    #[test]
    fn rotation_round_trip_restores_shape() {
        let mut nodes = Nodes::new();
        for &key in &[2, 1, 3] { node::insert(&mut nodes, &natural(), key, ()); }

        let root = nodes.root.unwrap();
        nodes.rotate::<Left>(root);
        assert_eq!(nodes[nodes.root.unwrap()].key, 3);
        assert_eq!(nodes[root].parent, nodes.root);
        assert_eq!(keys(&nodes), [1, 2, 3]);

        let top = nodes.root.unwrap();
        nodes.rotate::<Right>(top);
        assert_eq!(nodes.root, Some(root));
        assert_eq!(nodes[root].height, 1);
        assert_eq!(keys(&nodes), [1, 2, 3]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "has no pivot")]
    fn rotation_without_pivot_panics() {
        let mut nodes = Nodes::new();
        node::insert(&mut nodes, &natural(), 1u32, ());

        let root = nodes.root.unwrap();
        nodes.rotate::<Left>(root);
    }
}
