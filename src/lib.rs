//! An ordered key-indexed sequence based on an AVL tree, navigated with stateful cursors.
//!
//! [`AvlTree`](struct.AvlTree.html) keeps its entries sorted by key and rebalances itself after
//! every insertion and removal, so that no node's subtrees ever differ in height by more than
//! one. [`Cursor`](struct.Cursor.html)s walk the entries in key order and can be used to remove
//! the entry they are on.
//!
//! # Examples
//!
//! ```
//! use avl_sequence::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for &key in &[5, 3, 8, 1, 4, 7, 9, 2, 6] { tree.insert(key, key * 100); }
//!
//! let mut cursor = tree.find(&5);
//! assert_eq!(tree.remove_at(&mut cursor), Ok((5, 500)));
//! assert_eq!(cursor.key(&tree), &6);
//!
//! let keys: Vec<_> = tree.iter().map(|e| *e.0).collect();
//! assert_eq!(keys, [1, 2, 3, 4, 6, 7, 8, 9]);
//! ```

#![warn(missing_docs)]

mod balance;
mod cursor;
mod node;
mod tree;

#[cfg(feature = "ordered_iter")]
mod ordered_iter;

#[cfg(feature = "quickcheck")]
mod quickcheck;

pub use cursor::{Cursor, CursorError};
pub use node::Iter;
pub use tree::AvlTree;
