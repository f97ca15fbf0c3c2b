use ::ordered_iter::OrderedMapIterator;
use super::Iter;

impl<'a, K, V> OrderedMapIterator for Iter<'a, K, V> where K: Ord {
    type Key = &'a K;
    type Val = &'a V;
}
