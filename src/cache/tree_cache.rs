//! Fixed-size array of tree roots shared by all workers.

use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use crate::tree::TreeNode;

/// Fixed-capacity array of tree-root slots.
///
/// Every slot is an atomic pointer that either is null (empty) or exclusively owns a
/// `Box<TreeNode>`. Writers replace a slot with a single atomic swap and then drop
/// whatever they swapped out, so two workers racing on the same slot each release
/// exactly one tree and the last swap in real time wins. There is no lock: the
/// swap is the minimum the memory model needs for ownership to stay sound.
///
/// The capacity is fixed at construction and never changes.
pub struct TreeCache {
    slots: Box<[AtomicPtr<TreeNode>]>,
}

impl TreeCache {
    /// Creates a cache with `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| AtomicPtr::new(ptr::null_mut()))
            .collect();
        Self { slots }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Stores `tree` at `index`, releasing the tree that was there before.
    ///
    /// `None` empties the slot. The previous tree is dropped on the calling thread,
    /// so reclamation cost is charged to the writer.
    ///
    /// # Panics
    /// Panics if `index >= capacity()`.
    #[inline]
    pub fn write(&self, index: usize, tree: Option<Box<TreeNode>>) {
        let new = tree.map_or(ptr::null_mut(), Box::into_raw);
        let old = self.slots[index].swap(new, Ordering::AcqRel);
        if !old.is_null() {
            // SAFETY: non-null slot pointers always come from `Box::into_raw` above, and
            // the swap moved ownership of `old` out of the slot to this thread alone.
            drop(unsafe { Box::from_raw(old) });
        }
    }

    /// Number of slots currently holding a tree.
    ///
    /// Only a snapshot while writers are still running.
    pub fn occupied(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !slot.load(Ordering::Acquire).is_null())
            .count()
    }

    /// Returns the tree at `index`, if any.
    ///
    /// Takes `&mut self`, so no writer can release the tree while it is borrowed.
    pub fn slot(&mut self, index: usize) -> Option<&TreeNode> {
        let raw = *self.slots.get_mut(index)?.get_mut();
        // SAFETY: exclusive access guarantees nobody swaps the pointer out while the
        // returned reference lives; non-null pointers own a live `TreeNode`.
        unsafe { raw.as_ref() }
    }

    /// Total number of nodes held across all slots.
    pub fn node_count(&mut self) -> u64 {
        (0..self.capacity())
            .filter_map(|i| self.slot(i).map(TreeNode::node_count))
            .sum()
    }

    /// Empties every slot, releasing all trees.
    pub fn clear(&self) {
        for index in 0..self.capacity() {
            self.write(index, None);
        }
    }
}

impl Drop for TreeCache {
    fn drop(&mut self) {
        for slot in self.slots.iter_mut() {
            let raw = std::mem::replace(slot.get_mut(), ptr::null_mut());
            if !raw.is_null() {
                // SAFETY: see `write`; `&mut self` means no other owner exists.
                drop(unsafe { Box::from_raw(raw) });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_cache_is_empty() {
        let mut cache = TreeCache::new(8);
        assert_eq!(cache.capacity(), 8);
        assert_eq!(cache.occupied(), 0);
        assert!(cache.slot(0).is_none());
        assert!(cache.slot(8).is_none());
    }

    #[test]
    fn test_write_replaces_previous_tree() {
        let mut cache = TreeCache::new(2);
        cache.write(1, build_tree(2));
        cache.write(1, build_tree(4));

        assert_eq!(cache.occupied(), 1);
        assert_eq!(cache.slot(1).map(|t| t.val), Some(4));
        assert_eq!(cache.node_count(), 15);
    }

    #[test]
    fn test_write_none_empties_slot() {
        let mut cache = TreeCache::new(1);
        cache.write(0, build_tree(3));
        cache.write(0, None);
        assert!(cache.slot(0).is_none());
    }

    #[test]
    fn test_clear() {
        let cache = TreeCache::new(3);
        for i in 0..3 {
            cache.write(i, build_tree(2));
        }
        assert_eq!(cache.occupied(), 3);

        cache.clear();
        assert_eq!(cache.occupied(), 0);
    }

    #[test]
    #[should_panic]
    fn test_write_out_of_range_panics() {
        let cache = TreeCache::new(1);
        cache.write(1, None);
    }

    #[test]
    fn test_concurrent_writes_same_slot() {
        let cache = Arc::new(TreeCache::new(1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..200 {
                        cache.write(0, build_tree(5));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut cache = Arc::try_unwrap(cache).ok().unwrap();
        assert_eq!(cache.occupied(), 1);
        assert_eq!(cache.node_count(), 31);
    }
}
