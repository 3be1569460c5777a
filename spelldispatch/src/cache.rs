//! Bounded memo of words the backend has already rejected.
//!
//! The cache is only a hint. Losing an entry costs one extra backend call;
//! keeping a stale one would report a correct word as misspelled, so every
//! dictionary mutation must remove the word first.
use std::collections::VecDeque;

use hashbrown::HashSet;
use smol_str::SmolStr;

const PREALLOCATE_LIMIT: usize = 1024;

#[derive(Debug)]
pub struct MisspellingCache {
    capacity: usize,
    words: HashSet<SmolStr>,
    // Insertion order, oldest first. Holds exactly the members of `words`.
    order: VecDeque<SmolStr>,
}

impl MisspellingCache {
    pub fn new(capacity: usize) -> MisspellingCache {
        let initial = capacity.min(PREALLOCATE_LIMIT);
        MisspellingCache {
            capacity,
            words: HashSet::with_capacity(initial),
            order: VecDeque::with_capacity(initial),
        }
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Remembers `word` as misspelled, evicting the oldest entries if
    /// the cache grows past capacity.
    pub fn insert(&mut self, word: &str) {
        if self.words.contains(word) {
            return;
        }

        let word = SmolStr::from(word);
        self.words.insert(word.clone());
        self.order.push_back(word);

        while self.words.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.words.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn remove(&mut self, word: &str) -> bool {
        if !self.words.remove(word) {
            return false;
        }

        self.order.retain(|x| x != word);
        true
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut cache = MisspellingCache::new(4);
        cache.insert("helo");
        cache.insert("wrold");

        assert!(cache.contains("helo"));
        assert!(cache.contains("wrold"));
        assert!(!cache.contains("hello"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn bounded() {
        let mut cache = MisspellingCache::new(2);
        cache.insert("a");
        cache.insert("b");
        cache.insert("c");
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));

        for word in ["d", "e", "f", "g"].iter() {
            cache.insert(word);
            assert_eq!(cache.len(), 2);
        }
    }

    #[test]
    fn reinsert_keeps_order() {
        let mut cache = MisspellingCache::new(2);
        cache.insert("a");
        cache.insert("b");
        cache.insert("a");
        cache.insert("c");
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn remove_forgets_word() {
        let mut cache = MisspellingCache::new(2);
        cache.insert("a");
        cache.insert("b");
        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        assert!(!cache.contains("a"));

        // Removing must not leave ghosts behind that get evicted instead
        // of real entries.
        cache.insert("c");
        cache.insert("a");
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert!(cache.contains("a"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_caches_nothing() {
        let mut cache = MisspellingCache::new(0);
        cache.insert("a");
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }

    #[test]
    fn clear() {
        let mut cache = MisspellingCache::new(8);
        cache.insert("a");
        cache.insert("b");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 8);
    }
}
