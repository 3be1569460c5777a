//! Consumer identity.
//!
//! A consumer is whatever submits requests and wants its answers back in
//! order: an open document, a text field. Ids are slot indices with a
//! generation counter, so an id that outlives its consumer can never be
//! mistaken for whoever reuses the slot.
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConsumerId {
    slot: u32,
    generation: u32,
}

impl ConsumerId {
    /// Queue for dictionary mutations, which belong to no consumer.
    pub const BROADCAST: ConsumerId = ConsumerId {
        slot: u32::MAX,
        generation: u32::MAX,
    };

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_broadcast(&self) -> bool {
        *self == ConsumerId::BROADCAST
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_broadcast() {
            f.write_str("consumer#broadcast")
        } else {
            write!(f, "consumer#{}.{}", self.slot, self.generation)
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    live: bool,
}

/// Hands out [`ConsumerId`]s and tracks which of them are still live.
#[derive(Debug, Default)]
pub struct ConsumerRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl ConsumerRegistry {
    pub fn new() -> ConsumerRegistry {
        ConsumerRegistry::default()
    }

    pub fn register(&mut self) -> ConsumerId {
        self.live += 1;

        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.live = true;
            return ConsumerId {
                slot,
                generation: entry.generation,
            };
        }

        let slot = self.slots.len() as u32;
        debug_assert!(slot != u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            live: true,
        });
        ConsumerId {
            slot,
            generation: 0,
        }
    }

    /// Retires `id`. Returns false if it was not live.
    pub fn release(&mut self, id: ConsumerId) -> bool {
        if !self.is_live(id) {
            return false;
        }

        let entry = &mut self.slots[id.slot as usize];
        entry.live = false;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        self.live -= 1;
        true
    }

    pub fn is_live(&self, id: ConsumerId) -> bool {
        if id.is_broadcast() {
            return true;
        }

        match self.slots.get(id.slot as usize) {
            Some(entry) => entry.live && entry.generation == id.generation,
            None => false,
        }
    }

    /// Number of live consumers.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_release() {
        let mut registry = ConsumerRegistry::new();
        let a = registry.register();
        let b = registry.register();

        assert_ne!(a, b);
        assert!(registry.is_live(a));
        assert!(registry.is_live(b));
        assert_eq!(registry.len(), 2);

        assert!(registry.release(a));
        assert!(!registry.is_live(a));
        assert!(!registry.release(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reused_slot_has_new_generation() {
        let mut registry = ConsumerRegistry::new();
        let a = registry.register();
        registry.release(a);

        let c = registry.register();
        assert_eq!(c.slot(), a.slot());
        assert_ne!(c.generation(), a.generation());
        assert!(registry.is_live(c));
        assert!(!registry.is_live(a));
    }

    #[test]
    fn unknown_ids_are_dead() {
        let mut other = ConsumerRegistry::new();
        other.register();
        let foreign = other.register();

        let registry = ConsumerRegistry::new();
        assert!(!registry.is_live(foreign));
        assert!(registry.is_live(ConsumerId::BROADCAST));
        assert!(registry.is_empty());
    }

    #[test]
    fn display() {
        let mut registry = ConsumerRegistry::new();
        assert_eq!(registry.register().to_string(), "consumer#0.0");
        assert_eq!(ConsumerId::BROADCAST.to_string(), "consumer#broadcast");
    }
}
