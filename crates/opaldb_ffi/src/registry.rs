//! Generation-checked handle registries.
//!
//! Managed callers hold opaque 64-bit handles instead of raw addresses.
//! A handle packs a slot index and a generation; resolving it checks both,
//! so a stale handle, one whose object was already finalized, misses
//! instead of touching freed memory. Slot indices are recycled through a
//! [`slab::Slab`]; generations survive recycling and are bumped on every
//! release.

use crate::types::OpalHandle;
use parking_lot::RwLock;
use slab::Slab;
use std::sync::Arc;
use thiserror::Error;

/// The registry cannot issue further handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("handle registry exhausted")]
pub struct RegistryFull;

struct Entry<T> {
    generation: u32,
    value: Arc<T>,
}

struct State<T> {
    slots: Slab<Entry<T>>,
    /// Next generation to issue per slot index; generations start at 1 so
    /// handle 0 is never produced.
    generations: Vec<u32>,
}

/// A registry mapping opaque handles to shared objects.
pub struct HandleRegistry<T> {
    state: RwLock<State<T>>,
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                slots: Slab::new(),
                generations: Vec::new(),
            }),
        }
    }

    /// Registers `value` and returns its handle.
    pub fn insert(&self, value: T) -> Result<OpalHandle, RegistryFull> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let entry = state.slots.vacant_entry();
        let index = entry.key();
        if index > u32::MAX as usize {
            return Err(RegistryFull);
        }
        if state.generations.len() <= index {
            state.generations.resize(index + 1, 1);
        }
        let generation = state.generations[index];

        entry.insert(Entry {
            generation,
            value: Arc::new(value),
        });
        Ok(pack(index as u32, generation))
    }

    /// Resolves a handle to its object, if still live.
    pub fn get(&self, handle: OpalHandle) -> Option<Arc<T>> {
        let (index, generation) = unpack(handle);
        let guard = self.state.read();
        guard
            .slots
            .get(index as usize)
            .filter(|entry| entry.generation == generation)
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Releases a handle, returning its object if the handle was live.
    ///
    /// The slot's generation is bumped, so the same handle value never
    /// resolves again.
    pub fn remove(&self, handle: OpalHandle) -> Option<Arc<T>> {
        let (index, generation) = unpack(handle);
        let mut guard = self.state.write();
        let state = &mut *guard;

        let live = state
            .slots
            .get(index as usize)
            .is_some_and(|entry| entry.generation == generation);
        if !live {
            return None;
        }

        let entry = state.slots.remove(index as usize);
        let mut next = generation.wrapping_add(1);
        if next == 0 {
            next = 1;
        }
        state.generations[index as usize] = next;
        Some(entry.value)
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.state.read().slots.len()
    }

    /// Returns true if no objects are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn pack(index: u32, generation: u32) -> OpalHandle {
    (u64::from(generation) << 32) | u64::from(index)
}

fn unpack(handle: OpalHandle) -> (u32, u32) {
    (handle as u32, (handle >> 32) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let registry = HandleRegistry::new();
        let handle = registry.insert("hello").unwrap();

        assert_ne!(handle, 0);
        assert_eq!(registry.get(handle).as_deref(), Some(&"hello"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn zero_is_never_issued() {
        let registry = HandleRegistry::new();
        let handle = registry.insert(1u8).unwrap();
        assert_ne!(handle, 0);
        assert!(registry.get(0).is_none());
    }

    #[test]
    fn remove_releases_the_slot() {
        let registry = HandleRegistry::new();
        let handle = registry.insert(42u64).unwrap();

        assert_eq!(registry.remove(handle).as_deref(), Some(&42));
        assert!(registry.is_empty());
        assert!(registry.get(handle).is_none());
    }

    #[test]
    fn double_remove_is_a_miss() {
        let registry = HandleRegistry::new();
        let handle = registry.insert(1u8).unwrap();

        assert!(registry.remove(handle).is_some());
        assert!(registry.remove(handle).is_none());
    }

    #[test]
    fn recycled_slot_gets_a_new_generation() {
        let registry = HandleRegistry::new();
        let first = registry.insert("first").unwrap();
        registry.remove(first);

        let second = registry.insert("second").unwrap();
        // Same slot index, different generation.
        assert_eq!(first as u32, second as u32);
        assert_ne!(first, second);

        // The stale handle misses; the fresh one resolves.
        assert!(registry.get(first).is_none());
        assert_eq!(registry.get(second).as_deref(), Some(&"second"));
    }

    #[test]
    fn forged_generation_is_a_miss() {
        let registry = HandleRegistry::new();
        let handle = registry.insert(7i32).unwrap();
        let forged = handle ^ (1 << 40);
        assert!(registry.get(forged).is_none());
    }

    #[test]
    fn independent_handles() {
        let registry = HandleRegistry::new();
        let a = registry.insert("a").unwrap();
        let b = registry.insert("b").unwrap();

        registry.remove(a);
        assert_eq!(registry.get(b).as_deref(), Some(&"b"));
        assert_eq!(registry.len(), 1);
    }
}
