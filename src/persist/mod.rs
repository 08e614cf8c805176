//! Selective durable persistence with pluggable storage slots.
//!
//! This module mirrors a whitelisted projection of the application state
//! into a single named durable record and rehydrates it at startup.

pub mod layer;
pub mod slot;

pub use {
    layer::{PersistedSnapshot, PersistenceLayer, STORAGE_KEY, project},
    slot::{FileSlot, MemorySlot, SlotError, StorageSlot, get_data_dir},
};
