//! Dewar inventory
//!
//! Tracks which storage slots currently hold a sample. A slot leaves the
//! dewar when its sample is mounted and comes back when it is dismounted.

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Puck labels present in a full dewar
pub const PUCK_LABELS: &str = "ABCDEFGHIJKLMNOP";

/// Sample positions per puck, numbered from 1
pub const SAMPLES_PER_PUCK: i128 = 16;

/// A storage position: puck label plus sample number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub puck: char,
    pub sample: i128,
}

impl Slot {
    pub fn new(puck: char, sample: i128) -> Self {
        Self { puck, sample }
    }
}

/// Rendered the way the protocol spells it, e.g. `5B`
impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sample, self.puck)
    }
}

/// Inventory precondition violations
///
/// These mean the caller and the simulated hardware disagree about where a
/// sample is, so the owning connection is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DewarError {
    #[error("Sample {0} not in dewar")]
    NotInDewar(Slot),

    #[error("Sample {0} already in dewar")]
    AlreadyInDewar(Slot),
}

/// Set of occupied storage slots
#[derive(Debug, Clone)]
pub struct Dewar {
    slots: HashSet<Slot>,
}

impl Dewar {
    /// Create a dewar with every slot of every puck occupied
    pub fn full() -> Self {
        let slots = PUCK_LABELS
            .chars()
            .flat_map(|puck| (1..=SAMPLES_PER_PUCK).map(move |sample| Slot::new(puck, sample)))
            .collect();
        Self { slots }
    }

    pub fn contains(&self, slot: &Slot) -> bool {
        self.slots.contains(slot)
    }

    /// Take a sample out of storage
    pub fn remove(&mut self, slot: Slot) -> Result<(), DewarError> {
        if !self.slots.remove(&slot) {
            return Err(DewarError::NotInDewar(slot));
        }
        Ok(())
    }

    /// Put a sample back into storage
    pub fn insert(&mut self, slot: Slot) -> Result<(), DewarError> {
        if !self.slots.insert(slot) {
            return Err(DewarError::AlreadyInDewar(slot));
        }
        Ok(())
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for Dewar {
    fn default() -> Self {
        Self::full()
    }
}
