//! Address record domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted per address.
//! - Provide lookup helpers and the mailbox ordering policy shared by every
//!   mutation path.
//!
//! # Invariants
//! - Building names are unique within a record (case-sensitive exact match).
//! - Mailbox numbers are unique among numbered mailboxes within a building;
//!   any number of unnumbered mailboxes may coexist.
//! - `Building::sort_mailboxes` keeps numbered mailboxes ascending with
//!   unnumbered ones last, and is stable for ties.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persisted record for one postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Display string shown to users. Never empty.
    pub full_address: String,
    /// Buildings in insertion order.
    pub buildings: Vec<Building>,
}

impl AddressRecord {
    /// Creates an empty record for a freshly registered address.
    pub fn new(full_address: impl Into<String>) -> Self {
        Self {
            full_address: full_address.into(),
            buildings: Vec::new(),
        }
    }

    /// Finds a building by exact name.
    pub fn building(&self, name: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.name == name)
    }

    /// Reports whether a building with this exact name exists.
    pub fn has_building(&self, name: &str) -> bool {
        self.buildings.iter().any(|b| b.name == name)
    }
}

/// One building within an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Unique within the owning record.
    pub name: String,
    /// Kept sorted by `sort_mailboxes` after every mutation.
    pub mailboxes: Vec<Mailbox>,
}

impl Building {
    /// Creates a building with no mailboxes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mailboxes: Vec::new(),
        }
    }

    /// Restores the mailbox ordering invariant: ascending by number,
    /// unnumbered entries after all numbered ones, stable otherwise.
    pub fn sort_mailboxes(&mut self) {
        self.mailboxes
            .sort_by_key(|m| (m.number.is_none(), m.number.unwrap_or(0)));
    }

    /// Numbers currently in use, excluding the mailbox at `skip` when given.
    pub fn numbers_in_use(&self, skip: Option<usize>) -> BTreeSet<i64> {
        self.mailboxes
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .filter_map(|(_, mailbox)| mailbox.number)
            .collect()
    }
}

/// One mailbox within a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    /// `None` marks an unnumbered mailbox.
    pub number: Option<i64>,
    /// Resident names in insertion order. Entries are non-empty.
    pub residents: Vec<String>,
}

impl Mailbox {
    /// Creates a mailbox from already-validated parts.
    pub fn new(number: Option<i64>, residents: Vec<String>) -> Self {
        Self { number, residents }
    }
}
