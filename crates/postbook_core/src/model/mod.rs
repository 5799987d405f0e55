//! Domain model for the address directory.
//!
//! # Responsibility
//! - Define the persisted record shape: addresses owning buildings owning
//!   mailboxes owning resident names.
//! - Keep the shared mailbox ordering policy in one place.
//!
//! # Invariants
//! - Records are identified by a stable slug key derived from the display
//!   address.
//! - Mutations operate on explicit copies, never on aliased state.

pub mod record;
