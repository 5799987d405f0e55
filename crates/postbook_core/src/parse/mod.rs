//! Input parsing for bulk mailbox submissions.
//!
//! # Responsibility
//! - Validate free-text and row-based mailbox input before any mutation.
//!
//! # Invariants
//! - Parsers reject malformed numbers and duplicates up front; callers only
//!   ever apply fully validated batches.

pub mod mailbox;
