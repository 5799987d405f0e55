//! Core domain logic for Postbook.
//! This crate is the single source of truth for business invariants.

pub mod export;
pub mod logging;
pub mod model;
pub mod parse;
pub mod service;
pub mod slug;
pub mod store;

pub use export::{export_rows, header, mailbox_block, write_csv, ExportError, ExportSort};
pub use logging::{default_log_level, init_logging};
pub use model::record::{AddressRecord, Building, Mailbox};
pub use parse::mailbox::{parse_block, parse_rows, MailboxParseError, ParseResult};
pub use service::address_service::{AddressService, AddressServiceError, AddressSummary};
pub use service::building_service::{BuildingService, BuildingServiceError, BulkSource};
pub use service::history_service::{HistoryEntry, HistoryService, HistoryServiceError};
pub use slug::slugify;
pub use store::fs::FsRecordStore;
pub use store::memory::MemoryRecordStore;
pub use store::{RecordStore, SnapshotRef, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
