//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `postbook_core` linkage.
//! - Print the address listing from the default storage directories.

use postbook_core::{AddressService, FsRecordStore};

fn main() {
    let store = FsRecordStore::new("data", "data_history");
    let addresses = AddressService::new(store);

    match addresses.list() {
        Ok(summaries) => {
            println!("postbook_core version={}", postbook_core::core_version());
            for summary in summaries {
                println!("{}\t{}", summary.key, summary.full_address);
            }
        }
        Err(err) => {
            eprintln!("failed to list addresses: {err}");
            std::process::exit(1);
        }
    }
}
