//! Address use-case service.
//!
//! # Responsibility
//! - Create, rename, and delete address records keyed by slug.
//! - Provide the listing and fetch operations consumed by presentation
//!   glue.
//!
//! # Invariants
//! - `create` is an idempotent no-op when the slug is already live.
//! - `rename` saves under the old key before any storage move, so the
//!   renamed key carries the full snapshot history.
//! - Validation failures leave persisted state untouched.

use crate::model::record::AddressRecord;
use crate::slug::slugify;
use crate::store::{RecordStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from address-level operations.
#[derive(Debug)]
pub enum AddressServiceError {
    /// Submitted display text is blank.
    EmptyAddress,
    /// Display text has no sluggable characters to key the record by.
    UnusableAddress(String),
    /// Another record already occupies the target slug.
    SlugOccupied(String),
    /// No record under this key.
    NotFound(String),
    /// Storage-layer failure.
    Store(StoreError),
}

impl Display for AddressServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "full address must not be blank"),
            Self::UnusableAddress(value) => {
                write!(f, "address `{value}` contains no usable characters")
            }
            Self::SlugOccupied(slug) => {
                write!(f, "an address with key `{slug}` already exists")
            }
            Self::NotFound(key) => write!(f, "address not found: {key}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AddressServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for AddressServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(key) => Self::NotFound(key),
            StoreError::Occupied(slug) => Self::SlugOccupied(slug),
            other => Self::Store(other),
        }
    }
}

/// Listing row for the address index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSummary {
    /// Storage key (slug).
    pub key: String,
    /// Display text from the record body.
    pub full_address: String,
}

/// Address service facade over a record store.
pub struct AddressService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> AddressService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new address and returns its key.
    ///
    /// # Contract
    /// - Blank input fails with `EmptyAddress`; input that slugs to nothing
    ///   fails with `UnusableAddress`.
    /// - Re-submitting an already-registered address is a no-op returning
    ///   the existing key; its content and history are untouched.
    pub fn create(&self, full_address: &str) -> Result<String, AddressServiceError> {
        let full_address = full_address.trim();
        if full_address.is_empty() {
            return Err(AddressServiceError::EmptyAddress);
        }
        let key = slugify(full_address);
        if key.is_empty() {
            return Err(AddressServiceError::UnusableAddress(full_address.to_string()));
        }
        if self.store.exists(&key) {
            info!("event=address_create module=service status=noop key={key}");
            return Ok(key);
        }

        self.store.save(&key, &AddressRecord::new(full_address))?;
        info!("event=address_create module=service status=ok key={key}");
        Ok(key)
    }

    /// Renames an address, moving storage when the slug changes.
    ///
    /// # Contract
    /// - Unchanged display text is a no-op returning the same key.
    /// - A slug collision with a different record fails with `SlugOccupied`
    ///   and leaves both records and their histories untouched.
    /// - On success the updated record is saved under the old key first
    ///   (producing the pre-change snapshot); when the slug changed the
    ///   record and its entire history then move to the new key.
    pub fn rename(
        &self,
        key: &str,
        new_full_address: &str,
    ) -> Result<String, AddressServiceError> {
        let new_full_address = new_full_address.trim();
        if new_full_address.is_empty() {
            return Err(AddressServiceError::EmptyAddress);
        }

        let mut record = self.store.load(key)?;
        if record.full_address == new_full_address {
            return Ok(key.to_string());
        }

        let new_key = slugify(new_full_address);
        if new_key.is_empty() {
            return Err(AddressServiceError::UnusableAddress(
                new_full_address.to_string(),
            ));
        }
        if new_key != key && self.store.exists(&new_key) {
            return Err(AddressServiceError::SlugOccupied(new_key));
        }

        record.full_address = new_full_address.to_string();
        self.store.save(key, &record)?;
        if new_key != key {
            self.store.rename(key, &new_key)?;
        }
        info!("event=address_rename module=service status=ok old={key} new={new_key}");
        Ok(new_key)
    }

    /// Deletes an address and its entire history irrecoverably.
    pub fn delete(&self, key: &str) -> Result<(), AddressServiceError> {
        self.store.delete(key)?;
        info!("event=address_delete module=service status=ok key={key}");
        Ok(())
    }

    /// Lists all addresses, sorted by key.
    pub fn list(&self) -> Result<Vec<AddressSummary>, AddressServiceError> {
        let mut summaries = Vec::new();
        for key in self.store.list_keys()? {
            let record = self.store.load(&key)?;
            summaries.push(AddressSummary {
                key,
                full_address: record.full_address,
            });
        }
        Ok(summaries)
    }

    /// Fetches one record by key.
    pub fn get(&self, key: &str) -> Result<AddressRecord, AddressServiceError> {
        Ok(self.store.load(key)?)
    }
}
