//! Building and mailbox use-case service.
//!
//! # Responsibility
//! - Validate nested building/mailbox mutations above the storage layer.
//! - Apply mutations to explicit record copies; the facade persists only
//!   after a transform succeeds.
//!
//! # Invariants
//! - Building names stay unique within a record.
//! - Mailbox numbers stay unique among numbered mailboxes per building.
//! - Every mutation leaves the touched building's mailboxes sorted
//!   (unnumbered last).
//! - No-op transforms return `None` and are never persisted, so they do
//!   not generate snapshots.

use crate::model::record::{AddressRecord, Building, Mailbox};
use crate::parse::mailbox::{parse_block, parse_rows, MailboxParseError};
use crate::store::{RecordStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from building/mailbox operations.
#[derive(Debug)]
pub enum BuildingServiceError {
    /// No record under this key.
    AddressNotFound(String),
    /// No building with this name in the record.
    BuildingNotFound(String),
    /// Mailbox index outside the building's mailbox list.
    MailboxIndexOutOfRange { building: String, index: usize },
    /// New building name is empty.
    EmptyBuildingName,
    /// Another building already carries the target name.
    DuplicateBuildingName(String),
    /// Submitted mailbox number is not an integer.
    InvalidMailboxNumber(String),
    /// Mailbox number already used in this building.
    DuplicateMailboxNumber(i64),
    /// Bulk input failed validation.
    Parse(MailboxParseError),
    /// Storage-layer failure.
    Store(StoreError),
}

impl Display for BuildingServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddressNotFound(key) => write!(f, "address not found: {key}"),
            Self::BuildingNotFound(name) => write!(f, "building not found: {name}"),
            Self::MailboxIndexOutOfRange { building, index } => {
                write!(f, "no mailbox at index {index} in building {building}")
            }
            Self::EmptyBuildingName => write!(f, "building name must not be empty"),
            Self::DuplicateBuildingName(name) => {
                write!(f, "a building named `{name}` already exists at this address")
            }
            Self::InvalidMailboxNumber(value) => {
                write!(f, "mailbox number `{value}` is not a valid integer")
            }
            Self::DuplicateMailboxNumber(number) => {
                write!(f, "mailbox {number} already exists in this building")
            }
            Self::Parse(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BuildingServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MailboxParseError> for BuildingServiceError {
    fn from(value: MailboxParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<StoreError> for BuildingServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(key) => Self::AddressNotFound(key),
            other => Self::Store(other),
        }
    }
}

/// Bulk mailbox input accepted by `bulk_add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkSource {
    /// Newline-separated `number: residents` text. Lines without a `:` are
    /// silently dropped before parsing.
    Text(String),
    /// Already-split two-column rows: number text and a comma-separated
    /// resident list.
    Rows(Vec<(String, String)>),
}

/// Appends an empty building.
///
/// Returns `None` (nothing to persist) when the name is empty or already
/// present.
pub fn add_building(record: &AddressRecord, name: &str) -> Option<AddressRecord> {
    if name.is_empty() || record.has_building(name) {
        return None;
    }
    let mut updated = record.clone();
    updated.buildings.push(Building::new(name));
    Some(updated)
}

/// Removes the first building matching `name`.
///
/// Returns `None` when no building matches.
pub fn delete_building(record: &AddressRecord, name: &str) -> Option<AddressRecord> {
    let index = record.buildings.iter().position(|b| b.name == name)?;
    let mut updated = record.clone();
    updated.buildings.remove(index);
    Some(updated)
}

/// Renames a building and replaces its whole mailbox list.
///
/// `mailbox_text` goes through `parse_block`; the replacement is full, not
/// a merge, and the result is re-sorted.
pub fn rename_building(
    record: &AddressRecord,
    old_name: &str,
    new_name: &str,
    mailbox_text: &str,
) -> Result<AddressRecord, BuildingServiceError> {
    if new_name.is_empty() {
        return Err(BuildingServiceError::EmptyBuildingName);
    }
    let index = building_index(record, old_name)?;
    if new_name != old_name && record.has_building(new_name) {
        return Err(BuildingServiceError::DuplicateBuildingName(
            new_name.to_string(),
        ));
    }
    let mailboxes = parse_block(mailbox_text)?;

    let mut updated = record.clone();
    let building = &mut updated.buildings[index];
    building.name = new_name.to_string();
    building.mailboxes = mailboxes;
    building.sort_mailboxes();
    Ok(updated)
}

/// Appends one mailbox to a building.
///
/// An empty `number_text` produces an unnumbered mailbox. Residents are
/// newline-separated; blank lines are dropped.
pub fn add_mailbox(
    record: &AddressRecord,
    building_name: &str,
    number_text: &str,
    residents_text: &str,
) -> Result<AddressRecord, BuildingServiceError> {
    let index = building_index(record, building_name)?;
    let number = parse_single_number(number_text)?;
    if let Some(number) = number {
        if record.buildings[index].numbers_in_use(None).contains(&number) {
            return Err(BuildingServiceError::DuplicateMailboxNumber(number));
        }
    }

    let mut updated = record.clone();
    let building = &mut updated.buildings[index];
    building
        .mailboxes
        .push(Mailbox::new(number, split_resident_lines(residents_text)));
    building.sort_mailboxes();
    Ok(updated)
}

/// Replaces the number and residents of the mailbox at `mailbox_index`.
///
/// The collision check excludes the edited entry itself, so re-submitting
/// an unchanged number is fine.
pub fn edit_mailbox(
    record: &AddressRecord,
    building_name: &str,
    mailbox_index: usize,
    number_text: &str,
    residents_text: &str,
) -> Result<AddressRecord, BuildingServiceError> {
    let index = building_index(record, building_name)?;
    let building = &record.buildings[index];
    if mailbox_index >= building.mailboxes.len() {
        return Err(BuildingServiceError::MailboxIndexOutOfRange {
            building: building_name.to_string(),
            index: mailbox_index,
        });
    }
    let number = parse_single_number(number_text)?;
    if let Some(number) = number {
        if building.numbers_in_use(Some(mailbox_index)).contains(&number) {
            return Err(BuildingServiceError::DuplicateMailboxNumber(number));
        }
    }

    let mut updated = record.clone();
    let building = &mut updated.buildings[index];
    building.mailboxes[mailbox_index] =
        Mailbox::new(number, split_resident_lines(residents_text));
    building.sort_mailboxes();
    Ok(updated)
}

/// Removes the mailbox at `mailbox_index`.
pub fn delete_mailbox(
    record: &AddressRecord,
    building_name: &str,
    mailbox_index: usize,
) -> Result<AddressRecord, BuildingServiceError> {
    let index = building_index(record, building_name)?;
    if mailbox_index >= record.buildings[index].mailboxes.len() {
        return Err(BuildingServiceError::MailboxIndexOutOfRange {
            building: building_name.to_string(),
            index: mailbox_index,
        });
    }

    let mut updated = record.clone();
    updated.buildings[index].mailboxes.remove(mailbox_index);
    Ok(updated)
}

/// Appends a validated batch of mailboxes to a building.
///
/// Parsing is all-or-nothing: any error leaves the record untouched.
/// Returns `None` when the source held no entries.
pub fn bulk_add(
    record: &AddressRecord,
    building_name: &str,
    source: &BulkSource,
) -> Result<Option<AddressRecord>, BuildingServiceError> {
    let index = building_index(record, building_name)?;
    let existing = &record.buildings[index].mailboxes;

    let parsed = match source {
        BulkSource::Text(text) => {
            let rows = text.lines().filter_map(|line| line.split_once(':'));
            parse_rows(rows, existing)?
        }
        BulkSource::Rows(rows) => parse_rows(
            rows.iter().map(|(number, residents)| {
                (number.as_str(), residents.as_str())
            }),
            existing,
        )?,
    };
    if parsed.is_empty() {
        return Ok(None);
    }

    let mut updated = record.clone();
    let building = &mut updated.buildings[index];
    building.mailboxes.extend(parsed);
    building.sort_mailboxes();
    Ok(Some(updated))
}

/// Splits newline-separated resident names, dropping blank lines.
pub fn split_resident_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn building_index(
    record: &AddressRecord,
    name: &str,
) -> Result<usize, BuildingServiceError> {
    record
        .buildings
        .iter()
        .position(|b| b.name == name)
        .ok_or_else(|| BuildingServiceError::BuildingNotFound(name.to_string()))
}

fn parse_single_number(text: &str) -> Result<Option<i64>, BuildingServiceError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i64>()
        .map(Some)
        .map_err(|_| BuildingServiceError::InvalidMailboxNumber(text.to_string()))
}

/// Building/mailbox service facade over a record store.
///
/// Each operation loads the record, applies the matching transform, and
/// persists the result through `save` (which snapshots the prior state).
/// No-op transforms skip the save entirely.
pub struct BuildingService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> BuildingService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds an empty building; silently a no-op when the name is taken or
    /// empty.
    pub fn add_building(&self, key: &str, name: &str) -> Result<(), BuildingServiceError> {
        let record = self.store.load(key)?;
        if let Some(updated) = add_building(&record, name) {
            self.store.save(key, &updated)?;
            info!("event=building_add module=service status=ok key={key}");
        }
        Ok(())
    }

    /// Renames a building and replaces its mailbox list from text form.
    pub fn rename_building(
        &self,
        key: &str,
        old_name: &str,
        new_name: &str,
        mailbox_text: &str,
    ) -> Result<(), BuildingServiceError> {
        let record = self.store.load(key)?;
        let updated = rename_building(&record, old_name, new_name, mailbox_text)?;
        self.store.save(key, &updated)?;
        info!("event=building_edit module=service status=ok key={key}");
        Ok(())
    }

    /// Deletes a building; a no-op when it does not exist.
    pub fn delete_building(&self, key: &str, name: &str) -> Result<(), BuildingServiceError> {
        let record = self.store.load(key)?;
        if let Some(updated) = delete_building(&record, name) {
            self.store.save(key, &updated)?;
            info!("event=building_delete module=service status=ok key={key}");
        }
        Ok(())
    }

    /// Adds one mailbox to a building.
    pub fn add_mailbox(
        &self,
        key: &str,
        building_name: &str,
        number_text: &str,
        residents_text: &str,
    ) -> Result<(), BuildingServiceError> {
        let record = self.store.load(key)?;
        let updated = add_mailbox(&record, building_name, number_text, residents_text)?;
        self.store.save(key, &updated)?;
        info!("event=mailbox_add module=service status=ok key={key}");
        Ok(())
    }

    /// Edits the mailbox at `mailbox_index`.
    pub fn edit_mailbox(
        &self,
        key: &str,
        building_name: &str,
        mailbox_index: usize,
        number_text: &str,
        residents_text: &str,
    ) -> Result<(), BuildingServiceError> {
        let record = self.store.load(key)?;
        let updated = edit_mailbox(
            &record,
            building_name,
            mailbox_index,
            number_text,
            residents_text,
        )?;
        self.store.save(key, &updated)?;
        info!("event=mailbox_edit module=service status=ok key={key}");
        Ok(())
    }

    /// Deletes the mailbox at `mailbox_index`.
    pub fn delete_mailbox(
        &self,
        key: &str,
        building_name: &str,
        mailbox_index: usize,
    ) -> Result<(), BuildingServiceError> {
        let record = self.store.load(key)?;
        let updated = delete_mailbox(&record, building_name, mailbox_index)?;
        self.store.save(key, &updated)?;
        info!("event=mailbox_delete module=service status=ok key={key}");
        Ok(())
    }

    /// Bulk-adds mailboxes from text or rows; all-or-nothing.
    pub fn bulk_add(
        &self,
        key: &str,
        building_name: &str,
        source: &BulkSource,
    ) -> Result<(), BuildingServiceError> {
        let record = self.store.load(key)?;
        if let Some(updated) = bulk_add(&record, building_name, source)? {
            self.store.save(key, &updated)?;
            info!("event=mailbox_bulk_add module=service status=ok key={key}");
        }
        Ok(())
    }
}
