//! CSV export projections.
//!
//! # Responsibility
//! - Flatten a record into ordered export rows for the two sort modes.
//! - Serialize rows as CSV and render mailbox lists back to text form.
//!
//! # Invariants
//! - `ByBuilding` emits a placeholder row for empty buildings and for
//!   mailboxes with no residents; `ByResident` emits resident rows only.
//! - Row order is fully deterministic for a given record.

use crate::model::record::{AddressRecord, Building, Mailbox};
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use std::io::Write;

/// Cell text for mailboxes without a number.
pub const UNNUMBERED_LABEL: &str = "unnumbered";
/// Placeholder resident cell for mailboxes with no residents.
pub const EMPTY_MAILBOX_LABEL: &str = "(empty mailbox)";
/// Placeholder mailbox cell for buildings with no mailboxes.
pub const NO_MAILBOXES_LABEL: &str = "(no mailboxes)";

/// Export ordering modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSort {
    /// Group by building, then mailbox number (unnumbered last), then
    /// resident name.
    ByBuilding,
    /// One row per resident, alphabetical by resident name.
    ByResident,
}

/// Error from CSV serialization.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Header row matching the `export_rows` cell order for `sort`.
pub fn header(sort: ExportSort) -> [&'static str; 3] {
    match sort {
        ExportSort::ByBuilding => ["Building", "Mailbox", "Resident"],
        ExportSort::ByResident => ["Resident", "Building", "Mailbox"],
    }
}

/// Flattens `record` into ordered three-cell rows (header not included).
pub fn export_rows(record: &AddressRecord, sort: ExportSort) -> Vec<[String; 3]> {
    match sort {
        ExportSort::ByBuilding => rows_by_building(record),
        ExportSort::ByResident => rows_by_resident(record),
    }
}

/// Writes the header and all rows for `sort` as CSV.
pub fn write_csv<W: Write>(
    record: &AddressRecord,
    sort: ExportSort,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(header(sort))?;
    for row in export_rows(record, sort) {
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders a building's mailboxes in the `number: residents` line format
/// accepted by `parse_block`, one mailbox per line.
pub fn mailbox_block(building: &Building) -> String {
    let mut block = String::new();
    for mailbox in &building.mailboxes {
        let number_part = mailbox.number.map(|n| n.to_string()).unwrap_or_default();
        let _ = writeln!(block, "{}: {}", number_part, mailbox.residents.join(", "));
    }
    block
}

fn rows_by_building(record: &AddressRecord) -> Vec<[String; 3]> {
    let mut buildings: Vec<&Building> = record.buildings.iter().collect();
    buildings.sort_by(|a, b| a.name.cmp(&b.name));

    let mut rows = Vec::new();
    for building in buildings {
        if building.mailboxes.is_empty() {
            rows.push([
                building.name.clone(),
                NO_MAILBOXES_LABEL.to_string(),
                String::new(),
            ]);
            continue;
        }

        let mut mailboxes: Vec<&Mailbox> = building.mailboxes.iter().collect();
        mailboxes.sort_by_key(|m| (m.number.is_none(), m.number.unwrap_or(0)));
        for mailbox in mailboxes {
            let number_cell = number_label(mailbox.number);
            if mailbox.residents.is_empty() {
                rows.push([
                    building.name.clone(),
                    number_cell,
                    EMPTY_MAILBOX_LABEL.to_string(),
                ]);
                continue;
            }
            let mut residents: Vec<&String> = mailbox.residents.iter().collect();
            residents.sort();
            for resident in residents {
                rows.push([building.name.clone(), number_cell.clone(), resident.clone()]);
            }
        }
    }
    rows
}

fn rows_by_resident(record: &AddressRecord) -> Vec<[String; 3]> {
    let mut entries: Vec<(&str, &str, Option<i64>)> = Vec::new();
    for building in &record.buildings {
        for mailbox in &building.mailboxes {
            for resident in &mailbox.residents {
                entries.push((resident.as_str(), building.name.as_str(), mailbox.number));
            }
        }
    }

    entries.sort_by(|a, b| {
        (a.0, a.1, a.2.is_none(), a.2.unwrap_or(0))
            .cmp(&(b.0, b.1, b.2.is_none(), b.2.unwrap_or(0)))
    });

    entries
        .into_iter()
        .map(|(resident, building, number)| {
            [resident.to_string(), building.to_string(), number_label(number)]
        })
        .collect()
}

fn number_label(number: Option<i64>) -> String {
    number.map_or_else(|| UNNUMBERED_LABEL.to_string(), |n| n.to_string())
}
