//! Staff roster import from workforce CSV exports.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::allocation::domain::StaffUser;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownRole(String),
    UnknownQualification(String),
    InvalidFlag(String),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read staff roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid staff roster CSV data: {}", err),
            RosterImportError::UnknownRole(value) => {
                write!(f, "unrecognized staff role '{}'", value)
            }
            RosterImportError::UnknownQualification(value) => {
                write!(f, "unrecognized qualification '{}'", value)
            }
            RosterImportError::InvalidFlag(value) => {
                write!(f, "could not read '{}' as a yes/no flag", value)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads workforce exports with `Staff ID, Username, Name, Active, Roles,
/// Qualifications` columns into directory entries.
pub struct StaffRosterImporter;

impl StaffRosterImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<StaffUser>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<StaffUser>, RosterImportError> {
        parser::parse_records(reader)
    }
}
