//! Department aggregate.

use super::{DepartmentId, DirectoryDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 100;

/// Validated, trimmed department name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentName(String);

impl DepartmentName {
    /// Creates a validated department name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidDepartmentName`] when the
    /// trimmed value is shorter than 2 or longer than 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
            return Err(DirectoryDomainError::InvalidDepartmentName(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A company department. Referenced by accounts and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: DepartmentName,
    created_at: DateTime<Utc>,
}

impl Department {
    /// Creates a new department stamped with the current clock time.
    #[must_use]
    pub fn new(name: DepartmentName, clock: &impl Clock) -> Self {
        Self {
            id: DepartmentId::new(),
            name,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a department from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: DepartmentId,
        name: DepartmentName,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    /// Returns the department identifier.
    #[must_use]
    pub const fn id(&self) -> DepartmentId {
        self.id
    }

    /// Returns the department name.
    #[must_use]
    pub const fn name(&self) -> &DepartmentName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
