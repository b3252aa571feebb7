//! # Records and Drafts
//!
//! Every list the dashboard manages (customers, leads, employees) is the same
//! workflow over a different record type. The workflow code is generic over
//! two traits defined here:
//!
//! - [`Record`]: a row as the backend returns it, with a backend-assigned
//!   [`RecordId`] and creation timestamp.
//! - [`Draft`]: the editable payload sent on create and update. It is the
//!   record minus `id` and `created_at`, and it knows how to validate itself.
//!
//! The client never invents a `RecordId`. Ids only ever come out of a
//! [`Gateway`](crate::gateway::Gateway).

use crate::error::Result;
use crate::validation::FieldErrors;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod customer;
pub mod employee;
pub mod lead;

pub use customer::{Customer, CustomerDraft, CustomerStatus};
pub use employee::{Employee, EmployeeDraft, EmployeeStatus};
pub use lead::{Lead, LeadDraft, LeadStatus};

/// Opaque backend-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A managed entity as returned by the backend.
pub trait Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Status: Copy
        + Eq
        + fmt::Debug
        + fmt::Display
        + FromStr<Err = crate::error::CrmError>
        + Send
        + Sync
        + 'static;
    type Draft: Draft;

    /// Path segment of the collection under the API root.
    const COLLECTION: &'static str;
    const NOUN: &'static str;
    const NOUN_PLURAL: &'static str;

    fn id(&self) -> &RecordId;
    fn status(&self) -> Self::Status;
    fn created_at(&self) -> DateTime<Utc>;

    /// Name shown in notices, confirmations and the list's first column.
    fn label(&self) -> &str;

    /// Values the free-text search matches against. Absent optional fields
    /// are skipped.
    fn search_fields(&self) -> Vec<&str>;

    /// The edit form's starting values.
    fn to_draft(&self) -> Self::Draft;

    /// Assembles a record from a draft plus backend-assigned fields.
    /// Only gateways call this.
    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;
}

/// Create/update payload of a record.
pub trait Draft: Clone + fmt::Debug + Default + PartialEq + Serialize + Send + Sync + 'static {
    /// Editable field names, in form order.
    const FIELDS: &'static [&'static str];

    fn validate(&self) -> FieldErrors;

    /// Assigns a field by name. An empty value clears optional fields.
    fn set_field(&mut self, field: &str, value: &str) -> Result<()>;

    /// Current value of a field, `None` when unset or unknown.
    fn field(&self, field: &str) -> Option<String>;
}

/// Reads a missing or `null` string as empty. Used for fields the form
/// requires but older backend rows may lack.
pub(crate) fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Timestamps from the backend come either as RFC 3339 or as naive
/// ISO-8601 datetimes; the latter are taken to be UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
