use super::{Draft, Record, RecordId, null_as_empty, timestamp};
use crate::error::{CrmError, Result};
use crate::validation::{FieldErrors, check_email, optional, require};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    #[default]
    Prospect,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::Active,
        CustomerStatus::Inactive,
        CustomerStatus::Prospect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Prospect => "prospect",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CrmError::InvalidValue {
                field: "status".to_string(),
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub company: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Customer create/update payload. A fresh draft has every field empty and
/// `status = prospect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: String,
    pub industry: Option<String>,
    pub billing_address: Option<String>,
    pub notes: Option<String>,
    pub status: CustomerStatus,
}

impl Draft for CustomerDraft {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "email",
        "phone",
        "company",
        "industry",
        "billing_address",
        "notes",
        "status",
    ];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Please enter customer name");
        require(&mut errors, "email", &self.email, "Please enter email");
        check_email(&mut errors, "email", &self.email);
        require(&mut errors, "company", &self.company, "Please enter company name");
        errors
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "name" => self.name = value.trim().to_string(),
            "email" => self.email = value.trim().to_string(),
            "phone" => self.phone = optional(value),
            "company" => self.company = value.trim().to_string(),
            "industry" => self.industry = optional(value),
            "billing_address" => self.billing_address = optional(value),
            "notes" => self.notes = optional(value),
            "status" => self.status = value.parse()?,
            other => return Err(CrmError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn field(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "phone" => self.phone.clone(),
            "company" => Some(self.company.clone()),
            "industry" => self.industry.clone(),
            "billing_address" => self.billing_address.clone(),
            "notes" => self.notes.clone(),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }
}

impl Record for Customer {
    type Status = CustomerStatus;
    type Draft = CustomerDraft;

    const COLLECTION: &'static str = "customers";
    const NOUN: &'static str = "customer";
    const NOUN_PLURAL: &'static str = "customers";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> CustomerStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.company.as_str()]
    }

    fn to_draft(&self) -> CustomerDraft {
        CustomerDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            industry: self.industry.clone(),
            billing_address: self.billing_address.clone(),
            notes: self.notes.clone(),
            status: self.status,
        }
    }

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: CustomerDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            company: draft.company,
            industry: draft.industry,
            billing_address: draft.billing_address,
            notes: draft.notes,
            status: draft.status,
            created_at,
        }
    }
}
