use super::{Draft, Record, RecordId, timestamp};
use crate::error::{CrmError, Result};
use crate::validation::{FieldErrors, check_email, optional, require};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sales pipeline stage of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Negotiation,
        LeadStatus::ClosedWon,
        LeadStatus::ClosedLost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::ClosedWon => "closed_won",
            LeadStatus::ClosedLost => "closed_lost",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, LeadStatus::ClosedWon | LeadStatus::ClosedLost)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        // Accept "closed-won" as well as the wire spelling.
        let wanted = s.trim().to_lowercase().replace('-', "_");
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
pub struct Lead {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeadDraft {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub assigned_to: Option<String>,
    pub status: LeadStatus,
}

impl Draft for LeadDraft {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "email",
        "phone",
        "company",
        "source",
        "notes",
        "assigned_to",
        "status",
    ];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Please enter lead name");
        if let Some(email) = &self.email {
            check_email(&mut errors, "email", email);
        }
        errors
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "name" => self.name = value.trim().to_string(),
            "email" => self.email = optional(value),
            "phone" => self.phone = optional(value),
            "company" => self.company = optional(value),
            "source" => self.source = optional(value),
            "notes" => self.notes = optional(value),
            "assigned_to" => self.assigned_to = optional(value),
            "status" => self.status = value.parse()?,
            other => return Err(CrmError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn field(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "email" => self.email.clone(),
            "phone" => self.phone.clone(),
            "company" => self.company.clone(),
            "source" => self.source.clone(),
            "notes" => self.notes.clone(),
            "assigned_to" => self.assigned_to.clone(),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }
}

impl Record for Lead {
    type Status = LeadStatus;
    type Draft = LeadDraft;

    const COLLECTION: &'static str = "leads";
    const NOUN: &'static str = "lead";
    const NOUN_PLURAL: &'static str = "leads";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> LeadStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.company.as_deref());
        fields
    }

    fn to_draft(&self) -> LeadDraft {
        LeadDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            source: self.source.clone(),
            notes: self.notes.clone(),
            assigned_to: self.assigned_to.clone(),
            status: self.status,
        }
    }

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: LeadDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            company: draft.company,
            source: draft.source,
            notes: draft.notes,
            assigned_to: draft.assigned_to,
            status: draft.status,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_name_is_required() {
        let mut draft = LeadDraft::default();
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("name"));

        draft.set_field("name", "Globex inbound").unwrap();
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn email_is_checked_when_present() {
        let mut draft = LeadDraft {
            name: "Hank".into(),
            ..Default::default()
        };
        draft.set_field("email", "hank@globex").unwrap();
        assert!(draft.validate().contains("email"));
    }

    #[test]
    fn status_accepts_dashed_spelling() {
        assert_eq!("closed-won".parse::<LeadStatus>().unwrap(), LeadStatus::ClosedWon);
        assert_eq!("Negotiation".parse::<LeadStatus>().unwrap(), LeadStatus::Negotiation);
        assert!("won".parse::<LeadStatus>().is_err());
        assert!(LeadStatus::ClosedLost.is_closed());
    }

    #[test]
    fn search_fields_skip_missing_values() {
        let lead = Lead::from_draft(
            RecordId::new("l1"),
            Utc::now(),
            LeadDraft {
                name: "Hank".into(),
                company: Some("Globex".into()),
                ..Default::default()
            },
        );
        assert_eq!(lead.search_fields(), vec!["Hank", "Globex"]);
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        let draft = LeadDraft {
            name: "Hank".into(),
            status: LeadStatus::ClosedWon,
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["status"], "closed_won");
    }
}
