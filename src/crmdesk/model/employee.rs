use super::{Draft, Record, RecordId, timestamp};
use crate::error::{CrmError, Result};
use crate::validation::{FieldErrors, check_email, optional, require};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    Terminated,
    OnLeave,
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 4] = [
        EmployeeStatus::Active,
        EmployeeStatus::Inactive,
        EmployeeStatus::Terminated,
        EmployeeStatus::OnLeave,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Terminated => "terminated",
            EmployeeStatus::OnLeave => "on_leave",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
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

/// A staff member. `employee_id` is the HR number printed on badges; `id` is
/// the backend's own key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: RecordId,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    pub position: String,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmployeeDraft {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department_id: Option<String>,
    pub position: String,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub manager_id: Option<String>,
    pub status: EmployeeStatus,
}

impl Draft for EmployeeDraft {
    const FIELDS: &'static [&'static str] = &[
        "employee_id",
        "full_name",
        "email",
        "phone",
        "department_id",
        "position",
        "hire_date",
        "salary",
        "manager_id",
        "status",
    ];

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "employee_id", &self.employee_id, "Please enter employee ID");
        require(&mut errors, "full_name", &self.full_name, "Please enter full name");
        require(&mut errors, "email", &self.email, "Please enter email");
        check_email(&mut errors, "email", &self.email);
        require(&mut errors, "position", &self.position, "Please enter position");
        if self.hire_date.is_none() {
            errors.insert("hire_date", "Please select hire date");
        }
        if self.salary.is_some_and(|salary| salary < 0.0) {
            errors.insert("salary", "Salary cannot be negative");
        }
        errors
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        let invalid = || CrmError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        };

        match field {
            "employee_id" => self.employee_id = value.trim().to_string(),
            "full_name" => self.full_name = value.trim().to_string(),
            "email" => self.email = value.trim().to_string(),
            "phone" => self.phone = optional(value),
            "department_id" => self.department_id = optional(value),
            "position" => self.position = value.trim().to_string(),
            "hire_date" => {
                self.hire_date = optional(value)
                    .map(|date| NaiveDate::parse_from_str(&date, "%Y-%m-%d"))
                    .transpose()
                    .map_err(|_| invalid())?;
            }
            "salary" => {
                self.salary = optional(value)
                    .map(|salary| salary.parse::<f64>())
                    .transpose()
                    .map_err(|_| invalid())?;
            }
            "manager_id" => self.manager_id = optional(value),
            "status" => self.status = value.parse()?,
            other => return Err(CrmError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn field(&self, field: &str) -> Option<String> {
        match field {
            "employee_id" => Some(self.employee_id.clone()),
            "full_name" => Some(self.full_name.clone()),
            "email" => Some(self.email.clone()),
            "phone" => self.phone.clone(),
            "department_id" => self.department_id.clone(),
            "position" => Some(self.position.clone()),
            "hire_date" => self.hire_date.map(|date| date.to_string()),
            "salary" => self.salary.map(|salary| salary.to_string()),
            "manager_id" => self.manager_id.clone(),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }
}

impl Record for Employee {
    type Status = EmployeeStatus;
    type Draft = EmployeeDraft;

    const COLLECTION: &'static str = "employees";
    const NOUN: &'static str = "employee";
    const NOUN_PLURAL: &'static str = "employees";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> EmployeeStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn label(&self) -> &str {
        &self.full_name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.full_name.as_str(),
            self.email.as_str(),
            self.employee_id.as_str(),
            self.position.as_str(),
        ]
    }

    fn to_draft(&self) -> EmployeeDraft {
        EmployeeDraft {
            employee_id: self.employee_id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            department_id: self.department_id.clone(),
            position: self.position.clone(),
            hire_date: Some(self.hire_date),
            salary: self.salary,
            manager_id: self.manager_id.clone(),
            status: self.status,
        }
    }

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: EmployeeDraft) -> Self {
        Self {
            id,
            employee_id: draft.employee_id,
            full_name: draft.full_name,
            email: draft.email,
            phone: draft.phone,
            department_id: draft.department_id,
            position: draft.position,
            // Validated drafts always carry one.
            hire_date: draft.hire_date.unwrap_or(created_at.date_naive()),
            salary: draft.salary,
            manager_id: draft.manager_id,
            status: draft.status,
            created_at,
        }
    }
}
