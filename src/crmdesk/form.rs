//! # Create/Edit Form
//!
//! One form per list view. Whether it is visible and what it edits is a
//! single value, [`FormState`], so "editing record X while closed" cannot be
//! represented.
//!
//! ```text
//! Closed ──open_create──▶ Creating ──submit ok / cancel──▶ Closed
//! Closed ──open_edit────▶ Editing  ──submit ok / cancel──▶ Closed
//! ```
//!
//! Opening a form while another is open replaces it. Validation runs at
//! submit time; a draft with field errors never reaches the gateway, and
//! the errors are kept on the form for display instead of being notified.
//! A gateway failure leaves the form open with the entered values.

use crate::error::{CrmError, Result};
use crate::gateway::Gateway;
use crate::list::ListController;
use crate::model::{Draft, Record, RecordId};
use crate::validation::FieldErrors;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum FormState<R: Record> {
    Closed,
    Creating {
        draft: R::Draft,
        errors: FieldErrors,
    },
    Editing {
        target: RecordId,
        /// The record as it was when the form opened.
        original: R,
        draft: R::Draft,
        errors: FieldErrors,
    },
}

impl<R: Record> Default for FormState<R> {
    fn default() -> Self {
        FormState::Closed
    }
}

impl<R: Record> FormState<R> {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }

    pub fn draft(&self) -> Option<&R::Draft> {
        match self {
            FormState::Closed => None,
            FormState::Creating { draft, .. } | FormState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            FormState::Closed => None,
            FormState::Creating { errors, .. } | FormState::Editing { errors, .. } => Some(errors),
        }
    }

    pub fn target(&self) -> Option<&RecordId> {
        match self {
            FormState::Editing { target, .. } => Some(target),
            _ => None,
        }
    }

    /// `"Add customer"` / `"Edit customer"`.
    pub fn title(&self) -> Option<String> {
        match self {
            FormState::Closed => None,
            FormState::Creating { .. } => Some(format!("Add {}", R::NOUN)),
            FormState::Editing { .. } => Some(format!("Edit {}", R::NOUN)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormController<R: Record> {
    state: FormState<R>,
}

impl<R: Record> Default for FormController<R> {
    fn default() -> Self {
        Self {
            state: FormState::Closed,
        }
    }
}

impl<R: Record> FormController<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState<R> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Opens an empty form, discarding whatever was open.
    pub fn open_create(&mut self) {
        self.state = FormState::Creating {
            draft: R::Draft::default(),
            errors: FieldErrors::new(),
        };
    }

    /// Opens `record` for editing, discarding whatever was open.
    pub fn open_edit(&mut self, record: &R) {
        self.state = FormState::Editing {
            target: record.id().clone(),
            original: record.clone(),
            draft: record.to_draft(),
            errors: FieldErrors::new(),
        };
    }

    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
    }

    /// Assigns one field of the open draft and clears its error, if any.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        let (draft, errors) = match &mut self.state {
            FormState::Closed => return Err(CrmError::FormClosed),
            FormState::Creating { draft, errors } | FormState::Editing { draft, errors, .. } => {
                (draft, errors)
            }
        };
        draft.set_field(field, value)?;
        errors.remove(field);
        Ok(())
    }

    /// Validates the open draft and sends it through `list`.
    ///
    /// Returns the record the gateway answered with. The form closes only
    /// when the gateway call succeeded.
    pub async fn submit<G>(&mut self, list: &ListController<R, G>) -> Result<R>
    where
        G: Gateway<R> + ?Sized,
    {
        let (draft, target) = self.checked_draft()?;

        let result = match &target {
            None => list.create(&draft).await,
            Some(id) => list.update(id, &draft).await,
        };

        if result.is_ok() {
            self.state = FormState::Closed;
        }
        result
    }

    fn checked_draft(&mut self) -> Result<(R::Draft, Option<RecordId>)> {
        let (draft, errors, target) = match &mut self.state {
            FormState::Closed => return Err(CrmError::FormClosed),
            FormState::Creating { draft, errors } => (draft, errors, None),
            FormState::Editing {
                target,
                draft,
                errors,
                ..
            } => (draft, errors, Some(target.clone())),
        };

        let found = draft.validate();
        if !found.is_empty() {
            debug!("{} form rejected: {found}", R::NOUN);
            *errors = found.clone();
            return Err(CrmError::ValidationFailure(found));
        }
        *errors = FieldErrors::new();
        Ok((draft.clone(), target))
    }
}
