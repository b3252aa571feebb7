//! # Page Facade
//!
//! [`ListPage`] is the single entry point a UI drives for one record type.
//! It wires the pieces of a list view together and holds the view's local
//! state:
//!
//! - the [`ListController`] owning the canonical collection,
//! - the current [`ListQuery`] and page number,
//! - the [`FormController`],
//! - at most one [`PendingDelete`].
//!
//! ## What the Facade Does NOT Do
//!
//! - **Workflow logic**: reload-after-mutation and notices live in
//!   [`ListController`], validation in the drafts, state transitions in
//!   [`FormController`].
//! - **Presentation**: everything returned is data. The CLI decides how a
//!   page or a field error is printed.
//!
//! Derived views ([`visible`](ListPage::visible),
//! [`current_page`](ListPage::current_page)) are recomputed on every call
//! from the current collection and query, so they never go stale.
//!
//! ## Generic Over Gateway
//!
//! - Production: `ListPage<Customer, dyn Gateway<Customer>>` with an
//!   [`HttpGateway`](crate::gateway::http::HttpGateway) behind it
//! - Testing: `ListPage<Customer, InMemoryGateway<Customer>>`

use crate::config::DeskConfig;
use crate::confirm::PendingDelete;
use crate::error::{CrmError, Result};
use crate::filter::{self, ListQuery, Page, StatusFilter};
use crate::form::{FormController, FormState};
use crate::gateway::Gateway;
use crate::list::ListController;
use crate::model::{Record, RecordId};
use crate::notify::Notifier;
use std::sync::Arc;

pub struct ListPage<R: Record, G: Gateway<R> + ?Sized> {
    list: ListController<R, G>,
    query: ListQuery<R::Status>,
    page: usize,
    page_size: usize,
    form: FormController<R>,
    pending: Option<PendingDelete<R>>,
}

impl<R: Record, G: Gateway<R> + ?Sized> ListPage<R, G> {
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            list: ListController::new(gateway, notifier),
            query: ListQuery::default(),
            page: 1,
            page_size: DeskConfig::default().page_size,
            form: FormController::new(),
            pending: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn list(&self) -> &ListController<R, G> {
        &self.list
    }

    /// Initial load when the view is shown.
    pub async fn open(&self) -> Result<()> {
        self.list.load().await
    }

    pub async fn reload(&self) -> Result<()> {
        self.list.load().await
    }

    pub fn query(&self) -> &ListQuery<R::Status> {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: StatusFilter<R::Status>) {
        self.query.status = status;
        self.page = 1;
    }

    /// 1-based; out-of-range pages are clamped when the page is computed.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn visible(&self) -> Vec<R> {
        let records = self.list.snapshot();
        filter::filter(&records, &self.query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn current_page(&self) -> Page<R> {
        filter::paginate(self.visible(), self.page, self.page_size)
    }

    /// A record of the current collection, unfiltered.
    pub fn record(&self, id: &RecordId) -> Result<R> {
        self.list
            .find(id)
            .ok_or_else(|| CrmError::NotFound(id.clone()))
    }

    pub fn form(&self) -> &FormState<R> {
        self.form.state()
    }

    pub fn open_create(&mut self) {
        self.form.open_create();
    }

    /// Opens the edit form for a record of the current collection.
    pub fn open_edit(&mut self, id: &RecordId) -> Result<()> {
        let record = self.record(id)?;
        self.form.open_edit(&record);
        Ok(())
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        self.form.set_field(field, value)
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    pub async fn submit(&mut self) -> Result<R> {
        self.form.submit(&self.list).await
    }

    /// Asks for confirmation before deleting `id`. A previous unanswered
    /// request is dropped.
    pub fn request_delete(&mut self, id: &RecordId) -> Result<&PendingDelete<R>> {
        let record = self.record(id)?;
        if let Some(previous) = self.pending.take() {
            previous.dismiss();
        }
        Ok(self.pending.insert(PendingDelete::new(record)))
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete<R>> {
        self.pending.as_ref()
    }

    /// Deletes the pending target. `Ok(false)` when nothing was pending.
    pub async fn confirm_delete(&mut self) -> Result<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };
        pending.confirm(&self.list).await?;
        Ok(true)
    }

    /// Drops the pending request, if any. Returns whether there was one.
    pub fn dismiss_delete(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.dismiss();
                true
            }
            None => false,
        }
    }
}
