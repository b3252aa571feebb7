//! Delete confirmation.
//!
//! A delete is a two-step action: [`PendingDelete::new`] records the target
//! and nothing else, then the user either confirms (one gateway delete) or
//! dismisses (no effect at all). Both steps consume the guard, so a single
//! request can never delete twice.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::list::ListController;
use crate::model::{Record, RecordId};
use tracing::debug;

/// One unanswered delete request. It cannot be copied, so it is answered
/// at most once:
///
/// ```compile_fail
/// fn answer_twice<T: Clone>() {}
/// answer_twice::<crmdesk::confirm::PendingDelete<crmdesk::model::Customer>>();
/// ```
#[derive(Debug)]
#[must_use = "a pending delete does nothing until confirmed or dismissed"]
pub struct PendingDelete<R: Record> {
    target: R,
}

impl<R: Record> PendingDelete<R> {
    pub fn new(target: R) -> Self {
        debug!("delete requested for {} {}", R::NOUN, target.id());
        Self { target }
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_id(&self) -> &RecordId {
        self.target.id()
    }

    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete this {}?", R::NOUN)
    }

    /// Deletes the target through `list`, which reports and reloads.
    pub async fn confirm<G>(self, list: &ListController<R, G>) -> Result<()>
    where
        G: Gateway<R> + ?Sized,
    {
        list.delete(self.target.id()).await
    }

    pub fn dismiss(self) {
        debug!("delete of {} {} dismissed", R::NOUN, self.target.id());
    }
}
