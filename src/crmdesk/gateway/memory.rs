use super::Gateway;
use crate::error::{CrmError, Result};
use crate::model::{Record, RecordId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

/// Number of calls received per operation, failed ones included.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub list: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn mutations(&self) -> usize {
        self.create + self.update + self.delete
    }

    pub fn total(&self) -> usize {
        self.list + self.mutations()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum FailMode {
    #[default]
    Never,
    Once,
    Always,
}

impl FailMode {
    /// Whether the current call fails; consumes a one-shot failure.
    fn trip(&mut self) -> bool {
        match *self {
            FailMode::Never => false,
            FailMode::Once => {
                *self = FailMode::Never;
                true
            }
            FailMode::Always => true,
        }
    }
}

struct MemState<R> {
    records: Vec<R>,
    calls: CallCounts,
    fail_list: FailMode,
    fail_mutation: FailMode,
    list_delays: VecDeque<Duration>,
}

/// In-memory backend stand-in.
///
/// Assigns UUID v4 ids and `Utc::now()` timestamps on create, the way the
/// real backend assigns its own. `list` answers with the collection as it is
/// when the call arrives; an optional per-call delay then holds the answer
/// back, which lets tests reproduce out-of-order reloads.
pub struct InMemoryGateway<R: Record> {
    state: Mutex<MemState<R>>,
}

impl<R: Record> Default for InMemoryGateway<R> {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl<R: Record> InMemoryGateway<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            state: Mutex::new(MemState {
                records,
                calls: CallCounts::default(),
                fail_list: FailMode::Never,
                fail_mutation: FailMode::Never,
                list_delays: VecDeque::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemState<R>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Server-side view of the collection.
    pub fn records(&self) -> Vec<R> {
        self.state().records.clone()
    }

    pub fn calls(&self) -> CallCounts {
        self.state().calls
    }

    pub fn fail_next_list(&self) {
        self.state().fail_list = FailMode::Once;
    }

    pub fn fail_lists(&self, fail: bool) {
        self.state().fail_list = if fail { FailMode::Always } else { FailMode::Never };
    }

    pub fn fail_next_mutation(&self) {
        self.state().fail_mutation = FailMode::Once;
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.state().fail_mutation = if fail { FailMode::Always } else { FailMode::Never };
    }

    /// Queues response delays for upcoming `list` calls, one per call.
    pub fn delay_lists(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state().list_delays.extend(delays);
    }

    fn begin_mutation(&self, state: &mut MemState<R>) -> Result<()> {
        if state.fail_mutation.trip() {
            return Err(CrmError::MutationFailure(format!(
                "simulated {} mutation failure",
                R::NOUN
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record> Gateway<R> for InMemoryGateway<R> {
    async fn list(&self) -> Result<Vec<R>> {
        let (answer, delay) = {
            let mut state = self.state();
            state.calls.list += 1;
            let delay = state.list_delays.pop_front();
            let answer = if state.fail_list.trip() {
                Err(CrmError::LoadFailure(format!(
                    "simulated {} load failure",
                    R::NOUN
                )))
            } else {
                Ok(state.records.clone())
            };
            (answer, delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        answer
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let mut state = self.state();
        state.calls.create += 1;
        self.begin_mutation(&mut state)?;

        let record = R::from_draft(
            RecordId::new(Uuid::new_v4().to_string()),
            Utc::now(),
            draft.clone(),
        );
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R> {
        let mut state = self.state();
        state.calls.update += 1;
        self.begin_mutation(&mut state)?;

        let slot = state
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| CrmError::NotFound(id.clone()))?;
        let updated = R::from_draft(id.clone(), slot.created_at(), draft.clone());
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let mut state = self.state();
        state.calls.delete += 1;
        self.begin_mutation(&mut state)?;

        let before = state.records.len();
        state.records.retain(|r| r.id() != id);
        if state.records.len() == before {
            return Err(CrmError::NotFound(id.clone()));
        }
        Ok(())
    }
}
