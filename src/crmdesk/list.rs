//! # List State
//!
//! [`ListController`] owns the canonical collection of one record type. It is
//! the only writer; everyone else reads through [`ListController::snapshot`]
//! or a [`watch`] subscription.
//!
//! Consistency is reload-based. A successful create, update or delete is
//! followed by a full [`ListController::load`]; the record the gateway
//! returned is never merged into the collection locally.
//!
//! ## Overlapping actions
//!
//! Every method takes `&self`, so two independently triggered actions can be
//! in flight at once (for instance under `tokio::join!`). Within one action
//! the reload only starts after its mutation succeeded, but nothing orders
//! reloads belonging to different actions: the collection ends up holding
//! whichever `list()` response arrived last, even if it was requested first.
//! Callers that need a fresh view after such a burst call `load` again.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::model::{Record, RecordId};
use crate::notify::{Notice, Notifier};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What observers of a list see.
#[derive(Debug, Clone)]
pub struct ListSnapshot<R> {
    pub records: Arc<Vec<R>>,
    /// `list()` calls currently awaiting a response.
    pub in_flight: usize,
}

impl<R> ListSnapshot<R> {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

impl<R> Default for ListSnapshot<R> {
    fn default() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            in_flight: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Mutation::Create => "created",
            Mutation::Update => "updated",
            Mutation::Delete => "deleted",
        }
    }
}

pub(crate) fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct ListController<R: Record, G: Gateway<R> + ?Sized> {
    gateway: Arc<G>,
    state: watch::Sender<ListSnapshot<R>>,
    notifier: Arc<dyn Notifier>,
}

impl<R: Record, G: Gateway<R> + ?Sized> ListController<R, G> {
    /// Starts with an empty collection; nothing is fetched until [`load`](Self::load).
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            state: watch::Sender::new(ListSnapshot::default()),
            notifier,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.state.borrow().records)
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<R>> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn find(&self, id: &RecordId) -> Option<R> {
        self.state
            .borrow()
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Fetches the whole collection and replaces the current one.
    ///
    /// On failure the previous collection stays in place and a
    /// `Failed to load <plural>` notice goes out.
    pub async fn load(&self) -> Result<()> {
        self.state.send_modify(|s| s.in_flight += 1);
        debug!("loading {}", R::NOUN_PLURAL);

        match self.gateway.list().await {
            Ok(records) => {
                let records = dedupe(records);
                let count = records.len();
                self.state.send_modify(|s| {
                    s.in_flight -= 1;
                    s.records = Arc::new(records);
                });
                info!("loaded {count} {}", R::NOUN_PLURAL);
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| s.in_flight -= 1);
                warn!("loading {} failed: {e}", R::NOUN_PLURAL);
                self.notifier
                    .notify(Notice::error(format!("Failed to load {}", R::NOUN_PLURAL)));
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: &R::Draft) -> Result<R> {
        let outcome = self.gateway.create(draft).await;
        self.settle(Mutation::Create, outcome).await
    }

    pub async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R> {
        let outcome = self.gateway.update(id, draft).await;
        self.settle(Mutation::Update, outcome).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        let outcome = self.gateway.delete(id).await;
        self.settle(Mutation::Delete, outcome).await
    }

    async fn settle<T>(&self, mutation: Mutation, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.notifier.notify(Notice::success(format!(
                    "{} {} successfully",
                    capitalized(R::NOUN),
                    mutation.past()
                )));
                // A failed reload has already been reported by `load`.
                if let Err(e) = self.load().await {
                    debug!("reload after {} failed: {e}", mutation.verb());
                }
                Ok(value)
            }
            Err(e) => {
                warn!("{} {} failed: {e}", mutation.verb(), R::NOUN);
                self.notifier.notify(Notice::error(format!(
                    "Failed to {} {}",
                    mutation.verb(),
                    R::NOUN
                )));
                Err(e)
            }
        }
    }
}

/// Keeps the first record for each id.
fn dedupe<R: Record>(records: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::with_capacity(records.len());
    let before = records.len();
    let records: Vec<R> = records
        .into_iter()
        .filter(|record| seen.insert(record.id().clone()))
        .collect();
    if records.len() != before {
        warn!(
            "backend returned {} duplicate {} ids; kept first occurrences",
            before - records.len(),
            R::NOUN
        );
    }
    records
}
