//! # Gateway Layer
//!
//! The backend is reached through the [`Gateway`] trait: four async CRUD calls
//! per record type and nothing else. The list workflow never sees HTTP, JSON
//! or status codes, only records and the error taxonomy below.
//!
//! ## Implementations
//!
//! - [`http::HttpGateway`]: the real backend, `{base}/{collection}/` REST
//!   endpoints over `reqwest`.
//! - [`memory::InMemoryGateway`]: a backend stand-in for tests and offline
//!   runs. Counts calls and can be told to fail.
//!
//! ## Errors
//!
//! | Call | Failure |
//! | --- | --- |
//! | `list` | `CrmError::LoadFailure` |
//! | `create` | `CrmError::MutationFailure` |
//! | `update`, `delete` | `CrmError::MutationFailure`, or `CrmError::NotFound` when the id is gone |
//!
//! There are no filter or pagination parameters: `list` always returns the
//! whole collection and filtering happens client-side.

use crate::error::Result;
use crate::model::{Record, RecordId};
use async_trait::async_trait;

pub mod http;
pub mod memory;

/// Remote CRUD operations for one record type.
#[async_trait]
pub trait Gateway<R: Record>: Send + Sync {
    /// Fetches the entire collection, in backend order.
    async fn list(&self) -> Result<Vec<R>>;

    async fn create(&self, draft: &R::Draft) -> Result<R>;

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R>;

    async fn delete(&self, id: &RecordId) -> Result<()>;
}
