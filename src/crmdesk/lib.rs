//! # Crmdesk Architecture
//!
//! Crmdesk is the **client side of a CRM dashboard**: it lists, filters,
//! creates, edits and deletes records held by a remote backend. It is a
//! library that happens to have a CLI client, not the other way around.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints tables, notices, field errors   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Page Layer (api.rs)                                        │
//! │  - ListPage: one list view, query, page, form, pending del  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Workflow Layer                                             │
//! │  - list.rs: canonical collection, reload after mutation     │
//! │  - form.rs, confirm.rs, filter.rs, notify.rs                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Gateway Layer (gateway/)                                   │
//! │  - Abstract Gateway trait                                   │
//! │  - HttpGateway (production), InMemoryGateway (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is generic over [`model::Record`], so customers, leads and
//! employees share one implementation of the workflow.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Returns regular Rust types (`Result<T>`, [`filter::Page`], [`form::FormState`])
//! - Reports user-facing outcomes through a [`notify::Notifier`] it is given
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//!
//! The same core could drive a desktop window or a web frontend.
//!
//! ## Testing Strategy
//!
//! 1. **Workflow** (`list.rs`, `form.rs`, ...): unit tests against
//!    [`gateway::memory::InMemoryGateway`], which counts calls and injects
//!    failures.
//! 2. **HTTP** (`tests/http_gateway.rs`): the REST binding against a mock
//!    server.
//! 3. **CLI** (`tests/cli_integration.rs`): the binary end to end, offline.
//!
//! ## Module Overview
//!
//! - [`api`]: page facade
//! - [`list`]: list state controller
//! - [`filter`]: search, status filter, pagination
//! - [`form`]: create/edit form state machine
//! - [`confirm`]: delete confirmation guard
//! - [`notify`]: user-facing notices
//! - [`gateway`]: backend access
//! - [`model`]: records, drafts, ids
//! - [`validation`]: field-level checks
//! - [`config`]: persisted client settings
//! - [`error`]: error types

pub mod api;
pub mod config;
pub mod confirm;
pub mod error;
pub mod filter;
pub mod form;
pub mod gateway;
pub mod list;
pub mod model;
pub mod notify;
pub mod validation;
