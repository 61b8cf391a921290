//! Client core for the salon admin panel.
//!
//! # Overview
//! Screen state for managing admins, the settings hub and the login forms,
//! backed by a REST collection API. The pieces with real behavior are the
//! entity-list synchronizer (local list mutated only after the remote call
//! resolves, with toast feedback), the modal workflows that gate edits and
//! deletions, and per-field validation messages that clear themselves.
//!
//! # Design
//! - `ResourceClient` is stateless and split into `build_*` / `parse_*`;
//!   a `Transport` does the I/O, and `HttpApi` ties both into `EntityApi`.
//! - `Synchronizer` and the screens split every remote step into
//!   `begin_*` / `complete_*` so interleavings on a single-threaded loop are
//!   explicit; async helpers run one whole cycle.
//! - Time is passed in (`Instant`) rather than read, so validation timers
//!   are deterministic under test.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod collection;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod screens;
pub mod sync;
pub mod toast;
pub mod transport;
pub mod types;
pub mod validation;
pub mod workflow;

pub use api::{EntityApi, HttpApi};
pub use client::ResourceClient;
pub use collection::Collection;
pub use config::{AdminCredentials, ClientConfig};
pub use entity::{Draft, Entity};
pub use error::{ApiError, ConfigError, LoginError, WorkflowError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use sync::{DeleteOutcome, SaveOutcome, Synchronizer};
pub use toast::{Toast, ToastBus, ToastKind};
pub use transport::{Transport, UreqTransport};
pub use types::{Admin, AdminFields, AppView, EntityId, UserRole};
pub use workflow::{ConfirmedDelete, DeleteConfirmation, EditModal};
