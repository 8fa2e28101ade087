//! `cardportal-client`
//!
//! **Responsibility:** the portal's client side, minus the pixels.
//!
//! This crate provides:
//! - the authenticated HTTP gateway and typed REST bindings
//! - the permission store and session context
//! - debounced, sequence-guarded list fetching
//! - the routing surface and user-facing notices
//!
//! The backend stays the authority for every decision; this crate only
//! decides what to offer.

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod http;
pub mod list;
pub mod notice;
pub mod permission_store;
pub mod routes;
pub mod sequence;
pub mod session;
pub mod types;

pub use config::ClientConfig;
pub use debounce::Debouncer;
pub use error::{ApiError, GENERIC_ERROR_MESSAGE};
pub use http::ApiClient;
pub use list::{ListController, ListEndpoint, ListSource, ListState};
pub use notice::{Notice, NoticeLevel};
pub use permission_store::PermissionStore;
pub use routes::Route;
pub use sequence::{RequestSequencer, Ticket};
pub use session::{PortalContext, Session};
