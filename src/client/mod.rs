//! Backend HTTP clients.
//!
//! `session` owns the authenticated connection state shared by every
//! sub-client; `service` binds that session to one service endpoint URL.
//! The storage-provisioning RPCs themselves live above this layer.

pub mod service;
pub mod session;

pub use service::ServiceClient;
pub use session::BackendSession;
