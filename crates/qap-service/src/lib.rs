//! # qap-service
//!
//! Business logic service layer for QAP Total. Each service orchestrates
//! repositories and the session authority to implement application-level
//! use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`Services`] wires the whole
//! graph from configuration.

pub mod account;
pub mod audit;
pub mod bootstrap;
pub mod container;
pub mod context;

pub use account::{AccountService, AdminService};
pub use audit::AuditService;
pub use container::Services;
pub use context::RequestContext;
