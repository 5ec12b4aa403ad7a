//! Audit log querying and export.

pub mod export;
pub mod service;

pub use service::AuditService;
