//! Account administration: field operatives and administrators.

pub mod admin;
pub mod import;
pub mod service;
pub mod validation;

pub use admin::AdminService;
pub use import::{ImportError, ImportReport, ImportRow};
pub use service::{AccountFilter, AccountService, NewAccountRequest, UpdateAccountRequest};
