//! Account domain entities.

pub mod model;
pub mod role;

pub use model::{Account, SUPERADMIN_ACCOUNT_ID, normalize_email};
pub use role::Role;
