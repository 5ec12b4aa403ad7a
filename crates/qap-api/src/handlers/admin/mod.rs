//! Administration handlers, for administrators and the super-administrator.

pub mod audit;
pub mod users;
