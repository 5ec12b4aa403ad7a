//! # qap-auth
//!
//! The session authority for QAP Total.
//!
//! ## Modules
//!
//! - `authority`: login, super-administrator login, first access, password
//!   definition, logout and session lookup
//! - `error`: the authentication error taxonomy
//! - `password`: Argon2id password hashing and policy enforcement
//! - `throttle`: per-email failed-login counting and lockout
//! - `token`: opaque token minting and digests
//! - `mailer`: delivery of first-access tokens

pub mod authority;
pub mod error;
pub mod mailer;
pub mod password;
pub mod throttle;
pub mod token;

pub use authority::{LoginOutcome, SessionAuthority};
pub use error::{AuthError, AuthResult, PasswordRule};
pub use mailer::{LogMailer, OutboxMailer, StoreOutboxMailer, VerificationMailer};
pub use password::{PasswordHasher, PasswordValidator};
pub use throttle::{KeyedLocks, LoginThrottle};
