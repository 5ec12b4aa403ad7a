//! Authentication bookkeeping records.

pub mod attempt;
pub mod verification;

pub use attempt::LoginAttempt;
pub use verification::VerificationToken;
