//! Repository implementations for all QAP Total entities.

pub mod account;
pub mod attempt;
pub mod audit;
pub mod credential;
pub mod session;
pub mod verification;

pub use account::AccountRepository;
pub use attempt::LoginAttemptRepository;
pub use audit::AuditLogRepository;
pub use credential::CredentialRepository;
pub use session::SessionSlotRepository;
pub use verification::VerificationTokenRepository;
