//! Store key builders for all QAP Total entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use qap_core::types::AccountId;

/// Prefix applied to all QAP Total store keys.
const PREFIX: &str = "qap";

// ── Account keys ───────────────────────────────────────────

/// Key for an account record by ID.
pub fn account_by_id(account_id: AccountId) -> String {
    format!("{PREFIX}:accounts:{account_id}")
}

/// Prefix under which every account record lives.
pub fn accounts_prefix() -> String {
    format!("{PREFIX}:accounts:")
}

/// Index key mapping a normalized email to an account ID.
pub fn account_email_index(email: &str) -> String {
    format!("{PREFIX}:index:email:{email}")
}

/// Index key mapping a national ID (digits only) to an account ID.
pub fn account_national_id_index(national_id: &str) -> String {
    let digits: String = national_id.chars().filter(char::is_ascii_digit).collect();
    format!("{PREFIX}:index:national_id:{digits}")
}

// ── Credential keys ────────────────────────────────────────

/// Key for the password hash of an email.
pub fn credential(email: &str) -> String {
    format!("{PREFIX}:credentials:{email}")
}

// ── Session keys ───────────────────────────────────────────

/// Key of the single session slot.
pub fn session_slot() -> String {
    format!("{PREFIX}:session")
}

// ── Throttle keys ──────────────────────────────────────────

/// Key for the failed-login record of an email.
pub fn login_attempt(email: &str) -> String {
    format!("{PREFIX}:login_attempts:{email}")
}

// ── Verification keys ──────────────────────────────────────

/// Key for a pending verification token, addressed by its digest.
pub fn verification(token_digest: &str) -> String {
    format!("{PREFIX}:verification:{token_digest}")
}

/// Prefix under which every pending verification token lives.
pub fn verification_prefix() -> String {
    format!("{PREFIX}:verification:")
}

/// Key of the outbox message holding the latest first-access token for an email.
pub fn outbox(email: &str) -> String {
    format!("{PREFIX}:outbox:{email}")
}

/// Prefix under which every outbox message lives.
pub fn outbox_prefix() -> String {
    format!("{PREFIX}:outbox:")
}

// ── Audit keys ─────────────────────────────────────────────

/// Key of the audit log (newest first).
pub fn audit_log() -> String {
    format!("{PREFIX}:audit_log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_key() {
        let id = AccountId::from_u128(0);
        assert_eq!(
            account_by_id(id),
            "qap:accounts:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_national_id_index_ignores_punctuation() {
        assert_eq!(
            account_national_id_index("529.982.247-25"),
            account_national_id_index("52998224725")
        );
    }

    #[test]
    fn test_index_keys_do_not_overlap_accounts() {
        assert!(!account_email_index("a@b.c").starts_with(&accounts_prefix()));
    }
}
