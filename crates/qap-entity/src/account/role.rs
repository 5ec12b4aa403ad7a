//! Account role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three mutually exclusive account roles.
///
/// Roles are ordered by privilege level: SuperAdmin > Admin > Operative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Field operative using the assistant.
    Operative,
    /// Administrator managing operatives, documents and prompts.
    Admin,
    /// Super-administrator managing administrators.
    SuperAdmin,
}

impl Role {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::SuperAdmin => 3,
            Self::Admin => 2,
            Self::Operative => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &Role) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Whether this role may manage field operatives.
    pub fn can_manage_operatives(&self) -> bool {
        self.has_at_least(&Self::Admin)
    }

    /// Whether this role may manage administrator accounts.
    pub fn can_manage_admins(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Return the role as its wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operative => "OPERATIVE",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = qap_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "OPERATIVE" => Ok(Self::Operative),
            "ADMIN" => Ok(Self::Admin),
            "SUPER_ADMIN" | "SUPERADMIN" => Ok(Self::SuperAdmin),
            _ => Err(qap_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: operative, admin, super_admin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(Role::SuperAdmin.has_at_least(&Role::Admin));
        assert!(Role::Admin.has_at_least(&Role::Operative));
        assert!(!Role::Operative.has_at_least(&Role::Admin));
        assert!(Role::Admin.can_manage_operatives());
        assert!(!Role::Admin.can_manage_admins());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("super-admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert!("viewer".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"SUPER_ADMIN\"");
    }
}
