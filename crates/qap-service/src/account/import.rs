//! Bulk import of field operatives.

use serde::{Deserialize, Serialize};

/// One row of an operative import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email.
    #[serde(default)]
    pub email: String,
    /// CPF, with or without punctuation.
    #[serde(default)]
    pub national_id: String,
}

impl ImportRow {
    /// Whether every field has content.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.national_id.trim().is_empty()
    }
}

/// A rejected import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    /// 1-based row number.
    pub line: usize,
    /// Why the row was rejected.
    pub reason: String,
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows received.
    pub total: usize,
    /// Rows that created an account.
    pub inserted: usize,
    /// Rows skipped because the email or CPF already exists.
    pub duplicates: usize,
    /// Rows rejected by validation.
    pub errors: Vec<ImportError>,
}

impl ImportReport {
    /// An empty report for `total` rows.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Record a rejected row.
    pub fn reject(&mut self, line: usize, reason: impl Into<String>) {
        self.errors.push(ImportError {
            line,
            reason: reason.into(),
        });
    }
}
