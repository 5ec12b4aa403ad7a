//! Field validation for account data: CPF checksum and email shape.

use qap_core::error::AppError;

/// Digits of a CPF, ignoring punctuation.
pub fn cpf_digits(cpf: &str) -> String {
    cpf.chars().filter(char::is_ascii_digit).collect()
}

/// Whether `cpf` is a well-formed CPF: 11 digits, not all equal, with both
/// mod-11 check digits correct.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf_digits(cpf)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let check = |len: usize| {
        let sum: u32 = digits[..len]
            .iter()
            .zip((2..=len as u32 + 1).rev())
            .map(|(digit, weight)| digit * weight)
            .sum();
        match 11 - sum % 11 {
            10 | 11 => 0,
            rest => rest,
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// Canonical `ddd.ddd.ddd-dd` rendering of a valid CPF.
pub fn format_cpf(cpf: &str) -> String {
    let d = cpf_digits(cpf);
    if d.len() != 11 {
        return cpf.trim().to_string();
    }
    format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
}

/// Whether `email` looks like `local@domain.tld` with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validate the editable fields of an account.
pub fn validate_fields(name: &str, email: &str, national_id: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if !is_valid_email(email.trim()) {
        return Err(AppError::validation("Invalid email"));
    }
    if !is_valid_cpf(national_id) {
        return Err(AppError::validation("Invalid CPF"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpf_checksum() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(is_valid_cpf("111.444.777-35"));
        assert!(!is_valid_cpf("529.982.247-26"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("1234567890"));
        assert!(!is_valid_cpf(""));
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("529.982.247-25"), "529.982.247-25");
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("carlos.silva@pm.gov.br"));
        assert!(is_valid_email("x@y.com"));
        assert!(!is_valid_email("x@y"));
        assert!(!is_valid_email("x@.com"));
        assert!(!is_valid_email("x@y."));
        assert!(!is_valid_email("@y.com"));
        assert!(!is_valid_email("a b@y.com"));
        assert!(!is_valid_email("a@b@y.com"));
    }
}
