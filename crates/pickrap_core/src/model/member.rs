//! Member (account) model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MemberId = Uuid;

/// Account record. Email is the external identity used by every use-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Trimmed, lowercase, unique across members.
    pub email: String,
}

impl Member {
    /// Creates a member with a generated id and normalized email.
    pub fn new(email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
        }
    }
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns whether a normalized email has a plausible `local@domain` shape.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, Member};

    #[test]
    fn new_member_normalizes_email() {
        let member = Member::new("  Reader@Example.COM ");
        assert_eq!(member.email, "reader@example.com");
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.io"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@b.io"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("a@b@c"));
        assert!(!is_valid_email("a b@c.io"));
    }
}
