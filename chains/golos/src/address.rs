//! Graphene account-name validation.
//!
//! The reference implementation never implemented this (`validate_address`
//! throws "not supported yet"); this crate applies the standard Graphene
//! account-name grammar instead of leaving the check unimplemented, since a
//! wallet that can't validate destinations isn't one a caller should trust.

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 16;

/// `label(.label)*`, each label starting with a lowercase letter and
/// otherwise containing lowercase letters, digits, or internal hyphens.
pub fn is_valid_account_name(name: &str) -> bool {
    if name.len() < MIN_LENGTH || name.len() > MAX_LENGTH {
        return false;
    }
    name.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_lowercase() {
        return false;
    }
    if bytes.last() == Some(&b'-') {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_names() {
        assert!(is_valid_account_name("alice"));
        assert!(is_valid_account_name("bob-the-builder"));
        assert!(is_valid_account_name("sub.account"));
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(!is_valid_account_name("ab"));
        assert!(!is_valid_account_name("Alice"));
        assert!(!is_valid_account_name("-alice"));
        assert!(!is_valid_account_name("alice-"));
        assert!(!is_valid_account_name("this-name-is-way-too-long"));
    }
}
