//! Charset validators for user-supplied identifiers.

/// Usernames allow word characters plus `.`, `@`, `+` and `-`. The name
/// `me` is reserved because `/api/users/me` routes to the current user.
pub fn validate_username(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if value.eq_ignore_ascii_case("me") {
        return Err("\"me\" is not an allowed username".to_string());
    }
    let ok = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'));
    if !ok {
        return Err(format!("Username \"{}\" contains invalid characters", value));
    }
    Ok(())
}

/// Tag slugs are restricted to `[-a-zA-Z0-9_]`.
pub fn validate_tag_slug(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Slug cannot be empty".to_string());
    }
    let ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(format!("Slug \"{}\" contains invalid characters", value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_accepts_word_chars_and_punctuation() {
        for name in ["alice", "alice.b", "a_b+c@d-e", "Алиса", "user123"] {
            assert!(validate_username(name).is_ok(), "rejected {:?}", name);
        }
    }

    #[test]
    fn test_username_rejects_me_case_insensitive() {
        assert!(validate_username("me").is_err());
        assert!(validate_username("ME").is_err());
        assert!(validate_username("Me").is_err());
        // "me" as a substring is fine
        assert!(validate_username("mes").is_ok());
    }

    #[test]
    fn test_username_rejects_bad_chars() {
        for name in ["", "with space", "semi;colon", "sla/sh", "exclaim!"] {
            assert!(validate_username(name).is_err(), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_slug_charset() {
        assert!(validate_tag_slug("breakfast").is_ok());
        assert!(validate_tag_slug("quick-meals_2").is_ok());
        assert!(validate_tag_slug("").is_err());
        assert!(validate_tag_slug("café").is_err());
        assert!(validate_tag_slug("two words").is_err());
        assert!(validate_tag_slug("dot.ted").is_err());
    }
}
