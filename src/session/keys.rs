/// Redis key naming conventions
/// Establishes consistent, predictable key naming across all Redis usage
const LINKBOARD_NAMESPACE: &str = "linkboard";

/// Session keys
pub struct SessionKey;

impl SessionKey {
    /// Key for session token -> user id mapping
    pub fn token(token: &str) -> String {
        format!("{}:session:{}", LINKBOARD_NAMESPACE, token)
    }
}

/// Password reset keys
pub struct PasswordResetKey;

impl PasswordResetKey {
    /// Key for password reset token -> user id mapping
    pub fn token(token: &str) -> String {
        format!("{}:password_reset:{}", LINKBOARD_NAMESPACE, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keys() {
        let key = SessionKey::token("token123");
        assert!(key.contains("session"));
        assert!(key.contains("token123"));
    }

    #[test]
    fn test_password_reset_keys() {
        let key = PasswordResetKey::token("token456");
        assert!(key.contains("password_reset"));
        assert!(key.contains("token456"));
    }

    #[test]
    fn test_consistent_key_format() {
        // All keys should follow pattern: linkboard:category:id
        let keys = vec![
            SessionKey::token("a"),
            PasswordResetKey::token("b"),
        ];

        for key in keys {
            assert!(
                key.starts_with("linkboard:"),
                "Key must start with 'linkboard:' namespace"
            );
            assert!(key.matches(':').count() >= 2, "Key must be namespaced");
        }
    }
}
