//! # Admin Gate
//!
//! Single shared-secret check for the admin panel. A successful login hands
//! out a fixed bearer string; it is not tied to a session and never
//! expires, so anyone holding it has admin access until the binary changes.

use subtle::ConstantTimeEq;

use super::errors::{AuthError, AuthResult};

/// Bearer token issued on successful login
pub const ADMIN_TOKEN: &str = "admin-authenticated";

/// Constant-time comparison of two strings
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Password gate for admin endpoints
#[derive(Clone, Default)]
pub struct AdminGate {
    secret: Option<String>,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl AdminGate {
    /// An empty secret counts as unconfigured
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Compare `password` with the configured secret; false when unconfigured
    pub fn authenticate(&self, password: &str) -> bool {
        match &self.secret {
            Some(secret) => constant_time_str_eq(secret, password),
            None => false,
        }
    }

    /// Exchange a password for the admin bearer token
    pub fn login(&self, password: &str) -> AuthResult<&'static str> {
        if !self.is_configured() {
            return Err(AuthError::NotConfigured);
        }
        if self.authenticate(password) {
            Ok(ADMIN_TOKEN)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Check an `Authorization` header value
    pub fn verify_bearer(&self, header: Option<&str>) -> AuthResult<()> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthError::Unauthorized)?;

        if constant_time_str_eq(token, ADMIN_TOKEN) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate() {
        let gate = AdminGate::new(Some("hunter2".to_string()));

        assert!(gate.authenticate("hunter2"));
        assert!(!gate.authenticate("hunter"));
        assert!(!gate.authenticate(""));
    }

    #[test]
    fn test_unconfigured_gate_rejects_everything() {
        for gate in [AdminGate::new(None), AdminGate::new(Some(String::new()))] {
            assert!(!gate.is_configured());
            assert!(!gate.authenticate(""));
            assert_eq!(gate.login(""), Err(AuthError::NotConfigured));
        }
    }

    #[test]
    fn test_login_issues_fixed_token() {
        let gate = AdminGate::new(Some("pw".to_string()));

        assert_eq!(gate.login("pw"), Ok(ADMIN_TOKEN));
        assert_eq!(gate.login("nope"), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_verify_bearer() {
        let gate = AdminGate::new(Some("pw".to_string()));

        assert!(gate.verify_bearer(Some("Bearer admin-authenticated")).is_ok());
        assert_eq!(gate.verify_bearer(None), Err(AuthError::Unauthorized));
        assert_eq!(
            gate.verify_bearer(Some("admin-authenticated")),
            Err(AuthError::Unauthorized)
        );
        assert_eq!(
            gate.verify_bearer(Some("Bearer something-else")),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let gate = AdminGate::new(Some("pw".to_string()));
        assert!(!format!("{:?}", gate).contains("pw"));
    }
}
