//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

// ============================================================================
// Login
// ============================================================================

/// Login form (`application/x-www-form-urlencoded`)
///
/// Missing fields read as empty, which fails as invalid credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
    /// Only the exact value `"true"` enables remember-me
    #[serde(rename = "rememberMe", default)]
    pub remember_me: String,
}

impl LoginForm {
    pub fn remember_me(&self) -> bool {
        self.remember_me == "true"
    }
}

/// Panel response after a password or cookie login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelResponse {
    pub user: String,
    /// Admin privilege was granted for this login
    pub elevated: bool,
    /// A remember-me session backs this login
    pub remembered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

// ============================================================================
// Add User
// ============================================================================

/// Add user form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddUserForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pass: String,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_me_requires_exact_true() {
        let form = |value: &str| LoginForm {
            remember_me: value.to_string(),
            ..Default::default()
        };

        assert!(form("true").remember_me());
        assert!(!form("TRUE").remember_me());
        assert!(!form("on").remember_me());
        assert!(!form("").remember_me());
    }

    #[test]
    fn test_panel_response_shape() {
        let json = serde_json::to_value(PanelResponse {
            user: "admin".to_string(),
            elevated: true,
            remembered: false,
            last_seen: Some("12:00:00".to_string()),
        })
        .unwrap();

        assert_eq!(json["user"], "admin");
        assert_eq!(json["lastSeen"], "12:00:00");
    }
}
