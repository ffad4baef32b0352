use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::ROLE_ADMIN;

/// User attached to a request after bearer-token verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Admins may act on anything; everyone else only on what they own
    pub fn can_modify(&self, owner_id: i64) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

/// Claims carried by the access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a decimal string
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

fn default_role() -> String {
    crate::shared::constants::ROLE_USER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: id,
            name: None,
            role: role.to_string(),
        }
    }

    #[test]
    fn test_can_modify() {
        assert!(user(1, "user").can_modify(1));
        assert!(!user(1, "user").can_modify(2));
        assert!(user(1, "admin").can_modify(2));
    }

    #[test]
    fn test_claims_role_defaults_to_user() {
        let claims: Claims = serde_json::from_str(r#"{"sub":"3","exp":10}"#).unwrap();
        assert_eq!(claims.role, "user");
        assert_eq!(claims.name, None);
    }
}
