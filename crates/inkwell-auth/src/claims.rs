//! JWT payload.

use serde::{Deserialize, Serialize};

use crate::identity::{Identity, Role};

/// Claims carried by an identity token: exactly `{id, role}` plus the
/// standard `exp`/`iat` timestamps (Unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize_exact_fields() {
        let claims = Claims {
            id: 42,
            role: Role::Admin,
            exp: 1_700_043_200,
            iat: 1_700_000_000,
        };
        let value = serde_json::to_value(&claims).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(object["id"], 42);
        assert_eq!(object["role"], "admin");
        assert_eq!(object["exp"], 1_700_043_200_i64);
        assert_eq!(object["iat"], 1_700_000_000_i64);
    }

    #[test]
    fn test_claims_reject_unknown_role() {
        let json = r#"{"id":1,"role":"root","exp":9999999999,"iat":1}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }

    #[test]
    fn test_identity_from_claims() {
        let claims = Claims {
            id: 7,
            role: Role::User,
            exp: 2,
            iat: 1,
        };
        assert_eq!(claims.identity(), Identity::new(7, Role::User));
    }
}
