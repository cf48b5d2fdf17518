use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Form-encoded login credentials. `username` carries the email, matching the
/// OAuth2 password-flow field names the frontend already speaks.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_serializes_as_bearer() {
        let token = Token::bearer("abc123".into());
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["access_token"], "abc123");
        assert_eq!(json["token_type"], "bearer");
    }
}
