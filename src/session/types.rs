use serde::{Deserialize, Serialize};

/// JWT claims structure carried by every session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub user_id: i64,
    pub username: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// The raw token string as presented by the client, attached next to the
/// claims so logout can revoke exactly what was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionToken(pub String);

/// Response body for a successful login
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
}
