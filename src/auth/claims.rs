use serde::{Deserialize, Serialize};

/// JWT payload. The token is self-contained: the subject plus the two
/// timestamps are all the identity state the server keeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
}
