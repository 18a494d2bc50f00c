// ── Authentication token ──

use secrecy::SecretString;
use serde::Deserialize;

/// Access token returned by `POST /login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: SecretString,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".into()
}

impl Token {
    pub fn new(access_token: SecretString) -> Self {
        Self {
            access_token,
            token_type: default_token_type(),
        }
    }
}
