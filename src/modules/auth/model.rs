use serde::{Deserialize, Serialize};

fn default_role() -> String {
    // Tokens minted before roles existed carry no role claim; they get the
    // lowest privilege.
    "user".to_string()
}

/// JWT claims as issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id assigned by the identity provider.
    pub sub: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}
