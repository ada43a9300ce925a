use serde::{Deserialize, Serialize};

/// Claims carried by the bearer token. Issued by the authentication service;
/// this crate only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub tip_uporabnika_id: u8,
    pub exp: usize,
}
