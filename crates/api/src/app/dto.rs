use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `/signup` and `/signin`. Missing fields deserialize as absent.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Absent fields become empty strings, which the services reject.
    pub fn into_parts(self) -> (String, String) {
        (
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAccountRequest {
    #[serde(default)]
    pub initial_balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: i64,
}
