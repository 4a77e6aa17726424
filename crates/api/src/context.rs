/// Principal context for a request (authenticated identity).
///
/// Inserted by the auth middleware after the session token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    username: String,
}

impl PrincipalContext {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
