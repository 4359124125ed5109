use std::time::Duration;

/// Basic-auth credentials of an actinia user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

// keep passwords out of debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Where an [`crate::Actinia`] session gets its connection parameters from.
pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn api_version(&self) -> &str;
    fn credentials(&self) -> Option<Credentials>;
    fn timeout(&self) -> Option<Duration>;
}
